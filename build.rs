//! Build script to embed level files
//!
//! Scans assets/levels/ and generates a table of (file name, contents) so
//! the game can ship its levels inside the binary. WASM can't enumerate
//! directories at runtime, and native builds then run from any directory.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=assets/levels");

    let levels_dir = Path::new("assets/levels");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    let table_path = out_dir.join("embedded_levels.rs");

    let mut table = String::from("pub const EMBEDDED_LEVELS: &[(&str, &[u8])] = &[\n");

    if levels_dir.exists() {
        let mut levels: Vec<_> = fs::read_dir(levels_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext.to_ascii_lowercase() == "ron")
                    .unwrap_or(false)
            })
            .collect();

        // Level order follows file names (01_..., 02_...)
        levels.sort_by_key(|e| e.file_name());

        for entry in levels {
            let name = entry.file_name().to_string_lossy().to_string();
            let abs = fs::canonicalize(entry.path()).unwrap();
            table.push_str(&format!(
                "    ({:?}, include_bytes!({:?})),\n",
                name,
                abs.to_string_lossy()
            ));
        }
    }

    table.push_str("];\n");

    let mut file = fs::File::create(table_path).unwrap();
    file.write_all(table.as_bytes()).unwrap();
}
