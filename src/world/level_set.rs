//! Level set
//!
//! The ordered list of levels a run plays through. Level numbers start at 1
//! and wrap around once every level has been completed.

use std::path::PathBuf;

use super::builtin::starter_level;
use super::level::{load_level, load_level_from_bytes, Level, LevelError};

// Generated by build.rs from assets/levels/*.ron
include!(concat!(env!("OUT_DIR"), "/embedded_levels.rs"));

/// Where a level comes from
#[derive(Debug, Clone, PartialEq)]
pub enum LevelSource {
    /// Compiled into the binary
    Embedded { name: &'static str, bytes: &'static [u8] },
    /// Read from disk on load
    File(PathBuf),
    /// The built-in starter level
    Builtin,
}

impl LevelSource {
    pub fn label(&self) -> String {
        match self {
            LevelSource::Embedded { name, .. } => format!("embedded:{}", name),
            LevelSource::File(path) => path.display().to_string(),
            LevelSource::Builtin => "builtin:starter".to_string(),
        }
    }

    fn load(&self) -> Result<Level, LevelError> {
        match self {
            LevelSource::Embedded { bytes, .. } => load_level_from_bytes(bytes),
            LevelSource::File(path) => load_level(path),
            LevelSource::Builtin => Level::from_data(&starter_level()),
        }
    }
}

pub struct LevelSet {
    sources: Vec<LevelSource>,
}

impl LevelSet {
    pub fn new(sources: Vec<LevelSource>) -> Self {
        let sources = if sources.is_empty() {
            vec![LevelSource::Builtin]
        } else {
            sources
        };
        Self { sources }
    }

    /// Configured files if any, else embedded levels, else the starter level
    pub fn from_config(level_files: &[PathBuf]) -> Self {
        if !level_files.is_empty() {
            return Self::new(level_files.iter().cloned().map(LevelSource::File).collect());
        }
        Self::new(
            EMBEDDED_LEVELS
                .iter()
                .map(|&(name, bytes)| LevelSource::Embedded { name, bytes })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Source for a 1-based level number
    pub fn source(&self, number: u32) -> &LevelSource {
        let idx = (number.max(1) as usize - 1) % self.sources.len();
        &self.sources[idx]
    }

    /// Load level `number` (1-based). Failures are fatal for the caller:
    /// a level can't start without its geometry.
    pub fn load(&self, number: u32) -> Result<Level, LevelError> {
        let source = self.source(number);
        tracing::debug!(level = number, source = %source.label(), "loading level");
        source.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_falls_back_to_builtin() {
        let set = LevelSet::new(Vec::new());
        assert_eq!(set.len(), 1);
        assert_eq!(set.source(1), &LevelSource::Builtin);
        assert!(set.load(1).is_ok());
    }

    #[test]
    fn test_level_numbers_wrap() {
        let set = LevelSet::new(vec![
            LevelSource::Builtin,
            LevelSource::File(PathBuf::from("b.ron")),
        ]);
        assert_eq!(set.source(1), &LevelSource::Builtin);
        assert_eq!(set.source(2), &LevelSource::File(PathBuf::from("b.ron")));
        assert_eq!(set.source(3), &LevelSource::Builtin);
        // Level 0 is treated as level 1
        assert_eq!(set.source(0), &LevelSource::Builtin);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let set = LevelSet::from_config(&[dir.path().join("nope.ron")]);
        assert!(matches!(set.load(1), Err(LevelError::Io(_))));
    }

    #[test]
    fn test_embedded_levels_load() {
        let set = LevelSet::from_config(&[]);
        for number in 1..=set.len() as u32 {
            let level = set.load(number).unwrap();
            assert!(level.end_of_map() > 0.0);
        }
    }
}
