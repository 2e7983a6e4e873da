//! Level loading
//!
//! Levels are stored as RON (Rusty Object Notation) and describe the level
//! as named layers of tiles, the same shape a tilemap editor exports:
//!
//! ```ron
//! (
//!     name: "First Steps",
//!     width: 40,
//!     height: 10,
//!     layers: [
//!         (name: "Platforms", use_spatial_hash: true, tiles: [(col: 0, row: 0, run: 40)]),
//!         (name: "Coins", tiles: [(col: 4, row: 2, properties: {"Points": 5.0})]),
//!     ],
//! )
//! ```
//!
//! Supports both compressed (brotli) and uncompressed RON files.
//! Reading auto-detects the format by checking for a valid RON start.

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::Path;

use macroquad::math::{vec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Aabb;
use super::sprite::{
    Sprite, SpriteList, PROP_CHANGE_X, PROP_CHANGE_Y,
};

/// Validation limits to prevent resource exhaustion from malicious files
pub mod limits {
    /// Maximum level width or height in tiles
    pub const MAX_DIMENSION: u32 = 4096;
    /// Maximum layers in a level
    pub const MAX_LAYERS: usize = 32;
    /// Maximum tile entries per layer
    pub const MAX_TILES_PER_LAYER: usize = 65_536;
    /// Maximum run length of a single tile entry
    pub const MAX_RUN: u32 = 4096;
    /// Maximum coordinate value (prevents overflow issues)
    pub const MAX_COORD: f32 = 1_000_000.0;
    /// Smallest tile edge in pixels; spatial hash cells scale with it
    pub const MIN_TILE_SIZE: f32 = 1.0;
    /// Tiles may sit this many tiles outside the level on any side
    pub const MAX_TILE_OFFSET: i64 = MAX_DIMENSION as i64;
}

/// Error type for level loading
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Decompress error: {0}")]
    Decompress(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

// =============================================================================
// Layer names
// =============================================================================

/// Layers the game logic knows about. Any other layer name is kept as
/// decoration and drawn but never collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    Background,
    Platforms,
    MovingPlatforms,
    Ladders,
    Coins,
    DontTouch,
    Foreground,
}

impl LayerKind {
    /// Draw order, back to front
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Background,
        LayerKind::Platforms,
        LayerKind::MovingPlatforms,
        LayerKind::Ladders,
        LayerKind::Coins,
        LayerKind::DontTouch,
        LayerKind::Foreground,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LayerKind::Background => "Background",
            LayerKind::Platforms => "Platforms",
            LayerKind::MovingPlatforms => "Moving Platforms",
            LayerKind::Ladders => "Ladders",
            LayerKind::Coins => "Coins",
            LayerKind::DontTouch => "Don't Touch",
            LayerKind::Foreground => "Foreground",
        }
    }

    pub fn from_name(name: &str) -> Option<LayerKind> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

// =============================================================================
// Serialized form
// =============================================================================

/// A tile entry: one tile, or `run` tiles in a row starting at (col, row).
/// Row 0 is the bottom of the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    pub col: i32,
    pub row: i32,
    #[serde(default = "default_run")]
    pub run: u32,
    /// Size as a fraction of a tile, centered in the cell (coins are 0.5)
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub properties: BTreeMap<String, f32>,
}

fn default_run() -> u32 {
    1
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    pub name: String,
    #[serde(default)]
    pub use_spatial_hash: bool,
    #[serde(default)]
    pub tiles: Vec<TileData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub name: String,
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,
    /// Width in tiles
    pub width: u32,
    /// Height in tiles
    pub height: u32,
    #[serde(default = "default_background")]
    pub background: (u8, u8, u8),
    /// Player start (hitbox center, pixels). Defaults to two tiles in, two tiles up.
    #[serde(default)]
    pub player_start: Option<(f32, f32)>,
    #[serde(default)]
    pub layers: Vec<LayerData>,
}

fn default_tile_size() -> f32 {
    64.0
}

/// Cornflower blue
fn default_background() -> (u8, u8, u8) {
    (100, 149, 237)
}

// =============================================================================
// Runtime level
// =============================================================================

/// A loaded level: layers of sprites ready for collision queries
pub struct Level {
    pub name: String,
    pub tile_size: f32,
    pub width_tiles: u32,
    pub height_tiles: u32,
    pub background: (u8, u8, u8),
    pub player_start: Vec2,
    layers: BTreeMap<LayerKind, SpriteList>,
    /// Layers with names the game doesn't recognise (drawn only)
    pub decorations: Vec<(String, SpriteList)>,
}

impl Level {
    /// Build a level from its serialized form
    pub fn from_data(data: &LevelData) -> Result<Self, LevelError> {
        validate_level(data)?;

        let ts = data.tile_size;
        let mut layers: BTreeMap<LayerKind, SpriteList> = BTreeMap::new();
        let mut decorations = Vec::new();

        for layer in &data.layers {
            let mut list = if layer.use_spatial_hash {
                SpriteList::with_spatial_hash(ts * 2.0)
            } else {
                SpriteList::new()
            };
            for tile in &layer.tiles {
                for i in 0..tile.run {
                    list.push(tile_sprite(tile, i, ts));
                }
            }

            match LayerKind::from_name(&layer.name) {
                Some(LayerKind::MovingPlatforms) if list.uses_spatial_hash() => {
                    return Err(LevelError::Validation(
                        "moving platforms can't use a spatial hash".to_string(),
                    ));
                }
                Some(kind) => {
                    if layers.insert(kind, list).is_some() {
                        return Err(LevelError::Validation(format!(
                            "duplicate layer '{}'",
                            layer.name
                        )));
                    }
                }
                None => {
                    tracing::debug!(layer = %layer.name, "unrecognised layer kept as decoration");
                    decorations.push((layer.name.clone(), list));
                }
            }
        }

        let player_start = data
            .player_start
            .map(|(x, y)| vec2(x, y))
            .unwrap_or_else(|| vec2(ts * 2.0, ts * 2.0));

        Ok(Self {
            name: data.name.clone(),
            tile_size: ts,
            width_tiles: data.width,
            height_tiles: data.height,
            background: data.background,
            player_start,
            layers,
            decorations,
        })
    }

    /// Right edge of the level in pixels; reaching it completes the level
    pub fn end_of_map(&self) -> f32 {
        self.width_tiles as f32 * self.tile_size
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&SpriteList> {
        self.layers.get(&kind)
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> Option<&mut SpriteList> {
        self.layers.get_mut(&kind)
    }

    /// Number of coins still in the level
    pub fn coins_left(&self) -> usize {
        self.layer(LayerKind::Coins).map(|l| l.len()).unwrap_or(0)
    }
}

/// Sprite for the `i`-th tile of a run
fn tile_sprite(tile: &TileData, i: u32, ts: f32) -> Sprite {
    let col = i64::from(tile.col) + i64::from(i);
    let center = vec2(
        col as f32 * ts + ts * 0.5,
        tile.row as f32 * ts + ts * 0.5,
    );
    let size = Vec2::splat(ts * tile.scale);
    let mut sprite = Sprite::new(Aabb::from_center(center, size));
    sprite.properties = tile.properties.clone();
    sprite.velocity = vec2(
        sprite.property(PROP_CHANGE_X).unwrap_or(0.0),
        sprite.property(PROP_CHANGE_Y).unwrap_or(0.0),
    );
    sprite
}

// =============================================================================
// Validation
// =============================================================================

fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

/// Validate a level before building it
pub fn validate_level(data: &LevelData) -> Result<(), LevelError> {
    if !is_valid_float(data.tile_size) || data.tile_size < limits::MIN_TILE_SIZE {
        return Err(LevelError::Validation(format!("invalid tile_size {}", data.tile_size)));
    }
    if data.width == 0 || data.height == 0 {
        return Err(LevelError::Validation("level must be at least 1x1 tiles".to_string()));
    }
    if data.width > limits::MAX_DIMENSION || data.height > limits::MAX_DIMENSION {
        return Err(LevelError::Validation(format!(
            "level too large ({}x{} > {})",
            data.width, data.height, limits::MAX_DIMENSION
        )));
    }
    if data.layers.len() > limits::MAX_LAYERS {
        return Err(LevelError::Validation(format!(
            "too many layers ({} > {})",
            data.layers.len(),
            limits::MAX_LAYERS
        )));
    }
    if let Some((x, y)) = data.player_start {
        if !is_valid_float(x) || !is_valid_float(y) {
            return Err(LevelError::Validation("invalid player_start".to_string()));
        }
    }

    for layer in &data.layers {
        if layer.tiles.len() > limits::MAX_TILES_PER_LAYER {
            return Err(LevelError::Validation(format!(
                "layer '{}': too many tiles ({} > {})",
                layer.name,
                layer.tiles.len(),
                limits::MAX_TILES_PER_LAYER
            )));
        }
        for (i, tile) in layer.tiles.iter().enumerate() {
            let context = format!("layer '{}' tile[{}]", layer.name, i);
            if tile.run == 0 || tile.run > limits::MAX_RUN {
                return Err(LevelError::Validation(format!("{}: invalid run {}", context, tile.run)));
            }
            if !is_valid_float(tile.scale) || tile.scale <= 0.0 {
                return Err(LevelError::Validation(format!("{}: invalid scale {}", context, tile.scale)));
            }
            let first_col = i64::from(tile.col);
            let end_col = first_col + i64::from(tile.run);
            let row = i64::from(tile.row);
            let lowest = -limits::MAX_TILE_OFFSET;
            let max_col = i64::from(data.width) + limits::MAX_TILE_OFFSET;
            let max_row = i64::from(data.height) + limits::MAX_TILE_OFFSET;
            if first_col < lowest || end_col > max_col || row < lowest || row > max_row {
                return Err(LevelError::Validation(format!(
                    "{}: tile at ({}, {}) is too far outside the level",
                    context, tile.col, tile.row
                )));
            }
            let max_x = end_col as f32 * data.tile_size;
            let y = tile.row as f32 * data.tile_size;
            if !is_valid_float(max_x) || !is_valid_float(y) {
                return Err(LevelError::Validation(format!("{}: position out of range", context)));
            }
            for (key, value) in &tile.properties {
                if !value.is_finite() {
                    return Err(LevelError::Validation(format!(
                        "{}: property '{}' is not finite",
                        context, key
                    )));
                }
            }
        }
    }

    Ok(())
}

// =============================================================================
// Loading
// =============================================================================

/// Decode level bytes: plain RON text or brotli-compressed RON
pub fn decode_level_bytes(bytes: &[u8]) -> Result<String, LevelError> {
    // RON files start with '(' or whitespace, brotli is binary
    let is_plain_ron = bytes
        .first()
        .map(|&b| b == b'(' || b == b' ' || b == b'\n' || b == b'\r' || b == b'\t' || b == b'/')
        .unwrap_or(false);

    if is_plain_ron {
        String::from_utf8(bytes.to_vec())
            .map_err(|e| LevelError::Decompress(format!("invalid UTF-8: {}", e)))
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut decompressed)
            .map_err(|e| LevelError::Decompress(format!("brotli decompression failed: {}", e)))?;
        String::from_utf8(decompressed)
            .map_err(|e| LevelError::Decompress(format!("invalid UTF-8 after decompression: {}", e)))
    }
}

/// Load a level from RON text (for embedded levels or testing)
pub fn load_level_from_str(s: &str) -> Result<Level, LevelError> {
    let data: LevelData = ron::from_str(s)?;
    Level::from_data(&data)
}

/// Load a level from raw file bytes (plain or compressed)
pub fn load_level_from_bytes(bytes: &[u8]) -> Result<Level, LevelError> {
    let contents = decode_level_bytes(bytes)?;
    load_level_from_str(&contents)
}

/// Load a level from a RON file (supports both compressed and uncompressed)
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<Level, LevelError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let level = load_level_from_bytes(&bytes).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "failed to load level");
        e
    })?;
    tracing::info!(path = %path.display(), name = %level.name, "loaded level");
    Ok(level)
}
