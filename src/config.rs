//! Game Configuration
//!
//! All tunables (screen size, speeds, gravity, scoring rules) live in one
//! immutable `GameConfig` that is loaded once at startup and passed into
//! setup. Stored as RON; any field missing from the file keeps its default.
//!
//! Lookup order:
//! 1. `$SIDESCROLLER_CONFIG`
//! 2. `./sidescroller.ron`
//! 3. `<platform config dir>/sidescroller/config.ron` (native only)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SIDESCROLLER_CONFIG";

/// Config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "sidescroller.ron";

/// Error type for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// FPS limit setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FpsLimit {
    /// 30 FPS
    Fps30,
    /// 60 FPS (the physics constants are tuned for this)
    #[default]
    Fps60,
    /// Unlocked (as fast as possible)
    Unlocked,
}

impl FpsLimit {
    /// Get the target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        match self {
            FpsLimit::Fps30 => Some(1.0 / 30.0),
            FpsLimit::Fps60 => Some(1.0 / 60.0),
            FpsLimit::Unlocked => None,
        }
    }
}

/// How the player is kept inside the world after each physics step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundsMode {
    /// Scrolling world: only the world origin is enforced (left >= 0).
    /// Right/bottom limits come from level geometry and the fall-off check.
    Scrolling,
    /// Single-screen world: the hitbox stays fully on screen.
    Screen { width: f32, height: f32 },
}

impl Default for BoundsMode {
    fn default() -> Self {
        BoundsMode::Scrolling
    }
}

/// Optional sound effects played on game events.
/// A configured path that fails to load is a fatal setup error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundPaths {
    pub coin: Option<String>,
    pub jump: Option<String>,
    pub game_over: Option<String>,
}

/// Immutable game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub window_title: String,

    /// Horizontal walk speed and ladder climb speed (pixels per frame)
    pub movement_speed: f32,
    /// Initial upward velocity of a jump (pixels per frame)
    pub jump_speed: f32,
    /// Subtracted from vertical velocity every frame while off a ladder
    pub gravity: f32,
    /// Distance the hitbox is nudged down/left/right when testing for a jump
    pub jump_probe_distance: f32,

    /// Player hitbox size (pixels)
    pub player_width: f32,
    pub player_height: f32,

    pub bounds: BoundsMode,

    /// Falling below this y triggers game over
    pub fall_threshold: f32,
    pub starting_lives: u32,
    /// Score for a coin without a `Points` property
    pub default_coin_points: u32,

    /// Camera lerp factor per frame (None = snap to target)
    pub camera_smoothing: Option<f32>,

    /// Number of frame durations averaged by the FPS counter
    pub fps_window: usize,
    pub fps_limit: FpsLimit,

    /// Level files to play in order. Empty = levels embedded at build time.
    pub level_files: Vec<PathBuf>,

    pub sounds: SoundPaths,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: 1000.0,
            screen_height: 650.0,
            window_title: "Platformer".to_string(),
            movement_speed: 5.0,
            jump_speed: 20.0,
            gravity: 1.0,
            jump_probe_distance: 5.0,
            player_width: 44.0,
            player_height: 92.0,
            bounds: BoundsMode::Scrolling,
            fall_threshold: -100.0,
            starting_lives: 5,
            default_coin_points: 1,
            camera_smoothing: Some(0.2),
            fps_window: crate::game::fps::DEFAULT_FPS_WINDOW,
            fps_limit: FpsLimit::Fps60,
            level_files: Vec::new(),
            sounds: SoundPaths::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from a RON string and validate it
    pub fn from_ron_str(s: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: GameConfig = ron::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&contents, path)
    }

    /// Load the first config found in the lookup order, or defaults.
    /// A file that exists but can't be parsed is an error, not a fallback.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        for path in Self::search_paths() {
            if path.is_file() {
                tracing::info!(path = %path.display(), "loading config");
                return Self::load(&path);
            }
        }
        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            paths.push(PathBuf::from(explicit));
        }
        paths.push(PathBuf::from(LOCAL_CONFIG_FILE));
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sidescroller").join("config.ron"));
        }
        paths
    }

    /// Serialize to pretty RON (logged at startup, or as a starter file)
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        ron::ser::to_string_pretty(self, pretty)
    }

    /// Reject values that would break the update loop
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{} must be > 0, got {}", name, value)));
            }
        }

        let non_negative = [
            ("movement_speed", self.movement_speed),
            ("jump_speed", self.jump_speed),
            ("gravity", self.gravity),
            ("jump_probe_distance", self.jump_probe_distance),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!("{} must be >= 0, got {}", name, value)));
            }
        }

        if !self.fall_threshold.is_finite() {
            return Err(ConfigError::Invalid("fall_threshold must be finite".to_string()));
        }
        if let Some(factor) = self.camera_smoothing {
            if !(factor > 0.0 && factor <= 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "camera_smoothing must be in (0, 1], got {}",
                    factor
                )));
            }
        }
        if self.fps_window == 0 {
            return Err(ConfigError::Invalid("fps_window must be at least 1".to_string()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".to_string()));
        }
        if let BoundsMode::Screen { width, height } = self.bounds {
            if width < self.player_width + 1.0 || height < self.player_height + 1.0 {
                return Err(ConfigError::Invalid("screen bounds smaller than the player".to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.movement_speed, 5.0);
        assert_eq!(config.fall_threshold, -100.0);
        assert_eq!(config.fps_window, 60);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = GameConfig::from_ron_str(
            "(movement_speed: 7.0, gravity: 1.5, jump_speed: 30.0)",
            Path::new("inline"),
        )
        .unwrap();
        assert_eq!(config.movement_speed, 7.0);
        assert_eq!(config.gravity, 1.5);
        assert_eq!(config.jump_speed, 30.0);
        assert_eq!(config.starting_lives, 5);
        assert_eq!(config.bounds, BoundsMode::Scrolling);
    }

    #[test]
    fn test_round_trip() {
        let mut config = GameConfig::default();
        config.bounds = BoundsMode::Screen { width: 800.0, height: 600.0 };
        config.camera_smoothing = None;
        config.sounds.coin = Some("assets/sounds/coin.wav".to_string());

        let text = config.to_ron_string().unwrap();
        let parsed = GameConfig::from_ron_str(&text, Path::new("inline")).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_ron_str("(fps_window: 0)", Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameConfig::from_ron_str("(camera_smoothing: Some(1.5))", Path::new("inline"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = GameConfig::from_ron_str("(gravity: -1.0)", Path::new("inline")).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = GameConfig::from_ron_str("(movement_speed: ", Path::new("broken.ron")).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, PathBuf::from("broken.ron")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(starting_lives: 3, fps_limit: Fps30)").unwrap();

        let config = GameConfig::load(file.path()).unwrap();
        assert_eq!(config.starting_lives, 3);
        assert_eq!(config.fps_limit, FpsLimit::Fps30);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GameConfig::load(dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_fps_limit_frame_time() {
        assert_eq!(FpsLimit::Fps30.frame_time(), Some(1.0 / 30.0));
        assert_eq!(FpsLimit::Unlocked.frame_time(), None);
    }
}
