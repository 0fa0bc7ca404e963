/// Game configuration, read from a TOML file.
///
/// Every section has defaults, so a partial file (or none at all) is fine.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "SPACE_SHIP_GAME_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "space_ship_game.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Difficulty ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Multiplier on every spawn interval.
    pub fn interval_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 1.4,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 0.7,
        }
    }

    /// Multiplier on meteorite batch size.
    pub fn batch_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum ShieldMode {
    /// Each press-and-release flips the shield.
    #[default]
    Toggle,
    /// Shield stays up only while the key is held.
    Hold,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Steer toward the pointer instead of using the direction keys.
    pub mouse_control: bool,
    /// Treat the fire trigger as permanently held.
    pub always_fire: bool,
    pub shield_mode: ShieldMode,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        ControlsConfig {
            mouse_control: false,
            always_fire: false,
            shield_mode: ShieldMode::Toggle,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frame time.
    pub frame_ms: u64,
    /// World pixels covered by one terminal column.
    pub cell_width: f32,
    /// World pixels covered by one terminal row.
    pub cell_height: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig { frame_ms: 16, cell_width: 10.0, cell_height: 20.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Player-set music volume, 0.0 – 1.0.
    pub music_volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig { enabled: true, music_volume: 0.8 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Score between boss fights.
    pub boss_score_step: u32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        GameplayConfig { boss_score_step: 100 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub controls: ControlsConfig,
    pub display: DisplayConfig,
    pub audio: AudioConfig,
    pub gameplay: GameplayConfig,
    /// Where `RUST_LOG` output goes; the terminal is busy rendering.
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            difficulty: Difficulty::default(),
            controls: ControlsConfig::default(),
            display: DisplayConfig::default(),
            audio: AudioConfig::default(),
            gameplay: GameplayConfig::default(),
            log_file: PathBuf::from("space_ship_game.log"),
        }
    }
}

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Config file location: `$SPACE_SHIP_GAME_CONFIG`, else the default
    /// file name in the working directory.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load from `path` if it exists.  A broken file is replaced by defaults
    /// and handed back alongside them; it never stops the game from starting.
    ///
    /// Nothing is logged here: this runs before the logger, whose target
    /// comes from the config itself.  Pass the result to `report_load` once
    /// logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        if !path.exists() {
            return (GameConfig::default(), None);
        }
        match Self::from_file(path) {
            Ok(config) => (config, None),
            Err(err) => (GameConfig::default(), Some(err)),
        }
    }
}

/// Log how the config at `path` was obtained.
pub fn report_load(path: &Path, fallback: Option<&ConfigError>) {
    match fallback {
        Some(err) => warn!("{}; using defaults", err),
        None if path.exists() => info!("loaded config from {}", path.display()),
        None => info!("no config at {}; using defaults", path.display()),
    }
}
