use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How many falling particles of each kind one scheduler tick adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnBatch {
    pub trees: u32,
    pub stars: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub interval_ms: u64,
    /// Elapsed time below which a run spawns the `intense` batch.
    pub intense_threshold_ms: u64,
    pub intense: SpawnBatch,
    pub tapered: SpawnBatch,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            interval_ms: 120,
            intense_threshold_ms: 2800,
            intense: SpawnBatch { trees: 3, stars: 4 },
            tapered: SpawnBatch { trees: 1, stars: 2 },
        }
    }
}

impl SpawnConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn intense_threshold(&self) -> Duration {
        Duration::from_millis(self.intense_threshold_ms)
    }
}

/// What one card trigger does: a confetti burst followed by a falling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub burst: u32,
    pub fall_duration_ms: u64,
}

impl TriggerConfig {
    pub fn open() -> Self {
        Self {
            burst: 900,
            fall_duration_ms: 11_000,
        }
    }

    pub fn replay() -> Self {
        Self {
            burst: 650,
            fall_duration_ms: 8_000,
        }
    }

    pub fn fall_duration(&self) -> Duration {
        Duration::from_millis(self.fall_duration_ms)
    }
}

fn default_open() -> TriggerConfig {
    TriggerConfig::open()
}

fn default_replay() -> TriggerConfig {
    TriggerConfig::replay()
}

fn default_fade_frames() -> u32 {
    170
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed RNG seed. Unset means a fresh entropy seed per engine.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Particles fade over their last `fade_frames` frames of life.
    #[serde(default = "default_fade_frames")]
    pub fade_frames: u32,
    #[serde(default)]
    pub spawn: SpawnConfig,
    #[serde(default = "default_open")]
    pub open: TriggerConfig,
    #[serde(default = "default_replay")]
    pub replay: TriggerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            fade_frames: default_fade_frames(),
            spawn: SpawnConfig::default(),
            open: TriggerConfig::open(),
            replay: TriggerConfig::replay(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn.interval_ms == 0 {
            return Err(ConfigError::Invalid("spawn.interval_ms must be positive".into()));
        }
        if self.fade_frames == 0 {
            return Err(ConfigError::Invalid("fade_frames must be positive".into()));
        }
        Ok(())
    }
}
