use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod game;
pub mod spawning;

pub use game::*;
pub use spawning::*;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub playfield: PlayfieldConfig,
    pub spawner: SpawnerConfig,
    pub frame_loop: FrameLoopConfig,
    pub session: SessionConfig,
    pub display: DisplayConfig,
    pub random: RandomConfig,
}

impl SimulationConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;

        let config = Self::from_toml_str(&content)
            .with_context(|| format!("loading {}", path.display()))?;

        Ok(config)
    }

    /// Falls back to the built-in defaults when `path` does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::info!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;

        // Validate configurations
        config.validate()?;

        Ok(config)
    }
}

impl Validate for SimulationConfig {
    fn validate(&self) -> Result<()> {
        self.playfield.validate()?;
        self.spawner.validate()?;
        self.frame_loop.validate()?;
        self.session.validate()?;
        self.display.validate()?;
        Ok(())
    }
}

pub trait Validate {
    fn validate(&self) -> Result<()>;
}
