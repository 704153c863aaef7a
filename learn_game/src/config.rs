use crate::error::{Error, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Training and evaluation settings, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub learning_rate: f64,
    pub exploration_rate: f64,
    /// Value of a position still in play that has never been backed up.
    pub initial_value: f64,
    pub draw_value: f64,
    pub rounds: usize,
    pub episodes_per_round: usize,
    pub demo_episodes: usize,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            learning_rate: 0.5,
            exploration_rate: 0.1,
            initial_value: 0.5,
            draw_value: 0.5,
            rounds: 10,
            episodes_per_round: 3000,
            demo_episodes: 3000,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::invalid_config("learning_rate must be in (0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.exploration_rate) {
            return Err(Error::invalid_config("exploration_rate must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.initial_value) {
            return Err(Error::invalid_config("initial_value must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.draw_value) {
            return Err(Error::invalid_config("draw_value must be in [0, 1]"));
        }
        if self.episodes_per_round == 0 {
            return Err(Error::invalid_config("episodes_per_round must be > 0"));
        }
        Ok(())
    }
}
