use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ConfigError;

/// Runtime settings, usually read from a TOML file.
///
/// ```toml
/// pace_ms = 250
/// log_level = "debug"
/// log_file = "avl_steps.log"
/// width = 1600.0
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Delay between two rendered steps, in milliseconds.
    pub pace_ms: u64,
    /// Level for the terminal logger.
    pub log_level: String,
    /// If set, everything down to `debug` is also written here.
    pub log_file: Option<PathBuf>,
    /// Width of the drawing area handed to the layout.
    pub width: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pace_ms: 1000,
            log_level: "warn".to_string(),
            log_file: None,
            width: 1200.0,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn pace(&self) -> Duration {
        Duration::from_millis(self.pace_ms)
    }

    /// The configured terminal log level; unknown names fall back to `warn`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }
}
