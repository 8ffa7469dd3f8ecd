use std::fs::File;

use simplelog::{ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use crate::config::Config;

/// Sets up the global logger: the terminal gets `config.log_level`, and when
/// `config.log_file` is set, that file gets everything down to `debug`.
///
/// Fails if the log file cannot be created or a logger is already installed.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(config.level_filter(), LogConfig::default(), TerminalMode::Stderr, ColorChoice::Auto),
    ];
    if let Some(path) = &config.log_file {
        loggers.push(WriteLogger::new(LevelFilter::Debug, LogConfig::default(), File::create(path)?));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}
