//! Configuration error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading crosslink.toml.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, io::Error),

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
