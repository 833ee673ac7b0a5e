//! Error types for treeline.
//!
//! Only configuration problems are meant to reach the caller. Unreadable directories are
//! absorbed by the assembler (see [crate::core::branch]) and icon or status lookups fall back
//! to defaults, so neither shows up here during normal tree building.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TreeError {
    /// An unrecognized sort mode was requested.
    #[error("invalid sort mode \"{value}\" (expected one of: {expected})")]
    Configuration { value: String, expected: &'static str },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config file exists but could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
}

impl TreeError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        TreeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;
