//! Error taxonomy: configuration failures abort before the terminal is
//! touched, runtime failures abort the loop.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("settings file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read settings file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("setting `{field}` is out of range, got {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("setting `{field}` has unknown color `{value}`")]
    InvalidColor { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("terminal I/O failed")]
    Display(#[from] std::io::Error),

    #[error("input reader thread disconnected")]
    InputChannelClosed,
}
