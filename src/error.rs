//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum ResampleError {
    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output directory already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    #[error("Interrupted")]
    Interrupted,

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl ResampleError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }
    pub fn output_exists<P: Into<PathBuf>>(path: P) -> Self { Self::OutputExists { path: path.into() } }
    pub fn spawn<S: Into<String>>(program: S, source: std::io::Error) -> Self {
        Self::Spawn { program: program.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, ResampleError>;

impl From<toml::de::Error> for ResampleError {
    fn from(err: toml::de::Error) -> Self { Self::config(format!("Failed to parse config file: {}", err)) }
}

impl From<toml::ser::Error> for ResampleError {
    fn from(err: toml::ser::Error) -> Self { Self::config(format!("Failed to serialize config: {}", err)) }
}
