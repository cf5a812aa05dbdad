//! udls-resample - Audio Dataset Preprocessing Library
//!
//! Turns a directory of audio files into silence-stripped, resampled mono WAV
//! segments by driving ffmpeg, with an optional compression and loudness
//! augmentation pass.

pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod processing;

pub use config::{ProcessingConfig, Args};
pub use error::{ResampleError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// `debug` when verbose, `info` otherwise; `RUST_LOG` still wins when set.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_info() {
        let info = get_library_info();
        assert_eq!(info.name, "udls-resample");
        assert!(info.to_string().starts_with("udls-resample v"));
    }
}
