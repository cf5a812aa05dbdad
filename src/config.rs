//! Configuration management for dataset preprocessing

use crate::error::{ResampleError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions picked up by discovery when none are given.
pub const DEFAULT_EXTENSIONS: [&str; 7] = ["wav", "mp3", "opus", "ogg", "aif", "aiff", "flac"];

/// Resolved once at startup, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub paths: PathsConfig,
    pub audio: AudioConfig,
    pub stages: StageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub ffmpeg: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub extensions: Vec<String>,
    pub sample_rate: u32,
    pub segment_length_seconds: f64,
    pub silence_threshold_db: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub augment: bool,
    pub dynamic_normalize: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            audio: AudioConfig::default(),
            stages: StageConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output: PathBuf::from("."),
            ffmpeg: PathBuf::from("ffmpeg"),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            sample_rate: 44100,
            segment_length_seconds: 600.0,
            silence_threshold_db: -60.0,
        }
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            augment: false,
            dynamic_normalize: false,
            dry_run: false,
            verbose: false,
        }
    }
}

impl ProcessingConfig {
    pub fn input_root(&self) -> &Path {
        &self.paths.input
    }

    pub fn output_root(&self) -> &Path {
        &self.paths.output
    }

    pub fn ffmpeg(&self) -> &Path {
        &self.paths.ffmpeg
    }

    pub fn extensions(&self) -> &[String] {
        &self.audio.extensions
    }

    pub fn sample_rate(&self) -> u32 {
        self.audio.sample_rate
    }

    pub fn segment_length_seconds(&self) -> f64 {
        self.audio.segment_length_seconds
    }

    pub fn silence_threshold_db(&self) -> f64 {
        self.audio.silence_threshold_db
    }

    pub fn augment(&self) -> bool {
        self.stages.augment
    }

    pub fn dynamic_normalize(&self) -> bool {
        self.stages.dynamic_normalize
    }

    pub fn dry_run(&self) -> bool {
        self.stages.dry_run
    }

    pub fn verbose(&self) -> bool {
        self.stages.verbose
    }

    /// `output_root/out_{sample_rate}`
    pub fn output_dir(&self) -> PathBuf {
        self.paths.output.join(format!("out_{}", self.audio.sample_rate))
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "resample", about = "Audio dataset preprocessing", version)]
pub struct Args {
    #[arg(long = "ext", num_args = 1.., help = "Input dataset formats [default: wav mp3 opus ogg aif aiff flac]")]
    pub ext: Option<Vec<String>>,

    #[arg(long = "sr", help = "Target sampling rate (Hz) [default: 44100]")]
    pub sr: Option<u32>,

    #[arg(long = "output", help = "Output directory location [default: .]")]
    pub output: Option<PathBuf>,

    #[arg(long = "input", help = "Input directory location [default: .]")]
    pub input: Option<PathBuf>,

    #[arg(long = "len", allow_negative_numbers = true, help = "Length (in seconds) of target audio segments [default: 600]")]
    pub len: Option<f64>,

    #[arg(long = "augment", help = "Write a compressed and normalized copy of every output file")]
    pub augment: bool,

    #[arg(
        long = "dynaudnorm",
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Dynamic audio normalization before silence removal [default: false]"
    )]
    pub dynaudnorm: Option<bool>,

    #[arg(long = "stopthreshold", allow_negative_numbers = true, help = "Silence gate threshold in dB [default: -60]")]
    pub stopthreshold: Option<f64>,

    #[arg(long = "ffmpeg", help = "ffmpeg executable [default: ffmpeg]")]
    pub ffmpeg: Option<PathBuf>,

    #[arg(long = "dry-run", help = "Log every ffmpeg invocation without running it")]
    pub dry_run: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "write-config", help = "Write the resolved configuration to a TOML file and exit")]
    pub write_config: Option<PathBuf>,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,
}

impl ProcessingConfig {
    /// Create config from command line arguments and config file.
    ///
    /// Built-in defaults are overridden by the config file, which is in turn
    /// overridden by every flag given explicitly on the command line.
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        if let Some(ext) = args.ext {
            config.audio.extensions = ext;
        }
        if let Some(sr) = args.sr {
            config.audio.sample_rate = sr;
        }
        if let Some(output) = args.output {
            config.paths.output = output;
        }
        if let Some(input) = args.input {
            config.paths.input = input;
        }
        if let Some(len) = args.len {
            config.audio.segment_length_seconds = len;
        }
        if let Some(threshold) = args.stopthreshold {
            config.audio.silence_threshold_db = threshold;
        }
        if let Some(dynaudnorm) = args.dynaudnorm {
            config.stages.dynamic_normalize = dynaudnorm;
        }
        if let Some(ffmpeg) = args.ffmpeg {
            config.paths.ffmpeg = ffmpeg;
        }
        config.stages.augment |= args.augment;
        config.stages.dry_run |= args.dry_run;
        config.stages.verbose |= args.verbose;

        config.audio.extensions = normalize_extensions(config.audio.extensions);
        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ResampleError::config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    /// Save config to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        std::fs::write(path, content)
            .map_err(|e| ResampleError::config(format!("Failed to write config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(ResampleError::config("Sample rate must be greater than 0"));
        }

        let len = self.audio.segment_length_seconds;
        if !len.is_finite() || len <= 0.0 {
            return Err(ResampleError::config("Segment length must be a positive number of seconds"));
        }

        if !self.audio.silence_threshold_db.is_finite() {
            return Err(ResampleError::config("Silence threshold must be a finite dB value"));
        }

        if self.audio.extensions.is_empty() {
            return Err(ResampleError::config("At least one input extension is required"));
        }

        Ok(())
    }
}

/// Strips leading dots and drops empty or repeated entries, keeping first-seen order.
fn normalize_extensions(extensions: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(extensions.len());
    for ext in extensions {
        let ext = ext.trim().trim_start_matches('.').to_string();
        if !ext.is_empty() && !out.contains(&ext) {
            out.push(ext);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("resample").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ProcessingConfig::from_args_and_config(parse(&[])).unwrap();
        assert_eq!(config, ProcessingConfig::default());
        assert_eq!(config.sample_rate(), 44100);
        assert_eq!(config.segment_length_seconds(), 600.0);
        assert_eq!(config.silence_threshold_db(), -60.0);
        assert_eq!(config.extensions(), DEFAULT_EXTENSIONS);
        assert_eq!(config.input_root(), Path::new("."));
        assert_eq!(config.output_root(), Path::new("."));
        assert!(!config.augment());
        assert!(!config.dynamic_normalize());
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--ext", "wav", "flac",
            "--sr", "22050",
            "--output", "/tmp/out",
            "--input", "/tmp/in",
            "--len", "30",
            "--augment",
            "--dynaudnorm",
            "--stopthreshold", "-45",
        ]);
        let config = ProcessingConfig::from_args_and_config(args).unwrap();

        assert_eq!(config.extensions(), ["wav", "flac"]);
        assert_eq!(config.sample_rate(), 22050);
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/out/out_22050"));
        assert_eq!(config.input_root(), Path::new("/tmp/in"));
        assert_eq!(config.segment_length_seconds(), 30.0);
        assert_eq!(config.silence_threshold_db(), -45.0);
        assert!(config.augment());
        assert!(config.dynamic_normalize());
    }

    #[test]
    fn test_dynaudnorm_explicit_value() {
        let config = ProcessingConfig::from_args_and_config(parse(&["--dynaudnorm", "false"])).unwrap();
        assert!(!config.dynamic_normalize());

        let config = ProcessingConfig::from_args_and_config(parse(&["--dynaudnorm", "true"])).unwrap();
        assert!(config.dynamic_normalize());
    }

    #[test]
    fn test_invalid_types_rejected_by_parser() {
        assert!(Args::try_parse_from(["resample", "--sr", "fast"]).is_err());
        assert!(Args::try_parse_from(["resample", "--len", "ten"]).is_err());
        assert!(Args::try_parse_from(["resample", "--dynaudnorm", "maybe"]).is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ProcessingConfig::default();
        assert!(config.validate().is_ok());

        config.audio.sample_rate = 0;
        assert!(config.validate().is_err());
        config.audio.sample_rate = 16000;

        config.audio.segment_length_seconds = 0.0;
        assert!(config.validate().is_err());
        config.audio.segment_length_seconds = f64::NAN;
        assert!(config.validate().is_err());
        config.audio.segment_length_seconds = 10.0;

        config.audio.silence_threshold_db = f64::NEG_INFINITY;
        assert!(config.validate().is_err());
        config.audio.silence_threshold_db = -30.0;

        config.audio.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extension_normalization() {
        let exts = normalize_extensions(vec![".wav".into(), "wav".into(), " mp3 ".into(), "".into()]);
        assert_eq!(exts, ["wav", "mp3"]);
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = ProcessingConfig::default();
        config.audio.sample_rate = 16000;
        config.stages.augment = true;

        assert!(config.save_to_file(&config_path).is_ok());
        assert!(config_path.exists());

        let loaded = ProcessingConfig::from_file(&config_path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_partial_config_file_and_flag_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[audio]\nsample_rate = 16000\nsegment_length_seconds = 5.0\n").unwrap();

        let path = config_path.to_str().unwrap();
        let config = ProcessingConfig::from_args_and_config(parse(&["-c", path, "--len", "8"])).unwrap();

        assert_eq!(config.sample_rate(), 16000);
        assert_eq!(config.segment_length_seconds(), 8.0);
        assert_eq!(config.silence_threshold_db(), -60.0);
    }

    #[test]
    fn test_malformed_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[audio\nsample_rate = ").unwrap();

        let err = ProcessingConfig::from_file(&config_path).unwrap_err();
        assert!(matches!(err, ResampleError::Config { .. }));
    }
}
