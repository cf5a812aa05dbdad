//! Structured ffmpeg invocations
//!
//! Every invocation is an argument vector handed straight to the process
//! spawner. Nothing passes through a shell, so paths may contain spaces,
//! quotes or other metacharacters.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};

/// ffmpeg's own console output is suppressed for every invocation.
const QUIET_ARGS: [&str; 3] = ["-loglevel", "panic", "-hide_banner"];

/// Silent spans inside the file are removed without a count limit.
pub const SILENCE_STOP_PERIODS: i32 = -1;

/// Minimum silent span (seconds) removed by the silence filter.
pub const SILENCE_STOP_DURATION: u32 = 1;

/// 3:1 compression above -15 dB.
pub const COMPAND_POINTS: &str = "-80/-80|-15/-15|0/-10.8|20/-5.2";

/// Attack/release delay of the compressor, in seconds.
pub const COMPAND_DELAY: &str = "0.1";

pub const DYNAUDNORM: &str = "dynaudnorm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Split, strip silence, resample and downmix one input file.
    Segment,
    /// Compress and renormalize one already-produced WAV file.
    Augment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FfmpegCommand {
    program: PathBuf,
    kind: CommandKind,
    input: PathBuf,
    output: PathBuf,
    args: Vec<OsString>,
}

impl FfmpegCommand {
    /// Builds the segmentation invocation.
    ///
    /// `output_pattern` carries ffmpeg's `%05d` placeholder for the segment index.
    pub fn segment(
        program: &Path,
        input: &Path,
        output_pattern: &Path,
        segment_seconds: f64,
        filters: &str,
        sample_rate: u32,
    ) -> Self {
        let mut args: Vec<OsString> = QUIET_ARGS.iter().map(OsString::from).collect();
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.push("-f".into());
        args.push("segment".into());
        args.push("-segment_time".into());
        args.push(segment_seconds.to_string().into());
        args.push("-af".into());
        args.push(filters.into());
        push_output_format(&mut args, sample_rate);
        args.push(output_pattern.as_os_str().to_owned());

        Self {
            program: program.to_path_buf(),
            kind: CommandKind::Segment,
            input: input.to_path_buf(),
            output: output_pattern.to_path_buf(),
            args,
        }
    }

    /// Builds the compress-and-normalize invocation.
    pub fn augment(program: &Path, input: &Path, output: &Path, sample_rate: u32) -> Self {
        let mut args: Vec<OsString> = QUIET_ARGS.iter().map(OsString::from).collect();
        args.push("-i".into());
        args.push(input.as_os_str().to_owned());
        args.push("-filter_complex".into());
        args.push(augment_filter_chain().into());
        push_output_format(&mut args, sample_rate);
        args.push(output.as_os_str().to_owned());

        Self {
            program: program.to_path_buf(),
            kind: CommandKind::Augment,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Output file, or the segment naming pattern for [`CommandKind::Segment`].
    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Value following `flag` in the argument vector, if present.
    pub fn arg_value(&self, flag: &str) -> Option<&OsString> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
    }

    pub fn to_process(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

/// Shell-like rendering, for logs only.
impl fmt::Display for FfmpegCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program.to_string_lossy()))?;
        for arg in &self.args {
            write!(f, " {}", quote(&arg.to_string_lossy()))?;
        }
        Ok(())
    }
}

fn push_output_format(args: &mut Vec<OsString>, sample_rate: u32) {
    args.push("-ar".into());
    args.push(sample_rate.to_string().into());
    args.push("-ac".into());
    args.push("1".into());
}

fn quote(s: &str) -> String {
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || "\"'|\\$`;&<>()*?".contains(c)) {
        return s.to_string();
    }
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

pub fn silence_filter(threshold_db: f64) -> String {
    format!(
        "silenceremove=stop_periods={}:stop_duration={}:stop_threshold={}dB",
        SILENCE_STOP_PERIODS, SILENCE_STOP_DURATION, threshold_db
    )
}

/// Audio filter chain for segmentation; normalization runs before silence removal.
pub fn segment_filter_chain(dynamic_normalize: bool, threshold_db: f64) -> String {
    if dynamic_normalize {
        format!("{},{}", DYNAUDNORM, silence_filter(threshold_db))
    } else {
        silence_filter(threshold_db)
    }
}

pub fn augment_filter_chain() -> String {
    format!("compand=points={}:delay={},{}", COMPAND_POINTS, COMPAND_DELAY, DYNAUDNORM)
}
