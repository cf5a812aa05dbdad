//! ffmpeg Backend Module

pub mod command;
pub mod runner;

pub use command::{FfmpegCommand, CommandKind, segment_filter_chain, augment_filter_chain};
pub use runner::{CommandRunner, ProcessRunner, DryRunRunner, RunOutcome};
