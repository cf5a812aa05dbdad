//! Execution of ffmpeg invocations

use std::process::{ExitStatus, Stdio};
use log::debug;
use crate::error::{ResampleError, Result};
use super::FfmpegCommand;

/// Result of one finished invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Process ran to completion; `None` when it was killed by a signal.
    Exited(Option<i32>),
    /// Nothing was spawned.
    Skipped,
}

impl RunOutcome {
    pub fn from_status(status: ExitStatus) -> Self {
        Self::Exited(status.code())
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(Some(0)) | Self::Skipped)
    }
}

/// Runs one invocation to completion.
///
/// Implementations block until the invocation finishes. `Err` means the
/// invocation could not be started at all.
pub trait CommandRunner {
    fn run(&mut self, command: &FfmpegCommand) -> Result<RunOutcome>;
}

/// Spawns the real ffmpeg process and waits for it.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&mut self, command: &FfmpegCommand) -> Result<RunOutcome> {
        // Detached stdin: an overwrite prompt reads EOF instead of hanging.
        let status = command
            .to_process()
            .stdin(Stdio::null())
            .status()
            .map_err(|e| ResampleError::spawn(command.program().display().to_string(), e))?;

        debug!("{} exited with {}", command.program().display(), status);
        Ok(RunOutcome::from_status(status))
    }
}

/// Logs invocations instead of running them.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    invocations: usize,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invocations(&self) -> usize {
        self.invocations
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&mut self, command: &FfmpegCommand) -> Result<RunOutcome> {
        self.invocations += 1;
        debug!("dry run, not executing: {}", command);
        Ok(RunOutcome::Skipped)
    }
}
