//! Batch preprocessing pipeline
//!
//! Output directory creation, then segmentation of every discovered input,
//! then (optionally) augmentation of every WAV in the output directory. One
//! invocation runs at a time. A failed invocation never stops its stage. An
//! interrupt during a stage loop stops only that stage; one raised anywhere
//! else aborts the run with [`ResampleError::Interrupted`].

use std::path::{Path, PathBuf};
use log::{debug, info, warn};
use crate::config::ProcessingConfig;
use crate::error::{ResampleError, Result};
use crate::ffmpeg::{CommandRunner, FfmpegCommand, segment_filter_chain};
use crate::processing::{CancelFlag, DiscoveredFile, discover_files};
use crate::processing::output::{
    augmented_path, check_output_dir_available, create_output_dir, segment_pattern,
};

/// Extension scanned for in the output directory by the augmentation stage.
const AUGMENT_SOURCE_EXTENSION: &str = "wav";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StageReport {
    /// Invocations attempted, successful or not.
    pub invoked: usize,
    pub cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub inputs: usize,
    pub segmentation: StageReport,
    /// `None` when augmentation is disabled.
    pub augmentation: Option<StageReport>,
}

#[derive(Debug)]
pub struct Preprocessor<R: CommandRunner> {
    config: ProcessingConfig,
    runner: R,
    cancel: CancelFlag,
}

impl<R: CommandRunner> Preprocessor<R> {
    pub fn new(config: ProcessingConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Runs both stages.
    ///
    /// Fails when the output directory exists or cannot be created, or when an
    /// interrupt arrives outside the stage loops. In dry-run mode the output
    /// directory is only checked, never created.
    pub fn run(&mut self) -> Result<RunSummary> {
        let output_dir = if self.config.dry_run() {
            check_output_dir_available(self.config.output_root(), self.config.sample_rate())?
        } else {
            create_output_dir(self.config.output_root(), self.config.sample_rate())?
        };
        info!("Output: {}", output_dir.display());
        self.check_interrupted()?;

        let inputs = discover_files(self.config.input_root(), self.config.extensions());
        info!("Found {} input files under {}", inputs.len(), self.config.input_root().display());
        self.check_interrupted()?;

        let segmentation = self.segment_all(&inputs, &output_dir);
        if segmentation.cancelled {
            self.cancel.reset();
        }

        let augmentation = if self.config.augment() {
            let sources = augment_sources(&output_dir);
            self.check_interrupted()?;
            Some(self.augment_files(&sources))
        } else {
            None
        };

        Ok(RunSummary {
            output_dir,
            inputs: inputs.len(),
            segmentation,
            augmentation,
        })
    }

    /// Segments, strips silence from, resamples and downmixes every input.
    pub fn segment_all(&mut self, inputs: &[DiscoveredFile], output_dir: &Path) -> StageReport {
        let filters = segment_filter_chain(
            self.config.dynamic_normalize(),
            self.config.silence_threshold_db(),
        );

        let commands: Vec<_> = inputs
            .iter()
            .map(|file| {
                let command = FfmpegCommand::segment(
                    self.config.ffmpeg(),
                    &file.path,
                    &segment_pattern(output_dir, file.index),
                    self.config.segment_length_seconds(),
                    &filters,
                    self.config.sample_rate(),
                );
                (file.file_name(), command)
            })
            .collect();

        self.run_stage("resampling", commands, true)
    }

    /// Writes `aug_<name>` for every WAV currently in `output_dir`.
    ///
    /// The scan does not skip files that are themselves `aug_` outputs.
    pub fn augment_all(&mut self, output_dir: &Path) -> StageReport {
        let sources = augment_sources(output_dir);
        self.augment_files(&sources)
    }

    fn augment_files(&mut self, sources: &[DiscoveredFile]) -> StageReport {
        let commands: Vec<_> = sources
            .iter()
            .map(|file| {
                let command = FfmpegCommand::augment(
                    self.config.ffmpeg(),
                    &file.path,
                    &augmented_path(&file.path),
                    self.config.sample_rate(),
                );
                (file.file_name(), command)
            })
            .collect();

        self.run_stage("augmenting", commands, false)
    }

    fn check_interrupted(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(ResampleError::Interrupted);
        }
        Ok(())
    }

    fn run_stage(&mut self, verb: &str, commands: Vec<(String, FfmpegCommand)>, show_command: bool) -> StageReport {
        let mut report = StageReport::default();

        for (name, command) in commands {
            if self.cancel.is_cancelled() {
                info!("exiting...");
                report.cancelled = true;
                break;
            }

            info!("{} {}", verb, name);
            if show_command {
                info!("{}", command);
            } else {
                debug!("{}", command);
            }

            report.invoked += 1;
            match self.runner.run(&command) {
                Ok(outcome) if !outcome.success() => debug!("{} failed ({:?}), continuing", name, outcome),
                Ok(_) => {}
                Err(e) => warn!("{}: {}", name, e),
            }
        }

        // Raised during the last invocation.
        if !report.cancelled && self.cancel.is_cancelled() {
            info!("exiting...");
            report.cancelled = true;
        }

        report
    }
}

/// Every WAV under `output_dir`, or nothing when it was never created (dry run).
fn augment_sources(output_dir: &Path) -> Vec<DiscoveredFile> {
    if !output_dir.is_dir() {
        debug!("{} does not exist, nothing to augment", output_dir.display());
        return Vec::new();
    }
    discover_files(output_dir, &[AUGMENT_SOURCE_EXTENSION.to_string()])
}
