//! udls-resample - Audio Dataset Preprocessor

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;
use std::process;
use udls_resample::ffmpeg::{CommandRunner, DryRunRunner, ProcessRunner};
use udls_resample::processing::{CancelFlag, Preprocessor, RunSummary};
use udls_resample::{init_logging, Args, ProcessingConfig, ResampleError};

/// Conventional status for a run stopped by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

fn main() {
    let args = Args::parse();
    let write_config = args.write_config.clone();

    // Resolved first so a config-file `verbose` also raises the log level.
    let config = match ProcessingConfig::from_args_and_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    init_logging(config.verbose());

    if let Err(e) = run(config, write_config) {
        eprintln!("Error: {:#}", e);
        let interrupted = matches!(e.downcast_ref::<ResampleError>(), Some(ResampleError::Interrupted));
        process::exit(if interrupted { INTERRUPTED_EXIT_CODE } else { 1 });
    }
}

fn run(config: ProcessingConfig, write_config: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = write_config {
        config
            .save_to_file(&path)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    if config.verbose() {
        info!("{}", udls_resample::get_library_info());
    }

    let cancel = CancelFlag::new();
    cancel
        .install_ctrlc_handler()
        .context("Failed to install Ctrl+C handler")?;

    let summary = if config.dry_run() {
        process_with(config, DryRunRunner::new(), cancel)?
    } else {
        process_with(config, ProcessRunner::new(), cancel)?
    };

    debug!(
        "Done: {} inputs, {} segment invocations, {} augment invocations",
        summary.inputs,
        summary.segmentation.invoked,
        summary.augmentation.map(|r| r.invoked).unwrap_or(0)
    );
    Ok(())
}

fn process_with<R: CommandRunner>(config: ProcessingConfig, runner: R, cancel: CancelFlag) -> anyhow::Result<RunSummary> {
    let mut preprocessor = Preprocessor::new(config, runner).with_cancel_flag(cancel);
    let summary = preprocessor.run().context("Preprocessing aborted")?;
    Ok(summary)
}
