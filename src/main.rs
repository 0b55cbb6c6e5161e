//! romrenamer - Batch ROM renamer and archive extractor for Nintendo 3DS ROM sets
//!
//! Main entry point for the console host.
//!
//! # Overview
//!
//! This binary crate is the console surface around the pipeline. It
//! initializes:
//! - Logging infrastructure (rotating file log + console output)
//! - Tokio runtime (the pipeline runs as one blocking unit on a worker)
//! - The single-slot run guard
//! - The pipeline itself ([`RomRenamer`] with a [`ConsoleSink`])
//!
//! The pipeline performs no internal parallelism and blocks for the duration
//! of the run; dispatching it onto a blocking worker keeps the pattern every
//! host is expected to follow - one dedicated background execution context,
//! one run at a time.
//!
//! # Usage
//!
//! ```text
//! romrenamer <directory>
//! ```
//!
//! The directory is the only input; run narration goes to stdout, diagnostics
//! to `logs/` (level via `RUST_LOG`).

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use romrenamer::run_guard::RunGuard;
use romrenamer::{APP_NAME, ConsoleSink, RomRenamer, VERSION};

fn main() -> Result<()> {
    // Setup logging with both file and console output; the guard must live
    // until exit
    let _log_guard = romrenamer::logging::setup_logging("logs", "romrenamer", false)?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let directory = std::env::args()
        .nth(1)
        .with_context(|| format!("usage: {APP_NAME} <directory>"))?;
    let directory = Utf8PathBuf::from(directory);

    // Create tokio runtime; the whole run executes as one blocking task
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("romrenamer-worker")
        .build()?;

    // One run at a time; a resident host would hold the permit while its
    // worker is busy
    let run_guard = RunGuard::new();
    let Some(_permit) = run_guard.try_acquire() else {
        bail!("another run is already active");
    };

    let mut pipeline = RomRenamer::new(&directory, ConsoleSink)?;
    tracing::info!("Processing {}", pipeline.directory());

    let worker = runtime.spawn_blocking(move || pipeline.run());
    let stats = runtime
        .block_on(worker)
        .context("pipeline worker panicked")??;

    tracing::info!("Run finished: {}", stats.summary());

    if stats.has_errors() {
        tracing::warn!("{} item(s) failed; see the log above", stats.errors);
    }

    Ok(())
}
