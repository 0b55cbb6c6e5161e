//! Services module - Pure business logic for the ROM-processing pipeline.
//!
//! This module contains all the core logic for classifying, extracting,
//! renaming and backing up a directory of ROM and archive files. The services
//! are **framework-agnostic** and have no dependencies on any host surface,
//! making them testable and reusable.
//!
//! # Components
//!
//! - [`classifier`]: Single-level directory scan partitioning files into ROM
//!   and archive sets by case-insensitive extension
//! - [`extractor`]: Per-archive scratch-directory extraction (zip/7z/rar) with
//!   recursive ROM harvest and guaranteed scratch cleanup
//! - [`renamer`]: Canonical-extension rename that never overwrites
//! - [`archiver`]: Backup relocation with collision-safe naming
//! - [`fs_utils`]: The shared collision-suffix rule and move helper
//! - [`pipeline`]: The [`RomRenamer`] orchestrator sequencing the above and
//!   owning the run counters
//!
//! # Design Philosophy
//!
//! - **Blocking**: The pipeline is one uninterrupted, logically
//!   single-threaded unit of work; hosts dispatch it onto a worker
//! - **Partial-failure**: Errors are local to the item being processed and
//!   never abort the run
//! - **Observable**: Every step narrates through the injected
//!   [`ReportSink`](crate::report::ReportSink)

pub mod archiver;
pub mod classifier;
pub mod extractor;
pub mod fs_utils;
pub mod pipeline;
pub mod renamer;

pub use archiver::MoveOutcome;
pub use extractor::{ExtractError, ExtractOutcome};
pub use pipeline::{PipelineError, RomRenamer};
pub use renamer::RenameOutcome;
