// romrenamer - Batch ROM renamer and archive extractor for Nintendo 3DS ROM sets
//
// This is the library crate containing the core pipeline and data structures.
// The binary crate (main.rs) provides the console host entry point.

pub mod logging;
pub mod models;
pub mod report;
pub mod run_guard;
pub mod services;

// Re-export commonly used types for convenience
pub use models::{ArchiveFormat, RunStats};
pub use report::{CaptureSink, ConsoleSink, ReportSink};
pub use services::pipeline::{PipelineError, RomRenamer};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
