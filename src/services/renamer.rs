//! Canonical-extension rename for a single ROM file.

use crate::models::formats;
use crate::report::ReportSink;
use crate::services::fs_utils::display_name;
use camino::Utf8Path;
use std::fs;

/// Outcome of a rename attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Renamed to the canonical extension.
    Renamed,
    /// A file with the canonical name already exists; renaming never
    /// overwrites. Not an error.
    DestinationExists,
    /// Genuine I/O failure.
    Failed,
}

/// Rename one ROM file to the canonical target extension.
///
/// The destination keeps the parent directory and base name; only the
/// extension changes. Callers are expected to filter out files that already
/// carry the canonical extension.
pub fn rename_rom<R: ReportSink>(rom: &Utf8Path, report: &R) -> RenameOutcome {
    let target = rom.with_extension(formats::TARGET_EXTENSION);
    if target.exists() {
        report.line(&format!("⚠ Already exists: {}", display_name(&target)));
        return RenameOutcome::DestinationExists;
    }

    match fs::rename(rom, &target) {
        Ok(()) => {
            report.line(&format!(
                "✓ Renamed: {} → {}",
                display_name(rom),
                display_name(&target)
            ));
            RenameOutcome::Renamed
        }
        Err(err) => {
            report.line(&format!("✗ Failed to rename {}: {}", display_name(rom), err));
            tracing::warn!("rename {} failed: {}", rom, err);
            RenameOutcome::Failed
        }
    }
}
