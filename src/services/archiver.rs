//! Backup relocation for processed archives.

use crate::report::ReportSink;
use crate::services::fs_utils::{display_name, move_file, unique_destination};
use camino::Utf8Path;

/// Outcome of a backup move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Failed,
}

/// Relocate one processed archive into the backup directory.
///
/// The destination keeps the original file name; collisions are resolved with
/// the same incrementing-suffix rule used when relocating extracted ROMs
/// (`name_1.ext`, `name_2.ext`, ...).
pub fn move_to_backup<R: ReportSink>(
    archive: &Utf8Path,
    backup_dir: &Utf8Path,
    report: &R,
) -> MoveOutcome {
    let Some(file_name) = archive.file_name() else {
        report.line(&format!("✗ Failed to move {archive}: no file name"));
        return MoveOutcome::Failed;
    };

    let dest = unique_destination(backup_dir, file_name);
    match move_file(archive, &dest) {
        Ok(()) => {
            report.line(&format!("→ Moved to backup: {}", display_name(archive)));
            MoveOutcome::Moved
        }
        Err(err) => {
            report.line(&format!("✗ Failed to move {}: {}", display_name(archive), err));
            tracing::warn!("backup move {} failed: {}", archive, err);
            MoveOutcome::Failed
        }
    }
}
