//! The pipeline orchestrator.
//!
//! One run walks a fixed sequence of phases - scan, extract, rename, back up -
//! and narrates every step through the reporting sink. Failures inside a phase
//! are local to the item being processed: one bad archive or one unrenameable
//! ROM never aborts the run. The only early exit is the "nothing to process"
//! short-circuit, and the only fatal errors are an unusable working directory
//! and a failed top-level scan.

use crate::models::formats;
use crate::models::stats::RunStats;
use crate::report::ReportSink;
use crate::services::archiver::{self, MoveOutcome};
use crate::services::classifier;
use crate::services::extractor::{self, ExtractOutcome};
use crate::services::renamer::{self, RenameOutcome};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use thiserror::Error;

/// Fixed name of the backup subdirectory collecting processed archives.
pub const BACKUP_DIR_NAME: &str = "archivos_comprimidos_backup";

/// Fatal pipeline errors. Everything per-item is reflected in the stats and
/// the log instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("working directory {path} is not accessible: {source}")]
    WorkingDirectory { path: Utf8PathBuf, source: io::Error },

    #[error("{path} is not a directory")]
    NotADirectory { path: Utf8PathBuf },

    #[error("failed to scan {path}: {source}")]
    Scan { path: Utf8PathBuf, source: io::Error },

    #[error("failed to create backup directory {path}: {source}")]
    CreateBackupDir { path: Utf8PathBuf, source: io::Error },
}

/// Batch processor for one directory of ROM and archive files.
///
/// Construction resolves the working directory once; [`run`](Self::run) then
/// executes the whole pipeline as one blocking unit of work. The processor
/// performs no internal parallelism and expects the host to dispatch it onto
/// a dedicated worker and to prevent concurrent runs (see
/// [`RunGuard`](crate::run_guard::RunGuard)).
pub struct RomRenamer<R: ReportSink> {
    directory: Utf8PathBuf,
    backup_dir: Utf8PathBuf,
    stats: RunStats,
    report: R,
}

impl<R: ReportSink> RomRenamer<R> {
    /// Create a processor for `directory`, resolving it to an absolute path.
    pub fn new(directory: impl AsRef<Utf8Path>, report: R) -> Result<Self, PipelineError> {
        let requested = directory.as_ref();
        let directory =
            requested
                .canonicalize_utf8()
                .map_err(|source| PipelineError::WorkingDirectory {
                    path: requested.to_owned(),
                    source,
                })?;
        if !directory.is_dir() {
            return Err(PipelineError::NotADirectory { path: directory });
        }
        let backup_dir = directory.join(BACKUP_DIR_NAME);
        Ok(Self {
            directory,
            backup_dir,
            stats: RunStats::default(),
            report,
        })
    }

    /// The resolved working directory.
    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    /// Counters of the current (or most recent) run.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Create the backup directory if it does not exist yet. Idempotent; the
    /// creation notice is only logged when the directory was actually created.
    fn create_backup_dir(&self) -> Result<(), PipelineError> {
        if !self.backup_dir.exists() {
            fs::create_dir_all(&self.backup_dir).map_err(|source| {
                PipelineError::CreateBackupDir {
                    path: self.backup_dir.clone(),
                    source,
                }
            })?;
            self.report.line(&format!(
                "✓ Backup folder created: {}",
                self.backup_dir.file_name().unwrap_or(BACKUP_DIR_NAME)
            ));
        }
        Ok(())
    }

    /// Execute the whole pipeline once.
    ///
    /// Phases run in a fixed order: extraction precedes renaming so ROMs
    /// freshly pulled from archives are renamed in the same pass, and
    /// backup-relocation runs last so an archive is only moved away after its
    /// contents have been harvested.
    pub fn run(&mut self) -> Result<RunStats, PipelineError> {
        self.stats = RunStats::default();

        self.report.line(&format!("Working directory: {}", self.directory));
        self.report.line("");
        self.report.line("Scanning directory...");

        let (mut rom_files, archive_files) =
            classifier::find_files(&self.directory).map_err(|source| PipelineError::Scan {
                path: self.directory.clone(),
                source,
            })?;

        self.report.line("");
        self.report.line(&format!("→ ROMs found: {}", rom_files.len()));
        self.report.line(&format!("→ Archives found: {}", archive_files.len()));
        self.report.line("");

        if rom_files.is_empty() && archive_files.is_empty() {
            self.report.line("Nothing to process.");
            return Ok(self.stats.clone());
        }

        self.report.line("Starting run...");

        if !archive_files.is_empty() {
            self.create_backup_dir()?;

            self.report.line("");
            self.report.line("Step 1/3: Extracting archives");
            self.report.line("");
            for archive in &archive_files {
                match extractor::extract_archive(archive, &self.directory, &self.report) {
                    ExtractOutcome::Extracted(found) => {
                        self.stats.extracted += 1;
                        rom_files.extend(found);
                    }
                    ExtractOutcome::Unsupported => {}
                    ExtractOutcome::Failed { archive_unpacked } => {
                        if archive_unpacked {
                            self.stats.extracted += 1;
                        }
                        self.stats.errors += 1;
                    }
                }
            }
        }

        if !rom_files.is_empty() {
            self.report.line("");
            self.report.line("Step 2/3: Renaming ROMs to .cci");
            self.report.line("");
            for rom in &rom_files {
                // A ROM may have vanished since discovery; a ROM already
                // carrying the canonical extension is never touched
                if rom.exists() && !formats::has_target_extension(rom) {
                    match renamer::rename_rom(rom, &self.report) {
                        RenameOutcome::Renamed => self.stats.renamed += 1,
                        RenameOutcome::DestinationExists => {}
                        RenameOutcome::Failed => self.stats.errors += 1,
                    }
                }
            }
        }

        if !archive_files.is_empty() {
            self.report.line("");
            self.report.line("Step 3/3: Moving archives to backup");
            self.report.line("");
            for archive in &archive_files {
                if archive.exists() {
                    match archiver::move_to_backup(archive, &self.backup_dir, &self.report) {
                        MoveOutcome::Moved => self.stats.moved += 1,
                        MoveOutcome::Failed => self.stats.errors += 1,
                    }
                }
            }
        }

        self.summary();
        Ok(self.stats.clone())
    }

    fn summary(&self) {
        self.report.line("");
        self.report.line("--- Run Summary ---");
        self.report.line(&format!("ROMs renamed:       {}", self.stats.renamed));
        self.report.line(&format!("Archives extracted: {}", self.stats.extracted));
        self.report.line(&format!("Archives backed up: {}", self.stats.moved));
        self.report.line(&format!("Errors:             {}", self.stats.errors));
        self.report.line("-------------------");
        self.report.line("");
        self.report.line("✓ Done.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CaptureSink;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_rejected() {
        let sink = CaptureSink::new();
        let result = RomRenamer::new("/definitely/not/a/real/path", sink);
        assert!(matches!(
            result,
            Err(PipelineError::WorkingDirectory { .. })
        ));
    }

    #[test]
    fn test_nothing_to_process_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(dir.join("readme.txt"), b"notes").unwrap();
        let sink = CaptureSink::new();

        let mut pipeline = RomRenamer::new(dir, sink.clone()).unwrap();
        let stats = pipeline.run().unwrap();

        assert_eq!(stats, RunStats::default());
        assert!(!dir.join(BACKUP_DIR_NAME).exists(), "no directories created");
        let lines = sink.lines();
        assert!(lines.iter().any(|l| l == "Nothing to process."));
        assert!(!lines.iter().any(|l| l.starts_with("Step")));
    }

    #[test]
    fn test_backup_dir_created_once() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(dir.join("old.tar"), b"tar").unwrap();
        let sink = CaptureSink::new();

        let mut pipeline = RomRenamer::new(dir, sink.clone()).unwrap();
        pipeline.run().unwrap();

        assert!(dir.join(BACKUP_DIR_NAME).is_dir());
        let created_notices = sink
            .lines()
            .iter()
            .filter(|l| l.starts_with("✓ Backup folder created:"))
            .count();
        assert_eq!(created_notices, 1);
    }

    #[test]
    fn test_roms_only_run_skips_archive_steps() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(dir.join("game.3ds"), b"rom").unwrap();
        let sink = CaptureSink::new();

        let mut pipeline = RomRenamer::new(dir, sink.clone()).unwrap();
        let stats = pipeline.run().unwrap();

        assert_eq!(stats.renamed, 1);
        assert_eq!(stats.extracted, 0);
        assert_eq!(stats.moved, 0);
        assert_eq!(stats.errors, 0);
        assert_eq!(pipeline.stats(), &stats);
        assert!(dir.join("game.cci").exists());
        assert!(!dir.join(BACKUP_DIR_NAME).exists());

        let lines = sink.lines();
        assert!(lines.iter().any(|l| l == "Step 2/3: Renaming ROMs to .cci"));
        assert!(!lines.iter().any(|l| l == "Step 1/3: Extracting archives"));
        assert!(!lines.iter().any(|l| l == "Step 3/3: Moving archives to backup"));
    }

    #[test]
    fn test_stats_reset_between_runs() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(tmp.path()).unwrap();
        fs::write(dir.join("game.3ds"), b"rom").unwrap();
        let sink = CaptureSink::new();

        let mut pipeline = RomRenamer::new(dir, sink).unwrap();
        let first = pipeline.run().unwrap();
        assert_eq!(first.renamed, 1);

        // Second run finds only game.cci, which is not a recognized ROM
        let second = pipeline.run().unwrap();
        assert_eq!(second, RunStats::default());
    }
}
