//! Per-archive extraction and ROM harvest.
//!
//! Each archive is unpacked into its own scratch directory inside the working
//! directory, the unpacked tree is walked for ROM files, and every hit is
//! relocated into the working directory under a collision-free name. The
//! scratch directory is removed on every exit path - success, unsupported
//! skip, or failure - by a drop guard; removal failures are swallowed so
//! cleanup can never mask the original error.
//!
//! Unpacking is library-backed for three formats only: zip (`zip`), 7z
//! (`sevenz-rust`) and rar (`rar`). The remaining recognized archive
//! extensions (`tar`, `gz`, `bz2`) are reported as unsupported and produce no
//! extracted files; the orchestrator still relocates them to the backup
//! directory afterward.

use crate::models::formats::{self, ArchiveFormat};
use crate::report::ReportSink;
use crate::services::fs_utils::{self, display_name};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use thiserror::Error;
use walkdir::WalkDir;

/// Name prefix for per-archive scratch directories.
pub const SCRATCH_PREFIX: &str = "_temp_extract_";

/// Errors that can occur while unpacking and harvesting one archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid or corrupt zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to extract 7z: {0}")]
    SevenZ(#[from] sevenz_rust::Error),

    #[error("failed to extract rar: {0}")]
    Rar(String),
}

/// Outcome of processing one archive.
#[derive(Debug)]
pub enum ExtractOutcome {
    /// Archive unpacked; the contained ROM files now live in the working
    /// directory. An empty list is not an error.
    Extracted(Vec<Utf8PathBuf>),
    /// Recognized archive extension with no unpacking routine. Not an error.
    Unsupported,
    /// Genuine failure. `archive_unpacked` is true when the unpack itself
    /// succeeded and the failure happened during the ROM harvest; the
    /// per-archive extraction count is still owed in that case.
    Failed { archive_unpacked: bool },
}

/// Scratch directory with a guaranteed best-effort removal on drop.
struct ScratchDir {
    path: Utf8PathBuf,
}

impl ScratchDir {
    fn create(working_dir: &Utf8Path, archive: &Utf8Path) -> io::Result<Self> {
        let stem = archive.file_stem().unwrap_or("archive");
        let path = working_dir.join(format!("{SCRATCH_PREFIX}{stem}"));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        // Removal failures are ignored; an orphaned scratch dir must never
        // mask the error that got us here
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Process one archive: unpack, harvest ROMs, clean up.
///
/// Failures are local to this archive: the file is left in place so the
/// orchestrator can still relocate it to the backup directory.
pub fn extract_archive<R: ReportSink>(
    archive: &Utf8Path,
    working_dir: &Utf8Path,
    report: &R,
) -> ExtractOutcome {
    let scratch = match ScratchDir::create(working_dir, archive) {
        Ok(scratch) => scratch,
        Err(err) => {
            report.line(&format!(
                "✗ Failed to extract {}: {}",
                display_name(archive),
                err
            ));
            tracing::warn!("scratch dir for {} failed: {}", archive, err);
            return ExtractOutcome::Failed {
                archive_unpacked: false,
            };
        }
    };

    let Some(format) = ArchiveFormat::from_path(archive) else {
        let ext = archive.extension().unwrap_or_default();
        report.line(&format!("⚠ Unsupported format: .{ext}"));
        return ExtractOutcome::Unsupported;
    };

    if let Err(err) = unpack(archive, scratch.path(), format) {
        report.line(&format!(
            "✗ Failed to extract {}: {}",
            display_name(archive),
            err
        ));
        tracing::warn!("unpack {} failed: {}", archive, err);
        return ExtractOutcome::Failed {
            archive_unpacked: false,
        };
    }

    report.line(&format!("✓ Extracted: {}", display_name(archive)));

    match harvest_roms(scratch.path(), working_dir, report) {
        Ok(rom_files) => ExtractOutcome::Extracted(rom_files),
        Err(err) => {
            report.line(&format!(
                "✗ Failed to collect ROMs from {}: {}",
                display_name(archive),
                err
            ));
            tracing::warn!("harvest from {} failed: {}", archive, err);
            ExtractOutcome::Failed {
                archive_unpacked: true,
            }
        }
    }
}

/// Dispatch to the format-specific unpacking routine.
fn unpack(archive: &Utf8Path, dest: &Utf8Path, format: ArchiveFormat) -> Result<(), ExtractError> {
    match format {
        ArchiveFormat::Zip => unpack_zip(archive, dest),
        ArchiveFormat::SevenZ => {
            sevenz_rust::decompress_file(archive.as_std_path(), dest.as_std_path())?;
            Ok(())
        }
        ArchiveFormat::Rar => {
            rar::Archive::extract_all(archive.as_str(), dest.as_str(), "")
                .map_err(|err| ExtractError::Rar(format!("{err:?}")))?;
            Ok(())
        }
    }
}

fn unpack_zip(archive: &Utf8Path, dest: &Utf8Path) -> Result<(), ExtractError> {
    let file = fs::File::open(archive)?;
    let mut zip = zip::ZipArchive::new(file)?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(relative) = entry.enclosed_name() else {
            // Entry name escapes the scratch root; skip it
            tracing::warn!("skipping unsafe zip entry in {}", archive);
            continue;
        };

        let output = dest.as_std_path().join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&output)?;
        } else {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&output)?;
            io::copy(&mut entry, &mut outfile)?;
        }
    }

    Ok(())
}

/// Walk the unpacked tree and relocate every ROM file into the working
/// directory under a collision-free name.
///
/// Unreadable walk entries are skipped, matching best-effort traversal; a
/// failed move is a genuine error.
fn harvest_roms<R: ReportSink>(
    scratch: &Utf8Path,
    working_dir: &Utf8Path,
    report: &R,
) -> io::Result<Vec<Utf8PathBuf>> {
    let mut rom_files = Vec::new();

    for entry in WalkDir::new(scratch).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = Utf8Path::from_path(entry.path()) else {
            tracing::debug!("Ignoring non-UTF-8 entry under {}", scratch);
            continue;
        };
        if !formats::is_rom(path) {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        let dest = fs_utils::unique_destination(working_dir, file_name);
        fs_utils::move_file(path, &dest)?;
        report.line(&format!("→ ROM found: {}", display_name(&dest)));
        rom_files.push(dest);
    }

    Ok(rom_files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CaptureSink;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn utf8_dir(tmp: &TempDir) -> &Utf8Path {
        Utf8Path::from_path(tmp.path()).unwrap()
    }

    fn write_zip(path: &Utf8Path, entries: &[(&str, &[u8])]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, payload) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(payload).unwrap();
        }
        writer.finish().unwrap();
    }

    fn no_scratch_left(dir: &Utf8Path) {
        for entry in fs::read_dir(dir).unwrap() {
            let name = entry.unwrap().file_name();
            let name = name.to_string_lossy();
            assert!(
                !name.starts_with(SCRATCH_PREFIX),
                "scratch residue: {name}"
            );
        }
    }

    #[test]
    fn test_zip_with_nested_roms() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);
        let archive = dir.join("bundle.zip");
        write_zip(
            &archive,
            &[
                ("hidden.cia", b"cia data"),
                ("deep/nested/tree/game.3ds", b"rom data"),
                ("notes/readme.txt", b"not a rom"),
            ],
        );
        let sink = CaptureSink::new();

        let outcome = extract_archive(&archive, dir, &sink);

        let ExtractOutcome::Extracted(roms) = outcome else {
            panic!("expected Extracted, got {outcome:?}");
        };
        assert_eq!(roms.len(), 2);
        assert!(dir.join("hidden.cia").exists());
        assert!(dir.join("game.3ds").exists());
        assert!(!dir.join("readme.txt").exists());
        no_scratch_left(dir);

        let lines = sink.lines();
        assert_eq!(lines[0], "✓ Extracted: bundle.zip");
        assert_eq!(lines.iter().filter(|l| l.starts_with("→ ROM found:")).count(), 2);
    }

    #[test]
    fn test_zip_without_roms_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);
        let archive = dir.join("docs.zip");
        write_zip(&archive, &[("readme.txt", b"text")]);
        let sink = CaptureSink::new();

        let outcome = extract_archive(&archive, dir, &sink);

        let ExtractOutcome::Extracted(roms) = outcome else {
            panic!("expected Extracted, got {outcome:?}");
        };
        assert!(roms.is_empty());
        no_scratch_left(dir);
    }

    #[test]
    fn test_harvest_resolves_name_collisions() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);
        fs::write(dir.join("hidden.cia"), b"already here").unwrap();
        let archive = dir.join("bundle.zip");
        write_zip(&archive, &[("hidden.cia", b"from archive")]);
        let sink = CaptureSink::new();

        let outcome = extract_archive(&archive, dir, &sink);

        let ExtractOutcome::Extracted(roms) = outcome else {
            panic!("expected Extracted, got {outcome:?}");
        };
        assert_eq!(roms, vec![dir.join("hidden_1.cia")]);
        assert_eq!(fs::read(dir.join("hidden.cia")).unwrap(), b"already here");
        assert_eq!(fs::read(dir.join("hidden_1.cia")).unwrap(), b"from archive");
    }

    #[test]
    fn test_corrupt_zip_fails_without_residue() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);
        let archive = dir.join("broken.zip");
        fs::write(&archive, b"this is not a zip archive").unwrap();
        let sink = CaptureSink::new();

        let outcome = extract_archive(&archive, dir, &sink);

        let ExtractOutcome::Failed { archive_unpacked } = outcome else {
            panic!("expected Failed, got {outcome:?}");
        };
        assert!(!archive_unpacked);
        assert!(archive.exists(), "archive stays for the backup step");
        no_scratch_left(dir);

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("✗ Failed to extract broken.zip:"));
    }

    #[test]
    fn test_corrupt_rar_fails_without_residue() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);
        let archive = dir.join("broken.rar");
        fs::write(&archive, b"this is not a rar archive").unwrap();
        let sink = CaptureSink::new();

        let outcome = extract_archive(&archive, dir, &sink);

        assert!(matches!(
            outcome,
            ExtractOutcome::Failed {
                archive_unpacked: false
            }
        ));
        no_scratch_left(dir);
    }

    #[test]
    fn test_7z_round_trip() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);

        // Build a real 7z archive from a staging tree
        let staging = dir.join("staging");
        fs::create_dir_all(staging.join("inner")).unwrap();
        fs::write(staging.join("inner").join("title.app"), b"rom payload").unwrap();
        fs::write(staging.join("skip.txt"), b"junk").unwrap();
        let archive = dir.join("pack.7z");
        sevenz_rust::compress_to_path(staging.as_std_path(), archive.as_std_path()).unwrap();
        fs::remove_dir_all(&staging).unwrap();

        let sink = CaptureSink::new();
        let outcome = extract_archive(&archive, dir, &sink);

        let ExtractOutcome::Extracted(roms) = outcome else {
            panic!("expected Extracted, got {outcome:?}");
        };
        assert_eq!(roms, vec![dir.join("title.app")]);
        assert_eq!(fs::read(dir.join("title.app")).unwrap(), b"rom payload");
        no_scratch_left(dir);
    }

    #[test]
    fn test_unsupported_format_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let dir = utf8_dir(&tmp);
        let archive = dir.join("old.tar");
        fs::write(&archive, b"tar bytes").unwrap();
        let sink = CaptureSink::new();

        let outcome = extract_archive(&archive, dir, &sink);

        assert!(matches!(outcome, ExtractOutcome::Unsupported));
        assert!(archive.exists());
        no_scratch_left(dir);
        assert_eq!(sink.lines(), ["⚠ Unsupported format: .tar"]);
    }
}
