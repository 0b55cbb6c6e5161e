//! Directory scan: partition immediate file entries into ROMs and archives.

use crate::models::formats;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Scan the working directory's immediate children.
///
/// Returns the recognized ROM files and archive files, partitioned by
/// case-insensitive extension. Subdirectories and unrecognized files are
/// ignored. Order follows directory-enumeration order, which is
/// implementation-defined. No side effects.
pub fn find_files(directory: &Utf8Path) -> io::Result<(Vec<Utf8PathBuf>, Vec<Utf8PathBuf>)> {
    let mut rom_files = Vec::new();
    let mut archive_files = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = match Utf8PathBuf::from_path_buf(entry.path()) {
            Ok(path) => path,
            Err(path) => {
                // Non-UTF-8 names cannot carry a recognized extension
                tracing::debug!("Ignoring non-UTF-8 file name: {}", path.display());
                continue;
            }
        };
        if formats::is_rom(&path) {
            rom_files.push(path);
        } else if formats::is_archive(&path) {
            archive_files.push(path);
        }
    }

    Ok((rom_files, archive_files))
}
