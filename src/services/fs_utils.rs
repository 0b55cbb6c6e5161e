//! Filesystem helpers shared by the extractor and the archiver.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// File name for log lines; falls back to the full path when the path has no
/// final component.
pub fn display_name(path: &Utf8Path) -> &str {
    path.file_name().unwrap_or(path.as_str())
}

/// Compute a collision-free destination for `file_name` inside `dir`.
///
/// If `dir/file_name` is free it is returned as-is; otherwise an incrementing
/// numeric suffix is inserted before the extension (`name_1.ext`,
/// `name_2.ext`, ...) until a free name is found. The probe is deterministic:
/// with `x.ext` through `x_(N-1).ext` taken, the result is `x_N.ext`.
pub fn unique_destination(dir: &Utf8Path, file_name: &str) -> Utf8PathBuf {
    let dest = dir.join(file_name);
    if !dest.exists() {
        return dest;
    }

    let name = Utf8Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut counter = 1usize;
    loop {
        let candidate = match extension {
            Some(ext) => dir.join(format!("{stem}_{counter}.{ext}")),
            None => dir.join(format!("{stem}_{counter}")),
        };
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move a file using `fs::rename`, falling back to `fs_extra` copy+delete
/// when the rename fails (likely a cross-device link error).
pub fn move_file(from: &Utf8Path, to: &Utf8Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(err) => {
            tracing::warn!(
                "fs::rename {} -> {} failed (cross-device?): {}. Attempting fallback move...",
                from,
                to,
                err
            );

            if to.exists() {
                return Err(err); // Propagate the original error (e.g., AlreadyExists)
            }

            let mut options = fs_extra::file::CopyOptions::new();
            options.overwrite = false;

            fs_extra::file::move_file(from, to, &options)
                .map(|_| ())
                .map_err(|fallback_err| io::Error::other(fallback_err.to_string()))
        }
    }
}
