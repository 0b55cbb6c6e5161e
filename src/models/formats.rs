//! Recognized file extensions and archive format detection.
//!
//! All classification in the pipeline is driven by these two disjoint sets and
//! the canonical target extension. Matching is case-insensitive and looks only
//! at the final extension (`bundle.tar.gz` matches as `gz`).

use camino::Utf8Path;

/// Nintendo 3DS ROM extensions (lowercase, without the leading dot).
pub const ROM_EXTENSIONS: [&str; 4] = ["3ds", "cia", "3dsx", "app"];

/// Compressed archive extensions (lowercase, without the leading dot).
pub const ARCHIVE_EXTENSIONS: [&str; 6] = ["zip", "rar", "7z", "tar", "gz", "bz2"];

/// Extension all recognized ROM files are renamed to.
pub const TARGET_EXTENSION: &str = "cci";

fn extension_lowercase(path: &Utf8Path) -> Option<String> {
    path.extension().map(|ext| ext.to_ascii_lowercase())
}

/// True when the path carries a recognized ROM extension.
pub fn is_rom(path: &Utf8Path) -> bool {
    extension_lowercase(path).is_some_and(|ext| ROM_EXTENSIONS.contains(&ext.as_str()))
}

/// True when the path carries a recognized archive extension.
pub fn is_archive(path: &Utf8Path) -> bool {
    extension_lowercase(path).is_some_and(|ext| ARCHIVE_EXTENSIONS.contains(&ext.as_str()))
}

/// True when the path already carries the canonical target extension.
pub fn has_target_extension(path: &Utf8Path) -> bool {
    extension_lowercase(path).as_deref() == Some(TARGET_EXTENSION)
}

/// Archive format with library-backed unpacking support.
///
/// The remaining recognized archive extensions (`tar`, `gz`, `bz2`) are
/// classified and backed up but never unpacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    SevenZ,
    Rar,
}

impl ArchiveFormat {
    /// Detect format from the file extension.
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match extension_lowercase(path)?.as_str() {
            "zip" => Some(Self::Zip),
            "7z" => Some(Self::SevenZ),
            "rar" => Some(Self::Rar),
            _ => None,
        }
    }
}
