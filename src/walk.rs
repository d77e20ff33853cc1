use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File name suffixes recognised as FITS images
pub const FITS_SUFFIXES: &[&str] = &[".fits", ".fits.gz"];

pub fn is_fits_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| FITS_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
        .unwrap_or(false)
}

/// Recursively yield FITS files below `root`, sorted by file name within
/// each directory. Entries that cannot be read are logged and skipped.
pub fn find_fits_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Error walking directory: {}", e);
                None
            }
        })
        // Symlinked files are kept; `Path::is_file` follows the link
        .filter(|entry| entry.path().is_file() && is_fits_file(entry.path()))
        .map(|entry| entry.into_path())
}
