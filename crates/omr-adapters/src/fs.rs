//! Filesystem adapter for scanned answer sheets.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use omr_core::{ImageInfo, ImageSource};
use tracing::{debug, warn};

/// Extensions decoded by the `image` crate with default features.
const SHEET_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Answer sheets found under a set of files and directories.
///
/// Directory listings are sorted, and a file reached through more than one
/// argument is graded once.
pub struct FsImageSource {
    paths: Vec<PathBuf>,
    recursive: bool,
}

impl FsImageSource {
    /// Creates a source over `paths`, descending into subdirectories only when
    /// `recursive` is set.
    #[must_use]
    pub const fn new(paths: Vec<PathBuf>, recursive: bool) -> Self {
        Self { paths, recursive }
    }

    /// Resolves the configured paths to sheet files, in grading order.
    #[must_use]
    pub fn sheet_files(&self) -> Vec<PathBuf> {
        let mut seen = BTreeSet::new();
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_dir() {
                walk(path, self.recursive, &mut files);
            } else if path.is_file() {
                if is_sheet_file(path) {
                    files.push(path.clone());
                } else {
                    warn!("Not a supported image: {}", path.display());
                }
            } else {
                warn!("Path does not exist: {}", path.display());
            }
        }

        files.retain(|f| seen.insert(f.canonicalize().unwrap_or_else(|_| f.clone())));
        files
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo>> + Send + '_> {
        let files = self.sheet_files();
        debug!("Found {} sheet images", files.len());
        Box::new(files.into_iter().map(|path| load_image(&path)))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.sheet_files().len())
    }
}

fn walk(dir: &Path, recursive: bool, files: &mut Vec<PathBuf>) {
    let mut entries: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|e| e.path()).collect(),
        Err(e) => {
            warn!("Failed to read directory {}: {e}", dir.display());
            return;
        }
    };
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            if recursive {
                walk(&entry, recursive, files);
            }
        } else if is_sheet_file(&entry) {
            files.push(entry);
        }
    }
}

fn is_sheet_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SHEET_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(e)))
}

/// Decodes one sheet image.
///
/// # Errors
///
/// Returns an error naming the file if it cannot be opened or decoded.
pub fn load_image(path: &Path) -> Result<ImageInfo> {
    let image =
        image::open(path).with_context(|| format!("Failed to open image: {}", path.display()))?;
    debug!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(ImageInfo::new(path.to_string_lossy().into_owned(), image))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sheet_file() {
        assert!(is_sheet_file(Path::new("scan-01.jpg")));
        assert!(is_sheet_file(Path::new("scan-01.JPEG")));
        assert!(is_sheet_file(Path::new("page.Tif")));
        assert!(!is_sheet_file(Path::new("scan.pdf")));
        assert!(!is_sheet_file(Path::new("exam.json")));
        assert!(!is_sheet_file(Path::new("README")));
    }

    #[test]
    fn test_same_file_listed_twice_is_graded_once() {
        let dir = tempfile::tempdir().unwrap();
        let sheet = dir.path().join("a.png");
        std::fs::write(&sheet, b"").unwrap();

        let source = FsImageSource::new(vec![sheet.clone(), dir.path().to_path_buf()], false);
        assert_eq!(source.sheet_files(), vec![sheet]);
    }
}
