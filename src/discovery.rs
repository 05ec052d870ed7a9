use crate::error::{ConversionError, Result};
use crate::formats::{ImageKind, TypeFilter};
use crate::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A source image found under the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute path of the source file
    pub path: PathBuf,
    /// Path relative to the canonical input root
    pub relative_path: PathBuf,
    pub kind: ImageKind,
}

/// Lazy walk over the input root yielding matching images in file-name order.
///
/// Entries that cannot be read are reported with a warning and skipped.
pub struct ImageFiles {
    root: PathBuf,
    type_filter: TypeFilter,
    entries: walkdir::IntoIter,
}

impl ImageFiles {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for ImageFiles {
    type Item = DiscoveredFile;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", ConversionError::from(e));
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let Some(kind) = self.type_filter.classify(path) else {
                continue;
            };

            let relative_path = path
                .strip_prefix(&self.root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(entry.file_name()));

            return Some(DiscoveredFile {
                path: path.to_path_buf(),
                relative_path,
                kind,
            });
        }
    }
}

/// Starts a walk of `root` for images accepted by `type_filter`.
///
/// # Arguments
/// * `root` - Input directory
/// * `type_filter` - Which source formats to yield
/// * `recursive` - Descend into subdirectories instead of scanning direct children only
///
/// # Returns
/// * `Ok(ImageFiles)` - A lazy iterator; it may be empty
/// * `Err(ConversionError::NotFound)` - If `root` does not exist
/// * `Err(ConversionError::NotADirectory)` - If `root` is not a directory
pub fn discover_images(root: &Path, type_filter: TypeFilter, recursive: bool) -> Result<ImageFiles> {
    if !root.exists() {
        return Err(ConversionError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ConversionError::NotADirectory(root.to_path_buf()));
    }

    let root = root.canonicalize()?;
    let max_depth = if recursive { usize::MAX } else { 1 };

    let entries = WalkDir::new(&root)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter();

    Ok(ImageFiles {
        root,
        type_filter,
        entries,
    })
}
