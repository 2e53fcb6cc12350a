// SPDX-License-Identifier: MPL-2.0
//! Collection indexing: walks a photo collection root once and builds the set
//! of viewable directories with their image filenames.
//!
//! Directories named in the exclusion list (interpreted as direct children of
//! the root) are skipped along with their entire subtrees. Directories with
//! no image files directly inside them are not registered.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// File extensions (lowercase) recognized as viewable images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// Checks whether a filename has a supported image extension (case-insensitive).
pub fn is_image_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Mapping from root-relative directory path to the image filenames found
/// directly in that directory. Built once per run; the only later mutation is
/// the removal of already-shown photos from the selection pool.
#[derive(Debug, Clone)]
pub struct PhotoIndex {
    root: Arc<PathBuf>,
    directories: Vec<String>,
    images: HashMap<String, Vec<String>>,
}

impl PhotoIndex {
    /// Scans the collection under `root`, honoring the exclusion list.
    ///
    /// The exclusion list is borrowed and never mutated. Returns
    /// [`Error::EmptyCollection`] if no directory with at least one image was
    /// found; filesystem errors during traversal are fatal.
    pub fn scan(root: &Path, exclude: &[String]) -> Result<Self> {
        let excluded: Vec<PathBuf> = exclude.iter().map(|name| root.join(name)).collect();

        let mut directories = Vec::new();
        let mut images: HashMap<String, Vec<String>> = HashMap::new();

        let walker = WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| !excluded.iter().any(|path| entry.path() == path));
        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            if !is_image_filename(&filename) {
                continue;
            }
            let Some(parent) = entry.path().parent() else {
                continue;
            };
            let rel_dir = relative_key(root, parent);
            let filenames = images.entry(rel_dir.clone()).or_default();
            if filenames.is_empty() {
                directories.push(rel_dir);
            }
            filenames.push(filename);
        }

        if directories.is_empty() {
            return Err(Error::EmptyCollection);
        }

        Ok(Self {
            root: Arc::new(root.to_path_buf()),
            directories,
            images,
        })
    }

    /// Returns the collection root shared by all selected photos.
    pub fn root(&self) -> &Arc<PathBuf> {
        &self.root
    }

    /// Returns the registered root-relative directory paths.
    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Returns the image filenames registered for a directory.
    pub fn images_in(&self, rel_dir: &str) -> Option<&[String]> {
        self.images.get(rel_dir).map(|filenames| filenames.as_slice())
    }

    /// Removes one filename from its directory's list so it is never drawn
    /// again this run. The directory stays registered even when its list
    /// becomes empty. Returns whether the photo was present.
    pub fn remove_image(&mut self, rel_dir: &str, filename: &str) -> bool {
        let Some(filenames) = self.images.get_mut(rel_dir) else {
            return false;
        };
        match filenames.iter().position(|f| f == filename) {
            Some(position) => {
                filenames.remove(position);
                true
            }
            None => false,
        }
    }

    /// Checks whether any registered directory still has an image to draw.
    pub fn has_remaining(&self) -> bool {
        self.images.values().any(|filenames| !filenames.is_empty())
    }
}

/// Root-relative key for a directory, `"."` for the root itself.
fn relative_key(root: &Path, dir: &Path) -> String {
    match dir.strip_prefix(root) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => rel.to_string_lossy().into_owned(),
        Err(_) => dir.to_string_lossy().into_owned(),
    }
}
