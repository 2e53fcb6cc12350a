// SPDX-License-Identifier: MPL-2.0
//! Random photo selection over an indexed collection.
//!
//! Selection is a two-stage draw: one registered directory uniformly at
//! random, then one filename uniformly from that directory's list. The result
//! is not uniform over individual photos; a photo in a small directory is far
//! more likely to be shown than one in a large directory. That directory bias
//! is a deliberate property of the browsing experience and is preserved here.

use crate::error::{Error, Result};
use crate::index::PhotoIndex;
use chrono::NaiveDateTime;
use rand::seq::IndexedRandom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A single viewable image within the collection.
///
/// The collection root is shared by every instance rather than owned.
/// `captured_at` starts unset and is filled in lazily by the display
/// collaborator once the image has been decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedPhoto {
    rel_dir: String,
    filename: String,
    root: Arc<PathBuf>,
    display_name: Option<String>,
    captured_at: Option<NaiveDateTime>,
}

impl SelectedPhoto {
    pub fn new(rel_dir: String, filename: String, root: Arc<PathBuf>) -> Self {
        Self {
            rel_dir,
            filename,
            root,
            display_name: None,
            captured_at: None,
        }
    }

    /// Like [`SelectedPhoto::new`] but with a display name override, used by
    /// directory-queue expansion to annotate position and total count.
    pub fn with_display_name(
        rel_dir: String,
        filename: String,
        root: Arc<PathBuf>,
        display_name: String,
    ) -> Self {
        Self {
            rel_dir,
            filename,
            root,
            display_name: Some(display_name),
            captured_at: None,
        }
    }

    /// Root-relative directory this photo lives in (`"."` for the root).
    pub fn rel_dir(&self) -> &str {
        &self.rel_dir
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The collection root shared by all selected photos.
    pub fn root(&self) -> &Arc<PathBuf> {
        &self.root
    }

    /// Root-relative path of the image, as recorded in the viewing log.
    pub fn rel_path(&self) -> String {
        if self.rel_dir == "." {
            self.filename.clone()
        } else {
            Path::new(&self.rel_dir)
                .join(&self.filename)
                .to_string_lossy()
                .into_owned()
        }
    }

    /// Absolute path of the directory containing the image.
    pub fn abs_dir(&self) -> PathBuf {
        if self.rel_dir == "." {
            self.root.as_ref().clone()
        } else {
            self.root.join(&self.rel_dir)
        }
    }

    /// Absolute path of the image file.
    pub fn abs_path(&self) -> PathBuf {
        self.abs_dir().join(&self.filename)
    }

    /// Name shown alongside the image; defaults to the relative path.
    pub fn display_name(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.rel_path())
    }

    /// Capture timestamp, once the display collaborator has extracted it.
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        self.captured_at
    }

    pub fn set_captured_at(&mut self, timestamp: Option<NaiveDateTime>) {
        self.captured_at = timestamp;
    }
}

/// Draws random photos from a [`PhotoIndex`] and supports removing photos
/// from the pool once they have been shown.
#[derive(Debug, Clone)]
pub struct PhotoSelector {
    index: PhotoIndex,
}

impl PhotoSelector {
    pub fn new(index: PhotoIndex) -> Self {
        Self { index }
    }

    /// The collection root shared by all selected photos.
    pub fn root(&self) -> &Arc<PathBuf> {
        self.index.root()
    }

    /// Draws one directory uniformly at random, then one filename uniformly
    /// from that directory's list.
    ///
    /// Directories drained by [`PhotoSelector::remove`] stay registered; a
    /// first-stage draw landing on one retries over the directories that
    /// still have images. Returns [`Error::EmptyCollection`] once every list
    /// is empty.
    pub fn pick_random(&self) -> Result<SelectedPhoto> {
        let mut rng = rand::rng();
        let mut rel_dir = self
            .index
            .directories()
            .choose(&mut rng)
            .ok_or(Error::EmptyCollection)?;
        let drained = self
            .index
            .images_in(rel_dir)
            .map_or(true, |filenames| filenames.is_empty());
        if drained {
            let remaining: Vec<&String> = self
                .index
                .directories()
                .iter()
                .filter(|dir| {
                    self.index
                        .images_in(dir)
                        .is_some_and(|filenames| !filenames.is_empty())
                })
                .collect();
            rel_dir = remaining
                .choose(&mut rng)
                .copied()
                .ok_or(Error::EmptyCollection)?;
        }
        let filenames = self
            .index
            .images_in(rel_dir)
            .ok_or(Error::EmptyCollection)?;
        let filename = filenames.choose(&mut rng).ok_or(Error::EmptyCollection)?;
        Ok(SelectedPhoto::new(
            rel_dir.clone(),
            filename.clone(),
            self.index.root().clone(),
        ))
    }

    /// Removes a photo from the selection pool so it is never drawn again
    /// this run. Returns whether the photo was present.
    pub fn remove(&mut self, rel_dir: &str, filename: &str) -> bool {
        self.index.remove_image(rel_dir, filename)
    }

    /// Checks whether any photo is left to draw.
    pub fn has_remaining(&self) -> bool {
        self.index.has_remaining()
    }
}
