// SPDX-License-Identifier: MPL-2.0
//! Navigation engine: the ordered view history, the backward-stepping cursor
//! and the transient directory queue.
//!
//! The engine owns the `(history, cursor, queue)` state machine. `history`
//! only ever grows; `cursor` is `None` while looking at the most recent photo
//! and otherwise indexes a strictly earlier entry; the queue is non-empty
//! only between a directory-queue operation and its consumption or an
//! explicit random jump. Every operation runs to completion before the next
//! one starts.
//!
//! "Displaying" a photo means returning it to the caller; decoding and
//! rendering belong to the display collaborator. The viewing log is notified
//! exactly once per photo instance, the first time it is shown.

use crate::error::Result;
use crate::history_log::ViewingHistory;
use crate::index::is_image_filename;
use crate::selector::{PhotoSelector, SelectedPhoto};
use std::collections::VecDeque;
use std::fs;

/// Holds the in-memory view history, the history cursor and the pending
/// queue, and produces the photo that should currently be displayed.
#[derive(Debug)]
pub struct Navigator {
    selector: PhotoSelector,
    log: ViewingHistory,
    history: Vec<SelectedPhoto>,
    cursor: Option<usize>,
    queue: VecDeque<SelectedPhoto>,
}

impl Navigator {
    /// Creates a navigator over a selector and an opened viewing history.
    /// The caller starts one session on the history before navigating.
    pub fn new(selector: PhotoSelector, log: ViewingHistory) -> Self {
        Self {
            selector,
            log,
            history: Vec::new(),
            cursor: None,
            queue: VecDeque::new(),
        }
    }

    /// The photo that should currently be displayed, `None` before the first
    /// navigation call.
    pub fn current(&self) -> Option<&SelectedPhoto> {
        match self.cursor {
            Some(cursor) => self.history.get(cursor),
            None => self.history.last(),
        }
    }

    /// Mutable access to the current photo, so the display collaborator can
    /// fill in the capture timestamp after decoding.
    pub fn current_mut(&mut self) -> Option<&mut SelectedPhoto> {
        match self.cursor {
            Some(cursor) => self.history.get_mut(cursor),
            None => self.history.last_mut(),
        }
    }

    /// Draws a fresh random photo, abandoning any pending directory queue.
    pub fn jump_random(&mut self) -> Result<&SelectedPhoto> {
        self.queue.clear();
        let photo = self.selector.pick_random()?;
        self.show_new(photo)
    }

    /// Steps forward: consumes the queue when at the most recent photo,
    /// falls back to a random jump when nothing is queued, and otherwise
    /// moves the cursor toward the head without re-logging old entries.
    pub fn next(&mut self) -> Result<&SelectedPhoto> {
        match self.cursor {
            None => match self.queue.pop_front() {
                Some(photo) => {
                    // Queued photos leave the random pool once actually shown.
                    self.selector.remove(photo.rel_dir(), photo.filename());
                    self.show_new(photo)
                }
                None => self.jump_random(),
            },
            Some(cursor) if cursor + 2 == self.history.len() => {
                // Stepping forward lands on the most recent entry.
                self.cursor = None;
                let last = self.history.len() - 1;
                Ok(&self.history[last])
            }
            Some(cursor) => {
                self.cursor = Some(cursor + 1);
                Ok(&self.history[cursor + 1])
            }
        }
    }

    /// Steps backward through the history. A no-op at the first-ever shown
    /// photo, or when fewer than two photos have been shown. Never logs.
    pub fn previous(&mut self) -> Option<&SelectedPhoto> {
        match self.cursor {
            None if self.history.len() >= 2 => {
                self.cursor = Some(self.history.len() - 2);
            }
            None => {}
            Some(0) => {}
            Some(cursor) => self.cursor = Some(cursor - 1),
        }
        self.current()
    }

    /// Queues every image in the current photo's directory for sequential
    /// display and immediately shows the first one.
    ///
    /// The directory is listed from the filesystem in listing order,
    /// deliberately unsorted. Display names carry the 1-based position and
    /// total count. Returns `None` when nothing is displayed yet or the
    /// directory no longer contains image files.
    pub fn queue_current_directory(&mut self) -> Result<Option<&SelectedPhoto>> {
        let Some(current) = self.current() else {
            return Ok(None);
        };
        let rel_dir = current.rel_dir().to_string();
        let abs_dir = current.abs_dir();
        let root = current.root().clone();

        let mut filenames = Vec::new();
        for entry in fs::read_dir(&abs_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let filename = entry.file_name().to_string_lossy().into_owned();
            if is_image_filename(&filename) {
                filenames.push(filename);
            }
        }
        if filenames.is_empty() {
            return Ok(None);
        }

        let total = filenames.len();
        self.queue = filenames
            .into_iter()
            .enumerate()
            .map(|(position, filename)| {
                let display_name =
                    format!("{} [{}/{}] ({})", rel_dir, position + 1, total, filename);
                SelectedPhoto::with_display_name(
                    rel_dir.clone(),
                    filename,
                    root.clone(),
                    display_name,
                )
            })
            .collect();
        self.next().map(Some)
    }

    /// Photos shown so far, in the order first shown.
    pub fn history(&self) -> &[SelectedPhoto] {
        &self.history
    }

    /// Index into the history while stepping backward, `None` at the head.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of photos still awaiting sequential display.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The session-structured viewing log fed by this navigator.
    pub fn viewing_history(&self) -> &ViewingHistory {
        &self.log
    }

    /// Appends a never-before-shown photo, moves the cursor to the head and
    /// records the display in the viewing log.
    ///
    /// The photo becomes current even when the log write fails; the write
    /// error propagates and the caller decides whether to keep browsing
    /// without persistence.
    fn show_new(&mut self, photo: SelectedPhoto) -> Result<&SelectedPhoto> {
        let rel_path = photo.rel_path();
        log::debug!("display {}", rel_path);
        self.history.push(photo);
        self.cursor = None;
        self.log.add_entry(&rel_path)?;
        let last = self.history.len() - 1;
        Ok(&self.history[last])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::index::PhotoIndex;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn create_test_image(dir: &Path, name: &str) {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).expect("failed to create test file");
        file.write_all(b"fake image data")
            .expect("failed to write test file");
    }

    /// dir_a holds three images, dir_b a single one.
    fn collection() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let dir_a = temp_dir.path().join("dir_a");
        let dir_b = temp_dir.path().join("dir_b");
        fs::create_dir_all(&dir_a).expect("failed to create dir_a");
        fs::create_dir_all(&dir_b).expect("failed to create dir_b");
        create_test_image(&dir_a, "a1.jpg");
        create_test_image(&dir_a, "a2.jpg");
        create_test_image(&dir_a, "a3.jpg");
        create_test_image(&dir_b, "b1.jpg");
        let root = temp_dir.path().to_path_buf();
        (temp_dir, root)
    }

    fn navigator(root: &Path, log_path: Option<PathBuf>) -> Navigator {
        let index = PhotoIndex::scan(root, &[]).expect("scan failed");
        let selector = PhotoSelector::new(index);
        let mut log = ViewingHistory::open(log_path).expect("failed to open history");
        log.new_session("test-session").expect("failed to start session");
        Navigator::new(selector, log)
    }

    /// Keeps jumping until the current photo comes from `rel_dir`.
    fn jump_until_in(nav: &mut Navigator, rel_dir: &str) {
        for _ in 0..200 {
            let photo = nav.jump_random().expect("jump failed");
            if photo.rel_dir() == rel_dir {
                return;
            }
        }
        panic!("never landed in {}", rel_dir);
    }

    #[test]
    fn current_is_none_before_first_navigation() {
        let (_guard, root) = collection();
        let nav = navigator(&root, None);
        assert!(nav.current().is_none());
    }

    #[test]
    fn random_jumps_grow_history_and_stay_at_head() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);

        for _ in 0..5 {
            nav.jump_random().expect("jump failed");
        }

        assert_eq!(nav.history().len(), 5);
        assert_eq!(nav.cursor(), None);
        assert_eq!(nav.queue_len(), 0);
    }

    #[test]
    fn next_with_empty_queue_behaves_like_random_jump() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);

        nav.next().expect("next failed");
        nav.next().expect("next failed");

        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.cursor(), None);
    }

    #[test]
    fn previous_steps_back_and_stops_at_first_photo() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        for _ in 0..3 {
            nav.jump_random().expect("jump failed");
        }

        let second = nav.history()[1].clone();
        let first = nav.history()[0].clone();

        assert_eq!(nav.previous(), Some(&second));
        assert_eq!(nav.cursor(), Some(1));
        assert_eq!(nav.previous(), Some(&first));
        assert_eq!(nav.cursor(), Some(0));

        // Already at the first-ever shown photo.
        assert_eq!(nav.previous(), Some(&first));
        assert_eq!(nav.cursor(), Some(0));
    }

    #[test]
    fn previous_with_single_entry_is_a_noop() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        let shown = nav.jump_random().expect("jump failed").clone();

        assert_eq!(nav.previous(), Some(&shown));
        assert_eq!(nav.cursor(), None);
    }

    #[test]
    fn previous_with_empty_history_returns_none() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        assert_eq!(nav.previous(), None);
    }

    #[test]
    fn forward_step_onto_latest_entry_returns_to_head() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        for _ in 0..3 {
            nav.jump_random().expect("jump failed");
        }
        let latest = nav.history()[2].clone();

        nav.previous();
        nav.previous();
        assert_eq!(nav.cursor(), Some(0));

        nav.next().expect("next failed");
        assert_eq!(nav.cursor(), Some(1));

        let displayed = nav.next().expect("next failed").clone();
        assert_eq!(displayed, latest);
        assert_eq!(nav.cursor(), None);
        // No duplicate history entry, no duplicate log record.
        assert_eq!(nav.history().len(), 3);
        let entries = nav
            .viewing_history()
            .current_session()
            .expect("session missing")
            .entries()
            .len();
        assert_eq!(entries, 3);
    }

    #[test]
    fn queue_directory_shows_files_in_listing_order() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        jump_until_in(&mut nav, "dir_a");

        // The queue must follow filesystem listing order, unsorted.
        let mut expected = Vec::new();
        for entry in fs::read_dir(root.join("dir_a")).expect("failed to list dir_a") {
            let entry = entry.expect("failed to read entry");
            expected.push(entry.file_name().to_string_lossy().into_owned());
        }

        let first = nav
            .queue_current_directory()
            .expect("queue failed")
            .expect("nothing displayed")
            .clone();
        assert_eq!(first.filename(), expected[0]);
        assert_eq!(
            first.display_name(),
            format!("dir_a [1/3] ({})", expected[0])
        );
        assert_eq!(nav.queue_len(), 2);

        let second = nav.next().expect("next failed").clone();
        assert_eq!(second.filename(), expected[1]);
        assert_eq!(
            second.display_name(),
            format!("dir_a [2/3] ({})", expected[1])
        );

        let third = nav.next().expect("next failed").clone();
        assert_eq!(third.filename(), expected[2]);
        assert_eq!(nav.queue_len(), 0);

        // Queue exhausted: the queued photos left the pool, so the next
        // draw can only come from dir_b.
        let fallback = nav.next().expect("next failed");
        assert_eq!(fallback.rel_dir(), "dir_b");
    }

    #[test]
    fn random_jump_abandons_pending_queue() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        jump_until_in(&mut nav, "dir_a");

        nav.queue_current_directory().expect("queue failed");
        assert_eq!(nav.queue_len(), 2);

        nav.jump_random().expect("jump failed");
        assert_eq!(nav.queue_len(), 0);
    }

    #[test]
    fn queue_with_nothing_displayed_is_a_noop() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        let shown = nav.queue_current_directory().expect("queue failed");
        assert!(shown.is_none());
        assert_eq!(nav.queue_len(), 0);
    }

    #[test]
    fn exhausting_the_whole_pool_reports_empty_collection() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);

        jump_until_in(&mut nav, "dir_a");
        nav.queue_current_directory().expect("queue failed");
        nav.next().expect("next failed");
        nav.next().expect("next failed");

        jump_until_in(&mut nav, "dir_b");
        nav.queue_current_directory().expect("queue failed");

        // Every photo has now been queued and shown.
        assert!(matches!(nav.next(), Err(Error::EmptyCollection)));
    }

    #[test]
    fn first_display_of_each_instance_is_logged_once() {
        let (_guard, root) = collection();
        let temp_dir = tempdir().expect("failed to create temp dir");
        let log_path = temp_dir.path().join("viewing_history.txt");
        let mut nav = navigator(&root, Some(log_path.clone()));

        let first = nav.jump_random().expect("jump failed").clone();
        let second = nav.jump_random().expect("jump failed").clone();
        nav.previous();
        nav.next().expect("next failed");

        let content = fs::read_to_string(&log_path).expect("failed to read log");
        let expected = format!(
            "SESSION: test-session\n{}\n{}\n",
            first.rel_path(),
            second.rel_path()
        );
        assert_eq!(content, expected);
    }

    #[test]
    fn failed_log_write_still_surfaces_the_new_photo() {
        let (_guard, root) = collection();
        let log_dir = tempdir().expect("failed to create temp dir");
        let log_parent = log_dir.path().join("logs");
        fs::create_dir_all(&log_parent).expect("failed to create log dir");
        let log_path = log_parent.join("viewing_history.txt");
        let mut nav = navigator(&root, Some(log_path));

        nav.jump_random().expect("jump failed");
        // Writes start failing once the log's directory is gone.
        fs::remove_dir_all(&log_parent).expect("failed to remove log dir");

        let result = nav.jump_random().map(|photo| photo.rel_path());
        assert!(matches!(result, Err(Error::Io(_))));

        // The new photo was still appended and is the one to display.
        assert_eq!(nav.history().len(), 2);
        assert_eq!(nav.cursor(), None);
        let current = nav.current().expect("no current photo");
        assert_eq!(current.rel_path(), nav.history()[1].rel_path());
    }

    #[test]
    fn current_mut_allows_capture_timestamp_annotation() {
        let (_guard, root) = collection();
        let mut nav = navigator(&root, None);
        nav.jump_random().expect("jump failed");

        let timestamp = chrono::NaiveDate::from_ymd_opt(2021, 3, 2)
            .and_then(|d| d.and_hms_opt(9, 15, 0))
            .expect("valid timestamp");
        nav.current_mut()
            .expect("no current photo")
            .set_captured_at(Some(timestamp));

        assert_eq!(
            nav.current().and_then(|photo| photo.captured_at()),
            Some(timestamp)
        );
    }
}
