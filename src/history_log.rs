// SPDX-License-Identifier: MPL-2.0
//! Durable, session-structured log of viewed photos.
//!
//! The backing store is a plain text file with one record per line. A line
//! starting with `SESSION: ` opens a new session named by the rest of the
//! line; every other non-blank line is the relative path of a viewed photo,
//! recorded under the most recently opened session. Blank lines are skipped
//! on read and never written. The file is opened, appended and closed for
//! each record, so no handle is held between navigation operations.

use crate::error::Result;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Line prefix marking a session boundary in the backing store.
pub const SESSION_PREFIX: &str = "SESSION: ";

/// One run's worth of viewing entries, named by its start time.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    name: String,
    entries: Vec<String>,
}

impl Session {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative paths viewed during this session, in display order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

/// In-memory view of the log plus its optional backing store.
///
/// `path` set to `None` disables persistence: writes become no-ops and the
/// loaded history is empty. Sessions are kept as an explicit ordered list
/// with a direct index to the active one, so nothing depends on map
/// iteration order.
#[derive(Debug)]
pub struct ViewingHistory {
    path: Option<PathBuf>,
    sessions: Vec<Session>,
    current: Option<usize>,
}

impl ViewingHistory {
    /// Opens the viewing history, replaying the backing store if it already
    /// exists. Replay is lenient: blank lines are skipped and a path line
    /// appearing before any session marker is dropped with a warning.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let mut history = Self {
            path,
            sessions: Vec::new(),
            current: None,
        };
        if let Some(path) = history.path.clone() {
            if path.exists() {
                history.replay(&path)?;
            }
        }
        Ok(history)
    }

    /// Registers a new current session and persists its boundary marker.
    ///
    /// A name colliding with an already-loaded session resets that session's
    /// entries and makes it current again; session names stay unique.
    pub fn new_session(&mut self, name: &str) -> Result<()> {
        self.open_session(name);
        self.append_line(&format!("{}{}", SESSION_PREFIX, name))
    }

    /// Appends a viewed relative path to the current session and persists it.
    pub fn add_entry(&mut self, rel_path: &str) -> Result<()> {
        match self.current {
            Some(index) => {
                self.sessions[index].entries.push(rel_path.to_string());
                self.append_line(rel_path)
            }
            None => {
                log::warn!("viewing entry recorded before any session: {}", rel_path);
                Ok(())
            }
        }
    }

    /// All sessions in insertion order, the last one being current.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// The session new entries are appended to.
    pub fn current_session(&self) -> Option<&Session> {
        self.current.and_then(|index| self.sessions.get(index))
    }

    /// Looks up a session by name.
    pub fn session(&self, name: &str) -> Option<&Session> {
        self.sessions.iter().find(|session| session.name == name)
    }

    /// Whether records are written to a backing store.
    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    fn replay(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)?;
        for line in content.lines() {
            if let Some(name) = line.strip_prefix(SESSION_PREFIX) {
                self.open_session(name);
            } else if !line.trim().is_empty() {
                match self.current {
                    Some(index) => self.sessions[index].entries.push(line.to_string()),
                    None => log::warn!("skipping viewing entry outside any session: {}", line),
                }
            }
        }
        Ok(())
    }

    fn open_session(&mut self, name: &str) {
        match self.sessions.iter().position(|session| session.name == name) {
            Some(index) => {
                self.sessions[index].entries.clear();
                self.current = Some(index);
            }
            None => {
                self.sessions.push(Session {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.current = Some(self.sessions.len() - 1);
            }
        }
    }

    fn append_line(&self, line: &str) -> Result<()> {
        if let Some(path) = &self.path {
            let mut file = OpenOptions::new().append(true).create(true).open(path)?;
            writeln!(file, "{}", line)?;
        }
        Ok(())
    }
}
