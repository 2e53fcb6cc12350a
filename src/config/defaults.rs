// SPDX-License-Identifier: MPL-2.0
//! Centralized default values and the fixed set of recognized
//! configuration keys.

use std::path::PathBuf;

/// File name of the settings file inside the per-user config directory.
pub const CONFIG_FILE: &str = "settings.toml";

/// Directory name under the per-user config directory.
pub const APP_NAME: &str = "LensHop";

/// Default file name for the viewing-history log.
pub const DEFAULT_HISTORY_FILE: &str = "viewing_history.txt";

/// Timestamp format for session names, second-level resolution.
pub const SESSION_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// The fixed set of keys a settings file may contain. Anything else is
/// rejected at load time.
pub const RECOGNIZED_KEYS: &[&str] = &[
    "photo_root",
    "exclude",
    "history_path",
    "file_manager_cmd",
];

/// Default viewing-history location: `viewing_history.txt` in the working
/// directory, or no persistence when that cannot be determined.
pub fn default_history_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(DEFAULT_HISTORY_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_keys_cover_every_config_field() {
        assert_eq!(RECOGNIZED_KEYS.len(), 4);
        assert!(RECOGNIZED_KEYS.contains(&"photo_root"));
        assert!(RECOGNIZED_KEYS.contains(&"history_path"));
    }

    #[test]
    fn default_history_path_uses_working_directory() {
        let path = default_history_path().expect("working directory unavailable");
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some(DEFAULT_HISTORY_FILE)
        );
    }
}
