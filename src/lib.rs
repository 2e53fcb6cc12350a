// SPDX-License-Identifier: MPL-2.0
//! `lens_hop` is a photo selection & navigation engine for browsing a large
//! photo collection by random hops rather than sequential order.
//!
//! It indexes a directory tree into viewable units, picks photos at random
//! under an exclusion policy, tracks a navigable history and a transient
//! directory queue, and persists a session-structured viewing log that can be
//! reloaded and appended to across runs. Image decoding and on-screen
//! rendering are left to a display collaborator.

pub mod config;
pub mod error;
pub mod history_log;
pub mod index;
pub mod navigation;
pub mod selector;
