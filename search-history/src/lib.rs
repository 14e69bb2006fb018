//! Search History for BackSearch
//!
//! This crate tracks, per browser tab, the search engine result pages a user
//! visited and computes back-steps through them, independent of the
//! browser's own back/forward stack.
//!
//! # Features
//! - Substring-based search page classification with user patterns and exclusions
//! - Per-tab history with consecutive-duplicate suppression and a cursor
//! - Recording of committed main-frame navigations
//! - Back-navigation that re-anchors when the user left the search flow

pub mod matcher;
pub mod history;
pub mod recorder;
pub mod navigator;
pub mod tracker;

pub use matcher::*;
pub use history::*;
pub use recorder::*;
pub use navigator::*;
pub use tracker::*;

// Re-export commonly used types
pub use backsearch_core::*;
