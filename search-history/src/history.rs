//! Per-Tab Search History Module
//!
//! Keeps, for every tab, the ordered list of search pages visited and a
//! cursor used by back-navigation.
//!
//! Invariants kept by every operation:
//! - when a tab's list is non-empty its cursor indexes a valid entry
//! - no two consecutive entries are equal
//!
//! Non-adjacent repeats such as `[A, B, A]` are allowed so a user can come
//! back to an earlier search after a detour.

use backsearch_core::TabId;
use serde::Serialize;
use std::collections::HashMap;

use crate::matcher::SearchPageMatcher;

/// Result of offering a url to the history store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The url is not a search page; nothing changed
    NotSearchPage,
    /// The url was appended at `index`
    Appended { index: usize },
    /// The url equals the last entry; only the cursor was reset to `index`
    Duplicate { index: usize },
}

impl RecordOutcome {
    /// Whether the url matched a search page (appended or duplicate)
    pub fn is_search_page(&self) -> bool {
        !matches!(self, RecordOutcome::NotSearchPage)
    }
}

/// Search page history of a single tab
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TabHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl TabHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Current cursor position; meaningful only when the history is non-empty
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry under the cursor
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    /// Append `url` unless it equals the last entry, then move the cursor to the end
    pub fn push(&mut self, url: &str) -> RecordOutcome {
        let appended = self.last() != Some(url);
        if appended {
            self.entries.push(url.to_string());
        }
        self.reset_cursor_to_end();

        if appended {
            RecordOutcome::Appended { index: self.cursor }
        } else {
            RecordOutcome::Duplicate { index: self.cursor }
        }
    }

    /// Move the cursor one entry back; returns false when already at the start
    pub fn step_back(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset_cursor_to_end(&mut self) {
        if let Some(last) = self.entries.len().checked_sub(1) {
            self.cursor = last;
        }
    }
}

/// History store keyed by tab
///
/// Each tab's history is created lazily on its first search page and dropped
/// by [`HistoryStore::forget`] when the tab closes.
#[derive(Debug, Default)]
pub struct HistoryStore {
    histories: HashMap<TabId, TabHistory>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url` for `tab_id` if the matcher classifies it as a search page
    pub fn record_if_search_page(
        &mut self,
        matcher: &SearchPageMatcher,
        tab_id: TabId,
        url: &str,
    ) -> RecordOutcome {
        if !matcher.is_search_page(url) {
            return RecordOutcome::NotSearchPage;
        }

        self.histories.entry(tab_id).or_default().push(url)
    }

    /// Entry under the tab's cursor, if the tab has any history
    pub fn current_entry(&self, tab_id: TabId) -> Option<&str> {
        self.histories.get(&tab_id).and_then(TabHistory::current)
    }

    /// Move the tab's cursor back by one; false if there is nowhere to go
    pub fn step_back(&mut self, tab_id: TabId) -> bool {
        self.histories
            .get_mut(&tab_id)
            .map(TabHistory::step_back)
            .unwrap_or(false)
    }

    pub fn reset_cursor_to_end(&mut self, tab_id: TabId) {
        if let Some(history) = self.histories.get_mut(&tab_id) {
            history.reset_cursor_to_end();
        }
    }

    /// Drop all state for a tab
    pub fn forget(&mut self, tab_id: TabId) -> Option<TabHistory> {
        self.histories.remove(&tab_id)
    }

    pub fn history(&self, tab_id: TabId) -> Option<&TabHistory> {
        self.histories.get(&tab_id)
    }

    /// Whether the tab has at least one recorded search page
    pub fn has_history(&self, tab_id: TabId) -> bool {
        self.histories
            .get(&tab_id)
            .map(|h| !h.is_empty())
            .unwrap_or(false)
    }

    /// Number of tabs with tracked history
    pub fn tab_count(&self) -> usize {
        self.histories.len()
    }
}
