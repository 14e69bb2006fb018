//! Back-navigation through a tab's search history
//!
//! The navigator only decides where the tab should go. Issuing the actual
//! navigation is left to the caller so the history store is never touched
//! across an await point.

use backsearch_core::{ActiveTab, NavigateRequest};
use tracing::debug;

use crate::history::HistoryStore;
use crate::matcher::SearchPageMatcher;

/// Result of a back-navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackOutcome {
    /// The tab has no recorded search pages
    NoHistory,
    /// The cursor is already on the oldest entry
    AtBeginning,
    /// The target entry is the page the tab already shows
    AlreadyThere,
    /// The tab should be navigated to the request's url
    Navigate(NavigateRequest),
}

impl BackOutcome {
    pub fn navigate_request(&self) -> Option<&NavigateRequest> {
        match self {
            BackOutcome::Navigate(request) => Some(request),
            _ => None,
        }
    }
}

/// Compute the previous search page for `tab`, moving its cursor
///
/// When the tab currently shows something other than a search page (the user
/// followed a result), the cursor is re-anchored on the most recent search
/// page instead of stepping back, so the first back-step returns to it.
pub fn navigate_back(
    store: &mut HistoryStore,
    matcher: &SearchPageMatcher,
    tab: &ActiveTab,
) -> BackOutcome {
    if !store.has_history(tab.id) {
        debug!(tab_id = %tab.id, "No search history available");
        return BackOutcome::NoHistory;
    }

    if !matcher.is_search_page(&tab.url) {
        store.reset_cursor_to_end(tab.id);
    } else if !store.step_back(tab.id) {
        debug!(tab_id = %tab.id, "Already at the beginning of history");
        return BackOutcome::AtBeginning;
    }

    match store.current_entry(tab.id) {
        Some(target) if target != tab.url => BackOutcome::Navigate(NavigateRequest {
            tab_id: tab.id,
            url: target.to_string(),
        }),
        _ => BackOutcome::AlreadyThere,
    }
}
