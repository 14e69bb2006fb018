//! Navigation recording
//!
//! The only passive write path into the history store: committed main-frame
//! navigations are offered to the store, sub-frame navigations are dropped.

use backsearch_core::NavigationEvent;
use tracing::debug;

use crate::history::{HistoryStore, RecordOutcome};
use crate::matcher::SearchPageMatcher;

/// What the recorder did with a navigation event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Navigation happened in a sub-frame
    SubFrame,
    /// Navigation was offered to the history store
    Recorded(RecordOutcome),
}

impl NavigationOutcome {
    /// Whether a new entry was appended to the tab's history
    pub fn appended(&self) -> bool {
        matches!(
            self,
            NavigationOutcome::Recorded(RecordOutcome::Appended { .. })
        )
    }
}

/// Record a committed navigation
pub fn record_navigation(
    store: &mut HistoryStore,
    matcher: &SearchPageMatcher,
    event: &NavigationEvent,
) -> NavigationOutcome {
    if !event.frame_id.is_top_level() {
        return NavigationOutcome::SubFrame;
    }

    let outcome = store.record_if_search_page(matcher, event.tab_id, &event.url);
    if let RecordOutcome::Appended { index } = outcome {
        debug!(tab_id = %event.tab_id, index, "Added search page: {}", event.url);
    }

    NavigationOutcome::Recorded(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use backsearch_core::{FrameId, TabId};

    const SEARCH: &str = "https://duckduckgo.com/?q=rust";

    #[test]
    fn test_sub_frame_navigation_ignored() {
        let mut store = HistoryStore::new();
        let matcher = SearchPageMatcher::new();
        let event = NavigationEvent::new(TabId(1), SEARCH, FrameId(5));

        let outcome = record_navigation(&mut store, &matcher, &event);

        assert_eq!(outcome, NavigationOutcome::SubFrame);
        assert!(!store.has_history(TabId(1)));
    }

    #[test]
    fn test_top_level_search_page_recorded() {
        let mut store = HistoryStore::new();
        let matcher = SearchPageMatcher::new();

        let outcome =
            record_navigation(&mut store, &matcher, &NavigationEvent::top_level(TabId(1), SEARCH));

        assert!(outcome.appended());
        assert_eq!(store.current_entry(TabId(1)), Some(SEARCH));
    }

    #[test]
    fn test_top_level_non_search_page() {
        let mut store = HistoryStore::new();
        let matcher = SearchPageMatcher::new();
        let event = NavigationEvent::top_level(TabId(1), "https://example.com/");

        let outcome = record_navigation(&mut store, &matcher, &event);

        assert_eq!(
            outcome,
            NavigationOutcome::Recorded(RecordOutcome::NotSearchPage)
        );
        assert!(!outcome.appended());
    }
}
