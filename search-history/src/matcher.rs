//! Search Page Matcher Module
//!
//! Classifies urls as search engine result pages using plain substring
//! containment against a built-in pattern list and user-supplied patterns.
//! Exclusions always win over inclusions.

use backsearch_core::Settings;

/// Built-in search engine url patterns, kept in lexicographic order
pub const DEFAULT_PATTERNS: [&str; 20] = [
    "ask.com",
    "baidu.com/s",
    "bing.com/search",
    "creativecommons.org/search",
    "dogpile.com",
    "duckduckgo.com",
    "ecosia.org",
    "gibiru.com",
    "google.com/search",
    "mojeek.com",
    "search.aol.com",
    "search.brave.com",
    "search.com",
    "search.naver.com/search.naver",
    "search.yahoo.com",
    "searxng.org",
    "startpage.com",
    "swisscows.com",
    "webcrawler.com",
    "yandex.com/search",
];

/// Search page matcher
///
/// Matching is case-sensitive and performs no url normalization.
#[derive(Debug, Clone, Default)]
pub struct SearchPageMatcher {
    custom_patterns: Vec<String>,
    exclude_domains: Vec<String>,
}

impl SearchPageMatcher {
    /// Create a matcher that only knows the built-in patterns
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher from the user's settings
    pub fn with_settings(settings: &Settings) -> Self {
        let mut matcher = Self::new();
        matcher.apply_settings(settings);
        matcher
    }

    /// Replace custom patterns and exclusions with the ones in `settings`
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.custom_patterns = settings.custom_search_patterns.clone();
        self.exclude_domains = settings.exclude_domains.clone();
    }

    pub fn custom_patterns(&self) -> &[String] {
        &self.custom_patterns
    }

    pub fn exclude_domains(&self) -> &[String] {
        &self.exclude_domains
    }

    /// Iterate over built-in patterns followed by custom patterns
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        DEFAULT_PATTERNS
            .iter()
            .copied()
            .chain(self.custom_patterns.iter().map(String::as_str))
    }

    /// Check if a url contains any excluded substring
    pub fn is_excluded(&self, url: &str) -> bool {
        self.exclude_domains
            .iter()
            .any(|domain| url.contains(domain.as_str()))
    }

    /// Check if a url is a search engine result page
    pub fn is_search_page(&self, url: &str) -> bool {
        if self.is_excluded(url) {
            return false;
        }
        self.patterns().any(|pattern| url.contains(pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(patterns: &[&str], excluded: &[&str]) -> Settings {
        Settings {
            custom_search_patterns: patterns.iter().map(|s| s.to_string()).collect(),
            exclude_domains: excluded.iter().map(|s| s.to_string()).collect(),
            ..Settings::default()
        }
    }

    #[test]
    fn test_default_patterns_sorted() {
        let mut sorted = DEFAULT_PATTERNS;
        sorted.sort_unstable();
        assert_eq!(sorted, DEFAULT_PATTERNS);
    }

    #[test]
    fn test_builtin_search_pages() {
        let matcher = SearchPageMatcher::new();
        assert!(matcher.is_search_page("https://www.google.com/search?q=rust"));
        assert!(matcher.is_search_page("https://duckduckgo.com/?q=rust"));
        assert!(matcher.is_search_page("https://search.brave.com/search?q=tokio"));
        assert!(!matcher.is_search_page("https://example.com/result"));
        assert!(!matcher.is_search_page(""));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let matcher = SearchPageMatcher::new();
        assert!(!matcher.is_search_page("https://WWW.GOOGLE.COM/SEARCH?q=x"));
    }

    #[test]
    fn test_custom_patterns_extend_builtins() {
        let matcher = SearchPageMatcher::with_settings(&settings(&["kagi.com/search"], &[]));
        assert!(matcher.is_search_page("https://kagi.com/search?q=rust"));
        assert!(matcher.is_search_page("https://bing.com/search?q=rust"));
        assert_eq!(matcher.patterns().count(), DEFAULT_PATTERNS.len() + 1);
    }

    #[test]
    fn test_exclusion_overrides_builtin_pattern() {
        let matcher = SearchPageMatcher::with_settings(&settings(&[], &["duckduckgo.com"]));
        assert!(matcher.is_excluded("https://duckduckgo.com/?q=rust"));
        assert!(!matcher.is_search_page("https://duckduckgo.com/?q=rust"));
        assert!(matcher.is_search_page("https://google.com/search?q=rust"));
    }

    #[test]
    fn test_exclusion_overrides_custom_pattern() {
        let matcher =
            SearchPageMatcher::with_settings(&settings(&["intranet/find"], &["intranet"]));
        assert!(!matcher.is_search_page("https://intranet/find?q=x"));
    }

    #[test]
    fn test_empty_exclusions_never_exclude() {
        let matcher = SearchPageMatcher::new();
        assert!(!matcher.is_excluded("https://google.com/search?q=x"));
        assert!(!matcher.is_excluded(""));
    }

    #[test]
    fn test_apply_settings_replaces_previous() {
        let mut matcher = SearchPageMatcher::with_settings(&settings(&["a.test"], &["b.test"]));
        matcher.apply_settings(&settings(&["c.test"], &[]));
        assert_eq!(matcher.custom_patterns(), ["c.test".to_string()]);
        assert!(matcher.exclude_domains().is_empty());
        assert!(!matcher.is_search_page("https://a.test/"));
    }
}
