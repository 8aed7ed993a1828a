use regex::{Regex, RegexBuilder};

use crate::app::infrastructure::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub whole_word: bool,
}

/// Byte range `[start, end)` of one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Build the matcher for a query. Literal queries are escaped. Case folding
/// is Unicode-aware; whole-word boundaries only treat ASCII `[0-9A-Za-z_]` as
/// word characters.
fn compile(query: &str, options: SearchOptions) -> Result<Regex> {
    let body = if options.use_regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    let pattern = if options.whole_word {
        format!(r"(?-u:\b)(?:{body})(?-u:\b)")
    } else {
        body
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|e| AppError::InvalidPattern(e.to_string()))
}

/// All non-overlapping occurrences of `query` in `text`, left to right.
///
/// An empty query or missing text yields no matches. Zero-width regex
/// matches are skipped since they cannot be highlighted or navigated to.
pub fn search(text: Option<&str>, query: &str, options: SearchOptions) -> Result<Vec<Match>> {
    let Some(text) = text else {
        return Ok(Vec::new());
    };
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let regex = compile(query, options)?;
    Ok(regex
        .find_iter(text)
        .filter(|m| m.start() != m.end())
        .map(|m| Match { start: m.start(), end: m.end() })
        .collect())
}

/// Last executed search and the cursor into its matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    options: SearchOptions,
    matches: Vec<Match>,
    current: usize,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `query` against `text`. On an invalid pattern the previous query
    /// and matches are left untouched.
    pub fn run(
        &mut self,
        text: Option<&str>,
        query: &str,
        options: SearchOptions,
    ) -> Result<usize> {
        let matches = search(text, query, options)?;
        self.query = query.to_string();
        self.options = options;
        self.matches = matches;
        self.current = 0;
        Ok(self.matches.len())
    }

    /// Move to the next or previous match with wraparound.
    /// Returns `None` when there are no matches.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        let len = self.matches.len();
        if len == 0 {
            return None;
        }
        self.current = match direction {
            Direction::Forward => (self.current + 1) % len,
            Direction::Backward => (self.current + len - 1) % len,
        };
        Some(self.current)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        if self.matches.is_empty() { None } else { Some(self.current) }
    }

    pub fn current_match(&self) -> Option<Match> {
        self.matches.get(self.current).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(case_sensitive: bool, use_regex: bool, whole_word: bool) -> SearchOptions {
        SearchOptions { case_sensitive, use_regex, whole_word }
    }

    #[test]
    fn test_search_case_insensitive_default() {
        let matches = search(Some("foo FOO"), "foo", SearchOptions::default()).unwrap();
        assert_eq!(matches, vec![Match { start: 0, end: 3 }, Match { start: 4, end: 7 }]);
    }

    #[test]
    fn test_search_case_insensitive_folds_unicode() {
        let matches = search(Some("ÉCOLE école"), "école", SearchOptions::default()).unwrap();
        assert_eq!(matches, vec![Match { start: 0, end: 6 }, Match { start: 7, end: 13 }]);

        let greek = Some("ΣΟΦΙΑ σοφια");
        let matches = search(greek, "σοφια", SearchOptions::default()).unwrap();
        assert_eq!(matches.len(), 2);

        let matches = search(Some("ÉCOLE école"), "école", opts(true, false, false)).unwrap();
        assert_eq!(matches, vec![Match { start: 7, end: 13 }]);
    }

    #[test]
    fn test_whole_word_boundaries_are_ascii() {
        let matches = search(Some("naïve na"), "na", opts(false, false, true)).unwrap();
        assert_eq!(matches, vec![Match { start: 0, end: 2 }, Match { start: 7, end: 9 }]);
    }

    #[test]
    fn test_search_case_sensitive() {
        let matches = search(Some("foo FOO"), "FOO", opts(true, false, false)).unwrap();
        assert_eq!(matches, vec![Match { start: 4, end: 7 }]);
    }

    #[test]
    fn test_search_whole_word_requires_boundary() {
        let matches = search(Some("foobar"), "foo", opts(false, false, true)).unwrap();
        assert!(matches.is_empty());

        let matches = search(Some("foo bar foo."), "foo", opts(false, false, true)).unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_search_empty_query_or_text() {
        assert!(search(Some("anything"), "", SearchOptions::default()).unwrap().is_empty());
        assert!(search(None, "foo", SearchOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn test_literal_query_escapes_specials() {
        let matches = search(Some("a.b axb (a.b)"), "a.b", SearchOptions::default()).unwrap();
        assert_eq!(matches, vec![Match { start: 0, end: 3 }, Match { start: 9, end: 12 }]);

        let matches = search(Some("call foo()"), "foo()", SearchOptions::default()).unwrap();
        assert_eq!(matches, vec![Match { start: 5, end: 10 }]);
    }

    #[test]
    fn test_regex_query() {
        let text = Some("line1\nline22\nline");
        let matches = search(text, r"line\d+", opts(false, true, false)).unwrap();
        assert_eq!(matches, vec![Match { start: 0, end: 5 }, Match { start: 6, end: 12 }]);
    }

    #[test]
    fn test_whole_word_with_alternation() {
        let matches = search(Some("cat category dog"), "cat|dog", opts(false, true, true)).unwrap();
        assert_eq!(matches, vec![Match { start: 0, end: 3 }, Match { start: 13, end: 16 }]);
    }

    #[test]
    fn test_invalid_regex() {
        let err = search(Some("text"), "(", opts(false, true, false)).unwrap_err();
        assert!(matches!(err, AppError::InvalidPattern(_)));
    }

    #[test]
    fn test_zero_width_matches_skipped() {
        let matches = search(Some("baa"), "a*", opts(false, true, false)).unwrap();
        assert_eq!(matches, vec![Match { start: 1, end: 3 }]);
    }

    #[test]
    fn test_state_keeps_prior_matches_on_invalid_pattern() {
        let mut state = SearchState::new();
        assert_eq!(state.run(Some("ab ab"), "ab", SearchOptions::default()).unwrap(), 2);
        state.advance(Direction::Forward);

        assert!(state.run(Some("ab ab"), "(", opts(false, true, false)).is_err());
        assert_eq!(state.query(), "ab");
        assert_eq!(state.matches().len(), 2);
        assert_eq!(state.current_index(), Some(1));
    }

    #[test]
    fn test_advance_wraps() {
        let mut state = SearchState::new();
        state.run(Some("x x x"), "x", SearchOptions::default()).unwrap();
        assert_eq!(state.current_index(), Some(0));
        assert_eq!(state.advance(Direction::Forward), Some(1));
        assert_eq!(state.advance(Direction::Forward), Some(2));
        assert_eq!(state.advance(Direction::Forward), Some(0));
        assert_eq!(state.advance(Direction::Backward), Some(2));
        assert_eq!(state.current_match(), Some(Match { start: 4, end: 5 }));
    }

    #[test]
    fn test_advance_without_matches_is_noop() {
        let mut state = SearchState::new();
        state.run(Some("abc"), "", SearchOptions::default()).unwrap();
        assert_eq!(state.advance(Direction::Forward), None);
        assert_eq!(state.advance(Direction::Backward), None);
        assert_eq!(state.current_index(), None);
        assert!(state.is_empty());
    }

    #[test]
    fn test_unicode_offsets_are_bytes() {
        let text = Some("Hello 世界 world");
        let matches = search(text, "world", SearchOptions::default()).unwrap();
        assert_eq!(matches, vec![Match { start: 13, end: 18 }]);
    }
}
