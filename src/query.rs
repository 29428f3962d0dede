//! Catalog query state and its URL serialization

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Default number of catalog rows per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Page sizes offered by the page-size selector
pub const PAGE_SIZE_CHOICES: &[u32] = &[10, 25, 50, 100];

/// Current filter, console and pagination of the catalog listing.
///
/// `page` is always at least 1 and `page_size` always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub filter: String,
    pub console: String,
    page: u32,
    page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl QueryState {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            filter: String::new(),
            console: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Replace the filter text (trimmed) and go back to the first page
    pub fn set_filter(&mut self, text: &str) {
        self.filter = text.trim().to_string();
        self.page = 1;
    }

    /// Replace the console filter and go back to the first page
    pub fn set_console(&mut self, console: &str) {
        self.console = console.to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Replace the page size and go back to the first page
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Query parameters in wire order. Empty filter/console are omitted,
    /// page and page_size are always present.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if !self.filter.is_empty() {
            pairs.push(("q", self.filter.clone()));
        }
        if !self.console.is_empty() {
            pairs.push(("console", self.console.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("page_size", self.page_size.to_string()));
        pairs
    }

    /// Append this state's parameters to `url`'s query string
    pub fn apply_to(&self, url: &mut Url) {
        let pairs = self.query_pairs();
        url.query_pairs_mut().extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
    }

    /// Form-urlencoded query string, e.g. `q=mario&page=1&page_size=50`
    pub fn query_string(&self) -> String {
        Url::parse("http://localhost/")
            .map(|mut url| {
                self.apply_to(&mut url);
                url.query().unwrap_or_default().to_string()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query_string() {
        let query = QueryState::default();
        assert_eq!(query.query_string(), "page=1&page_size=50");
    }

    #[test]
    fn test_query_string_omits_empty_fields() {
        let mut query = QueryState::default();
        query.set_console("SNES");
        assert_eq!(query.query_string(), "console=SNES&page=1&page_size=50");

        query.set_console("");
        query.set_filter("  mario  ");
        assert_eq!(query.query_string(), "q=mario&page=1&page_size=50");

        query.set_console("PS1");
        query.set_page(3);
        assert_eq!(query.query_string(), "q=mario&console=PS1&page=3&page_size=50");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let mut query = QueryState::with_page_size(10);
        query.set_filter("mario & luigi");
        assert_eq!(query.query_string(), "q=mario+%26+luigi&page=1&page_size=10");
    }

    #[test]
    fn test_page_and_size_are_always_present() {
        let states = [
            QueryState::default(),
            QueryState::with_page_size(0),
            {
                let mut q = QueryState::default();
                q.set_filter("x");
                q.set_console("NES");
                q
            },
        ];
        for query in states {
            let keys: Vec<_> = query.query_pairs().into_iter().map(|(k, _)| k).collect();
            assert!(keys.contains(&"page"));
            assert!(keys.contains(&"page_size"));
        }
    }

    #[test]
    fn test_mutations_reset_page() {
        let mut query = QueryState::default();
        query.set_page(4);
        query.set_filter("zelda");
        assert_eq!(query.page(), 1);

        query.set_page(4);
        query.set_console("NES");
        assert_eq!(query.page(), 1);

        query.set_page(4);
        query.set_page_size(25);
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), 25);
    }

    #[test]
    fn test_page_is_clamped() {
        let mut query = QueryState::default();
        query.set_page(0);
        assert_eq!(query.page(), 1);
        query.set_page_size(0);
        assert_eq!(query.page_size(), 1);
    }
}
