use crate::corpus::{ContentResolver, FetchResult};
use std::collections::HashMap;

/// In-memory corpus keyed by exact URL
///
/// Handy for embedding a fixed site map and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    pages: HashMap<String, Vec<u8>>,
}

impl StaticCorpus {
    /// Creates an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a page, returning the corpus for chaining
    pub fn with_page(mut self, url: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(url, content);
        self
    }

    /// Adds (or replaces) a page
    pub fn insert(&mut self, url: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.pages.insert(url.into(), content.into());
    }

    /// Number of pages in the corpus
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if the corpus holds no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl ContentResolver for StaticCorpus {
    fn resolve(&self, url: &str) -> FetchResult {
        match self.pages.get(url) {
            Some(content) => FetchResult::found(url, content.clone()),
            None => FetchResult::absent(url),
        }
    }
}
