//! Content resolution from a local corpus
//!
//! The crawler never touches the network. Page content comes from a
//! [`ContentResolver`], a pure URL -> bytes lookup. Absence is an ordinary
//! outcome, reported as an empty [`FetchResult`] rather than an error.

mod directory;
mod memory;

pub use directory::DirectoryCorpus;
pub use memory::StaticCorpus;

use thiserror::Error;

/// Errors raised while opening a corpus
///
/// Lookups never fail; only loading the corpus index can.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to read corpus index {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse corpus index {path}: {source}")]
    Index {
        path: String,
        source: serde_json::Error,
    },
}

/// Result type for corpus operations
pub type CorpusResult<T> = Result<T, CorpusError>;

/// Content resolved for a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// The URL exactly as it was requested
    pub url: String,

    /// Raw page bytes, `None` when the URL is not retrievable
    pub content: Option<Vec<u8>>,

    /// Content length in bytes, 0 when not retrievable
    pub size: usize,
}

impl FetchResult {
    /// Builds a result carrying content
    pub fn found(url: impl Into<String>, content: Vec<u8>) -> Self {
        let size = content.len();
        Self {
            url: url.into(),
            content: Some(content),
            size,
        }
    }

    /// Builds the "not retrievable" result
    pub fn absent(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
            size: 0,
        }
    }

    /// Returns true if there is nothing to read for this URL
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Maps a URL to its content
///
/// Implementations must be pure functions of the URL and cheap to call
/// repeatedly; the crawl loop may resolve the same URL more than once.
pub trait ContentResolver: Send + Sync {
    /// Resolves a URL, returning [`FetchResult::absent`] when there is no content
    fn resolve(&self, url: &str) -> FetchResult;
}
