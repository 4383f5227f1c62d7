//! Snare: the traversal engine of a focused web crawler
//!
//! This crate pulls URLs from a frontier, resolves their content from a local
//! corpus, extracts outbound links, filters them through a trap-detection
//! policy, and accumulates crawl analytics.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod frontier;
pub mod output;
pub mod policy;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Snare operations
#[derive(Debug, Error)]
pub enum SnareError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Corpus error: {0}")]
    Corpus(#[from] corpus::CorpusError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Worker task failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for Snare operations
pub type Result<T> = std::result::Result<T, SnareError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use corpus::{ContentResolver, DirectoryCorpus, FetchResult, StaticCorpus};
pub use crawler::{CrawlEngine, StopHandle};
pub use frontier::{Frontier, MemoryFrontier, SqliteFrontier};
pub use policy::{Rejection, TrapCategory, UrlValidator, Verdict};
pub use state::CrawlState;
