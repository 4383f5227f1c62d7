//! Crawl frontier: the queue of URLs still to visit
//!
//! The frontier owns deduplication. Once a URL has been added it is "seen"
//! for the rest of the crawl, and adding it again is a no-op.
//!
//! # Backends
//!
//! - [`MemoryFrontier`]: FIFO queue plus seen set, lost on exit
//! - [`SqliteFrontier`]: persisted, so an interrupted crawl can resume

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryFrontier;
pub use sqlite::SqliteFrontier;

use crate::config::FrontierConfig;
use std::path::Path;
use thiserror::Error;

/// Errors raised by a frontier backend
#[derive(Debug, Error)]
pub enum FrontierError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for frontier operations
pub type FrontierResult<T> = Result<T, FrontierError>;

/// Queue of URLs to crawl with built-in deduplication
pub trait Frontier: Send {
    /// Returns true if at least one URL is waiting
    fn has_next(&self) -> FrontierResult<bool>;

    /// Removes and returns the next URL, in insertion order
    fn next_url(&mut self) -> FrontierResult<Option<String>>;

    /// Queues a URL unless it has been seen before
    ///
    /// Returns true if the URL was newly queued.
    fn add_url(&mut self, url: &str) -> FrontierResult<bool>;

    /// Returns true if the URL was ever added, fetched or not
    fn has_seen(&self, url: &str) -> FrontierResult<bool>;

    /// Number of URLs handed out by `next_url` so far
    fn fetched_count(&self) -> FrontierResult<u64>;

    /// Number of URLs waiting
    fn len(&self) -> FrontierResult<u64>;

    /// Returns true if nothing is waiting
    fn is_empty(&self) -> FrontierResult<bool> {
        Ok(!self.has_next()?)
    }
}

/// Builds the frontier described by the configuration and seeds it
///
/// With a `database-path` the frontier is persistent: `fresh` discards the
/// previous crawl's queue, otherwise unfetched URLs are picked up where they
/// were left. Seeds are added either way; ones already seen are ignored.
pub fn open_frontier(config: &FrontierConfig, fresh: bool) -> FrontierResult<Box<dyn Frontier>> {
    let mut frontier: Box<dyn Frontier> = match &config.database_path {
        Some(path) => {
            let mut sqlite = SqliteFrontier::open(Path::new(path))?;
            if fresh {
                tracing::info!("Clearing persisted frontier at {}", path);
                sqlite.clear()?;
            } else {
                tracing::info!(
                    "Resuming frontier at {}: {} queued, {} fetched",
                    path,
                    sqlite.len()?,
                    sqlite.fetched_count()?
                );
            }
            Box::new(sqlite)
        }
        None => Box::new(MemoryFrontier::new()),
    };

    for seed in &config.seeds {
        frontier.add_url(seed)?;
    }

    Ok(frontier)
}
