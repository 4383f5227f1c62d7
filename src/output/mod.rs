//! Output module for crawl reports
//!
//! This module handles:
//! - Rendering the analytics report once a crawl is done
//! - Printing a statistics summary to the console

mod report;
pub mod stats;

pub use report::{format_report, write_report};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
