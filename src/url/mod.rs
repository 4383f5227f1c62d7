//! URL handling module for Snare
//!
//! String-level helpers the crawl policy is built from: host extraction,
//! domain-scope matching, and the structural checks used for trap detection.
//! None of these normalise a URL; crawl bookkeeping compares URLs by exact
//! string equality.

mod domain;
mod matcher;
mod segments;

pub use domain::{extract_host, host_of, strip_scheme};
pub use matcher::{matches_wildcard, DomainScope};
pub use segments::{
    has_denied_extension, has_repeated_segment, is_printable_ascii, query_components,
    strip_path_params,
};
