//! Link validity and crawler-trap policy
//!
//! Decides from a URL string, and the content resolved for it, whether the
//! crawl should follow it. Rejections either carry a [`TrapCategory`], which
//! the crawl records as evidence, or are routine filtering that leaves no
//! trace in the report.

mod validator;

pub use validator::UrlValidator;

use std::fmt;

/// Kinds of crawler trap the policy recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrapCategory {
    /// Not retrievable, or not printable ASCII
    FakeUrl,

    /// A path or host token appears twice, the signature of a link loop
    RepeatedPathSegment,

    /// One path queried too often, or with suspiciously long parameters
    DynamicPageOverflow,
}

impl TrapCategory {
    /// Every category, in check order
    pub const ALL: [TrapCategory; 3] = [
        TrapCategory::FakeUrl,
        TrapCategory::RepeatedPathSegment,
        TrapCategory::DynamicPageOverflow,
    ];

    /// Human-readable label used in the analytics report
    pub fn label(&self) -> &'static str {
        match self {
            Self::FakeUrl => "Fake URL",
            Self::RepeatedPathSegment => "Repeated path segment (potential loop)",
            Self::DynamicPageOverflow => "Dynamic page or too many queries",
        }
    }
}

impl fmt::Display for TrapCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a URL was not followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Trap evidence, recorded in the report
    Trap(TrapCategory),

    /// Scheme other than http/https
    Scheme,

    /// Could not be parsed, or has no host
    Malformed,

    /// Host outside the target domains
    OffDomain,

    /// Path ends in a denylisted extension
    FileType,
}

/// Outcome of validating one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    /// Returns true if the URL should be followed
    pub fn is_accept(&self) -> bool {
        matches!(self, Self::Accept)
    }

    /// The trap category, if this verdict is trap evidence
    pub fn trap(&self) -> Option<TrapCategory> {
        match self {
            Self::Reject(Rejection::Trap(category)) => Some(*category),
            _ => None,
        }
    }
}

impl From<TrapCategory> for Verdict {
    fn from(category: TrapCategory) -> Self {
        Self::Reject(Rejection::Trap(category))
    }
}

impl From<Rejection> for Verdict {
    fn from(rejection: Rejection) -> Self {
        Self::Reject(rejection)
    }
}
