use serde::Deserialize;

/// Extensions of resources that are never worth following
pub const DEFAULT_DENIED_EXTENSIONS: &[&str] = &[
    "css", "js", "bmp", "gif", "jpg", "jpeg", "ico", "png", "tif", "tiff", "mid", "mp2", "mp3",
    "mp4", "wav", "avi", "mov", "mpeg", "ram", "m4v", "mkv", "ogg", "ogv", "pdf", "ps", "eps",
    "tex", "ppt", "pptx", "doc", "docx", "xls", "xlsx", "names", "data", "dat", "exe", "bz2",
    "tar", "msi", "bin", "7z", "psd", "dmg", "iso", "epub", "dll", "cnf", "tgz", "sha1", "thmx",
    "mso", "arff", "rtf", "jar", "csv", "rm", "smil", "wmv", "swf", "wma", "zip", "rar", "gz",
];

/// Main configuration structure for Snare
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub policy: PolicyConfig,
    pub corpus: CorpusConfig,
    pub frontier: FrontierConfig,
    pub output: OutputConfig,
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of concurrent fetch-and-extract workers
    #[serde(default = "default_workers")]
    pub workers: u32,

    /// Stop after this many URLs have been pulled from the frontier
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u64>,

    /// Stop claiming new URLs after this many seconds
    #[serde(rename = "time-limit-secs", default)]
    pub time_limit_secs: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            max_pages: None,
            time_limit_secs: None,
        }
    }
}

/// Link validity and trap-detection policy
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// Domain patterns the crawl is confined to (e.g. "*.ics.uci.edu")
    #[serde(rename = "target-domains")]
    pub target_domains: Vec<String>,

    /// How many distinct queries one host+path may receive before it counts as a trap
    #[serde(rename = "max-query-visits", default = "default_max_query_visits")]
    pub max_query_visits: u32,

    /// Longest tolerated piece of a query string when split on '='
    #[serde(
        rename = "max-query-component-length",
        default = "default_max_query_component_length"
    )]
    pub max_query_component_length: usize,

    /// Path extensions that are never followed (without the leading dot)
    #[serde(rename = "denied-extensions", default = "default_denied_extensions")]
    pub denied_extensions: Vec<String>,
}

impl PolicyConfig {
    /// Builds a policy confined to the given domain patterns, all other knobs at their defaults
    pub fn for_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            target_domains: domains.into_iter().map(Into::into).collect(),
            max_query_visits: default_max_query_visits(),
            max_query_component_length: default_max_query_component_length(),
            denied_extensions: default_denied_extensions(),
        }
    }
}

/// Local corpus configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding the downloaded pages
    pub path: String,

    /// JSON file (relative to `path`) mapping scheme-less URLs to page files
    #[serde(rename = "index-file", default = "default_index_file")]
    pub index_file: String,
}

/// Frontier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FrontierConfig {
    /// URLs the crawl starts from
    pub seeds: Vec<String>,

    /// SQLite file for a resumable frontier; in-memory when absent
    #[serde(rename = "database-path", default)]
    pub database_path: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the plain-text analytics report
    #[serde(rename = "analytics-path")]
    pub analytics_path: String,
}

fn default_workers() -> u32 {
    1
}

fn default_max_query_visits() -> u32 {
    150
}

fn default_max_query_component_length() -> usize {
    30
}

fn default_denied_extensions() -> Vec<String> {
    DEFAULT_DENIED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_index_file() -> String {
    "bookkeeping.json".to_string()
}
