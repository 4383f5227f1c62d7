//! Integration tests for the crawler
//!
//! These tests drive the public API end to end against in-memory and
//! on-disk corpora.

use snare_crawler::config::{
    load_config, Config, CorpusConfig, CrawlerConfig, FrontierConfig, OutputConfig, PolicyConfig,
};
use snare_crawler::crawler::{run_crawl, CrawlEngine};
use snare_crawler::output::{format_report, write_report};
use snare_crawler::{MemoryFrontier, StaticCorpus, TrapCategory, UrlValidator};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn create_engine(corpus: StaticCorpus, seeds: &[&str], workers: u32) -> CrawlEngine {
    let settings = CrawlerConfig {
        workers,
        ..CrawlerConfig::default()
    };
    CrawlEngine::new(
        &settings,
        Arc::new(corpus),
        Box::new(MemoryFrontier::with_seeds(seeds.iter().copied())),
        UrlValidator::new(&PolicyConfig::for_domains(["*.ics.uci.edu"])),
    )
}

/// A corpus of `pages` pages where page i links to pages 2i+1 and 2i+2,
/// back to the root, and to itself
fn tree_corpus(pages: usize) -> StaticCorpus {
    let mut corpus = StaticCorpus::new();
    for i in 0..pages {
        let mut html = String::from(r#"<a href="/n0">root</a>"#);
        for child in [2 * i + 1, 2 * i + 2] {
            if child < pages {
                html.push_str(&format!(r#"<a href="/n{}">child</a>"#, child));
            }
        }
        html.push_str(&format!(r#"<a href="/n{}">self</a>"#, i));
        corpus.insert(format!("http://t.ics.uci.edu/n{}", i), html);
    }
    corpus
}

#[tokio::test]
async fn test_end_to_end_trap_scenario() {
    let corpus = StaticCorpus::new()
        .with_page(
            "http://x.ics.uci.edu/a",
            r#"<html><body>
            <a href="/b">b</a>
            <a href="b/../../b">b again</a>
            <a href="/b/c/b">loop</a>
            <a href="http://x.ics.uci.edu/c.pdf">paper</a>
            </body></html>"#,
        )
        .with_page("http://x.ics.uci.edu/b", "<p>leaf</p>")
        .with_page("http://x.ics.uci.edu/b/c/b", "<p>loop</p>")
        .with_page("http://x.ics.uci.edu/c.pdf", "%PDF-1.4");

    let engine = create_engine(corpus, &["http://x.ics.uci.edu/a"], 1);
    let state = engine.run().await.unwrap();

    let downloaded: Vec<_> = state.downloaded().iter().cloned().collect();
    assert_eq!(
        downloaded,
        vec!["http://x.ics.uci.edu/a", "http://x.ics.uci.edu/b"]
    );
    assert_eq!(state.out_link_count("http://x.ics.uci.edu/a"), 1);

    assert_eq!(state.trap_count(TrapCategory::RepeatedPathSegment), 1);
    assert!(state.traps()[&TrapCategory::RepeatedPathSegment]
        .contains("http://x.ics.uci.edu/b/c/b"));
    assert_eq!(state.total_traps(), 1);

    // the pdf was filtered without being queued or recorded
    assert!(!engine.has_seen("http://x.ics.uci.edu/c.pdf").await.unwrap());
    assert!(!engine.has_seen("http://x.ics.uci.edu/b/c/b").await.unwrap());
}

#[tokio::test]
async fn test_downloaded_matches_reachable_pages() {
    let state = create_engine(tree_corpus(31), &["http://t.ics.uci.edu/n0"], 1)
        .run()
        .await
        .unwrap();

    let expected: BTreeSet<String> = (0..31)
        .map(|i| format!("http://t.ics.uci.edu/n{}", i))
        .collect();
    assert_eq!(state.downloaded(), &expected);
    assert_eq!(state.subdomain_counts()["t.ics.uci.edu"], 31);

    // each non-root page was accepted exactly once
    let total: u64 = state.out_link_counts().map(|(_, count)| count).sum();
    assert_eq!(total, 30);
    assert_eq!(state.best_page(), Some(("http://t.ics.uci.edu/n0", 2)));
}

#[tokio::test]
async fn test_multiple_workers_agree_with_single_worker() {
    let single = create_engine(tree_corpus(255), &["http://t.ics.uci.edu/n0"], 1)
        .run()
        .await
        .unwrap();
    let pooled = create_engine(tree_corpus(255), &["http://t.ics.uci.edu/n0"], 8)
        .run()
        .await
        .unwrap();

    assert_eq!(single.downloaded(), pooled.downloaded());
    assert_eq!(single.subdomain_counts(), pooled.subdomain_counts());

    let pooled_total: u64 = pooled.out_link_counts().map(|(_, count)| count).sum();
    assert_eq!(pooled_total, 254);
    assert_eq!(pooled.total_traps(), 0);
}

#[tokio::test]
async fn test_query_explosion_trips_after_threshold() {
    let mut corpus = StaticCorpus::new();
    let mut html = String::new();
    for day in 0..160 {
        let url = format!("http://x.ics.uci.edu/calendar?day={}", day);
        html.push_str(&format!(r#"<a href="{}">day</a>"#, url));
        corpus.insert(url, "<p>events</p>");
    }
    corpus.insert("http://x.ics.uci.edu/", html);

    let engine = create_engine(corpus, &["http://x.ics.uci.edu/"], 1);
    let state = engine.run().await.unwrap();

    assert_eq!(state.out_link_count("http://x.ics.uci.edu/"), 150);
    assert_eq!(state.trap_count(TrapCategory::DynamicPageOverflow), 10);
    assert!(state.traps()[&TrapCategory::DynamicPageOverflow]
        .contains("http://x.ics.uci.edu/calendar?day=150"));
    assert_eq!(state.pages_downloaded(), 151);
    assert_eq!(engine.query_visits("x.ics.uci.edu", "/calendar").await, 160);
}

#[tokio::test]
async fn test_long_query_value_is_trap() {
    let long = "a".repeat(31);
    let url = format!("http://x.ics.uci.edu/view?session={}", long);
    let corpus = StaticCorpus::new()
        .with_page(
            "http://x.ics.uci.edu/",
            format!(r#"<a href="{}">s</a><a href="/view?session=short">ok</a>"#, url),
        )
        .with_page(url.clone(), "<p></p>")
        .with_page("http://x.ics.uci.edu/view?session=short", "<p></p>");

    let state = create_engine(corpus, &["http://x.ics.uci.edu/"], 1)
        .run()
        .await
        .unwrap();

    assert!(state.traps()[&TrapCategory::DynamicPageOverflow].contains(&url));
    assert!(state
        .downloaded()
        .contains("http://x.ics.uci.edu/view?session=short"));
}

#[tokio::test]
async fn test_off_domain_and_non_http_links_ignored() {
    let corpus = StaticCorpus::new()
        .with_page(
            "http://www.ics.uci.edu/",
            r#"<a href="http://www.example.com/">x</a>
               <a href="mailto:someone@ics.uci.edu">mail</a>
               <a href="ftp://ftp.ics.uci.edu/pub">ftp</a>
               <a href="/ok">ok</a>"#,
        )
        .with_page("http://www.example.com/", "<p></p>")
        .with_page("mailto:someone@ics.uci.edu", "<p></p>")
        .with_page("ftp://ftp.ics.uci.edu/pub", "<p></p>")
        .with_page("http://www.ics.uci.edu/ok", "<p></p>");

    let state = create_engine(corpus, &["http://www.ics.uci.edu/"], 1)
        .run()
        .await
        .unwrap();

    assert_eq!(state.pages_downloaded(), 2);
    assert_eq!(state.out_link_count("http://www.ics.uci.edu/"), 1);
    assert_eq!(state.total_traps(), 0);
}

#[tokio::test]
async fn test_report_for_finished_crawl() {
    let corpus = StaticCorpus::new()
        .with_page(
            "http://x.ics.uci.edu/a",
            r#"<a href="/b">b</a><a href="/missing">missing</a>"#,
        )
        .with_page("http://x.ics.uci.edu/b", "<p></p>");

    let state = create_engine(corpus, &["http://x.ics.uci.edu/a"], 1)
        .run()
        .await
        .unwrap();
    let report = format_report(&state);

    assert!(report.contains("x.ics.uci.edu: 2\n"));
    assert!(report.contains("http://x.ics.uci.edu/a with 1 out links"));
    assert!(report.contains("Fake URL:\nhttp://x.ics.uci.edu/missing\n"));
    assert!(!report.contains("Repeated path segment"));
}

/// Writes a corpus directory and config file; returns the config path
fn write_site(dir: &Path, database_path: Option<&Path>, max_pages: Option<u64>) -> std::path::PathBuf {
    let corpus_dir = dir.join("corpus");
    fs::create_dir_all(corpus_dir.join("0")).unwrap();
    fs::write(
        corpus_dir.join("bookkeeping.json"),
        r#"{
            "www.ics.uci.edu/": "0/0",
            "www.ics.uci.edu/about": "0/1",
            "www.ics.uci.edu/people": "0/2",
            "www.ics.uci.edu/logo.png": "0/3"
        }"#,
    )
    .unwrap();
    fs::write(
        corpus_dir.join("0/0"),
        r#"<a href="/about">about</a><a href="/people">people</a><a href="/logo.png">logo</a>"#,
    )
    .unwrap();
    fs::write(corpus_dir.join("0/1"), r#"<a href="/">home</a>"#).unwrap();
    fs::write(corpus_dir.join("0/2"), r#"<a href="/people/people">loop</a>"#).unwrap();
    fs::write(corpus_dir.join("0/3"), [0x89, b'P', b'N', b'G']).unwrap();

    let mut toml = format!(
        r#"
[crawler]
workers = 2
{}

[policy]
target-domains = ["*.ics.uci.edu"]

[corpus]
path = "{}"

[frontier]
seeds = ["http://www.ics.uci.edu/"]
{}

[output]
analytics-path = "{}"
"#,
        max_pages
            .map(|max| format!("max-pages = {}", max))
            .unwrap_or_default(),
        corpus_dir.display(),
        database_path
            .map(|path| format!("database-path = \"{}\"", path.display()))
            .unwrap_or_default(),
        dir.join("analytics.txt").display(),
    );
    toml.push('\n');

    let config_path = dir.join("config.toml");
    fs::write(&config_path, toml).unwrap();
    config_path
}

#[tokio::test]
async fn test_crawl_directory_corpus_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = load_config(&write_site(dir.path(), None, None)).unwrap();

    let state = run_crawl(&config, false).await.unwrap();

    assert_eq!(state.pages_downloaded(), 3);
    assert_eq!(state.out_link_count("http://www.ics.uci.edu/"), 2);
    // the loop link is not in the corpus, so it is fake before it is a loop
    assert!(state.traps()[&TrapCategory::FakeUrl].contains("http://www.ics.uci.edu/people/people"));

    let report_path = Path::new(&config.output.analytics_path);
    write_report(&state, report_path).unwrap();
    let report = fs::read_to_string(report_path).unwrap();
    assert!(report.contains("www.ics.uci.edu: 3\n"));
    assert!(!report.contains("logo.png"));
}

#[tokio::test]
async fn test_persistent_frontier_resumes() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("frontier.db");

    let budgeted: Config = load_config(&write_site(dir.path(), Some(&db), Some(1))).unwrap();
    let first = run_crawl(&budgeted, true).await.unwrap();
    assert_eq!(
        first.downloaded().iter().collect::<Vec<_>>(),
        vec!["http://www.ics.uci.edu/"]
    );

    // resume: the seed was already fetched, so only its links remain
    let unbounded: Config = load_config(&write_site(dir.path(), Some(&db), None)).unwrap();
    let second = run_crawl(&unbounded, false).await.unwrap();
    let expected: BTreeSet<String> = [
        "http://www.ics.uci.edu/about".to_string(),
        "http://www.ics.uci.edu/people".to_string(),
    ]
    .into_iter()
    .collect();
    assert_eq!(second.downloaded(), &expected);

    let fresh = run_crawl(&unbounded, true).await.unwrap();
    assert_eq!(fresh.pages_downloaded(), 3);
}

#[tokio::test]
async fn test_stopped_engine_and_missing_corpus() {
    let corpus = tree_corpus(63);
    let engine = create_engine(corpus, &["http://t.ics.uci.edu/n0"], 1);
    engine.stop_handle().stop();

    let state = engine.run().await.unwrap();
    assert_eq!(state.pages_downloaded(), 0);

    let config = Config {
        crawler: CrawlerConfig::default(),
        policy: PolicyConfig::for_domains(["*.ics.uci.edu"]),
        corpus: CorpusConfig {
            path: "unused".to_string(),
            index_file: "bookkeeping.json".to_string(),
        },
        frontier: FrontierConfig {
            seeds: vec!["http://t.ics.uci.edu/n0".to_string()],
            database_path: None,
        },
        output: OutputConfig {
            analytics_path: "unused".to_string(),
        },
    };
    // a missing corpus directory is a startup error, not an empty crawl
    assert!(run_crawl(&config, false).await.is_err());
}
