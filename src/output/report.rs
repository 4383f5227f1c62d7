//! Analytics report generation
//!
//! The report has four sections, always in this order:
//!
//! 1. visits per subdomain
//! 2. the page with the most accepted out-links (omitted when there is none)
//! 3. every downloaded URL
//! 4. the trap inventory, one block per category with members

use crate::output::OutputResult;
use crate::policy::TrapCategory;
use crate::state::CrawlState;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the analytics report for a finished crawl
///
/// # Arguments
///
/// * `state` - The final crawl state
/// * `output_path` - Path of the report file; parent directories are created
pub fn write_report(state: &CrawlState, output_path: &Path) -> OutputResult<()> {
    let report = format_report(state);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(output_path)?;
    file.write_all(report.as_bytes())?;

    tracing::info!("Analytics report written to {}", output_path.display());
    Ok(())
}

/// Formats the analytics report
///
/// Read-only over `state`; nothing is recomputed or re-validated.
pub fn format_report(state: &CrawlState) -> String {
    let mut report = String::new();

    report.push_str("1. Subdomains visited and number of URLs processed from each:\n");
    for (subdomain, count) in state.subdomain_counts() {
        report.push_str(&format!("{}: {}\n", subdomain, count));
    }

    if let Some((url, count)) = state.best_page() {
        report.push_str(&format!(
            "\n2. Page with the most valid out links: {} with {} out links\n",
            url, count
        ));
    }

    report.push_str("\n3. Downloaded URLs:\n");
    for url in state.downloaded() {
        report.push_str(url);
        report.push('\n');
    }

    report.push_str("\n4. Identified traps:\n");
    for category in TrapCategory::ALL {
        let Some(urls) = state.traps().get(&category) else {
            continue;
        };
        if urls.is_empty() {
            continue;
        }

        report.push_str(&format!("\n{}:\n", category.label()));
        for url in urls {
            report.push_str(url);
            report.push('\n');
        }
    }

    report
}
