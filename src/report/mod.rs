pub mod types;

pub use types::{AuthorStats, Report};

use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report file: {0}")]
    FileWrite(#[from] std::io::Error),
}

/// Group working durations by author and compute each author's mean.
/// Rows come back sorted by author login for deterministic output; the
/// mean itself does not depend on input order.
pub fn aggregate(durations: impl IntoIterator<Item = (String, f64)>) -> Vec<AuthorStats> {
    let mut by_author: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (author, hours) in durations {
        by_author.entry(author).or_default().push(hours);
    }

    by_author
        .into_iter()
        .map(|(author, samples)| {
            let mean_hours = samples.iter().sum::<f64>() / samples.len() as f64;
            AuthorStats {
                author,
                samples: samples.len(),
                mean_hours,
            }
        })
        .collect()
}

/// Build a Report from per-PR durations and run metadata.
pub fn build(durations: Vec<(String, f64)>, config: &Config) -> Report {
    let pull_requests = durations.len();
    Report {
        owner: config.owner.clone(),
        repo: config.repo.clone(),
        window: config.window,
        pull_requests,
        authors: aggregate(durations),
    }
}

/// Output the report to terminal (default) or to a markdown file.
#[instrument(skip(report), fields(authors = report.authors.len()))]
pub fn output(report: &Report, output_path: Option<&Path>) -> Result<(), ReportError> {
    match output_path {
        None => {
            debug!("writing report to terminal");
            print_terminal_report(report);
            Ok(())
        }
        Some(path) => {
            debug!(path = %path.display(), "writing report to file");
            write_markdown_report(report, path)
        }
    }
}

/// Format fractional hours as truncated whole hours, minutes, seconds.
pub fn format_hms(hours: f64) -> String {
    let total_seconds = (hours.max(0.0) * 3600.0) as u64;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    format!("{h} hours {m} minutes {s} seconds")
}

fn print_terminal_report(report: &Report) {
    println!();
    println!(
        "Repository: {}/{} | Window: {} ({} h/day) | Resolved PRs: {}",
        report.owner,
        report.repo,
        report.window,
        report.window.length_hours(),
        report.pull_requests
    );
    println!();

    println!("═══ Average approval time by author ═══");
    if report.authors.is_empty() {
        println!("  No resolved pull requests.");
    } else {
        for stats in &report.authors {
            println!(
                "  {} — {} ({} {})",
                stats.author.cyan().bold(),
                format_hms(stats.mean_hours).green(),
                stats.samples,
                if stats.samples == 1 { "PR" } else { "PRs" }
            );
        }
    }
    println!();
}

fn write_markdown_report(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut md = String::new();
    md.push_str(&format!(
        "# Average approval time: {}/{}\n\n",
        report.owner, report.repo
    ));
    md.push_str(&format!(
        "**Window:** {} | **Resolved PRs:** {}\n\n",
        report.window, report.pull_requests
    ));

    if report.authors.is_empty() {
        md.push_str("No resolved pull requests.\n");
    } else {
        md.push_str("| Author | Average approval time | PRs |\n");
        md.push_str("|--------|-----------------------|-----|\n");
        for stats in &report.authors {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                stats.author,
                format_hms(stats.mean_hours),
                stats.samples
            ));
        }
    }

    std::fs::write(path, md)?;
    Ok(())
}
