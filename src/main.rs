mod config;
mod github;
mod report;
mod workhours;

use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use config::{Config, RawConfig};
use github::{PullRecord, ResolvedPullRequest};
use workhours::{working_hours, DailyWindow};

/// approval-time — CLI tool that queries closed pull requests on a
/// GitHub repository and prints each author's average time from PR
/// creation to approval (or merge), counted within working hours.
#[derive(Parser, Debug)]
#[command(name = "approval-time", version, about)]
struct Cli {
    /// Repository in OWNER/REPO form (overrides config and env)
    repo: Option<String>,

    /// Optional output file path for a markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Ignore pull requests created before this date (YYYY-MM-DD)
    #[arg(long)]
    since: Option<NaiveDate>,

    /// Use built-in sample PR data for demo purposes (no GitHub token needed)
    #[arg(long)]
    r#mock: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let (config, resolved) = if cli.r#mock {
        info!("using sample PR data for demo");
        let config = mock_config()?;
        let resolved = build_mock_resolved()?;
        (config, resolved)
    } else {
        let _main_span = info_span!("approval_time").entered();

        info!("loading configuration");
        let config = load_config(&cli)?;

        info!(owner = %config.owner, repo = %config.repo, window = %config.window, "fetching pull requests from GitHub");
        let client = reqwest::Client::new();
        let pulls = github::list_closed_pulls(&client, &config).await?;
        let resolved = github::resolve(&client, &config, pulls).await?;
        (config, resolved)
    };

    info!(resolved = resolved.len(), "computing working-hours durations");
    let durations: Vec<(String, f64)> = resolved
        .into_iter()
        .map(|pr| {
            let hours = working_hours(pr.created_at, pr.resolved_at, &config.window);
            debug!(pr = pr.number, title = %pr.title, author = %pr.author, hours, "computed duration");
            (pr.author, hours)
        })
        .collect();

    let built_report = report::build(durations, &config);
    report::output(&built_report, cli.output.as_deref())?;
    info!(authors = built_report.authors.len(), "done");

    Ok(())
}

/// Load the layered configuration and apply CLI overrides on top.
fn load_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut raw = RawConfig::load()?;

    if let Some(repo_arg) = cli.repo.as_deref() {
        let (owner, repo) = repo_arg
            .split_once('/')
            .filter(|(o, r)| !o.is_empty() && !r.is_empty())
            .ok_or_else(|| format!("Invalid repository {repo_arg:?}, expected OWNER/REPO"))?;
        raw.github.owner = Some(owner.to_string());
        raw.github.repo = Some(repo.to_string());
    }
    if let Some(since) = cli.since {
        raw.cutoff = Some(since);
    }

    Ok(raw.resolve()?)
}

fn mock_config() -> Result<Config, Box<dyn std::error::Error>> {
    Ok(Config {
        token: String::new(),
        owner: "acme".to_string(),
        repo: "widgets".to_string(),
        window: DailyWindow::from_hours(9, 17)?,
        cutoff: None,
    })
}

/// Build resolved pull requests from the embedded sample fixture.
/// Merge time stands in for approval time here; this enables running
/// the full pipeline without a GitHub token.
fn build_mock_resolved() -> Result<Vec<ResolvedPullRequest>, Box<dyn std::error::Error>> {
    let fixture = include_str!("../tests/fixtures/sample_pulls.json");
    let pulls: Vec<PullRecord> = serde_json::from_str(fixture)?;

    Ok(pulls
        .into_iter()
        .filter_map(|pull| {
            let merged_at = pull.merged_at?;
            Some(ResolvedPullRequest {
                number: pull.number,
                title: pull.title,
                author: pull.user.login,
                created_at: pull.created_at,
                resolved_at: merged_at,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_resolved_filters_unmerged() {
        let resolved = build_mock_resolved().unwrap();
        assert!(!resolved.is_empty());
        for pr in &resolved {
            assert!(pr.resolved_at >= pr.created_at);
        }
    }

    #[test]
    fn test_mock_pipeline_end_to_end() {
        let config = mock_config().unwrap();
        let durations: Vec<(String, f64)> = build_mock_resolved()
            .unwrap()
            .into_iter()
            .map(|pr| {
                let hours = working_hours(pr.created_at, pr.resolved_at, &config.window);
                (pr.author, hours)
            })
            .collect();

        let built = report::build(durations, &config);
        // alice: 4h and 2h resolved PRs, bob: one 24h PR, carol unmerged.
        let alice = built.authors.iter().find(|a| a.author == "alice").unwrap();
        assert_eq!(alice.samples, 2);
        assert_eq!(alice.mean_hours, 3.0);
        let bob = built.authors.iter().find(|a| a.author == "bob").unwrap();
        assert_eq!(bob.mean_hours, 24.0);
        assert!(!built.authors.iter().any(|a| a.author == "carol"));
    }
}
