pub mod types;

pub use types::{PullRecord, ResolvedPullRequest, Review};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::config::Config;

const PER_PAGE: u32 = 100;
const USER_AGENT: &str = "approval-time";

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),
}

/// List closed pull requests for the configured repository, newest
/// first, walking pages until one comes back empty or a record was
/// created before the configured cutoff date.
#[instrument(skip(client, config), fields(owner = %config.owner, repo = %config.repo))]
pub async fn list_closed_pulls(
    client: &reqwest::Client,
    config: &Config,
) -> Result<Vec<PullRecord>, GithubError> {
    let url = format!(
        "https://api.github.com/repos/{}/{}/pulls",
        config.owner, config.repo
    );

    let mut pulls = Vec::new();
    let mut page = 1u32;
    loop {
        debug!(page, "fetching closed pull requests");
        let per_page = PER_PAGE.to_string();
        let page_param = page.to_string();
        let batch = client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&config.token)
            .query(&[
                ("state", "closed"),
                ("per_page", per_page.as_str()),
                ("page", page_param.as_str()),
                ("sort", "created"),
                ("direction", "desc"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<PullRecord>>()
            .await?;

        if batch.is_empty() {
            break;
        }

        // Results are sorted newest first, so the first record older
        // than the cutoff ends the walk.
        let mut past_cutoff = false;
        for pull in batch {
            if let Some(cutoff) = config.cutoff {
                if pull.created_at.date_naive() < cutoff {
                    past_cutoff = true;
                    break;
                }
            }
            pulls.push(pull);
        }
        if past_cutoff {
            break;
        }

        page += 1;
    }

    info!(count = pulls.len(), "listed closed pull requests");
    Ok(pulls)
}

/// Fetch the instant of the earliest approving review on a pull
/// request, if any.
#[instrument(skip(client, config), fields(pr = number))]
pub async fn approval_time(
    client: &reqwest::Client,
    config: &Config,
    number: u64,
) -> Result<Option<DateTime<Utc>>, GithubError> {
    let url = format!(
        "https://api.github.com/repos/{}/{}/pulls/{}/reviews",
        config.owner, config.repo, number
    );

    let reviews = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .bearer_auth(&config.token)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Review>>()
        .await?;

    let approved_at = reviews
        .iter()
        .filter(|r| r.is_approval())
        .filter_map(|r| r.submitted_at)
        .min();
    debug!(reviews = reviews.len(), approved = approved_at.is_some(), "fetched reviews");
    Ok(approved_at)
}

/// Reduce closed pull requests to resolved ones: merged PRs with a
/// resolution instant, which is the earliest approval time or, for PRs
/// merged without an approving review, the merge time. Closed-but-
/// unmerged PRs are dropped.
pub async fn resolve(
    client: &reqwest::Client,
    config: &Config,
    pulls: Vec<PullRecord>,
) -> Result<Vec<ResolvedPullRequest>, GithubError> {
    let mut resolved = Vec::new();
    for pull in pulls {
        let Some(merged_at) = pull.merged_at else {
            debug!(pr = pull.number, "skipping unmerged pull request");
            continue;
        };

        let resolved_at = match approval_time(client, config, pull.number).await? {
            Some(approved_at) => approved_at,
            None => merged_at,
        };

        resolved.push(ResolvedPullRequest {
            number: pull.number,
            title: pull.title,
            author: pull.user.login,
            created_at: pull.created_at,
            resolved_at,
        });
    }

    info!(count = resolved.len(), "resolved pull requests");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_deserializes_as_pull_records() {
        let fixture = include_str!("../../tests/fixtures/sample_pulls.json");
        let pulls: Vec<PullRecord> = serde_json::from_str(fixture).unwrap();
        assert!(!pulls.is_empty());
        // The fixture deliberately carries one unmerged PR.
        assert!(pulls.iter().any(|p| p.merged_at.is_none()));
        assert!(pulls.iter().any(|p| p.merged_at.is_some()));
    }

    #[test]
    fn test_earliest_approval_wins() {
        let reviews: Vec<Review> = serde_json::from_str(
            r#"[
                { "state": "COMMENTED", "submitted_at": "2023-06-05T09:30:00Z" },
                { "state": "APPROVED", "submitted_at": "2023-06-05T14:00:00Z" },
                { "state": "APPROVED", "submitted_at": "2023-06-05T11:00:00Z" }
            ]"#,
        )
        .unwrap();
        let earliest = reviews
            .iter()
            .filter(|r| r.is_approval())
            .filter_map(|r| r.submitted_at)
            .min()
            .unwrap();
        assert_eq!(earliest.to_rfc3339(), "2023-06-05T11:00:00+00:00");
    }
}
