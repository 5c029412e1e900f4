use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A closed pull request as returned by the GitHub pulls endpoint,
/// reduced to the fields this tool reads. Validated once at the API
/// boundary; everything downstream works with typed instants.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRecord {
    pub number: u64,
    pub title: String,
    pub user: User,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
}

/// A single review on a pull request. An approval is a review whose
/// state is APPROVED; GitHub omits submitted_at on pending reviews.
#[derive(Debug, Clone, Deserialize)]
pub struct Review {
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Review {
    pub fn is_approval(&self) -> bool {
        self.state == "APPROVED"
    }
}

/// A pull request that reached approval or merge, carrying the two
/// instants the working-hours calculator consumes.
#[derive(Debug, Clone)]
pub struct ResolvedPullRequest {
    pub number: u64,
    pub title: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: DateTime<Utc>,
}
