use crate::workhours::DailyWindow;

/// Per-author average over that author's resolved pull requests.
/// Only authors with at least one sample are represented, so
/// `mean_hours` is always a mean over n >= 1.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorStats {
    pub author: String,
    pub samples: usize,
    pub mean_hours: f64,
}

/// Complete per-author report for one repository run.
#[derive(Debug)]
pub struct Report {
    pub owner: String,
    pub repo: String,
    pub window: DailyWindow,
    pub pull_requests: usize,
    pub authors: Vec<AuthorStats>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_stats_fields() {
        let stats = AuthorStats {
            author: "alice".to_string(),
            samples: 2,
            mean_hours: 3.0,
        };
        assert_eq!(stats.author, "alice");
        assert_eq!(stats.samples, 2);
        assert_eq!(stats.mean_hours, 3.0);
    }
}
