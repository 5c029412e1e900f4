use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::workhours::{DailyWindow, WindowError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("GitHub token not set (github.token in .approval-time.toml, or GITHUB_TOKEN / GITHUB_ACCESS_TOKEN env var)")]
    MissingToken,

    #[error("Repository owner not set (github.owner, or GITHUB_REPO_OWNER env var)")]
    MissingOwner,

    #[error("Repository name not set (github.repo, or GITHUB_REPO_NAME env var)")]
    MissingRepo,

    #[error("Invalid value for {var}: {value:?} (expected {expected})")]
    InvalidEnv {
        var: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error(transparent)]
    Window(#[from] WindowError),
}

/// Raw on-disk configuration parsed from .approval-time.toml.
/// All fields are optional; environment variables fill the gaps.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub hours: HoursConfig,

    /// Pull requests created before this date are ignored (YYYY-MM-DD).
    pub cutoff: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// GitHub API token. Falls back to GITHUB_TOKEN or GITHUB_ACCESS_TOKEN.
    pub token: Option<String>,
    /// Repository owner. Falls back to GITHUB_REPO_OWNER.
    pub owner: Option<String>,
    /// Repository name. Falls back to GITHUB_REPO_NAME.
    pub repo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HoursConfig {
    /// Whole hour the working day starts (default 7).
    pub start: Option<u32>,
    /// Whole hour the working day ends (default 20).
    pub end: Option<u32>,
}

/// Validated, immutable configuration for one run. Built once at
/// startup; nothing downstream reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub window: DailyWindow,
    pub cutoff: Option<NaiveDate>,
}

const DEFAULT_START_HOUR: u32 = 7;
const DEFAULT_END_HOUR: u32 = 20;

impl RawConfig {
    /// Load raw configuration from .approval-time.toml in the current
    /// directory, or defaults if the file doesn't exist.
    pub fn load() -> Result<RawConfig, ConfigError> {
        let path = Path::new(".approval-time.toml");
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(RawConfig::default())
        }
    }

    /// Load from a specific path (useful for testing).
    pub fn load_from(path: &Path) -> Result<RawConfig, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge environment-variable overrides and validate into a
    /// ready-to-use `Config`. File values win over the environment;
    /// anything still missing or malformed is a descriptive error.
    pub fn resolve(self) -> Result<Config, ConfigError> {
        let token = self
            .github
            .token
            .or_else(|| env_var("GITHUB_TOKEN"))
            .or_else(|| env_var("GITHUB_ACCESS_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;
        let owner = self
            .github
            .owner
            .or_else(|| env_var("GITHUB_REPO_OWNER"))
            .ok_or(ConfigError::MissingOwner)?;
        let repo = self
            .github
            .repo
            .or_else(|| env_var("GITHUB_REPO_NAME"))
            .ok_or(ConfigError::MissingRepo)?;

        let start_hour = match self.hours.start {
            Some(h) => h,
            None => env_hour("WORKING_HOURS_START")?.unwrap_or(DEFAULT_START_HOUR),
        };
        let end_hour = match self.hours.end {
            Some(h) => h,
            None => env_hour("WORKING_HOURS_END")?.unwrap_or(DEFAULT_END_HOUR),
        };
        let window = DailyWindow::from_hours(start_hour, end_hour)?;

        let cutoff = match self.cutoff {
            Some(date) => Some(date),
            None => env_date("LATEST_DATE")?,
        };

        Ok(Config {
            token,
            owner,
            repo,
            window,
            cutoff,
        })
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_hour(var: &'static str) -> Result<Option<u32>, ConfigError> {
    match env_var(var) {
        None => Ok(None),
        Some(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var,
                value,
                expected: "an hour between 0 and 23",
            }),
    }
}

fn env_date(var: &'static str) -> Result<Option<NaiveDate>, ConfigError> {
    match env_var(var) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(&value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                var,
                value,
                expected: "a date in YYYY-MM-DD format",
            }),
    }
}
