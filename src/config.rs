use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::api::RetryPolicy;
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
pub const DEFAULT_OUTPUT_ROOT: &str = "./output/api_football/seed";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub year: i32,
    pub output_root: PathBuf,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base: f64,
    pub team_limit: usize,
    pub venue_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_FOOTBALL_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::Config("API_FOOTBALL_KEY environment variable not set".to_string())
            })?;

        let base_url = lookup("BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let output_root = lookup("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT));

        Ok(Self {
            api_key,
            base_url,
            year: parse_or(&lookup, "SEED_YEAR", 2025),
            output_root,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30),
            max_retries: parse_or(&lookup, "MAX_RETRIES", 5),
            backoff_base: parse_or(&lookup, "BACKOFF_BASE", 1.5),
            team_limit: parse_or(&lookup, "TEAM_LIMIT", 5),
            venue_limit: parse_or(&lookup, "VENUE_LIMIT", 5),
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(format!("year={}", self.year))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.backoff_base)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

// Never print the credential.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("year", &self.year)
            .field("output_root", &self.output_root)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff_base", &self.backoff_base)
            .field("team_limit", &self.team_limit)
            .field("venue_limit", &self.venue_limit)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub year: i32,
    pub team_limit: usize,
    pub venue_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            year: 2025,
            team_limit: 5,
            venue_limit: 5,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            year: config.year,
            team_limit: config.team_limit,
            venue_limit: config.venue_limit,
        }
    }
}
