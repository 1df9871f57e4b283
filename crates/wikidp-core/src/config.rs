//! Service configuration, loaded once at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_UPSTREAM_URL: &str = "https://wikimedia.org/api/rest_v1";
pub const DEFAULT_USER_AGENT: &str = "wikidp/0.1 (differential privacy pageviews demo)";
pub const DEFAULT_RESULT_LIMIT: usize = 50;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level WikiDP configuration.
///
/// Built once in `main` and shared read-only with every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikidpConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the Wikimedia REST API.
    #[serde(default = "default_upstream_url")]
    pub upstream_base_url: String,
    /// User-Agent sent to the pageviews API.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum number of top articles per request.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    /// Timeout for a single upstream request.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Fixed seed for the per-request noise generator (demos and tests only).
    #[serde(default)]
    pub noise_seed: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.into()
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}
fn default_result_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for WikidpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            upstream_base_url: DEFAULT_UPSTREAM_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            result_limit: DEFAULT_RESULT_LIMIT,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            noise_seed: None,
        }
    }
}

impl WikidpConfig {
    /// Load config from an optional JSON file, then apply environment overrides.
    pub fn load(config_path: &Path) -> Self {
        let mut config = Self::from_file(config_path);
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read a JSON config file. A missing or malformed file yields the defaults.
    pub fn from_file(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    debug!("Ignoring malformed config {}: {}", config_path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Apply overrides from a variable lookup. Unparsable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(url) = lookup("WIKIDP_UPSTREAM_URL").filter(|u| !u.trim().is_empty()) {
            self.upstream_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(agent) = lookup("WIKIDP_USER_AGENT").filter(|a| !a.trim().is_empty()) {
            self.user_agent = agent;
        }
        if let Some(limit) = lookup("WIKIDP_RESULT_LIMIT")
            .and_then(|l| l.parse::<usize>().ok())
            .filter(|l| *l > 0)
        {
            self.result_limit = limit;
        }
        if let Some(secs) = lookup("WIKIDP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
        {
            self.request_timeout_secs = secs;
        }
        if let Some(seed) = lookup("WIKIDP_NOISE_SEED").and_then(|s| s.parse().ok()) {
            self.noise_seed = Some(seed);
        }
    }
}
