use serde::Deserialize;
use std::path::PathBuf;

/// Default size of the worker pool
pub const DEFAULT_NUM_WORKERS: i64 = 5;

/// Default per-request timeout in seconds
pub const DEFAULT_CLIENT_TIMEOUT_SECS: i64 = 2;

/// Default User-Agent header sent with every request
pub const DEFAULT_USER_AGENT: &str = "CrawlerBot/0.1";

/// Main configuration structure for Site-Mapper
///
/// Signed integers are used on purpose so that invalid values coming from a
/// file or the command line can be reported instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Absolute http(s) URL the crawl starts from
    #[serde(rename = "seed-url", default)]
    pub seed_url: String,

    /// Number of concurrent workers fetching pages
    #[serde(rename = "num-workers", default = "default_num_workers")]
    pub num_workers: i64,

    /// Time limit (in seconds) for a single HTTP request; 0 means no timeout
    #[serde(rename = "client-timeout", default = "default_client_timeout")]
    pub client_timeout_secs: i64,

    /// File the site map is written to; standard output when unset
    #[serde(rename = "output-file", default)]
    pub output_file: Option<PathBuf>,

    /// User-Agent header for outgoing requests
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Config {
    /// Creates a configuration for `seed_url` with every other setting defaulted
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self {
            seed_url: seed_url.into(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_url: String::new(),
            num_workers: DEFAULT_NUM_WORKERS,
            client_timeout_secs: DEFAULT_CLIENT_TIMEOUT_SECS,
            output_file: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn default_num_workers() -> i64 {
    DEFAULT_NUM_WORKERS
}

fn default_client_timeout() -> i64 {
    DEFAULT_CLIENT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
