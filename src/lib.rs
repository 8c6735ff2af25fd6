//! Site-Mapper: a single-host site graph crawler
//!
//! This crate crawls one web host starting from a seed page and emits a
//! textual edge list (`parent -> child`) describing the site graph. External
//! hosts and media resources are recorded as leaf edges but never fetched.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for a crawl run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to write site map: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Pipeline stage closed unexpectedly: {0}")]
    Pipeline(String),
}

/// Configuration-specific errors
///
/// Every variant is raised before the first pipeline task starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid seed URL: {0}")]
    Url(#[from] UrlError),

    #[error("invalid number of workers: {0} (must be at least 1)")]
    InvalidWorkers(i64),

    #[error("invalid HTTP client timeout: {0} (it must be at least 0, meaning no timeout)")]
    InvalidTimeout(i64),

    #[error("can't create site map output file {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    Invalid(String),

    #[error("invalid URL scheme: only http(s) supported, got {0}")]
    InvalidScheme(String),

    #[error("invalid absolute URL: {0}")]
    NotAbsolute(String),
}

/// Per-page fetch failures
///
/// These never abort a crawl; the page is retired and the error logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

/// Link extraction failure on successfully fetched content
#[derive(Debug, Error)]
#[error("failed to get links: {0}")]
pub struct ExtractError(pub String);

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Crawler, Site};
pub use output::CrawlStats;
pub use url::{parse_absolute_url, parse_url, SiteUrl};
