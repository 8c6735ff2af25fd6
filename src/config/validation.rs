use crate::config::types::Config;
use crate::url::{parse_absolute_url, SiteUrl};
use crate::ConfigError;
use std::time::Duration;

/// Validates the entire configuration
///
/// Checks run in a fixed order (seed URL, worker count, timeout) and the
/// first failure is returned. Opening the output sink is the last step of
/// validation and happens when the crawler is built.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seed_url(&config.seed_url)?;
    validate_num_workers(config.num_workers)?;
    validate_client_timeout(config.client_timeout_secs)?;
    Ok(())
}

/// Parses the seed, which must be an absolute http(s) URL
pub fn validate_seed_url(seed_url: &str) -> Result<SiteUrl, ConfigError> {
    Ok(parse_absolute_url(seed_url)?)
}

/// Validates the worker pool size, returning it as a count
pub fn validate_num_workers(num_workers: i64) -> Result<usize, ConfigError> {
    if num_workers < 1 {
        return Err(ConfigError::InvalidWorkers(num_workers));
    }
    usize::try_from(num_workers).map_err(|_| ConfigError::InvalidWorkers(num_workers))
}

/// Validates the client timeout; `Ok(None)` means no timeout
pub fn validate_client_timeout(seconds: i64) -> Result<Option<Duration>, ConfigError> {
    match seconds {
        s if s < 0 => Err(ConfigError::InvalidTimeout(s)),
        0 => Ok(None),
        s => Ok(Some(Duration::from_secs(s as u64))),
    }
}
