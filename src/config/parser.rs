use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Reads and parses a TOML configuration file without validating it
///
/// Missing keys take their defaults, so a file may hold only the settings it
/// wants to change. Use this when values will still be overridden (for
/// example from the command line) before validation.
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Loads, parses and validates a configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use site_mapper::config::load_config;
///
/// let config = load_config(Path::new("site-mapper.toml")).unwrap();
/// println!("Workers: {}", config.num_workers);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = parse_config(path)?;
    validate(&config)?;
    Ok(config)
}
