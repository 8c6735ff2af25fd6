//! Configuration module for Site-Mapper
//!
//! This module handles loading, parsing, and validating the crawl settings,
//! either from a TOML file or built in code.
//!
//! # Example
//!
//! ```no_run
//! use site_mapper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("site-mapper.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.seed_url, config.num_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DEFAULT_CLIENT_TIMEOUT_SECS, DEFAULT_NUM_WORKERS, DEFAULT_USER_AGENT};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_client_timeout, validate_num_workers, validate_seed_url};
