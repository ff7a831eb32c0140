//! Configuration module for Roadmap-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The resulting [`Config`] is built once at startup and handed to each
//! component's constructor.
//!
//! # Example
//!
//! ```no_run
//! use roadmap_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scout.toml")).unwrap();
//! println!("Scrape attempts: {}", config.retry.max_attempts);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, GeneratorConfig, RetryConfig, ScraperConfig, SearchApiConfig, StorageConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
