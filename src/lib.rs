//! Roadmap-Scout: learning roadmaps with curated resources
//!
//! This crate generates a three-level learning roadmap for a topic and attaches
//! articles and videos to each level. Resources come from structured search APIs
//! first, with a headless-browser scrape as a retried fallback.

pub mod config;
pub mod generator;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Roadmap-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roadmap generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("No resources found for topic '{topic}'")]
    NoResources { topic: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors from the external roadmap text generator
///
/// Any of these is fatal to a pipeline run.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to text generator failed: {0}")]
    Transport(String),

    #[error("text generator returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("text generator reported an error: {0}")]
    Api(String),

    #[error("text generator returned no content")]
    EmptyResponse,

    #[error("could not parse text generator response: {0}")]
    Parse(String),
}

/// Errors raised by resource providers
///
/// These never escape the fallback fetcher; they are logged and treated as an
/// empty result.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {message}")]
    Malformed { url: String, message: String },

    #[error("browser session failed: {0}")]
    Browser(String),

    #[error("invalid resource: {0}")]
    InvalidResource(#[from] ResourceError),
}

/// Violations of the resource construction invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource title is empty")]
    EmptyTitle,

    #[error("resource URL '{0}' is not a valid absolute URL")]
    InvalidUrl(String),

    #[error("resource URL scheme '{0}' is not http or https")]
    UnsupportedScheme(String),
}

/// Result type alias for Roadmap-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Level, LevelResourceSet, PipelineResult, Resource, ResourceKind, RoadmapLevels};
pub use pipeline::{FallbackFetcher, LevelAggregator, Orchestrator, RoadmapComposer};
