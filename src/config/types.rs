use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Roadmap-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub generator: GeneratorConfig,
    #[serde(rename = "search-api", default)]
    pub search_api: SearchApiConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    pub storage: StorageConfig,
}

/// Roadmap text generator (chat-completions endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Full chat-completions URL
    #[serde(default = "default_generator_endpoint")]
    pub endpoint: String,

    /// Bearer credential sent with every request
    #[serde(rename = "api-key")]
    pub api_key: String,

    /// Model identifier passed in the request body
    #[serde(default = "default_model")]
    pub model: String,

    #[serde(rename = "timeout-secs", default = "default_generator_timeout")]
    pub timeout_secs: u64,
}

/// Structured search APIs for articles and videos
#[derive(Debug, Clone, Deserialize)]
pub struct SearchApiConfig {
    #[serde(rename = "articles-endpoint", default = "default_articles_endpoint")]
    pub articles_endpoint: String,

    #[serde(rename = "videos-endpoint", default = "default_videos_endpoint")]
    pub videos_endpoint: String,

    #[serde(rename = "google-api-key", default)]
    pub google_api_key: Option<String>,

    /// Custom search engine id
    #[serde(rename = "google-cx", default)]
    pub google_cx: Option<String>,

    #[serde(rename = "youtube-api-key", default)]
    pub youtube_api_key: Option<String>,

    /// Base URL used to synthesize video links from video ids
    #[serde(rename = "video-watch-url", default = "default_video_watch_url")]
    pub video_watch_url: String,

    #[serde(rename = "timeout-secs", default = "default_search_timeout")]
    pub timeout_secs: u64,
}

impl Default for SearchApiConfig {
    fn default() -> Self {
        Self {
            articles_endpoint: default_articles_endpoint(),
            videos_endpoint: default_videos_endpoint(),
            google_api_key: None,
            google_cx: None,
            youtube_api_key: None,
            video_watch_url: default_video_watch_url(),
            timeout_secs: default_search_timeout(),
        }
    }
}

/// Headless browser scraping fallback
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    #[serde(rename = "articles-search-url", default = "default_articles_search_url")]
    pub articles_search_url: String,

    #[serde(rename = "videos-search-url", default = "default_videos_search_url")]
    pub videos_search_url: String,

    #[serde(
        rename = "navigation-timeout-secs",
        default = "default_navigation_timeout"
    )]
    pub navigation_timeout_secs: u64,

    /// Bounded wait for the results marker to appear
    #[serde(rename = "marker-timeout-secs", default = "default_marker_timeout")]
    pub marker_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(rename = "chrome-executable", default)]
    pub chrome_executable: Option<String>,
}

impl ScraperConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn marker_timeout(&self) -> Duration {
        Duration::from_secs(self.marker_timeout_secs)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            articles_search_url: default_articles_search_url(),
            videos_search_url: default_videos_search_url(),
            navigation_timeout_secs: default_navigation_timeout(),
            marker_timeout_secs: default_marker_timeout(),
            headless: true,
            chrome_executable: None,
        }
    }
}

/// Scrape retry policy
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total scrape attempts per (query, kind)
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between consecutive scrape attempts (milliseconds)
    #[serde(rename = "backoff-ms", default = "default_backoff_ms")]
    pub backoff_ms: u64,

    /// Optional upper bound on one fallback fetch; unset means no deadline
    #[serde(rename = "fetch-deadline-secs", default)]
    pub fetch_deadline_secs: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
            fetch_deadline_secs: None,
        }
    }
}

/// Resource store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

fn default_generator_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek/deepseek-r1-distill-llama-70b:free".to_string()
}

fn default_generator_timeout() -> u64 {
    120
}

fn default_articles_endpoint() -> String {
    "https://www.googleapis.com/customsearch/v1".to_string()
}

fn default_videos_endpoint() -> String {
    "https://www.googleapis.com/youtube/v3/search".to_string()
}

fn default_video_watch_url() -> String {
    "https://www.youtube.com/watch".to_string()
}

fn default_search_timeout() -> u64 {
    15
}

fn default_articles_search_url() -> String {
    "https://www.google.com/search".to_string()
}

fn default_videos_search_url() -> String {
    "https://www.youtube.com/results".to_string()
}

fn default_navigation_timeout() -> u64 {
    60
}

fn default_marker_timeout() -> u64 {
    15
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    2000
}
