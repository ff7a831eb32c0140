//! Resource providers
//!
//! Two tiers produce resources for a `(query, kind)` pair:
//! - [`ApiProvider`]: structured search APIs, cheap and preferred
//! - [`ScrapeProvider`]: headless-browser scraping of public search pages
//!
//! Both report failures as [`ProviderError`]; callers treat an error exactly
//! like an empty result.

mod api;
mod browser;
mod extract;
mod scrape;

pub use api::{build_http_client, SearchApiProvider};
pub use browser::{
    random_user_agent, ChromeLauncher, ChromeRenderer, ChromeSession, PageRenderer, RenderRequest,
    RenderSession, SessionLauncher, SessionRenderer, USER_AGENTS,
};
pub use extract::{extract_resources, ResultMarkup};
pub use scrape::BrowserScrapeProvider;

use crate::model::{Resource, ResourceKind};
use crate::ProviderError;
use async_trait::async_trait;

/// Structured search endpoint for articles and videos
#[async_trait]
pub trait ApiProvider: Send + Sync {
    /// Returns up to [`ResourceKind::Article`]'s cap of articles
    async fn fetch_articles(&self, query: &str) -> Result<Vec<Resource>, ProviderError>;

    /// Returns up to [`ResourceKind::Video`]'s cap of videos
    async fn fetch_videos(&self, query: &str) -> Result<Vec<Resource>, ProviderError>;

    /// Dispatches on `kind`
    async fn fetch(&self, query: &str, kind: ResourceKind) -> Result<Vec<Resource>, ProviderError> {
        match kind {
            ResourceKind::Article => self.fetch_articles(query).await,
            ResourceKind::Video => self.fetch_videos(query).await,
        }
    }
}

/// Browser-driven extraction of resources from a search results page
#[async_trait]
pub trait ScrapeProvider: Send + Sync {
    /// One scrape attempt. A timeout or missing results marker yields
    /// `Ok(vec![])`, not an error.
    async fn scrape(&self, query: &str, kind: ResourceKind) -> Result<Vec<Resource>, ProviderError>;
}
