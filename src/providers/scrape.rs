//! Scrape provider: search page URL, browser render, extraction

use crate::config::ScraperConfig;
use crate::model::{Resource, ResourceKind};
use crate::providers::browser::{random_user_agent, ChromeRenderer, PageRenderer, RenderRequest};
use crate::providers::extract::{extract_resources, ResultMarkup};
use crate::providers::ScrapeProvider;
use crate::ProviderError;
use async_trait::async_trait;
use url::Url;

/// [`ScrapeProvider`] that renders public search pages in a browser
pub struct BrowserScrapeProvider<R = ChromeRenderer> {
    renderer: R,
    config: ScraperConfig,
}

impl BrowserScrapeProvider<ChromeRenderer> {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self::new(ChromeRenderer::new(config.clone()), config.clone())
    }
}

impl<R: PageRenderer> BrowserScrapeProvider<R> {
    pub fn new(renderer: R, config: ScraperConfig) -> Self {
        Self { renderer, config }
    }

    /// Search results URL for `query`
    ///
    /// Articles are searched as `"<query> learning resources"` on the web
    /// search page, videos as `"<query> tutorial"` on the video search page.
    pub fn search_url(&self, query: &str, kind: ResourceKind) -> Result<Url, ProviderError> {
        let (base, param, phrase) = match kind {
            ResourceKind::Article => (
                &self.config.articles_search_url,
                "q",
                format!("{} learning resources", query),
            ),
            ResourceKind::Video => (
                &self.config.videos_search_url,
                "search_query",
                format!("{} tutorial", query),
            ),
        };

        Url::parse_with_params(base, &[(param, phrase.as_str())]).map_err(|e| {
            ProviderError::Malformed {
                url: base.clone(),
                message: e.to_string(),
            }
        })
    }
}

#[async_trait]
impl<R: PageRenderer> ScrapeProvider for BrowserScrapeProvider<R> {
    async fn scrape(&self, query: &str, kind: ResourceKind) -> Result<Vec<Resource>, ProviderError> {
        let url = self.search_url(query, kind)?;
        let markup = ResultMarkup::for_kind(kind);

        tracing::debug!(%url, %kind, "Scraping search results");

        let html = self
            .renderer
            .render(RenderRequest {
                url: url.clone(),
                marker: markup.container,
                user_agent: random_user_agent(),
            })
            .await?;

        let Some(html) = html else {
            return Ok(Vec::new());
        };

        let resources = extract_resources(&html, &url, kind);
        tracing::info!(%kind, count = resources.len(), source = markup.source, "Scraped resources");

        Ok(resources)
    }
}
