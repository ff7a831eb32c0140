//! Tiered fetching: structured API first, browser scrape with retries second

use crate::config::RetryConfig;
use crate::model::{dedupe_and_cap, Resource, ResourceKind};
use crate::providers::{ApiProvider, ScrapeProvider};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

/// Retry policy for the scrape fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total scrape attempts, including the first
    pub max_attempts: u32,
    /// Fixed delay between consecutive attempts
    pub backoff: Duration,
    /// Optional bound on one whole fallback fetch
    pub deadline: Option<Duration>,
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            backoff: Duration::from_millis(config.backoff_ms),
            deadline: config.fetch_deadline_secs.map(Duration::from_secs),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Per-kind fetcher that prefers the API tier and degrades to scraping
///
/// # Fetch Flow
///
/// 1. Ask the API provider. A non-empty answer is returned as is; the API
///    is never retried.
/// 2. Otherwise scrape, up to `max_attempts` times, sleeping `backoff`
///    between attempts (not after the last one). The first non-empty
///    scrape wins.
/// 3. Still nothing: return an empty list. This is a normal outcome.
///
/// Errors from either tier are logged and treated as empty.
pub struct FallbackFetcher {
    api: Arc<dyn ApiProvider>,
    scraper: Arc<dyn ScrapeProvider>,
    policy: RetryPolicy,
}

impl FallbackFetcher {
    pub fn new(
        api: Arc<dyn ApiProvider>,
        scraper: Arc<dyn ScrapeProvider>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            api,
            scraper,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches at most `kind.cap()` resources for `query`; never fails
    pub async fn fetch_with_fallback(&self, query: &str, kind: ResourceKind) -> Vec<Resource> {
        self.bounded(query, kind, self.fetch_tiered(query, kind)).await
    }

    /// Like [`fetch_with_fallback`](Self::fetch_with_fallback) without the API
    /// tier: only the scrape retry loop runs
    pub async fn fetch_scraped(&self, query: &str, kind: ResourceKind) -> Vec<Resource> {
        self.bounded(query, kind, self.scrape_with_retry(query, kind)).await
    }

    /// Applies the optional deadline, then dedupes and caps
    async fn bounded<F>(&self, query: &str, kind: ResourceKind, fetch: F) -> Vec<Resource>
    where
        F: Future<Output = Vec<Resource>>,
    {
        let resources = match self.policy.deadline {
            Some(limit) => match timeout(limit, fetch).await {
                Ok(resources) => resources,
                Err(_) => {
                    tracing::warn!(
                        %query,
                        %kind,
                        deadline_secs = limit.as_secs(),
                        "Fetch deadline reached, returning no resources"
                    );
                    Vec::new()
                }
            },
            None => fetch.await,
        };

        dedupe_and_cap(resources, kind.cap())
    }

    async fn fetch_tiered(&self, query: &str, kind: ResourceKind) -> Vec<Resource> {
        match self.api.fetch(query, kind).await {
            Ok(resources) if !resources.is_empty() => {
                tracing::debug!(%query, %kind, count = resources.len(), "API returned resources");
                return resources;
            }
            Ok(_) => {
                tracing::info!(%query, %kind, "API returned nothing, falling back to scraping");
            }
            Err(e) => {
                tracing::warn!(%query, %kind, error = %e, "API failed, falling back to scraping");
            }
        }

        self.scrape_with_retry(query, kind).await
    }

    async fn scrape_with_retry(&self, query: &str, kind: ResourceKind) -> Vec<Resource> {
        let attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=attempts {
            match self.scraper.scrape(query, kind).await {
                Ok(resources) if !resources.is_empty() => return resources,
                Ok(_) => {
                    tracing::debug!(%query, %kind, attempt, "Scrape returned nothing");
                }
                Err(e) => {
                    tracing::warn!(%query, %kind, attempt, error = %e, "Scrape attempt failed");
                }
            }

            if attempt < attempts {
                tracing::info!(%query, %kind, next_attempt = attempt + 1, "Retrying scrape");
                sleep(self.policy.backoff).await;
            }
        }

        tracing::info!(%query, %kind, attempts, "No resources found after all scrape attempts");
        Vec::new()
    }
}
