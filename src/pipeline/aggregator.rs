//! Per-level resource aggregation

use crate::model::{Level, LevelResourceSet, ResourceKind};
use crate::pipeline::FallbackFetcher;
use std::sync::Arc;

/// Level-scoped query phrasing, e.g. `"beginner level resources for rust"`
pub fn level_query(level: Level, topic: &str) -> String {
    format!("{} level resources for {}", level.as_str(), topic)
}

/// Gathers articles and videos for one roadmap level
///
/// Both kinds are fetched concurrently and independently. Aggregation never
/// fails; a kind nothing was found for is simply empty.
#[derive(Clone)]
pub struct LevelAggregator {
    fetcher: Arc<FallbackFetcher>,
}

impl LevelAggregator {
    pub fn new(fetcher: Arc<FallbackFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn aggregate(&self, level: Level, topic: &str) -> LevelResourceSet {
        let query = level_query(level, topic);
        let set = self.aggregate_query(&query).await;
        tracing::info!(
            %level,
            articles = set.articles().len(),
            videos = set.videos().len(),
            "Level resources gathered"
        );
        set
    }

    /// Fetches both kinds for a query used verbatim
    pub async fn aggregate_query(&self, query: &str) -> LevelResourceSet {
        let (articles, videos) = tokio::join!(
            self.fetcher.fetch_with_fallback(query, ResourceKind::Article),
            self.fetcher.fetch_with_fallback(query, ResourceKind::Video),
        );
        LevelResourceSet::new(articles, videos)
    }

    /// Fetches both kinds for a query by scraping only
    pub async fn scrape_query(&self, query: &str) -> LevelResourceSet {
        let (articles, videos) = tokio::join!(
            self.fetcher.fetch_scraped(query, ResourceKind::Article),
            self.fetcher.fetch_scraped(query, ResourceKind::Video),
        );
        LevelResourceSet::new(articles, videos)
    }
}
