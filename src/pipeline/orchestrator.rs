//! Top-level pipeline entry points

use crate::config::Config;
use crate::generator::ChatCompletionsGenerator;
use crate::model::{Level, LevelResourceSet, PipelineResult};
use crate::pipeline::{FallbackFetcher, LevelAggregator, RetryPolicy, RoadmapComposer};
use crate::providers::{BrowserScrapeProvider, SearchApiProvider};
use crate::storage::{PersistenceQueue, Storage};
use crate::{Result, ScoutError};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Runs the roadmap composer and the three level aggregators for a topic
///
/// # Run Flow
///
/// 1. Compose the roadmap. A generation failure ends the run before any
///    resource is fetched.
/// 2. Aggregate beginner, intermediate and advanced resources concurrently.
///    Aggregation cannot fail, so neither can this step.
/// 3. Queue every gathered resource for persistence, if a queue is attached,
///    and return without waiting for the write.
pub struct Orchestrator {
    composer: RoadmapComposer,
    aggregator: LevelAggregator,
    persistence: Option<PersistenceQueue>,
}

impl Orchestrator {
    pub fn new(composer: RoadmapComposer, aggregator: LevelAggregator) -> Self {
        Self {
            composer,
            aggregator,
            persistence: None,
        }
    }

    /// Builds the production pipeline: chat-completions generator, search API
    /// provider and browser scraping behind the retry policy from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = ChatCompletionsGenerator::from_config(&config.generator)?;
        let api = SearchApiProvider::from_config(&config.search_api)?;
        let scraper = BrowserScrapeProvider::from_config(&config.scraper);

        let fetcher = FallbackFetcher::new(
            Arc::new(api),
            Arc::new(scraper),
            RetryPolicy::from_config(&config.retry),
        );

        Ok(Self::new(
            RoadmapComposer::new(Arc::new(generator)),
            LevelAggregator::new(Arc::new(fetcher)),
        ))
    }

    /// Attaches a background persistence queue
    pub fn with_persistence(mut self, queue: PersistenceQueue) -> Self {
        self.persistence = Some(queue);
        self
    }

    pub fn composer(&self) -> &RoadmapComposer {
        &self.composer
    }

    pub fn aggregator(&self) -> &LevelAggregator {
        &self.aggregator
    }

    pub async fn run(&self, topic: &str) -> Result<PipelineResult> {
        let roadmap = self.composer.compose(topic).await.map_err(|e| {
            tracing::error!(%topic, error = %e, "Roadmap generation failed");
            ScoutError::Generation(e)
        })?;

        let (beginner, intermediate, advanced) = tokio::join!(
            self.aggregator.aggregate(Level::Beginner, topic),
            self.aggregator.aggregate(Level::Intermediate, topic),
            self.aggregator.aggregate(Level::Advanced, topic),
        );

        let resources = BTreeMap::from([
            (Level::Beginner, beginner),
            (Level::Intermediate, intermediate),
            (Level::Advanced, advanced),
        ]);

        let result = PipelineResult {
            query: topic.to_string(),
            roadmap,
            resources,
        };

        tracing::info!(%topic, resources = result.resource_count(), "Pipeline run complete");

        if let Some(queue) = &self.persistence {
            queue.submit(result.all_resources());
        }

        Ok(result)
    }
}

/// Gathers resources for the bare topic and stores them before returning
///
/// The query is the topic itself, without the level phrasing used by
/// [`Orchestrator::run`]. Unlike a pipeline run, finding nothing is an error
/// here and so is a failed write.
pub async fn collect_topic_resources<S>(
    aggregator: &LevelAggregator,
    store: &mut S,
    topic: &str,
) -> Result<LevelResourceSet>
where
    S: Storage + ?Sized,
{
    let set = aggregator.aggregate_query(topic).await;

    if set.is_empty() {
        tracing::warn!(%topic, "No resources found");
        return Err(ScoutError::NoResources {
            topic: topic.to_string(),
        });
    }

    let batch: Vec<_> = set.iter().cloned().collect();
    let inserted = store.save_resources(&batch)?;
    tracing::info!(%topic, found = batch.len(), inserted, "Topic resources stored");

    Ok(set)
}

/// Query used for roadmap-wide resources, e.g. `"rust roadmap"`
pub fn roadmap_resources_query(topic: &str) -> String {
    format!("{} roadmap", topic)
}

/// Scrapes articles and videos about the roadmap for `topic` itself
///
/// Only the scrape tier runs, through the usual retry loop. An empty set is
/// a normal answer and nothing is stored.
pub async fn collect_roadmap_resources(
    aggregator: &LevelAggregator,
    topic: &str,
) -> LevelResourceSet {
    let query = roadmap_resources_query(topic);
    let set = aggregator.scrape_query(&query).await;
    tracing::info!(
        %topic,
        articles = set.articles().len(),
        videos = set.videos().len(),
        "Roadmap resources gathered"
    );
    set
}
