//! Resource acquisition pipeline
//!
//! Leaves first:
//! - [`FallbackFetcher`]: one resource kind, API first, retried scrape second
//! - [`LevelAggregator`]: both kinds for one level, concurrently
//! - [`RoadmapComposer`]: generator text parsed into level buckets
//! - [`Orchestrator`]: the composer, then all three levels concurrently
//!
//! [`RoadmapService`], [`collect_topic_resources`] and
//! [`collect_roadmap_resources`] are the narrower entry points behind the
//! CLI's roadmap-only, resources and roadmap-resources modes.

mod aggregator;
mod composer;
mod fallback;
mod orchestrator;
mod roadmaps;

pub use aggregator::{level_query, LevelAggregator};
pub use composer::{extract_roadmap, parse_roadmap_levels, roadmap_prompt, RoadmapComposer};
pub use fallback::{FallbackFetcher, RetryPolicy};
pub use orchestrator::{
    collect_roadmap_resources, collect_topic_resources, roadmap_resources_query, Orchestrator,
};
pub use roadmaps::RoadmapService;
