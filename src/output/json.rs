//! Caller-facing JSON rendering
//!
//! The shape is:
//!
//! ```text
//! { query, roadmap: {beginner, intermediate, advanced: [string]},
//!   resources: {beginner|intermediate|advanced: {articles: [{title, url}], videos: [{title, url}]}} }
//! ```
//!
//! Only `title` and `url` of each resource are exposed.

use crate::model::{Level, LevelResourceSet, PipelineResult, Resource, RoadmapLevels};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct PipelineView<'a> {
    query: &'a str,
    roadmap: &'a RoadmapLevels,
    resources: BTreeMap<Level, LevelView<'a>>,
}

#[derive(Debug, Serialize)]
struct LevelView<'a> {
    articles: Vec<ResourceView<'a>>,
    videos: Vec<ResourceView<'a>>,
}

#[derive(Debug, Serialize)]
struct RoadmapResourcesView<'a> {
    topic: &'a str,
    roadmap: LevelView<'a>,
}

#[derive(Debug, Serialize)]
struct ResourceView<'a> {
    title: &'a str,
    url: &'a str,
}

impl<'a> From<&'a Resource> for ResourceView<'a> {
    fn from(resource: &'a Resource) -> Self {
        Self {
            title: resource.title(),
            url: resource.url().as_str(),
        }
    }
}

impl<'a> From<&'a LevelResourceSet> for LevelView<'a> {
    fn from(set: &'a LevelResourceSet) -> Self {
        Self {
            articles: set.articles().iter().map(ResourceView::from).collect(),
            videos: set.videos().iter().map(ResourceView::from).collect(),
        }
    }
}

/// Builds the caller-facing JSON value for a pipeline result
///
/// Levels without a resource set still appear, with empty lists.
pub fn to_json_value(result: &PipelineResult) -> serde_json::Result<serde_json::Value> {
    let empty = LevelResourceSet::default();
    let resources = Level::ALL
        .into_iter()
        .map(|level| {
            let set = result.level(level).unwrap_or(&empty);
            (level, LevelView::from(set))
        })
        .collect();

    serde_json::to_value(PipelineView {
        query: &result.query,
        roadmap: &result.roadmap,
        resources,
    })
}

/// Pretty-printed caller-facing JSON
pub fn to_json(result: &PipelineResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&to_json_value(result)?)
}

/// Pretty-printed `{articles, videos}` object for a single resource set
pub fn resources_to_json(set: &LevelResourceSet) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&LevelView::from(set))
}

/// `{topic, roadmap: {articles, videos}}` for roadmap-wide resources
pub fn roadmap_resources_to_json_value(
    topic: &str,
    set: &LevelResourceSet,
) -> serde_json::Result<serde_json::Value> {
    serde_json::to_value(RoadmapResourcesView {
        topic,
        roadmap: LevelView::from(set),
    })
}

/// Pretty-printed form of [`roadmap_resources_to_json_value`]
pub fn roadmap_resources_to_json(
    topic: &str,
    set: &LevelResourceSet,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&roadmap_resources_to_json_value(topic, set)?)
}
