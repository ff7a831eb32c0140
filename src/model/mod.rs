//! Data model for roadmaps and resources
//!
//! Every entity here is write-once: it is built by a provider or the pipeline
//! and never mutated afterwards. Each query produces its own isolated graph
//! of these values.

mod resource;
mod roadmap;

pub use resource::{dedupe_and_cap, LevelResourceSet, Resource, ResourceKind};
pub use roadmap::{Level, PipelineResult, RoadmapLevels};
