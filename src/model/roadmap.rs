//! Roadmap levels and the assembled pipeline result

use crate::model::{LevelResourceSet, Resource};
use serde::Serialize;
use std::collections::BTreeMap;

/// One partition of the roadmap and of resource fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// All levels in roadmap order
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topic lines of a roadmap, bucketed by level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoadmapLevels {
    pub beginner: Vec<String>,
    pub intermediate: Vec<String>,
    pub advanced: Vec<String>,
}

impl RoadmapLevels {
    pub fn topics(&self, level: Level) -> &[String] {
        match level {
            Level::Beginner => &self.beginner,
            Level::Intermediate => &self.intermediate,
            Level::Advanced => &self.advanced,
        }
    }

    pub(crate) fn topics_mut(&mut self, level: Level) -> &mut Vec<String> {
        match level {
            Level::Beginner => &mut self.beginner,
            Level::Intermediate => &mut self.intermediate,
            Level::Advanced => &mut self.advanced,
        }
    }

    pub fn is_empty(&self) -> bool {
        Level::ALL.iter().all(|level| self.topics(*level).is_empty())
    }
}

/// The externally visible artifact of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub query: String,
    pub roadmap: RoadmapLevels,
    pub resources: BTreeMap<Level, LevelResourceSet>,
}

impl PipelineResult {
    pub fn level(&self, level: Level) -> Option<&LevelResourceSet> {
        self.resources.get(&level)
    }

    /// Every resource across all levels, in level order
    pub fn all_resources(&self) -> Vec<Resource> {
        self.resources
            .values()
            .flat_map(|set| set.iter().cloned())
            .collect()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.values().map(LevelResourceSet::len).sum()
    }
}
