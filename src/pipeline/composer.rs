//! Roadmap composition: prompt the generator, bucket its lines by level

use crate::generator::TextGenerator;
use crate::model::{Level, RoadmapLevels};
use crate::GenerationError;
use std::sync::Arc;

/// Instruction sent to the text generator for `topic`
pub fn roadmap_prompt(topic: &str) -> String {
    format!(
        "Generate a structured learning roadmap for {}. Include beginner, intermediate, \
         and advanced topics. Avoid explanations and provide a concise roadmap in bullet \
         points or numbered steps.",
        topic
    )
}

/// Calls the text generator and parses its answer into level buckets
#[derive(Clone)]
pub struct RoadmapComposer {
    generator: Arc<dyn TextGenerator>,
}

impl RoadmapComposer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generates and parses a roadmap; any generator failure is returned as is
    pub async fn compose(&self, topic: &str) -> Result<RoadmapLevels, GenerationError> {
        let text = self.generate_text(topic).await?;
        let roadmap = parse_roadmap_levels(&text);
        tracing::info!(
            %topic,
            beginner = roadmap.beginner.len(),
            intermediate = roadmap.intermediate.len(),
            advanced = roadmap.advanced.len(),
            "Roadmap composed"
        );
        Ok(roadmap)
    }

    /// Raw generator text for `topic`
    pub async fn generate_text(&self, topic: &str) -> Result<String, GenerationError> {
        self.generator.generate(&roadmap_prompt(topic)).await
    }
}

/// Level a line switches to, if it is a level marker
///
/// Matching is case-insensitive substring matching, checked in roadmap order,
/// so a line mentioning both "beginner" and "advanced" is a beginner marker.
fn level_marker(line: &str) -> Option<Level> {
    let lower = line.to_lowercase();
    Level::ALL
        .into_iter()
        .find(|level| lower.contains(level.as_str()))
}

/// Splits generator text into per-level topic lists
///
/// # Parsing Rules
///
/// - A line containing a level name is a marker; it switches the active
///   bucket and is not itself kept
/// - Any other non-blank line is trimmed and appended to the active bucket
/// - Lines before the first marker are dropped
///
/// # Example
///
/// ```
/// use roadmap_scout::pipeline::parse_roadmap_levels;
///
/// let roadmap = parse_roadmap_levels("Beginner\nLearn X\nIntermediate\nLearn Y\nAdvanced\nLearn Z");
/// assert_eq!(roadmap.beginner, vec!["Learn X"]);
/// assert_eq!(roadmap.intermediate, vec!["Learn Y"]);
/// assert_eq!(roadmap.advanced, vec!["Learn Z"]);
/// ```
pub fn parse_roadmap_levels(text: &str) -> RoadmapLevels {
    let mut roadmap = RoadmapLevels::default();
    let mut current: Option<Level> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(level) = level_marker(trimmed) {
            current = Some(level);
        } else if let (false, Some(level)) = (trimmed.is_empty(), current) {
            roadmap.topics_mut(level).push(trimmed.to_string());
        }
    }

    roadmap
}

/// Trims generator text to the roadmap proper
///
/// The roadmap starts at the first `Beginner`, or failing that the first
/// `1.`; text without either is returned whole.
pub fn extract_roadmap(text: &str) -> &str {
    text.find("Beginner")
        .or_else(|| text.find("1."))
        .map(|start| text[start..].trim())
        .unwrap_or(text)
}
