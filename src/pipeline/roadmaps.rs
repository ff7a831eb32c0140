//! Cached roadmap-only mode

use crate::pipeline::{extract_roadmap, RoadmapComposer};
use crate::storage::Storage;
use crate::Result;

/// Returns raw roadmap text per topic, generating it only on a cache miss
pub struct RoadmapService {
    composer: RoadmapComposer,
}

impl RoadmapService {
    pub fn new(composer: RoadmapComposer) -> Self {
        Self { composer }
    }

    /// Roadmap text for `topic`, from `store` if cached
    ///
    /// A fresh roadmap is trimmed with [`extract_roadmap`] before it is cached.
    /// Failing to cache it is logged and does not fail the call.
    pub async fn roadmap<S>(&self, store: &mut S, topic: &str) -> Result<String>
    where
        S: Storage + ?Sized,
    {
        if let Some(cached) = store.get_roadmap(topic)? {
            tracing::info!(%topic, cached_at = %cached.created_at, "Using cached roadmap");
            return Ok(cached.roadmap);
        }

        let text = self.composer.generate_text(topic).await?;
        let roadmap = extract_roadmap(&text).to_string();

        if let Err(e) = store.save_roadmap(topic, &roadmap) {
            tracing::warn!(%topic, error = %e, "Failed to cache roadmap");
        }

        Ok(roadmap)
    }
}
