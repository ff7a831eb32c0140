//! Resource entity and per-level resource sets

use crate::url::{dedup_key, parse_resource_url};
use crate::ResourceError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// The kind of learning artifact a resource points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Article,
    Video,
}

impl ResourceKind {
    /// Maximum number of resources of this kind kept per query
    pub fn cap(&self) -> usize {
        match self {
            Self::Article => 2,
            Self::Video => 3,
        }
    }

    /// Label used in the resource store (`text` or `video`)
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Article => "text",
            Self::Video => "video",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Article),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Article => write!(f, "article"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// A single external learning artifact
///
/// Built once by a provider and never mutated afterwards. The title is
/// non-empty and the URL is an absolute http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    title: String,
    url: Url,
    kind: ResourceKind,
    source: String,
    fetched_at: DateTime<Utc>,
}

impl Resource {
    /// Creates a resource, validating title and URL
    ///
    /// # Example
    ///
    /// ```
    /// use roadmap_scout::{Resource, ResourceKind};
    ///
    /// let r = Resource::new(" The Book ", "https://doc.rust-lang.org/book/", ResourceKind::Article, "Google Search").unwrap();
    /// assert_eq!(r.title(), "The Book");
    /// assert!(Resource::new("", "https://example.com", ResourceKind::Video, "YouTube").is_err());
    /// ```
    pub fn new(
        title: &str,
        url: &str,
        kind: ResourceKind,
        source: &str,
    ) -> Result<Self, ResourceError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ResourceError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_string(),
            url: parse_resource_url(url)?,
            kind,
            source: source.to_string(),
            fetched_at: Utc::now(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Provenance label (which provider produced this resource)
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Drops resources whose URL duplicates an earlier one, then keeps at most `cap`
///
/// Provider return order is preserved.
pub fn dedupe_and_cap(resources: Vec<Resource>, cap: usize) -> Vec<Resource> {
    let mut seen = HashSet::new();
    resources
        .into_iter()
        .filter(|r| seen.insert(dedup_key(r.url())))
        .take(cap)
        .collect()
}

/// Articles and videos gathered for one roadmap level
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelResourceSet {
    articles: Vec<Resource>,
    videos: Vec<Resource>,
}

impl LevelResourceSet {
    /// Builds a set, enforcing the per-kind caps
    pub fn new(articles: Vec<Resource>, videos: Vec<Resource>) -> Self {
        Self {
            articles: dedupe_and_cap(articles, ResourceKind::Article.cap()),
            videos: dedupe_and_cap(videos, ResourceKind::Video.cap()),
        }
    }

    pub fn articles(&self) -> &[Resource] {
        &self.articles
    }

    pub fn videos(&self) -> &[Resource] {
        &self.videos
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.videos.is_empty()
    }

    pub fn len(&self) -> usize {
        self.articles.len() + self.videos.len()
    }

    /// All resources, articles first
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.articles.iter().chain(self.videos.iter())
    }
}
