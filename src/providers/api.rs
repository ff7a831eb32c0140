//! Structured search API provider
//!
//! Articles come from a custom-search style endpoint (`items[].title`,
//! `items[].link`); videos from a video search endpoint
//! (`items[].snippet.title`, `items[].id.videoId`) with the watch URL
//! synthesized from the video id.

use crate::config::SearchApiConfig;
use crate::model::{dedupe_and_cap, Resource, ResourceKind};
use crate::providers::ApiProvider;
use crate::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const ARTICLES_SOURCE: &str = "Google Custom Search";
const VIDEOS_SOURCE: &str = "YouTube Data API";

/// Builds an HTTP client for outbound API calls
///
/// # Arguments
///
/// * `timeout` - Total request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    // Format: roadmap-scout/Version
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

#[derive(Debug, Deserialize)]
struct ArticleSearchResponse {
    #[serde(default)]
    items: Vec<ArticleItem>,
}

#[derive(Debug, Deserialize)]
struct ArticleItem {
    title: Option<String>,
    link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoSearchResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: Option<VideoId>,
    snippet: Option<VideoSnippet>,
}

#[derive(Debug, Deserialize)]
struct VideoId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: Option<String>,
}

/// [`ApiProvider`] backed by the article and video search endpoints
pub struct SearchApiProvider {
    client: Client,
    config: SearchApiConfig,
}

impl SearchApiProvider {
    pub fn new(client: Client, config: SearchApiConfig) -> Self {
        Self { client, config }
    }

    /// Builds the provider with its own client using the configured timeout
    pub fn from_config(config: &SearchApiConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::new(client, config.clone()))
    }

    /// Issues one GET and decodes the JSON body
    ///
    /// Only the endpoint (never the query string with credentials) is
    /// recorded in errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(endpoint)
            .query(params)
            .send()
            .await
            .map_err(|source| ProviderError::Http {
                url: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                url: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| ProviderError::Http {
            url: endpoint.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| ProviderError::Malformed {
            url: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    fn video_url(&self, video_id: &str) -> Option<Url> {
        Url::parse_with_params(&self.config.video_watch_url, &[("v", video_id)]).ok()
    }
}

#[async_trait]
impl ApiProvider for SearchApiProvider {
    async fn fetch_articles(&self, query: &str) -> Result<Vec<Resource>, ProviderError> {
        let api_key = non_empty(&self.config.google_api_key)
            .ok_or(ProviderError::MissingCredentials("search-api.google-api-key"))?;
        let cx = non_empty(&self.config.google_cx)
            .ok_or(ProviderError::MissingCredentials("search-api.google-cx"))?;

        let search_query = format!("{} learning resources", query);
        let response: ArticleSearchResponse = self
            .get_json(
                &self.config.articles_endpoint,
                &[("key", api_key), ("cx", cx), ("q", search_query.as_str())],
            )
            .await?;

        let articles = response
            .items
            .into_iter()
            .filter_map(|item| {
                let (title, link) = (item.title?, item.link?);
                match Resource::new(&title, &link, ResourceKind::Article, ARTICLES_SOURCE) {
                    Ok(resource) => Some(resource),
                    Err(e) => {
                        tracing::debug!(%link, error = %e, "Skipping article search item");
                        None
                    }
                }
            })
            .collect();

        Ok(dedupe_and_cap(articles, ResourceKind::Article.cap()))
    }

    async fn fetch_videos(&self, query: &str) -> Result<Vec<Resource>, ProviderError> {
        let api_key = non_empty(&self.config.youtube_api_key)
            .ok_or(ProviderError::MissingCredentials("search-api.youtube-api-key"))?;

        let search_query = format!("{} tutorial", query);
        let response: VideoSearchResponse = self
            .get_json(
                &self.config.videos_endpoint,
                &[
                    ("key", api_key),
                    ("part", "snippet"),
                    ("type", "video"),
                    ("q", search_query.as_str()),
                ],
            )
            .await?;

        let videos = response
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id?.video_id?;
                let title = item.snippet?.title?;
                let url = self.video_url(&video_id)?;
                match Resource::new(&title, url.as_str(), ResourceKind::Video, VIDEOS_SOURCE) {
                    Ok(resource) => Some(resource),
                    Err(e) => {
                        tracing::debug!(%video_id, error = %e, "Skipping video search item");
                        None
                    }
                }
            })
            .collect();

        Ok(dedupe_and_cap(videos, ResourceKind::Video.cap()))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
