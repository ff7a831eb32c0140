//! Shared fixtures: mock servers, configuration and scrape stubs

use async_trait::async_trait;
use roadmap_scout::config::{
    Config, GeneratorConfig, RetryConfig, ScraperConfig, SearchApiConfig, StorageConfig,
};
use roadmap_scout::generator::ChatCompletionsGenerator;
use roadmap_scout::pipeline::{
    FallbackFetcher, LevelAggregator, Orchestrator, RetryPolicy, RoadmapComposer,
};
use roadmap_scout::providers::{ScrapeProvider, SearchApiProvider};
use roadmap_scout::{ProviderError, Resource, ResourceKind};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATOR_PATH: &str = "/api/v1/chat/completions";
pub const ARTICLES_PATH: &str = "/customsearch/v1";
pub const VIDEOS_PATH: &str = "/youtube/v3/search";

pub const THREE_LEVEL_ROADMAP: &str = "Here is a roadmap for Python:\n\n\
    **Beginner**\n- Syntax and variables\n- Control flow\n\n\
    **Intermediate**\n- Decorators\n- Packaging\n\n\
    **Advanced**\n- Metaclasses\n- CPython internals\n";

/// Creates a test configuration pointing every HTTP surface at `server`
pub fn test_config(server: &MockServer, db_path: &str) -> Config {
    let base = server.uri();
    Config {
        generator: GeneratorConfig {
            endpoint: format!("{}{}", base, GENERATOR_PATH),
            api_key: "sk-test".to_string(),
            model: "test/model".to_string(),
            timeout_secs: 5,
        },
        search_api: SearchApiConfig {
            articles_endpoint: format!("{}{}", base, ARTICLES_PATH),
            videos_endpoint: format!("{}{}", base, VIDEOS_PATH),
            google_api_key: Some("g-key".to_string()),
            google_cx: Some("cx-id".to_string()),
            youtube_api_key: Some("yt-key".to_string()),
            timeout_secs: 5,
            ..SearchApiConfig::default()
        },
        scraper: ScraperConfig::default(),
        retry: RetryConfig {
            max_attempts: 3,
            backoff_ms: 10,
            fetch_deadline_secs: None,
        },
        storage: StorageConfig {
            database_path: db_path.to_string(),
        },
    }
}

/// Builds an orchestrator with real HTTP clients and a stub scraper
pub fn build_orchestrator(config: &Config, scraper: Arc<StubScraper>) -> Orchestrator {
    let generator = ChatCompletionsGenerator::from_config(&config.generator).unwrap();
    let api = SearchApiProvider::from_config(&config.search_api).unwrap();
    let fetcher = FallbackFetcher::new(
        Arc::new(api),
        scraper,
        RetryPolicy {
            max_attempts: config.retry.max_attempts,
            backoff: Duration::from_millis(config.retry.backoff_ms),
            deadline: None,
        },
    );

    Orchestrator::new(
        RoadmapComposer::new(Arc::new(generator)),
        LevelAggregator::new(Arc::new(fetcher)),
    )
}

pub async fn mount_roadmap(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "gen-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })))
        .mount(server)
        .await;
}

pub async fn mount_articles(server: &MockServer, count: usize) {
    let items: Vec<_> = (0..count)
        .map(|n| {
            json!({
                "title": format!("Article {}", n),
                "link": format!("https://articles.example/{}", n)
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

pub async fn mount_videos(server: &MockServer, count: usize) {
    let items: Vec<_> = (0..count)
        .map(|n| {
            json!({
                "id": {"kind": "youtube#video", "videoId": format!("vid{}", n)},
                "snippet": {"title": format!("Video {}", n)}
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": items })))
        .mount(server)
        .await;
}

/// Paths of every request the server received
pub async fn received_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.url.path().to_string())
        .collect()
}

/// Scrape provider returning a fixed number of resources and recording calls
pub struct StubScraper {
    per_call: usize,
    calls: AtomicUsize,
    queries: Mutex<Vec<(String, ResourceKind)>>,
}

impl StubScraper {
    pub fn returning(per_call: usize) -> Arc<Self> {
        Arc::new(Self {
            per_call,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::returning(0)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<(String, ResourceKind)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScrapeProvider for StubScraper {
    async fn scrape(&self, query: &str, kind: ResourceKind) -> Result<Vec<Resource>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((query.to_string(), kind));

        let host = match kind {
            ResourceKind::Article => "https://scraped.example/page",
            ResourceKind::Video => "https://www.youtube.com/watch?v=scraped",
        };
        (0..self.per_call)
            .map(|n| {
                Resource::new(&format!("Scraped {}", n), &format!("{}{}", host, n), kind, "stub")
                    .map_err(ProviderError::from)
            })
            .collect()
    }
}
