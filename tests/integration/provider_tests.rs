//! HTTP-level behaviour of the search API provider and the text generator

use crate::common::{
    mount_articles, mount_roadmap, test_config, ARTICLES_PATH, GENERATOR_PATH, VIDEOS_PATH,
};
use roadmap_scout::generator::{ChatCompletionsGenerator, TextGenerator};
use roadmap_scout::providers::{ApiProvider, SearchApiProvider};
use roadmap_scout::{GenerationError, ProviderError, ResourceKind};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_article_search_sends_credentials_and_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .and(query_param("key", "g-key"))
        .and(query_param("cx", "cx-id"))
        .and(query_param("q", "rust learning resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"title": "The Rust Book", "link": "https://doc.rust-lang.org/book/"},
                {"title": "  ", "link": "https://blank.example/"},
                {"title": "Relative", "link": "/not/absolute"},
                {"title": "Rust by Example", "link": "https://doc.rust-lang.org/rust-by-example/"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, ":memory:");
    let provider = SearchApiProvider::from_config(&config.search_api).unwrap();

    let articles = provider.fetch_articles("rust").await.unwrap();

    let titles: Vec<_> = articles.iter().map(|a| a.title()).collect();
    assert_eq!(titles, vec!["The Rust Book", "Rust by Example"]);
    assert!(articles.iter().all(|a| a.kind() == ResourceKind::Article));
}

#[tokio::test]
async fn test_video_search_synthesizes_watch_urls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VIDEOS_PATH))
        .and(query_param("q", "rust tutorial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": {"videoId": "abc123"}, "snippet": {"title": "Rust Crash Course"}},
                {"id": {"kind": "youtube#channel"}, "snippet": {"title": "A channel"}},
                {"id": {"videoId": "abc123"}, "snippet": {"title": "Duplicate"}},
                {"id": {"videoId": "def456"}, "snippet": {"title": "Ownership Explained"}}
            ]
        })))
        .mount(&server)
        .await;

    let config = test_config(&server, ":memory:");
    let provider = SearchApiProvider::from_config(&config.search_api).unwrap();

    let videos = provider.fetch("rust", ResourceKind::Video).await.unwrap();

    let urls: Vec<_> = videos.iter().map(|v| v.url().as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "https://www.youtube.com/watch?v=abc123",
            "https://www.youtube.com/watch?v=def456"
        ]
    );
    assert_eq!(videos[0].source(), "YouTube Data API");
}

#[tokio::test]
async fn test_search_api_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let config = test_config(&server, ":memory:");
    let provider = SearchApiProvider::from_config(&config.search_api).unwrap();

    let result = provider.fetch_articles("rust").await;

    match result {
        Err(ProviderError::Status { url, status }) => {
            assert_eq!(status, 429);
            assert!(url.ends_with(ARTICLES_PATH));
            assert!(!url.contains("g-key"));
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_search_api_malformed_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"items\": [oops"))
        .mount(&server)
        .await;

    let config = test_config(&server, ":memory:");
    let provider = SearchApiProvider::from_config(&config.search_api).unwrap();

    let result = provider.fetch_videos("rust").await;
    assert!(matches!(result, Err(ProviderError::Malformed { .. })));
}

#[tokio::test]
async fn test_missing_engine_id_makes_no_request() {
    let server = MockServer::start().await;
    mount_articles(&server, 2).await;

    let mut config = test_config(&server, ":memory:");
    config.search_api.google_cx = None;
    let provider = SearchApiProvider::from_config(&config.search_api).unwrap();

    let result = provider.fetch_articles("rust").await;

    assert!(matches!(result, Err(ProviderError::MissingCredentials(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generator_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATOR_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Beginner\n- Basics"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, ":memory:");
    let generator = ChatCompletionsGenerator::from_config(&config.generator).unwrap();

    let text = generator.generate("Generate a roadmap").await.unwrap();
    assert_eq!(text, "Beginner\n- Basics");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body,
        json!({
            "model": "test/model",
            "messages": [{"role": "system", "content": "Generate a roadmap"}]
        })
    );
}

#[tokio::test]
async fn test_generator_empty_content_is_an_error() {
    let server = MockServer::start().await;
    mount_roadmap(&server, "   \n").await;

    let config = test_config(&server, ":memory:");
    let generator = ChatCompletionsGenerator::from_config(&config.generator).unwrap();

    let result = generator.generate("Generate a roadmap").await;
    assert!(matches!(result, Err(GenerationError::EmptyResponse)));
}

#[tokio::test]
async fn test_generator_unreachable_is_transport_error() {
    let server = MockServer::start().await;
    let mut config = test_config(&server, ":memory:");
    // Nothing listens on port 1
    config.generator.endpoint = format!("http://127.0.0.1:1{}", GENERATOR_PATH);

    let generator = ChatCompletionsGenerator::from_config(&config.generator).unwrap();
    let result = generator.generate("Generate a roadmap").await;

    assert!(matches!(result, Err(GenerationError::Transport(_))));
}
