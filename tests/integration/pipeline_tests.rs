//! End-to-end pipeline runs against mock services

use crate::common::{
    build_orchestrator, mount_articles, mount_roadmap, mount_videos, received_paths, test_config,
    StubScraper, ARTICLES_PATH, GENERATOR_PATH, THREE_LEVEL_ROADMAP, VIDEOS_PATH,
};
use roadmap_scout::output::{roadmap_resources_to_json_value, to_json_value};
use roadmap_scout::pipeline::{collect_roadmap_resources, collect_topic_resources};
use roadmap_scout::storage::{PersistenceQueue, SqliteStorage, Storage};
use roadmap_scout::{GenerationError, Level, ResourceKind, ScoutError};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_full_run_uses_api_results_without_scraping() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    mount_articles(&server, 2).await;
    mount_videos(&server, 3).await;

    let scraper = StubScraper::empty();
    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, scraper.clone())
        .run("python")
        .await
        .expect("pipeline run should succeed");

    assert_eq!(result.query, "python");
    assert_eq!(
        result.roadmap.beginner,
        vec!["- Syntax and variables", "- Control flow"]
    );
    assert_eq!(result.roadmap.advanced.len(), 2);

    for level in Level::ALL {
        let set = result.level(level).unwrap();
        assert_eq!(set.articles().len(), 2, "{} articles", level);
        assert_eq!(set.videos().len(), 3, "{} videos", level);
        assert_eq!(set.articles()[0].source(), "Google Custom Search");
        assert_eq!(
            set.videos()[0].url().as_str(),
            "https://www.youtube.com/watch?v=vid0"
        );
    }

    assert_eq!(scraper.calls(), 0);

    let paths = received_paths(&server).await;
    assert_eq!(paths.iter().filter(|p| *p == GENERATOR_PATH).count(), 1);
    assert_eq!(paths.iter().filter(|p| *p == ARTICLES_PATH).count(), 3);
    assert_eq!(paths.iter().filter(|p| *p == VIDEOS_PATH).count(), 3);
}

#[tokio::test]
async fn test_api_results_are_capped() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    mount_articles(&server, 10).await;
    mount_videos(&server, 10).await;

    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, StubScraper::empty())
        .run("python")
        .await
        .unwrap();

    let beginner = result.level(Level::Beginner).unwrap();
    assert_eq!(beginner.articles().len(), ResourceKind::Article.cap());
    assert_eq!(beginner.videos().len(), ResourceKind::Video.cap());
}

#[tokio::test]
async fn test_level_queries_reach_the_search_api() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    mount_articles(&server, 1).await;
    mount_videos(&server, 1).await;

    let config = test_config(&server, ":memory:");
    build_orchestrator(&config, StubScraper::empty())
        .run("python")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let mut article_queries: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == ARTICLES_PATH)
        .filter_map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "q")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    article_queries.sort();

    assert_eq!(
        article_queries,
        vec![
            "advanced level resources for python learning resources",
            "beginner level resources for python learning resources",
            "intermediate level resources for python learning resources",
        ]
    );

    let video_request = requests
        .iter()
        .find(|r| r.url.path() == VIDEOS_PATH)
        .unwrap();
    let params: Vec<(String, String)> = video_request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(params.contains(&("part".to_string(), "snippet".to_string())));
    assert!(params.contains(&("type".to_string(), "video".to_string())));
    assert!(params.contains(&("key".to_string(), "yt-key".to_string())));
}

#[tokio::test]
async fn test_empty_everywhere_still_succeeds() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    mount_articles(&server, 0).await;
    mount_videos(&server, 0).await;

    let scraper = StubScraper::empty();
    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, scraper.clone())
        .run("python")
        .await
        .expect("empty resources are not an error");

    for level in Level::ALL {
        let set = result.level(level).unwrap();
        assert!(set.articles().is_empty());
        assert!(set.videos().is_empty());
    }

    // Three levels, two kinds, three attempts each
    assert_eq!(scraper.calls(), 18);

    let value = to_json_value(&result).unwrap();
    assert_eq!(
        value["resources"]["intermediate"],
        json!({"articles": [], "videos": []})
    );
}

#[tokio::test]
async fn test_generation_failure_stops_before_fetching() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATOR_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;
    mount_articles(&server, 2).await;
    mount_videos(&server, 3).await;

    let scraper = StubScraper::returning(1);
    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, scraper.clone())
        .run("python")
        .await;

    match result {
        Err(ScoutError::Generation(GenerationError::Status { status, message })) => {
            assert_eq!(status, 503);
            assert_eq!(message, "upstream unavailable");
        }
        other => panic!("expected a generation status error, got {:?}", other),
    }

    assert_eq!(received_paths(&server).await, vec![GENERATOR_PATH.to_string()]);
    assert_eq!(scraper.calls(), 0);
}

#[tokio::test]
async fn test_generator_error_envelope_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATOR_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"message": "Rate limit exceeded", "code": 429}
        })))
        .mount(&server)
        .await;

    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, StubScraper::empty())
        .run("python")
        .await;

    assert!(matches!(
        result,
        Err(ScoutError::Generation(GenerationError::Api(ref message))) if message == "Rate limit exceeded"
    ));
}

#[tokio::test]
async fn test_malformed_api_response_falls_back_to_scraping() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    Mock::given(method("GET"))
        .and(path(ARTICLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    mount_videos(&server, 3).await;

    let scraper = StubScraper::returning(5);
    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, scraper.clone())
        .run("python")
        .await
        .unwrap();

    for level in Level::ALL {
        let set = result.level(level).unwrap();
        assert_eq!(set.articles().len(), 2);
        assert_eq!(set.articles()[0].source(), "stub");
        assert_eq!(set.videos()[0].source(), "YouTube Data API");
    }

    // One successful scrape per level, articles only
    assert_eq!(scraper.calls(), 3);
    assert!(scraper
        .queries()
        .iter()
        .all(|(_, kind)| *kind == ResourceKind::Article));
}

#[tokio::test]
async fn test_api_error_status_falls_back_to_scraping() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    mount_articles(&server, 2).await;
    Mock::given(method("GET"))
        .and(path(VIDEOS_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "quotaExceeded"}
        })))
        .mount(&server)
        .await;

    let scraper = StubScraper::returning(1);
    let config = test_config(&server, ":memory:");
    let result = build_orchestrator(&config, scraper.clone())
        .run("python")
        .await
        .unwrap();

    let advanced = result.level(Level::Advanced).unwrap();
    assert_eq!(advanced.videos().len(), 1);
    assert_eq!(advanced.videos()[0].title(), "Scraped 0");
    assert_eq!(scraper.calls(), 3);
}

#[tokio::test]
async fn test_run_persists_in_background() {
    let server = MockServer::start().await;
    mount_roadmap(&server, THREE_LEVEL_ROADMAP).await;
    mount_articles(&server, 2).await;
    mount_videos(&server, 3).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("scout.db");
    let config = test_config(&server, db_path.to_str().unwrap());

    let (queue, worker) = PersistenceQueue::spawn(SqliteStorage::new(&db_path).unwrap());
    let orchestrator = build_orchestrator(&config, StubScraper::empty()).with_persistence(queue);

    let result = orchestrator.run("python").await.unwrap();
    assert_eq!(result.resource_count(), 15);

    drop(orchestrator);
    // Every level saw the same mock items, so only one copy of each is stored
    assert_eq!(worker.finish().await, 5);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_resources_by_kind(ResourceKind::Article).unwrap(), 2);
    assert_eq!(storage.count_resources_by_kind(ResourceKind::Video).unwrap(), 3);

    let records = storage.list_resources().unwrap();
    assert!(records
        .iter()
        .any(|r| r.kind == ResourceKind::Video && r.url == "https://www.youtube.com/watch?v=vid2"));
}

#[tokio::test]
async fn test_collect_topic_resources_uses_bare_topic() {
    let server = MockServer::start().await;
    mount_articles(&server, 2).await;
    mount_videos(&server, 1).await;

    let config = test_config(&server, ":memory:");
    let orchestrator = build_orchestrator(&config, StubScraper::empty());
    let mut storage = SqliteStorage::new_in_memory().unwrap();

    let set = collect_topic_resources(orchestrator.aggregator(), &mut storage, "rust")
        .await
        .unwrap();
    assert_eq!(set.len(), 3);
    assert_eq!(storage.list_resources().unwrap().len(), 3);

    let requests = server.received_requests().await.unwrap();
    let article_request = requests
        .iter()
        .find(|r| r.url.path() == ARTICLES_PATH)
        .unwrap();
    let query = article_request
        .url
        .query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned());
    assert_eq!(query.as_deref(), Some("rust learning resources"));
}

#[tokio::test]
async fn test_collect_topic_resources_reports_nothing_found() {
    let server = MockServer::start().await;
    mount_articles(&server, 0).await;
    mount_videos(&server, 0).await;

    let config = test_config(&server, ":memory:");
    let orchestrator = build_orchestrator(&config, StubScraper::empty());
    let mut storage = SqliteStorage::new_in_memory().unwrap();

    let result = collect_topic_resources(orchestrator.aggregator(), &mut storage, "cobol").await;

    assert!(matches!(result, Err(ScoutError::NoResources { ref topic }) if topic == "cobol"));
}

#[tokio::test]
async fn test_roadmap_resources_scrape_without_the_api() {
    let server = MockServer::start().await;
    mount_articles(&server, 2).await;
    mount_videos(&server, 3).await;

    let scraper = StubScraper::returning(2);
    let config = test_config(&server, ":memory:");
    let orchestrator = build_orchestrator(&config, scraper.clone());

    let set = collect_roadmap_resources(orchestrator.aggregator(), "rust").await;

    assert_eq!(set.articles().len(), 2);
    assert_eq!(set.videos().len(), 2);
    assert!(received_paths(&server).await.is_empty());

    // One successful scrape per kind, both for the roadmap query
    assert_eq!(scraper.calls(), 2);
    assert!(scraper
        .queries()
        .iter()
        .all(|(query, _)| query == "rust roadmap"));

    let value = roadmap_resources_to_json_value("rust", &set).unwrap();
    assert_eq!(value["topic"], "rust");
    assert_eq!(value["roadmap"]["videos"][0]["title"], "Scraped 0");
}

#[tokio::test]
async fn test_roadmap_resources_empty_is_not_an_error() {
    let server = MockServer::start().await;

    let scraper = StubScraper::empty();
    let config = test_config(&server, ":memory:");
    let orchestrator = build_orchestrator(&config, scraper.clone());

    let set = collect_roadmap_resources(orchestrator.aggregator(), "cobol").await;

    assert!(set.is_empty());
    // Two kinds, three attempts each
    assert_eq!(scraper.calls(), 6);
}
