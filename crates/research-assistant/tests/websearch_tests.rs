//! DuckDuckGo client tests.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use research_assistant::config::Config;
use research_assistant::websearch::{DuckDuckGoClient, WebSearcher};

fn instant_answer() -> serde_json::Value {
    json!({
        "Abstract": "",
        "Results": [],
        "RelatedTopics": [
            {"FirstURL": "https://duckduckgo.com/Extended_reality", "Text": "Extended reality - umbrella term"},
            {"FirstURL": "https://duckduckgo.com/Virtual_reality", "Text": "Virtual reality"},
            {"Name": "Marketing", "Topics": [
                {"FirstURL": "https://duckduckgo.com/Experiential_marketing", "Text": "Experiential marketing"}
            ]}
        ]
    })
}

#[tokio::test]
async fn test_search_flattens_related_topics() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ddg/"))
        .and(query_param("q", "extended reality"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instant_answer()))
        .mount(&server)
        .await;

    let client = DuckDuckGoClient::new(&Config::for_testing(&server.uri())).unwrap();
    let results = client.search("extended reality", 10).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].link, "https://duckduckgo.com/Extended_reality");
    assert_eq!(results[2].title, "Experiential marketing");
}

#[tokio::test]
async fn test_search_truncates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ddg/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instant_answer()))
        .mount(&server)
        .await;

    let client = DuckDuckGoClient::new(&Config::for_testing(&server.uri())).unwrap();
    assert_eq!(client.search("xr", 1).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_memoizes_repeated_queries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ddg/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(instant_answer()))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::for_testing(&server.uri());
    config.cache_max_size = 100;
    config.cache_ttl = std::time::Duration::from_secs(60);

    let client = DuckDuckGoClient::new(&config).unwrap();
    let first = client.search("Extended Reality", 5).await.unwrap();
    let second = client.search("extended reality ", 5).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_search_accepts_javascript_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ddg/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(instant_answer().to_string(), "application/x-javascript"),
        )
        .mount(&server)
        .await;

    let client = DuckDuckGoClient::new(&Config::for_testing(&server.uri())).unwrap();
    assert_eq!(client.search("xr", 10).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ddg/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = DuckDuckGoClient::new(&Config::for_testing(&server.uri())).unwrap();
    assert!(client.search("xr", 10).await.is_err());
}
