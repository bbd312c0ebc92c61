//! Tests against the real services.
//!
//! Run with: `cargo test --features integration -- --nocapture`
//! LLM and vector database tests are skipped when their keys are unset.

#![cfg(feature = "integration")]

use std::sync::Arc;

use research_assistant::client::SemanticScholarClient;
use research_assistant::config::{Config, fields};
use research_assistant::tools::ToolContext;
use research_assistant::vector::VectorStore;
use research_assistant::websearch::{DuckDuckGoClient, WebSearcher};
use research_assistant::ResearchRequest;

fn config() -> Config {
    Config::from_env().expect("config from env")
}

#[tokio::test]
async fn test_live_paper_search() {
    let client = SemanticScholarClient::new(&config()).unwrap();
    let fos = vec!["Computer Science".to_string()];

    let found = client.search_all("attention is all you need", &fos, 20, fields::SEARCH).await.unwrap();

    assert!(found.total > 0);
    assert!(!found.papers.is_empty());
    assert!(found.papers.len() <= 20);
}

#[tokio::test]
async fn test_live_web_search() {
    let client = DuckDuckGoClient::new(&config()).unwrap();
    let results = client.search("Semantic Scholar", 5).await.unwrap();

    assert!(results.len() <= 5);
    assert!(results.iter().all(|r| r.link.starts_with("http")));
}

#[tokio::test]
async fn test_live_research_pipeline() {
    let config = config();
    if !config.has_llm_key() {
        eprintln!("OPENAI_API_KEY not set, skipping");
        return;
    }

    let ctx = ToolContext::from_config(&config).unwrap();
    let mut request = ResearchRequest::new("Extended reality in marketing");
    request.max_keywords = 2;
    request.results_per_keyword = 5;
    request.summarize = true;

    let report = ctx.pipeline.run(&request).await.unwrap();

    assert!(!report.keywords.is_empty());
    assert!(report.table.column_lengths().iter().all(|&n| n == report.paper_count()));
}

#[tokio::test]
async fn test_live_document_round_trip() {
    let config = config();
    if !config.has_llm_key() || config.vector_db.is_none() {
        eprintln!("OPENAI_API_KEY or ZILLIZ_CLOUD_URI not set, skipping");
        return;
    }

    let ctx = ToolContext::from_config(&config).unwrap();
    let store = Arc::clone(ctx.require_store().unwrap());
    let hits = store.search("virtual reality marketing", 2).await.unwrap();

    assert!(hits.len() <= 2);
}
