//! OpenAI-compatible client and keyword generation tests.

mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use research_assistant::config::Config;
use research_assistant::error::{AssistantError, ClientError, Service};
use research_assistant::keywords::KeywordGenerator;
use research_assistant::llm::{Embedder, LanguageModel, OpenAiClient};
use research_assistant::summarize::Summarizer;

use common::{EmbeddingResponder, ScriptedLlm, chat_response, mount_chat};

fn openai(server: &MockServer) -> OpenAiClient {
    OpenAiClient::new(&Config::for_testing(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_complete_sends_model_and_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_string_contains("\"model\":\"test-model\""))
        .and(body_string_contains("hello there"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response("General Kenobi")))
        .expect(1)
        .mount(&server)
        .await;

    let answer = openai(&server).complete("hello there").await.unwrap();
    assert_eq!(answer, "General Kenobi");
}

#[tokio::test]
async fn test_complete_without_choices_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = openai(&server).complete("hi").await.unwrap_err();
    assert!(matches!(err, ClientError::BadRequest { .. }));
}

#[tokio::test]
async fn test_complete_maps_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = openai(&server).complete("hi").await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedStatus { status: 401, .. }));
}

#[tokio::test]
async fn test_embed_returns_vectors_in_input_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"index": 1, "embedding": [1.0, 1.0]},
                {"index": 0, "embedding": [0.0, 0.0]}
            ]
        })))
        .mount(&server)
        .await;

    let vectors = openai(&server).embed(&["a".to_string(), "b".to_string()]).await.unwrap();
    assert_eq!(vectors, vec![vec![0.0, 0.0], vec![1.0, 1.0]]);
}

#[tokio::test]
async fn test_embed_count_mismatch_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"index": 0, "embedding": [0.1]}]
        })))
        .mount(&server)
        .await;

    let result = openai(&server).embed(&["a".to_string(), "b".to_string()]).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_embed_query_uses_batch_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_string_contains("\"model\":\"test-embedding\""))
        .respond_with(EmbeddingResponder)
        .expect(1)
        .mount(&server)
        .await;

    let client = openai(&server);
    let vector = client.embed_query("xr").await.unwrap();
    assert_eq!(vector, vec![0.0, 0.5, 0.25]);
    assert_eq!(client.dimension(), 1536);
}

#[tokio::test]
async fn test_keyword_generation_over_http() {
    let server = MockServer::start().await;
    mount_chat(&server, "1. Virtual reality marketing\n2. Augmented reality retail\n\n3. virtual reality marketing").await;

    let llm: Arc<dyn LanguageModel> = Arc::new(openai(&server));
    let keywords = KeywordGenerator::new(llm).generate("XR in Marketing", "").await.unwrap();

    assert_eq!(keywords, vec!["Virtual reality marketing", "Augmented reality retail"]);
}

#[tokio::test]
async fn test_keyword_generation_failure_tagged_as_language_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "20"))
        .mount(&server)
        .await;

    let llm: Arc<dyn LanguageModel> = Arc::new(openai(&server));
    let err = KeywordGenerator::new(llm).generate("XR", "").await.unwrap_err();

    assert!(matches!(
        err,
        AssistantError::Upstream { service: Service::LanguageModel, source: ClientError::RateLimited { .. } }
    ));
    assert!(err.to_user_message().starts_with("Language model is rate limiting requests"));
}

#[tokio::test]
async fn test_keyword_generation_rejects_empty_topic() {
    let llm = Arc::new(ScriptedLlm::new(&["unused"]));
    let err = KeywordGenerator::new(llm.clone()).generate("   ", "desc").await.unwrap_err();

    assert!(matches!(err, AssistantError::Validation { .. }));
    assert_eq!(llm.prompt_count(), 0);
}

#[tokio::test]
async fn test_keyword_filter_round() {
    let llm = Arc::new(ScriptedLlm::new(&[]).filtering_to(&["AR retail"]));
    let generator = KeywordGenerator::new(llm.clone());

    let input = vec!["AR retail".to_string(), "Cooking".to_string()];
    let filtered = generator.filter("XR", "desc", &input).await.unwrap();

    assert_eq!(filtered, vec!["AR retail"]);
    assert!(llm.last_prompt().unwrap().contains("['AR retail', 'Cooking']"));
}

#[tokio::test]
async fn test_keyword_filter_keeps_input_when_unparseable() {
    let server = MockServer::start().await;
    mount_chat(&server, "I could not decide.").await;

    let generator = KeywordGenerator::new(Arc::new(openai(&server)));
    let input = vec!["AR retail".to_string()];

    assert_eq!(generator.filter("XR", "", &input).await.unwrap(), input);
}

#[tokio::test]
async fn test_summarize_single_abstract() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("field of Business"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_response("  This paper is about AR.  ")),
        )
        .mount(&server)
        .await;

    let summarizer = Summarizer::new(Arc::new(openai(&server)), 2);
    let summary = summarizer.summarize("AR Retail", "Augmented reality in stores.", "Business").await;
    assert_eq!(summary.unwrap(), "This paper is about AR.");

    let err = summarizer.summarize("AR Retail", "  ", "Business").await.unwrap_err();
    assert!(matches!(err, AssistantError::Validation { .. }));
}
