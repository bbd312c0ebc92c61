//! Conversational assistant tests.

mod common;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Barrier;

use research_assistant::assistant::{ResearchAssistant, Source};
use research_assistant::error::{AssistantError, ClientResult, Service};
use research_assistant::llm::LanguageModel;

use common::{RecordingStore, ScriptedLlm};

#[tokio::test]
async fn test_failed_retrieval_falls_back_to_no_resources() {
    let llm = Arc::new(ScriptedLlm::new(&[]));
    let store = Arc::new(RecordingStore { fail: true, ..Default::default() });
    let assistant = ResearchAssistant::new(llm.clone(), None, Some(store)).with_name("Ada");

    let answer = assistant.ask("What is XR?").await.unwrap();

    assert_eq!(answer.text, "Scripted answer.");
    assert!(answer.sources.is_empty());

    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("Your name is Ada"));
    assert!(prompt.contains("No resources found."));
    assert!(!prompt.contains("Conversation so far"));
}

#[tokio::test]
async fn test_memory_window_limits_history() {
    let llm = Arc::new(ScriptedLlm::new(&[]));
    let assistant = ResearchAssistant::new(llm.clone(), None, None).with_memory_window(1);

    assistant.ask("first question").await.unwrap();
    assistant.ask("second question").await.unwrap();
    assistant.ask("third question").await.unwrap();

    let prompt = llm.last_prompt().unwrap();
    assert!(prompt.contains("Human: second question"));
    assert!(!prompt.contains("first question"));

    let history = assistant.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history.exchanges().next().unwrap().question, "third question");
}

#[tokio::test]
async fn test_reset_clears_history() {
    let llm = Arc::new(ScriptedLlm::new(&[]));
    let assistant = ResearchAssistant::new(llm.clone(), None, None);

    assistant.ask("remember me").await.unwrap();
    assert_eq!(assistant.history().await.len(), 1);

    assistant.reset().await;
    assert!(assistant.history().await.is_empty());

    assistant.ask("again").await.unwrap();
    assert!(!llm.last_prompt().unwrap().contains("remember me"));
}

#[tokio::test]
async fn test_empty_question_rejected() {
    let llm = Arc::new(ScriptedLlm::new(&[]));
    let assistant = ResearchAssistant::new(llm.clone(), None, None);

    let err = assistant.ask("  ").await.unwrap_err();

    assert!(matches!(err, AssistantError::Validation { .. }));
    assert_eq!(llm.prompt_count(), 0);
    assert_eq!(assistant.name(), "Huy Mo");
}

/// Answers only once two prompts are in flight at the same time.
struct PairedLlm(Barrier);

#[async_trait::async_trait]
impl LanguageModel for PairedLlm {
    fn model_name(&self) -> &str {
        "paired"
    }

    async fn complete(&self, _prompt: &str) -> ClientResult<String> {
        self.0.wait().await;
        Ok("Paired answer.".to_string())
    }
}

#[tokio::test]
async fn test_concurrent_questions_reach_model_together() {
    let assistant = ResearchAssistant::new(Arc::new(PairedLlm(Barrier::new(2))), None, None);

    let both = async { tokio::join!(assistant.ask("first"), assistant.ask("second")) };
    let (first, second) =
        tokio::time::timeout(Duration::from_secs(5), both).await.expect("questions were serialized");

    assert_eq!(first.unwrap().text, "Paired answer.");
    assert_eq!(second.unwrap().text, "Paired answer.");
    assert_eq!(assistant.history().await.len(), 2);
}

#[tokio::test]
async fn test_model_failure_keeps_history_unchanged() {
    let llm = Arc::new(ScriptedLlm::new(&[]).failing_on("broken"));
    let assistant = ResearchAssistant::new(llm, None, None);

    let err = assistant.ask("Title: broken").await.unwrap_err();

    assert_eq!(err.service(), Some(Service::LanguageModel));
    assert!(assistant.history().await.is_empty());
}

#[test]
fn test_source_serializes_with_kind_tag() {
    let source = Source::Web { title: "XR".to_string(), link: "https://example.org".to_string() };
    let value = serde_json::to_value(&source).unwrap();

    assert_eq!(value["kind"], "web");
    assert_eq!(value["link"], "https://example.org");
}
