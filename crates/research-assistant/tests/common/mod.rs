//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use research_assistant::error::{AssistantError, AssistantResult, ClientError, ClientResult};
use research_assistant::llm::LanguageModel;
use research_assistant::vector::{Document, DocumentHit, VectorStore};

/// Sample paper JSON for mocking.
pub fn sample_paper_json(id: &str, title: &str, year: i32, citations: i32) -> serde_json::Value {
    json!({
        "paperId": id,
        "title": title,
        "abstract": format!("Abstract for {}", title),
        "year": year,
        "citationCount": citations,
        "referenceCount": 10,
        "authors": [{"authorId": "1", "name": "Test Author"}],
        "references": [{"paperId": "r1", "title": "Prior Work"}],
        "citations": [],
        "fieldsOfStudy": ["Business"],
        "s2FieldsOfStudy": [{"category": "Business", "source": "external"}],
        "publicationTypes": ["JournalArticle"],
        "publicationDate": format!("{}-01-15", year),
        "journal": {"name": "Journal of Testing"},
        "url": format!("https://www.semanticscholar.org/paper/{}", id)
    })
}

/// Sample search result JSON.
pub fn sample_search_result(
    total: i64,
    papers: Vec<serde_json::Value>,
    next: Option<i32>,
) -> serde_json::Value {
    json!({
        "total": total,
        "offset": 0,
        "next": next,
        "data": papers
    })
}

/// Chat-completions response body with one choice.
pub fn chat_response(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

/// Mount a chat-completions mock answering every prompt with `content`.
pub async fn mount_chat(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_response(content)))
        .mount(server)
        .await;
}

/// Embeddings responder: one small vector per input, in order.
pub struct EmbeddingResponder;

impl Respond for EmbeddingResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let count = body["input"].as_array().map_or(0, Vec::len);
        let data: Vec<_> = (0..count)
            .map(|i| json!({"object": "embedding", "index": i, "embedding": [i as f32, 0.5, 0.25]}))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"object": "list", "data": data}))
    }
}

/// Language model answering from the prompt text alone.
///
/// - keyword prompts get `keywords`, one per line
/// - filter prompts get `filtered` as a bracketed list
/// - summary prompts echo the title, or fail when it is in `failing_titles`
/// - anything else gets `answer`
pub struct ScriptedLlm {
    pub keywords: Vec<String>,
    pub filtered: Vec<String>,
    pub answer: String,
    pub failing_titles: HashSet<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|s| (*s).to_string()).collect(),
            filtered: Vec::new(),
            answer: "Scripted answer.".to_string(),
            failing_titles: HashSet::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing_titles.insert(title.to_string());
        self
    }

    pub fn filtering_to(mut self, keywords: &[&str]) -> Self {
        self.filtered = keywords.iter().map(|s| (*s).to_string()).collect();
        self
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl LanguageModel for ScriptedLlm {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> ClientResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if prompt.contains("Given the keyword list") {
            let list: Vec<_> = self.filtered.iter().map(|k| format!("'{k}'")).collect();
            return Ok(format!("[{}]", list.join(", ")));
        }

        if prompt.contains("search keywords") {
            return Ok(self
                .keywords
                .iter()
                .enumerate()
                .map(|(i, k)| format!("{}. {}", i + 1, k))
                .collect::<Vec<_>>()
                .join("\n"));
        }

        if let Some(rest) = prompt.split("Title: ").nth(1) {
            let title = rest.lines().next().unwrap_or_default().trim();
            if self.failing_titles.contains(title) {
                return Err(ClientError::server(500, "model overloaded"));
            }
            return Ok(format!("This paper is about {title}."));
        }

        Ok(self.answer.clone())
    }
}

/// In-memory vector store recording inserts and returning canned hits.
#[derive(Default)]
pub struct RecordingStore {
    pub inserted: Mutex<Vec<Document>>,
    pub hits: Vec<DocumentHit>,
    pub fail: bool,
}

#[async_trait::async_trait]
impl VectorStore for RecordingStore {
    async fn insert(&self, documents: &[Document]) -> AssistantResult<usize> {
        if self.fail {
            return Err(AssistantError::vector_db(ClientError::server(503, "unavailable")));
        }
        self.inserted.lock().unwrap().extend_from_slice(documents);
        Ok(documents.len())
    }

    async fn search(&self, _query: &str, limit: usize) -> AssistantResult<Vec<DocumentHit>> {
        if self.fail {
            return Err(AssistantError::vector_db(ClientError::server(503, "unavailable")));
        }
        Ok(self.hits.iter().take(limit).cloned().collect())
    }
}
