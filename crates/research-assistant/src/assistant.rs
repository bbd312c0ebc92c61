//! Conversational research assistant.
//!
//! Answers questions with retrieval: nearby documents from the vector store
//! and web search hits become the prompt context, together with a sliding
//! window of earlier exchanges.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::{AssistantError, AssistantResult};
use crate::llm::{LanguageModel, prompts};
use crate::vector::{DEFAULT_SEARCH_LIMIT, VectorStore};
use crate::websearch::WebSearcher;

/// Name the assistant introduces itself with.
pub const DEFAULT_ASSISTANT_NAME: &str = "Huy Mo";

/// Exchanges kept in conversation memory.
pub const DEFAULT_MEMORY_WINDOW: usize = 5;

const WEB_RESULTS_PER_QUESTION: usize = 5;

/// One question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
}

/// Sliding window over the last `k` exchanges.
#[derive(Debug, Clone)]
pub struct ConversationMemory {
    window: usize,
    exchanges: VecDeque<Exchange>,
}

impl ConversationMemory {
    /// Memory holding at most `window` exchanges (at least 1).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self { window, exchanges: VecDeque::with_capacity(window) }
    }

    /// Record an exchange, evicting the oldest when full.
    pub fn push(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        if self.exchanges.len() == self.window {
            self.exchanges.pop_front();
        }
        self.exchanges.push_back(Exchange { question: question.into(), answer: answer.into() });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// Oldest-first view of the stored exchanges.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    /// Render the history as `Human:` / `Assistant:` lines.
    #[must_use]
    pub fn render(&self) -> String {
        self.exchanges
            .iter()
            .map(|e| format!("Human: {}\nAssistant: {}", e.question, e.answer))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_WINDOW)
    }
}

/// Where a piece of answer context came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Source {
    Document { title: String, url: Option<String>, distance: f32 },
    Web { title: String, link: String },
}

/// An answer and the sources given to the model.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<Source>,
}

/// Retrieval-augmented chat assistant.
pub struct ResearchAssistant {
    name: String,
    llm: Arc<dyn LanguageModel>,
    web: Option<Arc<dyn WebSearcher>>,
    store: Option<Arc<dyn VectorStore>>,
    memory: Mutex<ConversationMemory>,
}

impl ResearchAssistant {
    /// Create an assistant with the default name and memory window.
    #[must_use]
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        web: Option<Arc<dyn WebSearcher>>,
        store: Option<Arc<dyn VectorStore>>,
    ) -> Self {
        Self {
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            llm,
            web,
            store,
            memory: Mutex::new(ConversationMemory::default()),
        }
    }

    /// Override the assistant's name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Override the memory window.
    #[must_use]
    pub fn with_memory_window(self, window: usize) -> Self {
        Self { memory: Mutex::new(ConversationMemory::new(window)), ..self }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the conversation memory.
    pub async fn history(&self) -> ConversationMemory {
        self.memory.lock().await.clone()
    }

    /// Forget earlier exchanges.
    pub async fn reset(&self) {
        self.memory.lock().await.clear();
    }

    /// Answer a question and remember the exchange.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty question, or the LLM error.
    /// Retrieval failures only shrink the context.
    pub async fn ask(&self, question: &str) -> AssistantResult<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AssistantError::validation("question", "cannot be empty"));
        }

        let (context, sources) = self.gather_context(question).await;
        let history = self.memory.lock().await.render();

        let prompt = prompts::retrieval_prompt(&self.name, &context, &history, question);
        let text = self.llm.complete(&prompt).await.map_err(AssistantError::llm)?.trim().to_string();

        let mut memory = self.memory.lock().await;
        memory.push(question, text.clone());

        tracing::info!(sources = sources.len(), history = memory.len(), "Answered question");
        Ok(Answer { text, sources })
    }

    async fn gather_context(&self, question: &str) -> (String, Vec<Source>) {
        let mut blocks = Vec::new();
        let mut sources = Vec::new();

        if let Some(store) = &self.store {
            match store.search(question, DEFAULT_SEARCH_LIMIT).await {
                Ok(hits) => {
                    for hit in hits {
                        blocks.push(hit.document.page_content.clone());
                        sources.push(Source::Document {
                            title: hit.document.meta_str("title").unwrap_or("Untitled").to_string(),
                            url: hit.document.meta_str("url").map(str::to_string),
                            distance: hit.distance,
                        });
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Document retrieval failed"),
            }
        }

        if let Some(web) = &self.web {
            match web.search(question, WEB_RESULTS_PER_QUESTION).await {
                Ok(results) => {
                    for result in results {
                        blocks.push(format!("{} ({})", result.title, result.link));
                        sources.push(Source::Web { title: result.title, link: result.link });
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Web search failed"),
            }
        }

        let context =
            if blocks.is_empty() { "No resources found.".to_string() } else { blocks.join("\n\n") };
        (context, sources)
    }
}

impl std::fmt::Debug for ResearchAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchAssistant")
            .field("name", &self.name)
            .field("model", &self.llm.model_name())
            .field("has_web", &self.web.is_some())
            .field("has_store", &self.store.is_some())
            .finish()
    }
}
