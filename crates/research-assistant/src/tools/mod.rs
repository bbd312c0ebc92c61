//! MCP tool implementations.
//!
//! Each tool:
//! 1. Parses its JSON arguments into an input model
//! 2. Calls the pipeline or one of the service clients
//! 3. Formats results as Markdown or JSON

mod chat;
mod documents;
mod export;
mod research;
mod search;
mod summarize;

pub use chat::*;
pub use documents::*;
pub use export::*;
pub use research::*;
pub use search::*;
pub use summarize::*;

use std::sync::Arc;

use crate::assistant::ResearchAssistant;
use crate::client::SemanticScholarClient;
use crate::config::Config;
use crate::error::{AssistantError, AssistantResult, Service};
use crate::keywords::KeywordGenerator;
use crate::llm::{Embedder, LanguageModel, OpenAiClient};
use crate::pipeline::ResearchPipeline;
use crate::summarize::Summarizer;
use crate::vector::{VectorStore, ZillizStore};
use crate::websearch::{DuckDuckGoClient, WebSearcher};

/// Tool execution context.
///
/// Holds every service a tool may call. The vector store is optional; tools
/// that need it answer with [`AssistantError::Unavailable`] when it is absent.
#[derive(Clone)]
pub struct ToolContext {
    pub client: Arc<SemanticScholarClient>,
    pub llm: Arc<dyn LanguageModel>,
    pub web: Arc<dyn WebSearcher>,
    pub store: Option<Arc<dyn VectorStore>>,
    pub keywords: KeywordGenerator,
    pub summarizer: Summarizer,
    pub pipeline: ResearchPipeline,
    pub assistant: Arc<ResearchAssistant>,
    llm_configured: bool,
}

impl ToolContext {
    /// Wire services together.
    #[must_use]
    pub fn new(
        client: Arc<SemanticScholarClient>,
        llm: Arc<dyn LanguageModel>,
        web: Arc<dyn WebSearcher>,
        store: Option<Arc<dyn VectorStore>>,
        summary_concurrency: usize,
    ) -> Self {
        let keywords = KeywordGenerator::new(Arc::clone(&llm));
        let summarizer = Summarizer::new(Arc::clone(&llm), summary_concurrency);
        let pipeline = ResearchPipeline::new(
            Arc::clone(&client),
            keywords.clone(),
            summarizer.clone(),
            store.clone(),
        );
        let assistant =
            Arc::new(ResearchAssistant::new(Arc::clone(&llm), Some(Arc::clone(&web)), store.clone()));

        Self {
            client,
            llm,
            web,
            store,
            keywords,
            summarizer,
            pipeline,
            assistant,
            llm_configured: true,
        }
    }

    /// Build every client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if any HTTP client cannot be built.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Arc::new(SemanticScholarClient::new(config)?);
        let openai = Arc::new(OpenAiClient::new(config)?);
        let web: Arc<dyn WebSearcher> = Arc::new(DuckDuckGoClient::new(config)?);

        let store: Option<Arc<dyn VectorStore>> = match &config.vector_db {
            Some(db) => {
                let embedder: Arc<dyn Embedder> = openai.clone();
                Some(Arc::new(ZillizStore::new(config, db, embedder)?))
            }
            None => None,
        };

        if !config.has_llm_key() {
            tracing::warn!("OPENAI_API_KEY not set, LLM-backed tools are disabled");
        }

        let mut ctx = Self::new(client, openai, web, store, config.summary_concurrency);
        ctx.llm_configured = config.has_llm_key();
        Ok(ctx)
    }

    /// Fail fast when no language model key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Unavailable`] without a key.
    pub fn require_llm(&self) -> AssistantResult<()> {
        if self.llm_configured {
            Ok(())
        } else {
            Err(AssistantError::unavailable(Service::LanguageModel))
        }
    }

    /// The vector store, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`AssistantError::Unavailable`] without one.
    pub fn require_store(&self) -> AssistantResult<&Arc<dyn VectorStore>> {
        self.store.as_ref().ok_or(AssistantError::unavailable(Service::VectorDatabase))
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("client", &self.client)
            .field("pipeline", &self.pipeline)
            .field("llm_configured", &self.llm_configured)
            .finish()
    }
}

/// Trait for MCP tools.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Tool name (e.g., "research_topic").
    fn name(&self) -> &'static str;

    /// Tool description for LLM.
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with given input.
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String>;
}

/// Register all tools.
#[must_use]
pub fn register_all_tools() -> Vec<Box<dyn McpTool>> {
    vec![
        // Pipeline
        Box::new(research::ResearchTopicTool),
        Box::new(research::GenerateKeywordsTool),
        // Search
        Box::new(search::SearchPapersTool),
        Box::new(search::WebSearchTool),
        Box::new(summarize::SummarizeAbstractTool),
        // Vector database
        Box::new(documents::StoreDocumentsTool),
        Box::new(documents::SearchDocumentsTool),
        // Chat
        Box::new(chat::AskAssistantTool),
        // Export
        Box::new(export::ExportPapersTool),
    ]
}

/// Find a tool by name.
#[must_use]
pub fn find_tool<'a>(tools: &'a [Box<dyn McpTool>], name: &str) -> Option<&'a dyn McpTool> {
    tools.iter().find(|t| t.name() == name).map(AsRef::as_ref)
}
