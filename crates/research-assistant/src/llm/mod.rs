//! Language-model access.
//!
//! Keyword generation, summarization and chat all go through
//! [`LanguageModel`]; the vector store embeds text through [`Embedder`].
//! [`OpenAiClient`] implements both against an OpenAI-compatible API.

mod openai;
pub mod prompts;

pub use openai::OpenAiClient;

use crate::error::ClientResult;

/// Text completion backend.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Model identifier, for logging.
    fn model_name(&self) -> &str;

    /// Complete a single-turn prompt.
    async fn complete(&self, prompt: &str) -> ClientResult<String>;
}

/// Text embedding backend.
#[async_trait::async_trait]
pub trait Embedder: Send + Sync {
    /// Dimension of produced vectors.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, one vector per input in input order.
    async fn embed(&self, texts: &[String]) -> ClientResult<Vec<Vec<f32>>>;

    /// Embed a single query text.
    async fn embed_query(&self, text: &str) -> ClientResult<Vec<f32>> {
        self.embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| crate::error::ClientError::bad_request("no embedding returned"))
    }
}
