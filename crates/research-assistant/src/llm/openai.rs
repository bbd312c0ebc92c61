//! OpenAI-compatible chat-completions and embeddings client.

use serde::{Deserialize, Serialize};

use super::{Embedder, LanguageModel};
use crate::client::{build_http_client, check_status};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};

/// OpenAI-compatible API client.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest_middleware::ClientWithMiddleware,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
    has_key: bool,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiClient {
    /// Create a client from the `llm` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let llm = &config.llm;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::CONTENT_TYPE, "application/json".parse()?);
        if let Some(ref key) = llm.api_key {
            headers.insert(reqwest::header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        }

        Ok(Self {
            client: build_http_client(config, headers)?,
            base_url: llm.base_url.trim_end_matches('/').to_string(),
            chat_model: llm.chat_model.clone(),
            embedding_model: llm.embedding_model.clone(),
            temperature: llm.temperature,
            has_key: llm.api_key.is_some(),
        })
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let body_str = serde_json::to_string(body)?;

        let response = self.client.post(&url).body(body_str).send().await?;
        let response = check_status(response).await?;
        let value: serde_json::Value = response.json().await?;

        serde_json::from_value(value).map_err(ClientError::from)
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAiClient {
    fn model_name(&self) -> &str {
        &self.chat_model
    }

    async fn complete(&self, prompt: &str) -> ClientResult<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![ChatMessage { role: "user", content: prompt }],
            temperature: self.temperature,
        };

        let response: ChatResponse = self.post("/v1/chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClientError::bad_request("completion returned no choices"))
    }
}

#[async_trait::async_trait]
impl Embedder for OpenAiClient {
    fn dimension(&self) -> usize {
        match self.embedding_model.as_str() {
            "text-embedding-3-large" => 3072,
            _ => 1536,
        }
    }

    async fn embed(&self, texts: &[String]) -> ClientResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest { model: &self.embedding_model, input: texts };
        let mut response: EmbedResponse = self.post("/v1/embeddings", &request).await?;

        if response.data.len() != texts.len() {
            return Err(ClientError::bad_request(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("chat_model", &self.chat_model)
            .field("has_api_key", &self.has_key)
            .finish()
    }
}
