//! Configuration for the research assistant.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// OpenAI-compatible API base (without `/v1`).
    pub const OPENAI_API: &str = "https://api.openai.com";

    /// DuckDuckGo Instant Answer API.
    pub const DUCKDUCKGO_API: &str = "https://api.duckduckgo.com";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Rate limit delay between requests without API key (1 req/s, the public pool).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(1000);

    /// Rate limit delay between requests with API key (10ms = 100 req/s).
    pub const RATE_LIMIT_DELAY_WITH_KEY: Duration = Duration::from_millis(10);

    /// Cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Page size for `paper/search` (API max is 100).
    pub const SEARCH_PAGE_SIZE: i32 = 100;
}

/// Paper field sets for API requests.
pub mod fields {
    /// Fields requested by the research pipeline.
    pub const SEARCH: &[&str] = &[
        "paperId",
        "title",
        "year",
        "authors",
        "abstract",
        "citationCount",
        "referenceCount",
        "references",
        "citations",
        "fieldsOfStudy",
        "s2FieldsOfStudy",
        "publicationTypes",
        "publicationDate",
        "journal",
        "url",
    ];
}

/// Fields of study searched when the caller does not pick any.
pub const DEFAULT_FIELDS_OF_STUDY: &[&str] = &[
    "Business",
    "Economics",
    "Education",
    "Linguistics",
    "Engineering",
    "Political Science",
    "Sociology",
    "Computer Science",
    "Psychology",
];

/// Language model settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key sent as bearer token.
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Chat model used for keywords, summaries and answers.
    pub chat_model: String,

    /// Embedding model used for the vector store.
    pub embedding_model: String,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: api::OPENAI_API.to_string(),
            chat_model: "gpt-4-1106-preview".to_string(),
            embedding_model: "text-embedding-ada-002".to_string(),
            temperature: 0.2,
        }
    }
}

/// Vector database (Zilliz / Milvus REST) settings.
#[derive(Debug, Clone)]
pub struct VectorDbConfig {
    /// Cluster endpoint, e.g. `https://in03-xxxx.api.gcp-us-west1.zillizcloud.com`.
    pub uri: String,

    /// API key / token.
    pub api_key: Option<String>,

    /// Collection holding paper documents.
    pub collection: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Base URL for the DuckDuckGo API.
    pub web_search_url: String,

    /// Language model settings.
    pub llm: LlmConfig,

    /// Vector database settings (`None` disables document storage).
    pub vector_db: Option<VectorDbConfig>,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Rate limit delay between Semantic Scholar requests.
    pub rate_limit_delay: Duration,

    /// Cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,

    /// Maximum retries for transient HTTP failures.
    pub max_retries: u32,

    /// Concurrent summarization requests.
    pub summary_concurrency: usize,
}

impl Config {
    /// Create a new configuration with optional Semantic Scholar API key.
    ///
    /// The rate limit delay is adjusted based on API key presence.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let has_key = api_key.is_some();
        Self {
            api_key,
            graph_api_url: api::GRAPH_API.to_string(),
            web_search_url: api::DUCKDUCKGO_API.to_string(),
            llm: LlmConfig::default(),
            vector_db: None,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            rate_limit_delay: if has_key {
                api::RATE_LIMIT_DELAY_WITH_KEY
            } else {
                api::RATE_LIMIT_DELAY
            },
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
            max_retries: 3,
            summary_concurrency: 8,
        }
    }

    /// Create a test configuration pointing every service at one mock server.
    ///
    /// Paths are `/graph/v1` (Semantic Scholar), `/v1/...` (LLM), `/ddg`
    /// (web search) and `/v2/vectordb/...` (vector store).
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            web_search_url: format!("{}/ddg", base_url),
            llm: LlmConfig {
                api_key: Some("test-key".to_string()),
                base_url: base_url.to_string(),
                chat_model: "test-model".to_string(),
                embedding_model: "test-embedding".to_string(),
                temperature: 0.0,
            },
            vector_db: Some(VectorDbConfig {
                uri: base_url.to_string(),
                api_key: Some("test-token".to_string()),
                collection: "Test".to_string(),
            }),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            cache_ttl: Duration::from_secs(0),          // No caching in tests
            cache_max_size: 0,
            max_retries: 0,
            summary_concurrency: 4,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// # Errors
    ///
    /// Returns error if a configured URL is malformed.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new(env_var("SEMANTIC_SCHOLAR_API_KEY"));

        config.llm.api_key = env_var("OPENAI_API_KEY");
        if let Some(base) = env_var("OPENAI_BASE_URL") {
            config.llm.base_url = base.trim_end_matches('/').to_string();
        }
        if let Some(model) = env_var("OPENAI_MODEL") {
            config.llm.chat_model = model;
        }
        if let Some(model) = env_var("OPENAI_EMBEDDING_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Some(base) = env_var("DUCKDUCKGO_BASE_URL") {
            config.web_search_url = base.trim_end_matches('/').to_string();
        }

        if let Some(uri) = env_var("ZILLIZ_CLOUD_URI") {
            config.vector_db = Some(VectorDbConfig {
                uri: uri.trim_end_matches('/').to_string(),
                api_key: env_var("ZILLIZ_API_KEY"),
                collection: env_var("ZILLIZ_COLLECTION_NAME")
                    .unwrap_or_else(|| "Production".to_string()),
            });
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the Semantic Scholar API key and switch to the keyed rate limit.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
        self.rate_limit_delay = api::RATE_LIMIT_DELAY_WITH_KEY;
    }

    /// Check that every configured base URL parses.
    ///
    /// # Errors
    ///
    /// Returns the first URL that fails to parse.
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut urls = vec![
            ("graph API", self.graph_api_url.as_str()),
            ("web search", self.web_search_url.as_str()),
            ("LLM", self.llm.base_url.as_str()),
        ];
        if let Some(db) = &self.vector_db {
            urls.push(("vector database", db.uri.as_str()));
        }

        for (name, raw) in urls {
            url::Url::parse(raw)
                .map_err(|e| anyhow::anyhow!("invalid {name} URL '{raw}': {e}"))?;
        }
        Ok(())
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check if a language model key is configured.
    #[must_use]
    pub const fn has_llm_key(&self) -> bool {
        self.llm.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
