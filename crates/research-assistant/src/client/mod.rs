//! Semantic Scholar API client.
//!
//! Provides async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff
//! - Rate limiting (fixed delay before each request)
//! - Response caching with 5-minute TTL

mod middleware;

pub use middleware::{build_http_client, check_status};

use moka::future::Cache;
use reqwest_middleware::ClientWithMiddleware;

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};
use crate::models::{Paper, SearchResult};

/// Semantic Scholar API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Response cache.
    cache: Cache<String, serde_json::Value>,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: String,

    /// Rate limit delay.
    rate_limit_delay: std::time::Duration,
}

/// All pages collected for one query.
#[derive(Debug, Clone, Default)]
pub struct CollectedSearch {
    /// Total matches reported by the first page.
    pub total: i64,

    /// Papers gathered across pages.
    pub papers: Vec<Paper>,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        }

        let client = build_http_client(config, headers)?;

        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            cache,
            api_key: config.api_key.clone(),
            graph_api_url: config.graph_api_url.clone(),
            rate_limit_delay: config.rate_limit_delay,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for papers (one page).
    ///
    /// `fields_of_study` is sent comma-joined and omitted when empty.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn search_papers(
        &self,
        query: &str,
        fields_of_study: &[String],
        offset: i32,
        limit: i32,
        fields: &[&str],
    ) -> ClientResult<SearchResult> {
        let url = format!("{}/paper/search", self.graph_api_url);

        let mut params = vec![
            ("query".to_string(), query.to_string()),
            ("offset".to_string(), offset.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("fields".to_string(), fields.join(",")),
        ];

        if !fields_of_study.is_empty() {
            params.push(("fieldsOfStudy".to_string(), fields_of_study.join(",")));
        }

        let result: SearchResult = self.get(&url, &params).await?;

        // 200 with an error body happens for unsupported field combinations
        if result.data.is_empty() {
            if let Some(message) = result.error_message() {
                return Err(ClientError::bad_request(message));
            }
        }

        Ok(result)
    }

    /// Search and follow `next` offsets until `max_results` papers are collected.
    ///
    /// # Errors
    ///
    /// Returns error if the first page fails. Later page failures end
    /// pagination and keep what was gathered.
    pub async fn search_all(
        &self,
        query: &str,
        fields_of_study: &[String],
        max_results: i32,
        fields: &[&str],
    ) -> ClientResult<CollectedSearch> {
        let max_results = max_results.max(1);
        let mut collected = CollectedSearch::default();
        let mut offset = 0;

        loop {
            let limit = (max_results - collected.papers.len() as i32).min(api::SEARCH_PAGE_SIZE);
            let page = match self.search_papers(query, fields_of_study, offset, limit, fields).await
            {
                Ok(page) => page,
                Err(e) if offset > 0 => {
                    tracing::warn!(query, offset, error = %e, "Pagination stopped early");
                    break;
                }
                Err(e) => return Err(e),
            };

            if offset == 0 {
                collected.total = page.total;
            }

            let next = page.next;
            collected.papers.extend(page.data);

            if collected.papers.len() as i32 >= max_results {
                collected.papers.truncate(max_results as usize);
                break;
            }

            match next {
                Some(n) if n > offset => offset = n,
                _ => break,
            }
        }

        Ok(collected)
    }

    /// Make a GET request.
    async fn get<T>(&self, url: &str, params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        // Check cache
        let cache_key = self.cache_key("GET", url, params);
        if let Some(cached) = self.cache.get(&cache_key).await {
            return serde_json::from_value(cached).map_err(ClientError::from);
        }

        // Rate limit
        tokio::time::sleep(self.rate_limit_delay).await;

        let response = self.client.get(url).query(params).send().await?;

        let response = check_status(response).await?;
        let value: serde_json::Value = response.json().await?;

        // Cache response
        self.cache.insert(cache_key, value.clone()).await;

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Generate cache key.
    fn cache_key(&self, method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient").field("has_api_key", &self.has_api_key()).finish()
    }
}
