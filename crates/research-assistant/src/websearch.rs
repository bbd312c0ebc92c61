//! Web search through the DuckDuckGo Instant Answer API.
//!
//! The API answers with `Results` and `RelatedTopics`; related topics may
//! nest one level of `Topics` groups. Both are flattened into
//! [`WebResult`] links.

use moka::future::Cache;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

use crate::client::{build_http_client, check_status};
use crate::config::Config;
use crate::error::ClientResult;

/// One web search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebResult {
    pub link: String,
    pub title: String,
}

/// Web search backend.
#[async_trait::async_trait]
pub trait WebSearcher: Send + Sync {
    /// Search the web, returning at most `num_results` hits.
    async fn search(&self, query: &str, num_results: usize) -> ClientResult<Vec<WebResult>>;
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InstantAnswer {
    #[serde(default)]
    results: Vec<Topic>,
    #[serde(default)]
    related_topics: Vec<Topic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Topic {
    #[serde(rename = "FirstURL")]
    first_url: Option<String>,
    text: Option<String>,
    #[serde(default)]
    topics: Vec<Topic>,
}

impl Topic {
    fn into_result(self) -> Option<WebResult> {
        let link = self.first_url.filter(|u| !u.is_empty())?;
        let title = self.text.unwrap_or_default().trim().to_string();
        Some(WebResult { link, title })
    }
}

impl InstantAnswer {
    fn flatten(self) -> Vec<WebResult> {
        let mut out = Vec::new();
        let topics = self.results.into_iter().chain(self.related_topics);

        for topic in topics {
            if topic.topics.is_empty() {
                out.extend(topic.into_result());
            } else {
                out.extend(topic.topics.into_iter().filter_map(Topic::into_result));
            }
        }
        out
    }
}

/// DuckDuckGo client with per-query memoization.
#[derive(Clone)]
pub struct DuckDuckGoClient {
    client: ClientWithMiddleware,
    base_url: String,
    cache: Cache<(String, usize), Vec<WebResult>>,
}

impl DuckDuckGoClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let cache = Cache::builder()
            .max_capacity(config.cache_max_size)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client: build_http_client(config, reqwest::header::HeaderMap::new())?,
            base_url: config.web_search_url.trim_end_matches('/').to_string(),
            cache,
        })
    }
}

#[async_trait::async_trait]
impl WebSearcher for DuckDuckGoClient {
    async fn search(&self, query: &str, num_results: usize) -> ClientResult<Vec<WebResult>> {
        let key = (query.trim().to_lowercase(), num_results);
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let url = format!("{}/", self.base_url);
        let params = [
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ];

        let response = self.client.get(&url).query(&params).send().await?;
        let response = check_status(response).await?;

        // The API sometimes labels JSON as application/x-javascript
        let body = response.text().await?;
        let answer: InstantAnswer =
            if body.trim().is_empty() { InstantAnswer::default() } else { serde_json::from_str(&body)? };

        let mut results = answer.flatten();
        results.truncate(num_results);

        tracing::debug!(query, count = results.len(), "Web search complete");
        self.cache.insert(key, results.clone()).await;
        Ok(results)
    }
}

impl std::fmt::Debug for DuckDuckGoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDuckGoClient").field("base_url", &self.base_url).finish()
    }
}
