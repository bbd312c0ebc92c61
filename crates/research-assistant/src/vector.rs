//! Vector database access.
//!
//! Papers are stored as [`Document`]s: text content plus a JSON metadata
//! object. [`ZillizStore`] talks to a Zilliz Cloud (Milvus) cluster over the
//! REST v2 API; the collection must already exist with an auto-generated
//! primary key, a `vector` field, a `document` JSON field and a `metadata`
//! JSON field.

use std::sync::Arc;

use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::client::{build_http_client, check_status};
use crate::config::{Config, VectorDbConfig};
use crate::error::{AssistantError, AssistantResult, ClientError, ClientResult};
use crate::llm::Embedder;
use crate::models::Paper;
use crate::table::PaperRow;

/// Hits returned by a similarity search when no limit is given.
pub const DEFAULT_SEARCH_LIMIT: usize = 2;

/// Stored text with metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Create a document with empty metadata.
    #[must_use]
    pub fn new(page_content: impl Into<String>) -> Self {
        Self { page_content: page_content.into(), metadata: Map::new() }
    }

    /// Build a document from a flattened table row.
    #[must_use]
    pub fn from_row(row: &PaperRow<'_>) -> Self {
        let mut content = row.title.to_string();
        if let Some(abstract_text) = row.r#abstract {
            content.push_str("\n\n");
            content.push_str(abstract_text);
        }

        let mut metadata = Map::new();
        metadata.insert("paper_id".into(), json!(row.paper_id));
        metadata.insert("title".into(), json!(row.title));
        metadata.insert("url".into(), json!(row.link()));
        metadata.insert("year".into(), json!(row.year));
        metadata.insert("authors".into(), json!(row.authors));
        metadata.insert("keyword".into(), json!(row.keyword));
        if let Some(summary) = row.summary {
            metadata.insert("summary".into(), json!(summary));
        }

        Self { page_content: content, metadata }
    }

    /// Build a document straight from an API paper.
    #[must_use]
    pub fn from_paper(paper: &Paper) -> Self {
        let mut content = paper.title_or_default().to_string();
        if let Some(abstract_text) = paper.abstract_text() {
            content.push_str("\n\n");
            content.push_str(abstract_text);
        }

        let mut metadata = Map::new();
        metadata.insert("paper_id".into(), json!(paper.paper_id));
        metadata.insert("title".into(), json!(paper.title_or_default()));
        metadata.insert("url".into(), json!(paper.link()));
        metadata.insert("year".into(), json!(paper.year));
        metadata.insert("authors".into(), json!(paper.author_names()));

        Self { page_content: content, metadata }
    }

    /// Metadata string value, if present.
    #[must_use]
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// One similarity search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentHit {
    pub id: String,
    pub distance: f32,
    pub document: Document,
}

/// Similarity-search document store.
#[async_trait::async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and insert documents. Returns the number inserted.
    async fn insert(&self, documents: &[Document]) -> AssistantResult<usize>;

    /// Return the `limit` documents nearest to `query`.
    async fn search(&self, query: &str, limit: usize) -> AssistantResult<Vec<DocumentHit>>;
}

#[derive(Debug, Deserialize)]
struct MilvusResponse {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Value,
}

impl MilvusResponse {
    fn into_data(self) -> ClientResult<Value> {
        if self.code != 0 {
            return Err(ClientError::bad_request(format!(
                "code {}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }
        Ok(self.data)
    }
}

#[derive(Debug, Deserialize)]
struct MilvusHit {
    #[serde(alias = "pk")]
    id: Value,
    #[serde(default)]
    distance: f32,
    #[serde(default)]
    document: Value,
    #[serde(default)]
    metadata: Value,
}

impl MilvusHit {
    fn into_hit(self) -> DocumentHit {
        let id = match self.id {
            Value::String(s) => s,
            other => other.to_string(),
        };
        let page_content = self
            .document
            .get("raw_text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let metadata = match self.metadata {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        DocumentHit { id, distance: self.distance, document: Document { page_content, metadata } }
    }
}

/// Zilliz Cloud / Milvus REST store.
#[derive(Clone)]
pub struct ZillizStore {
    client: ClientWithMiddleware,
    uri: String,
    collection: String,
    embedder: Arc<dyn Embedder>,
}

impl ZillizStore {
    /// Create a store for the configured collection.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config, db: &VectorDbConfig, embedder: Arc<dyn Embedder>) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::CONTENT_TYPE, "application/json".parse()?);
        if let Some(ref key) = db.api_key {
            headers.insert(reqwest::header::AUTHORIZATION, format!("Bearer {key}").parse()?);
        }

        Ok(Self {
            client: build_http_client(config, headers)?,
            uri: db.uri.trim_end_matches('/').to_string(),
            collection: db.collection.clone(),
            embedder,
        })
    }

    /// Collection name.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    async fn post(&self, path: &str, body: &Value) -> ClientResult<Value> {
        let url = format!("{}{}", self.uri, path);
        let response = self.client.post(&url).body(body.to_string()).send().await?;
        let response = check_status(response).await?;
        let parsed: MilvusResponse = response.json().await?;
        parsed.into_data()
    }
}

#[async_trait::async_trait]
impl VectorStore for ZillizStore {
    async fn insert(&self, documents: &[Document]) -> AssistantResult<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embedder.embed(&texts).await.map_err(AssistantError::llm)?;

        let rows: Vec<Value> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| {
                json!({
                    "vector": vector,
                    "document": { "raw_text": doc.page_content },
                    "metadata": doc.metadata,
                })
            })
            .collect();

        let body = json!({ "collectionName": self.collection, "data": rows });
        let data =
            self.post("/v2/vectordb/entities/insert", &body).await.map_err(AssistantError::vector_db)?;

        let inserted = data
            .get("insertCount")
            .and_then(Value::as_u64)
            .map_or(documents.len(), |n| n as usize);

        tracing::info!(collection = %self.collection, inserted, "Stored documents");
        Ok(inserted)
    }

    async fn search(&self, query: &str, limit: usize) -> AssistantResult<Vec<DocumentHit>> {
        let vector = self.embedder.embed_query(query).await.map_err(AssistantError::llm)?;

        let body = json!({
            "collectionName": self.collection,
            "data": [vector],
            "annsField": "vector",
            "limit": limit.max(1),
            "outputFields": ["document", "metadata"],
            "searchParams": { "metricType": "L2" },
        });

        let data =
            self.post("/v2/vectordb/entities/search", &body).await.map_err(AssistantError::vector_db)?;
        let hits: Vec<MilvusHit> = match data {
            Value::Null => Vec::new(),
            other => serde_json::from_value(other)
                .map_err(|e| AssistantError::vector_db(ClientError::Parse(e)))?,
        };

        Ok(hits.into_iter().map(MilvusHit::into_hit).collect())
    }
}

impl std::fmt::Debug for ZillizStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZillizStore")
            .field("uri", &self.uri)
            .field("collection", &self.collection)
            .finish()
    }
}
