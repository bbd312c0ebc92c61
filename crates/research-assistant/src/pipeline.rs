//! Keyword-driven research pipeline.
//!
//! Generates keywords for a topic, searches Semantic Scholar once per
//! keyword, merges everything into one deduplicated [`PaperTable`], and
//! optionally summarizes abstracts and stores the rows in a vector database.
//! Every step after keyword generation is best effort.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::SemanticScholarClient;
use crate::config::{DEFAULT_FIELDS_OF_STUDY, fields};
use crate::error::{AssistantError, AssistantResult};
use crate::keywords::KeywordGenerator;
use crate::summarize::{Summarizer, SummaryStats};
use crate::table::PaperTable;
use crate::vector::{Document, VectorStore};

/// Parameters of one research run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    /// Research topic.
    pub topic: String,

    /// Free-text project description.
    #[serde(default)]
    pub description: String,

    /// Fields of study to search in.
    #[serde(default = "default_fields_of_study")]
    pub fields_of_study: Vec<String>,

    /// Keywords searched at most.
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Papers collected per keyword.
    #[serde(default = "default_results_per_keyword")]
    pub results_per_keyword: i32,

    /// Run the second keyword-filtering round.
    #[serde(default)]
    pub filter_keywords: bool,

    /// Summarize every abstract.
    #[serde(default)]
    pub summarize: bool,

    /// Store the rows in the vector database.
    #[serde(default)]
    pub store_documents: bool,
}

fn default_fields_of_study() -> Vec<String> {
    DEFAULT_FIELDS_OF_STUDY.iter().map(|s| (*s).to_string()).collect()
}

fn default_max_keywords() -> usize {
    10
}

fn default_results_per_keyword() -> i32 {
    100
}

impl ResearchRequest {
    /// Request with defaults for everything but the topic.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            description: String::new(),
            fields_of_study: default_fields_of_study(),
            max_keywords: default_max_keywords(),
            results_per_keyword: default_results_per_keyword(),
            filter_keywords: false,
            summarize: false,
            store_documents: false,
        }
    }

    /// Check the request before any API call.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty topic or zero limits.
    pub fn validate(&self) -> AssistantResult<()> {
        if self.topic.trim().is_empty() {
            return Err(AssistantError::validation("topic", "cannot be empty"));
        }
        if self.max_keywords == 0 {
            return Err(AssistantError::validation("maxKeywords", "must be at least 1"));
        }
        if self.results_per_keyword < 1 {
            return Err(AssistantError::validation("resultsPerKeyword", "must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of a research run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchReport {
    pub topic: String,
    pub keywords: Vec<String>,
    /// Sum of the API-reported totals over successful searches.
    pub total: i64,
    pub table: PaperTable,
    pub failed_keywords: Vec<String>,
    pub summaries: SummaryStats,
    pub stored: usize,
    pub generated_at: DateTime<Utc>,
}

impl ResearchReport {
    /// Number of unique papers collected.
    #[must_use]
    pub fn paper_count(&self) -> usize {
        self.table.len()
    }
}

/// Runs keyword generation, search, flattening and the optional steps.
#[derive(Clone)]
pub struct ResearchPipeline {
    client: Arc<SemanticScholarClient>,
    keywords: KeywordGenerator,
    summarizer: Summarizer,
    store: Option<Arc<dyn VectorStore>>,
}

impl ResearchPipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new(
        client: Arc<SemanticScholarClient>,
        keywords: KeywordGenerator,
        summarizer: Summarizer,
        store: Option<Arc<dyn VectorStore>>,
    ) -> Self {
        Self { client, keywords, summarizer, store }
    }

    /// Whether a vector store is attached.
    #[must_use]
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Run the whole pipeline.
    ///
    /// # Errors
    ///
    /// Fails only on an invalid request or when keyword generation fails.
    /// Per-keyword search, summarization and storage failures are logged and
    /// reflected in the report.
    pub async fn run(&self, request: &ResearchRequest) -> AssistantResult<ResearchReport> {
        request.validate()?;

        let topic = request.topic.trim();
        tracing::info!(topic, "Generating keywords");

        let mut keywords = self.keywords.generate(topic, &request.description).await?;
        if request.filter_keywords {
            keywords = self.keywords.filter(topic, &request.description, &keywords).await?;
        }
        keywords.truncate(request.max_keywords);

        let mut table = PaperTable::new();
        let mut total = 0;
        let mut failed_keywords = Vec::new();

        for (i, keyword) in keywords.iter().enumerate() {
            tracing::info!(keyword = %keyword, step = i + 1, of = keywords.len(), "Searching keyword");

            match self
                .client
                .search_all(keyword, &request.fields_of_study, request.results_per_keyword, fields::SEARCH)
                .await
            {
                Ok(found) => {
                    total += found.total;
                    let added = table.extend(&found.papers, keyword);
                    tracing::info!(keyword = %keyword, total = found.total, added, "Keyword searched");
                }
                Err(e) => {
                    tracing::warn!(keyword = %keyword, error = %e, "Keyword search failed, skipping");
                    failed_keywords.push(keyword.clone());
                }
            }
        }

        tracing::info!(topic, papers = table.len(), total, "Search complete");

        let summaries = if request.summarize && !table.is_empty() {
            let stats = self.summarizer.summarize_table(&mut table).await;
            tracing::info!(summarized = stats.summarized, failed = stats.failed, "Summaries done");
            stats
        } else {
            SummaryStats::default()
        };

        let stored = if request.store_documents { self.store_table(&table).await } else { 0 };

        Ok(ResearchReport {
            topic: topic.to_string(),
            keywords,
            total,
            table,
            failed_keywords,
            summaries,
            stored,
            generated_at: Utc::now(),
        })
    }

    async fn store_table(&self, table: &PaperTable) -> usize {
        let Some(store) = &self.store else {
            tracing::warn!("Document storage requested but no vector database is configured");
            return 0;
        };
        if table.is_empty() {
            return 0;
        }

        let documents: Vec<Document> = table.rows().map(|row| Document::from_row(&row)).collect();
        match store.insert(&documents).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "Storing documents failed");
                0
            }
        }
    }
}

impl std::fmt::Debug for ResearchPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchPipeline")
            .field("keywords", &self.keywords)
            .field("summarizer", &self.summarizer)
            .field("has_store", &self.has_store())
            .finish()
    }
}
