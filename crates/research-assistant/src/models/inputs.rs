//! Input models for tool parameters.

use serde::{Deserialize, Serialize};

use super::{ExportFormat, ResponseFormat};
use crate::pipeline::ResearchRequest;

/// Input for the full research pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchTopicInput {
    /// Topic, description and pipeline switches.
    #[serde(flatten)]
    pub request: ResearchRequest,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Input for keyword generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateKeywordsInput {
    /// Research topic.
    pub topic: String,

    /// Project description.
    #[serde(default)]
    pub description: String,

    /// Run the second, filtering round.
    #[serde(default)]
    pub filter: bool,
}

/// Input for a single-query paper search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPapersInput {
    /// Search query.
    pub query: String,

    /// Filter by fields (empty = no filter).
    #[serde(default)]
    pub fields_of_study: Vec<String>,

    /// Maximum papers to return.
    #[serde(default = "default_max_results")]
    pub max_results: i32,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_max_results() -> i32 {
    100
}

/// Input for web search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebSearchInput {
    /// Search query.
    pub query: String,

    /// Maximum results.
    #[serde(default = "default_num_results")]
    pub num_results: usize,

    /// Output format.
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_num_results() -> usize {
    10
}

/// Input for summarizing one abstract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeAbstractInput {
    /// Paper title.
    #[serde(default)]
    pub title: String,

    /// Abstract text.
    pub r#abstract: String,

    /// Study field the summary should be framed in.
    #[serde(default)]
    pub study_field: String,
}

/// Input for searching papers and storing them in the vector database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreDocumentsInput {
    /// Paper search query.
    pub query: String,

    /// Filter by fields (empty = no filter).
    #[serde(default)]
    pub fields_of_study: Vec<String>,

    /// Maximum papers to store.
    #[serde(default = "default_store_results")]
    pub max_results: i32,
}

fn default_store_results() -> i32 {
    20
}

/// Input for vector-database similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchDocumentsInput {
    /// Free-text query.
    pub query: String,

    /// Maximum hits.
    #[serde(default = "default_document_limit")]
    pub limit: usize,
}

fn default_document_limit() -> usize {
    crate::vector::DEFAULT_SEARCH_LIMIT
}

/// Input for the conversational assistant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskAssistantInput {
    /// Question for the assistant.
    pub question: String,
}

/// Input for exporting search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPapersInput {
    /// Search query.
    pub query: String,

    /// Filter by fields (empty = no filter).
    #[serde(default)]
    pub fields_of_study: Vec<String>,

    /// Maximum papers to export.
    #[serde(default = "default_max_results")]
    pub max_results: i32,

    /// Export format.
    #[serde(default)]
    pub format: ExportFormat,

    /// Include abstracts.
    #[serde(default = "default_true")]
    pub include_abstract: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_input_defaults() {
        let input: SearchPapersInput = serde_json::from_str(r#"{"query": "xr"}"#).unwrap();
        assert_eq!(input.max_results, 100);
        assert!(input.fields_of_study.is_empty());
        assert_eq!(input.response_format, ResponseFormat::Markdown);
    }

    #[test]
    fn test_research_input_flattens_request() {
        let input: ResearchTopicInput = serde_json::from_str(
            r#"{"topic": "XR in Marketing", "summarize": true, "responseFormat": "json"}"#,
        )
        .unwrap();
        assert_eq!(input.request.topic, "XR in Marketing");
        assert!(input.request.summarize);
        assert!(input.response_format.is_json());
    }

    #[test]
    fn test_export_input_defaults() {
        let input: ExportPapersInput = serde_json::from_str(r#"{"query": "vr"}"#).unwrap();
        assert!(input.include_abstract);
        assert_eq!(input.format, ExportFormat::Csv);
    }
}
