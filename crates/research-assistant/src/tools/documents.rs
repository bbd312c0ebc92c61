//! Vector database tools: store_documents, search_documents.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::config::fields;
use crate::error::{AssistantError, AssistantResult};
use crate::formatters;
use crate::models::{SearchDocumentsInput, StoreDocumentsInput};
use crate::vector::Document;

/// Search papers and store them as documents.
pub struct StoreDocumentsTool;

#[async_trait::async_trait]
impl McpTool for StoreDocumentsTool {
    fn name(&self) -> &'static str {
        "store_documents"
    }

    fn description(&self) -> &'static str {
        "Search Semantic Scholar and store the matching papers (title and abstract) in the \
         vector database for later retrieval."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "fieldsOfStudy": {
                    "type": "array",
                    "items": {"type": "string"}
                },
                "maxResults": {
                    "type": "integer",
                    "default": 20,
                    "minimum": 1
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: StoreDocumentsInput = serde_json::from_value(input)?;
        ctx.require_llm()?;
        let store = ctx.require_store()?;

        let found = ctx
            .client
            .search_all(&params.query, &params.fields_of_study, params.max_results, fields::SEARCH)
            .await
            .map_err(AssistantError::semantic_scholar)?;

        let documents: Vec<Document> = found.papers.iter().map(Document::from_paper).collect();
        let stored = store.insert(&documents).await?;

        Ok(serde_json::to_string_pretty(&json!({
            "query": params.query,
            "found": found.papers.len(),
            "stored": stored,
        }))?)
    }
}

/// Similarity search over stored documents.
pub struct SearchDocumentsTool;

#[async_trait::async_trait]
impl McpTool for SearchDocumentsTool {
    fn name(&self) -> &'static str {
        "search_documents"
    }

    fn description(&self) -> &'static str {
        "Find the stored paper documents closest to a free-text query."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "limit": {
                    "type": "integer",
                    "default": 2,
                    "minimum": 1
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: SearchDocumentsInput = serde_json::from_value(input)?;
        ctx.require_llm()?;
        let store = ctx.require_store()?;

        let hits = store.search(&params.query, params.limit).await?;
        Ok(formatters::format_hits_markdown(&hits))
    }
}
