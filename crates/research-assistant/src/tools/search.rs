//! Search tools: search_papers, web_search.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::config::fields;
use crate::error::{AssistantError, AssistantResult};
use crate::formatters;
use crate::models::{ResponseFormat, SearchPapersInput, WebSearchInput};
use crate::table::PaperTable;

/// Single-query paper search with pagination.
pub struct SearchPapersTool;

#[async_trait::async_trait]
impl McpTool for SearchPapersTool {
    fn name(&self) -> &'static str {
        "search_papers"
    }

    fn description(&self) -> &'static str {
        "Search Semantic Scholar for one query, following pagination up to maxResults papers."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query (e.g., 'augmented reality retail')"
                },
                "fieldsOfStudy": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Filter by fields (e.g., ['Business'])"
                },
                "maxResults": {
                    "type": "integer",
                    "default": 100,
                    "minimum": 1
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: SearchPapersInput = serde_json::from_value(input)?;

        let found = ctx
            .client
            .search_all(&params.query, &params.fields_of_study, params.max_results, fields::SEARCH)
            .await
            .map_err(AssistantError::semantic_scholar)?;

        let mut table = PaperTable::new();
        table.extend(&found.papers, &params.query);

        match params.response_format {
            ResponseFormat::Markdown => Ok(format!(
                "# Papers for \"{}\" ({} of {} matches)\n\n{}",
                params.query,
                table.len(),
                found.total,
                formatters::format_table_markdown(&table)
            )),
            ResponseFormat::Json => {
                let papers: Vec<_> = table.rows().map(|r| formatters::compact_row(&r)).collect();
                Ok(serde_json::to_string_pretty(&json!({
                    "total": found.total,
                    "count": papers.len(),
                    "papers": papers,
                }))?)
            }
        }
    }
}

/// DuckDuckGo web search.
pub struct WebSearchTool;

#[async_trait::async_trait]
impl McpTool for WebSearchTool {
    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web with DuckDuckGo and return result links with titles."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string"},
                "numResults": {
                    "type": "integer",
                    "default": 10,
                    "minimum": 1
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: WebSearchInput = serde_json::from_value(input)?;

        let results =
            ctx.web.search(&params.query, params.num_results).await.map_err(AssistantError::web_search)?;

        match params.response_format {
            ResponseFormat::Markdown => {
                Ok(formatters::format_web_results_markdown(&params.query, &results))
            }
            ResponseFormat::Json => Ok(serde_json::to_string_pretty(&results)?),
        }
    }
}
