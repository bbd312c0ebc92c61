//! Export tool: export_papers.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::config::fields;
use crate::error::{AssistantError, AssistantResult};
use crate::export::export_table;
use crate::models::ExportPapersInput;
use crate::table::PaperTable;

/// Search and export in a reference-manager format.
pub struct ExportPapersTool;

#[async_trait::async_trait]
impl McpTool for ExportPapersTool {
    fn name(&self) -> &'static str {
        "export_papers"
    }

    fn description(&self) -> &'static str {
        "Search Semantic Scholar and export the papers as CSV, RIS or BibTeX."
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
                    "default": 100,
                    "minimum": 1
                },
                "format": {
                    "type": "string",
                    "enum": ["csv", "ris", "bibtex"],
                    "default": "csv"
                },
                "includeAbstract": {
                    "type": "boolean",
                    "default": true
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: ExportPapersInput = serde_json::from_value(input)?;

        let found = ctx
            .client
            .search_all(&params.query, &params.fields_of_study, params.max_results, fields::SEARCH)
            .await
            .map_err(AssistantError::semantic_scholar)?;

        let mut table = PaperTable::new();
        table.extend(&found.papers, &params.query);

        Ok(export_table(&table, params.format, params.include_abstract))
    }
}
