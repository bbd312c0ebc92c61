//! Pipeline tools: research_topic, generate_keywords.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::AssistantResult;
use crate::formatters;
use crate::models::{GenerateKeywordsInput, ResearchTopicInput};

/// Full keyword-driven research run.
pub struct ResearchTopicTool;

#[async_trait::async_trait]
impl McpTool for ResearchTopicTool {
    fn name(&self) -> &'static str {
        "research_topic"
    }

    fn description(&self) -> &'static str {
        "Generate search keywords for a research topic, search Semantic Scholar for each keyword, \
         and return one deduplicated table of papers. Optionally summarizes every abstract and \
         stores the papers in the vector database."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {
                    "type": "string",
                    "description": "Research topic (e.g., 'Extended reality in marketing')"
                },
                "description": {
                    "type": "string",
                    "description": "Project description used to steer keyword generation"
                },
                "fieldsOfStudy": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Fields to search in (defaults to nine social-science and computing fields)"
                },
                "maxKeywords": {
                    "type": "integer",
                    "default": 10,
                    "minimum": 1
                },
                "resultsPerKeyword": {
                    "type": "integer",
                    "default": 100,
                    "minimum": 1
                },
                "filterKeywords": {
                    "type": "boolean",
                    "default": false,
                    "description": "Run a second LLM round that drops irrelevant keywords"
                },
                "summarize": {
                    "type": "boolean",
                    "default": false
                },
                "storeDocuments": {
                    "type": "boolean",
                    "default": false
                },
                "responseFormat": {
                    "type": "string",
                    "enum": ["markdown", "json"],
                    "default": "markdown"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: ResearchTopicInput = serde_json::from_value(input)?;
        ctx.require_llm()?;

        let report = ctx.pipeline.run(&params.request).await?;

        if params.response_format.is_json() {
            Ok(serde_json::to_string_pretty(&formatters::compact_report(&report))?)
        } else {
            Ok(formatters::format_report_markdown(&report))
        }
    }
}

/// Keyword generation without searching.
pub struct GenerateKeywordsTool;

#[async_trait::async_trait]
impl McpTool for GenerateKeywordsTool {
    fn name(&self) -> &'static str {
        "generate_keywords"
    }

    fn description(&self) -> &'static str {
        "Generate academic search keywords for a topic and project description."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {"type": "string"},
                "description": {"type": "string"},
                "filter": {
                    "type": "boolean",
                    "default": false,
                    "description": "Run the second, filtering round"
                }
            },
            "required": ["topic"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: GenerateKeywordsInput = serde_json::from_value(input)?;
        ctx.require_llm()?;

        let mut keywords = ctx.keywords.generate(&params.topic, &params.description).await?;
        if params.filter {
            keywords = ctx.keywords.filter(&params.topic, &params.description, &keywords).await?;
        }

        Ok(serde_json::to_string_pretty(&json!({
            "topic": params.topic,
            "keywords": keywords,
        }))?)
    }
}
