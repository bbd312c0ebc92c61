//! Summarization tool: summarize_abstract.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::AssistantResult;
use crate::models::SummarizeAbstractInput;

/// One-off abstract summary.
pub struct SummarizeAbstractTool;

#[async_trait::async_trait]
impl McpTool for SummarizeAbstractTool {
    fn name(&self) -> &'static str {
        "summarize_abstract"
    }

    fn description(&self) -> &'static str {
        "Summarize a paper abstract in a short paragraph, framed for a field of study."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string"},
                "abstract": {"type": "string"},
                "studyField": {
                    "type": "string",
                    "description": "Field used to frame the summary (e.g., 'Business')"
                }
            },
            "required": ["abstract"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: SummarizeAbstractInput = serde_json::from_value(input)?;
        ctx.require_llm()?;

        ctx.summarizer.summarize(&params.title, &params.r#abstract, &params.study_field).await
    }
}
