//! Chat tool: ask_assistant.

use serde_json::json;

use super::{McpTool, ToolContext};
use crate::error::AssistantResult;
use crate::formatters;
use crate::models::AskAssistantInput;

/// Conversational question answering with retrieval.
pub struct AskAssistantTool;

#[async_trait::async_trait]
impl McpTool for AskAssistantTool {
    fn name(&self) -> &'static str {
        "ask_assistant"
    }

    fn description(&self) -> &'static str {
        "Ask the research assistant a question. Answers draw on stored documents and web \
         search, and the assistant remembers the last five exchanges."
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "question": {"type": "string"}
            },
            "required": ["question"]
        })
    }

    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value) -> AssistantResult<String> {
        let params: AskAssistantInput = serde_json::from_value(input)?;
        ctx.require_llm()?;

        let answer = ctx.assistant.ask(&params.question).await?;
        Ok(formatters::format_answer_markdown(&answer))
    }
}
