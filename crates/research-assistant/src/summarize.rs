//! Abstract summarization.
//!
//! One LLM call per abstract, fanned out with a concurrency bound and
//! gathered to completion before results are written back by row index.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::error::{AssistantError, AssistantResult};
use crate::llm::{LanguageModel, prompts};
use crate::table::PaperTable;

/// Summarizes paper abstracts with a language model.
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn LanguageModel>,
    concurrency: usize,
}

/// Outcome of a table-wide summarization run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    /// Rows that received a summary.
    pub summarized: usize,
    /// Rows skipped for lack of an abstract.
    pub skipped: usize,
    /// Rows whose LLM call failed.
    pub failed: usize,
}

impl Summarizer {
    /// Create a summarizer; `concurrency` is clamped to at least 1.
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModel>, concurrency: usize) -> Self {
        Self { llm, concurrency: concurrency.max(1) }
    }

    /// Summarize one abstract.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty abstract, or the LLM error.
    pub async fn summarize(
        &self,
        title: &str,
        abstract_text: &str,
        study_field: &str,
    ) -> AssistantResult<String> {
        if abstract_text.trim().is_empty() {
            return Err(AssistantError::validation("abstract", "cannot be empty"));
        }

        let summary = self
            .llm
            .complete(&prompts::summary_prompt(title, abstract_text, study_field))
            .await
            .map_err(AssistantError::llm)?;
        Ok(summary.trim().to_string())
    }

    /// Summarize every row that has an abstract and store the results.
    ///
    /// Failures are logged and leave the row without a summary.
    pub async fn summarize_table(&self, table: &mut PaperTable) -> SummaryStats {
        let jobs: Vec<(usize, String, String, String)> = table
            .rows()
            .enumerate()
            .filter_map(|(i, row)| {
                row.r#abstract.map(|a| {
                    (i, row.title.to_string(), a.to_string(), row.primary_field().to_string())
                })
            })
            .collect();

        let mut stats = SummaryStats { skipped: table.len() - jobs.len(), ..Default::default() };

        tracing::info!(jobs = jobs.len(), concurrency = self.concurrency, "Summarizing abstracts");

        let results: Vec<(usize, AssistantResult<String>)> =
            stream::iter(jobs.into_iter().map(|(i, title, abstract_text, field)| async move {
                (i, self.summarize(&title, &abstract_text, &field).await)
            }))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for (index, result) in results {
            match result {
                Ok(summary) => {
                    table.set_summary(index, summary);
                    stats.summarized += 1;
                }
                Err(e) => {
                    tracing::warn!(row = index, error = %e, "Failed to summarize abstract, skipping");
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

impl std::fmt::Debug for Summarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Summarizer")
            .field("model", &self.llm.model_name())
            .field("concurrency", &self.concurrency)
            .finish()
    }
}
