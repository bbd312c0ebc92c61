//! Keyword generation.
//!
//! A first LLM round proposes one keyword per line; an optional second round
//! filters that list and answers with a bracketed, quoted list.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{AssistantError, AssistantResult};
use crate::llm::{LanguageModel, prompts};

// `2.5D` is a decimal, not a marker: a digit may not follow `2.` directly
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+[.)](?:\s+|([^\d\s]))|[-*•]\s*)").expect("valid regex")
});

static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[(.*?)\]").expect("valid regex"));

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"'([^']*)'|"([^"]*)""#).expect("valid regex"));

/// Generates search keywords for a topic.
#[derive(Clone)]
pub struct KeywordGenerator {
    llm: Arc<dyn LanguageModel>,
}

impl KeywordGenerator {
    /// Create a generator backed by `llm`.
    #[must_use]
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// First round: ask for keywords and parse them as a line list.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty topic, or the LLM error.
    pub async fn generate(&self, topic: &str, description: &str) -> AssistantResult<Vec<String>> {
        if topic.trim().is_empty() {
            return Err(AssistantError::validation("topic", "cannot be empty"));
        }

        let output = self.llm
            .complete(&prompts::keyword_prompt(topic, description))
            .await
            .map_err(AssistantError::llm)?;
        let keywords = parse_line_list(&output);

        tracing::info!(topic, count = keywords.len(), model = self.llm.model_name(), "Generated keywords");
        Ok(keywords)
    }

    /// Second round: ask the LLM to drop irrelevant keywords.
    ///
    /// An unparseable answer keeps `keywords` unchanged.
    ///
    /// # Errors
    ///
    /// Returns the LLM error.
    pub async fn filter(
        &self,
        topic: &str,
        description: &str,
        keywords: &[String],
    ) -> AssistantResult<Vec<String>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }

        let output = self
            .llm
            .complete(&prompts::filter_prompt(topic, description, keywords))
            .await
            .map_err(AssistantError::llm)?;

        match parse_keyword_list(&output) {
            Some(filtered) => {
                tracing::info!(before = keywords.len(), after = filtered.len(), "Filtered keywords");
                Ok(filtered)
            }
            None => {
                tracing::warn!("Keyword filter answer had no list, keeping unfiltered keywords");
                Ok(keywords.to_vec())
            }
        }
    }
}

impl std::fmt::Debug for KeywordGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordGenerator").field("model", &self.llm.model_name()).finish()
    }
}

/// Parse one keyword per line.
///
/// Blank lines are dropped, list markers (`1.`, `2)`, `-`, `*`) and wrapping
/// quotes are stripped, and repeats are removed case-insensitively.
#[must_use]
pub fn parse_line_list(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    text.trim()
        .lines()
        .map(|line| LIST_MARKER.replace(line.trim(), "${1}").into_owned())
        .map(|line| line.trim().trim_matches(|c| c == '"' || c == '\'').trim().to_string())
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(line.to_lowercase()))
        .collect()
}

/// Parse a bracketed list of quoted keywords, e.g. `['a', "b"]`.
///
/// Returns `None` when no bracketed list with quoted items is present.
#[must_use]
pub fn parse_keyword_list(text: &str) -> Option<Vec<String>> {
    let inner = BRACKETED.captures(text)?.get(1)?.as_str();

    let mut seen = HashSet::new();
    let keywords: Vec<String> = QUOTED
        .captures_iter(inner)
        .filter_map(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim().to_string())
        .filter(|k| !k.is_empty())
        .filter(|k| seen.insert(k.to_lowercase()))
        .collect();

    if keywords.is_empty() { None } else { Some(keywords) }
}
