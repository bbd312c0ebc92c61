//! Paper data model matching Semantic Scholar API schema.
//!
//! Every field except `paperId` may be missing from a response, and list
//! fields may be `null`. Both deserialize to empty values rather than errors.

use serde::{Deserialize, Deserializer, Serialize};

use super::AuthorRef;

/// A research paper from Semantic Scholar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Unique Semantic Scholar paper ID.
    pub paper_id: String,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Number of citations this paper has received.
    #[serde(default)]
    pub citation_count: Option<i32>,

    /// Number of references in this paper.
    #[serde(default)]
    pub reference_count: Option<i32>,

    /// Fields of study (e.g., "Business", "Computer Science").
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields_of_study: Vec<String>,

    /// Fine-grained S2 field classifications.
    #[serde(default, deserialize_with = "null_as_default")]
    pub s2_fields_of_study: Vec<S2Field>,

    /// Publication types (e.g., "JournalArticle", "Review").
    #[serde(default, deserialize_with = "null_as_default")]
    pub publication_types: Vec<String>,

    /// Publication date in ISO format (YYYY-MM-DD).
    #[serde(default)]
    pub publication_date: Option<String>,

    /// Journal information.
    #[serde(default)]
    pub journal: Option<Journal>,

    /// List of authors.
    #[serde(default, deserialize_with = "null_as_default")]
    pub authors: Vec<AuthorRef>,

    /// Papers this paper cites.
    #[serde(default, deserialize_with = "null_as_default")]
    pub references: Vec<PaperRef>,

    /// Papers citing this paper.
    #[serde(default, deserialize_with = "null_as_default")]
    pub citations: Vec<PaperRef>,

    /// Semantic Scholar landing page.
    #[serde(default)]
    pub url: Option<String>,
}

impl Paper {
    /// Get the paper title, falling back to "Untitled" if not available.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Get the abstract when present and non-blank.
    #[must_use]
    pub fn abstract_text(&self) -> Option<&str> {
        self.r#abstract.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// Author names, skipping entries without a name.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authors.iter().filter_map(|a| a.name.clone()).collect()
    }

    /// Titles of referenced papers.
    #[must_use]
    pub fn reference_titles(&self) -> Vec<String> {
        self.references.iter().filter_map(|r| r.title.clone()).collect()
    }

    /// Titles of citing papers.
    #[must_use]
    pub fn citation_titles(&self) -> Vec<String> {
        self.citations.iter().filter_map(|c| c.title.clone()).collect()
    }

    /// S2 field categories, in response order.
    #[must_use]
    pub fn s2_categories(&self) -> Vec<String> {
        self.s2_fields_of_study.iter().filter_map(|f| f.category.clone()).collect()
    }

    /// Journal name if available.
    #[must_use]
    pub fn journal_name(&self) -> Option<&str> {
        self.journal.as_ref()?.name.as_deref()
    }

    /// Landing page, falling back to the canonical S2 URL.
    #[must_use]
    pub fn link(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("https://www.semanticscholar.org/paper/{}", self.paper_id))
    }
}

/// Minimal paper reference (used in citation and reference lists).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRef {
    /// Paper ID (null for papers S2 could not resolve).
    #[serde(default)]
    pub paper_id: Option<String>,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,
}

/// S2 field-of-study classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct S2Field {
    /// Category name (e.g., "Business").
    #[serde(default)]
    pub category: Option<String>,

    /// Classifier that produced it ("external" or "s2-fos-model").
    #[serde(default)]
    pub source: Option<String>,
}

/// Journal metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Journal name.
    #[serde(default)]
    pub name: Option<String>,

    /// Volume.
    #[serde(default)]
    pub volume: Option<String>,

    /// Page range.
    #[serde(default)]
    pub pages: Option<String>,
}

/// Search result wrapper for `paper/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matching papers.
    #[serde(default)]
    pub total: i64,

    /// Current offset in the result set.
    #[serde(default)]
    pub offset: i32,

    /// Next offset, if more results are available.
    #[serde(default)]
    pub next: Option<i32>,

    /// List of papers in this page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Paper>,

    /// Error message (if search failed).
    #[serde(default)]
    pub message: Option<String>,

    /// Error text some failure responses use instead of `message`.
    #[serde(default)]
    pub error: Option<String>,
}

impl SearchResult {
    /// Error text carried in the body, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
