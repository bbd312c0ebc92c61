//! Column-oriented paper table.
//!
//! Search responses nest authors, references, citations and field
//! classifications. [`PaperTable`] flattens each paper into one row spread
//! across parallel columns, so every column always has the same length.
//! Rows are unique by paper ID: the first keyword to find a paper owns it.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Paper, SearchResult};

/// Parallel-column table of flattened papers.
///
/// Columns are private so only [`push`](Self::push) can grow them; read rows
/// through [`row`](Self::row) and [`rows`](Self::rows).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaperTable {
    paper_id: Vec<String>,
    title: Vec<String>,
    r#abstract: Vec<Option<String>>,
    url: Vec<Option<String>>,
    fields_of_study: Vec<Vec<String>>,
    s2_fields_of_study: Vec<Vec<String>>,
    publication_types: Vec<Vec<String>>,
    publication_date: Vec<Option<String>>,
    authors: Vec<Vec<String>>,
    year: Vec<Option<i32>>,
    citation_count: Vec<Option<i32>>,
    reference_count: Vec<Option<i32>>,
    references: Vec<Vec<String>>,
    citations: Vec<Vec<String>>,
    journal: Vec<Option<String>>,
    summary: Vec<Option<String>>,
    keyword: Vec<String>,

    #[serde(skip)]
    seen: HashSet<String>,
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct PaperRow<'a> {
    pub paper_id: &'a str,
    pub title: &'a str,
    pub r#abstract: Option<&'a str>,
    pub url: Option<&'a str>,
    pub fields_of_study: &'a [String],
    pub s2_fields_of_study: &'a [String],
    pub publication_types: &'a [String],
    pub publication_date: Option<&'a str>,
    pub authors: &'a [String],
    pub year: Option<i32>,
    pub citation_count: Option<i32>,
    pub reference_count: Option<i32>,
    pub references: &'a [String],
    pub citations: &'a [String],
    pub journal: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub keyword: &'a str,
}

impl PaperTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten one search response.
    #[must_use]
    pub fn from_result(result: &SearchResult, keyword: &str) -> Self {
        let mut table = Self::new();
        table.extend(&result.data, keyword);
        table
    }

    /// Append papers, skipping IDs already present. Returns rows added.
    pub fn extend<'a, I>(&mut self, papers: I, keyword: &str) -> usize
    where
        I: IntoIterator<Item = &'a Paper>,
    {
        papers.into_iter().filter(|paper| self.push(paper, keyword)).count()
    }

    /// Append one paper unless its ID is already present.
    pub fn push(&mut self, paper: &Paper, keyword: &str) -> bool {
        if paper.paper_id.is_empty() || !self.seen.insert(paper.paper_id.clone()) {
            return false;
        }

        self.paper_id.push(paper.paper_id.clone());
        self.title.push(paper.title_or_default().to_string());
        self.r#abstract.push(paper.abstract_text().map(str::to_string));
        self.url.push(paper.url.clone());
        self.fields_of_study.push(paper.fields_of_study.clone());
        self.s2_fields_of_study.push(paper.s2_categories());
        self.publication_types.push(paper.publication_types.clone());
        self.publication_date.push(paper.publication_date.clone());
        self.authors.push(paper.author_names());
        self.year.push(paper.year);
        self.citation_count.push(paper.citation_count);
        self.reference_count.push(paper.reference_count);
        self.references.push(paper.reference_titles());
        self.citations.push(paper.citation_titles());
        self.journal.push(paper.journal_name().map(str::to_string));
        self.summary.push(None);
        self.keyword.push(keyword.to_string());
        true
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paper_id.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paper_id.is_empty()
    }

    /// Whether a paper ID is already in the table.
    #[must_use]
    pub fn contains(&self, paper_id: &str) -> bool {
        self.seen.contains(paper_id)
    }

    /// Lengths of every column, in declaration order.
    #[must_use]
    pub fn column_lengths(&self) -> [usize; 17] {
        [
            self.paper_id.len(),
            self.title.len(),
            self.r#abstract.len(),
            self.url.len(),
            self.fields_of_study.len(),
            self.s2_fields_of_study.len(),
            self.publication_types.len(),
            self.publication_date.len(),
            self.authors.len(),
            self.year.len(),
            self.citation_count.len(),
            self.reference_count.len(),
            self.references.len(),
            self.citations.len(),
            self.journal.len(),
            self.summary.len(),
            self.keyword.len(),
        ]
    }

    /// Set the summary of row `index`. Out-of-range indexes are ignored.
    pub fn set_summary(&mut self, index: usize, summary: impl Into<String>) {
        if let Some(slot) = self.summary.get_mut(index) {
            *slot = Some(summary.into());
        }
    }

    /// Borrow row `index`.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<PaperRow<'_>> {
        if index >= self.len() {
            return None;
        }

        Some(PaperRow {
            paper_id: &self.paper_id[index],
            title: &self.title[index],
            r#abstract: self.r#abstract[index].as_deref(),
            url: self.url[index].as_deref(),
            fields_of_study: &self.fields_of_study[index],
            s2_fields_of_study: &self.s2_fields_of_study[index],
            publication_types: &self.publication_types[index],
            publication_date: self.publication_date[index].as_deref(),
            authors: &self.authors[index],
            year: self.year[index],
            citation_count: self.citation_count[index],
            reference_count: self.reference_count[index],
            references: &self.references[index],
            citations: &self.citations[index],
            journal: self.journal[index].as_deref(),
            summary: self.summary[index].as_deref(),
            keyword: &self.keyword[index],
        })
    }

    /// Iterate over rows in insertion order.
    pub fn rows(&self) -> impl Iterator<Item = PaperRow<'_>> {
        (0..self.len()).filter_map(|i| self.row(i))
    }
}

impl PaperRow<'_> {
    /// Landing page, falling back to the canonical S2 URL.
    #[must_use]
    pub fn link(&self) -> String {
        self.url
            .map(str::to_string)
            .unwrap_or_else(|| format!("https://www.semanticscholar.org/paper/{}", self.paper_id))
    }

    /// First study field, used to frame summaries.
    #[must_use]
    pub fn primary_field(&self) -> &str {
        self.fields_of_study
            .first()
            .or_else(|| self.s2_fields_of_study.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> SearchResult {
        serde_json::from_value(serde_json::json!({
            "total": 2,
            "offset": 0,
            "data": [
                {
                    "paperId": "p1",
                    "title": "AR Retail",
                    "abstract": "Augmented reality in retail.",
                    "year": 2021,
                    "citationCount": 12,
                    "authors": [{"authorId": "1", "name": "A. Lee"}, {"authorId": "2", "name": "B. Kim"}],
                    "references": [{"paperId": "r1", "title": "Old Work"}],
                    "citations": [],
                    "fieldsOfStudy": ["Business"],
                    "s2FieldsOfStudy": [{"category": "Business", "source": "external"}, {"category": "Computer Science", "source": "s2-fos-model"}],
                    "publicationTypes": ["JournalArticle"],
                    "publicationDate": "2021-03-04",
                    "url": "https://www.semanticscholar.org/paper/p1"
                },
                {"paperId": "p2", "title": null, "fieldsOfStudy": null}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_flatten_maps_fields() {
        let table = PaperTable::from_result(&result(), "ar retail");

        assert_eq!(table.len(), 2);
        assert_eq!(table.paper_id, vec!["p1", "p2"]);
        assert_eq!(table.title, vec!["AR Retail", "Untitled"]);
        assert_eq!(table.authors[0], vec!["A. Lee", "B. Kim"]);
        assert_eq!(table.references[0], vec!["Old Work"]);
        assert_eq!(table.s2_fields_of_study[0], vec!["Business", "Computer Science"]);
        assert_eq!(table.citation_count, vec![Some(12), None]);
        assert_eq!(table.year, vec![Some(2021), None]);
        assert!(table.fields_of_study[1].is_empty());
        assert_eq!(table.keyword, vec!["ar retail", "ar retail"]);
    }

    #[test]
    fn test_columns_stay_equal_length() {
        let table = PaperTable::from_result(&result(), "k");
        let lengths = table.column_lengths();
        assert!(lengths.iter().all(|&l| l == table.len()));
    }

    #[test]
    fn test_dedupe_keeps_first_keyword() {
        let mut table = PaperTable::from_result(&result(), "first");
        let added = table.extend(&result().data, "second");

        assert_eq!(added, 0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.row(0).unwrap().keyword, "first");
    }

    #[test]
    fn test_contains_tracks_pushed_ids() {
        let mut table = PaperTable::from_result(&result(), "k");
        assert!(table.contains("p1"));
        assert!(!table.contains("p3"));

        let paper = Paper { paper_id: "p3".to_string(), ..Default::default() };
        assert!(table.push(&paper, "k"));
        assert!(table.contains("p3"));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_empty_paper_id_skipped() {
        let mut table = PaperTable::new();
        assert!(!table.push(&Paper::default(), "k"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_set_summary_and_row_view() {
        let mut table = PaperTable::from_result(&result(), "k");
        table.set_summary(0, "This paper is about AR.");
        table.set_summary(99, "ignored");

        let row = table.row(0).unwrap();
        assert_eq!(row.summary, Some("This paper is about AR."));
        assert_eq!(row.primary_field(), "Business");
        assert!(table.row(2).is_none());
        assert_eq!(table.rows().count(), 2);
    }

    #[test]
    fn test_row_link_fallback() {
        let table = PaperTable::from_result(&result(), "k");
        assert_eq!(table.row(1).unwrap().link(), "https://www.semanticscholar.org/paper/p2");
    }
}
