//! JSON output formatting with token efficiency.

use serde_json::{Value, json};

use crate::pipeline::ResearchReport;
use crate::table::PaperRow;

/// Create a compact row representation for JSON output.
///
/// Reference and citation title lists are left out.
#[must_use]
pub fn compact_row(row: &PaperRow<'_>) -> Value {
    let mut obj = json!({
        "id": row.paper_id,
        "title": row.title,
        "url": row.link(),
        "year": row.year,
        "citations": row.citation_count.unwrap_or(0),
        "keyword": row.keyword,
    });

    if !row.authors.is_empty() {
        obj["authors"] = json!(row.authors);
    }

    if !row.fields_of_study.is_empty() {
        obj["fields"] = json!(row.fields_of_study);
    }

    if let Some(journal) = row.journal {
        obj["journal"] = json!(journal);
    }

    if let Some(date) = row.publication_date {
        obj["publicationDate"] = json!(date);
    }

    if let Some(abs) = row.r#abstract {
        obj["abstract"] = json!(abs);
    }

    if let Some(summary) = row.summary {
        obj["summary"] = json!(summary);
    }

    if let Some(count) = row.reference_count {
        obj["references"] = json!(count);
    }

    obj
}

/// Compact JSON for a research report: one object per row.
#[must_use]
pub fn compact_report(report: &ResearchReport) -> Value {
    json!({
        "topic": report.topic,
        "keywords": report.keywords,
        "total": report.total,
        "count": report.paper_count(),
        "failedKeywords": report.failed_keywords,
        "summaries": report.summaries,
        "stored": report.stored,
        "generatedAt": report.generated_at.to_rfc3339(),
        "papers": report.table.rows().map(|r| compact_row(&r)).collect::<Vec<_>>(),
    })
}
