//! Markdown output formatting.

use std::borrow::Cow;

use crate::assistant::{Answer, Source};
use crate::pipeline::ResearchReport;
use crate::table::{PaperRow, PaperTable};
use crate::vector::DocumentHit;
use crate::websearch::WebResult;

const ABSTRACT_PREVIEW: usize = 300;

/// Render `title` as a Markdown link when a URL is known.
#[must_use]
pub fn make_clickable(title: &str, url: Option<&str>) -> String {
    let title = escape_cell(title);
    match url {
        Some(url) if !url.is_empty() => format!("[{title}]({url})"),
        _ => title.into_owned(),
    }
}

/// Format a full research report.
#[must_use]
pub fn format_report_markdown(report: &ResearchReport) -> String {
    let mut output = format!(
        "# Found **{}** papers related to the topic **{}**\n\n",
        report.total, report.topic
    );

    output.push_str(&format!(
        "_{} unique papers collected across {} keywords, generated {}_\n\n",
        report.paper_count(),
        report.keywords.len(),
        report.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if !report.keywords.is_empty() {
        output.push_str("## Keywords\n\n");
        for keyword in &report.keywords {
            output.push_str(&format!("- {keyword}\n"));
        }
        output.push('\n');
    }

    if !report.failed_keywords.is_empty() {
        output.push_str(&format!(
            "> **Skipped keywords**: {}\n\n",
            report.failed_keywords.join(", ")
        ));
    }

    output.push_str(&format_table_markdown(&report.table));

    let summaries: Vec<_> = report.table.rows().filter(|r| r.summary.is_some()).collect();
    if !summaries.is_empty() {
        output.push_str("\n## Summaries\n\n");
        for row in summaries {
            output.push_str(&format!(
                "### {}\n\n{}\n\n",
                make_clickable(row.title, Some(row.link().as_str())),
                row.summary.unwrap_or_default()
            ));
        }
    }

    output
}

/// Format a paper table as a Markdown table.
#[must_use]
pub fn format_table_markdown(table: &PaperTable) -> String {
    if table.is_empty() {
        return "No papers found.\n".to_string();
    }

    let mut output =
        String::from("| # | Title | Year | Citations | Authors | Keyword |\n|---|---|---|---|---|---|\n");

    for (i, row) in table.rows().enumerate() {
        output.push_str(&format_row_markdown(&row, i + 1));
    }

    output
}

fn format_row_markdown(row: &PaperRow<'_>, index: usize) -> String {
    let authors = match row.authors {
        [] => String::new(),
        [one] => one.clone(),
        [first, ..] => format!("{first} et al."),
    };

    format!(
        "| {} | {} | {} | {} | {} | {} |\n",
        index,
        make_clickable(row.title, Some(row.link().as_str())),
        row.year.map(|y| y.to_string()).unwrap_or_default(),
        row.citation_count.unwrap_or(0),
        escape_cell(&authors),
        escape_cell(row.keyword),
    )
}

/// Format web search hits as a bullet list.
#[must_use]
pub fn format_web_results_markdown(query: &str, results: &[WebResult]) -> String {
    if results.is_empty() {
        return format!("No web results for \"{query}\".");
    }

    let mut output = format!("# Web results for \"{query}\"\n\n");
    for result in results {
        let title = if result.title.is_empty() { result.link.as_str() } else { &result.title };
        output.push_str(&format!("- [{}]({})\n", title, result.link));
    }
    output
}

/// Format vector-store hits.
#[must_use]
pub fn format_hits_markdown(hits: &[DocumentHit]) -> String {
    if hits.is_empty() {
        return "No stored documents matched.".to_string();
    }

    let mut output = format!("# Stored documents ({} matches)\n\n", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        let title = hit.document.meta_str("title").unwrap_or("Untitled");
        output.push_str(&format!(
            "## {}. {} (distance {:.4})\n\n{}\n\n",
            i + 1,
            make_clickable(title, hit.document.meta_str("url")),
            hit.distance,
            truncate(&hit.document.page_content, ABSTRACT_PREVIEW)
        ));
    }
    output
}

/// Format an assistant answer with its sources.
#[must_use]
pub fn format_answer_markdown(answer: &Answer) -> String {
    let mut output = format!("{}\n", answer.text);

    if !answer.sources.is_empty() {
        output.push_str("\n**Sources**:\n");
        for source in &answer.sources {
            let line = match source {
                Source::Document { title, url, .. } => make_clickable(title, url.as_deref()),
                Source::Web { title, link } => make_clickable(title, Some(link.as_str())),
            };
            output.push_str(&format!("- {line}\n"));
        }
    }

    output
}

fn escape_cell(text: &str) -> Cow<'_, str> {
    if text.contains(['|', '\n']) {
        Cow::Owned(text.replace('|', "\\|").replace('\n', " "))
    } else {
        Cow::Borrowed(text)
    }
}

fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => Cow::Owned(format!("{}...", &text[..idx])),
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SearchResult;
    use crate::summarize::SummaryStats;
    use chrono::Utc;

    fn table() -> PaperTable {
        let result: SearchResult = serde_json::from_value(serde_json::json!({
            "total": 1,
            "data": [{
                "paperId": "p1",
                "title": "VR | AR Study",
                "year": 2022,
                "citationCount": 3,
                "authors": [{"name": "A. Lee"}, {"name": "B. Kim"}],
                "url": "https://example.org/p1"
            }]
        }))
        .unwrap();
        PaperTable::from_result(&result, "xr")
    }

    #[test]
    fn test_make_clickable() {
        assert_eq!(make_clickable("Title", Some("https://x.org")), "[Title](https://x.org)");
        assert_eq!(make_clickable("Title", None), "Title");
        assert_eq!(make_clickable("Title", Some("")), "Title");
    }

    #[test]
    fn test_table_row_escapes_pipes() {
        let output = format_table_markdown(&table());
        assert!(output.contains("[VR \\| AR Study](https://example.org/p1)"));
        assert!(output.contains("A. Lee et al."));
        assert!(output.contains("| 2022 | 3 |"));
    }

    #[test]
    fn test_report_heading_uses_reported_total() {
        let report = ResearchReport {
            topic: "XR".to_string(),
            keywords: vec!["vr ads".to_string(), "ar retail".to_string()],
            total: 5000,
            table: table(),
            failed_keywords: Vec::new(),
            summaries: SummaryStats::default(),
            stored: 0,
            generated_at: Utc::now(),
        };

        let output = format_report_markdown(&report);

        assert!(output.starts_with("# Found **5000** papers related to the topic **XR**\n\n"));
        assert!(output.contains("_1 unique papers collected across 2 keywords, generated "));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_table_markdown(&PaperTable::new()), "No papers found.\n");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate(&text, 3), "ééé...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_web_results() {
        let results = vec![WebResult { link: "https://a.org".into(), title: "A".into() }];
        assert!(format_web_results_markdown("xr", &results).contains("- [A](https://a.org)"));
        assert!(format_web_results_markdown("xr", &[]).starts_with("No web results"));
    }
}
