//! Reference-manager export of a [`PaperTable`].

use std::collections::HashMap;

use crate::models::ExportFormat;
use crate::table::{PaperRow, PaperTable};

/// Serialize every row of `table` in `format`.
#[must_use]
pub fn export_table(table: &PaperTable, format: ExportFormat, include_abstract: bool) -> String {
    match format {
        ExportFormat::Csv => to_csv(table, include_abstract),
        ExportFormat::Ris => to_ris(table, include_abstract),
        ExportFormat::Bibtex => to_bibtex(table, include_abstract),
    }
}

fn to_csv(table: &PaperTable, include_abstract: bool) -> String {
    let mut header = vec![
        "paper_id",
        "title",
        "authors",
        "year",
        "journal",
        "citations",
        "fields_of_study",
        "url",
        "keyword",
        "summary",
    ];
    if include_abstract {
        header.push("abstract");
    }

    let mut output = header.join(",");
    output.push('\n');

    for row in table.rows() {
        let mut cells = vec![
            csv_escape(row.paper_id),
            csv_escape(row.title),
            csv_escape(&row.authors.join("; ")),
            row.year.map_or(String::new(), |y| y.to_string()),
            csv_escape(row.journal.unwrap_or("")),
            row.citation_count.unwrap_or(0).to_string(),
            csv_escape(&row.fields_of_study.join("; ")),
            csv_escape(&row.link()),
            csv_escape(row.keyword),
            csv_escape(row.summary.unwrap_or("")),
        ];
        if include_abstract {
            cells.push(csv_escape(row.r#abstract.unwrap_or("")));
        }
        output.push_str(&cells.join(","));
        output.push('\n');
    }

    output
}

fn ris_type(row: &PaperRow<'_>) -> &'static str {
    if row.publication_types.iter().any(|t| t == "Conference") {
        "CONF"
    } else if row.publication_types.iter().any(|t| t == "Book") {
        "BOOK"
    } else {
        "JOUR"
    }
}

fn to_ris(table: &PaperTable, include_abstract: bool) -> String {
    let mut output = String::new();

    for row in table.rows() {
        output.push_str(&format!("TY  - {}\n", ris_type(&row)));
        output.push_str(&format!("TI  - {}\n", single_line(row.title)));

        for author in row.authors {
            output.push_str(&format!("AU  - {author}\n"));
        }

        if let Some(year) = row.year {
            output.push_str(&format!("PY  - {year}\n"));
        }

        if let Some(date) = row.publication_date {
            output.push_str(&format!("DA  - {}\n", date.replace('-', "/")));
        }

        if let Some(journal) = row.journal {
            output.push_str(&format!("JO  - {journal}\n"));
        }

        for field in row.fields_of_study {
            output.push_str(&format!("KW  - {field}\n"));
        }

        if include_abstract {
            if let Some(abs) = row.r#abstract {
                output.push_str(&format!("AB  - {}\n", single_line(abs)));
            }
        }

        output.push_str(&format!("UR  - {}\n", row.link()));
        output.push_str(&format!("ID  - {}\n", row.paper_id));
        output.push_str("ER  - \n\n");
    }

    output
}

fn to_bibtex(table: &PaperTable, include_abstract: bool) -> String {
    let mut output = String::new();
    let mut used_keys: HashMap<String, usize> = HashMap::new();

    for row in table.rows() {
        let key = unique_key(&mut used_keys, citation_key(&row));

        output.push_str(&format!("@article{{{key},\n"));
        output.push_str(&format!("  title = {{{}}},\n", escape_bibtex(row.title)));

        if !row.authors.is_empty() {
            output.push_str(&format!("  author = {{{}}},\n", escape_bibtex(&row.authors.join(" and "))));
        }

        if let Some(year) = row.year {
            output.push_str(&format!("  year = {{{year}}},\n"));
        }

        if let Some(journal) = row.journal {
            output.push_str(&format!("  journal = {{{}}},\n", escape_bibtex(journal)));
        }

        if include_abstract {
            if let Some(abs) = row.r#abstract {
                output.push_str(&format!("  abstract = {{{}}},\n", escape_bibtex(&single_line(abs))));
            }
        }

        output.push_str(&format!("  url = {{{}}},\n", row.link()));
        output.push_str("}\n\n");
    }

    output
}

/// `surname` + `year`, ASCII alphanumerics only.
fn citation_key(row: &PaperRow<'_>) -> String {
    let surname = row
        .authors
        .first()
        .and_then(|name| name.split_whitespace().last())
        .unwrap_or("Unknown");
    let surname: String = surname.chars().filter(char::is_ascii_alphanumeric).collect();
    let surname = if surname.is_empty() { "Unknown".to_string() } else { surname };

    match row.year {
        Some(year) => format!("{surname}{year}"),
        None => surname,
    }
}

/// Suffix repeated keys with `b`, `c`, ... so entries stay distinct.
fn unique_key(used: &mut HashMap<String, usize>, key: String) -> String {
    let count = used.entry(key.clone()).or_insert(0);
    *count += 1;
    match *count {
        1 => key,
        n => {
            let suffix = u8::try_from(n - 1).ok().filter(|i| *i < 26).map_or_else(
                || n.to_string(),
                |i| char::from(b'a' + i).to_string(),
            );
            format!("{key}{suffix}")
        }
    }
}

fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape LaTeX specials in one pass so inserted braces stay literal.
fn escape_bibtex(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\textbackslash{}"),
            '{' | '}' | '&' | '%' | '$' | '#' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Quote per RFC 4180 and neutralize spreadsheet formula prefixes.
fn csv_escape(s: &str) -> String {
    let guarded =
        if s.starts_with(['=', '+', '-', '@']) { format!("'{s}") } else { s.to_string() };

    if guarded.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", guarded.replace('"', "\"\""))
    } else {
        guarded
    }
}
