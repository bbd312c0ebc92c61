//! Property-based tests for paper table flattening.

use std::collections::HashSet;

use proptest::prelude::*;
use research_assistant::models::Paper;
use research_assistant::table::PaperTable;

/// Generate a paper with a small ID space so batches collide.
fn arb_paper() -> impl Strategy<Value = Paper> {
    (
        "p[0-9]{1,2}",
        proptest::option::of("[A-Za-z ]{0,40}"),
        proptest::option::of("[A-Za-z .]{0,200}"),
        proptest::option::of(1950i32..2030),
        proptest::collection::vec("[A-Z][a-z]{1,10}", 0..4),
        proptest::collection::vec("[A-Z][a-z]{1,12}", 0..3),
        any::<bool>(),
    )
        .prop_map(|(id, title, abstract_text, year, authors, fields, null_lists)| {
            let authors: Vec<_> =
                authors.iter().map(|name| serde_json::json!({"name": name})).collect();
            let references =
                if null_lists { serde_json::Value::Null } else { serde_json::json!([{"title": "Ref"}]) };

            serde_json::from_value(serde_json::json!({
                "paperId": id,
                "title": title,
                "abstract": abstract_text,
                "year": year,
                "authors": authors,
                "fieldsOfStudy": fields,
                "references": references,
                "citations": null,
            }))
            .expect("valid paper json")
        })
}

fn arb_batches() -> impl Strategy<Value = Vec<(String, Vec<Paper>)>> {
    proptest::collection::vec(("[a-z]{3,8}", proptest::collection::vec(arb_paper(), 0..15)), 0..5)
}

proptest! {
    /// Every column has one entry per row.
    #[test]
    fn columns_stay_parallel(batches in arb_batches()) {
        let mut table = PaperTable::new();
        for (keyword, papers) in &batches {
            table.extend(papers, keyword);
        }

        let lengths = table.column_lengths();
        prop_assert!(lengths.iter().all(|&n| n == table.len()));
    }

    /// Paper IDs are unique and each keeps the keyword that found it first.
    #[test]
    fn ids_unique_and_first_keyword_wins(batches in arb_batches()) {
        let mut table = PaperTable::new();
        let mut first_keyword = std::collections::HashMap::new();

        for (keyword, papers) in &batches {
            for paper in papers {
                first_keyword.entry(paper.paper_id.clone()).or_insert_with(|| keyword.clone());
            }
            table.extend(papers, keyword);
        }

        let unique: HashSet<_> = table.rows().map(|r| r.paper_id).collect();
        prop_assert_eq!(unique.len(), table.len());
        prop_assert_eq!(table.len(), first_keyword.len());

        for row in table.rows() {
            prop_assert_eq!(row.keyword, first_keyword[row.paper_id].as_str());
        }
    }

    /// Summaries land on the requested row only.
    #[test]
    fn set_summary_targets_one_row(papers in proptest::collection::vec(arb_paper(), 1..20), pick in any::<prop::sample::Index>()) {
        let mut table = PaperTable::new();
        table.extend(&papers, "kw");
        let index = pick.index(table.len());

        table.set_summary(index, "summary");

        for (i, row) in table.rows().enumerate() {
            prop_assert_eq!(row.summary.is_some(), i == index);
        }
    }
}
