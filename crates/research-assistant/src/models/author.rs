//! Author reference as embedded in paper responses.

use serde::{Deserialize, Serialize};

/// Minimal author reference (used in paper author lists).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_ref_missing_fields() {
        let author: AuthorRef = serde_json::from_str("{}").unwrap();
        assert!(author.name.is_none());
        assert!(author.author_id.is_none());
    }

    #[test]
    fn test_author_ref_camel_case() {
        let author: AuthorRef = serde_json::from_str(r#"{"authorId": "42", "name": "Huy Mo"}"#).unwrap();
        assert_eq!(author.author_id.as_deref(), Some("42"));
        assert_eq!(author.name.as_deref(), Some("Huy Mo"));
    }
}
