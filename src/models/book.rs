//! Book data shared by the catalog, the shelf and the summary generator.
//!
//! `BookRecord` is the single normalized shape for a catalog work no matter
//! which endpoint produced it. `ShelfEntry` adds the document identifier the
//! per-user store assigned when the record was saved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub title: String,
    /// Ordered as the catalog lists them; may be empty.
    pub author_names: Vec<String>,
    pub cover_id: Option<i64>,
    pub first_publish_year: Option<i32>,
    pub subjects: Vec<String>,
    /// Catalog work key (e.g. `/works/OL45883W`) when the endpoint provides one.
    pub key: Option<String>,
}

impl BookRecord {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Comma-joined author list, `None` when no usable author name exists.
    pub fn authors_line(&self) -> Option<String> {
        let names: Vec<&str> = self
            .author_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    pub fn primary_subject(&self) -> Option<&str> {
        self.subjects.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShelfEntry {
    pub id: String,
    #[serde(flatten)]
    pub book: BookRecord,
    pub added_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authors_line_skips_blank_names() {
        let mut record = BookRecord::new("Emma");
        assert_eq!(record.authors_line(), None);

        record.author_names = vec!["Jane Austen".into(), " ".into(), "Editor".into()];
        assert_eq!(record.authors_line().as_deref(), Some("Jane Austen, Editor"));
    }
}
