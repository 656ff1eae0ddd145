use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

/// String lists (authors, subjects) are stored as JSON arrays in TEXT columns.
pub fn encode_list(values: &[String]) -> Result<String> {
    serde_json::to_string(values).context("failed to encode string list")
}

pub fn decode_list(raw: &str, field: &str) -> Result<Vec<String>> {
    serde_json::from_str(raw).with_context(|| format!("failed to decode {field}"))
}
