use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize};

use crate::models::BookRecord;

use super::{genre::Genre, transport::CatalogTransport};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub const MAX_RESULTS: usize = 20;
pub const FEATURED_LIMIT: usize = 10;
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    cover_i: Option<i64>,
    first_publish_year: Option<i32>,
    #[serde(default)]
    subject: Vec<String>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectResponse {
    #[serde(default)]
    works: Vec<SubjectWork>,
}

#[derive(Debug, Deserialize)]
struct SubjectWork {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<SubjectAuthor>,
    cover_id: Option<i64>,
    first_publish_year: Option<i32>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubjectAuthor {
    name: Option<String>,
}

fn usable_title(title: Option<String>) -> Option<String> {
    title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn usable_name(name: &Option<String>) -> Option<String> {
    name.as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

fn from_search_doc(doc: SearchDoc) -> Option<BookRecord> {
    Some(BookRecord {
        title: usable_title(doc.title)?,
        author_names: doc.author_name,
        cover_id: doc.cover_i,
        first_publish_year: doc.first_publish_year,
        subjects: doc.subject,
        key: doc.key,
    })
}

/// Browse rows keep only the first listed author.
fn from_subject_work(work: SubjectWork, genre: Genre) -> Option<BookRecord> {
    let first_author = work.authors.first().and_then(|author| usable_name(&author.name));
    Some(BookRecord {
        title: usable_title(work.title)?,
        author_names: first_author.into_iter().collect(),
        cover_id: work.cover_id,
        first_publish_year: work.first_publish_year,
        subjects: vec![genre.slug().to_string()],
        key: work.key,
    })
}

/// Featured rows keep every author and only works that have a cover and authors.
fn featured_from_subject_work(work: SubjectWork, genre: Genre) -> Option<BookRecord> {
    if work.cover_id.is_none() || work.authors.is_empty() {
        return None;
    }

    let mut author_names: Vec<String> = work.authors.iter().filter_map(|a| usable_name(&a.name)).collect();
    if author_names.is_empty() {
        author_names.push(UNKNOWN_AUTHOR.to_string());
    }

    Some(BookRecord {
        title: usable_title(work.title)?,
        author_names,
        cover_id: work.cover_id,
        first_publish_year: work.first_publish_year,
        subjects: vec![genre.slug().to_string()],
        key: work.key,
    })
}

/// Turns catalog queries into [`BookRecord`] lists.
///
/// Every operation degrades to an empty list on transport failure or an
/// unexpected payload; callers see "no results", never an error.
#[derive(Clone)]
pub struct CatalogAdapter {
    transport: Arc<dyn CatalogTransport>,
}

impl CatalogAdapter {
    pub fn new(transport: Arc<dyn CatalogTransport>) -> Self {
        Self { transport }
    }

    /// Free-text search, at most [`MAX_RESULTS`] records in catalog order.
    pub async fn search_by_text(&self, query: &str) -> Vec<BookRecord> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let params = [("q", query.to_string())];
        match self.fetch::<SearchResponse>("/search.json", &params).await {
            Ok(response) => {
                let records: Vec<BookRecord> = response
                    .docs
                    .into_iter()
                    .filter_map(from_search_doc)
                    .take(MAX_RESULTS)
                    .collect();
                log_debug!("search {query:?} -> {} records", records.len());
                records
            }
            Err(err) => {
                log_warn!("catalog search for {query:?} failed: {err:#}");
                Vec::new()
            }
        }
    }

    /// Subject browse limited to [`MAX_RESULTS`] works.
    pub async fn browse_by_genre(&self, genre: Genre) -> Vec<BookRecord> {
        match self.fetch_subject(genre, MAX_RESULTS).await {
            Ok(response) => response
                .works
                .into_iter()
                .filter_map(|work| from_subject_work(work, genre))
                .take(MAX_RESULTS)
                .collect(),
            Err(err) => {
                log_warn!("catalog browse for {genre} failed: {err:#}");
                Vec::new()
            }
        }
    }

    /// Short row of presentable works for the discovery feed.
    pub async fn featured_by_genre(&self, genre: Genre) -> Vec<BookRecord> {
        match self.fetch_subject(genre, FEATURED_LIMIT).await {
            Ok(response) => response
                .works
                .into_iter()
                .filter_map(|work| featured_from_subject_work(work, genre))
                .take(FEATURED_LIMIT)
                .collect(),
            Err(err) => {
                log_warn!("featured row for {genre} failed: {err:#}");
                Vec::new()
            }
        }
    }

    async fn fetch_subject(&self, genre: Genre, limit: usize) -> Result<SubjectResponse> {
        let path = format!("/subjects/{}.json", genre.slug());
        self.fetch(&path, &[("limit", limit.to_string())]).await
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let value = self.transport.get_json(path, query).await?;
        serde_json::from_value(value).with_context(|| format!("unexpected payload from {path}"))
    }
}
