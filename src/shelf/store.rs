use std::{cmp::Ordering, sync::Arc};

use crate::models::{BookRecord, Session, ShelfEntry};
use crate::notify::Notifier;

use super::DocumentStore;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub const ADDED_MESSAGE: &str = "Added to your shelf!";
pub const ADD_FAILED_MESSAGE: &str = "Could not add book.";
pub const REMOVED_MESSAGE: &str = "Book removed.";
pub const REMOVE_FAILED_MESSAGE: &str = "Could not remove book.";
pub const LOAD_FAILED_MESSAGE: &str = "Error loading your books.";

/// The signed-in user's shelf as one screen sees it.
///
/// The in-memory list only ever reflects store operations that completed:
/// entries are appended after the store confirms the write and dropped after
/// the store confirms the delete. Failures leave the list untouched and raise
/// an error toast instead.
pub struct ShelfStore {
    documents: Arc<dyn DocumentStore>,
    notifier: Notifier,
    entries: Vec<ShelfEntry>,
}

impl ShelfStore {
    pub fn new(documents: Arc<dyn DocumentStore>, notifier: Notifier) -> Self {
        Self {
            documents,
            notifier,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ShelfEntry] {
        &self.entries
    }

    /// Reloads the shelf from the store, sorted by title.
    pub async fn list(&mut self, session: &Session) -> &[ShelfEntry] {
        match self.documents.list(&session.uid).await {
            Ok(mut entries) => {
                sort_by_title(&mut entries);
                self.entries = entries;
            }
            Err(err) => {
                log_error!("failed to load shelf for {}: {err:?}", session.uid);
                self.notifier.error(LOAD_FAILED_MESSAGE);
            }
        }
        &self.entries
    }

    /// Saves `book` to the shelf. Duplicates are accepted.
    pub async fn add(&mut self, session: &Session, book: &BookRecord) -> Option<ShelfEntry> {
        match self.documents.append(&session.uid, book).await {
            Ok(entry) => {
                log_info!("added '{}' to shelf of {}", entry.book.title, session.uid);
                self.entries.push(entry.clone());
                sort_by_title(&mut self.entries);
                self.notifier.success(ADDED_MESSAGE);
                Some(entry)
            }
            Err(err) => {
                log_error!("failed to add '{}' to shelf: {err:?}", book.title);
                self.notifier.error(ADD_FAILED_MESSAGE);
                None
            }
        }
    }

    /// Deletes one entry. Returns whether the store confirmed the delete.
    pub async fn remove(&mut self, session: &Session, entry_id: &str) -> bool {
        match self.documents.delete(&session.uid, entry_id).await {
            Ok(()) => {
                self.entries.retain(|entry| entry.id != entry_id);
                self.notifier.success(REMOVED_MESSAGE);
                true
            }
            Err(err) => {
                log_error!("failed to remove shelf entry {entry_id}: {err:?}");
                self.notifier.error(REMOVE_FAILED_MESSAGE);
                false
            }
        }
    }
}

/// Case-insensitive title order; exact comparison breaks ties so the order is total.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn sort_by_title(entries: &mut [ShelfEntry]) {
    entries.sort_by(|a, b| compare_titles(&a.book.title, &b.book.title));
}
