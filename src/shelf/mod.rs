pub mod store;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{BookRecord, ShelfEntry};

pub use store::ShelfStore;

/// Per-user document collection holding shelf entries.
///
/// The SQLite [`Database`](crate::db::Database) implements it; tests swap in
/// fakes that fail on demand.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list(&self, owner_uid: &str) -> Result<Vec<ShelfEntry>>;
    async fn append(&self, owner_uid: &str, book: &BookRecord) -> Result<ShelfEntry>;
    async fn delete(&self, owner_uid: &str, entry_id: &str) -> Result<()>;
}
