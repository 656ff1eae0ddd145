use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::{
    helpers::{decode_list, encode_list, parse_datetime},
    Database,
};
use crate::models::{BookRecord, ShelfEntry};
use crate::shelf::DocumentStore;

fn row_to_entry(row: &Row) -> Result<ShelfEntry> {
    let author_names: String = row.get("author_names")?;
    let subjects: String = row.get("subjects")?;
    let added_at: String = row.get("added_at")?;

    Ok(ShelfEntry {
        id: row.get("id")?,
        book: BookRecord {
            title: row.get("title")?,
            author_names: decode_list(&author_names, "author_names")?,
            cover_id: row.get("cover_id")?,
            first_publish_year: row.get("first_publish_year")?,
            subjects: decode_list(&subjects, "subjects")?,
            key: row.get("work_key")?,
        },
        added_at: parse_datetime(&added_at, "added_at")?,
    })
}

impl Database {
    pub async fn insert_book(&self, owner_uid: &str, book: &BookRecord) -> Result<ShelfEntry> {
        let owner_uid = owner_uid.to_string();
        let entry = ShelfEntry {
            id: Uuid::new_v4().to_string(),
            book: book.clone(),
            added_at: Utc::now(),
        };

        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO books (id, owner_uid, title, author_names, cover_id, first_publish_year, subjects, work_key, added_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    entry.id,
                    owner_uid,
                    entry.book.title,
                    encode_list(&entry.book.author_names)?,
                    entry.book.cover_id,
                    entry.book.first_publish_year,
                    encode_list(&entry.book.subjects)?,
                    entry.book.key,
                    entry.added_at.to_rfc3339(),
                ],
            )?;
            Ok(entry)
        })
        .await
    }

    /// All shelf documents of one user in insertion order.
    pub async fn get_books_for_owner(&self, owner_uid: &str) -> Result<Vec<ShelfEntry>> {
        let owner_uid = owner_uid.to_string();
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, author_names, cover_id, first_publish_year, subjects, work_key, added_at
                 FROM books
                 WHERE owner_uid = ?1
                 ORDER BY added_at ASC, rowid ASC",
            )?;

            let mut rows = stmt.query(params![owner_uid])?;
            let mut entries = Vec::new();
            while let Some(row) = rows.next()? {
                entries.push(row_to_entry(row)?);
            }

            Ok(entries)
        })
        .await
    }

    pub async fn delete_book_for_owner(&self, owner_uid: &str, entry_id: &str) -> Result<()> {
        let owner_uid = owner_uid.to_string();
        let entry_id = entry_id.to_string();
        self.execute(move |conn| {
            let rows_affected = conn.execute(
                "DELETE FROM books WHERE id = ?1 AND owner_uid = ?2",
                params![entry_id, owner_uid],
            )?;

            if rows_affected == 0 {
                return Err(anyhow!("Shelf entry {entry_id} not found"));
            }
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl DocumentStore for Database {
    async fn list(&self, owner_uid: &str) -> Result<Vec<ShelfEntry>> {
        self.get_books_for_owner(owner_uid).await
    }

    async fn append(&self, owner_uid: &str, book: &BookRecord) -> Result<ShelfEntry> {
        self.insert_book(owner_uid, book).await
    }

    async fn delete(&self, owner_uid: &str, entry_id: &str) -> Result<()> {
        self.delete_book_for_owner(owner_uid, entry_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_temp;
    use pretty_assertions::assert_eq;

    fn dune() -> BookRecord {
        BookRecord {
            title: "Dune".into(),
            author_names: vec!["Frank Herbert".into()],
            cover_id: Some(11481354),
            first_publish_year: Some(1965),
            subjects: vec!["science_fiction".into()],
            key: Some("/works/OL893415W".into()),
        }
    }

    #[tokio::test]
    async fn stored_books_come_back_intact() {
        let (_dir, db) = open_temp();
        let entry = db.insert_book("uid-a", &dune()).await.unwrap();

        let listed = db.get_books_for_owner("uid-a").await.unwrap();
        assert_eq!(listed, vec![entry]);
    }

    #[tokio::test]
    async fn shelves_are_scoped_per_owner() {
        let (_dir, db) = open_temp();
        db.insert_book("uid-a", &dune()).await.unwrap();
        db.insert_book("uid-a", &dune()).await.unwrap();

        assert_eq!(db.get_books_for_owner("uid-a").await.unwrap().len(), 2);
        assert!(db.get_books_for_owner("uid-b").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_requires_matching_owner() {
        let (_dir, db) = open_temp();
        let entry = db.insert_book("uid-a", &dune()).await.unwrap();

        assert!(db.delete_book_for_owner("uid-b", &entry.id).await.is_err());
        db.delete_book_for_owner("uid-a", &entry.id).await.unwrap();
        assert!(db.get_books_for_owner("uid-a").await.unwrap().is_empty());
        assert!(db.delete_book_for_owner("uid-a", &entry.id).await.is_err());
    }
}
