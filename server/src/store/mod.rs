//! Persistence seam for todo documents.
//!
//! # Design
//! `TodoStore` only exposes single-document primitives. Anything that needs
//! more than one call (count-then-insert, read-then-write) is composed in the
//! service layer and is not atomic.
//!
//! The handle is acquired once through [`connect`] and released with
//! [`TodoStore::close`]; every operation after that fails with
//! [`StoreError::Closed`].

mod memory;
mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{Draft, Todo};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type SharedStore = Arc<dyn TodoStore>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store handle is closed")]
    Closed,

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Number of documents in the collection.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Insert a draft, returning it with the id the store generated.
    async fn insert(&self, draft: Draft) -> Result<Todo, StoreError>;

    /// All documents, ascending by `order`.
    async fn list_by_order(&self) -> Result<Vec<Todo>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Todo>, StoreError>;

    /// Returns `false` when no document matched.
    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<bool, StoreError>;

    /// Replace `text` and return the document after the write.
    async fn set_text(&self, id: Uuid, text: String) -> Result<Option<Todo>, StoreError>;

    /// Returns `false` when no document matched.
    async fn set_order(&self, id: Uuid, order: i64) -> Result<bool, StoreError>;

    /// Returns `false` when no document matched.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// The `text` field of every document, in no particular order.
    async fn texts(&self) -> Result<Vec<String>, StoreError>;

    async fn close(&self) -> Result<(), StoreError>;
}

/// Open a store from a connection string.
///
/// - `memory://` keeps documents in process memory.
/// - `sqlite::memory:` opens a private in-memory SQLite database.
/// - `sqlite://<path>` opens (or creates) a SQLite database file.
pub fn connect(url: &str) -> Result<SharedStore, StoreError> {
    if url == "memory://" {
        return Ok(Arc::new(MemoryStore::new()));
    }
    if url == "sqlite::memory:" {
        return Ok(Arc::new(SqliteStore::open_in_memory()?));
    }
    if let Some(path) = url.strip_prefix("sqlite://") {
        if !path.is_empty() {
            return Ok(Arc::new(SqliteStore::open(path)?));
        }
    }
    Err(StoreError::UnsupportedUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_memory_url() {
        let store = connect("memory://").unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn connect_sqlite_in_memory_url() {
        let store = connect("sqlite::memory:").unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[test]
    fn connect_rejects_unknown_scheme() {
        let err = connect("mongodb://localhost:27017").err().unwrap();
        assert!(matches!(err, StoreError::UnsupportedUrl(_)));
    }

    #[test]
    fn connect_rejects_bare_memory_scheme() {
        let err = connect("memory").err().unwrap();
        assert!(matches!(err, StoreError::UnsupportedUrl(_)));
    }

    #[test]
    fn connect_rejects_sqlite_without_path() {
        let err = connect("sqlite://").err().unwrap();
        assert!(matches!(err, StoreError::UnsupportedUrl(_)));
    }
}
