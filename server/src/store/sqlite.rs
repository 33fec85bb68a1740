//! SQLite-backed document store.
//!
//! One `todos` table keyed by a generated UUID, with an index on `order` for
//! the sorted listing. rusqlite is blocking, so every call hops onto
//! `spawn_blocking` with the shared connection.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::{StoreError, TodoStore};
use crate::model::{Draft, Todo};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id BLOB NOT NULL UNIQUE,
        text TEXT NOT NULL,
        completed INTEGER NOT NULL DEFAULT 0,
        "order" INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_todos_order ON todos("order");
"#;

const COLUMNS: &str = r#"id, text, completed, "order""#;

pub struct SqliteStore {
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        debug!(path = %path.as_ref().display(), "opened sqlite store");
        Self::init(conn)
    }

    /// Private in-memory database, gone once the store is closed.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock();
            let conn = guard.as_ref().ok_or(StoreError::Closed)?;
            f(conn).map_err(StoreError::from)
        })
        .await?
    }
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    Ok(Todo {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get(2)?,
        order: row.get(3)?,
    })
}

#[async_trait]
impl TodoStore for SqliteStore {
    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = self
            .with_conn(|conn| conn.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0)))
            .await?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, draft: Draft) -> Result<Todo, StoreError> {
        let todo = draft.into_todo(Uuid::new_v4());
        let row = todo.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"INSERT INTO todos (id, text, completed, "order") VALUES (?1, ?2, ?3, ?4)"#,
                params![row.id, row.text, row.completed, row.order],
            )
        })
        .await?;
        Ok(todo)
    }

    async fn list_by_order(&self) -> Result<Vec<Todo>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!(r#"SELECT {COLUMNS} FROM todos ORDER BY "order", seq"#))?;
            let todos: rusqlite::Result<Vec<Todo>> = stmt.query_map([], row_to_todo)?.collect();
            todos
        })
        .await
    }

    async fn find(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"),
                params![id],
                row_to_todo,
            )
            .optional()
        })
        .await
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<bool, StoreError> {
        let changed = self
            .with_conn(move |conn| {
                conn.execute(
                    "UPDATE todos SET completed = ?1 WHERE id = ?2",
                    params![completed, id],
                )
            })
            .await?;
        Ok(changed > 0)
    }

    async fn set_text(&self, id: Uuid, text: String) -> Result<Option<Todo>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("UPDATE todos SET text = ?1 WHERE id = ?2 RETURNING {COLUMNS}"),
                params![text, id],
                row_to_todo,
            )
            .optional()
        })
        .await
    }

    async fn set_order(&self, id: Uuid, order: i64) -> Result<bool, StoreError> {
        let changed = self
            .with_conn(move |conn| {
                conn.execute(
                    r#"UPDATE todos SET "order" = ?1 WHERE id = ?2"#,
                    params![order, id],
                )
            })
            .await?;
        Ok(changed > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let changed = self
            .with_conn(move |conn| conn.execute("DELETE FROM todos WHERE id = ?1", params![id]))
            .await?;
        Ok(changed > 0)
    }

    async fn texts(&self) -> Result<Vec<String>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT text FROM todos")?;
            let texts: rusqlite::Result<Vec<String>> =
                stmt.query_map([], |row| row.get(0))?.collect();
            texts
        })
        .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || match conn.lock().take() {
            Some(conn) => conn.close().map_err(|(_, e)| StoreError::from(e)),
            None => Ok(()),
        })
        .await?
    }
}
