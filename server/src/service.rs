//! The six todo operations, expressed as calls against a [`TodoStore`].
//!
//! # Design
//! Multi-step operations are composed from independent store calls and are
//! not atomic. Two concurrent creates can observe the same count and share an
//! `order`; two concurrent toggles can both read the same `completed` value.
//! `order` is an advisory sort key, so neither case corrupts the collection.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::model::{AverageLength, Draft, EditTodo, Message, NewTodo, Reorder, Todo, Toggled};
use crate::store::{SharedStore, StoreError};

#[derive(Clone)]
pub struct TodoService {
    store: SharedStore,
}

impl TodoService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Todo>, AppError> {
        Ok(self.store.list_by_order().await?)
    }

    /// New todos start incomplete and go to the end: `order` is the count of
    /// documents that existed before the insert.
    pub async fn create(&self, input: NewTodo) -> Result<Todo, AppError> {
        let text = require_text(input.text)?;
        let count = self.store.count().await?;
        let draft = Draft {
            text,
            completed: false,
            order: i64::try_from(count).unwrap_or(i64::MAX),
        };
        let todo = self.store.insert(draft).await?;
        info!(id = %todo.id, order = todo.order, "created todo");
        Ok(todo)
    }

    /// Deleting an id that matches nothing still succeeds.
    pub async fn delete(&self, id: Uuid) -> Result<Message, AppError> {
        let removed = self.store.delete(id).await?;
        debug!(%id, removed, "delete");
        Ok(Message::new("Deleted successfully"))
    }

    pub async fn toggle(&self, id: Uuid) -> Result<Toggled, AppError> {
        let current = self.store.find(id).await?.ok_or(AppError::NotFound(id))?;
        let completed = !current.completed;
        if !self.store.set_completed(id, completed).await? {
            // deleted between the read and the write
            return Err(AppError::NotFound(id));
        }
        Ok(Toggled { id, completed })
    }

    /// Replaces `text` only; `completed` and `order` are left alone.
    pub async fn update(&self, id: Uuid, input: EditTodo) -> Result<Todo, AppError> {
        let text = require_text(input.text)?;
        self.store
            .set_text(id, text)
            .await?
            .ok_or(AppError::NotFound(id))
    }

    /// Two independent writes. Ids that match nothing are skipped silently.
    pub async fn reorder(&self, input: Reorder) -> Result<Message, AppError> {
        let first = self.store.set_order(input.id1, input.order1).await?;
        let second = self.store.set_order(input.id2, input.order2).await?;
        debug!(id1 = %input.id1, first, id2 = %input.id2, second, "reorder");
        Ok(Message::new("Reordered"))
    }

    /// Mean `text` length in characters across the whole collection.
    pub async fn average_length(&self) -> Result<AverageLength, AppError> {
        let texts = self.store.texts().await?;
        Ok(AverageLength {
            average_length: mean_char_count(&texts),
        })
    }

    /// Release the store handle. Called once, after the server stops.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.store.close().await
    }
}

fn require_text(text: String) -> Result<String, AppError> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }
    Ok(text)
}

fn mean_char_count(texts: &[String]) -> f64 {
    if texts.is_empty() {
        return 0.0;
    }
    let total: usize = texts.iter().map(|t| t.chars().count()).sum();
    total as f64 / texts.len() as f64
}
