use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TodoStore};
use crate::model::{Draft, Todo};

/// Documents plus their insertion sequence, which breaks ties between equal
/// `order` values.
#[derive(Default)]
struct Collection {
    docs: HashMap<Uuid, (u64, Todo)>,
    next_seq: u64,
}

/// In-process store used for tests and throwaway runs.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collection>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn count(&self) -> Result<u64, StoreError> {
        self.ensure_open()?;
        Ok(self.inner.read().await.docs.len() as u64)
    }

    async fn insert(&self, draft: Draft) -> Result<Todo, StoreError> {
        self.ensure_open()?;
        let todo = draft.into_todo(Uuid::new_v4());
        let mut collection = self.inner.write().await;
        let seq = collection.next_seq;
        collection.next_seq += 1;
        collection.docs.insert(todo.id, (seq, todo.clone()));
        Ok(todo)
    }

    async fn list_by_order(&self) -> Result<Vec<Todo>, StoreError> {
        self.ensure_open()?;
        let collection = self.inner.read().await;
        let mut entries: Vec<&(u64, Todo)> = collection.docs.values().collect();
        entries.sort_by_key(|(seq, todo)| (todo.order, *seq));
        Ok(entries.into_iter().map(|(_, todo)| todo.clone()).collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        self.ensure_open()?;
        let collection = self.inner.read().await;
        Ok(collection.docs.get(&id).map(|(_, todo)| todo.clone()))
    }

    async fn set_completed(&self, id: Uuid, completed: bool) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let mut collection = self.inner.write().await;
        match collection.docs.get_mut(&id) {
            Some((_, todo)) => {
                todo.completed = completed;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_text(&self, id: Uuid, text: String) -> Result<Option<Todo>, StoreError> {
        self.ensure_open()?;
        let mut collection = self.inner.write().await;
        Ok(collection.docs.get_mut(&id).map(|(_, todo)| {
            todo.text = text;
            todo.clone()
        }))
    }

    async fn set_order(&self, id: Uuid, order: i64) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let mut collection = self.inner.write().await;
        match collection.docs.get_mut(&id) {
            Some((_, todo)) => {
                todo.order = order;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        self.ensure_open()?;
        Ok(self.inner.write().await.docs.remove(&id).is_some())
    }

    async fn texts(&self) -> Result<Vec<String>, StoreError> {
        self.ensure_open()?;
        let collection = self.inner.read().await;
        Ok(collection
            .docs
            .values()
            .map(|(_, todo)| todo.text.clone())
            .collect())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(text: &str, order: i64) -> Draft {
        Draft {
            text: text.to_string(),
            completed: false,
            order,
        }
    }

    #[tokio::test]
    async fn insert_generates_distinct_ids() {
        let store = MemoryStore::new();
        let a = store.insert(draft("a", 0)).await.unwrap();
        let b = store.insert(draft("b", 1)).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn list_sorts_by_order_then_insertion() {
        let store = MemoryStore::new();
        store.insert(draft("third", 5)).await.unwrap();
        store.insert(draft("first", 1)).await.unwrap();
        store.insert(draft("second", 5)).await.unwrap();
        store.insert(draft("zeroth", -2)).await.unwrap();

        let texts: Vec<String> = store
            .list_by_order()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, ["zeroth", "first", "third", "second"]);
    }

    #[tokio::test]
    async fn set_text_returns_updated_document() {
        let store = MemoryStore::new();
        let todo = store.insert(draft("old", 0)).await.unwrap();
        let updated = store
            .set_text(todo.id, "new".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.text, "new");
        assert_eq!(updated.order, 0);
    }

    #[tokio::test]
    async fn writes_to_missing_ids_report_no_match() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(!store.set_completed(id, true).await.unwrap());
        assert!(!store.set_order(id, 3).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.set_text(id, "x".to_string()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn operations_fail_after_close() {
        let store = MemoryStore::new();
        store.close().await.unwrap();
        let err = store.count().await.unwrap_err();
        assert!(matches!(err, StoreError::Closed));
    }
}
