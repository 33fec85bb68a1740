//! Wire and storage shapes for the todo collection.
//!
//! # Design
//! Every endpoint gets its own payload struct so field presence is checked by
//! serde at the boundary, before anything reaches the store. `Todo` doubles as
//! the stored document and the JSON response body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub order: i64,
}

/// A todo that has not been assigned an id yet. The store assigns one on insert.
#[derive(Clone, Debug)]
pub struct Draft {
    pub text: String,
    pub completed: bool,
    pub order: i64,
}

impl Draft {
    pub fn into_todo(self, id: Uuid) -> Todo {
        Todo {
            id,
            text: self.text,
            completed: self.completed,
            order: self.order,
        }
    }
}

/// Body of `POST /todos`.
#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub text: String,
}

/// Body of `PUT /todos/{id}`.
#[derive(Debug, Deserialize)]
pub struct EditTodo {
    pub text: String,
}

/// Body of `POST /todos/reorder`.
#[derive(Debug, Deserialize)]
pub struct Reorder {
    pub id1: Uuid,
    pub order1: i64,
    pub id2: Uuid,
    pub order2: i64,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toggled {
    pub id: Uuid,
    pub completed: bool,
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct AverageLength {
    #[serde(rename = "averageLength")]
    pub average_length: f64,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: Uuid::nil(),
            text: "Test".to_string(),
            completed: false,
            order: 3,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["text"], "Test");
        assert_eq!(json["completed"], false);
        assert_eq!(json["order"], 3);
    }

    #[test]
    fn new_todo_rejects_missing_text() {
        let result: Result<NewTodo, _> = serde_json::from_str(r#"{"title":"wrong field"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_todo_ignores_unknown_fields() {
        let input: NewTodo =
            serde_json::from_str(r#"{"text":"Buy milk","completed":true}"#).unwrap();
        assert_eq!(input.text, "Buy milk");
    }

    #[test]
    fn reorder_requires_all_four_fields() {
        let result: Result<Reorder, _> = serde_json::from_str(
            r#"{"id1":"00000000-0000-0000-0000-000000000001","order1":1,"order2":0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn reorder_rejects_malformed_id() {
        let result: Result<Reorder, _> = serde_json::from_str(
            r#"{"id1":"nope","order1":1,"id2":"00000000-0000-0000-0000-000000000002","order2":0}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn average_length_uses_camel_case_key() {
        let json = serde_json::to_value(AverageLength { average_length: 2.5 }).unwrap();
        assert_eq!(json["averageLength"], 2.5);
    }

    #[test]
    fn draft_keeps_fields_when_given_an_id() {
        let draft = Draft {
            text: "Walk dog".to_string(),
            completed: false,
            order: 7,
        };
        let todo = draft.into_todo(Uuid::nil());
        assert_eq!(todo.id, Uuid::nil());
        assert_eq!(todo.text, "Walk dog");
        assert_eq!(todo.order, 7);
        assert!(!todo.completed);
    }
}
