//! Domain DTOs for the todo API.
//!
//! # Design
//! These mirror the server's JSON but are defined independently so the
//! client carries no axum or storage dependencies. The integration test
//! catches schema drift between the two crates.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub order: i64,
}

/// Payload for creating a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
}

/// Payload for replacing a todo's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditTodo {
    pub text: String,
}

/// Payload for moving two todos to new `order` values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reorder {
    pub id1: Uuid,
    pub order1: i64,
    pub id2: Uuid,
    pub order2: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toggled {
    pub id: Uuid,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AverageLength {
    #[serde(rename = "averageLength")]
    pub average_length: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: String,
    pub timestamp: String,
}

/// Error body the server attaches to every non-2xx response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
