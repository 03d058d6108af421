use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::{FileMedium, Outcome, Record, SnapshotMedium, Store};
use crate::timestamp;

pub mod api;
pub mod web;

pub use web::{TodoState, create_todo_router};

#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    id: u32,
    title: String,
    #[serde(default)]
    completed: bool,
    #[serde(with = "timestamp::minutes")]
    created_at: NaiveDateTime,
}

impl TodoItem {
    pub fn new(id: u32, title: String, created_at: NaiveDateTime) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at,
        }
    }

    /// Returns the ID of the todo.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the title of the todo.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns whether the todo is done.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns when the todo was created, to the minute.
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Returns the creation time the way it is stored.
    pub fn created_at_display(&self) -> String {
        self.created_at.format(timestamp::MINUTE_FORMAT).to_string()
    }
}

impl Record for TodoItem {
    const LIST_KEY: &'static str = "todos";
    const COUNTER_KEY: &'static str = "next_id";

    fn id(&self) -> u32 {
        self.id
    }
}

/// The to-do list and its id counter.
pub struct TodoStore {
    store: Store<TodoItem>,
}

impl TodoStore {
    pub fn open(medium: impl SnapshotMedium + 'static) -> Self {
        Self {
            store: Store::open(medium),
        }
    }

    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::open(FileMedium::new(path))
    }

    /// Returns all todos in insertion order.
    pub fn list(&self) -> &[TodoItem] {
        self.store.records()
    }

    pub fn next_id(&self) -> u32 {
        self.store.next_id()
    }

    /// Creates a new todo.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the todo. An absent or empty title leaves the
    ///   store untouched.
    #[tracing::instrument(skip(self))]
    pub fn create(&mut self, title: Option<&str>) -> Outcome {
        let Some(title) = title.filter(|title| !title.is_empty()) else {
            return Outcome::unchanged();
        };
        let created_at = timestamp::now_to_minute();
        self.store
            .insert_with(|id| TodoItem::new(id, title.to_string(), created_at))
    }

    /// Flips the completion flag of the todo with the given ID, if any.
    #[tracing::instrument(skip(self))]
    pub fn toggle(&mut self, id: u32) -> Outcome {
        self.store
            .update_first(id, |todo| todo.completed = !todo.completed)
    }

    /// Deletes every todo with the given ID.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: u32) -> Outcome {
        self.store.remove_all(id)
    }
}
