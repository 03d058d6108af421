use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::{FileMedium, Outcome, Record, SnapshotMedium, Store};
use crate::timestamp;

pub mod api;
pub mod web;

pub use web::{ChatState, create_chat_router};

/// Username recorded when a message is posted without one.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: u32,
    username: String,
    message: String,
    #[serde(with = "timestamp::seconds")]
    timestamp: NaiveDateTime,
}

impl ChatMessage {
    pub fn new(id: u32, username: String, message: String, timestamp: NaiveDateTime) -> Self {
        Self {
            id,
            username,
            message,
            timestamp,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn timestamp_display(&self) -> String {
        self.timestamp.format(timestamp::SECOND_FORMAT).to_string()
    }
}

impl Record for ChatMessage {
    const LIST_KEY: &'static str = "messages";
    const COUNTER_KEY: &'static str = "next_message_id";

    fn id(&self) -> u32 {
        self.id
    }
}

/// The chat board. Messages can only be appended.
pub struct MessageStore {
    store: Store<ChatMessage>,
}

impl MessageStore {
    pub fn open(medium: impl SnapshotMedium + 'static) -> Self {
        Self {
            store: Store::open(medium),
        }
    }

    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::open(FileMedium::new(path))
    }

    pub fn list(&self) -> &[ChatMessage] {
        self.store.records()
    }

    pub fn next_id(&self) -> u32 {
        self.store.next_id()
    }

    /// Posts a message. An absent or empty message leaves the store
    /// untouched; an absent or empty username becomes [`ANONYMOUS`].
    #[tracing::instrument(skip(self))]
    pub fn create(&mut self, username: Option<&str>, message: Option<&str>) -> Outcome {
        let Some(message) = message.filter(|message| !message.is_empty()) else {
            return Outcome::unchanged();
        };
        let username = username
            .filter(|username| !username.is_empty())
            .unwrap_or(ANONYMOUS);
        let timestamp = timestamp::now_to_second();
        self.store.insert_with(|id| {
            ChatMessage::new(id, username.to_string(), message.to_string(), timestamp)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Change;
    use crate::store::snapshot::MockSnapshotMedium;
    use std::io;

    fn fresh_store() -> (tempfile::TempDir, MessageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = MessageStore::open_file(dir.path().join("messages.json"));
        (dir, store)
    }

    #[test]
    fn can_post_message_with_username() {
        let (_dir, mut store) = fresh_store();
        let before = timestamp::now_to_second();

        let outcome = store.create(Some("ada"), Some("hello"));

        assert!(outcome.is_applied());
        assert!(outcome.is_persisted());
        let message = &store.list()[0];
        assert_eq!(message.id(), 1);
        assert_eq!(message.username(), "ada");
        assert_eq!(message.message(), "hello");
        assert!(message.timestamp() >= before);
        assert_eq!(store.next_id(), 2);
    }

    #[test]
    fn can_default_missing_username_to_anonymous() {
        let (_dir, mut store) = fresh_store();

        store.create(None, Some("hi"));
        store.create(Some(""), Some("hi again"));

        let names: Vec<&str> = store.list().iter().map(ChatMessage::username).collect();
        assert_eq!(names, vec![ANONYMOUS, ANONYMOUS]);
    }

    #[test]
    fn can_ignore_empty_or_missing_message() {
        let (dir, mut store) = fresh_store();

        let empty = store.create(Some("ada"), Some(""));
        let missing = store.create(Some("ada"), None);

        assert_eq!(empty.change, Change::Unchanged);
        assert_eq!(missing.change, Change::Unchanged);
        assert!(store.list().is_empty());
        assert_eq!(store.next_id(), 1);
        assert!(!dir.path().join("messages.json").exists());
    }

    #[test]
    fn can_keep_posting_order_and_increasing_ids() {
        let (_dir, mut store) = fresh_store();

        store.create(Some("a"), Some("first"));
        store.create(Some("b"), Some("second"));
        store.create(None, Some("third"));

        let summary: Vec<(u32, &str)> = store
            .list()
            .iter()
            .map(|message| (message.id(), message.message()))
            .collect();
        assert_eq!(summary, vec![(1, "first"), (2, "second"), (3, "third")]);
    }

    #[test]
    fn can_reload_messages_and_counter_after_restart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        {
            let mut store = MessageStore::open_file(&path);
            store.create(Some("ada"), Some("one"));
            store.create(None, Some("two"));
        }

        let reopened = MessageStore::open_file(&path);

        assert_eq!(reopened.list().len(), 2);
        assert_eq!(reopened.list()[1].username(), ANONYMOUS);
        assert_eq!(reopened.next_id(), 3);
    }

    #[test]
    fn can_write_the_messages_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("messages.json");
        let mut store = MessageStore::open_file(&path);

        store.create(Some("ada"), Some("hello"));

        let document: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document["next_message_id"], 2);
        assert_eq!(document["messages"][0]["id"], 1);
        assert_eq!(document["messages"][0]["username"], "ada");
        assert_eq!(document["messages"][0]["message"], "hello");
        assert_eq!(
            document["messages"][0]["timestamp"],
            store.list()[0].timestamp_display()
        );
    }

    #[test]
    fn can_accept_message_when_disk_write_fails() {
        let mut medium = MockSnapshotMedium::new();
        medium
            .expect_read()
            .returning(|| Err(io::Error::from(io::ErrorKind::NotFound)));
        medium
            .expect_location()
            .return_const("memory".to_string());
        medium
            .expect_write()
            .returning(|_| Err(io::Error::from(io::ErrorKind::StorageFull)));
        let mut store = MessageStore::open(medium);

        let outcome = store.create(None, Some("still here"));

        assert!(outcome.is_applied());
        assert!(!outcome.is_persisted());
        assert_eq!(store.list()[0].message(), "still here");
    }
}
