use askama::Template;
use axum::{Form, Router, extract::State, response::Html, routing::get};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;

use crate::chat::{ChatMessage, MessageStore};
use crate::web::WebError;

#[derive(Debug, Deserialize)]
pub struct PostMessageForm {
    username: Option<String>,
    message: Option<String>,
}

/// Shared handle on the message store.
pub struct ChatState {
    pub store: Mutex<MessageStore>,
}

impl ChatState {
    pub fn new(store: MessageStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Copies the current messages out from under the lock.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.store.lock().list().to_vec()
    }
}

impl std::fmt::Debug for ChatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatState").finish_non_exhaustive()
    }
}

#[derive(Template)]
#[template(path = "chat/message_list.html")]
struct MessageListTemplate {
    messages: Vec<ChatMessage>,
}

impl MessageListTemplate {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }
}

fn render_message_list(messages: Vec<ChatMessage>) -> Result<Html<String>, WebError> {
    let template = MessageListTemplate::new(messages);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for the /messages endpoint that renders the chat history.
#[tracing::instrument(skip(state))]
async fn messages_handler(State(state): State<Arc<ChatState>>) -> Result<Html<String>, WebError> {
    render_message_list(state.snapshot())
}

/// Handler for posting a message via POST request.
#[tracing::instrument(skip(state))]
async fn post_message_handler(
    State(state): State<Arc<ChatState>>,
    Form(form): Form<PostMessageForm>,
) -> Result<Html<String>, WebError> {
    let messages = {
        let mut store = state.store.lock();
        let outcome = store.create(form.username.as_deref(), form.message.as_deref());
        tracing::debug!(
            applied = outcome.is_applied(),
            persisted = outcome.is_persisted(),
            "Message post finished"
        );
        store.list().to_vec()
    };
    render_message_list(messages)
}

/// Creates and returns the chat router.
pub fn create_chat_router(state: Arc<ChatState>) -> Router {
    Router::new()
        .route("/messages", get(messages_handler).post(post_message_handler))
        .with_state(state)
}
