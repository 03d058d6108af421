use crate::chat::web::ChatState;
use crate::chat::{ChatMessage, MessageStore};
use crate::store::Outcome;
use axum::{Router, extract::State, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a chat message for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageJson {
    /// Unique identifier for the message
    id: u32,
    /// Who posted the message
    username: String,
    /// The message text
    message: String,
    /// Posting time, `YYYY-MM-DD HH:MM:SS`
    timestamp: String,
}

impl From<&ChatMessage> for MessageJson {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id(),
            username: message.username().to_string(),
            message: message.message().to_string(),
            timestamp: message.timestamp_display(),
        }
    }
}

/// API response listing all messages.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessagesResponse {
    /// Messages in posting order
    messages: Vec<MessageJson>,
    /// Total number of messages
    count: usize,
    /// Present after a post; `false` when the message could not be written to disk
    #[serde(skip_serializing_if = "Option::is_none")]
    persisted: Option<bool>,
}

impl MessagesResponse {
    fn new(store: &MessageStore, outcome: Option<&Outcome>) -> Self {
        let messages: Vec<MessageJson> = store.list().iter().map(MessageJson::from).collect();
        Self {
            count: messages.len(),
            messages,
            persisted: outcome.map(Outcome::is_persisted),
        }
    }
}

/// Request body for posting a message.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PostMessageRequest {
    /// Optional author; defaults to "Anonymous"
    #[serde(default)]
    username: Option<String>,
    /// Message text; empty or missing messages are ignored
    #[serde(default)]
    message: Option<String>,
}

/// Handler for GET /api/v1/messages - Returns all messages in JSON format.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses(
        (status = 200, description = "Successfully retrieved messages", body = MessagesResponse)
    ),
    tag = "Chat"
)]
pub async fn get_messages_handler(State(state): State<Arc<ChatState>>) -> Json<MessagesResponse> {
    let store = state.store.lock();
    Json(MessagesResponse::new(&store, None))
}

/// Handler for POST /api/v1/messages - Posts a message and returns the updated board.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = PostMessageRequest,
    responses(
        (status = 200, description = "Current messages after the post", body = MessagesResponse)
    ),
    tag = "Chat"
)]
pub async fn post_message_handler(
    State(state): State<Arc<ChatState>>,
    Json(request): Json<PostMessageRequest>,
) -> Json<MessagesResponse> {
    let mut store = state.store.lock();
    let outcome = store.create(request.username.as_deref(), request.message.as_deref());
    Json(MessagesResponse::new(&store, Some(&outcome)))
}

/// Creates and returns the messages API router.
pub fn create_api_router(state: Arc<ChatState>) -> Router {
    Router::new()
        .route(
            "/messages",
            get(get_messages_handler).post(post_message_handler),
        )
        .with_state(state)
}
