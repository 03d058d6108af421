pub mod api;

use askama::Template;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::chat::{ChatMessage, ChatState, MessageStore, create_chat_router};
use crate::config::Config;
use crate::todo::{TodoItem, TodoState, TodoStore, create_todo_router};

#[derive(Clone, Debug)]
pub struct AppState {
    pub todos: Arc<TodoState>,
    pub chat: Arc<ChatState>,
}

impl AppState {
    /// Opens both stores from the snapshot files named in the config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            todos: Arc::new(TodoState::new(TodoStore::open_file(&config.todos_file))),
            chat: Arc::new(ChatState::new(MessageStore::open_file(
                &config.messages_file,
            ))),
        }
    }
}

/// Custom error type for web handler operations.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Represents an error during template rendering.
    /// The specific `askama::Error` is captured as the source of this error.
    #[error("Template rendering failed")]
    Template(#[from] askama::Error),
}

impl axum::response::IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!("Request failed: {:?}", self);
        let user_facing_error_message =
            "An unexpected error occurred while processing your request. Please try again later.";
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!(
                "<h1>Internal Server Error</h1><p>{}</p>",
                user_facing_error_message
            )),
        )
            .into_response()
    }
}

/// Builds the full application router: pages, fragments and the JSON API.
pub fn create_app(state: AppState) -> Router {
    let todo_router = create_todo_router(state.todos.clone());
    let chat_router = create_chat_router(state.chat.clone());
    let api_router = api::create_api_router(state.todos.clone(), state.chat.clone());

    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check_handler))
        .with_state(state)
        .merge(todo_router)
        .merge(chat_router)
        .merge(api_router)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let state = AppState::from_config(&config);
    let app = create_app(state).layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

/// Handler for the landing page with both the todo list and the chat board.
#[tracing::instrument(skip(state))]
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, WebError> {
    let template = IndexTemplate::new(state.todos.snapshot(), state.chat.snapshot());
    template.render().map(Html).map_err(WebError::from)
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    todos: Vec<TodoItem>,
    messages: Vec<ChatMessage>,
}

impl IndexTemplate {
    pub fn new(todos: Vec<TodoItem>, messages: Vec<ChatMessage>) -> Self {
        Self { todos, messages }
    }
}
