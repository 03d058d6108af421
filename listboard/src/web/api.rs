use std::sync::Arc;

use axum::{Router, response::Json, routing::get};
use utoipa::OpenApi;

use crate::chat::{self, ChatState};
use crate::todo::{self, TodoState};

#[derive(OpenApi)]
#[openapi(
    paths(
        todo::api::v1::get_todos_handler,
        todo::api::v1::create_todo_handler,
        chat::api::v1::get_messages_handler,
        chat::api::v1::post_message_handler,
    ),
    components(schemas(
        todo::api::v1::TodoJson,
        todo::api::v1::TodosResponse,
        todo::api::v1::CreateTodoRequest,
        chat::api::v1::MessageJson,
        chat::api::v1::MessagesResponse,
        chat::api::v1::PostMessageRequest,
    )),
    tags(
        (name = "Todos", description = "To-do list"),
        (name = "Chat", description = "Chat message board")
    )
)]
pub struct ApiDoc;

/// Handler for GET /api/v1/openapi.json - Serves the API description.
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the API routes for JSON API endpoints.
pub fn create_api_router(todo_state: Arc<TodoState>, chat_state: Arc<ChatState>) -> Router {
    let todos_router = todo::api::v1::create_api_router(todo_state);
    let messages_router = chat::api::v1::create_api_router(chat_state);
    let api_routes = todos_router
        .merge(messages_router)
        .route("/openapi.json", get(openapi_handler));
    Router::new().nest("/api/v1", api_routes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_describe_every_api_path() {
        let doc = ApiDoc::openapi();
        let mut paths: Vec<String> = doc.paths.paths.keys().cloned().collect();
        paths.sort();

        assert_eq!(paths, vec!["/api/v1/messages", "/api/v1/todos"]);
    }
}
