use crate::store::Outcome;
use crate::todo::web::TodoState;
use crate::todo::{TodoItem, TodoStore};
use axum::{Router, extract::State, response::Json, routing::get};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON representation of a todo for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TodoJson {
    /// Unique identifier for the todo
    id: u32,
    /// What needs to be done
    title: String,
    /// Whether the todo is done
    completed: bool,
    /// Creation time, `YYYY-MM-DD HH:MM`
    created_at: String,
}

impl From<&TodoItem> for TodoJson {
    fn from(todo: &TodoItem) -> Self {
        Self {
            id: todo.id(),
            title: todo.title().to_string(),
            completed: todo.completed(),
            created_at: todo.created_at_display(),
        }
    }
}

/// API response listing all todos.
#[derive(Debug, Serialize, ToSchema)]
pub struct TodosResponse {
    /// Todos in insertion order
    todos: Vec<TodoJson>,
    /// Total number of todos
    count: usize,
    /// Present after a create; `false` when the change could not be written to disk
    #[serde(skip_serializing_if = "Option::is_none")]
    persisted: Option<bool>,
}

impl TodosResponse {
    fn new(store: &TodoStore, outcome: Option<&Outcome>) -> Self {
        let todos: Vec<TodoJson> = store.list().iter().map(TodoJson::from).collect();
        Self {
            count: todos.len(),
            todos,
            persisted: outcome.map(Outcome::is_persisted),
        }
    }
}

/// Request body for creating a todo.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Title of the new todo; empty or missing titles are ignored
    #[serde(default)]
    title: Option<String>,
}

/// Handler for GET /api/v1/todos - Returns all todos in JSON format.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    responses(
        (status = 200, description = "Successfully retrieved todos", body = TodosResponse)
    ),
    tag = "Todos"
)]
pub async fn get_todos_handler(State(state): State<Arc<TodoState>>) -> Json<TodosResponse> {
    let store = state.store.lock();
    Json(TodosResponse::new(&store, None))
}

/// Handler for POST /api/v1/todos - Creates a todo and returns the updated list.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    post,
    path = "/api/v1/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 200, description = "Current todos after the create", body = TodosResponse)
    ),
    tag = "Todos"
)]
pub async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    Json(request): Json<CreateTodoRequest>,
) -> Json<TodosResponse> {
    let mut store = state.store.lock();
    let outcome = store.create(request.title.as_deref());
    Json(TodosResponse::new(&store, Some(&outcome)))
}

/// Creates and returns the todos API router.
pub fn create_api_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(get_todos_handler).post(create_todo_handler))
        .with_state(state)
}
