use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, State},
    response::Html,
    routing::{delete, get, post},
};
use parking_lot::Mutex;
use serde::Deserialize;
use std::sync::Arc;

use crate::todo::{TodoItem, TodoStore};
use crate::web::WebError;

#[derive(Debug, Deserialize)]
pub struct CreateTodoForm {
    title: Option<String>,
}

/// Shared handle on the to-do store.
pub struct TodoState {
    pub store: Mutex<TodoStore>,
}

impl TodoState {
    pub fn new(store: TodoStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Copies the current list out from under the lock.
    pub fn snapshot(&self) -> Vec<TodoItem> {
        self.store.lock().list().to_vec()
    }
}

impl std::fmt::Debug for TodoState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoState").finish_non_exhaustive()
    }
}

#[derive(Template)]
#[template(path = "todos/todo_list.html")]
struct TodoListTemplate {
    todos: Vec<TodoItem>,
}

impl TodoListTemplate {
    pub fn new(todos: Vec<TodoItem>) -> Self {
        Self { todos }
    }
}

/// Runs `operation` against the store and renders the resulting list.
fn apply_and_render<F>(state: &TodoState, operation: F) -> Result<Html<String>, WebError>
where
    F: FnOnce(&mut TodoStore) -> crate::store::Outcome,
{
    let todos = {
        let mut store = state.store.lock();
        let outcome = operation(&mut *store);
        tracing::debug!(
            applied = outcome.is_applied(),
            persisted = outcome.is_persisted(),
            "Todo operation finished"
        );
        store.list().to_vec()
    };
    render_todo_list(todos)
}

fn render_todo_list(todos: Vec<TodoItem>) -> Result<Html<String>, WebError> {
    let template = TodoListTemplate::new(todos);
    template.render().map(Html).map_err(WebError::from)
}

/// Handler for the /todos endpoint that renders the current list.
#[tracing::instrument(skip(state))]
async fn todos_handler(State(state): State<Arc<TodoState>>) -> Result<Html<String>, WebError> {
    render_todo_list(state.snapshot())
}

/// Handler for creating a new todo via POST request.
#[tracing::instrument(skip(state))]
async fn create_todo_handler(
    State(state): State<Arc<TodoState>>,
    Form(form): Form<CreateTodoForm>,
) -> Result<Html<String>, WebError> {
    apply_and_render(&state, |store| store.create(form.title.as_deref()))
}

/// Handler for toggling a todo via POST request.
#[tracing::instrument(skip(state))]
async fn toggle_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<u32>,
) -> Result<Html<String>, WebError> {
    apply_and_render(&state, |store| store.toggle(id))
}

/// Handler for deleting a todo via DELETE request.
#[tracing::instrument(skip(state))]
async fn delete_todo_handler(
    State(state): State<Arc<TodoState>>,
    Path(id): Path<u32>,
) -> Result<Html<String>, WebError> {
    apply_and_render(&state, |store| store.delete(id))
}

/// Creates and returns the todo router with all todo-related routes.
pub fn create_todo_router(state: Arc<TodoState>) -> Router {
    Router::new()
        .route("/todos", get(todos_handler).post(create_todo_handler))
        .route("/todos/{id}/toggle", post(toggle_todo_handler))
        .route("/todos/{id}", delete(delete_todo_handler))
        .with_state(state)
}
