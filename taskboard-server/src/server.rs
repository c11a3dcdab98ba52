//! HTTP layer: shared state, the task router, and request handlers.
//!
//! Every handler is a thin translation between the HTTP surface and the
//! [`TaskStore`]. The store reports absence as `Option`; handlers turn
//! `None` into a redirect to the task list. No "not found" condition ever
//! produces an error status — missing records degrade to a redirect.

use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, put};
use axum::{Form, Router};

use taskboard_model::{TaskAttributes, TaskId, parse_completion_date};

use crate::render;
use crate::store::TaskStore;

/// Shared application state handed to every handler.
pub struct AppState {
    /// Persistence boundary for task records.
    pub store: TaskStore,
    /// Site name shown in rendered page titles.
    pub site_name: String,
}

impl AppState {
    /// Creates state with an empty store.
    #[must_use]
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            store: TaskStore::new(),
            site_name: site_name.into(),
        }
    }
}

/// Flat form payload submitted by the create and edit forms.
///
/// `completion_date` arrives as text from a `datetime-local` input; empty or
/// unparseable values mean "incomplete".
#[derive(Debug, serde::Deserialize)]
pub struct TaskForm {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completion_date: Option<String>,
}

impl TaskForm {
    fn into_attributes(self) -> TaskAttributes {
        TaskAttributes {
            name: self.name,
            description: self.description,
            completion_date: self
                .completion_date
                .as_deref()
                .and_then(parse_completion_date),
        }
    }
}

/// Browser form payload for `POST /tasks/{id}`.
///
/// HTML forms can only submit GET and POST, so the rendered delete and edit
/// forms carry the real verb in a hidden `_method` field, Rails-style.
#[derive(Debug, serde::Deserialize)]
struct MethodOverrideForm {
    #[serde(rename = "_method")]
    method: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    completion_date: Option<String>,
}

/// Builds the task resource router.
///
/// `GET /` is an alias for the task list. Mutation routes are registered
/// under their real verbs and under POST for the server-rendered forms:
/// `POST /tasks/{id}` dispatches on the `_method` override field, and
/// `POST /tasks/{id}/complete` behaves like the PUT route.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_tasks))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/new", get(new_task_form))
        .route(
            "/tasks/{id}",
            get(show_task)
                .post(post_task_action)
                .patch(update_task)
                .delete(destroy_task),
        )
        .route("/tasks/{id}/edit", get(edit_task_form))
        .route(
            "/tasks/{id}/complete",
            put(toggle_complete).post(toggle_complete),
        )
        .with_state(state)
}

/// `GET /tasks` (and `GET /`) — renders all tasks.
async fn list_tasks(State(state): State<Arc<AppState>>) -> Html<String> {
    let tasks = state.store.list().await;
    Html(render::task_list_page(&state.site_name, &tasks))
}

/// `GET /tasks/{id}` — renders one task, or redirects to the list when the
/// id is unknown.
async fn show_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Html<String>, Redirect> {
    match state.store.get(id).await {
        Some(task) => Ok(Html(render::task_detail_page(&state.site_name, &task))),
        None => {
            tracing::warn!(id = %id, "show: task not found, redirecting to list");
            Err(Redirect::to("/tasks"))
        }
    }
}

/// `GET /tasks/new` — renders the empty creation form. No store interaction.
async fn new_task_form(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(render::new_task_page(&state.site_name))
}

/// `POST /tasks` — persists a new task and redirects to its show page.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TaskForm>,
) -> Redirect {
    let task = state.store.create(form.into_attributes()).await;
    tracing::info!(id = %task.id, name = %task.name, "task created");
    Redirect::to(&format!("/tasks/{}", task.id))
}

/// `GET /tasks/{id}/edit` — renders the edit form, or redirects to the list
/// when the id is unknown.
async fn edit_task_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Html<String>, Redirect> {
    match state.store.get(id).await {
        Some(task) => Ok(Html(render::edit_task_page(&state.site_name, &task))),
        None => {
            tracing::warn!(id = %id, "edit: task not found, redirecting to list");
            Err(Redirect::to("/tasks"))
        }
    }
}

/// `PATCH /tasks/{id}` — applies the submitted attributes and redirects.
///
/// Always responds with a redirect: to the task when it was updated, to the
/// list when the id is unknown or no parseable form body was submitted. An
/// unknown id mutates nothing.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    form: Result<Form<TaskForm>, FormRejection>,
) -> Redirect {
    let Ok(Form(form)) = form else {
        tracing::warn!(id = %id, "update without form payload");
        return Redirect::to("/tasks");
    };
    apply_update(&state, id, form.into_attributes()).await
}

/// `DELETE /tasks/{id}` — removes the task if present. Always redirects to
/// the list, whether or not the id existed.
async fn destroy_task(State(state): State<Arc<AppState>>, Path(id): Path<TaskId>) -> Redirect {
    remove_task(&state, id).await
}

/// `POST /tasks/{id}` — entry point for the rendered delete and edit forms.
///
/// Dispatches on the hidden `_method` field: `patch`/`put` applies the
/// submitted attributes, `delete` removes the task. Anything else (or an
/// unparseable body) redirects to the list without touching the store.
async fn post_task_action(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    form: Result<Form<MethodOverrideForm>, FormRejection>,
) -> Redirect {
    let Ok(Form(form)) = form else {
        tracing::warn!(id = %id, "post without method override payload");
        return Redirect::to("/tasks");
    };
    match form.method.as_str() {
        "patch" | "put" => {
            let attrs = TaskAttributes {
                name: form.name,
                description: form.description,
                completion_date: form
                    .completion_date
                    .as_deref()
                    .and_then(parse_completion_date),
            };
            apply_update(&state, id, attrs).await
        }
        "delete" => remove_task(&state, id).await,
        other => {
            tracing::warn!(id = %id, method = %other, "unsupported method override");
            Redirect::to("/tasks")
        }
    }
}

/// Applies `attrs` to a task, shared by the PATCH route and the form-post
/// override path.
async fn apply_update(state: &AppState, id: TaskId, attrs: TaskAttributes) -> Redirect {
    match state.store.update(id, attrs).await {
        Some(task) => {
            tracing::info!(id = %task.id, "task updated");
            Redirect::to(&format!("/tasks/{}", task.id))
        }
        None => {
            tracing::warn!(id = %id, "update: task not found, redirecting to list");
            Redirect::to("/tasks")
        }
    }
}

/// Removes a task, shared by the DELETE route and the form-post override
/// path. Always redirects to the list.
async fn remove_task(state: &AppState, id: TaskId) -> Redirect {
    match state.store.delete(id).await {
        Some(task) => tracing::info!(id = %task.id, name = %task.name, "task deleted"),
        None => tracing::warn!(id = %id, "destroy: task not found"),
    }
    Redirect::to("/tasks")
}

/// `PUT /tasks/{id}/complete` — flips the completion state. Always redirects
/// to the list.
async fn toggle_complete(State(state): State<Arc<AppState>>, Path(id): Path<TaskId>) -> Redirect {
    match state.store.toggle_complete(id).await {
        Some(task) => {
            tracing::info!(id = %task.id, complete = task.is_complete(), "task toggled");
        }
        None => tracing::warn!(id = %id, "toggle: task not found"),
    }
    Redirect::to("/tasks")
}

/// Starts the server on the given address and returns the bound address and
/// a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}
