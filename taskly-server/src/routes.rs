//! REST surface for the task store.
//!
//! | Method | Path | Success | Failure |
//! |--------|------|---------|---------|
//! | GET | /tasks | 200 page | 500 |
//! | POST | /tasks | 201 created task | 400, 500 |
//! | PATCH | /tasks/{id} | 200 toggled task | 404, 500 |
//! | PATCH | /tasks/{id}/title | 200 renamed task | 400, 404, 500 |
//! | DELETE | /tasks/{id} | 200 confirmation | 404, 500 |
//! | GET | /health | 200 status | — |
//!
//! Every failing response carries an [`ErrorBody`]; internal faults are
//! reported generically and never leak detail. All `/tasks` routes sit
//! behind the identity layer from [`crate::identity`].

use std::sync::Arc;

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, patch};
use serde::Serialize;
use uuid::Uuid;

use taskly_proto::page::{ListQuery, TaskPage};
use taskly_proto::task::{OwnerId, Task, TaskId};
use taskly_proto::wire::{CreateTask, Deleted, ErrorBody, RenameTask};

use crate::identity;
use crate::store::{StoreError, TaskStore};

/// Shared server state: the authoritative task store.
pub struct AppState {
    /// The per-owner task collection.
    pub store: TaskStore,
}

impl AppState {
    /// Creates server state around a configured store.
    #[must_use]
    pub const fn new(store: TaskStore) -> Self {
        Self { store }
    }
}

/// How store failures surface on the wire.
///
/// The three kinds map to fixed status/message pairs; nothing else about
/// the underlying fault crosses the boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Bad input shape or length (400).
    Validation(String),
    /// No owned task matched (404); silent about foreign owners.
    NotFound,
    /// Storage or transport failure (500), reported generically.
    Internal,
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Title(e) => Self::Validation(e.to_string()),
            StoreError::NotFound => Self::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound => (StatusCode::NOT_FOUND, "task not found".to_string()),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "server error".to_string()),
        };
        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    /// Service status.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// GET /health: liveness probe, no auth.
#[allow(clippy::unused_async)]
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /tasks: one page of the caller's tasks.
async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Query(query): Query<ListQuery>,
) -> Json<TaskPage> {
    Json(state.store.list(&owner, &query).await)
}

/// POST /tasks: create a task for the caller.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Json(body): Json<CreateTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.store.create(&owner, &body.title).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PATCH /tasks/{id}: flip the completion state of a task.
async fn toggle_task(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = state.store.toggle(&owner, TaskId::from_uuid(id)).await?;
    Ok(Json(task))
}

/// PATCH /tasks/{id}/title: rename a task.
async fn rename_task(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<Uuid>,
    Json(body): Json<RenameTask>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .store
        .rename(&owner, TaskId::from_uuid(id), &body.title)
        .await?;
    Ok(Json(task))
}

/// DELETE /tasks/{id}: permanently remove a task.
async fn delete_task(
    State(state): State<Arc<AppState>>,
    Extension(owner): Extension<OwnerId>,
    Path(id): Path<Uuid>,
) -> Result<Json<Deleted>, ApiError> {
    state.store.delete(&owner, TaskId::from_uuid(id)).await?;
    Ok(Json(Deleted::task()))
}

/// Builds the full router: task routes behind the identity layer, plus the
/// unauthenticated health probe.
pub fn build_router(state: Arc<AppState>) -> axum::Router {
    let tasks = axum::Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", patch(toggle_task).delete(delete_task))
        .route("/tasks/{id}/title", patch(rename_task))
        .layer(axum::middleware::from_fn(identity::require_owner))
        .with_state(state);

    axum::Router::new().route("/health", get(health)).merge(tasks)
}

/// Starts the task server on the given address and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(AppState::new(TaskStore::new()))).await
}

/// Starts the task server with pre-configured [`AppState`].
///
/// Use [`TaskStore::with_default_limit`] to honor the resolved
/// [`crate::config::ServerConfig`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "task server error");
        }
    });

    Ok((bound_addr, handle))
}
