//! Client-side seam to the task service.
//!
//! The [`TaskApi`] trait is the only way the reconciler reaches the
//! network; tests substitute scripted implementations to exercise the
//! rollback paths deterministically. Session identity travels as explicit
//! state inside the implementation, never as ambient globals.

pub mod http;

pub use http::{HttpTaskApi, Session};

use taskly_proto::page::{ListQuery, TaskPage};
use taskly_proto::task::{Task, TaskId};

/// How server failures look to the reconciler.
///
/// The reconciler treats every variant the same way when deciding whether
/// to roll back; the split exists so callers can phrase notifications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server rejected the input shape or length (400).
    #[error("{0}")]
    Validation(String),
    /// No owned task matched the request (404).
    #[error("task not found")]
    NotFound,
    /// Transport failure or an unexpected server response.
    #[error("request failed: {0}")]
    Unexpected(String),
}

/// Operations the task service exposes to a client.
///
/// One implementation speaks HTTP ([`HttpTaskApi`]); test doubles answer
/// from memory.
pub trait TaskApi {
    /// Fetches one page of the caller's tasks.
    async fn list(&self, query: &ListQuery) -> Result<TaskPage, ApiError>;

    /// Creates a task and returns the server's copy.
    async fn create(&self, title: &str) -> Result<Task, ApiError>;

    /// Flips the completion state of a task, returning the updated task.
    async fn toggle(&self, id: TaskId) -> Result<Task, ApiError>;

    /// Replaces a task's title, returning the updated task.
    async fn rename(&self, id: TaskId, title: &str) -> Result<Task, ApiError>;

    /// Permanently removes a task.
    async fn delete(&self, id: TaskId) -> Result<(), ApiError>;
}
