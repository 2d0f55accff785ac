//! Request and response bodies for the REST surface.
//!
//! Every error body is the same shape, `{"message": "..."}`, regardless of
//! status code; the server never puts stack traces or internal identifiers
//! in it.

use serde::{Deserialize, Serialize};

/// Header carrying the authenticated owner identity.
///
/// Set by the authentication layer in front of the API; the task service
/// trusts it completely and never re-validates credentials.
pub const IDENTITY_HEADER: &str = "x-taskly-owner";

/// Body of `POST /tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    /// Title for the new task.
    pub title: String,
}

/// Body of `PATCH /tasks/{id}/title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameTask {
    /// Replacement title.
    pub title: String,
}

/// Confirmation body of `DELETE /tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    /// Human-readable confirmation.
    pub message: String,
}

impl Deleted {
    /// The confirmation sent after a successful delete.
    #[must_use]
    pub fn task() -> Self {
        Self {
            message: "task deleted".to_string(),
        }
    }
}

/// Error body shared by every failing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// User-facing description of the failure.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
