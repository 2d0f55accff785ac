//! The task entity and its identifiers.
//!
//! A [`Task`] is owned by exactly one [`OwnerId`] and is only ever visible
//! through requests authenticated as that owner. Titles are stored trimmed;
//! [`validate_title`] and [`normalize_title`] are the two entry points the
//! server and client share so the length invariant means the same thing on
//! both sides of the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum task title length in characters, after trimming.
pub const MIN_TITLE_LENGTH: usize = 3;

/// Maximum task title length in characters.
pub const MAX_TITLE_LENGTH: usize = 256;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the authenticated principal that owns a task.
///
/// Opaque to this crate: the authentication layer in front of the server
/// resolves credentials to an owner identity; everything here just carries
/// it around and scopes lookups with it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates an owner identifier from a string representation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this owner ID.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task as it travels over the wire and sits in the store.
///
/// `id`, `owner`, and `created_at` are immutable for the task's lifetime;
/// toggle flips `completed` and rename replaces `title`, nothing else.
/// JSON field names are camelCase to match the REST contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier, assigned at creation and never reused.
    pub id: TaskId,
    /// The principal that created the task.
    pub owner: OwnerId,
    /// Trimmed task title.
    pub title: String,
    /// Whether the task has been completed.
    pub completed: bool,
    /// When the task was created; the sole sort key for listings.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a fresh, uncompleted task owned by `owner`.
    ///
    /// The title is stored as given; callers are expected to have passed it
    /// through [`normalize_title`] or [`validate_title`] first.
    #[must_use]
    pub fn new(owner: OwnerId, title: String) -> Self {
        Self {
            id: TaskId::new(),
            owner,
            title,
            completed: false,
            created_at: Utc::now(),
        }
    }
}

/// Errors raised by title validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    /// Title is empty after trimming.
    #[error("task title cannot be empty")]
    Empty,
    /// Title is shorter than [`MIN_TITLE_LENGTH`] characters after trimming.
    #[error("task title must be at least {MIN_TITLE_LENGTH} characters")]
    TooShort,
    /// Title exceeds [`MAX_TITLE_LENGTH`] characters.
    #[error("task title too long (max {MAX_TITLE_LENGTH} characters)")]
    TooLong,
}

/// Trims a raw title and rejects empty or oversized input.
///
/// This is the check the server applies at creation: the minimum-length
/// rule lives with the caller (see [`validate_title`]).
///
/// # Errors
///
/// Returns [`TitleError::Empty`] or [`TitleError::TooLong`].
pub fn normalize_title(raw: &str) -> Result<String, TitleError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TitleError::Empty);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TitleError::TooLong);
    }
    Ok(trimmed.to_string())
}

/// Trims a raw title and enforces the full length invariant.
///
/// Applied on rename (both sides) and by the client before creating a task.
///
/// # Errors
///
/// Returns [`TitleError::Empty`], [`TitleError::TooShort`], or
/// [`TitleError::TooLong`].
pub fn validate_title(raw: &str) -> Result<String, TitleError> {
    let trimmed = normalize_title(raw)?;
    if trimmed.chars().count() < MIN_TITLE_LENGTH {
        return Err(TitleError::TooShort);
    }
    Ok(trimmed)
}
