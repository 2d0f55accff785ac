//! Authoritative in-memory task collection, scoped per owner.
//!
//! The [`TaskStore`] keys every task first by [`OwnerId`], then by
//! [`TaskId`]. Single-task operations look up by owner AND id inside one
//! write-lock section, so a task owned by someone else is indistinguishable
//! from a missing one, and two concurrent mutations of the same task each
//! observe a consistent prior state (lookup and mutation never separate).

use std::collections::HashMap;

use tokio::sync::RwLock;

use taskly_proto::page::{DEFAULT_PAGE_LIMIT, ListQuery, SortOrder, TaskPage};
use taskly_proto::task::{OwnerId, Task, TaskId, TitleError, normalize_title, validate_title};

/// Errors raised by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The supplied title violates the length invariant.
    #[error(transparent)]
    Title(#[from] TitleError),
    /// No task with this id is owned by the caller.
    ///
    /// Deliberately silent about whether the id exists under another owner.
    #[error("task not found")]
    NotFound,
}

/// In-memory per-owner task map with listing, creation, and mutation.
///
/// Thread-safe via [`RwLock`]. Listings never fail: an out-of-range page
/// yields an empty slice with intact totals.
pub struct TaskStore {
    owners: RwLock<HashMap<OwnerId, HashMap<TaskId, Task>>>,
    default_limit: usize,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates a new, empty store with the default page size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
            default_limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Creates a new, empty store with a custom default page size.
    #[must_use]
    pub fn with_default_limit(default_limit: usize) -> Self {
        Self {
            owners: RwLock::new(HashMap::new()),
            default_limit: default_limit.max(1),
        }
    }

    /// Lists one page of the owner's tasks.
    ///
    /// Applies the completion filter, sorts by creation time (task id as a
    /// deterministic tiebreak), and slices out the requested page. `total`
    /// counts every owner task matching the filter, not just this page.
    pub async fn list(&self, owner: &OwnerId, query: &ListQuery) -> TaskPage {
        let owners = self.owners.read().await;
        let mut filtered: Vec<Task> = owners
            .get(owner)
            .map(|tasks| {
                tasks
                    .values()
                    .filter(|t| query.completed.is_none_or(|c| t.completed == c))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(owners);

        match query.effective_sort() {
            SortOrder::Latest => {
                filtered.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            }
            SortOrder::Oldest => {
                filtered.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
            }
        }

        TaskPage::from_filtered(
            filtered,
            query.effective_page(),
            query.effective_limit_or(self.default_limit),
        )
    }

    /// Creates a task for the owner and returns it.
    ///
    /// The store itself only rejects empty (or oversized) titles; the
    /// minimum-length rule is enforced before requests reach it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Title`] if the trimmed title is empty or too
    /// long.
    pub async fn create(&self, owner: &OwnerId, title: &str) -> Result<Task, StoreError> {
        let title = normalize_title(title)?;
        let task = Task::new(owner.clone(), title);

        let mut owners = self.owners.write().await;
        owners
            .entry(owner.clone())
            .or_default()
            .insert(task.id, task.clone());
        drop(owners);

        tracing::debug!(owner = %owner, task_id = %task.id, "task created");
        Ok(task)
    }

    /// Flips the completion state of an owned task and returns it.
    ///
    /// Each call is a state-changing flip, not a set: calling it twice
    /// restores the original state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task with `id` is owned by
    /// `owner`.
    pub async fn toggle(&self, owner: &OwnerId, id: TaskId) -> Result<Task, StoreError> {
        let mut owners = self.owners.write().await;
        let task = owners
            .get_mut(owner)
            .and_then(|tasks| tasks.get_mut(&id))
            .ok_or(StoreError::NotFound)?;
        task.completed = !task.completed;
        let updated = task.clone();
        drop(owners);

        tracing::debug!(owner = %owner, task_id = %id, completed = updated.completed, "task toggled");
        Ok(updated)
    }

    /// Replaces the title of an owned task and returns it.
    ///
    /// `id`, `owner`, and `createdAt` are untouched. Validation happens
    /// before the lookup, so invalid input never mutates state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Title`] if the trimmed title violates the
    /// length invariant, or [`StoreError::NotFound`] if no task with `id`
    /// is owned by `owner`.
    pub async fn rename(&self, owner: &OwnerId, id: TaskId, title: &str) -> Result<Task, StoreError> {
        let title = validate_title(title)?;

        let mut owners = self.owners.write().await;
        let task = owners
            .get_mut(owner)
            .and_then(|tasks| tasks.get_mut(&id))
            .ok_or(StoreError::NotFound)?;
        task.title = title;
        let updated = task.clone();
        drop(owners);

        tracing::debug!(owner = %owner, task_id = %id, "task renamed");
        Ok(updated)
    }

    /// Permanently removes an owned task.
    ///
    /// The id is never reused for a different task; deleting the same id
    /// twice yields [`StoreError::NotFound`] the second time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no task with `id` is owned by
    /// `owner`.
    pub async fn delete(&self, owner: &OwnerId, id: TaskId) -> Result<(), StoreError> {
        let mut owners = self.owners.write().await;
        owners
            .get_mut(owner)
            .and_then(|tasks| tasks.remove(&id))
            .ok_or(StoreError::NotFound)?;
        drop(owners);

        tracing::debug!(owner = %owner, task_id = %id, "task deleted");
        Ok(())
    }
}
