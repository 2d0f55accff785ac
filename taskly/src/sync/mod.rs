//! View-state reconciliation against the task service.
//!
//! The [`Reconciler`] owns one rendered page of tasks plus the state around
//! it (page number, filter, sort, totals, loading flag, inline edit). Low-
//! risk mutations (toggle, delete) apply optimistically before the network
//! resolves and roll back to a pre-mutation snapshot on failure; create and
//! rename wait for the server's answer. Rollback is value semantics: the
//! snapshot is an immutable copy of the whole list, restored wholesale, not
//! an undo log.
//!
//! A stale list response arriving after a newer refresh may overwrite newer
//! data; the reconciler does not sequence or cancel in-flight requests.

pub mod edit;

pub use edit::EditState;

use taskly_proto::page::{DEFAULT_PAGE_LIMIT, ListQuery, SortOrder};
use taskly_proto::task::{Task, TaskId, TitleError, validate_title};

use crate::api::{ApiError, TaskApi};

/// Errors surfaced to the caller of reconciler operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    /// Local title validation failed; no network call was made.
    #[error(transparent)]
    Title(#[from] TitleError),
    /// The server rejected the operation; any optimistic change was rolled
    /// back.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The addressed task is not on the current page.
    #[error("task {0} is not in the current page")]
    UnknownTask(TaskId),
    /// A confirm was issued with no edit in progress.
    #[error("no edit in progress")]
    NoActiveEdit,
}

/// Client-side owner of one page of tasks and its synchronization with the
/// server.
pub struct Reconciler<A: TaskApi> {
    api: A,
    tasks: Vec<Task>,
    page: u32,
    completed: Option<bool>,
    sort: SortOrder,
    total_pages: u32,
    total: u64,
    page_size: u32,
    loading: bool,
    edit: EditState,
}

impl<A: TaskApi> Reconciler<A> {
    /// Creates a reconciler with an empty list and the default page size.
    ///
    /// Call [`refresh`](Self::refresh) to load the first page.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self::with_page_size(api, DEFAULT_PAGE_LIMIT as u32)
    }

    /// Creates a reconciler with a custom page size.
    #[must_use]
    pub fn with_page_size(api: A, page_size: u32) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            page: 1,
            completed: None,
            sort: SortOrder::Latest,
            total_pages: 0,
            total: 0,
            page_size: page_size.max(1),
            loading: false,
            edit: EditState::Idle,
        }
    }

    /// The currently rendered task list, in listing order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The current 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Total pages for the current filter, as of the last refresh.
    #[must_use]
    pub const fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Total matching tasks, as of the last refresh.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The active completion filter.
    #[must_use]
    pub const fn filter(&self) -> Option<bool> {
        self.completed
    }

    /// Whether a list request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The inline-edit state.
    #[must_use]
    pub const fn edit(&self) -> &EditState {
        &self.edit
    }

    fn query(&self) -> ListQuery {
        ListQuery {
            page: Some(self.page),
            limit: Some(self.page_size),
            completed: self.completed,
            sort: Some(self.sort),
        }
    }

    /// Reloads the current page from the server.
    ///
    /// On success the task list and totals are replaced. On failure the
    /// previously rendered data is left exactly as it was and the error is
    /// reported to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the list request fails.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        self.loading = true;
        let result = self.api.list(&self.query()).await;
        self.loading = false;

        let page = result?;
        self.tasks = page.tasks;
        self.total_pages = page.total_pages;
        self.total = page.total;
        Ok(())
    }

    /// Moves to another page and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the list request fails; the
    /// previously rendered tasks stay in place.
    pub async fn goto_page(&mut self, page: u32) -> Result<(), SyncError> {
        self.page = page.max(1);
        self.refresh().await
    }

    /// Changes the completion filter, resets to page 1, and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the list request fails.
    pub async fn set_filter(&mut self, completed: Option<bool>) -> Result<(), SyncError> {
        self.completed = completed;
        self.page = 1;
        self.refresh().await
    }

    /// Changes the sort direction and refreshes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the list request fails.
    pub async fn set_sort(&mut self, sort: SortOrder) -> Result<(), SyncError> {
        self.sort = sort;
        self.refresh().await
    }

    /// Creates a task, then resets to page 1 and refreshes.
    ///
    /// The title is validated locally first; a violation short-circuits
    /// without a network call so the caller can keep the pending input for
    /// correction.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Title`] on local validation failure, or
    /// [`SyncError::Api`] when the create or the follow-up refresh fails.
    pub async fn add(&mut self, raw_title: &str) -> Result<(), SyncError> {
        let title = validate_title(raw_title)?;
        self.api.create(&title).await?;
        tracing::debug!(title = %title, "task created, returning to first page");
        self.page = 1;
        self.refresh().await
    }

    /// Optimistically flips a task's completion state, then confirms with
    /// the server.
    ///
    /// The flip is applied locally before the network call resolves; on
    /// failure the list is restored to the snapshot taken immediately
    /// before the flip. The server's returned task is not re-applied --
    /// only the boolean differs, and it already matches.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownTask`] if `id` is not on the current
    /// page, or [`SyncError::Api`] after rolling back.
    pub async fn toggle(&mut self, id: TaskId) -> Result<(), SyncError> {
        let snapshot = self.tasks.clone();
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(SyncError::UnknownTask(id))?;
        task.completed = !task.completed;

        if let Err(e) = self.api.toggle(id).await {
            tracing::warn!(task_id = %id, error = %e, "toggle rejected, rolling back");
            self.tasks = snapshot;
            return Err(e.into());
        }
        Ok(())
    }

    /// Optimistically removes a task, then confirms with the server.
    ///
    /// On success the page is refreshed so pagination counts match the
    /// server again; on failure the pre-removal snapshot is restored.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Api`] when the delete fails (after rollback)
    /// or when the follow-up refresh fails.
    pub async fn delete(&mut self, id: TaskId) -> Result<(), SyncError> {
        let snapshot = self.tasks.clone();
        self.tasks.retain(|t| t.id != id);

        if let Err(e) = self.api.delete(id).await {
            tracing::warn!(task_id = %id, error = %e, "delete rejected, rolling back");
            self.tasks = snapshot;
            return Err(e.into());
        }
        self.refresh().await
    }

    /// Renames a task, waiting for the server before touching local state.
    ///
    /// No optimistic update: on success the server-returned task replaces
    /// the matching entry in place. The title is validated locally first,
    /// mirroring the server's minimum-length invariant, and a violation
    /// short-circuits without a network call.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Title`] on local validation failure or
    /// [`SyncError::Api`] when the server rejects the rename.
    pub async fn rename(&mut self, id: TaskId, raw_title: &str) -> Result<(), SyncError> {
        let title = validate_title(raw_title)?;
        let updated = self.api.rename(id, &title).await?;
        if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == id) {
            *slot = updated;
        }
        Ok(())
    }

    /// Enters edit mode for a task on the current page, displacing any
    /// edit already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::UnknownTask`] if `id` is not on the current
    /// page.
    pub fn begin_edit(&mut self, id: TaskId) -> Result<(), SyncError> {
        let task = self
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(SyncError::UnknownTask(id))?;
        self.edit.begin(id, &task.title);
        Ok(())
    }

    /// Replaces the draft text of the edit in progress, if any.
    pub fn set_draft(&mut self, text: &str) {
        self.edit.set_draft(text);
    }

    /// Abandons the edit in progress.
    pub fn cancel_edit(&mut self) {
        self.edit.cancel();
    }

    /// Confirms the edit in progress by renaming through the server.
    ///
    /// On success edit mode ends; on failure the edit (and its draft) stay
    /// active so the caller can correct and retry.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoActiveEdit`] when idle, or whatever
    /// [`rename`](Self::rename) returns.
    pub async fn confirm_edit(&mut self) -> Result<(), SyncError> {
        let (id, draft) = self.edit.current().ok_or(SyncError::NoActiveEdit)?;
        let draft = draft.to_string();
        self.rename(id, &draft).await?;
        self.edit.cancel();
        Ok(())
    }
}
