//! Inline-edit state machine.
//!
//! At most one task is in edit mode at a time: `Idle ⇄ Editing`. Starting
//! an edit for another task displaces the current one; cancel and a
//! confirmed rename both return to `Idle`.

use taskly_proto::task::TaskId;

/// The current inline-edit state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    /// No edit in progress.
    #[default]
    Idle,
    /// One task's title is being edited.
    Editing {
        /// The task being edited.
        id: TaskId,
        /// The draft title, as typed so far.
        draft: String,
    },
}

impl EditState {
    /// Enters edit mode for `id`, seeding the draft with the current title.
    ///
    /// Any edit already in progress is discarded.
    pub fn begin(&mut self, id: TaskId, current_title: &str) {
        *self = Self::Editing {
            id,
            draft: current_title.to_string(),
        };
    }

    /// Replaces the draft text, if an edit is in progress.
    pub fn set_draft(&mut self, text: &str) {
        if let Self::Editing { draft, .. } = self {
            *draft = text.to_string();
        }
    }

    /// Abandons the edit in progress, if any.
    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    /// Returns the edited task and draft, or `None` when idle.
    #[must_use]
    pub fn current(&self) -> Option<(TaskId, &str)> {
        match self {
            Self::Idle => None,
            Self::Editing { id, draft } => Some((*id, draft.as_str())),
        }
    }

    /// Whether `id` is the task currently in edit mode.
    #[must_use]
    pub fn is_editing(&self, id: TaskId) -> bool {
        matches!(self, Self::Editing { id: editing, .. } if *editing == id)
    }
}
