//! List queries and pagination.
//!
//! A [`TaskPage`] is derived, never stored: the server recomputes it from
//! the owner's filtered task list on every request. All pagination
//! arithmetic lives in [`TaskPage::from_filtered`] so the server and the
//! property tests agree on one definition.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Page size used when a list request does not specify a limit.
pub const DEFAULT_PAGE_LIMIT: usize = 5;

/// Sort direction for task listings, keyed on creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest tasks first (descending `createdAt`).
    #[default]
    Latest,
    /// Oldest tasks first (ascending `createdAt`).
    Oldest,
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Oldest => write!(f, "oldest"),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(Self::Latest),
            "oldest" => Ok(Self::Oldest),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Query parameters for a task listing.
///
/// Every field is optional on the wire; zero or missing values fall back to
/// the defaults (page 1, limit [`DEFAULT_PAGE_LIMIT`], newest first, no
/// completion filter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// 1-based page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Maximum number of tasks per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Restrict to completed (`true`) or open (`false`) tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOrder>,
}

impl ListQuery {
    /// Resolves the requested page number, defaulting to 1.
    #[must_use]
    pub fn effective_page(&self) -> usize {
        self.page.map_or(1, |p| p.max(1) as usize)
    }

    /// Resolves the page size against a fallback default.
    #[must_use]
    pub fn effective_limit_or(&self, default: usize) -> usize {
        match self.limit {
            Some(l) if l > 0 => l as usize,
            _ => default,
        }
    }

    /// Resolves the sort direction, defaulting to newest-first.
    #[must_use]
    pub fn effective_sort(&self) -> SortOrder {
        self.sort.unwrap_or_default()
    }
}

/// One page of an owner's tasks plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    /// The tasks on this page, in listing order.
    pub tasks: Vec<Task>,
    /// The 1-based page number that was requested.
    pub page: u32,
    /// Total number of pages for the current filter.
    pub total_pages: u32,
    /// Total number of tasks matching the current filter.
    pub total: u64,
}

impl TaskPage {
    /// Slices a filtered, sorted task list into one page.
    ///
    /// `page` is clamped to at least 1 and `limit` to at least 1. A page
    /// past the end yields an empty slice, never an error, and
    /// `total_pages` is `ceil(total / limit)` (zero when there are no
    /// matching tasks).
    #[must_use]
    pub fn from_filtered(filtered: Vec<Task>, page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total = filtered.len();
        let total_pages = total.div_ceil(limit);
        let tasks: Vec<Task> = filtered
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();

        Self {
            tasks,
            page: saturating_u32(page),
            total_pages: saturating_u32(total_pages),
            total: total as u64,
        }
    }
}

/// Converts a count to `u32`, saturating at the maximum.
fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
