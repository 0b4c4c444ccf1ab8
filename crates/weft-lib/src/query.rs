//! Query and filter types for issue operations.

use chrono::NaiveDate;

use crate::model::{Priority, Status};

/// Fields to update on an issue. `Option<Option<T>>` fields distinguish
/// "leave alone" (None) from "clear" (Some(None)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub issue_type: Option<String>,
    pub assignee: Option<Option<String>>,
    pub defer_until: Option<Option<NaiveDate>>,
    pub parent: Option<Option<String>>,
}

impl IssueUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.issue_type.is_none()
            && self.assignee.is_none()
            && self.defer_until.is_none()
            && self.parent.is_none()
    }
}

/// Filter options for listing issues.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct ListFilters {
    pub statuses: Option<Vec<Status>>,
    pub types: Option<Vec<String>>,
    pub priorities: Option<Vec<Priority>>,
    pub assignee: Option<String>,
    pub unassigned: bool,
    pub include_closed: bool,
    pub include_deferred: bool,
    /// Substring match over title and description.
    pub search: Option<String>,
    /// Filter by labels (all specified labels must match).
    pub labels: Option<Vec<String>>,
    pub limit: Option<usize>,
}

/// A blocked issue together with the blockers still open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedIssue {
    pub issue: crate::model::Issue,
    pub open_blockers: Vec<String>,
}

/// The plan a delete would execute: edges to sever and children to orphan.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeletePlan {
    /// IDs whose `blocked_by` lists reference the deleted issue.
    pub blocked_issues: Vec<String>,
    /// IDs whose `blocks` lists reference the deleted issue.
    pub blocking_issues: Vec<String>,
    /// Children whose `parent` will be cleared.
    pub orphaned_children: Vec<String>,
}
