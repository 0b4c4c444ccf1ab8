//! Text formatting functions.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ❄ ✓)
//! - Priority labels (P0-P4)
//! - Type badges ([bug], [feature], etc.)
//! - Issue line formatting

use weft_lib::{Issue, Priority, Status};

/// Status icon characters.
pub mod icons {
    /// Open issue - available to work (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Deferred - scheduled for later (snowflake).
    pub const DEFERRED: &str = "❄";
    /// Closed - completed (checkmark).
    pub const CLOSED: &str = "✓";
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Deferred => icons::DEFERRED,
        Status::Closed => icons::CLOSED,
    }
}

/// Format priority as "P0", "P1", etc.
#[must_use]
pub fn format_priority(priority: Priority) -> String {
    format!("P{}", priority.0)
}

/// Format issue type as a bracketed badge.
#[must_use]
pub fn format_type_badge(issue_type: &str) -> String {
    format!("[{issue_type}]")
}

/// Format a single-line issue summary.
///
/// Format: `{icon} {id} [{priority}] [{type}] {title}`
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    format!(
        "{} {} [{}] {} {}",
        format_status_icon(issue.status),
        issue.id,
        format_priority(issue.priority),
        format_type_badge(&issue.issue_type),
        issue.title,
    )
}
