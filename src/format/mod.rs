//! Output formatting.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//! `--json` sends clean JSON to stdout with diagnostics on stderr.
//!
//! # JSON Output Types
//!
//! - [`IssueDetails`] - Issue with blocker context (show)
//! - [`BlockedView`] - Issue with its open blockers (blocked)
//! - [`TreeNode`] - Issue in dependency tree (dep tree)
//! - [`SyncReport`] - Sync outcome with replay detail (sync)

mod output;
mod text;

pub use output::{BlockedView, IssueDetails, SyncReport, TreeNode};
pub use text::{format_issue_line, format_priority, format_status_icon, format_type_badge};
