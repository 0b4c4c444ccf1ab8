use serde::{Deserialize, Serialize};
use weft_lib::Issue;

/// Issue details with blocker context for the show view.
///
/// `nearest_open_blockers` substitutes closed blockers with whatever
/// still blocks them, so the caller sees actionable work items rather
/// than already-finished ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueDetails {
    #[serde(flatten)]
    pub issue: Issue,
    pub open_blockers: Vec<String>,
    pub nearest_open_blockers: Vec<String>,
}

/// Blocked issue with its open blockers for the blocked view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockedView {
    #[serde(flatten)]
    pub issue: Issue,
    pub blocked_by_count: usize,
    pub blocked_by: Vec<String>,
}

/// Tree node for dependency tree view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub issue: Issue,
    pub depth: usize,
    pub parent_id: Option<String>,
}

/// Sync outcome for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub status: String,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub replayed: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failed: Vec<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(n: &usize) -> bool {
    *n == 0
}
