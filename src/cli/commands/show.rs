//! Show command implementation.
//!
//! Detailed single-issue view with blocker context. Closed blockers are
//! substituted by whatever still blocks them, so the reader always sees
//! the actionable frontier.

use weft_lib::error::Result;

use super::open_backend;
use crate::cli::ShowArgs;
use crate::format::{IssueDetails, format_issue_line};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the issue does not exist.
pub fn execute(args: &ShowArgs, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let issue = store.get(&args.id)?;
    let open_blockers: Vec<String> = issue
        .blocked_by
        .iter()
        .filter(|id| store.get(id).map(|b| b.status.is_active()).unwrap_or(false))
        .cloned()
        .collect();
    let nearest = store.nearest_open_blockers(&args.id)?;

    if json {
        let details = IssueDetails {
            issue,
            open_blockers,
            nearest_open_blockers: nearest,
        };
        println!("{}", serde_json::to_string_pretty(&details)?);
        return Ok(());
    }

    println!("{}", format_issue_line(&issue));
    if let Some(description) = &issue.description {
        println!("\n{description}");
    }
    if let Some(assignee) = &issue.assignee {
        println!("Assignee: {assignee}");
    }
    if let Some(defer_until) = issue.defer_until {
        println!("Deferred until: {defer_until}");
    }
    if let Some(parent) = &issue.parent {
        println!("Parent: {parent}");
    }
    if !issue.labels.is_empty() {
        println!("Labels: {}", issue.labels.join(", "));
    }
    if let Some(reason) = &issue.close_reason {
        println!("Close reason: {reason}");
    }
    if !issue.blocked_by.is_empty() {
        println!("Blocked by: {}", issue.blocked_by.join(", "));
    }
    if !issue.blocks.is_empty() {
        println!("Blocks: {}", issue.blocks.join(", "));
    }
    if !nearest.is_empty() && nearest != open_blockers {
        println!("Nearest open blockers: {}", nearest.join(", "));
    }
    if !issue.comments.is_empty() {
        println!("\nComments:");
        for comment in &issue.comments {
            println!(
                "  [{}] {}: {}",
                comment.created_at.format("%Y-%m-%d %H:%M"),
                comment.author,
                comment.text
            );
        }
    }
    Ok(())
}
