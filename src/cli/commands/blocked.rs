//! Blocked command implementation.

use weft_lib::error::Result;

use super::open_backend;
use crate::format::{BlockedView, format_issue_line};

/// Execute the blocked command: active issues with at least one open
/// blocker.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let blocked = store.blocked()?;
    if json {
        let views: Vec<BlockedView> = blocked
            .into_iter()
            .map(|b| BlockedView {
                issue: b.issue,
                blocked_by_count: b.open_blockers.len(),
                blocked_by: b.open_blockers,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if blocked.is_empty() {
        println!("No blocked issues.");
    } else {
        for entry in &blocked {
            println!(
                "{} (blocked by {})",
                format_issue_line(&entry.issue),
                entry.open_blockers.join(", ")
            );
        }
        println!("\n{} blocked", blocked.len());
    }
    Ok(())
}
