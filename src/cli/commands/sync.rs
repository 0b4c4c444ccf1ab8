//! Sync command implementation.
//!
//! Drives the fetch/rebase/push state machine. When a rebase conflict
//! surfaces, the local commits are replayed as intents against the
//! fetched tip and the result pushed, so two clones editing disjoint
//! fields of the same issue both keep their edits.

use weft_lib::error::Result;
use weft_lib::replay;

use super::open_backend;
use crate::format::SyncReport;
use crate::repo::SyncStatus;

/// Execute the sync command.
///
/// # Errors
///
/// Returns an error if git plumbing fails or a replay push is rejected.
pub fn execute(json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let status = backend.sync()?;
    let mut report = SyncReport {
        status: status.to_string(),
        replayed: 0,
        skipped: Vec::new(),
        failed: Vec::new(),
    };

    if let SyncStatus::NeedsReplay { intents } = status {
        let outcome = replay(&store, &backend, &intents)?;
        report.replayed = outcome.applied;
        report.skipped = outcome.skipped;
        report.failed = outcome.failures.iter().map(ToString::to_string).collect();
        backend.push()?;
        report.status = "replayed and pushed".to_string();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.status);
        if report.replayed > 0 {
            println!("replayed {} intent(s)", report.replayed);
        }
        for line in &report.skipped {
            println!("skipped: {line}");
        }
        for line in &report.failed {
            println!("failed: {line}");
        }
    }
    Ok(())
}
