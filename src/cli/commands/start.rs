//! Start command implementation.
//!
//! Moves an issue to in_progress, refusing while open blockers remain.
//! The recorded intent is a plain status update; replay applies the
//! field change without re-running the blocker gate, since the gate
//! already held when the work actually started.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::{Intent, IssueUpdate, Status};

use super::{current_user, open_backend};
use crate::cli::StartArgs;

/// Execute the start command.
///
/// # Errors
///
/// Returns an error if the issue does not exist, is not open or
/// deferred, or still has open blockers.
pub fn execute(args: &StartArgs) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let assignee = args.assignee.clone().unwrap_or_else(current_user);
    let issue = store.start(&args.id, Some(&assignee))?;

    let intent = Intent::Update {
        id: args.id.clone(),
        update: IssueUpdate {
            status: Some(Status::InProgress),
            assignee: Some(Some(assignee)),
            ..IssueUpdate::default()
        },
    };
    backend.commit(&intent.to_string())?;

    println!("Started {}: {}", issue.id, issue.title);
    Ok(())
}
