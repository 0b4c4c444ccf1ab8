//! Undefer command implementation.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::{Intent, IssueUpdate, Status};

use super::open_backend;
use crate::cli::UndeferArgs;

/// Execute the undefer command.
///
/// Clears the defer date; a deferred issue goes back to open.
///
/// # Errors
///
/// Returns an error if the issue does not exist.
pub fn execute(args: &UndeferArgs) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let current = store.get(&args.id)?;
    let update = IssueUpdate {
        defer_until: Some(None),
        status: (current.status == Status::Deferred).then_some(Status::Open),
        ..IssueUpdate::default()
    };
    let issue = store.update(&args.id, &update)?;
    let intent = Intent::Update {
        id: args.id.clone(),
        update,
    };
    backend.commit(&intent.to_string())?;

    println!("Cleared defer on {}", issue.id);
    Ok(())
}
