//! Reopen command implementation.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::Intent;

use super::open_backend;
use crate::cli::ReopenArgs;

/// Execute the reopen command.
///
/// # Errors
///
/// Returns an error if the issue does not exist or is already open.
pub fn execute(args: &ReopenArgs) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let issue = store.reopen(&args.id)?;
    let intent = Intent::Reopen {
        id: args.id.clone(),
    };
    backend.commit(&intent.to_string())?;

    println!("Reopened {}: {}", issue.id, issue.title);
    Ok(())
}
