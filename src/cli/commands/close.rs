//! Close command implementation.
//!
//! Closes one or more issues and reports any that became unblocked as a
//! result, one commit per issue so replay stays line-for-line.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::Intent;

use super::open_backend;
use crate::cli::CloseArgs;

/// Execute the close command.
///
/// # Errors
///
/// Returns an error if an issue does not exist or is already closed.
pub fn execute(args: &CloseArgs) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    for id in &args.ids {
        let issue = store.close(id, args.reason.as_deref())?;
        let intent = Intent::Close {
            id: id.clone(),
            reason: args.reason.clone(),
        };
        backend.commit(&intent.to_string())?;
        println!("Closed {}: {}", issue.id, issue.title);

        let unblocked = store.newly_unblocked(id)?;
        for issue in unblocked {
            println!("  unblocked {}: {}", issue.id, issue.title);
        }
    }
    Ok(())
}
