//! Defer command implementation.
//!
//! Setting a defer date moves the issue to deferred status in the same
//! edit.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::{Intent, IssueUpdate};

use super::{open_backend, parse_date};
use crate::cli::DeferArgs;

/// Execute the defer command.
///
/// # Errors
///
/// Returns an error if the issue does not exist, the date fails to
/// parse, or the issue is in progress.
pub fn execute(args: &DeferArgs) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let until = parse_date("until", &args.until)?;
    let update = IssueUpdate {
        defer_until: Some(Some(until)),
        ..IssueUpdate::default()
    };
    let issue = store.update(&args.id, &update)?;
    let intent = Intent::Update {
        id: args.id.clone(),
        update,
    };
    backend.commit(&intent.to_string())?;

    println!("Deferred {} until {until}", issue.id);
    Ok(())
}
