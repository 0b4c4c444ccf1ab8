//! Update command implementation.
//!
//! Field-level edits. An empty string on a clearable flag (description,
//! assignee, defer, parent) clears the field.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::{Intent, IssueUpdate, Priority, Status};

use super::{open_backend, parse_date};
use crate::cli::UpdateArgs;
use crate::format::format_issue_line;

/// Execute the update command.
///
/// # Errors
///
/// Returns an error if the issue does not exist, a field fails to parse,
/// or the status change is not a legal transition.
pub fn execute(args: &UpdateArgs) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let update = build_update(args)?;
    let issue = store.update(&args.id, &update)?;
    let intent = Intent::Update {
        id: args.id.clone(),
        update,
    };
    backend.commit(&intent.to_string())?;

    println!("Updated {}", format_issue_line(&issue));
    Ok(())
}

fn build_update(args: &UpdateArgs) -> Result<IssueUpdate> {
    let mut update = IssueUpdate {
        title: args.title.clone(),
        description: args.description.as_deref().map(clearable),
        status: args.status.as_deref().map(str::parse::<Status>).transpose()?,
        priority: args
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        issue_type: args.type_.clone(),
        assignee: args.assignee.as_deref().map(clearable),
        parent: args.parent.as_deref().map(clearable),
        ..IssueUpdate::default()
    };
    update.defer_until = match args.defer.as_deref() {
        Some("") => Some(None),
        Some(raw) => Some(Some(parse_date("defer", raw)?)),
        None => None,
    };
    Ok(update)
}

fn clearable(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}
