//! List command implementation.
//!
//! Primary discovery interface. Defaults to open and in-progress
//! issues; closed and deferred come in only on request.

use weft_lib::error::Result;
use weft_lib::{ListFilters, Priority, Status};

use super::open_backend;
use crate::cli::ListArgs;
use crate::format::format_issue_line;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a filter fails to parse or the store cannot be
/// read.
pub fn execute(args: &ListArgs, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let filters = build_filters(args)?;
    let issues = store.list(&filters)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("No issues found.");
    } else {
        for issue in &issues {
            println!("{}", format_issue_line(issue));
        }
        println!("\n{} issue(s)", issues.len());
    }
    Ok(())
}

/// Convert CLI args to store filters.
fn build_filters(args: &ListArgs) -> Result<ListFilters> {
    let statuses = if args.status.is_empty() {
        None
    } else {
        Some(
            args.status
                .iter()
                .map(|s| s.parse::<Status>())
                .collect::<Result<Vec<_>>>()?,
        )
    };
    let priorities = if args.priority.is_empty() {
        None
    } else {
        Some(
            args.priority
                .iter()
                .map(|p| p.parse::<Priority>())
                .collect::<Result<Vec<_>>>()?,
        )
    };
    let types = if args.type_.is_empty() {
        None
    } else {
        Some(args.type_.clone())
    };
    let labels = if args.labels.is_empty() {
        None
    } else {
        Some(args.labels.clone())
    };

    Ok(ListFilters {
        statuses,
        types,
        priorities,
        assignee: args.assignee.clone(),
        unassigned: args.unassigned,
        include_closed: args.closed,
        include_deferred: args.deferred,
        search: args.search.clone(),
        labels,
        limit: args.limit,
    })
}
