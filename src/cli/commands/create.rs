//! Create command implementation.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::{CreateOptions, Intent, Priority};

use super::{open_backend, parse_date};
use crate::cli::CreateArgs;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if validation fails or the issue cannot be written.
pub fn execute(args: CreateArgs, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let priority = args
        .priority
        .as_deref()
        .map(str::parse::<Priority>)
        .transpose()?;
    let defer_until = args
        .defer
        .as_deref()
        .map(|raw| parse_date("defer", raw))
        .transpose()?;

    let opts = CreateOptions {
        id: args.id,
        description: args.description,
        priority,
        issue_type: args.type_,
        assignee: args.assignee,
        defer_until,
        parent: args.parent,
        labels: args.labels,
    };

    let issue = store.create(&args.title, opts.clone())?;
    let intent = Intent::Create {
        id: issue.id.clone(),
        title: issue.title.clone(),
        opts,
    };
    backend.commit(&intent.to_string())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&issue)?);
    } else {
        println!("Created {}: {}", issue.id, issue.title);
    }
    Ok(())
}
