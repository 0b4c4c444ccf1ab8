//! Ready command implementation.

use weft_lib::error::Result;

use super::open_backend;
use crate::format::format_issue_line;

/// Execute the ready command: open issues with no open blockers, best
/// priority first.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn execute(json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let issues = store.ready()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&issues)?);
    } else if issues.is_empty() {
        println!("No ready issues.");
    } else {
        for issue in &issues {
            println!("{}", format_issue_line(issue));
        }
        println!("\n{} ready", issues.len());
    }
    Ok(())
}
