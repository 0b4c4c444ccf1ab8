//! Label command implementations (add, remove, list).

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::Intent;

use super::open_backend;
use crate::cli::LabelSubcommand;

/// Execute a label subcommand.
///
/// # Errors
///
/// Returns an error if the issue does not exist.
pub fn execute(command: LabelSubcommand, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    match command {
        LabelSubcommand::Add { id, labels } => {
            let issue = store.label(&id, &labels, &[])?;
            let intent = Intent::Label {
                id,
                add: labels,
                remove: Vec::new(),
            };
            backend.commit(&intent.to_string())?;
            println!("{}: {}", issue.id, issue.labels.join(", "));
        }
        LabelSubcommand::Remove { id, labels } => {
            let issue = store.label(&id, &[], &labels)?;
            let intent = Intent::Label {
                id,
                add: Vec::new(),
                remove: labels,
            };
            backend.commit(&intent.to_string())?;
            if issue.labels.is_empty() {
                println!("{}: no labels", issue.id);
            } else {
                println!("{}: {}", issue.id, issue.labels.join(", "));
            }
        }
        LabelSubcommand::List { id } => {
            let issue = store.get(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&issue.labels)?);
            } else if issue.labels.is_empty() {
                println!("{id}: no labels");
            } else {
                for label in &issue.labels {
                    println!("{label}");
                }
            }
        }
    }
    Ok(())
}
