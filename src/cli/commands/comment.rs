//! Comment command implementations (add, list).

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::Intent;

use super::{current_user, open_backend};
use crate::cli::CommentsSubcommand;

/// Execute a comments subcommand.
///
/// # Errors
///
/// Returns an error if the issue does not exist or the text is empty.
pub fn execute(command: CommentsSubcommand, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    match command {
        CommentsSubcommand::Add { id, text, author } => {
            let author = author.unwrap_or_else(current_user);
            let issue = store.comment(&id, &text, &author)?;
            let intent = Intent::Comment { id, author, text };
            backend.commit(&intent.to_string())?;
            println!("Commented on {} ({} total)", issue.id, issue.comments.len());
        }
        CommentsSubcommand::List { id } => {
            let issue = store.get(&id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&issue.comments)?);
            } else if issue.comments.is_empty() {
                println!("{id}: no comments");
            } else {
                for comment in &issue.comments {
                    println!(
                        "[{}] {}: {}",
                        comment.created_at.format("%Y-%m-%d %H:%M"),
                        comment.author,
                        comment.text
                    );
                }
            }
        }
    }
    Ok(())
}
