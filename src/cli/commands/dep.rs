//! Dependency command implementations (add, remove, tree).

use std::collections::HashSet;

use weft_lib::error::Result;
use weft_lib::store::{Committer, FsIssueStore};
use weft_lib::Intent;

use super::open_backend;
use crate::cli::DepSubcommand;
use crate::format::{TreeNode, format_issue_line};

/// Execute a dep subcommand.
///
/// # Errors
///
/// Returns an error if either endpoint does not exist, or on a
/// self-dependency.
pub fn execute(command: DepSubcommand, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    match command {
        DepSubcommand::Add { blocker, blocked } => {
            store.link(&blocker, &blocked)?;
            let intent = Intent::Link {
                blocker: blocker.clone(),
                blocked: blocked.clone(),
            };
            backend.commit(&intent.to_string())?;
            println!("{blocker} now blocks {blocked}");
        }
        DepSubcommand::Remove { blocker, blocked } => {
            store.unlink(&blocker, &blocked)?;
            let intent = Intent::Unlink {
                blocker: blocker.clone(),
                blocked: blocked.clone(),
            };
            backend.commit(&intent.to_string())?;
            println!("{blocker} no longer blocks {blocked}");
        }
        DepSubcommand::Tree { root } => tree(&store, root.as_deref(), json)?,
    }
    Ok(())
}

/// Walk the blocks edges depth-first from `root`, once per issue even
/// in the presence of cycles.
fn tree(store: &FsIssueStore, root: Option<&str>, json: bool) -> Result<()> {
    let roots: Vec<String> = match root {
        Some(id) => {
            store.get(id)?;
            vec![id.to_string()]
        }
        // With no root, start from issues nothing blocks.
        None => store
            .graph("")?
            .into_iter()
            .filter(|i| i.blocked_by.is_empty())
            .map(|i| i.id)
            .collect(),
    };

    let mut visited = HashSet::new();
    let mut nodes = Vec::new();
    for id in &roots {
        walk(store, id, 0, None, &mut visited, &mut nodes)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&nodes)?);
    } else if nodes.is_empty() {
        println!("No issues.");
    } else {
        for node in &nodes {
            println!(
                "{}{}",
                "  ".repeat(node.depth),
                format_issue_line(&node.issue)
            );
        }
    }
    Ok(())
}

fn walk(
    store: &FsIssueStore,
    id: &str,
    depth: usize,
    parent: Option<&str>,
    visited: &mut HashSet<String>,
    nodes: &mut Vec<TreeNode>,
) -> Result<()> {
    if !visited.insert(id.to_string()) {
        return Ok(());
    }
    let Ok(issue) = store.get(id) else {
        // Dangling edge, nothing to render.
        return Ok(());
    };
    let children = issue.blocks.clone();
    nodes.push(TreeNode {
        issue,
        depth,
        parent_id: parent.map(str::to_string),
    });
    for child in &children {
        walk(store, child, depth + 1, Some(id), visited, nodes)?;
    }
    Ok(())
}
