//! Delete command implementation.
//!
//! Without `--force` this only previews the blast radius: which issues
//! lose a blocker, which lose a dependent, which children lose their
//! parent. With `--force` the record and every edge referencing it go
//! away and the neighbors are repaired in the same pass.

use weft_lib::error::Result;
use weft_lib::store::Committer;
use weft_lib::{DeletePlan, Intent};

use super::open_backend;
use crate::cli::DeleteArgs;

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if the issue does not exist.
pub fn execute(args: &DeleteArgs, json: bool) -> Result<()> {
    let backend = open_backend()?;
    let store = backend.store()?;

    let plan = if args.force {
        let plan = store.delete(&args.id)?;
        let intent = Intent::Delete {
            id: args.id.clone(),
        };
        backend.commit(&intent.to_string())?;
        plan
    } else {
        store.delete_preview(&args.id)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if args.force {
        println!("Deleted {}", args.id);
        report(&plan, "repaired");
    } else {
        println!("Would delete {} (run again with --force)", args.id);
        report(&plan, "affected");
    }
    Ok(())
}

fn report(plan: &DeletePlan, verb: &str) {
    if !plan.blocked_issues.is_empty() {
        println!(
            "  {verb} blocked issues: {}",
            plan.blocked_issues.join(", ")
        );
    }
    if !plan.blocking_issues.is_empty() {
        println!(
            "  {verb} blocking issues: {}",
            plan.blocking_issues.join(", ")
        );
    }
    if !plan.orphaned_children.is_empty() {
        println!(
            "  {verb} children: {}",
            plan.orphaned_children.join(", ")
        );
    }
}
