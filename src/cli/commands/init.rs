//! Init command implementation.

use weft_lib::error::Result;

use super::open_backend;
use crate::cli::InitArgs;
use crate::repo::DATA_BRANCH;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the current directory is not inside a git
/// repository, or if tracking is already initialized without `--force`.
pub fn execute(args: &InitArgs) -> Result<()> {
    let backend = open_backend()?;
    backend.init(&args.prefix, args.force)?;
    println!(
        "Initialized issue tracking on {DATA_BRANCH} (prefix '{}')",
        args.prefix
    );
    Ok(())
}
