//! Upgrade command implementation.

use weft_lib::error::{Result, WeftError};

use super::open_backend;

/// Execute the upgrade command: migrate issue data to the latest schema.
///
/// # Errors
///
/// Returns an error if a migration step fails; the repository stays at
/// its previous version in that case.
pub fn execute() -> Result<()> {
    let backend = open_backend()?;
    if !backend.is_initialized() {
        return Err(WeftError::NotInitialized);
    }

    let (from, to) = backend.upgrade()?;
    if from == to {
        println!("Already at schema v{to}");
    } else {
        println!("Migrated schema v{from} -> v{to}");
    }
    Ok(())
}
