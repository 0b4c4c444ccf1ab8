//! Config command implementations (get, set, list).

use weft_lib::error::{Result, WeftError};

use super::open_backend;
use crate::cli::ConfigSubcommand;

/// Execute a config subcommand.
///
/// # Errors
///
/// Returns an error if the key is unknown on get, or the write fails on
/// set.
pub fn execute(command: ConfigSubcommand) -> Result<()> {
    let backend = open_backend()?;
    if !backend.is_initialized() {
        return Err(WeftError::NotInitialized);
    }
    backend.ensure_supported_version()?;

    match command {
        ConfigSubcommand::Get { key } => match backend.config_get(&key)? {
            Some(value) => println!("{value}"),
            None => return Err(WeftError::Config(format!("key '{key}' is not set"))),
        },
        ConfigSubcommand::Set { key, value } => {
            backend.config_set(&key, &value)?;
            println!("{key}={value}");
        }
        ConfigSubcommand::List => {
            for (key, value) in backend.config_list()? {
                println!("{key}={value}");
            }
        }
    }
    Ok(())
}
