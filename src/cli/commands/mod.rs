//! Command implementations.
//!
//! Each handler opens the repository backend fresh for its invocation,
//! mutates the store, and commits the matching intent line so the data
//! branch history doubles as the operation log.

pub mod blocked;
pub mod close;
pub mod comment;
pub mod config;
pub mod create;
pub mod defer;
pub mod delete;
pub mod dep;
pub mod init;
pub mod label;
pub mod list;
pub mod ready;
pub mod reopen;
pub mod show;
pub mod start;
pub mod sync;
pub mod undefer;
pub mod update;
pub mod upgrade;

use chrono::NaiveDate;
use weft_lib::error::{Result, WeftError};

use crate::git::SystemGit;
use crate::repo::RepoBackend;

/// Locate the enclosing repository from the working directory.
pub(crate) fn open_backend() -> Result<RepoBackend<SystemGit>> {
    let cwd = std::env::current_dir()?;
    RepoBackend::locate(SystemGit, &cwd)
}

pub(crate) fn current_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
}

pub(crate) fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate> {
    raw.parse()
        .map_err(|_| WeftError::validation(field, "expected YYYY-MM-DD"))
}
