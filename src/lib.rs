//! weft - git-backed issue tracker
//!
//! Issue data lives on a dedicated orphan branch (`weft/data`) checked
//! out into a linked worktree under the repository's git directory, so
//! issues travel with every clone while the project's own history stays
//! untouched.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`git`] - Narrow subprocess interface to the `git` binary
//! - [`repo`] - Data branch, worktree, config, versioning and sync
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - Tracing subscriber setup
//!
//! The issue model, file-backed store, dependency graph, and intent
//! replay live in the `weft-lib` crate.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod format;
pub mod git;
pub mod logging;
pub mod repo;

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
