//! `weft-lib` — Git-backed issue store, dependency graph, and intent
//! replay.
//!
//! Issues live as one JSON record each inside a dedicated branch's
//! worktree, with marker-file indexes for filtered queries. Every
//! mutation has a single-line intent encoding used as its commit
//! message; after a conflicting sync those intents are replayed as
//! operations instead of merged as text.
//!
//! # Quick Start
//!
//! ```no_run
//! use weft_lib::store::{CreateOptions, FsIssueStore};
//! use weft_lib::{IssueUpdate, Status};
//!
//! let store = FsIssueStore::open("path/to/worktree", "wf").unwrap();
//!
//! let issue = store.create("New task", CreateOptions::default()).unwrap();
//!
//! store.update(&issue.id, &IssueUpdate {
//!     status: Some(Status::InProgress),
//!     ..Default::default()
//! }).unwrap();
//!
//! let ready = store.ready().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod intent;
pub mod model;
pub mod query;
pub mod replay;
pub mod store;
pub mod util;

pub use error::{Result, WeftError};
pub use intent::{Intent, Skip};
pub use model::{Comment, Issue, Priority, Status};
pub use query::{BlockedIssue, DeletePlan, IssueUpdate, ListFilters};
pub use replay::{ReplayReport, replay};
pub use store::{Committer, CreateOptions, FsIssueStore};
