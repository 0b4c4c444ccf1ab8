//! Intent replay.
//!
//! After a conflicting sync, the local commits that did not land are
//! re-executed as operations against the fetched state. Each intent runs
//! independently: by replay time the base state has moved, so a failing
//! precondition ("close X" when X is already closed) is expected and must
//! not stop the rest of the batch. Skipped and failed intents are logged
//! and collected for the caller to report.

use tracing::warn;

use crate::error::{Result, WeftError};
use crate::intent::Intent;
use crate::store::{CreateOptions, Committer, FsIssueStore};

/// Outcome of replaying one batch of intents.
#[derive(Debug, Default)]
pub struct ReplayReport {
    /// Intents applied and committed.
    pub applied: usize,
    /// Lines skipped as unknown or malformed.
    pub skipped: Vec<String>,
    /// Per-intent failures; never fatal to the batch.
    pub failures: Vec<WeftError>,
}

impl ReplayReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.failures.is_empty()
    }
}

/// Re-execute a batch of intent lines against the store's current state.
///
/// Every applied intent is committed with its original line as message,
/// reconstituting the intent log on the new base.
///
/// # Errors
///
/// Returns an error only when a commit fails; store-level failures are
/// collected into the report instead.
pub fn replay(
    store: &FsIssueStore,
    committer: &dyn Committer,
    intents: &[String],
) -> Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for line in intents {
        let intent = match Intent::parse(line) {
            Ok(intent) => intent,
            Err(skip) => {
                warn!(line = %line, %skip, "skipping intent");
                report.skipped.push(line.clone());
                continue;
            }
        };
        match apply(store, &intent) {
            Ok(()) => {
                committer.commit(line)?;
                report.applied += 1;
            }
            Err(err) => {
                warn!(line = %line, error = %err, "intent failed during replay");
                report.failures.push(WeftError::Replay {
                    intent: line.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(report)
}

/// Execute one intent with exactly the corresponding store method's
/// validation and side effects.
fn apply(store: &FsIssueStore, intent: &Intent) -> Result<()> {
    match intent {
        Intent::Create { id, title, opts } => {
            let opts = CreateOptions {
                id: Some(id.clone()),
                ..opts.clone()
            };
            store.create(title, opts)?;
        }
        Intent::Close { id, reason } => {
            store.close(id, reason.as_deref())?;
        }
        Intent::Reopen { id } => {
            store.reopen(id)?;
        }
        Intent::Update { id, update } => {
            store.update(id, update)?;
        }
        Intent::Link { blocker, blocked } => {
            store.link(blocker, blocked)?;
        }
        Intent::Unlink { blocker, blocked } => {
            store.unlink(blocker, blocked)?;
        }
        Intent::Label { id, add, remove } => {
            store.label(id, add, remove)?;
        }
        Intent::Delete { id } => {
            store.delete(id)?;
        }
        Intent::Config { key, value } => {
            let path = store.root().join("config");
            let mut map = if path.exists() {
                crate::config::load(&path)?
            } else {
                std::collections::BTreeMap::new()
            };
            map.insert(key.clone(), value.clone());
            crate::config::save(&path, &map)?;
        }
        Intent::Comment { id, author, text } => {
            store.comment(id, text, author)?;
        }
    }
    Ok(())
}
