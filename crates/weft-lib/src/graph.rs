//! Dependency-graph queries over the file-backed store.
//!
//! Readiness, blocking, cascade-unblock, reachability, and
//! nearest-open-blocker resolution. All walks carry a visited set; the
//! on-disk edges are caller-written and cycles must never hang a query.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::error::{Result, WeftError};
use crate::model::{Issue, Status};
use crate::query::BlockedIssue;
use crate::store::FsIssueStore;

impl FsIssueStore {
    /// Open issues whose every blocker is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if index or record reads fail.
    pub fn ready(&self) -> Result<Vec<Issue>> {
        let mut results = Vec::new();
        for id in self.ids_with_status(Status::Open)? {
            let issue = self.get(&id)?;
            if self.open_blockers(&issue)?.is_empty() {
                results.push(issue);
            }
        }
        results.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(results)
    }

    /// Open or in-progress issues with at least one non-closed blocker,
    /// each reported with the blockers still open.
    ///
    /// # Errors
    ///
    /// Returns an error if index or record reads fail.
    pub fn blocked(&self) -> Result<Vec<BlockedIssue>> {
        let mut candidates = self.ids_with_status(Status::Open)?;
        candidates.extend(self.ids_with_status(Status::InProgress)?);

        let mut results = Vec::new();
        for id in candidates {
            let issue = self.get(&id)?;
            let open_blockers = self.open_blockers(&issue)?;
            if !open_blockers.is_empty() {
                results.push(BlockedIssue {
                    issue,
                    open_blockers,
                });
            }
        }
        Ok(results)
    }

    /// After closing `closed_id`: the issues it blocked whose every
    /// remaining blocker is now closed. Reports the cascade of unblocks.
    ///
    /// # Errors
    ///
    /// Returns an error if index or record reads fail.
    pub fn newly_unblocked(&self, closed_id: &str) -> Result<Vec<Issue>> {
        let mut results = Vec::new();
        for id in self.ids_blocked_by(closed_id)? {
            let issue = match self.get(&id) {
                Ok(issue) => issue,
                Err(WeftError::IssueNotFound { .. }) => continue,
                Err(err) => return Err(err),
            };
            if self.open_blockers(&issue)?.is_empty() {
                results.push(issue);
            }
        }
        Ok(results)
    }

    /// Issues transitively reachable from `root` via blocks edges, the
    /// root included. An empty root yields every issue.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` for an unknown non-empty root, or an error
    /// if record reads fail.
    pub fn graph(&self, root: &str) -> Result<Vec<Issue>> {
        if root.is_empty() {
            let mut all = Vec::new();
            for id in self.existing_ids()? {
                all.push(self.get(&id)?);
            }
            return Ok(all);
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut results = Vec::new();
        queue.push_back(root.to_string());

        while let Some(id) = queue.pop_front() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let issue = if id == root {
                self.get(&id)?
            } else {
                match self.get(&id) {
                    Ok(issue) => issue,
                    Err(WeftError::IssueNotFound { .. }) => continue,
                    Err(err) => return Err(err),
                }
            };
            for next in &issue.blocks {
                queue.push_back(next.clone());
            }
            results.push(issue);
        }
        Ok(results)
    }

    /// Resolve the nearest open blockers of an issue.
    ///
    /// Each immediate blocker that is itself closed is replaced by its
    /// own blockers, recursively, until a non-closed issue is reached or
    /// the chain runs out. Results are deduplicated and sorted.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` for an unknown ID, or an error if record
    /// reads fail.
    pub fn nearest_open_blockers(&self, id: &str) -> Result<Vec<String>> {
        let issue = self.get(id)?;
        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        let mut queue: VecDeque<String> = issue.blocked_by.iter().cloned().collect();
        let mut results = BTreeSet::new();

        while let Some(blocker_id) = queue.pop_front() {
            if !visited.insert(blocker_id.clone()) {
                continue;
            }
            let blocker = match self.get(&blocker_id) {
                Ok(blocker) => blocker,
                Err(WeftError::IssueNotFound { .. }) => continue,
                Err(err) => return Err(err),
            };
            if blocker.status == Status::Closed {
                for next in &blocker.blocked_by {
                    queue.push_back(next.clone());
                }
            } else {
                results.insert(blocker_id);
            }
        }
        Ok(results.into_iter().collect())
    }
}
