//! File-backed issue store.
//!
//! Each issue is one JSON document under `issues/`. Marker files under
//! `index/` (by status, label, blocker, and parent) let filtered queries
//! select a candidate set without scanning every record. Record writes go
//! through a temp file and rename; index entries are diffed old vs new on
//! every write so they never drift from the record.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, Utc};
use tracing::debug;

use crate::error::{Result, WeftError};
use crate::model::{Comment, Issue, Priority, Status};
use crate::query::{DeletePlan, IssueUpdate, ListFilters};

/// Narrow stage-and-commit capability the store's callers depend on.
///
/// Keeps the library decoupled from the repository backend: replay and
/// config mutation reach durable history through this seam only.
pub trait Committer {
    /// Stage everything in the working directory and commit it with the
    /// given message. Committing with no changes must succeed as a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or committing fails.
    fn commit(&self, message: &str) -> Result<()>;
}

/// Options for creating an issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Explicit ID; generated when empty.
    pub id: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub issue_type: Option<String>,
    pub assignee: Option<String>,
    pub defer_until: Option<NaiveDate>,
    pub parent: Option<String>,
    pub labels: Vec<String>,
}

/// File-backed issue store rooted at the data branch worktree.
#[derive(Debug)]
pub struct FsIssueStore {
    root: PathBuf,
    prefix: String,
}

impl FsIssueStore {
    /// Open a store rooted at `root`, creating the directory skeleton if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn open(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let store = Self {
            root: root.into(),
            prefix: prefix.into(),
        };
        fs::create_dir_all(store.issues_dir())?;
        fs::create_dir_all(store.root.join("index"))?;
        Ok(store)
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // CRUD
    // ========================================================================

    /// Create a new issue.
    ///
    /// Generates a collision-free ID unless `opts.id` is supplied. Status
    /// defaults to open, or deferred when `defer_until` is given.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty title, `IdExists` when an explicit
    /// ID is already taken, or an I/O error from the record write.
    pub fn create(&self, title: &str, opts: CreateOptions) -> Result<Issue> {
        if title.trim().is_empty() {
            return Err(WeftError::validation("title", "cannot be empty"));
        }

        let now = Utc::now();
        let id = match opts.id {
            Some(id) if !id.is_empty() => {
                if self.exists(&id) {
                    return Err(WeftError::IdExists { id });
                }
                id
            }
            _ => {
                let count = self.existing_ids()?.len();
                crate::util::generate_id(&self.prefix, title, now, count, |id| self.exists(id))
            }
        };

        let mut issue = Issue::new(id, title);
        issue.created_at = now;
        issue.description = opts.description;
        if let Some(priority) = opts.priority {
            issue.priority = priority;
        }
        if let Some(issue_type) = opts.issue_type {
            issue.issue_type = issue_type;
        }
        issue.assignee = opts.assignee;
        issue.parent = opts.parent;
        if opts.defer_until.is_some() {
            issue.defer_until = opts.defer_until;
            issue.status = Status::Deferred;
        }
        let mut labels = opts.labels;
        labels.sort();
        labels.dedup();
        issue.labels = labels;

        self.write_issue(&issue, None)?;
        debug!(id = %issue.id, "created issue");
        Ok(issue)
    }

    /// Get a single issue by ID.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue doesn't exist.
    pub fn get(&self, id: &str) -> Result<Issue> {
        self.read_issue(id)
    }

    /// Check whether an ID is taken.
    #[must_use]
    pub fn exists(&self, id: &str) -> bool {
        self.issue_path(id).exists()
    }

    /// Apply a partial update.
    ///
    /// Setting `defer_until` implies status=deferred unless a status is
    /// supplied in the same update. Leaving deferred clears `defer_until`.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound`, `Validation` for an empty title, or
    /// `InvalidStateTransition` for a deferred/in_progress direct move.
    pub fn update(&self, id: &str, update: &IssueUpdate) -> Result<Issue> {
        let old = self.read_issue(id)?;
        let mut issue = old.clone();

        if let Some(ref title) = update.title {
            if title.trim().is_empty() {
                return Err(WeftError::validation("title", "cannot be empty"));
            }
            issue.title.clone_from(title);
        }
        if let Some(ref desc) = update.description {
            issue.description.clone_from(desc);
        }
        if let Some(ref issue_type) = update.issue_type {
            issue.issue_type.clone_from(issue_type);
        }
        if let Some(priority) = update.priority {
            issue.priority = priority;
        }
        if let Some(ref assignee) = update.assignee {
            issue.assignee.clone_from(assignee);
        }
        if let Some(ref parent) = update.parent {
            issue.parent.clone_from(parent);
        }
        if let Some(ref defer) = update.defer_until {
            issue.defer_until = *defer;
        }

        let new_status = match update.status {
            Some(status) => Some(status),
            // defer_until set without an explicit status implies deferred;
            // clearing it while deferred implies open
            None if matches!(update.defer_until, Some(Some(_))) => Some(Status::Deferred),
            None if matches!(update.defer_until, Some(None)) && old.status == Status::Deferred => {
                Some(Status::Open)
            }
            None => None,
        };
        if let Some(status) = new_status {
            Self::check_transition(&old, status)?;
            issue.status = status;
        }
        if issue.status != Status::Deferred {
            issue.defer_until = None;
        }

        self.write_issue(&issue, Some(&old))?;
        Ok(issue)
    }

    fn check_transition(issue: &Issue, to: Status) -> Result<()> {
        let from = issue.status;
        // Direct moves between in_progress and deferred are not supported.
        let forbidden = matches!(
            (from, to),
            (Status::InProgress, Status::Deferred) | (Status::Deferred, Status::InProgress)
        );
        if forbidden {
            return Err(WeftError::transition(&issue.id, from.as_str(), to.as_str()));
        }
        Ok(())
    }

    /// Close an issue, recording a reason.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound`, or `InvalidStateTransition` if already
    /// closed.
    pub fn close(&self, id: &str, reason: Option<&str>) -> Result<Issue> {
        let old = self.read_issue(id)?;
        if old.status == Status::Closed {
            return Err(WeftError::transition(id, "closed", "closed"));
        }
        let mut issue = old.clone();
        issue.status = Status::Closed;
        issue.close_reason = reason.map(str::to_string);
        issue.defer_until = None;
        self.write_issue(&issue, Some(&old))?;
        Ok(issue)
    }

    /// Reopen a closed or in-progress issue.
    ///
    /// Reopening from in_progress also clears the assignee.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound`, or `InvalidStateTransition` from any other
    /// status.
    pub fn reopen(&self, id: &str) -> Result<Issue> {
        let old = self.read_issue(id)?;
        let mut issue = old.clone();
        match old.status {
            Status::Closed => {
                issue.close_reason = None;
            }
            Status::InProgress => {
                issue.assignee = None;
            }
            other => {
                return Err(WeftError::transition(id, other.as_str(), "open"));
            }
        }
        issue.status = Status::Open;
        self.write_issue(&issue, Some(&old))?;
        Ok(issue)
    }

    /// Move an issue to in_progress, assigning it.
    ///
    /// # Errors
    ///
    /// Returns `Blocked` carrying the non-closed blocker IDs if any blocker
    /// is not closed, `InvalidStateTransition` unless the issue is open or
    /// deferred, or `IssueNotFound`.
    pub fn start(&self, id: &str, assignee: Option<&str>) -> Result<Issue> {
        let old = self.read_issue(id)?;
        if !matches!(old.status, Status::Open | Status::Deferred) {
            return Err(WeftError::transition(id, old.status.as_str(), "in_progress"));
        }

        let open_blockers = self.open_blockers(&old)?;
        if !open_blockers.is_empty() {
            return Err(WeftError::Blocked {
                id: id.to_string(),
                blockers: open_blockers,
            });
        }

        let mut issue = old.clone();
        issue.status = Status::InProgress;
        issue.defer_until = None;
        if let Some(assignee) = assignee {
            issue.assignee = Some(assignee.to_string());
        }
        self.write_issue(&issue, Some(&old))?;
        Ok(issue)
    }

    /// Blockers of `issue` whose status is not closed.
    pub(crate) fn open_blockers(&self, issue: &Issue) -> Result<Vec<String>> {
        let mut open = Vec::new();
        for blocker_id in &issue.blocked_by {
            match self.read_issue(blocker_id) {
                Ok(blocker) if blocker.status != Status::Closed => {
                    open.push(blocker_id.clone());
                }
                Ok(_) => {}
                // A dangling edge never blocks; delete repairs these.
                Err(WeftError::IssueNotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(open)
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Record that `blocker` blocks `blocked`, maintaining both mirrors.
    ///
    /// Idempotent: linking an existing edge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SelfDependency` when the IDs are equal, or `IssueNotFound`
    /// when either side is missing.
    pub fn link(&self, blocker: &str, blocked: &str) -> Result<()> {
        if blocker == blocked {
            return Err(WeftError::SelfDependency {
                id: blocker.to_string(),
            });
        }
        let old_blocker = self.read_issue(blocker)?;
        let old_blocked = self.read_issue(blocked)?;

        if old_blocker.blocks.iter().any(|b| b == blocked) {
            return Ok(());
        }

        let mut new_blocker = old_blocker.clone();
        new_blocker.blocks.push(blocked.to_string());
        self.write_issue(&new_blocker, Some(&old_blocker))?;

        let mut new_blocked = old_blocked.clone();
        if !new_blocked.blocked_by.iter().any(|b| b == blocker) {
            new_blocked.blocked_by.push(blocker.to_string());
        }
        self.write_issue(&new_blocked, Some(&old_blocked))?;
        Ok(())
    }

    /// Remove a blocking edge, maintaining both mirrors.
    ///
    /// Idempotent: unlinking an absent edge is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` when either side is missing.
    pub fn unlink(&self, blocker: &str, blocked: &str) -> Result<()> {
        let old_blocker = self.read_issue(blocker)?;
        let old_blocked = self.read_issue(blocked)?;

        if old_blocker.blocks.iter().any(|b| b == blocked) {
            let mut new_blocker = old_blocker.clone();
            new_blocker.blocks.retain(|b| b != blocked);
            self.write_issue(&new_blocker, Some(&old_blocker))?;
        }
        if old_blocked.blocked_by.iter().any(|b| b == blocker) {
            let mut new_blocked = old_blocked.clone();
            new_blocked.blocked_by.retain(|b| b != blocker);
            self.write_issue(&new_blocked, Some(&old_blocked))?;
        }
        Ok(())
    }

    // ========================================================================
    // Labels and comments
    // ========================================================================

    /// Add and remove labels with set semantics.
    ///
    /// The result is sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue doesn't exist.
    pub fn label(&self, id: &str, add: &[String], remove: &[String]) -> Result<Issue> {
        let old = self.read_issue(id)?;
        let mut issue = old.clone();
        for label in add {
            if !issue.labels.contains(label) {
                issue.labels.push(label.clone());
            }
        }
        issue.labels.retain(|l| !remove.contains(l));
        issue.labels.sort();
        issue.labels.dedup();
        self.write_issue(&issue, Some(&old))?;
        Ok(issue)
    }

    /// Append a comment.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue doesn't exist, or `Validation`
    /// for empty text.
    pub fn comment(&self, id: &str, text: &str, author: &str) -> Result<Issue> {
        if text.trim().is_empty() {
            return Err(WeftError::validation("comment", "cannot be empty"));
        }
        let old = self.read_issue(id)?;
        let mut issue = old.clone();
        issue.comments.push(Comment {
            text: text.to_string(),
            author: author.to_string(),
            created_at: Utc::now(),
        });
        self.write_issue(&issue, Some(&old))?;
        Ok(issue)
    }

    // ========================================================================
    // Delete
    // ========================================================================

    /// Compute the exact plan a delete would execute, without mutating.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue doesn't exist.
    pub fn delete_preview(&self, id: &str) -> Result<DeletePlan> {
        let issue = self.read_issue(id)?;
        let mut children: Vec<String> = self.ids_in_index(&["parent", id])?.into_iter().collect();
        children.sort();
        Ok(DeletePlan {
            blocked_issues: issue.blocks.clone(),
            blocking_issues: issue.blocked_by.clone(),
            orphaned_children: children,
        })
    }

    /// Physically remove an issue, repairing every referencing edge and
    /// orphaning children. Executes exactly the plan `delete_preview`
    /// reports.
    ///
    /// # Errors
    ///
    /// Returns `IssueNotFound` if the issue doesn't exist.
    pub fn delete(&self, id: &str) -> Result<DeletePlan> {
        let plan = self.delete_preview(id)?;
        let issue = self.read_issue(id)?;

        for blocked_id in &plan.blocked_issues {
            if let Ok(old) = self.read_issue(blocked_id) {
                let mut repaired = old.clone();
                repaired.blocked_by.retain(|b| b != id);
                self.write_issue(&repaired, Some(&old))?;
            }
        }
        for blocker_id in &plan.blocking_issues {
            if let Ok(old) = self.read_issue(blocker_id) {
                let mut repaired = old.clone();
                repaired.blocks.retain(|b| b != id);
                self.write_issue(&repaired, Some(&old))?;
            }
        }
        for child_id in &plan.orphaned_children {
            if let Ok(old) = self.read_issue(child_id) {
                let mut orphan = old.clone();
                orphan.parent = None;
                self.write_issue(&orphan, Some(&old))?;
            }
        }

        for marker in Self::markers_for(&issue) {
            self.remove_marker(&marker)?;
        }
        fs::remove_file(self.issue_path(id))?;
        debug!(id, "deleted issue");
        Ok(plan)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// List issues matching the filters.
    ///
    /// The default view (no explicit statuses) excludes deferred and closed
    /// issues. Candidates come from the status and label indexes; remaining
    /// filters are applied per record.
    ///
    /// # Errors
    ///
    /// Returns an error if index or record reads fail.
    pub fn list(&self, filters: &ListFilters) -> Result<Vec<Issue>> {
        let statuses: Vec<Status> = filters.statuses.clone().unwrap_or_else(|| {
            let mut defaults = vec![Status::Open, Status::InProgress];
            if filters.include_deferred {
                defaults.push(Status::Deferred);
            }
            if filters.include_closed {
                defaults.push(Status::Closed);
            }
            defaults
        });

        let mut candidates = BTreeSet::new();
        for status in &statuses {
            candidates.extend(self.ids_in_index(&["status", status.as_str()])?);
        }

        if let Some(ref labels) = filters.labels {
            for label in labels {
                let with_label = self.ids_in_index(&["label", label])?;
                candidates.retain(|id| with_label.contains(id));
            }
        }

        let mut results = Vec::new();
        for id in candidates {
            let issue = self.read_issue(&id)?;
            if Self::matches_filters(&issue, filters) {
                results.push(issue);
            }
        }
        results.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        if let Some(limit) = filters.limit {
            results.truncate(limit);
        }
        Ok(results)
    }

    fn matches_filters(issue: &Issue, filters: &ListFilters) -> bool {
        if let Some(ref types) = filters.types {
            if !types.contains(&issue.issue_type) {
                return false;
            }
        }
        if let Some(ref priorities) = filters.priorities {
            if !priorities.contains(&issue.priority) {
                return false;
            }
        }
        if filters.unassigned {
            if issue.assignee.is_some() {
                return false;
            }
        } else if let Some(ref assignee) = filters.assignee {
            if issue.assignee.as_deref() != Some(assignee.as_str()) {
                return false;
            }
        }
        if let Some(ref search) = filters.search {
            let needle = search.to_lowercase();
            let in_title = issue.title.to_lowercase().contains(&needle);
            let in_desc = issue
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_desc {
                return false;
            }
        }
        true
    }

    /// Raw upsert bypassing default-filling. Used for bulk imports.
    ///
    /// # Errors
    ///
    /// Returns an error if the record write fails.
    pub fn import(&self, issue: &Issue) -> Result<()> {
        let old = match self.read_issue(&issue.id) {
            Ok(existing) => Some(existing),
            Err(WeftError::IssueNotFound { .. }) => None,
            Err(err) => return Err(err),
        };
        self.write_issue(issue, old.as_ref())
    }

    /// Snapshot of every issue ID in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the issues directory cannot be read.
    pub fn existing_ids(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.issues_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            if let Some(id) = name.to_string_lossy().strip_suffix(".json") {
                ids.push(id.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// IDs currently indexed under a status.
    ///
    /// # Errors
    ///
    /// Returns an error if the index directory cannot be read.
    pub fn ids_with_status(&self, status: Status) -> Result<BTreeSet<String>> {
        self.ids_in_index(&["status", status.as_str()])
    }

    /// IDs of issues whose `blocked_by` references `blocker_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index directory cannot be read.
    pub fn ids_blocked_by(&self, blocker_id: &str) -> Result<BTreeSet<String>> {
        self.ids_in_index(&["blocker", blocker_id])
    }

    // ========================================================================
    // Records and indexes
    // ========================================================================

    fn issues_dir(&self) -> PathBuf {
        self.root.join("issues")
    }

    fn issue_path(&self, id: &str) -> PathBuf {
        self.issues_dir().join(format!("{id}.json"))
    }

    fn read_issue(&self, id: &str) -> Result<Issue> {
        let path = self.issue_path(id);
        if !path.exists() {
            return Err(WeftError::IssueNotFound { id: id.to_string() });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the record atomically, then diff index markers old vs new.
    fn write_issue(&self, issue: &Issue, old: Option<&Issue>) -> Result<()> {
        let path = self.issue_path(&issue.id);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(issue)?;
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;

        let old_markers: BTreeSet<PathBuf> = old.map(Self::markers_for).unwrap_or_default();
        let new_markers = Self::markers_for(issue);
        for stale in old_markers.difference(&new_markers) {
            self.remove_marker(stale)?;
        }
        for added in new_markers.difference(&old_markers) {
            self.add_marker(added)?;
        }
        Ok(())
    }

    /// Index marker paths for an issue, relative to `index/`.
    fn markers_for(issue: &Issue) -> BTreeSet<PathBuf> {
        let mut markers = BTreeSet::new();
        markers.insert(
            Path::new("status")
                .join(issue.status.as_str())
                .join(&issue.id),
        );
        for label in &issue.labels {
            markers.insert(Path::new("label").join(label).join(&issue.id));
        }
        for blocker in &issue.blocked_by {
            markers.insert(Path::new("blocker").join(blocker).join(&issue.id));
        }
        if let Some(ref parent) = issue.parent {
            markers.insert(Path::new("parent").join(parent).join(&issue.id));
        }
        markers
    }

    fn add_marker(&self, relative: &Path) -> Result<()> {
        let path = self.root.join("index").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, "")?;
        Ok(())
    }

    fn remove_marker(&self, relative: &Path) -> Result<()> {
        let path = self.root.join("index").join(relative);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn ids_in_index(&self, parts: &[&str]) -> Result<BTreeSet<String>> {
        let mut dir = self.root.join("index");
        for part in parts {
            dir = dir.join(part);
        }
        let mut ids = BTreeSet::new();
        if !dir.exists() {
            return Ok(ids);
        }
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            ids.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(ids)
    }
}
