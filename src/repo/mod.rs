//! Repository backend.
//!
//! Owns the dedicated `weft/data` branch and its linked worktree inside
//! the host repository, and everything that touches git on their behalf:
//! initialization (orphan branch or remote attach), atomic commits that
//! bypass hooks, the flat config file, schema versioning and migration,
//! and the fetch/rebase/push sync state machine.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use weft_lib::config;
use weft_lib::error::{Result, WeftError};
use weft_lib::store::{Committer, FsIssueStore};
use weft_lib::Intent;

use crate::git::GitRunner;

/// The dedicated branch holding issue data.
pub const DATA_BRANCH: &str = "weft/data";

/// Latest schema version this binary writes.
pub const LATEST_VERSION: u32 = 1;

/// Outcome of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    NoRemote,
    UpToDate,
    Pushed,
    RebasedAndPushed,
    /// Histories diverged and the rebase hit a conflict. The worktree is
    /// left at the fetched tip; `intents` are the local commits that did
    /// not land, oldest first, for the caller to replay and re-push.
    NeedsReplay { intents: Vec<String> },
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoRemote => write!(f, "no remote configured"),
            Self::UpToDate => write!(f, "up to date"),
            Self::Pushed => write!(f, "pushed"),
            Self::RebasedAndPushed => write!(f, "rebased and pushed"),
            Self::NeedsReplay { intents } => {
                write!(f, "needs replay ({} intents)", intents.len())
            }
        }
    }
}

/// Handle on the host repository and the data branch worktree.
pub struct RepoBackend<G: GitRunner> {
    git: G,
    worktree: PathBuf,
}

impl<G: GitRunner> RepoBackend<G> {
    /// Locate the enclosing repository starting from `start`.
    ///
    /// Resolves a linked worktree back to the canonical common dir, so
    /// running from anywhere inside the host project (its own worktrees
    /// included) finds the same data branch checkout.
    ///
    /// # Errors
    ///
    /// Returns `NotARepo` when `start` is not inside a git repository.
    pub fn locate(git: G, start: &Path) -> Result<Self> {
        let toplevel = git
            .run(start, &["rev-parse", "--show-toplevel"])
            .ok()
            .filter(|o| o.success)
            .map(|o| o.trimmed())
            .ok_or(WeftError::NotARepo)?;
        let common = git.run_ok(start, &["rev-parse", "--git-common-dir"])?.trimmed();

        let mut common_dir = PathBuf::from(&common);
        if common_dir.is_relative() {
            common_dir = Path::new(&toplevel).join(common_dir);
        }
        let common_dir = dunce::canonicalize(&common_dir)?;
        let worktree = common_dir.join("weft").join("worktree");
        Ok(Self { git, worktree })
    }

    /// Build a backend on an explicit worktree path. Used by tests.
    #[must_use]
    pub fn with_worktree(git: G, worktree: PathBuf) -> Self {
        Self { git, worktree }
    }

    #[must_use]
    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.worktree.join("config").exists()
    }

    /// Open the issue store rooted at the worktree.
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` if `init` has not run, or an unsupported
    /// version error before any other operation can proceed.
    pub fn store(&self) -> Result<FsIssueStore> {
        if !self.is_initialized() {
            return Err(WeftError::NotInitialized);
        }
        self.ensure_supported_version()?;
        let prefix = self
            .config_get("prefix")?
            .unwrap_or_else(|| "wf".to_string());
        FsIssueStore::open(&self.worktree, prefix)
    }

    // ========================================================================
    // Init
    // ========================================================================

    /// Provision the data branch and its worktree.
    ///
    /// Attaches to a remote copy of the branch when one exists, or
    /// creates a parentless branch sharing no history with the project's
    /// main line. With `force`, tears down an existing branch and
    /// worktree first.
    ///
    /// # Errors
    ///
    /// Returns `Config` when already initialized without `force`, or a
    /// subprocess error from git.
    pub fn init(&self, prefix: &str, force: bool) -> Result<()> {
        validate_prefix(prefix)?;
        if self.is_initialized() {
            if force {
                self.teardown();
            } else {
                return Err(WeftError::Config(
                    "already initialized (use force-reinit to rebuild)".to_string(),
                ));
            }
        }
        if let Some(parent) = self.worktree.parent() {
            fs::create_dir_all(parent)?;
        }

        let git_root = self.git_root()?;
        if self.remote_branch_exists(&git_root)? {
            info!(branch = DATA_BRANCH, "attaching to remote data branch");
            self.git.run_ok(
                &git_root,
                &[
                    "fetch",
                    "origin",
                    &format!("{DATA_BRANCH}:refs/remotes/origin/{DATA_BRANCH}"),
                ],
            )?;
            self.git.run_ok(
                &git_root,
                &[
                    "branch",
                    "--track",
                    DATA_BRANCH,
                    &format!("origin/{DATA_BRANCH}"),
                ],
            )?;
        } else {
            info!(branch = DATA_BRANCH, "creating orphan data branch");
            let tree = self.git.run_with_input(&git_root, &["mktree"], "")?;
            if !tree.success {
                return Err(WeftError::subprocess("mktree", tree.stderr.trim().to_string()));
            }
            let tree_id = tree.trimmed();
            let commit = self
                .git
                .run_ok(&git_root, &["commit-tree", &tree_id, "-m", "weft init"])?
                .trimmed();
            self.git
                .run_ok(&git_root, &["branch", DATA_BRANCH, &commit])?;
        }

        let worktree_arg = self.worktree.to_string_lossy().into_owned();
        self.git
            .run_ok(&git_root, &["worktree", "add", &worktree_arg, DATA_BRANCH])?;

        // Skeleton, config, version stamp
        FsIssueStore::open(&self.worktree, prefix)?;
        let mut map = self.config_load_or_default()?;
        map.insert("prefix".to_string(), prefix.to_string());
        map.entry("version".to_string())
            .or_insert_with(|| LATEST_VERSION.to_string());
        config::save(&self.config_path(), &map)?;
        self.commit("weft init")?;
        Ok(())
    }

    /// Tear down and rebuild even when already initialized.
    ///
    /// # Errors
    ///
    /// As `init`.
    pub fn force_reinit(&self, prefix: &str) -> Result<()> {
        self.init(prefix, true)
    }

    fn teardown(&self) {
        let Ok(git_root) = self.git_root() else {
            return;
        };
        let worktree_arg = self.worktree.to_string_lossy().into_owned();
        // Best effort: a half-torn-down state is rebuilt right after.
        if let Err(err) = self
            .git
            .run(&git_root, &["worktree", "remove", "--force", &worktree_arg])
        {
            warn!(error = %err, "worktree remove failed");
        }
        if let Err(err) = self.git.run(&git_root, &["branch", "-D", DATA_BRANCH]) {
            warn!(error = %err, "branch delete failed");
        }
    }

    fn git_root(&self) -> Result<PathBuf> {
        // The worktree's grandparent is the git common dir.
        self.worktree
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .ok_or(WeftError::NotARepo)
    }

    fn remote_branch_exists(&self, dir: &Path) -> Result<bool> {
        let remote = self.git.run(dir, &["remote", "get-url", "origin"])?;
        if !remote.success {
            return Ok(false);
        }
        let heads = self
            .git
            .run_ok(dir, &["ls-remote", "--heads", "origin", DATA_BRANCH])?;
        Ok(!heads.trimmed().is_empty())
    }

    // ========================================================================
    // Config
    // ========================================================================

    fn config_path(&self) -> PathBuf {
        self.worktree.join("config")
    }

    fn config_load_or_default(&self) -> Result<BTreeMap<String, String>> {
        let path = self.config_path();
        if path.exists() {
            config::load(&path)
        } else {
            Ok(BTreeMap::new())
        }
    }

    /// Read one config key.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or malformed.
    pub fn config_get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.config_load_or_default()?.get(key).cloned())
    }

    /// Write one config key and commit it with its intent line.
    ///
    /// # Errors
    ///
    /// Returns an error if the write or commit fails.
    pub fn config_set(&self, key: &str, value: &str) -> Result<()> {
        let mut map = self.config_load_or_default()?;
        map.insert(key.to_string(), value.to_string());
        config::save(&self.config_path(), &map)?;
        let intent = Intent::Config {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.commit(&intent.to_string())
    }

    /// Every configured key/value pair, sorted by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable or malformed.
    pub fn config_list(&self) -> Result<BTreeMap<String, String>> {
        self.config_load_or_default()
    }

    // ========================================================================
    // Versioning
    // ========================================================================

    /// Current schema version; 0 when unstamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file is unreadable, or `Config` if
    /// the stamp is not a number.
    pub fn version(&self) -> Result<i64> {
        match self.config_get("version")? {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| WeftError::Config(format!("bad version stamp '{raw}'"))),
            None => Ok(0),
        }
    }

    /// Refuse to operate on data this binary does not understand.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedVersion` with a remediation hint when the
    /// stamp is negative or newer than this binary.
    pub fn ensure_supported_version(&self) -> Result<()> {
        let found = self.version()?;
        if found < 0 {
            return Err(WeftError::UnsupportedVersion {
                found,
                latest: LATEST_VERSION,
                hint: "run `weft upgrade` to repair the schema stamp".to_string(),
            });
        }
        if found > i64::from(LATEST_VERSION) {
            return Err(WeftError::UnsupportedVersion {
                found,
                latest: LATEST_VERSION,
                hint: "this repository was written by a newer weft; update the binary".to_string(),
            });
        }
        Ok(())
    }

    /// Apply every pending migration in version order, then commit the
    /// migrated state and the new stamp as one commit.
    ///
    /// Returns `(from, to)`. A current repo returns `(v, v)` and commits
    /// nothing. A failing migration aborts before any commit, leaving the
    /// prior valid version in place.
    ///
    /// # Errors
    ///
    /// Returns `Migration` when a step fails, or `UnsupportedVersion` for
    /// a stamp this binary cannot read.
    pub fn upgrade(&self) -> Result<(i64, i64)> {
        let from = self.version()?;
        if from > i64::from(LATEST_VERSION) {
            self.ensure_supported_version()?;
        }
        let latest = i64::from(LATEST_VERSION);
        if from == latest {
            return Ok((from, from));
        }

        for (target, migrate) in migrations() {
            let target = i64::from(target);
            if target <= from {
                continue;
            }
            info!(from, target, "applying migration");
            migrate(&self.worktree).map_err(|err| WeftError::Migration {
                from: u32::try_from(from.max(0)).unwrap_or(0),
                to: u32::try_from(target.max(0)).unwrap_or(0),
                reason: err.to_string(),
            })?;
        }

        let mut map = self.config_load_or_default()?;
        map.insert("version".to_string(), latest.to_string());
        config::save(&self.config_path(), &map)?;
        self.commit(&format!("weft upgrade schema v{from} -> v{latest}"))?;
        Ok((from, latest))
    }

    // ========================================================================
    // Sync
    // ========================================================================

    /// Reconcile with the remote copy of the data branch.
    ///
    /// # Errors
    ///
    /// Returns a subprocess error from fetch/push/log plumbing. A rebase
    /// conflict is not an error; it yields `NeedsReplay`.
    pub fn sync(&self) -> Result<SyncStatus> {
        let remote = self.git.run(&self.worktree, &["remote", "get-url", "origin"])?;
        if !remote.success {
            return Ok(SyncStatus::NoRemote);
        }

        let heads = self
            .git
            .run_ok(&self.worktree, &["ls-remote", "--heads", "origin", DATA_BRANCH])?;
        if heads.trimmed().is_empty() {
            // Nothing on the remote yet; first push wins.
            self.push()?;
            return Ok(SyncStatus::Pushed);
        }

        self.git
            .run_ok(&self.worktree, &["fetch", "origin", DATA_BRANCH])?;
        let local = self.git.run_ok(&self.worktree, &["rev-parse", "HEAD"])?.trimmed();
        let fetched = self
            .git
            .run_ok(&self.worktree, &["rev-parse", "FETCH_HEAD"])?
            .trimmed();
        if local == fetched {
            return Ok(SyncStatus::UpToDate);
        }

        let base = self
            .git
            .run_ok(&self.worktree, &["merge-base", "HEAD", "FETCH_HEAD"])?
            .trimmed();
        if base == fetched {
            // Strictly ahead.
            self.push()?;
            return Ok(SyncStatus::Pushed);
        }
        if base == local {
            // Strictly behind.
            self.git
                .run_ok(&self.worktree, &["merge", "--ff-only", "FETCH_HEAD"])?;
            return Ok(SyncStatus::UpToDate);
        }

        // Diverged: try the substrate's own merge first.
        debug!(%local, %fetched, "histories diverged, rebasing");
        let rebase = self.git.run(&self.worktree, &["rebase", "FETCH_HEAD"])?;
        if rebase.success {
            self.push()?;
            return Ok(SyncStatus::RebasedAndPushed);
        }

        // Conflict: line-based merge cannot reconcile field-level edits.
        // Collect the intents that did not land and leave the worktree at
        // the fetched tip for the caller to replay against.
        warn!("rebase conflict, collecting intents for replay");
        self.git.run(&self.worktree, &["rebase", "--abort"])?;
        let log = self.git.run_ok(
            &self.worktree,
            &[
                "log",
                "--reverse",
                "--format=%s",
                &format!("FETCH_HEAD..{local}"),
            ],
        )?;
        let intents: Vec<String> = log
            .stdout
            .lines()
            .map(str::to_string)
            .filter(|l| !l.is_empty())
            .collect();
        self.git
            .run_ok(&self.worktree, &["reset", "--hard", "FETCH_HEAD"])?;
        Ok(SyncStatus::NeedsReplay { intents })
    }

    /// Push the data branch to the remote.
    ///
    /// # Errors
    ///
    /// Returns a subprocess error when the push is rejected.
    pub fn push(&self) -> Result<()> {
        self.git
            .run_ok(&self.worktree, &["push", "-u", "origin", DATA_BRANCH])?;
        Ok(())
    }
}

impl<G: GitRunner> Committer for RepoBackend<G> {
    /// Stage and commit everything in the data worktree.
    ///
    /// Bypasses user-installed hooks so a failing pre-commit hook in the
    /// host project never blocks issue bookkeeping. No staged changes is
    /// a successful no-op.
    fn commit(&self, message: &str) -> Result<()> {
        let status = self
            .git
            .run_ok(&self.worktree, &["status", "--porcelain"])?;
        if status.trimmed().is_empty() {
            return Ok(());
        }
        self.git.run_ok(&self.worktree, &["add", "-A"])?;
        self.git
            .run_ok(&self.worktree, &["commit", "--no-verify", "-m", message])?;
        Ok(())
    }
}

fn validate_prefix(prefix: &str) -> Result<()> {
    let ok = !prefix.is_empty()
        && prefix.len() <= 10
        && prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(WeftError::validation(
            "prefix",
            "must be 1-10 lowercase ascii letters or digits",
        ))
    }
}

type Migration = fn(&Path) -> Result<()>;

/// Schema migrations, strictly in target-version order.
fn migrations() -> Vec<(u32, Migration)> {
    vec![(1, migrate_v1_rebuild_indexes)]
}

/// v0 -> v1: index marker directories were introduced; rebuild them from
/// the records.
fn migrate_v1_rebuild_indexes(worktree: &Path) -> Result<()> {
    let index_dir = worktree.join("index");
    if index_dir.exists() {
        fs::remove_dir_all(&index_dir)?;
    }
    let path = worktree.join("config");
    let prefix = if path.exists() {
        config::load(&path)?
            .get("prefix")
            .cloned()
            .unwrap_or_else(|| "wf".to_string())
    } else {
        "wf".to_string()
    };
    let store = FsIssueStore::open(worktree, prefix)?;
    for id in store.existing_ids()? {
        let issue = store.get(&id)?;
        store.import(&issue)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitOutput;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Scripted git: pops one canned output per call, recording the args.
    #[derive(Default)]
    struct FakeGit {
        script: RefCell<VecDeque<GitOutput>>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeGit {
        fn scripted(outputs: Vec<GitOutput>) -> Self {
            Self {
                script: RefCell::new(outputs.into()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl GitRunner for FakeGit {
        fn run(&self, _dir: &Path, args: &[&str]) -> Result<GitOutput> {
            self.calls.borrow_mut().push(args.join(" "));
            Ok(self
                .script
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| GitOutput::ok("")))
        }

        fn run_with_input(&self, dir: &Path, args: &[&str], _input: &str) -> Result<GitOutput> {
            self.run(dir, args)
        }
    }

    fn backend(outputs: Vec<GitOutput>) -> (TempDir, RepoBackend<FakeGit>) {
        let dir = TempDir::new().unwrap();
        let backend =
            RepoBackend::with_worktree(FakeGit::scripted(outputs), dir.path().to_path_buf());
        (dir, backend)
    }

    #[test]
    fn sync_without_remote_reports_no_remote() {
        let (_dir, backend) = backend(vec![GitOutput::failed("no such remote")]);
        assert_eq!(backend.sync().unwrap(), SyncStatus::NoRemote);
    }

    #[test]
    fn sync_pushes_when_remote_branch_is_absent() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("git@example.com:repo.git"), // remote get-url
            GitOutput::ok(""),                         // ls-remote: no heads
            GitOutput::ok(""),                         // push
        ]);
        assert_eq!(backend.sync().unwrap(), SyncStatus::Pushed);
        assert!(backend.git.calls().last().unwrap().starts_with("push"));
    }

    #[test]
    fn sync_up_to_date_when_heads_match() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("git@example.com:repo.git"),
            GitOutput::ok("abc\trefs/heads/weft/data"),
            GitOutput::ok(""),    // fetch
            GitOutput::ok("abc"), // rev-parse HEAD
            GitOutput::ok("abc"), // rev-parse FETCH_HEAD
        ]);
        assert_eq!(backend.sync().unwrap(), SyncStatus::UpToDate);
    }

    #[test]
    fn sync_pushes_when_strictly_ahead() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("git@example.com:repo.git"),
            GitOutput::ok("bbb\trefs/heads/weft/data"),
            GitOutput::ok(""),
            GitOutput::ok("aaa"), // HEAD
            GitOutput::ok("bbb"), // FETCH_HEAD
            GitOutput::ok("bbb"), // merge-base == fetched
            GitOutput::ok(""),    // push
        ]);
        assert_eq!(backend.sync().unwrap(), SyncStatus::Pushed);
    }

    #[test]
    fn sync_fast_forwards_when_strictly_behind() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("git@example.com:repo.git"),
            GitOutput::ok("bbb\trefs/heads/weft/data"),
            GitOutput::ok(""),
            GitOutput::ok("aaa"), // HEAD
            GitOutput::ok("bbb"), // FETCH_HEAD
            GitOutput::ok("aaa"), // merge-base == local
            GitOutput::ok(""),    // merge --ff-only
        ]);
        assert_eq!(backend.sync().unwrap(), SyncStatus::UpToDate);
        assert!(backend
            .git
            .calls()
            .iter()
            .any(|c| c.starts_with("merge --ff-only")));
    }

    #[test]
    fn sync_rebases_and_pushes_on_clean_divergence() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("git@example.com:repo.git"),
            GitOutput::ok("bbb\trefs/heads/weft/data"),
            GitOutput::ok(""),
            GitOutput::ok("aaa"),
            GitOutput::ok("bbb"),
            GitOutput::ok("000"), // merge-base: diverged
            GitOutput::ok(""),    // rebase succeeds
            GitOutput::ok(""),    // push
        ]);
        assert_eq!(backend.sync().unwrap(), SyncStatus::RebasedAndPushed);
    }

    #[test]
    fn sync_conflict_aborts_collects_intents_and_resets() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("git@example.com:repo.git"),
            GitOutput::ok("bbb\trefs/heads/weft/data"),
            GitOutput::ok(""),
            GitOutput::ok("aaa"),
            GitOutput::ok("bbb"),
            GitOutput::ok("000"),
            GitOutput::failed("CONFLICT (content)"), // rebase
            GitOutput::ok(""),                       // rebase --abort
            GitOutput::ok("close wf-a\nupdate wf-b p=1\n"), // log
            GitOutput::ok(""),                       // reset --hard
        ]);
        let status = backend.sync().unwrap();
        assert_eq!(
            status,
            SyncStatus::NeedsReplay {
                intents: vec!["close wf-a".to_string(), "update wf-b p=1".to_string()],
            }
        );
        let calls = backend.git.calls();
        assert!(calls.iter().any(|c| c == "rebase --abort"));
        assert!(calls.iter().any(|c| c == "reset --hard FETCH_HEAD"));
    }

    #[test]
    fn commit_is_a_noop_with_clean_worktree() {
        let (_dir, backend) = backend(vec![GitOutput::ok("")]); // status --porcelain
        backend.commit("close wf-a").unwrap();
        assert_eq!(backend.git.calls(), vec!["status --porcelain"]);
    }

    #[test]
    fn commit_stages_everything_and_bypasses_hooks() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok(" M issues/wf-a.json"),
            GitOutput::ok(""),
            GitOutput::ok(""),
        ]);
        backend.commit("close wf-a").unwrap();
        assert_eq!(
            backend.git.calls(),
            vec![
                "status --porcelain",
                "add -A",
                "commit --no-verify -m close wf-a",
            ]
        );
    }

    #[test]
    fn config_set_commits_the_intent_line() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("M config"),
            GitOutput::ok(""),
            GitOutput::ok(""),
        ]);
        backend.config_set("workflow.auto_start", "true").unwrap();
        assert_eq!(
            backend.config_get("workflow.auto_start").unwrap().as_deref(),
            Some("true")
        );
        assert!(backend
            .git
            .calls()
            .iter()
            .any(|c| c.ends_with("config workflow.auto_start=true")));
    }

    #[test]
    fn config_set_quotes_values_with_whitespace() {
        let (_dir, backend) = backend(vec![
            GitOutput::ok("M config"),
            GitOutput::ok(""),
            GitOutput::ok(""),
        ]);
        backend.config_set("motd", "hello world").unwrap();
        let commit = backend
            .git
            .calls()
            .iter()
            .find(|c| c.starts_with("commit"))
            .cloned()
            .unwrap();
        let line = commit.trim_start_matches("commit --no-verify -m ");
        match Intent::parse(line).unwrap() {
            Intent::Config { key, value } => {
                assert_eq!(key, "motd");
                assert_eq!(value, "hello world");
            }
            other => panic!("unexpected intent: {other:?}"),
        }
    }

    #[test]
    fn version_defaults_to_zero_and_rejects_newer_stamps() {
        let (_dir, backend) = backend(vec![]);
        assert_eq!(backend.version().unwrap(), 0);

        let mut map = BTreeMap::new();
        map.insert("version".to_string(), "99".to_string());
        config::save(&backend.config_path(), &map).unwrap();
        assert!(matches!(
            backend.ensure_supported_version().unwrap_err(),
            WeftError::UnsupportedVersion { found: 99, .. }
        ));
    }

    #[test]
    fn upgrade_on_current_repo_commits_nothing() {
        let (_dir, backend) = backend(vec![]);
        let mut map = BTreeMap::new();
        map.insert("version".to_string(), LATEST_VERSION.to_string());
        config::save(&backend.config_path(), &map).unwrap();

        let (from, to) = backend.upgrade().unwrap();
        assert_eq!(from, i64::from(LATEST_VERSION));
        assert_eq!(to, i64::from(LATEST_VERSION));
        assert!(backend.git.calls().is_empty());
    }

    #[test]
    fn upgrade_rebuilds_indexes_and_stamps_version() {
        let (dir, backend) = backend(vec![
            GitOutput::ok("M config"), // status
            GitOutput::ok(""),         // add
            GitOutput::ok(""),         // commit
        ]);
        let mut map = BTreeMap::new();
        map.insert("prefix".to_string(), "wf".to_string());
        map.insert("version".to_string(), "0".to_string());
        config::save(&backend.config_path(), &map).unwrap();

        // a record with no index markers, as a v0 repo would have
        let store = FsIssueStore::open(dir.path(), "wf").unwrap();
        let issue = store
            .create("Orphaned record", weft_lib::CreateOptions::default())
            .unwrap();
        fs::remove_dir_all(dir.path().join("index")).unwrap();

        let (from, to) = backend.upgrade().unwrap();
        assert_eq!((from, to), (0, i64::from(LATEST_VERSION)));
        assert_eq!(backend.version().unwrap(), i64::from(LATEST_VERSION));
        assert!(dir
            .path()
            .join("index")
            .join("status")
            .join("open")
            .join(&issue.id)
            .exists());
    }

    #[test]
    fn prefix_validation() {
        assert!(validate_prefix("wf").is_ok());
        assert!(validate_prefix("issues2").is_ok());
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("Weft").is_err());
        assert!(validate_prefix("toolongprefix").is_err());
    }
}
