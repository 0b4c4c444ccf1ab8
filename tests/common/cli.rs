//! Shared helpers for end-to-end tests.
//!
//! Each test gets a throwaway git repository in a temp directory and
//! runs the real binary inside it.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

pub struct WeftWorkspace {
    dir: TempDir,
}

impl WeftWorkspace {
    /// Fresh git repository with one commit on `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q", "-b", "main"]);
        configure_identity(dir.path());
        std::fs::write(dir.path().join("README.md"), "scratch\n").unwrap();
        git(dir.path(), &["add", "-A"]);
        git(dir.path(), &["commit", "-q", "-m", "initial"]);
        Self { dir }
    }

    /// Bare repository usable as an `origin` remote.
    pub fn new_bare() -> Self {
        let dir = TempDir::new().unwrap();
        git(dir.path(), &["init", "-q", "--bare"]);
        Self { dir }
    }

    /// Clone of `remote` with a committer identity set up.
    pub fn clone_from(remote: &Path) -> Self {
        let dir = TempDir::new().unwrap();
        git(
            dir.path(),
            &["clone", "-q", remote.to_str().unwrap(), "."],
        );
        configure_identity(dir.path());
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_remote(&self, remote: &Path) {
        git(
            self.path(),
            &["remote", "add", "origin", remote.to_str().unwrap()],
        );
        git(self.path(), &["push", "-q", "-u", "origin", "main"]);
    }
}

fn configure_identity(dir: &Path) {
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "user.name", "Test"]);
}

pub fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed in {}", dir.display());
}

pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Run the binary in the workspace, capturing output. `context` labels
/// the failure message when the capture itself goes wrong.
pub fn run_weft<const N: usize>(
    workspace: &WeftWorkspace,
    args: [&str; N],
    context: &str,
) -> RunOutput {
    let output = assert_cmd::Command::cargo_bin("weft")
        .unwrap()
        .args(args)
        .current_dir(workspace.path())
        .output()
        .unwrap_or_else(|e| panic!("{context}: failed to run weft: {e}"));
    RunOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

/// As `run_weft`, asserting success and returning stdout.
pub fn weft_ok<const N: usize>(
    workspace: &WeftWorkspace,
    args: [&str; N],
    context: &str,
) -> String {
    let output = run_weft(workspace, args, context);
    assert!(
        output.success,
        "{context}: weft {args:?} failed\nstdout: {}\nstderr: {}",
        output.stdout, output.stderr
    );
    output.stdout
}

/// First issue ID in `create` output ("Created <id>: <title>").
pub fn created_id(stdout: &str) -> String {
    stdout
        .trim()
        .strip_prefix("Created ")
        .and_then(|rest| rest.split(':').next())
        .map(str::to_string)
        .unwrap_or_else(|| panic!("unexpected create output: {stdout}"))
}
