//! Narrow git subprocess interface.
//!
//! Core logic never formats and parses argument lists itself; it talks to
//! this trait, and tests substitute a scripted implementation.

use std::path::Path;
use std::process::{Command, Stdio};

use weft_lib::error::{Result, WeftError};

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    #[must_use]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Stdout with trailing whitespace trimmed.
    #[must_use]
    pub fn trimmed(&self) -> String {
        self.stdout.trim().to_string()
    }
}

/// Executes git commands in a given directory.
pub trait GitRunner {
    /// Run git with `args`, capturing output. A nonzero exit is reported
    /// in the returned `GitOutput`, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process cannot be spawned.
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput>;

    /// As `run`, feeding `input` to the child's stdin.
    ///
    /// # Errors
    ///
    /// Returns an error only when the process cannot be spawned.
    fn run_with_input(&self, dir: &Path, args: &[&str], input: &str) -> Result<GitOutput>;

    /// Run git, converting a nonzero exit into `Subprocess` with the
    /// captured stderr.
    ///
    /// # Errors
    ///
    /// Returns `Subprocess` on nonzero exit, or a spawn error.
    fn run_ok(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        let output = self.run(dir, args)?;
        if output.success {
            Ok(output)
        } else {
            Err(WeftError::subprocess(
                args.join(" "),
                output.stderr.trim().to_string(),
            ))
        }
    }
}

/// The real thing: shells out to the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct SystemGit;

impl SystemGit {
    fn spawn(dir: &Path, args: &[&str], input: Option<&str>) -> Result<GitOutput> {
        let mut command = Command::new("git");
        command.args(args).current_dir(dir);
        let output = if let Some(input) = input {
            command
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
            let mut child = command.spawn()?;
            if let Some(mut stdin) = child.stdin.take() {
                use std::io::Write;
                stdin.write_all(input.as_bytes())?;
            }
            child.wait_with_output()?
        } else {
            command.output()?
        };
        Ok(GitOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl GitRunner for SystemGit {
    fn run(&self, dir: &Path, args: &[&str]) -> Result<GitOutput> {
        Self::spawn(dir, args, None)
    }

    fn run_with_input(&self, dir: &Path, args: &[&str], input: &str) -> Result<GitOutput> {
        Self::spawn(dir, args, Some(input))
    }
}
