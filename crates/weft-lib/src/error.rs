//! Error types for `weft-lib`.

use thiserror::Error;

/// Primary error type for weft-lib operations.
#[derive(Error, Debug)]
pub enum WeftError {
    // === Issue Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Attempted to create an issue with an ID that already exists.
    #[error("Issue ID already exists: {id}")]
    IdExists { id: String },

    /// ID generation could not find a free ID within the nonce budget.
    #[error("Issue ID collision: {id}")]
    IdCollision { id: String },

    /// Issue ID format is invalid.
    #[error("Invalid issue ID format: {id}")]
    InvalidId { id: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Priority out of valid range (0-4).
    #[error("Priority must be 0-4, got: {priority}")]
    InvalidPriority { priority: i32 },

    /// A status transition that the issue lifecycle does not allow.
    #[error("Invalid state transition for {id}: {from} -> {to}")]
    InvalidStateTransition {
        id: String,
        from: String,
        to: String,
    },

    /// Start refused because the issue has unresolved blockers.
    #[error("Issue {id} is blocked by: {}", blockers.join(", "))]
    Blocked { id: String, blockers: Vec<String> },

    // === Dependency Errors ===
    /// Self-referential dependency.
    #[error("Issue cannot block itself: {id}")]
    SelfDependency { id: String },

    // === Sync Errors ===
    /// A git subprocess exited nonzero.
    #[error("git {context} failed: {output}")]
    Subprocess { context: String, output: String },

    /// A single intent failed during replay. Collected, never fatal.
    #[error("Replay of '{intent}' failed: {reason}")]
    Replay { intent: String, reason: String },

    // === Schema Errors ===
    /// A migration step failed; the repo keeps its prior version.
    #[error("Migration {from} -> {to} failed: {reason}")]
    Migration { from: u32, to: u32, reason: String },

    /// Schema version outside the range this binary understands.
    #[error("Unsupported schema version {found} (latest known: {latest}); {hint}")]
    UnsupportedVersion {
        found: i64,
        latest: u32,
        hint: String,
    },

    // === Repository Errors ===
    /// Not inside a git repository.
    #[error("Not inside a git repository")]
    NotARepo,

    /// The issue branch has not been set up yet.
    #[error("Issue tracking not initialized (run `weft init`)")]
    NotInitialized,

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WeftError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn subprocess(context: impl Into<String>, output: impl Into<String>) -> Self {
        Self::Subprocess {
            context: context.into(),
            output: output.into(),
        }
    }

    #[must_use]
    pub fn transition(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidStateTransition {
            id: id.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Result type using `WeftError`.
pub type Result<T> = std::result::Result<T, WeftError>;
