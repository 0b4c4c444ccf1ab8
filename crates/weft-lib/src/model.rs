//! Core data types for weft-lib.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Deferred,
    Closed,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Deferred => "deferred",
            Self::Closed => "closed",
        }
    }

    /// All statuses, in lifecycle order. Used to enumerate index directories.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Open, Self::InProgress, Self::Deferred, Self::Closed]
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = crate::error::WeftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "deferred" => Ok(Self::Deferred),
            "closed" => Ok(Self::Closed),
            other => Err(crate::error::WeftError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Issue priority (0=Critical, 4=Backlog).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    pub const CRITICAL: Self = Self(0);
    pub const HIGH: Self = Self(1);
    pub const MEDIUM: Self = Self(2);
    pub const LOW: Self = Self(3);
    pub const BACKLOG: Self = Self(4);

    /// Validate the 0-4 range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPriority` when the value is outside 0-4.
    pub fn new(value: i32) -> crate::error::Result<Self> {
        if (0..=4).contains(&value) {
            Ok(Self(value))
        } else {
            Err(crate::error::WeftError::InvalidPriority { priority: value })
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl FromStr for Priority {
    type Err = crate::error::WeftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_uppercase();
        let val = s.strip_prefix('P').unwrap_or(&s);

        match val.parse::<i32>() {
            Ok(p) => Self::new(p),
            Err(_) => Err(crate::error::WeftError::InvalidPriority { priority: -1 }),
        }
    }
}

fn default_issue_type() -> String {
    "task".to_string()
}

/// A comment on an issue. Append-only; never edited or removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    /// Unique ID (e.g., "wf-abc123").
    pub id: String,

    /// Title.
    pub title: String,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Workflow status.
    #[serde(default)]
    pub status: Status,

    /// Priority (0=Critical, 4=Backlog).
    #[serde(default)]
    pub priority: Priority,

    /// Free-form issue type tag (task, bug, feature, ...).
    #[serde(default = "default_issue_type")]
    pub issue_type: String,

    /// Assigned user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Defer-until date; meaningful only while status is deferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defer_until: Option<NaiveDate>,

    /// Reason recorded at close time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_reason: Option<String>,

    /// Optional parent issue ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    /// Labels, kept sorted and deduplicated.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,

    /// Issues this issue blocks. Mirror of each target's `blocked_by`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<String>,

    /// Issues blocking this issue. Mirror of each source's `blocks`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,

    /// Comments, append-only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Issue {
    /// Construct an issue with defaults for everything but id and title.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            status: Status::Open,
            priority: Priority::default(),
            issue_type: default_issue_type(),
            assignee: None,
            created_at: Utc::now(),
            defer_until: None,
            close_reason: None,
            parent: None,
            labels: Vec::new(),
            blocks: Vec::new(),
            blocked_by: Vec::new(),
            comments: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in Status::all() {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
    }

    #[test]
    fn status_rejects_unknown() {
        assert!("pending".parse::<Status>().is_err());
    }

    #[test]
    fn priority_parses_with_and_without_prefix() {
        assert_eq!("P1".parse::<Priority>().unwrap(), Priority::HIGH);
        assert_eq!("3".parse::<Priority>().unwrap(), Priority::LOW);
        assert!("P7".parse::<Priority>().is_err());
        assert!("high".parse::<Priority>().is_err());
    }

    #[test]
    fn priority_new_enforces_range() {
        assert!(Priority::new(0).is_ok());
        assert!(Priority::new(4).is_ok());
        assert!(Priority::new(5).is_err());
        assert!(Priority::new(-1).is_err());
    }

    #[test]
    fn new_issue_defaults() {
        let issue = Issue::new("wf-abc", "Title");
        assert_eq!(issue.status, Status::Open);
        assert_eq!(issue.priority, Priority::MEDIUM);
        assert_eq!(issue.issue_type, "task");
        assert!(issue.blocks.is_empty());
        assert!(issue.blocked_by.is_empty());
    }

    #[test]
    fn issue_json_omits_empty_relations() {
        let issue = Issue::new("wf-abc", "Title");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(!json.contains("blocks"));
        assert!(!json.contains("labels"));
        assert!(json.contains("\"status\":\"open\""));
    }
}
