//! Intent wire format.
//!
//! Every mutation is recorded as a single-line commit message: a verb,
//! positional fields, then `key=value` pairs, with double-quoted segments
//! treated as one token. This is the sync protocol's wire format and must
//! stay parseable across versions: unknown verbs and unknown keys are
//! skipped, never fatal, so older binaries can replay history written by
//! newer ones.

use std::fmt;

use chrono::NaiveDate;

use crate::model::{Priority, Status};
use crate::query::IssueUpdate;
use crate::store::CreateOptions;

/// One parsed, replayable store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create {
        id: String,
        title: String,
        opts: CreateOptions,
    },
    Close {
        id: String,
        reason: Option<String>,
    },
    Reopen {
        id: String,
    },
    Update {
        id: String,
        update: IssueUpdate,
    },
    Link {
        blocker: String,
        blocked: String,
    },
    Unlink {
        blocker: String,
        blocked: String,
    },
    Label {
        id: String,
        add: Vec<String>,
        remove: Vec<String>,
    },
    Delete {
        id: String,
    },
    Config {
        key: String,
        value: String,
    },
    Comment {
        id: String,
        author: String,
        text: String,
    },
}

/// Why a line was not turned into an intent. A skip is never an error;
/// the replayer logs it and moves on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    Empty,
    UnknownVerb(String),
    Malformed { verb: String, reason: String },
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty intent"),
            Self::UnknownVerb(verb) => write!(f, "unknown verb '{verb}'"),
            Self::Malformed { verb, reason } => write!(f, "malformed {verb} intent: {reason}"),
        }
    }
}

impl Intent {
    /// Parse one intent line.
    ///
    /// # Errors
    ///
    /// Returns a `Skip` describing why the line is not replayable. Skips
    /// cover empty lines, unknown verbs, and lines whose required fields
    /// are missing or unparseable. Unknown `key=value` pairs are ignored.
    pub fn parse(line: &str) -> Result<Self, Skip> {
        let tokens = tokenize(line);
        let Some((verb, rest)) = tokens.split_first() else {
            return Err(Skip::Empty);
        };

        match verb.as_str() {
            "create" => parse_create(rest),
            "close" => {
                let id = positional(rest, 0, "close")?;
                let reason = pairs(rest).find(|(k, _)| k == "reason").map(|(_, v)| v);
                Ok(Self::Close { id, reason })
            }
            "reopen" => Ok(Self::Reopen {
                id: positional(rest, 0, "reopen")?,
            }),
            "update" => parse_update(rest),
            "link" => Ok(Self::Link {
                blocker: positional(rest, 0, "link")?,
                blocked: positional(rest, 1, "link")?,
            }),
            "unlink" => Ok(Self::Unlink {
                blocker: positional(rest, 0, "unlink")?,
                blocked: positional(rest, 1, "unlink")?,
            }),
            "label" => {
                let id = positional(rest, 0, "label")?;
                let mut add = Vec::new();
                let mut remove = Vec::new();
                for (key, value) in pairs(rest) {
                    match key.as_str() {
                        "add" => add.extend(split_list(&value)),
                        "remove" => remove.extend(split_list(&value)),
                        _ => {}
                    }
                }
                Ok(Self::Label { id, add, remove })
            }
            "delete" => Ok(Self::Delete {
                id: positional(rest, 0, "delete")?,
            }),
            "config" => {
                let (key, value) = pairs(rest).next().ok_or_else(|| Skip::Malformed {
                    verb: "config".to_string(),
                    reason: "missing key=value".to_string(),
                })?;
                Ok(Self::Config { key, value })
            }
            "comment" => {
                let id = positional(rest, 0, "comment")?;
                let mut author = String::new();
                let mut text = None;
                for (key, value) in pairs(rest) {
                    match key.as_str() {
                        "author" => author = value,
                        "text" => text = Some(value),
                        _ => {}
                    }
                }
                let text = text.ok_or_else(|| Skip::Malformed {
                    verb: "comment".to_string(),
                    reason: "missing text".to_string(),
                })?;
                Ok(Self::Comment { id, author, text })
            }
            other => Err(Skip::UnknownVerb(other.to_string())),
        }
    }

    /// The ID this intent targets, where one exists.
    #[must_use]
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Create { id, .. }
            | Self::Close { id, .. }
            | Self::Reopen { id }
            | Self::Update { id, .. }
            | Self::Label { id, .. }
            | Self::Delete { id }
            | Self::Comment { id, .. } => Some(id),
            Self::Link { blocker, .. } | Self::Unlink { blocker, .. } => Some(blocker),
            Self::Config { .. } => None,
        }
    }
}

impl fmt::Display for Intent {
    /// Render the single-line wire form. `parse` of the output yields an
    /// equal intent.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { id, title, opts } => {
                write!(f, "create {id} {}", quote(title))?;
                if let Some(ref desc) = opts.description {
                    write!(f, " desc={}", quote(desc))?;
                }
                if let Some(priority) = opts.priority {
                    write!(f, " p={}", priority.0)?;
                }
                if let Some(ref issue_type) = opts.issue_type {
                    write!(f, " t={issue_type}")?;
                }
                if let Some(ref assignee) = opts.assignee {
                    write!(f, " assignee={}", quote(assignee))?;
                }
                if let Some(defer) = opts.defer_until {
                    write!(f, " defer={defer}")?;
                }
                if let Some(ref parent) = opts.parent {
                    write!(f, " parent={parent}")?;
                }
                if !opts.labels.is_empty() {
                    write!(f, " label={}", opts.labels.join(","))?;
                }
                Ok(())
            }
            Self::Close { id, reason } => {
                write!(f, "close {id}")?;
                if let Some(reason) = reason {
                    write!(f, " reason={}", quote(reason))?;
                }
                Ok(())
            }
            Self::Reopen { id } => write!(f, "reopen {id}"),
            Self::Update { id, update } => {
                write!(f, "update {id}")?;
                if let Some(ref title) = update.title {
                    write!(f, " title={}", quote(title))?;
                }
                if let Some(ref desc) = update.description {
                    write!(f, " desc={}", quote_opt(desc.as_deref()))?;
                }
                if let Some(status) = update.status {
                    write!(f, " status={status}")?;
                }
                if let Some(priority) = update.priority {
                    write!(f, " p={}", priority.0)?;
                }
                if let Some(ref issue_type) = update.issue_type {
                    write!(f, " t={issue_type}")?;
                }
                if let Some(ref assignee) = update.assignee {
                    write!(f, " assignee={}", quote_opt(assignee.as_deref()))?;
                }
                if let Some(ref defer) = update.defer_until {
                    match defer {
                        Some(date) => write!(f, " defer={date}")?,
                        None => write!(f, " defer=\"\"")?,
                    }
                }
                if let Some(ref parent) = update.parent {
                    write!(f, " parent={}", quote_opt(parent.as_deref()))?;
                }
                Ok(())
            }
            Self::Link { blocker, blocked } => write!(f, "link {blocker} {blocked}"),
            Self::Unlink { blocker, blocked } => write!(f, "unlink {blocker} {blocked}"),
            Self::Label { id, add, remove } => {
                write!(f, "label {id}")?;
                if !add.is_empty() {
                    write!(f, " add={}", add.join(","))?;
                }
                if !remove.is_empty() {
                    write!(f, " remove={}", remove.join(","))?;
                }
                Ok(())
            }
            Self::Delete { id } => write!(f, "delete {id}"),
            Self::Config { key, value } => write!(f, "config {key}={}", quote(value)),
            Self::Comment { id, author, text } => {
                write!(f, "comment {id} author={} text={}", quote(author), quote(text))
            }
        }
    }
}

fn parse_create(rest: &[String]) -> Result<Intent, Skip> {
    let id = positional(rest, 0, "create")?;
    let title = positional(rest, 1, "create")?;
    let mut opts = CreateOptions::default();
    for (key, value) in pairs(rest) {
        match key.as_str() {
            "desc" => opts.description = Some(value),
            "p" => opts.priority = Some(parse_priority(&value, "create")?),
            "t" => opts.issue_type = Some(value),
            "assignee" => opts.assignee = Some(value),
            "defer" => opts.defer_until = Some(parse_date(&value, "create")?),
            "parent" => opts.parent = Some(value),
            "label" => opts.labels = split_list(&value),
            _ => {}
        }
    }
    Ok(Intent::Create { id, title, opts })
}

fn parse_update(rest: &[String]) -> Result<Intent, Skip> {
    let id = positional(rest, 0, "update")?;
    let mut update = IssueUpdate::default();
    for (key, value) in pairs(rest) {
        match key.as_str() {
            "title" => update.title = Some(value),
            "desc" => update.description = Some(clearable(value)),
            "status" => {
                update.status = Some(value.parse::<Status>().map_err(|_| Skip::Malformed {
                    verb: "update".to_string(),
                    reason: format!("bad status '{value}'"),
                })?);
            }
            "p" => update.priority = Some(parse_priority(&value, "update")?),
            "t" => update.issue_type = Some(value),
            "assignee" => update.assignee = Some(clearable(value)),
            "defer" => {
                update.defer_until = Some(if value.is_empty() {
                    None
                } else {
                    Some(parse_date(&value, "update")?)
                });
            }
            "parent" => update.parent = Some(clearable(value)),
            _ => {}
        }
    }
    Ok(Intent::Update { id, update })
}

fn parse_priority(value: &str, verb: &str) -> Result<Priority, Skip> {
    value.parse::<Priority>().map_err(|_| Skip::Malformed {
        verb: verb.to_string(),
        reason: format!("bad priority '{value}'"),
    })
}

fn parse_date(value: &str, verb: &str) -> Result<NaiveDate, Skip> {
    value.parse::<NaiveDate>().map_err(|_| Skip::Malformed {
        verb: verb.to_string(),
        reason: format!("bad date '{value}'"),
    })
}

/// Empty value means "clear the field".
fn clearable(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Positional field `n`, counting only tokens without `=` before any pair.
fn positional(rest: &[String], n: usize, verb: &str) -> Result<String, Skip> {
    rest.iter()
        .take_while(|t| !is_pair(t))
        .nth(n)
        .cloned()
        .ok_or_else(|| Skip::Malformed {
            verb: verb.to_string(),
            reason: format!("missing positional field {n}"),
        })
}

fn pairs(rest: &[String]) -> impl Iterator<Item = (String, String)> + '_ {
    rest.iter().filter(|t| is_pair(t)).map(|t| {
        let (key, value) = t.split_once('=').unwrap_or((t, ""));
        (key.to_string(), value.to_string())
    })
}

fn is_pair(token: &str) -> bool {
    token.split_once('=').is_some_and(|(key, _)| {
        !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
    })
}

/// Split on whitespace, treating double-quoted segments as one token.
/// Quotes themselves are dropped; there is no escaping.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_content = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_content = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_content || !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                    has_content = false;
                }
            }
            c => {
                current.push(c);
                has_content = true;
            }
        }
    }
    if has_content || !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn quote(value: &str) -> String {
    // '=' must be quoted or the token would re-parse as a key=value pair.
    if value.is_empty() || value.contains(char::is_whitespace) || value.contains(['=', '"']) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn quote_opt(value: Option<&str>) -> String {
    quote(value.unwrap_or(""))
}
