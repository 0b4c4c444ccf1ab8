//! Flat key=value configuration file.
//!
//! One `key=value` pair per line, no escaping. Reserved keys: `prefix`,
//! `version`; the `workflow.*` namespace is read by presentation layers.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, WeftError};

/// Load a config file into a sorted map.
///
/// Blank lines are skipped. A line without `=` is rejected.
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is malformed.
pub fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    let content = fs::read_to_string(path)?;
    let mut map = BTreeMap::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(WeftError::Config(format!(
                "malformed line {}: {line}",
                lineno + 1
            )));
        };
        map.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(map)
}

/// Save a config map, one `key=value` per line in key order.
///
/// Writes to a temp file then renames for atomicity.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(path: &Path, map: &BTreeMap<String, String>) -> Result<()> {
    let mut content = String::new();
    for (key, value) in map {
        content.push_str(key);
        content.push('=');
        content.push_str(value);
        content.push('\n');
    }
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn round_trips_key_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        let mut map = BTreeMap::new();
        map.insert("prefix".to_string(), "wf".to_string());
        map.insert("version".to_string(), "1".to_string());
        map.insert("workflow.auto_start".to_string(), "true".to_string());
        save(&path, &map).unwrap();
        assert_eq!(load(&path).unwrap(), map);
    }

    #[test]
    fn skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "prefix=wf\n\nversion=1\n").unwrap();
        let map = load(&path).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["prefix"], "wf");
    }

    #[test]
    fn rejects_line_without_separator() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "prefix\n").unwrap();
        assert!(load(&path).is_err());
    }

    #[test]
    fn save_is_sorted_and_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        let mut map = BTreeMap::new();
        map.insert("version".to_string(), "1".to_string());
        map.insert("prefix".to_string(), "wf".to_string());
        save(&path, &map).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "prefix=wf\nversion=1\n");
    }
}
