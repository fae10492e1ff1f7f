//! List manifest
//!
//! Which plain-text lists make up a rule-set, where they live inside the
//! source, and what each one is for.

use serde::{Deserialize, Serialize};
use shared_types::ListKind;

/// One list inside a rule-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Path relative to the rule-set root, `/`-separated.
    pub path: String,
    pub kind: ListKind,
}

impl ListEntry {
    pub fn new(path: impl Into<String>, kind: ListKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// Category name of this list: its relative path without extension.
    pub fn category_name(&self) -> String {
        category_name_for(&self.path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListManifest {
    #[serde(default)]
    pub lists: Vec<ListEntry>,
}

impl ListManifest {
    pub fn new(lists: Vec<ListEntry>) -> Self {
        Self { lists }
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Every `.txt` path in `paths` as a trigger list, sorted for a stable
    /// id assignment.
    pub fn discover_triggers<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut lists: Vec<ListEntry> = paths
            .into_iter()
            .filter(|p| p.to_ascii_lowercase().ends_with(".txt"))
            .map(|p| ListEntry::new(normalize_list_path(p), ListKind::Triggers))
            .collect();
        lists.sort_by(|a, b| a.path.cmp(&b.path));
        Self { lists }
    }
}

/// `/`-separated path with no leading `./` or `/`.
pub fn normalize_list_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    loop {
        if let Some(rest) = trimmed.strip_prefix("./") {
            trimmed = rest;
        } else if let Some(rest) = trimmed.strip_prefix('/') {
            trimmed = rest;
        } else {
            break;
        }
    }
    trimmed.to_string()
}

/// Directory prefix plus file stem, e.g. `adult/triggers.txt` -> `adult/triggers`.
pub fn category_name_for(path: &str) -> String {
    let path = normalize_list_path(path);
    let (dir, file) = match path.rfind('/') {
        Some(i) => path.split_at(i + 1),
        None => ("", path.as_str()),
    };
    let stem = match file.rfind('.') {
        Some(i) if i > 0 => &file[..i],
        _ => file,
    };
    format!("{dir}{stem}")
}
