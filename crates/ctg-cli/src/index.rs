//! # Project Index
//!
//! `PROJECTS.json` lists every record in the dataset:
//!
//! ```json
//! { "3f1c2b1e-8d4a-4c1e-9b7a-2a6f0c9d1e55": { "path": "/projects/" } }
//! ```
//!
//! The record file for an entry lives at `<data root><path><id>.json`.
//! Entries may carry further fields; only `path` is read.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// One index entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexEntry {
    /// Directory of the record, relative to the data root, e.g. `/projects/`.
    pub path: String,
}

/// The parsed project index, ordered by record id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ProjectIndex {
    entries: BTreeMap<String, IndexEntry>,
}

impl ProjectIndex {
    /// Read and parse an index file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read project index {}", path.display()))?;
        let index: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse project index {}", path.display()))?;
        tracing::info!(path = %path.display(), records = index.len(), "loaded project index");
        Ok(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index lists no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(id, record file)` pairs in id order.
    pub fn record_paths(&self, data_root: &Path) -> Vec<(String, PathBuf)> {
        self.entries
            .iter()
            .map(|(id, entry)| (id.clone(), record_path(data_root, id, entry)))
            .collect()
    }
}

fn record_path(data_root: &Path, id: &str, entry: &IndexEntry) -> PathBuf {
    let dir = entry.path.trim_matches('/');
    let file = format!("{id}.json");
    if dir.is_empty() {
        data_root.join(file)
    } else {
        data_root.join(dir).join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_paths_join_root_dir_and_id() {
        let index: ProjectIndex = serde_json::from_str(
            r#"{
                "b-id": {"path": "/projects/", "title": "ignored"},
                "a-id": {"path": "/archive/2021/"},
                "c-id": {"path": "/"}
            }"#,
        )
        .unwrap();
        let root = Path::new("/data");
        assert_eq!(
            index.record_paths(root),
            vec![
                ("a-id".to_string(), PathBuf::from("/data/archive/2021/a-id.json")),
                ("b-id".to_string(), PathBuf::from("/data/projects/b-id.json")),
                ("c-id".to_string(), PathBuf::from("/data/c-id.json")),
            ]
        );
    }

    #[test]
    fn entry_without_path_is_an_error() {
        assert!(serde_json::from_str::<ProjectIndex>(r#"{"x": {}}"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectIndex::load(&dir.path().join("PROJECTS.json")).unwrap_err();
        assert!(format!("{err:#}").contains("PROJECTS.json"));
    }
}
