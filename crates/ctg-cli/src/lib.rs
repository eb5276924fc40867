//! # ctg-cli: Command-Line Interface for Project Records
//!
//! Provides the `ctg` command-line interface: thin I/O glue around the
//! `ctg-schema` validation engine. Handlers read files from the data root,
//! hand parsed JSON to the engine and print reports. No validation logic
//! lives here.
//!
//! ## Subcommands
//!
//! - `ctg validate`: Validate record files, or every record in the project index.
//! - `ctg keywords`: Check the keyword taxonomy for duplicates and report its size.
//! - `ctg template`: Stamp the project template and check that it validates.
//! - `ctg schema`: Print the record schema outline.
//!
//! ## Data Root
//!
//! All default paths are relative to the data root: the first directory,
//! walking up from the current one, that contains `PROJECTS.json` or
//! `KEYWORDS/`.
//!
//! ```bash
//! ctg validate --all
//! ctg validate projects/daam.json drafts/new-project.yaml
//! ctg -v keywords
//! ```

pub mod config;
pub mod document;
pub mod index;
pub mod keywords;
pub mod schema;
pub mod template;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ctg_schema::{ProjectValidator, Vocabulary};

use crate::config::CliConfig;

/// Resolve a path that may be relative to the data root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `data_root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, data_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let root_relative = data_root.join(path);
    if root_relative.exists() {
        root_relative
    } else {
        path.to_path_buf()
    }
}

/// Walk up from `start` to the first directory that looks like a data root.
pub fn find_data_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join("PROJECTS.json").is_file() || dir.join("KEYWORDS").is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Load the keyword taxonomy named by `config` and build the project validator.
pub fn load_validator(config: &CliConfig, data_root: &Path) -> Result<ProjectValidator> {
    let keywords_path = config.keywords_path(data_root);
    let vocabulary = Vocabulary::load(&keywords_path)
        .with_context(|| format!("failed to load keyword vocabulary from {}", keywords_path.display()))?;
    ProjectValidator::new(vocabulary).context("failed to build project schema")
}
