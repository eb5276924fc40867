//! # CLI Configuration
//!
//! Optional YAML file naming where the data files live, relative to the
//! data root:
//!
//! ```yaml
//! keywords: KEYWORDS/KEYWORDS.json
//! projects_index: PROJECTS.json
//! template: TEMPLATES/project.json
//! ```
//!
//! Every key is optional. The file is read from `--config` when given,
//! otherwise from `ctg.yaml` at the data root if present.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the configuration file looked up at the data root.
pub const CONFIG_FILE_NAME: &str = "ctg.yaml";

/// Data file locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Keyword taxonomy (category → keywords).
    pub keywords: PathBuf,
    /// Project index (id → record location).
    pub projects_index: PathBuf,
    /// Blank project record.
    pub template: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            keywords: PathBuf::from("KEYWORDS/KEYWORDS.json"),
            projects_index: PathBuf::from("PROJECTS.json"),
            template: PathBuf::from("TEMPLATES/project.json"),
        }
    }
}

impl CliConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `ctg.yaml` at the data root
    /// is used if present and defaults apply otherwise.
    pub fn load(explicit: Option<&Path>, data_root: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => crate::resolve_path(path, data_root),
            None => {
                let candidate = data_root.join(CONFIG_FILE_NAME);
                if !candidate.is_file() {
                    tracing::debug!("no {CONFIG_FILE_NAME} at data root; using defaults");
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Keyword taxonomy path.
    pub fn keywords_path(&self, data_root: &Path) -> PathBuf {
        data_root.join(&self.keywords)
    }

    /// Project index path.
    pub fn projects_index_path(&self, data_root: &Path) -> PathBuf {
        data_root.join(&self.projects_index)
    }

    /// Template path.
    pub fn template_path(&self, data_root: &Path) -> PathBuf {
        data_root.join(&self.template)
    }
}
