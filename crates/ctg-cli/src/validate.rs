//! # Validate Subcommand
//!
//! Validates project records against the record schema.
//!
//! Records are named explicitly on the command line, or taken from the
//! project index with `--all`. Each record gets one `PASS` or `FAIL`
//! line, followed by its violations. One rejected record never stops the
//! batch.
//!
//! Exit codes: 0 when every record passed, 1 when any record was rejected,
//! 2 when a record could not be read or parsed at all.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use ctg_schema::ProjectValidator;

use crate::config::CliConfig;
use crate::document::load_document;
use crate::index::ProjectIndex;

/// Arguments for the `ctg validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validate every record listed in the project index.
    #[arg(long)]
    pub all: bool,

    /// Record files to validate (.json, .yaml or .yml).
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Outcome of validating one record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record was accepted.
    Passed,
    /// The record was rejected with at least one violation.
    Failed,
    /// The file could not be read or parsed.
    Unreadable,
}

/// Tally of a validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Records accepted.
    pub passed: usize,
    /// Records rejected.
    pub failed: usize,
    /// Records that could not be read or parsed.
    pub unreadable: usize,
}

impl ValidationSummary {
    fn record(&mut self, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Passed => self.passed += 1,
            RecordOutcome::Failed => self.failed += 1,
            RecordOutcome::Unreadable => self.unreadable += 1,
        }
    }

    /// Total records attempted.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.unreadable
    }

    /// Process exit code for this run.
    pub fn exit_code(&self) -> u8 {
        if self.unreadable > 0 {
            2
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig, data_root: &Path) -> Result<u8> {
    if !args.all && args.paths.is_empty() {
        println!("Usage: ctg validate [--all] [PATH...]");
        return Ok(2);
    }

    let validator = crate::load_validator(config, data_root)?;

    let mut targets: Vec<PathBuf> = args
        .paths
        .iter()
        .map(|p| crate::resolve_path(p, data_root))
        .collect();
    if args.all {
        let index = ProjectIndex::load(&config.projects_index_path(data_root))?;
        targets.extend(index.record_paths(data_root).into_iter().map(|(_, path)| path));
    }

    let mut summary = ValidationSummary::default();
    for path in &targets {
        summary.record(validate_file(&validator, path, data_root));
    }

    println!("Records: {}/{} passed", summary.passed, summary.total());
    if summary.failed + summary.unreadable > 0 {
        println!(
            "\n{} record(s) failed validation, {} could not be read.",
            summary.failed, summary.unreadable
        );
    }

    Ok(summary.exit_code())
}

/// Validate one file and print its report.
pub fn validate_file(validator: &ProjectValidator, path: &Path, data_root: &Path) -> RecordOutcome {
    let shown = path.strip_prefix(data_root).unwrap_or(path);

    let document = match load_document(path) {
        Ok(document) => document,
        Err(e) => {
            tracing::warn!(record = %shown.display(), error = %e, "record unreadable");
            println!("ERROR: {}: {e:#}", shown.display());
            return RecordOutcome::Unreadable;
        }
    };

    match validator.validate(&document) {
        Ok(_) => {
            println!("PASS: {}", shown.display());
            RecordOutcome::Passed
        }
        Err(violations) => {
            tracing::info!(record = %shown.display(), violations = violations.len(), "record rejected");
            println!("FAIL: {} ({} violation(s))", shown.display(), violations.len());
            println!("{violations}");
            RecordOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_prefers_operational_errors() {
        let mut summary = ValidationSummary::default();
        assert_eq!(summary.exit_code(), 0);
        summary.record(RecordOutcome::Failed);
        assert_eq!(summary.exit_code(), 1);
        summary.record(RecordOutcome::Unreadable);
        assert_eq!(summary.exit_code(), 2);
        summary.record(RecordOutcome::Passed);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn no_targets_is_a_usage_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = ValidateArgs { all: false, paths: Vec::new() };
        assert_eq!(run_validate(&args, &CliConfig::default(), dir.path()).unwrap(), 2);
    }
}
