//! # Schema Subcommand
//!
//! Prints the project record schema as an outline: one row per declared
//! field with its type and description. The outline is built from the
//! same descriptor tree that validates records, so it cannot drift.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use ctg_schema::{audit_strictness, outline, OutlineEntry, SCHEMA_VERSION};

use crate::config::CliConfig;

/// Arguments for the `ctg schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Emit the outline as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the schema subcommand.
pub fn run_schema(args: &SchemaArgs, config: &CliConfig, data_root: &Path) -> Result<u8> {
    let validator = crate::load_validator(config, data_root)?;
    let rows = outline(validator.schema());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("Project record schema {SCHEMA_VERSION}");
        for row in &rows {
            println!("{}", format_row(row));
        }
    }

    let findings = audit_strictness(validator.schema());
    for finding in &findings {
        tracing::warn!(path = %finding.path, "object accepts undeclared keys");
    }

    Ok(if findings.is_empty() { 0 } else { 1 })
}

fn format_row(row: &OutlineEntry) -> String {
    let depth = row.path.matches('.').count();
    let name = row.path.rsplit('.').next().unwrap_or(&row.path);
    let optional = if row.required { "" } else { "?" };
    let mut line = format!("{}{name}{optional}: {}", "  ".repeat(depth + 1), row.type_summary);
    if let Some(description) = &row.description {
        line.push_str(&format!("  # {description}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_indents_by_depth() {
        let row = OutlineEntry {
            path: "project.contacts[].role".to_string(),
            type_summary: "integer 0..=3".to_string(),
            required: true,
            description: Some("Role of the contact".to_string()),
        };
        assert_eq!(format_row(&row), "      role: integer 0..=3  # Role of the contact");
    }

    #[test]
    fn optional_rows_are_marked() {
        let row = OutlineEntry {
            path: "ref".to_string(),
            type_summary: "optional<array<url>>".to_string(),
            required: false,
            description: None,
        };
        assert_eq!(format_row(&row), "  ref?: optional<array<url>>");
    }
}
