//! # Template Subcommand
//!
//! New project records start as a copy of the blank template. The template
//! deliberately leaves three fields unset, so this command stamps them the
//! way a new record would be stamped and checks that the result validates:
//!
//! - `record_metadata.uuid`: a fresh v4 identifier
//! - `record_metadata.record_created_on`: today's date
//! - `project.type`: `"project"`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use ctg_core::{CalendarDate, RecordId};
use serde_json::Value;

use crate::config::CliConfig;
use crate::document::load_document;

/// Arguments for the `ctg template` subcommand.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template file (defaults to the configured template).
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Print the stamped record as JSON.
    #[arg(long)]
    pub print: bool,
}

/// Execute the template subcommand.
pub fn run_template(args: &TemplateArgs, config: &CliConfig, data_root: &Path) -> Result<u8> {
    let path = match &args.path {
        Some(path) => crate::resolve_path(path, data_root),
        None => config.template_path(data_root),
    };
    let validator = crate::load_validator(config, data_root)?;

    let mut record = load_document(&path)?;
    stamp(&mut record, RecordId::new(), CalendarDate::today())
        .with_context(|| format!("template {} has an unexpected shape", path.display()))?;

    if args.print {
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    match validator.validate(&record) {
        Ok(_) => {
            println!("PASS: {} (stamped)", path.display());
            Ok(0)
        }
        Err(violations) => {
            println!("FAIL: {} (stamped, {} violation(s))", path.display(), violations.len());
            println!("{violations}");
            Ok(1)
        }
    }
}

/// Fill the fields the blank template leaves unset.
pub fn stamp(record: &mut Value, uuid: RecordId, created_on: CalendarDate) -> Result<()> {
    let Some(metadata) = record.get_mut("record_metadata").and_then(Value::as_object_mut) else {
        bail!("missing object \"record_metadata\"");
    };
    metadata.insert("uuid".to_string(), Value::String(uuid.to_string()));
    metadata.insert("record_created_on".to_string(), Value::String(created_on.to_iso8601()));

    let Some(project) = record.get_mut("project").and_then(Value::as_object_mut) else {
        bail!("missing object \"project\"");
    };
    project.insert("type".to_string(), Value::String("project".to_string()));
    Ok(())
}
