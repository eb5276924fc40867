//! # ctg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ctg_cli::config::CliConfig;
use ctg_cli::keywords::{run_keywords, KeywordsArgs};
use ctg_cli::schema::{run_schema, SchemaArgs};
use ctg_cli::template::{run_template, TemplateArgs};
use ctg_cli::validate::{run_validate, ValidateArgs};

/// Closing-the-Gap project record toolchain.
///
/// Validates project records against the pinned record schema, checks the
/// keyword taxonomy, and documents the record format.
#[derive(Parser, Debug)]
#[command(name = "ctg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (defaults to ctg.yaml at the data root).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data root holding PROJECTS.json and KEYWORDS/ (found by walking up from the CWD).
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate record files, or every record in the project index.
    Validate(ValidateArgs),

    /// Check the keyword taxonomy and report its size.
    Keywords(KeywordsArgs),

    /// Stamp the blank project template and check that it validates.
    Template(TemplateArgs),

    /// Print the record schema outline.
    Schema(SchemaArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let data_root = cli.root.clone().or_else(resolve_data_root).unwrap_or_else(|| {
        tracing::warn!("Could not locate data root; using current directory");
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    });

    tracing::debug!(data_root = %data_root.display(), "resolved data root");

    let result = CliConfig::load(cli.config.as_deref(), &data_root).and_then(|config| match &cli.command {
        Commands::Validate(args) => run_validate(args, &config, &data_root),
        Commands::Keywords(args) => run_keywords(args, &config, &data_root),
        Commands::Template(args) => run_template(args, &config, &data_root),
        Commands::Schema(args) => run_schema(args, &config, &data_root),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn resolve_data_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    ctg_cli::find_data_root(&cwd)
}
