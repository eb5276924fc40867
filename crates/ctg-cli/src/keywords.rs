//! # Keywords Subcommand
//!
//! Loads the keyword taxonomy, failing on duplicate keywords or an empty
//! taxonomy, and reports how many keywords each category contributes.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use ctg_schema::Vocabulary;

use crate::config::CliConfig;

/// Arguments for the `ctg keywords` subcommand.
#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// Also list every keyword under its category.
    #[arg(long)]
    pub list: bool,
}

/// Execute the keywords subcommand.
pub fn run_keywords(args: &KeywordsArgs, config: &CliConfig, data_root: &Path) -> Result<u8> {
    let path = config.keywords_path(data_root);
    let vocabulary = Vocabulary::load(&path)
        .with_context(|| format!("keyword taxonomy {} is invalid", path.display()))?;

    println!(
        "Keywords: {} unique in {} categories",
        vocabulary.len(),
        vocabulary.categories().len()
    );
    for (category, keywords) in vocabulary.categories() {
        println!("  {category}: {}", keywords.len());
        if args.list {
            for keyword in keywords {
                println!("    {keyword}");
            }
        }
    }

    Ok(0)
}
