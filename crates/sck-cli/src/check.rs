//! # Check Subcommand
//!
//! Runs the structural categories of a structure document against a
//! program manifest and prints the report.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use sck_introspect::InMemoryProgram;
use sck_schema::SchemaLoader;
use sck_verify::{Category, StructuralVerifier, SuiteReport};

use crate::config::SuiteConfig;
use crate::OutputFormat;

/// Arguments for the `sck check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Structure document (JSON or YAML).
    #[arg(long, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Program manifest describing the target (JSON or YAML).
    #[arg(long, value_name = "PATH")]
    pub program: Option<PathBuf>,

    /// Restrict to these categories (repeatable): class, attribute,
    /// constructor, method.
    #[arg(long = "category", value_name = "NAME")]
    pub categories: Vec<Category>,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Soft per-unit time budget in milliseconds; 0 disables it.
    #[arg(long, value_name = "MS")]
    pub budget_ms: Option<u64>,
}

/// Execute the check subcommand.
///
/// Returns exit code: 0 if every unit passed or was skipped, 1 otherwise.
pub fn run_check(args: &CheckArgs, config: &SuiteConfig) -> Result<u8> {
    let schema_path = args
        .schema
        .clone()
        .or_else(|| config.schema.clone())
        .context("no structure document given (use --schema or the config `schema` key)")?;
    let program_path = args
        .program
        .clone()
        .or_else(|| config.program.clone())
        .context("no program manifest given (use --program or the config `program` key)")?;

    let loader = SchemaLoader::new().context("failed to compile the structure schema")?;
    let schema = loader
        .load_path(&schema_path)
        .with_context(|| format!("failed to load {}", schema_path.display()))?;
    let program = InMemoryProgram::load_path(&program_path)
        .with_context(|| format!("failed to load {}", program_path.display()))?;

    tracing::info!(
        classes = schema.len(),
        members = schema.member_count(),
        types = program.len(),
        "starting structural check"
    );

    let categories = selected_categories(args, config);
    let verifier = StructuralVerifier::new(Arc::new(schema), Arc::new(program));
    let units = verifier.filtered_units(&categories);

    let budget = crate::budget_from_ms(args.budget_ms.or(config.budget_ms));
    let report = SuiteReport::run(&units, budget);
    let format = args.format.or(config.format).unwrap_or_default();
    crate::emit_report(&report, format)
}

/// Categories from the flags, else the config, else all four.
fn selected_categories(args: &CheckArgs, config: &SuiteConfig) -> Vec<Category> {
    if !args.categories.is_empty() {
        return args.categories.clone();
    }
    config
        .categories
        .clone()
        .unwrap_or_else(|| Category::STRUCTURAL.to_vec())
}
