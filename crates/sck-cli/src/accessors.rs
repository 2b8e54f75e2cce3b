//! # Accessor Subcommands
//!
//! `sck accessors` runs a behavior plan of getter and setter checks against
//! a program manifest. `sck names` derives accessor names from an
//! attribute label, a helper for exercise authors writing plans.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use sck_introspect::InMemoryProgram;
use sck_verify::accessor::{boxed_type_name, getter_name, random_sample_value, setter_name};
use sck_verify::{BehaviorPlan, BehavioralAssembler, SuiteReport};

use crate::config::SuiteConfig;
use crate::OutputFormat;

/// Arguments for the `sck accessors` subcommand.
#[derive(Args, Debug)]
pub struct AccessorsArgs {
    /// Behavior plan (JSON or YAML).
    #[arg(long, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Program manifest describing the target (JSON or YAML).
    #[arg(long, value_name = "PATH")]
    pub program: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Soft per-unit time budget in milliseconds; 0 disables it.
    #[arg(long, value_name = "MS")]
    pub budget_ms: Option<u64>,
}

/// Arguments for the `sck names` subcommand.
#[derive(Args, Debug)]
pub struct NamesArgs {
    /// Human-readable attribute label, e.g. "phone number".
    #[arg(value_name = "LABEL")]
    pub label: String,

    /// Declared type of the attribute, used for the boxed type and the
    /// sample value.
    #[arg(long = "type", value_name = "TYPE", default_value = "String")]
    pub type_name: String,
}

/// Execute the accessors subcommand.
///
/// Returns exit code: 0 if every unit passed, 1 otherwise.
pub fn run_accessors(args: &AccessorsArgs, config: &SuiteConfig) -> Result<u8> {
    let plan_path = args
        .plan
        .clone()
        .or_else(|| config.plan.clone())
        .context("no behavior plan given (use --plan or the config `plan` key)")?;
    let program_path = args
        .program
        .clone()
        .or_else(|| config.program.clone())
        .context("no program manifest given (use --program or the config `program` key)")?;

    let plan = BehaviorPlan::load_path(&plan_path)
        .with_context(|| format!("failed to load {}", plan_path.display()))?;
    let program = InMemoryProgram::load_path(&program_path)
        .with_context(|| format!("failed to load {}", program_path.display()))?;

    let assembler = BehavioralAssembler::new(Arc::new(program));
    let units = assembler
        .plan_units(&plan)
        .with_context(|| format!("invalid plan {}", plan_path.display()))?;
    tracing::info!(checks = plan.checks.len(), units = units.len(), "starting accessor checks");

    let budget = crate::budget_from_ms(args.budget_ms.or(config.budget_ms));
    let report = SuiteReport::run(&units, budget);
    let format = args.format.or(config.format).unwrap_or_default();
    crate::emit_report(&report, format)
}

/// Execute the names subcommand.
pub fn run_names(args: &NamesArgs) -> Result<u8> {
    let getter = getter_name(&args.label).context("attribute label is empty")?;
    let (setter, attribute) = setter_name(&args.label).context("attribute label is empty")?;

    println!("attribute: {attribute}");
    println!("getter:    {getter}");
    println!("setter:    {setter}");
    println!("boxed:     {}", boxed_type_name(&args.type_name));
    println!("sample:    {}", random_sample_value(&args.type_name));
    Ok(0)
}
