//! Integration tests: the subcommand handlers against the phonebook
//! fixtures shared with the other crates.

use std::path::{Path, PathBuf};

use sck_cli::accessors::{run_accessors, AccessorsArgs};
use sck_cli::check::{run_check, CheckArgs};
use sck_cli::config::SuiteConfig;
use sck_cli::schema::{run_schema, SchemaArgs};
use sck_cli::OutputFormat;
use sck_verify::Category;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn suite() -> SuiteConfig {
    SuiteConfig::load(&fixture("suite.yaml")).unwrap()
}

fn check_args() -> CheckArgs {
    CheckArgs {
        schema: None,
        program: None,
        categories: vec![],
        format: None,
        budget_ms: None,
    }
}

#[test]
fn suite_config_paths_exist() {
    let config = suite();
    assert!(config.schema.as_ref().unwrap().exists());
    assert!(config.program.as_ref().unwrap().exists());
    assert!(config.plan.as_ref().unwrap().exists());
    assert_eq!(config.format, Some(OutputFormat::Text));
}

#[test]
fn check_phonebook_passes() {
    assert_eq!(run_check(&check_args(), &suite()).unwrap(), 0);
}

#[test]
fn check_single_category_as_json() {
    let mut args = check_args();
    args.categories = vec![Category::Method];
    args.format = Some(OutputFormat::Json);
    assert_eq!(run_check(&args, &suite()).unwrap(), 0);
}

#[test]
fn check_against_empty_program_fails() {
    let dir = tempfile::tempdir().unwrap();
    let empty = dir.path().join("empty.yaml");
    std::fs::write(&empty, "types: []\n").unwrap();

    let mut args = check_args();
    args.program = Some(empty);
    assert_eq!(run_check(&args, &suite()).unwrap(), 1);
}

#[test]
fn accessors_phonebook_plan_passes() {
    let args = AccessorsArgs {
        plan: None,
        program: None,
        format: None,
        budget_ms: None,
    };
    assert_eq!(run_accessors(&args, &suite()).unwrap(), 0);
}

#[test]
fn accessors_inconsistent_plan_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let plan = dir.path().join("plan.yaml");
    std::fs::write(
        &plan,
        "checks:\n  - type: de.book.Contact\n    setters: { setName: Bob }\n    expectedPostValues: []\n",
    )
    .unwrap();
    let args = AccessorsArgs {
        plan: Some(plan),
        program: None,
        format: None,
        budget_ms: None,
    };
    assert!(run_accessors(&args, &suite()).is_err());
}

#[test]
fn schema_phonebook_is_well_formed() {
    let args = SchemaArgs { path: None };
    assert_eq!(run_schema(&args, &suite()).unwrap(), 0);
}
