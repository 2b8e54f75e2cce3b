//! # sck-cli — Command-Line Harness for the Structure Conformance Kit
//!
//! Provides the `sck` command-line interface: the reference harness that
//! evaluates diagnostic units and reports them.
//!
//! ## Subcommands
//!
//! - `sck check` runs the structural categories of a schema against a
//!   program manifest.
//! - `sck accessors` runs a getter/setter behavior plan.
//! - `sck names` derives accessor names and a sample value from a label.
//! - `sck schema` validates a structure document and summarizes it.
//!
//! ```bash
//! sck check --schema structure.json --program program.yaml
//! sck --config suite.yaml check --category attribute --format json
//! sck accessors --plan accessors.yaml --program program.yaml
//! sck names "phone number" --type int
//! ```
//!
//! Exit codes: 0 when every unit passed or was skipped, 1 on any failure or
//! operational error.

pub mod accessors;
pub mod check;
pub mod config;
pub mod schema;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use sck_verify::SuiteReport;

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One `PASS`/`FAIL`/`SKIP` line per unit.
    #[default]
    Text,
    /// Pretty-printed JSON report.
    Json,
}

/// Resolve a path that may be relative to a base directory.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `base` resolves there; otherwise it is left relative to the current
/// directory.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let based = base.join(path);
    if based.exists() {
        based
    } else {
        path.to_path_buf()
    }
}

/// Budget from a millisecond count; zero disables it.
pub fn budget_from_ms(ms: Option<u64>) -> Option<Duration> {
    ms.filter(|ms| *ms > 0).map(Duration::from_millis)
}

/// Print a report and map it to an exit code.
pub fn emit_report(report: &SuiteReport, format: OutputFormat) -> Result<u8> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!(
            "{}",
            report.to_json().context("failed to serialize report")?
        ),
    }
    Ok(if report.is_success() { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_path_prefers_existing_base_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("schema.json"), "[]").unwrap();

        let resolved = resolve_path(Path::new("schema.json"), dir.path());
        assert_eq!(resolved, dir.path().join("schema.json"));

        let missing = resolve_path(Path::new("absent.json"), dir.path());
        assert_eq!(missing, PathBuf::from("absent.json"));
    }

    #[test]
    fn resolve_path_keeps_absolute() {
        let abs = std::env::temp_dir().join("x.json");
        assert_eq!(resolve_path(&abs, Path::new("/elsewhere")), abs);
    }

    #[test]
    fn budget_zero_disables() {
        assert_eq!(budget_from_ms(Some(0)), None);
        assert_eq!(budget_from_ms(None), None);
        assert_eq!(budget_from_ms(Some(250)), Some(Duration::from_millis(250)));
    }
}
