//! # sck CLI entry point
//!
//! Parses command-line arguments, loads the optional suite configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sck_cli::accessors::{run_accessors, run_names, AccessorsArgs, NamesArgs};
use sck_cli::check::{run_check, CheckArgs};
use sck_cli::config::SuiteConfig;
use sck_cli::schema::{run_schema, SchemaArgs};

/// Structure Conformance Kit
///
/// Checks that a program exposes the types, attributes, constructors and
/// methods a structure document describes, and that its accessors behave.
#[derive(Parser, Debug)]
#[command(name = "sck", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a suite configuration file (YAML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the structural checks of a structure document.
    Check(CheckArgs),

    /// Run a getter/setter behavior plan.
    Accessors(AccessorsArgs),

    /// Derive accessor names and a sample value from an attribute label.
    Names(NamesArgs),

    /// Validate a structure document and summarize it.
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

    tracing::debug!("sck CLI starting");

    let config = match cli.config.as_deref() {
        Some(path) => match SuiteConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("{e:#}");
                return ExitCode::from(1);
            }
        },
        None => SuiteConfig::default(),
    };

    let result = match cli.command {
        Commands::Check(args) => run_check(&args, &config),
        Commands::Accessors(args) => run_accessors(&args, &config),
        Commands::Names(args) => run_names(&args),
        Commands::Schema(args) => run_schema(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sck_cli::OutputFormat;
    use sck_verify::Category;

    #[test]
    fn cli_parse_check_with_paths() {
        let cli = Cli::try_parse_from([
            "sck",
            "check",
            "--schema",
            "structure.json",
            "--program",
            "program.yaml",
        ])
        .unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.schema, Some(PathBuf::from("structure.json")));
            assert_eq!(args.program, Some(PathBuf::from("program.yaml")));
            assert!(args.categories.is_empty());
            assert!(args.format.is_none());
            assert!(args.budget_ms.is_none());
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_check_repeated_categories() {
        let cli = Cli::try_parse_from([
            "sck",
            "check",
            "--category",
            "method",
            "--category",
            "field",
            "--format",
            "json",
            "--budget-ms",
            "250",
        ])
        .unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.categories, vec![Category::Method, Category::Attribute]);
            assert_eq!(args.format, Some(OutputFormat::Json));
            assert_eq!(args.budget_ms, Some(250));
        } else {
            panic!("expected check");
        }
    }

    #[test]
    fn cli_parse_check_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["sck", "check", "--category", "getter_ish"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sck", "schema", "s.json", "-vv", "--config", "suite.yaml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("suite.yaml")));
        if let Commands::Schema(args) = cli.command {
            assert_eq!(args.path, Some(PathBuf::from("s.json")));
        } else {
            panic!("expected schema");
        }
    }

    #[test]
    fn cli_parse_accessors() {
        let cli = Cli::try_parse_from(["sck", "accessors", "--plan", "plan.yaml"]).unwrap();
        if let Commands::Accessors(args) = cli.command {
            assert_eq!(args.plan, Some(PathBuf::from("plan.yaml")));
            assert!(args.program.is_none());
        } else {
            panic!("expected accessors");
        }
    }

    #[test]
    fn cli_parse_names_default_type() {
        let cli = Cli::try_parse_from(["sck", "names", "phone number"]).unwrap();
        if let Commands::Names(args) = cli.command {
            assert_eq!(args.label, "phone number");
            assert_eq!(args.type_name, "String");
        } else {
            panic!("expected names");
        }
    }

    #[test]
    fn cli_parse_names_requires_label() {
        assert!(Cli::try_parse_from(["sck", "names"]).is_err());
    }

    #[test]
    fn cli_parse_requires_subcommand() {
        assert!(Cli::try_parse_from(["sck"]).is_err());
    }
}
