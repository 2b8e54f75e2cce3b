//! # Schema Subcommand
//!
//! Validates a structure document against the embedded shape schema and
//! prints a per-class summary, or every violation if it is malformed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sck_schema::{SchemaError, SchemaLoader, StructureSchema};

use crate::config::SuiteConfig;

/// Arguments for the `sck schema` subcommand.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Structure document (JSON or YAML); defaults to the config `schema`.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Execute the schema subcommand.
///
/// Returns exit code: 0 if the document is well formed, 1 if malformed.
pub fn run_schema(args: &SchemaArgs, config: &SuiteConfig) -> Result<u8> {
    let path = args
        .path
        .clone()
        .or_else(|| config.schema.clone())
        .context("no structure document given (pass PATH or the config `schema` key)")?;
    let loader = SchemaLoader::new().context("failed to compile the structure schema")?;

    match loader.load_path(&path) {
        Ok(schema) => {
            print!("{}", summarize(&schema));
            Ok(0)
        }
        Err(SchemaError::SchemaMalformed {
            source_name,
            violations,
        }) => {
            println!("FAIL: {source_name}");
            print!("{violations}");
            println!("\n{} violation(s).", violations.len());
            Ok(1)
        }
        Err(e) => Err(e).with_context(|| format!("failed to load {}", path.display())),
    }
}

/// One line per class plus a totals line.
fn summarize(schema: &StructureSchema) -> String {
    let mut out = String::new();
    for class in schema {
        out.push_str(&format!(
            "{:<40} {:<15} attributes={} constructors={} methods={}\n",
            class.name.to_string(),
            class.kind().describe(),
            class.fields.len(),
            class.constructors.len(),
            class.methods.len()
        ));
    }
    out.push_str(&format!(
        "\n{} class(es), {} member expectation(s).\n",
        schema.len(),
        schema.member_count()
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn malformed_document_exits_one() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"[{{ "methods": [] }}]"#).unwrap();
        let args = SchemaArgs {
            path: Some(file.path().to_path_buf()),
        };
        assert_eq!(run_schema(&args, &SuiteConfig::default()).unwrap(), 1);
    }

    #[test]
    fn missing_document_is_an_error() {
        let args = SchemaArgs {
            path: Some(PathBuf::from("/nonexistent/structure.json")),
        };
        assert!(run_schema(&args, &SuiteConfig::default()).is_err());
    }

    #[test]
    fn summary_lists_classes() {
        let loader = SchemaLoader::new().unwrap();
        let schema = loader
            .load_str(
                r#"[{ "class": { "name": "Entry", "package": "p", "isInterface": true },
                      "methods": [{ "name": "label" }] }]"#,
                sck_schema::DocumentFormat::Json,
                "inline",
            )
            .unwrap();
        let text = summarize(&schema);
        assert!(text.contains("p.Entry"));
        assert!(text.contains("interface"));
        assert!(text.contains("methods=1"));
        assert!(text.ends_with("1 class(es), 1 member expectation(s).\n"));
    }
}
