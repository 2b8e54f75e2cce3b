//! # Suite Configuration
//!
//! Optional YAML file passed with the global `--config` flag. Every key is
//! optional; command-line flags take precedence over it. Relative paths are
//! resolved against the directory containing the config file.
//!
//! ```yaml
//! schema: structure.json
//! program: program.yaml
//! plan: accessors.yaml
//! format: text
//! budget_ms: 5000
//! categories: [class, attribute, constructor, method]
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use sck_verify::Category;

use crate::OutputFormat;

/// Contents of a suite configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Structure document.
    #[serde(default)]
    pub schema: Option<PathBuf>,
    /// Program manifest.
    #[serde(default)]
    pub program: Option<PathBuf>,
    /// Behavior plan.
    #[serde(default)]
    pub plan: Option<PathBuf>,
    /// Report format.
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Soft per-unit time budget in milliseconds.
    #[serde(default)]
    pub budget_ms: Option<u64>,
    /// Structural categories to run.
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

impl SuiteConfig {
    /// Read a config file and resolve its paths.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: SuiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for slot in [&mut config.schema, &mut config.program, &mut config.plan] {
            if let Some(p) = slot.as_mut() {
                let resolved = crate::resolve_path(p.as_path(), base);
                *p = resolved;
            }
        }
        tracing::debug!(config = %path.display(), "loaded suite configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_resolves_paths_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("structure.json"), "[]").unwrap();
        let cfg_path = dir.path().join("suite.yaml");
        std::fs::write(
            &cfg_path,
            "schema: structure.json\nformat: json\nbudget_ms: 100\ncategories: [class, method]\n",
        )
        .unwrap();

        let config = SuiteConfig::load(&cfg_path).unwrap();
        assert_eq!(config.schema, Some(dir.path().join("structure.json")));
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert_eq!(config.budget_ms, Some(100));
        assert_eq!(
            config.categories,
            Some(vec![Category::Class, Category::Method])
        );
        assert!(config.program.is_none());
    }

    #[test]
    fn config_rejects_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_path = dir.path().join("suite.yaml");
        std::fs::write(&cfg_path, "shcema: typo.json\n").unwrap();
        assert!(SuiteConfig::load(&cfg_path).is_err());
    }
}
