//! # Structure Document Loader
//!
//! Reads an expected-structure document (JSON or YAML), validates its shape
//! against the embedded `structure.schema.json` (Draft 2020-12), and parses
//! it into a [`StructureSchema`] in one flat pass: one entry per expected
//! class, with nested constructor/attribute/method arrays parsed
//! independently under the same defaulting rule.
//!
//! ## Failure Policy
//!
//! Loading is all-or-nothing. A missing document is `SchemaNotFound`; an
//! entry without the mandatory `class` identity (or any field of the wrong
//! type) is `SchemaMalformed`, reported with every violation and its JSON
//! pointer. No partial schema is ever returned.

use std::fmt;
use std::path::Path;

use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use sck_core::QualifiedName;

use crate::model::{
    ExpectedClass, ExpectedConstructor, ExpectedField, ExpectedMethod, StructureSchema,
};

/// The embedded JSON Schema every structure document must satisfy.
const STRUCTURE_SCHEMA: &str = include_str!("../schemas/structure.schema.json");

/// Error raised while loading a structure document. All variants are fatal.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document does not exist.
    #[error("could not find the structure document at '{path}', make sure that it exists")]
    SchemaNotFound {
        /// Path that was looked up.
        path: String,
    },

    /// The document exists but does not describe a usable structure.
    #[error("structure document '{source_name}' is malformed:\n{violations}")]
    SchemaMalformed {
        /// File name or label of the offending document.
        source_name: String,
        /// Every violation found.
        violations: Violations,
    },

    /// The document could not be read.
    #[error("io error reading '{path}': {source}")]
    Io {
        /// Path being read.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The embedded structure schema failed to compile.
    #[error("structure schema could not be compiled: {0}")]
    ValidatorBuild(String),
}

/// A single structural violation in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value; empty for the document root.
    pub instance_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of violations found in one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    fn single(instance_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            violations: vec![Violation {
                instance_path: instance_path.into(),
                message: message.into(),
            }],
        }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Serialization format of a structure document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// JSON (the default).
    Json,
    /// YAML, for `.yaml` / `.yml` files.
    Yaml,
}

impl DocumentFormat {
    /// Infer the format from a file extension; anything unknown is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

// ─── Document Layout ─────────────────────────────────────────────────

#[derive(Deserialize)]
struct ClassEntry {
    class: ClassHeader,
    #[serde(default, rename = "enumValues")]
    enum_values: Vec<String>,
    #[serde(default)]
    constructors: Vec<ExpectedConstructor>,
    #[serde(default)]
    attributes: Vec<ExpectedField>,
    #[serde(default)]
    methods: Vec<ExpectedMethod>,
}

#[derive(Deserialize)]
struct ClassHeader {
    name: String,
    package: String,
    #[serde(default)]
    superclass: Option<String>,
    #[serde(default, rename = "isInterface")]
    is_interface: bool,
    #[serde(default, rename = "isEnum")]
    is_enum: bool,
    #[serde(default, rename = "isAbstract")]
    is_abstract: bool,
}

impl From<ClassEntry> for ExpectedClass {
    fn from(entry: ClassEntry) -> Self {
        let header = entry.class;
        Self {
            name: QualifiedName::new(header.package, header.name),
            superclass: header.superclass,
            is_interface: header.is_interface,
            is_enum: header.is_enum,
            is_abstract: header.is_abstract,
            enum_values: entry.enum_values,
            constructors: entry.constructors,
            fields: entry.attributes,
            methods: entry.methods,
        }
    }
}

// ─── Loader ──────────────────────────────────────────────────────────

/// Loads structure documents into [`StructureSchema`] values.
///
/// The embedded shape schema is compiled once at construction; a loader can
/// be reused for any number of documents.
pub struct SchemaLoader {
    validator: Validator,
}

impl fmt::Debug for SchemaLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaLoader").finish_non_exhaustive()
    }
}

impl SchemaLoader {
    /// Compile the embedded structure schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::ValidatorBuild` if the embedded schema is not a
    /// valid Draft 2020-12 schema.
    pub fn new() -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(STRUCTURE_SCHEMA)
            .map_err(|e| SchemaError::ValidatorBuild(format!("invalid JSON: {e}")))?;
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);
        let validator = opts
            .build(&schema)
            .map_err(|e| SchemaError::ValidatorBuild(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Load a structure document from a file.
    ///
    /// The format is chosen from the file extension (see
    /// [`DocumentFormat::from_path`]).
    ///
    /// # Errors
    ///
    /// `SchemaNotFound` if the file does not exist, `Io` if it cannot be
    /// read, `SchemaMalformed` if its content is not a valid structure.
    pub fn load_path(&self, path: &Path) -> Result<StructureSchema, SchemaError> {
        if !path.is_file() {
            return Err(SchemaError::SchemaNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let source_name = path.display().to_string();
        self.load_str(&content, DocumentFormat::from_path(path), &source_name)
    }

    /// Load a structure document from its text.
    ///
    /// # Errors
    ///
    /// `SchemaMalformed` if the text does not parse or is not a valid
    /// structure.
    pub fn load_str(
        &self,
        content: &str,
        format: DocumentFormat,
        source_name: &str,
    ) -> Result<StructureSchema, SchemaError> {
        let value: Value = match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| {
                malformed(source_name, Violations::single("", format!("invalid JSON: {e}")))
            })?,
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                malformed(source_name, Violations::single("", format!("invalid YAML: {e}")))
            })?,
        };
        self.load_value(&value, source_name)
    }

    /// Load a structure document that is already parsed.
    ///
    /// # Errors
    ///
    /// `SchemaMalformed` with every shape violation if the value does not
    /// satisfy the structure schema.
    pub fn load_value(
        &self,
        document: &Value,
        source_name: &str,
    ) -> Result<StructureSchema, SchemaError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(document)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect();
        if !violations.is_empty() {
            tracing::warn!(
                source = source_name,
                violations = violations.len(),
                "structure document rejected"
            );
            return Err(malformed(source_name, Violations { violations }));
        }

        let entries: Vec<ClassEntry> = serde_json::from_value(document.clone())
            .map_err(|e| malformed(source_name, Violations::single("", e.to_string())))?;
        let classes: Vec<ExpectedClass> = entries.into_iter().map(ExpectedClass::from).collect();
        let schema = StructureSchema::new(classes);

        tracing::info!(
            source = source_name,
            classes = schema.len(),
            members = schema.member_count(),
            "loaded structure document"
        );
        Ok(schema)
    }
}

fn malformed(source_name: &str, violations: Violations) -> SchemaError {
    SchemaError::SchemaMalformed {
        source_name: source_name.to_string(),
        violations,
    }
}
