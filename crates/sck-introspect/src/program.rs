//! # In-Memory Reference Program
//!
//! A [`HostRuntime`] backed by type descriptors loaded from a program
//! manifest. Method bodies are the declarative [`MethodBehavior`]s, and
//! constructors assign their arguments to named fields. This is enough to
//! exercise every structural and accessor check end-to-end without a
//! foreign runtime.
//!
//! ## Manifest Format
//!
//! ```yaml
//! types:
//!   - name: de.book.Contact
//!     kind: class
//!     fields:
//!       - { name: name, type: java.lang.String, modifiers: [private] }
//!     constructors:
//!       - { modifiers: [public], parameters: [java.lang.String], assigns: [name] }
//!     methods:
//!       - name: getName
//!         returnType: java.lang.String
//!         modifiers: [public]
//!         behavior: { kind: get, field: name }
//! ```
//!
//! Classes that declare no constructor receive the implicit public
//! no-argument constructor on load.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use sck_core::{simple_type_name, QualifiedName, TypeKind};

use crate::behavior::{accumulate, MethodBehavior};
use crate::descriptor::{ConstructorDescriptor, MethodDescriptor, TypeDescriptor};
use crate::runtime::{FieldValue, HostRuntime, Instance, RuntimeError};

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors loading a program manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file does not exist.
    #[error("program manifest not found: {}", path.display())]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The manifest file could not be read.
    #[error("failed to read program manifest {}: {source}", path.display())]
    Io {
        /// The manifest path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid JSON/YAML or does not fit the layout.
    #[error("malformed program manifest {source_name}: {message}")]
    Parse {
        /// Manifest path or label.
        source_name: String,
        /// Parser message.
        message: String,
    },

    /// Two type descriptors share a qualified name.
    #[error("type {name} declared more than once")]
    DuplicateType {
        /// The repeated name.
        name: String,
    },
}

/// Manifest document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
}

impl ManifestFormat {
    /// Pick the format from a file extension; anything but `.yaml`/`.yml`
    /// is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    types: Vec<TypeDescriptor>,
}

// ─── Program ─────────────────────────────────────────────────────────

/// A target program held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgram {
    types: BTreeMap<QualifiedName, Arc<TypeDescriptor>>,
}

impl InMemoryProgram {
    /// Build a program from descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateType`] if two descriptors share a
    /// qualified name.
    pub fn from_types<I>(types: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut map = BTreeMap::new();
        for ty in types {
            let ty = ty.with_implicit_constructor();
            let name = ty.name.clone();
            if map.insert(name.clone(), Arc::new(ty)).is_some() {
                return Err(ManifestError::DuplicateType {
                    name: name.to_string(),
                });
            }
        }
        Ok(Self { types: map })
    }

    /// Load a manifest file, choosing the format by extension.
    pub fn load_path(path: &Path) -> Result<Self, ManifestError> {
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load_str(
            &content,
            ManifestFormat::from_path(path),
            &path.display().to_string(),
        )
    }

    /// Load a manifest from an in-memory document.
    pub fn load_str(
        content: &str,
        format: ManifestFormat,
        source_name: &str,
    ) -> Result<Self, ManifestError> {
        let parsed: Result<Manifest, String> = match format {
            ManifestFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ManifestFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        let manifest = parsed.map_err(|message| ManifestError::Parse {
            source_name: source_name.to_string(),
            message,
        })?;
        let program = Self::from_types(manifest.types)?;
        tracing::info!(
            source = source_name,
            types = program.len(),
            "Loaded program manifest"
        );
        Ok(program)
    }

    /// Number of types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the program declares no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All types, ordered by qualified name.
    pub fn types(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }

    /// Resolve a superclass reference. A qualified reference is looked up
    /// directly; a bare name is tried in the subtype's package first, then
    /// matched by simple name.
    fn resolve_superclass(&self, ty: &TypeDescriptor) -> Option<&Arc<TypeDescriptor>> {
        let reference = ty.superclass.as_deref()?;
        if let Ok(name) = QualifiedName::parse(reference) {
            if let Some(found) = self.types.get(&name) {
                return Some(found);
            }
            if name.package().is_empty() {
                let local = QualifiedName::new(ty.name.package(), name.simple_name());
                if let Some(found) = self.types.get(&local) {
                    return Some(found);
                }
            }
        }
        let simple = simple_type_name(reference);
        self.types.values().find(|t| t.name.simple_name() == simple)
    }

    /// The type followed by its resolvable superclasses, nearest first.
    fn hierarchy<'a>(&'a self, ty: &'a TypeDescriptor) -> Vec<&'a TypeDescriptor> {
        let mut chain = vec![ty];
        let mut seen = BTreeSet::from([&ty.name]);
        let mut current = ty;
        while let Some(parent) = self.resolve_superclass(current).map(Arc::as_ref) {
            if !seen.insert(&parent.name) {
                tracing::warn!(type_name = %ty.name, "Superclass cycle detected");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    fn select_constructor<'a>(
        ty: &'a TypeDescriptor,
        signature: Option<&[String]>,
    ) -> Option<&'a ConstructorDescriptor> {
        let wanted: Vec<&str> = signature
            .unwrap_or_default()
            .iter()
            .map(|s| simple_type_name(s))
            .collect();
        ty.constructors.iter().find(|c| {
            c.parameters.len() == wanted.len()
                && c.parameters
                    .iter()
                    .zip(&wanted)
                    .all(|(p, w)| p.simple_name() == *w)
        })
    }

    fn find_method<'a>(
        &'a self,
        ty: &'a TypeDescriptor,
        name: &str,
        arity: usize,
    ) -> Option<&'a MethodDescriptor> {
        self.hierarchy(ty).into_iter().find_map(|t| {
            t.methods
                .iter()
                .find(|m| m.name == name && m.parameters.len() == arity)
        })
    }

    fn is_sealed_field(&self, owner: &QualifiedName, field: &str) -> bool {
        self.types
            .get(owner)
            .and_then(|t| t.field(field))
            .is_some_and(|f| f.sealed)
    }
}

fn kind_phrase(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::AbstractClass => "an abstract class",
        TypeKind::Interface => "an interface",
        TypeKind::Enum => "an enum",
        TypeKind::Class => "a class",
    }
}

fn apply_behavior(
    instance: &Instance,
    member: &str,
    behavior: &MethodBehavior,
    args: &[Value],
) -> Result<Value, RuntimeError> {
    let raised = |message: String| RuntimeError::Invocation {
        member: member.to_string(),
        message,
    };
    let missing_field = |field: &str| raised(format!("no field {field}"));

    if args.len() < behavior.arity() {
        return Err(RuntimeError::ArgumentMismatch {
            member: member.to_string(),
            expected: behavior.arity(),
            actual: args.len(),
        });
    }

    match behavior {
        MethodBehavior::Get { field } => instance.read(field).ok_or_else(|| missing_field(field)),
        MethodBehavior::Set { field } => {
            let value = args[0].clone();
            instance
                .update(field, |_| Ok(value))
                .ok_or_else(|| missing_field(field))?
                .map_err(raised)?;
            Ok(Value::Null)
        }
        MethodBehavior::Add { field } => {
            instance
                .update(field, |current| accumulate(current, &args[0]))
                .ok_or_else(|| missing_field(field))?
                .map_err(raised)?;
            Ok(Value::Null)
        }
        MethodBehavior::Return { value } => Ok(value.clone()),
        MethodBehavior::Raise { message } => Err(raised(message.clone())),
    }
}

impl HostRuntime for InMemoryProgram {
    fn locate(&self, name: &QualifiedName) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }

    fn construct(
        &self,
        ty: &TypeDescriptor,
        signature: Option<&[String]>,
        args: &[Value],
    ) -> Result<Instance, RuntimeError> {
        if ty.kind != TypeKind::Class {
            return Err(RuntimeError::NotInstantiable {
                name: ty.name.to_string(),
                kind: kind_phrase(ty.kind).to_string(),
            });
        }
        let ctor = Self::select_constructor(ty, signature).ok_or_else(|| {
            RuntimeError::NoSuchConstructor {
                type_name: ty.name.to_string(),
                signature: signature.unwrap_or_default().join(", "),
            }
        })?;
        let member = format!("{}.<init>", ty.name);
        if args.len() != ctor.parameters.len() {
            return Err(RuntimeError::ArgumentMismatch {
                member,
                expected: ctor.parameters.len(),
                actual: args.len(),
            });
        }
        if let Some(message) = &ctor.raises {
            return Err(RuntimeError::Invocation {
                member,
                message: message.clone(),
            });
        }

        let slots = self
            .hierarchy(ty)
            .into_iter()
            .flat_map(|t| {
                t.fields.iter().map(move |f| FieldValue {
                    owner: t.name.clone(),
                    name: f.name.clone(),
                    value: f.initial.clone(),
                })
            })
            .collect();
        let instance = Instance::new(ty.name.clone(), slots);

        for (field, arg) in ctor.assigns.iter().zip(args) {
            let value = arg.clone();
            if instance.update(field, |_| Ok(value)).is_none() {
                return Err(RuntimeError::Invocation {
                    member,
                    message: format!("no field {field}"),
                });
            }
        }
        tracing::debug!(type_name = %ty.name, args = args.len(), "Constructed instance");
        Ok(instance)
    }

    fn invoke(
        &self,
        instance: &Instance,
        method: &str,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let ty = self
            .types
            .get(instance.type_name())
            .ok_or_else(|| RuntimeError::TypeNotFound {
                name: instance.type_name().to_string(),
            })?;
        let descriptor = self.find_method(ty, method, args.len()).ok_or_else(|| {
            RuntimeError::NoSuchMethod {
                type_name: ty.name.to_string(),
                method: method.to_string(),
                arity: args.len(),
            }
        })?;
        match &descriptor.behavior {
            None => Ok(Value::Null),
            Some(behavior) => {
                let member = format!("{}.{}", ty.name, method);
                apply_behavior(instance, &member, behavior, args)
            }
        }
    }

    fn field_values(&self, instance: &Instance) -> Result<Vec<FieldValue>, RuntimeError> {
        Ok(instance
            .snapshot()
            .into_iter()
            .map(|mut slot| {
                if self.is_sealed_field(&slot.owner, &slot.name) {
                    tracing::warn!(owner = %slot.owner, field = %slot.name, "Field value sealed");
                    slot.value = Value::Null;
                }
                slot
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const MANIFEST: &str = r#"
types:
  - name: bank.Account
    kind: abstract_class
    fields:
      - { name: balance, type: double, initial: 0 }
    methods:
      - name: deposit
        parameters: [double]
        behavior: { kind: add, field: balance }
      - name: getBalance
        returnType: double
        behavior: { kind: get, field: balance }
  - name: bank.Savings
    superclass: Account
    fields:
      - { name: owner, type: java.lang.String }
      - { name: pin, type: int, initial: 1234, sealed: true }
    constructors:
      - { modifiers: [public], parameters: [java.lang.String], assigns: [owner] }
    methods:
      - name: getOwner
        returnType: java.lang.String
        behavior: { kind: get, field: owner }
      - name: close
        behavior: { kind: raise, message: account frozen }
"#;

    fn program() -> InMemoryProgram {
        InMemoryProgram::load_str(MANIFEST, ManifestFormat::Yaml, "inline").unwrap()
    }

    fn savings(program: &InMemoryProgram) -> Instance {
        let ty = program.locate(&QualifiedName::new("bank", "Savings")).unwrap();
        program
            .construct(&ty, Some(["String".to_string()].as_slice()), &[json!("Ada")])
            .unwrap()
    }

    #[test]
    fn test_load_and_locate() {
        let p = program();
        assert_eq!(p.len(), 2);
        assert!(p.locate(&QualifiedName::new("bank", "Account")).is_some());
        assert!(p.locate(&QualifiedName::new("bank", "Checking")).is_none());
    }

    #[test]
    fn test_inherited_methods_and_fields() {
        let p = program();
        let inst = savings(&p);
        assert_eq!(p.invoke(&inst, "getOwner", &[]).unwrap(), json!("Ada"));
        p.invoke(&inst, "deposit", &[json!(25)]).unwrap();
        p.invoke(&inst, "deposit", &[json!(17)]).unwrap();
        assert_eq!(p.invoke(&inst, "getBalance", &[]).unwrap(), json!(42));

        let values = p.field_values(&inst).unwrap();
        let owners: Vec<String> = values.iter().map(|v| v.owner.to_string()).collect();
        assert_eq!(owners, vec!["bank.Savings", "bank.Savings", "bank.Account"]);
    }

    #[test]
    fn test_sealed_field_reads_null() {
        let p = program();
        let inst = savings(&p);
        let pin = p
            .field_values(&inst)
            .unwrap()
            .into_iter()
            .find(|v| v.name == "pin")
            .unwrap();
        assert_eq!(pin.value, Value::Null);
    }

    #[test]
    fn test_abstract_type_not_instantiable() {
        let p = program();
        let ty = p.locate(&QualifiedName::new("bank", "Account")).unwrap();
        let err = p.construct(&ty, None, &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::NotInstantiable { .. }));
    }

    #[test]
    fn test_no_arg_constructor_missing() {
        let p = program();
        let ty = p.locate(&QualifiedName::new("bank", "Savings")).unwrap();
        let err = p.construct(&ty, None, &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::NoSuchConstructor { .. }));
    }

    #[test]
    fn test_raise_and_missing_method() {
        let p = program();
        let inst = savings(&p);
        let err = p.invoke(&inst, "close", &[]).unwrap_err();
        assert_eq!(err.to_string(), "bank.Savings.close raised: account frozen");
        assert!(matches!(
            p.invoke(&inst, "getOwner", &[json!(1)]),
            Err(RuntimeError::NoSuchMethod { arity: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_types_rejected() {
        let ty = TypeDescriptor::new(QualifiedName::new("a", "B"), TypeKind::Class);
        let err = InMemoryProgram::from_types([ty.clone(), ty]).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateType { .. }));
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = InMemoryProgram::load_str("{\"types\": 3}", ManifestFormat::Json, "prog.json")
            .unwrap_err();
        assert!(err.to_string().contains("prog.json"));
    }
}
