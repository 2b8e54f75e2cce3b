//! # Type Descriptors
//!
//! Reflection as data: a [`TypeDescriptor`] captures everything the
//! verifiers may ask about a loaded type (name, kind, superclass, enum
//! constants, and its declared fields, constructors and methods) in a form
//! that is independent of any host language's reflection API.
//!
//! Types are referenced by [`TypeRef`], which keeps both the erased simple
//! name (`List`) and the generic name (`java.util.List<java.lang.String>`),
//! since the matching rules consult both.
//!
//! Member descriptors also carry the declarative behavior used by the
//! in-memory reference program (initial values, constructor assignments,
//! method bodies). Host runtimes backed by a real program ignore them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sck_core::{simple_type_name, QualifiedName, TypeKind};

use crate::behavior::MethodBehavior;

// ─── Type References ─────────────────────────────────────────────────

/// A reference to a type in erased and generic form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TypeRefRepr", into = "TypeRefRepr")]
pub struct TypeRef {
    simple: String,
    generic: String,
}

/// Manifest representation: either a single (possibly generic) name, or
/// both forms spelled out for type variables whose erasure differs.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TypeRefRepr {
    Name(String),
    Explicit { simple: String, generic: String },
}

impl From<TypeRefRepr> for TypeRef {
    fn from(repr: TypeRefRepr) -> Self {
        match repr {
            TypeRefRepr::Name(name) => Self::named(name),
            TypeRefRepr::Explicit { simple, generic } => Self { simple, generic },
        }
    }
}

impl From<TypeRef> for TypeRefRepr {
    fn from(ty: TypeRef) -> Self {
        if simple_type_name(&ty.generic) == ty.simple {
            TypeRefRepr::Name(ty.generic)
        } else {
            TypeRefRepr::Explicit {
                simple: ty.simple,
                generic: ty.generic,
            }
        }
    }
}

impl TypeRef {
    /// Reference a type by its (possibly qualified, possibly generic) name.
    /// The erased simple name is derived from it.
    pub fn named(name: impl Into<String>) -> Self {
        let generic = name.into();
        let simple = simple_type_name(&generic).to_string();
        Self { simple, generic }
    }

    /// Reference a type whose erasure is not derivable from its generic
    /// name, such as a type variable `T` erased to `Object`.
    pub fn explicit(simple: impl Into<String>, generic: impl Into<String>) -> Self {
        Self {
            simple: simple.into(),
            generic: generic.into(),
        }
    }

    /// The `void` pseudo-type.
    pub fn void() -> Self {
        Self::named("void")
    }

    /// Erased simple name, e.g. `List`.
    pub fn simple_name(&self) -> &str {
        &self.simple
    }

    /// Generic name, e.g. `java.util.List<java.lang.String>`.
    pub fn generic_name(&self) -> &str {
        &self.generic
    }
}

impl Default for TypeRef {
    fn default() -> Self {
        Self::void()
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.generic)
    }
}

// ─── Members ─────────────────────────────────────────────────────────

/// A declared field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Modifier tokens.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Annotation simple names.
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Value a fresh instance starts with.
    #[serde(default)]
    pub initial: Value,
    /// Introspection of this member is denied by the host.
    #[serde(default)]
    pub sealed: bool,
}

/// A declared constructor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstructorDescriptor {
    /// Modifier tokens.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Parameter types in declaration order.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Annotation simple names.
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Field names receiving the arguments, position by position.
    #[serde(default)]
    pub assigns: Vec<String>,
    /// If set, construction fails with this message.
    #[serde(default)]
    pub raises: Option<String>,
    /// Introspection of this member is denied by the host.
    #[serde(default)]
    pub sealed: bool,
}

/// A declared method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Return type; `void` when omitted.
    #[serde(default)]
    pub return_type: TypeRef,
    /// Parameter types in declaration order.
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Modifier tokens.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Annotation simple names.
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Body executed on invocation; an absent body returns null.
    #[serde(default)]
    pub behavior: Option<MethodBehavior>,
    /// Introspection of this member is denied by the host.
    #[serde(default)]
    pub sealed: bool,
}

// ─── Types ───────────────────────────────────────────────────────────

/// Everything known about one loaded type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Package-qualified name.
    pub name: QualifiedName,
    /// Declared kind.
    #[serde(default = "default_kind")]
    pub kind: TypeKind,
    /// Qualified (or simple) name of the direct superclass, if any.
    #[serde(default)]
    pub superclass: Option<String>,
    /// Enum constant names in declaration order.
    #[serde(default)]
    pub enum_constants: Vec<String>,
    /// Declared fields.
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Declared constructors.
    #[serde(default)]
    pub constructors: Vec<ConstructorDescriptor>,
    /// Declared methods.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

fn default_kind() -> TypeKind {
    TypeKind::Class
}

impl TypeDescriptor {
    /// Describe an empty type of the given kind.
    pub fn new(name: QualifiedName, kind: TypeKind) -> Self {
        Self {
            name,
            kind,
            superclass: None,
            enum_constants: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Simple name of the direct superclass.
    pub fn superclass_simple_name(&self) -> Option<&str> {
        self.superclass.as_deref().map(simple_type_name)
    }

    /// Whether the type is an interface.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Whether the type is an enum.
    pub fn is_enum(&self) -> bool {
        self.kind == TypeKind::Enum
    }

    /// Whether the type is abstract. Interfaces are abstract.
    pub fn is_abstract(&self) -> bool {
        self.kind.is_abstract()
    }

    /// Add the implicit public no-argument constructor a class gets when
    /// it declares none. Interfaces and enums are left unchanged.
    pub fn with_implicit_constructor(mut self) -> Self {
        let is_class = matches!(self.kind, TypeKind::Class | TypeKind::AbstractClass);
        if is_class && self.constructors.is_empty() {
            self.constructors.push(ConstructorDescriptor {
                modifiers: vec!["public".to_string()],
                ..Default::default()
            });
        }
        self
    }

    /// Find a declared field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
