//! # Expected Structure Model
//!
//! In-memory representation of one expected class, interface or enum and
//! the constructors, attributes and methods it must declare.
//!
//! ## Invariant
//!
//! A loaded [`StructureSchema`] is immutable. Verifiers track which expected
//! elements were matched in their own per-pass index sets; they never remove
//! elements from these vectors, so one schema can be reused across check
//! categories and repeated runs.
//!
//! Absent document fields are represented as empty vectors or `None`, never
//! as a distinct "missing" state, so comparison code has no special cases.

use serde::{Deserialize, Serialize};

use sck_core::{QualifiedName, TypeKind};

/// An expected attribute (field).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpectedField {
    /// Required field name; `None` matches on type, modifiers and
    /// annotations only.
    #[serde(default)]
    pub name: Option<String>,
    /// Required declared type (simple name or generic argument).
    #[serde(default, rename = "type")]
    pub type_name: Option<String>,
    /// Modifier tokens that must all be present.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Annotation simple names; the runtime set must be exactly this set.
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// An expected constructor. Constructors are unnamed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpectedConstructor {
    /// Modifier tokens that must all be present.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Parameter type names, in declaration order.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Annotation simple names; the runtime set must be exactly this set.
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// An expected method.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpectedMethod {
    /// Required method name; `None` matches on signature only.
    #[serde(default)]
    pub name: Option<String>,
    /// Required return type (simple name or generic argument).
    #[serde(default, rename = "returnType")]
    pub return_type: Option<String>,
    /// Modifier tokens that must all be present.
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Parameter type names, in declaration order.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Annotation simple names; the runtime set must be exactly this set.
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// One expected type and its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpectedClass {
    /// Package-qualified name used to locate the type at runtime.
    pub name: QualifiedName,
    /// Simple name of the required direct superclass.
    pub superclass: Option<String>,
    /// The type must be an interface.
    pub is_interface: bool,
    /// The type must be an enum.
    pub is_enum: bool,
    /// The type must be abstract.
    pub is_abstract: bool,
    /// Enum constants that must all be declared (extras are tolerated).
    pub enum_values: Vec<String>,
    /// Expected constructors in document order.
    pub constructors: Vec<ExpectedConstructor>,
    /// Expected attributes in document order.
    pub fields: Vec<ExpectedField>,
    /// Expected methods in document order.
    pub methods: Vec<ExpectedMethod>,
}

impl ExpectedClass {
    /// Create an expected concrete class with no members.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            superclass: None,
            is_interface: false,
            is_enum: false,
            is_abstract: false,
            enum_values: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// The kind implied by the schema flags, used for wording.
    pub fn kind(&self) -> TypeKind {
        TypeKind::from_flags(self.is_interface, self.is_enum, self.is_abstract)
    }

    /// The simple type name.
    pub fn simple_name(&self) -> &str {
        self.name.simple_name()
    }
}

/// The complete expected structure: every class entry of one document, in
/// document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StructureSchema {
    classes: Vec<ExpectedClass>,
}

impl StructureSchema {
    /// Wrap an ordered list of expected classes.
    pub fn new(classes: Vec<ExpectedClass>) -> Self {
        Self { classes }
    }

    /// All expected classes in document order.
    pub fn classes(&self) -> &[ExpectedClass] {
        &self.classes
    }

    /// Number of expected classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns true if the document declared no classes.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Look up an expected class by qualified name.
    pub fn get(&self, name: &QualifiedName) -> Option<&ExpectedClass> {
        self.classes.iter().find(|c| &c.name == name)
    }

    /// Total number of expected members across all classes.
    pub fn member_count(&self) -> usize {
        self.classes
            .iter()
            .map(|c| c.constructors.len() + c.fields.len() + c.methods.len())
            .sum()
    }
}

impl<'a> IntoIterator for &'a StructureSchema {
    type Item = &'a ExpectedClass;
    type IntoIter = std::slice::Iter<'a, ExpectedClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.iter()
    }
}
