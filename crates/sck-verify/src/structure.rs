//! # Structural Verifier
//!
//! Turns a [`StructureSchema`] into diagnostic units in four independent
//! categories: class, attribute, constructor and method.
//!
//! ## Unit Shapes
//!
//! | Situation | Units |
//! |-----------|-------|
//! | type missing | one failing unit per category (`AttributeTest[Name]`) |
//! | no expected elements of the kind | one skipped unit (`AttributeTest[Name]`) |
//! | otherwise | one unit per expected element (`AttributeTest[Name\|age]`, `MethodTest[Name\|add(int)]`) |
//!
//! All element units of one class and category share a [`MatchPass`],
//! computed on first evaluation: every runtime element in declaration order
//! is offered to the not-yet-matched expected elements in schema order, and
//! the first fit consumes that expected element. Consumption is recorded in
//! the pass, never in the schema.

use std::sync::{Arc, OnceLock};

use sck_core::{simple_type_name, CheckFailure, QualifiedName};
use sck_introspect::{HostRuntime, TypeDescriptor};
use sck_schema::{ExpectedClass, ExpectedConstructor, ExpectedField, ExpectedMethod, StructureSchema};

use crate::diagnostic::{bracketed, Category, DiagnosticUnit, Outcome};
use crate::matcher::{match_constructor, match_field, match_method};

// ─── Match Pass ──────────────────────────────────────────────────────

/// Which expected elements of one category found a runtime counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPass {
    /// `matched[i]` is the index of the runtime element that consumed
    /// expected element `i`.
    matched: Vec<Option<usize>>,
}

impl MatchPass {
    /// First-fit assignment of runtime elements to expected elements.
    pub fn compute<R, E, F>(runtime: &[R], expected: &[E], matches: F) -> Self
    where
        F: Fn(&R, &E) -> bool,
    {
        let mut matched = vec![None; expected.len()];
        for (r_idx, element) in runtime.iter().enumerate() {
            let hit = expected
                .iter()
                .enumerate()
                .find(|(e_idx, e)| matched[*e_idx].is_none() && matches(element, e));
            if let Some((e_idx, _)) = hit {
                matched[e_idx] = Some(r_idx);
            }
        }
        Self { matched }
    }

    /// Whether expected element `index` was matched.
    pub fn is_matched(&self, index: usize) -> bool {
        self.matched.get(index).copied().flatten().is_some()
    }

    /// Number of matched expected elements.
    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|m| m.is_some()).count()
    }
}

// ─── Messages ────────────────────────────────────────────────────────

fn or_any(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("any")
}

fn optional_list(label: &str, items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("\n{label}: {}", bracketed(items))
    }
}

fn missing_type_message(class: &ExpectedClass) -> String {
    format!(
        "Could not find the \"{}\" {} within the submission. Make sure it is implemented properly.",
        class.name,
        class.kind().describe()
    )
}

fn missing_field_message(class: &ExpectedClass, field: &ExpectedField) -> String {
    format!(
        "Could not find an attribute of the {} {} with:\nName: {}\nType: {}{}{}",
        class.simple_name(),
        class.kind().describe(),
        or_any(&field.name),
        or_any(&field.type_name),
        optional_list("Modifiers", &field.modifiers),
        optional_list("Annotations", &field.annotations),
    )
}

fn missing_constructor_message(class: &ExpectedClass, ctor: &ExpectedConstructor) -> String {
    format!(
        "Could not find a constructor of the {} {} with: {}{}{}",
        class.simple_name(),
        class.kind().describe(),
        optional_list("Modifiers", &ctor.modifiers),
        optional_list("Parameters", &ctor.parameters),
        optional_list("Annotations", &ctor.annotations),
    )
}

fn missing_method_message(class: &ExpectedClass, method: &ExpectedMethod) -> String {
    format!(
        "Could not find a method of the {} {} with:\nName: {}\nReturn Type: {}{}{}{}",
        class.simple_name(),
        class.kind().describe(),
        or_any(&method.name),
        or_any(&method.return_type),
        optional_list("Parameters", &method.parameters),
        optional_list("Modifiers", &method.modifiers),
        optional_list("Annotations", &method.annotations),
    )
}

// ─── Class Check ─────────────────────────────────────────────────────

/// Superclass, enum, abstract, interface and plain-class checks, in that
/// order; the first failure wins.
///
/// A class with no kind flags only rejects interfaces and enums. An abstract
/// runtime class is accepted there, since the document did not ask for a
/// concrete one.
fn check_class(class: &ExpectedClass, ty: &TypeDescriptor) -> Result<(), CheckFailure> {
    let name = class.simple_name();
    let mismatch =
        |message: String| -> Result<(), CheckFailure> { Err(CheckFailure::ElementMismatch(message)) };

    if let Some(expected) = &class.superclass {
        let expected_simple = simple_type_name(expected);
        if ty.superclass_simple_name() != Some(expected_simple) {
            return mismatch(format!(
                "The \"{name}\" should have a superclass \"{expected}\""
            ));
        }
    }

    if class.is_enum {
        if !ty.is_enum() {
            return mismatch(format!("The \"{name}\" should be an enum."));
        }
        let missing = class
            .enum_values
            .iter()
            .any(|v| !ty.enum_constants.contains(v));
        if missing {
            return mismatch(format!(
                "The \"{name}\" enum with {} enum constant was not found within the submission. \
                 Make sure that it exists and is implemented properly.",
                bracketed(&class.enum_values)
            ));
        }
    }

    if class.is_abstract && !ty.is_abstract() {
        return mismatch(format!("The \"{name}\" should be abstract."));
    }
    if class.is_interface && !ty.is_interface() {
        return mismatch(format!("The \"{name}\" should be an interface."));
    }
    let plain_class = !class.is_interface && !class.is_enum && !class.is_abstract;
    if plain_class && (ty.is_interface() || ty.is_enum()) {
        return mismatch(format!(
            "The \"{name}\" should be a class, not an {}.",
            ty.kind.describe()
        ));
    }
    Ok(())
}

// ─── Verifier ────────────────────────────────────────────────────────

/// Builds structural diagnostic units for every class of a schema.
#[derive(Clone)]
pub struct StructuralVerifier {
    schema: Arc<StructureSchema>,
    runtime: Arc<dyn HostRuntime>,
}

impl std::fmt::Debug for StructuralVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StructuralVerifier")
            .field("classes", &self.schema.len())
            .finish_non_exhaustive()
    }
}

impl StructuralVerifier {
    /// Create a verifier over a loaded schema and a target program.
    pub fn new(schema: Arc<StructureSchema>, runtime: Arc<dyn HostRuntime>) -> Self {
        Self { schema, runtime }
    }

    /// The schema being verified.
    pub fn schema(&self) -> &StructureSchema {
        &self.schema
    }

    fn locate(&self, name: &QualifiedName) -> Option<Arc<TypeDescriptor>> {
        let found = self.runtime.locate(name);
        if found.is_none() {
            tracing::warn!(type_name = %name, "Target type not found");
        }
        found
    }

    /// One unit per class: existence, superclass, enum constants and kind.
    pub fn class_units(&self) -> Vec<DiagnosticUnit> {
        self.schema
            .classes()
            .iter()
            .enumerate()
            .map(|(index, class)| {
                let name = format!("{}[{}]", Category::Class.test_prefix(), class.simple_name());
                let schema = Arc::clone(&self.schema);
                let runtime = Arc::clone(&self.runtime);
                DiagnosticUnit::new(name, Category::Class, move || {
                    let class = &schema.classes()[index];
                    match runtime.locate(&class.name) {
                        None => Outcome::failed(CheckFailure::TargetTypeMissing(
                            missing_type_message(class),
                        )),
                        Some(ty) => check_class(class, &ty).into(),
                    }
                })
            })
            .collect()
    }

    /// Attribute units for every class.
    pub fn attribute_units(&self) -> Vec<DiagnosticUnit> {
        let mut units = Vec::new();
        for (index, class) in self.schema.classes().iter().enumerate() {
            units.extend(self.element_units(
                index,
                class,
                ElementKind::Attribute,
                class.fields.len(),
            ));
        }
        units
    }

    /// Constructor units for every class.
    pub fn constructor_units(&self) -> Vec<DiagnosticUnit> {
        let mut units = Vec::new();
        for (index, class) in self.schema.classes().iter().enumerate() {
            units.extend(self.element_units(
                index,
                class,
                ElementKind::Constructor,
                class.constructors.len(),
            ));
        }
        units
    }

    /// Method units for every class.
    pub fn method_units(&self) -> Vec<DiagnosticUnit> {
        let mut units = Vec::new();
        for (index, class) in self.schema.classes().iter().enumerate() {
            units.extend(self.element_units(index, class, ElementKind::Method, class.methods.len()));
        }
        units
    }

    /// Units of one category.
    pub fn units_for(&self, category: Category) -> Vec<DiagnosticUnit> {
        match category {
            Category::Class => self.class_units(),
            Category::Attribute => self.attribute_units(),
            Category::Constructor => self.constructor_units(),
            Category::Method => self.method_units(),
            Category::Getter | Category::Setter => Vec::new(),
        }
    }

    /// Class, attribute, constructor and method units, in that order.
    pub fn all_units(&self) -> Vec<DiagnosticUnit> {
        self.filtered_units(&Category::STRUCTURAL)
    }

    /// Units of the selected categories, in suite order regardless of the
    /// order `categories` lists them in.
    pub fn filtered_units(&self, categories: &[Category]) -> Vec<DiagnosticUnit> {
        Category::STRUCTURAL
            .iter()
            .filter(|c| categories.contains(c))
            .flat_map(|c| self.units_for(*c))
            .collect()
    }

    fn element_units(
        &self,
        class_index: usize,
        class: &ExpectedClass,
        kind: ElementKind,
        expected_len: usize,
    ) -> Vec<DiagnosticUnit> {
        let category = kind.category();
        let class_unit = format!("{}[{}]", category.test_prefix(), class.simple_name());

        let Some(ty) = self.locate(&class.name) else {
            return vec![DiagnosticUnit::failing(
                class_unit,
                category,
                CheckFailure::TargetTypeMissing(missing_type_message(class)),
            )];
        };
        if expected_len == 0 {
            let reason = format!(
                "The \"{}\" {} {} list is empty.",
                class.name,
                class.kind().describe(),
                kind.plural()
            );
            return vec![DiagnosticUnit::skipped(class_unit, category, reason)];
        }

        let pass: Arc<OnceLock<MatchPass>> = Arc::new(OnceLock::new());
        (0..expected_len)
            .map(|element_index| {
                let name = format!(
                    "{}[{}|{}]",
                    category.test_prefix(),
                    class.simple_name(),
                    kind.element_label(class, element_index)
                );
                let schema = Arc::clone(&self.schema);
                let ty = Arc::clone(&ty);
                let pass = Arc::clone(&pass);
                DiagnosticUnit::new(name, category, move || {
                    let class = &schema.classes()[class_index];
                    let pass = pass.get_or_init(|| kind.match_pass(class, &ty));
                    if pass.is_matched(element_index) {
                        Outcome::Passed
                    } else {
                        Outcome::failed(CheckFailure::ElementNotFound(
                            kind.missing_message(class, element_index),
                        ))
                    }
                })
            })
            .collect()
    }
}

/// The three member categories that share the match-pass shape.
#[derive(Debug, Clone, Copy)]
enum ElementKind {
    Attribute,
    Constructor,
    Method,
}

impl ElementKind {
    fn category(self) -> Category {
        match self {
            Self::Attribute => Category::Attribute,
            Self::Constructor => Category::Constructor,
            Self::Method => Category::Method,
        }
    }

    fn plural(self) -> &'static str {
        match self {
            Self::Attribute => "attributes",
            Self::Constructor => "constructors",
            Self::Method => "methods",
        }
    }

    /// Distinguishing label inside a unit name.
    fn element_label(self, class: &ExpectedClass, index: usize) -> String {
        let named = |name: &Option<String>| match name {
            Some(n) => n.clone(),
            None => format!("#{index}"),
        };
        match self {
            Self::Attribute => named(&class.fields[index].name),
            Self::Method => {
                let method = &class.methods[index];
                format!("{}({})", named(&method.name), method.parameters.join(", "))
            }
            Self::Constructor => format!("({})", class.constructors[index].parameters.join(", ")),
        }
    }

    fn match_pass(self, class: &ExpectedClass, ty: &TypeDescriptor) -> MatchPass {
        let pass = match self {
            Self::Attribute => MatchPass::compute(&ty.fields, &class.fields, |r, e| {
                match_field(r, e).is_some()
            }),
            Self::Constructor => MatchPass::compute(&ty.constructors, &class.constructors, |r, e| {
                match_constructor(r, e).is_some()
            }),
            Self::Method => MatchPass::compute(&ty.methods, &class.methods, |r, e| {
                match_method(r, e).is_some()
            }),
        };
        tracing::debug!(
            class = %class.name,
            kind = self.plural(),
            matched = pass.matched_count(),
            "Computed match pass"
        );
        pass
    }

    fn missing_message(self, class: &ExpectedClass, index: usize) -> String {
        match self {
            Self::Attribute => missing_field_message(class, &class.fields[index]),
            Self::Constructor => missing_constructor_message(class, &class.constructors[index]),
            Self::Method => missing_method_message(class, &class.methods[index]),
        }
    }
}
