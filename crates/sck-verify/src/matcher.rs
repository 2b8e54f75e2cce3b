//! # Element Matcher
//!
//! Decides whether one runtime element satisfies one expected element. The
//! policy is applied in a fixed order and short-circuits on the first rule
//! that fails:
//!
//! 1. name (fields, methods), exact;
//! 2. annotations, exact set ([`annotations_exact`]);
//! 3. modifiers, required subset ([`modifiers_cover`]);
//! 4. parameter types (constructors, methods), [`parameters_match`];
//! 5. declared or return type (fields, methods), [`type_matches`].
//!
//! Matching never fails loudly. A member the host refuses to introspect is
//! a no-match, logged at `debug`.

use sck_core::modifier_string;
use sck_introspect::{
    ConstructorDescriptor, ElementView, FieldDescriptor, Introspect, MethodDescriptor, TypeRef,
};
use sck_schema::{ExpectedConstructor, ExpectedField, ExpectedMethod};

/// The runtime annotation set must equal the expected set: same size, and
/// every expected annotation present.
pub fn annotations_exact(runtime: &[String], expected: &[String]) -> bool {
    runtime.len() == expected.len() && expected.iter().all(|a| runtime.contains(a))
}

/// Every expected modifier token must occur in the runtime element's
/// canonical modifier string. Extra runtime modifiers are tolerated.
pub fn modifiers_cover(runtime: &[String], expected: &[String]) -> bool {
    let rendered = modifier_string(runtime);
    expected.iter().all(|m| rendered.contains(m.as_str()))
}

/// Parameter counts must be equal and every expected type name must occur
/// among the runtime parameters' simple and generic names. Position is not
/// compared.
pub fn parameters_match(runtime: &[TypeRef], expected: &[String]) -> bool {
    if runtime.len() != expected.len() {
        return false;
    }
    expected.iter().all(|e| {
        runtime
            .iter()
            .any(|p| p.simple_name() == e.as_str() || p.generic_name() == e.as_str())
    })
}

/// The expected type equals the runtime simple name or occurs inside the
/// runtime generic name (`String` against `List<String>`).
pub fn type_matches(runtime: &TypeRef, expected: &str) -> bool {
    runtime.simple_name() == expected || runtime.generic_name().contains(expected)
}

fn view_of<E: Introspect>(element: &E) -> Option<ElementView<'_>> {
    match element.inspect() {
        Ok(view) => Some(view),
        Err(e) => {
            tracing::debug!(error = %e, "Element not introspectable; treating as no-match");
            None
        }
    }
}

fn name_matches(view: &ElementView<'_>, expected: Option<&str>) -> bool {
    match expected {
        Some(name) => view.name == Some(name),
        None => true,
    }
}

fn value_type_matches(view: &ElementView<'_>, expected: Option<&str>) -> bool {
    match (expected, view.value_type) {
        (None, _) => true,
        (Some(e), Some(ty)) => type_matches(ty, e),
        (Some(_), None) => false,
    }
}

/// Match a runtime field against an expected attribute.
pub fn match_field<'e>(
    runtime: &FieldDescriptor,
    expected: &'e ExpectedField,
) -> Option<&'e ExpectedField> {
    let view = view_of(runtime)?;
    let ok = name_matches(&view, expected.name.as_deref())
        && annotations_exact(view.annotations, &expected.annotations)
        && modifiers_cover(view.modifiers, &expected.modifiers)
        && value_type_matches(&view, expected.type_name.as_deref());
    if !ok {
        tracing::debug!(element = %runtime.label(), "No match");
    }
    ok.then_some(expected)
}

/// Match a runtime constructor against an expected constructor.
pub fn match_constructor<'e>(
    runtime: &ConstructorDescriptor,
    expected: &'e ExpectedConstructor,
) -> Option<&'e ExpectedConstructor> {
    let view = view_of(runtime)?;
    let ok = annotations_exact(view.annotations, &expected.annotations)
        && modifiers_cover(view.modifiers, &expected.modifiers)
        && parameters_match(view.parameters, &expected.parameters);
    if !ok {
        tracing::debug!(element = %runtime.label(), "No match");
    }
    ok.then_some(expected)
}

/// Match a runtime method against an expected method.
pub fn match_method<'e>(
    runtime: &MethodDescriptor,
    expected: &'e ExpectedMethod,
) -> Option<&'e ExpectedMethod> {
    let view = view_of(runtime)?;
    let ok = name_matches(&view, expected.name.as_deref())
        && annotations_exact(view.annotations, &expected.annotations)
        && modifiers_cover(view.modifiers, &expected.modifiers)
        && parameters_match(view.parameters, &expected.parameters)
        && value_type_matches(&view, expected.return_type.as_deref());
    if !ok {
        tracing::debug!(element = %runtime.label(), "No match");
    }
    ok.then_some(expected)
}
