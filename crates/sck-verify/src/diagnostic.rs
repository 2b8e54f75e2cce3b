//! # Diagnostic Units
//!
//! A [`DiagnosticUnit`] is one named, independently reportable check. Its
//! body is a deferred thunk: nothing touches the target program until the
//! harness calls [`DiagnosticUnit::evaluate`].
//!
//! ## Boundary Invariant
//!
//! No error or panic escapes `evaluate`. Host errors are already data
//! ([`CheckFailure`]); a panic inside a thunk is caught and reported as an
//! [`CheckFailure::InvocationFailure`] for that unit alone.

use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sck_core::CheckFailure;

/// The check category a unit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Existence, kind, superclass and enum constants.
    Class,
    /// Declared fields.
    Attribute,
    /// Declared constructors.
    Constructor,
    /// Declared methods.
    Method,
    /// Getter return values.
    Getter,
    /// Setter post-state.
    Setter,
}

impl Category {
    /// The four structural categories, in suite order.
    pub const STRUCTURAL: [Category; 4] = [
        Category::Class,
        Category::Attribute,
        Category::Constructor,
        Category::Method,
    ];

    /// Lowercase name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Attribute => "attribute",
            Self::Constructor => "constructor",
            Self::Method => "method",
            Self::Getter => "getter",
            Self::Setter => "setter",
        }
    }

    /// Prefix of unit names in this category, e.g. `AttributeTest`.
    pub fn test_prefix(&self) -> &'static str {
        match self {
            Self::Class => "ClassTest",
            Self::Attribute => "AttributeTest",
            Self::Constructor => "ConstructorTest",
            Self::Method => "MethodTest",
            Self::Getter => "GetterTest",
            Self::Setter => "SetterTest",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "class" => Ok(Self::Class),
            "attribute" | "field" => Ok(Self::Attribute),
            "constructor" => Ok(Self::Constructor),
            "method" => Ok(Self::Method),
            "getter" => Ok(Self::Getter),
            "setter" => Ok(Self::Setter),
            other => Err(format!(
                "unknown category '{other}' (expected class, attribute, constructor, method, getter or setter)"
            )),
        }
    }
}

/// Result of evaluating one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The check held.
    Passed,
    /// The check failed.
    Failed {
        /// Why.
        failure: CheckFailure,
    },
    /// Nothing to check.
    Skipped {
        /// Why the unit was skipped.
        reason: String,
    },
}

impl Outcome {
    /// Shorthand for a failed outcome.
    pub fn failed(failure: CheckFailure) -> Self {
        Self::Failed { failure }
    }

    /// Whether the outcome is a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<Result<(), CheckFailure>> for Outcome {
    fn from(result: Result<(), CheckFailure>) -> Self {
        match result {
            Ok(()) => Self::Passed,
            Err(failure) => Self::failed(failure),
        }
    }
}

/// Deferred body of a unit.
pub type Thunk = Box<dyn Fn() -> Outcome + Send + Sync>;

/// A named, independently evaluable check.
pub struct DiagnosticUnit {
    name: String,
    category: Category,
    thunk: Thunk,
}

impl DiagnosticUnit {
    /// Create a unit from a thunk.
    pub fn new<F>(name: impl Into<String>, category: Category, thunk: F) -> Self
    where
        F: Fn() -> Outcome + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            category,
            thunk: Box::new(thunk),
        }
    }

    /// A unit that always fails with `failure`.
    pub fn failing(name: impl Into<String>, category: Category, failure: CheckFailure) -> Self {
        Self::new(name, category, move || Outcome::failed(failure.clone()))
    }

    /// A unit that is always skipped.
    pub fn skipped(name: impl Into<String>, category: Category, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(name, category, move || Outcome::Skipped {
            reason: reason.clone(),
        })
    }

    /// Unit name, e.g. `AttributeTest[Contact|age]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit's category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Run the check. Never panics.
    pub fn evaluate(&self) -> Outcome {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.thunk)())) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::warn!(unit = %self.name, %detail, "Check panicked");
                Outcome::failed(CheckFailure::InvocationFailure(format!(
                    "The check \"{}\" aborted unexpectedly: {detail}",
                    self.name
                )))
            }
        }
    }
}

impl std::fmt::Debug for DiagnosticUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticUnit")
            .field("name", &self.name)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Render a list the way failure messages show it: `[a, b]`.
pub(crate) fn bracketed<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<&str> = items.iter().map(AsRef::as_ref).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_and_skipped_units() {
        let f = DiagnosticUnit::failing(
            "ClassTest[A]",
            Category::Class,
            CheckFailure::TargetTypeMissing("gone".into()),
        );
        assert!(f.evaluate().is_failure());
        assert_eq!(f.name(), "ClassTest[A]");

        let s = DiagnosticUnit::skipped("MethodTest[A]", Category::Method, "empty");
        assert_eq!(
            s.evaluate(),
            Outcome::Skipped {
                reason: "empty".into()
            }
        );
    }

    #[test]
    fn test_panic_becomes_invocation_failure() {
        let unit = DiagnosticUnit::new("GetterTest[A|x]", Category::Getter, || {
            panic!("host exploded")
        });
        match unit.evaluate() {
            Outcome::Failed {
                failure: CheckFailure::InvocationFailure(msg),
            } => assert!(msg.contains("host exploded"), "got: {msg}"),
            other => panic!("Expected InvocationFailure, got: {other:?}"),
        }
    }

    #[test]
    fn test_units_are_reevaluable() {
        let unit = DiagnosticUnit::new("ClassTest[A]", Category::Class, || Outcome::Passed);
        assert_eq!(unit.evaluate(), Outcome::Passed);
        assert_eq!(unit.evaluate(), Outcome::Passed);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Attribute".parse::<Category>().unwrap(), Category::Attribute);
        assert_eq!("field".parse::<Category>().unwrap(), Category::Attribute);
        assert!("widget".parse::<Category>().is_err());
        assert_eq!(Category::Constructor.test_prefix(), "ConstructorTest");
    }

    #[test]
    fn test_bracketed() {
        assert_eq!(bracketed(&["private", "final"]), "[private, final]");
        assert_eq!(bracketed::<String>(&[]), "[]");
    }

    #[test]
    fn test_unit_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DiagnosticUnit>();
    }
}
