//! # Check Failures
//!
//! The non-fatal failure taxonomy. Each variant becomes exactly one failing
//! diagnostic unit carrying a human-readable, actionable message that names
//! the expected element's identifying attributes.
//!
//! Fatal errors (schema not found, schema malformed) live with the loader in
//! `sck-schema`; they abort suite initialization before any unit exists.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed check, as reported by a diagnostic unit.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum CheckFailure {
    /// The expected type could not be located in the target program.
    #[error("{0}")]
    TargetTypeMissing(String),

    /// The target type was found but no instance could be created.
    #[error("{0}")]
    TargetNotConstructible(String),

    /// No runtime element satisfied an expected element.
    #[error("{0}")]
    ElementNotFound(String),

    /// The element exists but its shape or observed value differs.
    #[error("{0}")]
    ElementMismatch(String),

    /// Invoking or introspecting the target raised an error.
    #[error("{0}")]
    InvocationFailure(String),
}

/// Discriminant of a [`CheckFailure`], for counting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// See [`CheckFailure::TargetTypeMissing`].
    TargetTypeMissing,
    /// See [`CheckFailure::TargetNotConstructible`].
    TargetNotConstructible,
    /// See [`CheckFailure::ElementNotFound`].
    ElementNotFound,
    /// See [`CheckFailure::ElementMismatch`].
    ElementMismatch,
    /// See [`CheckFailure::InvocationFailure`].
    InvocationFailure,
}

impl CheckFailure {
    /// The failure's discriminant.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::TargetTypeMissing(_) => FailureKind::TargetTypeMissing,
            Self::TargetNotConstructible(_) => FailureKind::TargetNotConstructible,
            Self::ElementNotFound(_) => FailureKind::ElementNotFound,
            Self::ElementMismatch(_) => FailureKind::ElementMismatch,
            Self::InvocationFailure(_) => FailureKind::InvocationFailure,
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::TargetTypeMissing(m)
            | Self::TargetNotConstructible(m)
            | Self::ElementNotFound(m)
            | Self::ElementMismatch(m)
            | Self::InvocationFailure(m) => m,
        }
    }
}

impl FailureKind {
    /// Stable snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TargetTypeMissing => "target_type_missing",
            Self::TargetNotConstructible => "target_not_constructible",
            Self::ElementNotFound => "element_not_found",
            Self::ElementMismatch => "element_mismatch",
            Self::InvocationFailure => "invocation_failure",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_message() {
        let f = CheckFailure::ElementNotFound("Could not find an attribute".into());
        assert_eq!(f.to_string(), "Could not find an attribute");
        assert_eq!(f.message(), "Could not find an attribute");
        assert_eq!(f.kind(), FailureKind::ElementNotFound);
    }

    #[test]
    fn test_serde_tagged_format() {
        let f = CheckFailure::TargetTypeMissing("missing".into());
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["kind"], "target_type_missing");
        assert_eq!(json["message"], "missing");
    }

    #[test]
    fn test_kind_as_str_matches_serde() {
        for kind in [
            FailureKind::TargetTypeMissing,
            FailureKind::TargetNotConstructible,
            FailureKind::ElementNotFound,
            FailureKind::ElementMismatch,
            FailureKind::InvocationFailure,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
