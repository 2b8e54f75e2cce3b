//! # Type Kinds
//!
//! The four shapes a checked type can take. Schema documents express the
//! kind as three boolean flags; introspected types carry a single kind.
//! Both sides meet here.

use serde::{Deserialize, Serialize};

/// Declared kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A concrete class.
    Class,
    /// A class declared `abstract`.
    AbstractClass,
    /// An interface.
    Interface,
    /// An enumeration with named constants.
    Enum,
}

impl TypeKind {
    /// Resolve schema kind flags into a single kind.
    ///
    /// When several flags are set, `abstract` wins over `interface`, which
    /// wins over `enum`. The result is only used for wording; each flag is
    /// still verified on its own.
    pub fn from_flags(is_interface: bool, is_enum: bool, is_abstract: bool) -> Self {
        if is_abstract {
            Self::AbstractClass
        } else if is_interface {
            Self::Interface
        } else if is_enum {
            Self::Enum
        } else {
            Self::Class
        }
    }

    /// Whether instances of this kind are abstract (cannot be constructed).
    ///
    /// Interfaces count as abstract.
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::AbstractClass | Self::Interface)
    }

    /// Human-readable description used in failure messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::AbstractClass => "abstract class",
            Self::Interface => "interface",
            Self::Enum => "enum",
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags_precedence() {
        assert_eq!(TypeKind::from_flags(false, false, false), TypeKind::Class);
        assert_eq!(TypeKind::from_flags(true, false, false), TypeKind::Interface);
        assert_eq!(TypeKind::from_flags(false, true, false), TypeKind::Enum);
        assert_eq!(TypeKind::from_flags(true, true, true), TypeKind::AbstractClass);
        assert_eq!(TypeKind::from_flags(true, true, false), TypeKind::Interface);
    }

    #[test]
    fn test_interface_is_abstract() {
        assert!(TypeKind::Interface.is_abstract());
        assert!(TypeKind::AbstractClass.is_abstract());
        assert!(!TypeKind::Enum.is_abstract());
        assert!(!TypeKind::Class.is_abstract());
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&TypeKind::AbstractClass).unwrap();
        assert_eq!(json, "\"abstract_class\"");
        let parsed: TypeKind = serde_json::from_str("\"interface\"").unwrap();
        assert_eq!(parsed, TypeKind::Interface);
    }
}
