//! # Runtime Elements
//!
//! The uniform view the element matcher takes of a declared field,
//! constructor or method. Introspection may be refused by the host (the
//! member is sealed), in which case [`Introspect::inspect`] returns an error
//! and the matcher treats the element as not matching.

use thiserror::Error;

use crate::descriptor::{ConstructorDescriptor, FieldDescriptor, MethodDescriptor, TypeRef};

/// Introspection of a member was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The host denied access to the member.
    #[error("access to {member} denied by the host")]
    AccessDenied {
        /// Label of the member, e.g. `field age`.
        member: String,
    },
}

/// The kind of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// A field (attribute).
    Field,
    /// A constructor.
    Constructor,
    /// A method.
    Method,
}

/// Everything the matching rules read from one member.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    /// Member name; `None` for constructors.
    pub name: Option<&'a str>,
    /// Modifier tokens.
    pub modifiers: &'a [String],
    /// Annotation simple names.
    pub annotations: &'a [String],
    /// Parameter types; empty for fields.
    pub parameters: &'a [TypeRef],
    /// Declared field type or method return type; `None` for constructors.
    pub value_type: Option<&'a TypeRef>,
}

/// An introspectable member of a loaded type.
pub trait Introspect {
    /// The member's kind.
    fn member_kind(&self) -> MemberKind;

    /// Short label for logs, e.g. `method getName`.
    fn label(&self) -> String;

    /// Read the member's shape.
    ///
    /// # Errors
    ///
    /// Returns [`IntrospectionError::AccessDenied`] if the host refuses.
    fn inspect(&self) -> Result<ElementView<'_>, IntrospectionError>;
}

fn denied(label: String) -> IntrospectionError {
    IntrospectionError::AccessDenied { member: label }
}

impl Introspect for FieldDescriptor {
    fn member_kind(&self) -> MemberKind {
        MemberKind::Field
    }

    fn label(&self) -> String {
        format!("field {}", self.name)
    }

    fn inspect(&self) -> Result<ElementView<'_>, IntrospectionError> {
        if self.sealed {
            return Err(denied(self.label()));
        }
        Ok(ElementView {
            name: Some(self.name.as_str()),
            modifiers: &self.modifiers,
            annotations: &self.annotations,
            parameters: &[],
            value_type: Some(&self.ty),
        })
    }
}

impl Introspect for ConstructorDescriptor {
    fn member_kind(&self) -> MemberKind {
        MemberKind::Constructor
    }

    fn label(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(TypeRef::simple_name).collect();
        format!("constructor ({})", params.join(", "))
    }

    fn inspect(&self) -> Result<ElementView<'_>, IntrospectionError> {
        if self.sealed {
            return Err(denied(self.label()));
        }
        Ok(ElementView {
            name: None,
            modifiers: &self.modifiers,
            annotations: &self.annotations,
            parameters: &self.parameters,
            value_type: None,
        })
    }
}

impl Introspect for MethodDescriptor {
    fn member_kind(&self) -> MemberKind {
        MemberKind::Method
    }

    fn label(&self) -> String {
        format!("method {}", self.name)
    }

    fn inspect(&self) -> Result<ElementView<'_>, IntrospectionError> {
        if self.sealed {
            return Err(denied(self.label()));
        }
        Ok(ElementView {
            name: Some(self.name.as_str()),
            modifiers: &self.modifiers,
            annotations: &self.annotations,
            parameters: &self.parameters,
            value_type: Some(&self.return_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn field(sealed: bool) -> FieldDescriptor {
        FieldDescriptor {
            name: "age".into(),
            ty: TypeRef::named("int"),
            modifiers: vec!["private".into()],
            annotations: vec![],
            initial: Value::Null,
            sealed,
        }
    }

    #[test]
    fn test_field_view() {
        let f = field(false);
        let view = f.inspect().unwrap();
        assert_eq!(view.name, Some("age"));
        assert_eq!(view.value_type.map(TypeRef::simple_name), Some("int"));
        assert!(view.parameters.is_empty());
        assert_eq!(f.member_kind(), MemberKind::Field);
    }

    #[test]
    fn test_sealed_member_denied() {
        let err = field(true).inspect().unwrap_err();
        assert_eq!(
            err,
            IntrospectionError::AccessDenied {
                member: "field age".into()
            }
        );
    }

    #[test]
    fn test_constructor_label_and_view() {
        let c = ConstructorDescriptor {
            parameters: vec![TypeRef::named("java.lang.String"), TypeRef::named("int")],
            ..Default::default()
        };
        assert_eq!(c.label(), "constructor (String, int)");
        let view = c.inspect().unwrap();
        assert!(view.name.is_none());
        assert!(view.value_type.is_none());
        assert_eq!(view.parameters.len(), 2);
    }
}
