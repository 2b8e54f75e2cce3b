//! # Host Runtime Capability
//!
//! Dynamic dispatch by string name. The verifiers never see the target
//! program directly; they locate types, construct instances, invoke methods
//! and read field values through [`HostRuntime`].
//!
//! ## Instance State
//!
//! An [`Instance`] is a cheap handle. Clones share one slot table behind a
//! `parking_lot::Mutex`, so several diagnostic units evaluating against the
//! same instance observe each other's mutations in evaluation order.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use sck_core::QualifiedName;

use crate::descriptor::TypeDescriptor;

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by a host runtime.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// The named type does not exist in the program.
    #[error("type {name} not found")]
    TypeNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The type is abstract, an interface or an enum and cannot be built.
    #[error("type {name} is {kind} and cannot be instantiated")]
    NotInstantiable {
        /// The type's qualified name.
        name: String,
        /// Human-readable kind, e.g. `an interface`.
        kind: String,
    },

    /// No declared constructor has the requested signature.
    #[error("no constructor of {type_name} with parameters ({signature})")]
    NoSuchConstructor {
        /// The type's qualified name.
        type_name: String,
        /// Requested parameter types, comma separated.
        signature: String,
    },

    /// Argument count or argument values do not fit the member.
    #[error("argument mismatch calling {member}: expected {expected}, got {actual}")]
    ArgumentMismatch {
        /// Member label.
        member: String,
        /// Expected argument count.
        expected: usize,
        /// Supplied argument count.
        actual: usize,
    },

    /// No method with this name and arity exists on the instance's type
    /// or any of its superclasses.
    #[error("no method {method}/{arity} on {type_name}")]
    NoSuchMethod {
        /// The instance's type.
        type_name: String,
        /// Method name.
        method: String,
        /// Requested arity.
        arity: usize,
    },

    /// The target code raised while running.
    #[error("{member} raised: {message}")]
    Invocation {
        /// Member label.
        member: String,
        /// The raised message.
        message: String,
    },

    /// The host refused access to a member.
    #[error("access to {member} denied")]
    AccessDenied {
        /// Member label.
        member: String,
    },
}

// ─── Instances ───────────────────────────────────────────────────────

/// Current value of one field slot of an instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldValue {
    /// The type that declares the field.
    pub owner: QualifiedName,
    /// Field name.
    pub name: String,
    /// Current value.
    pub value: Value,
}

/// A live instance of a target type.
#[derive(Debug, Clone)]
pub struct Instance {
    type_name: QualifiedName,
    slots: Arc<Mutex<Vec<FieldValue>>>,
}

impl Instance {
    /// Create an instance with the given initial slots.
    pub fn new(type_name: QualifiedName, slots: Vec<FieldValue>) -> Self {
        Self {
            type_name,
            slots: Arc::new(Mutex::new(slots)),
        }
    }

    /// The instance's runtime type.
    pub fn type_name(&self) -> &QualifiedName {
        &self.type_name
    }

    /// Snapshot of every slot.
    pub fn snapshot(&self) -> Vec<FieldValue> {
        self.slots.lock().clone()
    }

    /// Read a slot. Fields declared lower in the hierarchy shadow
    /// inherited fields of the same name.
    pub fn read(&self, field: &str) -> Option<Value> {
        self.slots
            .lock()
            .iter()
            .find(|slot| slot.name == field)
            .map(|slot| slot.value.clone())
    }

    /// Write a slot through `update`, returning the new value. Returns
    /// `None` if no slot has this name.
    pub fn update<F>(&self, field: &str, update: F) -> Option<Result<Value, String>>
    where
        F: FnOnce(&Value) -> Result<Value, String>,
    {
        let mut slots = self.slots.lock();
        let slot = slots.iter_mut().find(|slot| slot.name == field)?;
        Some(update(&slot.value).map(|next| {
            slot.value = next.clone();
            next
        }))
    }
}

// ─── Capability ──────────────────────────────────────────────────────

/// The operations the verifiers need from a target program.
pub trait HostRuntime: Send + Sync {
    /// Look a type up by qualified name.
    fn locate(&self, name: &QualifiedName) -> Option<Arc<TypeDescriptor>>;

    /// Create an instance. With no `signature` the no-argument constructor
    /// is used; otherwise the declared constructor whose parameter type
    /// names equal `signature` position by position.
    fn construct(
        &self,
        ty: &TypeDescriptor,
        signature: Option<&[String]>,
        args: &[Value],
    ) -> Result<Instance, RuntimeError>;

    /// Invoke a method by name with the given arguments.
    fn invoke(&self, instance: &Instance, method: &str, args: &[Value])
        -> Result<Value, RuntimeError>;

    /// Current values of every field slot of an instance, own and
    /// inherited, each tagged with its declaring type.
    fn field_values(&self, instance: &Instance) -> Result<Vec<FieldValue>, RuntimeError>;
}

impl<R: HostRuntime + ?Sized> HostRuntime for Arc<R> {
    fn locate(&self, name: &QualifiedName) -> Option<Arc<TypeDescriptor>> {
        (**self).locate(name)
    }

    fn construct(
        &self,
        ty: &TypeDescriptor,
        signature: Option<&[String]>,
        args: &[Value],
    ) -> Result<Instance, RuntimeError> {
        (**self).construct(ty, signature, args)
    }

    fn invoke(
        &self,
        instance: &Instance,
        method: &str,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        (**self).invoke(instance, method, args)
    }

    fn field_values(&self, instance: &Instance) -> Result<Vec<FieldValue>, RuntimeError> {
        (**self).field_values(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn slot(name: &str, value: Value) -> FieldValue {
        FieldValue {
            owner: QualifiedName::new("t", "A"),
            name: name.into(),
            value,
        }
    }

    #[test]
    fn test_clones_share_state() {
        let a = Instance::new(QualifiedName::new("t", "A"), vec![slot("n", json!(1))]);
        let b = a.clone();
        b.update("n", |_| Ok(json!(5))).unwrap().unwrap();
        assert_eq!(a.read("n"), Some(json!(5)));
    }

    #[test]
    fn test_update_missing_field() {
        let a = Instance::new(QualifiedName::new("t", "A"), vec![]);
        assert!(a.update("nope", |v| Ok(v.clone())).is_none());
        assert_eq!(a.read("nope"), None);
    }

    #[test]
    fn test_failed_update_keeps_value() {
        let a = Instance::new(QualifiedName::new("t", "A"), vec![slot("n", json!("x"))]);
        let result = a.update("n", |_| Err("boom".into())).unwrap();
        assert_eq!(result, Err("boom".to_string()));
        assert_eq!(a.read("n"), Some(json!("x")));
    }

    #[test]
    fn test_error_display() {
        let err = RuntimeError::NoSuchConstructor {
            type_name: "de.book.Contact".into(),
            signature: "String, int".into(),
        };
        assert_eq!(
            err.to_string(),
            "no constructor of de.book.Contact with parameters (String, int)"
        );
    }
}
