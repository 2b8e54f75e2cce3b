//! # sck-introspect — Target Program Introspection
//!
//! The verifiers ask two kinds of questions of a target program:
//!
//! - **What is declared?** Answered by [`TypeDescriptor`], reflection as
//!   plain data, and the [`Introspect`] trait that gives the matcher one view
//!   of fields, constructors and methods.
//! - **What does it do?** Answered by the [`HostRuntime`] capability:
//!   locate a type by name, construct it, invoke a method by name, read back
//!   field values.
//!
//! [`InMemoryProgram`] implements both from a JSON/YAML program manifest.
//! Bindings to a real foreign runtime implement [`HostRuntime`] themselves.
//!
//! ## Crate Policy
//!
//! - Depends only on `sck-core` internally.
//! - Host errors are values ([`RuntimeError`], [`IntrospectionError`]);
//!   nothing here panics on target behavior.

pub mod behavior;
pub mod descriptor;
pub mod element;
pub mod program;
pub mod runtime;

pub use behavior::MethodBehavior;
pub use descriptor::{
    ConstructorDescriptor, FieldDescriptor, MethodDescriptor, TypeDescriptor, TypeRef,
};
pub use element::{ElementView, Introspect, IntrospectionError, MemberKind};
pub use program::{InMemoryProgram, ManifestError, ManifestFormat};
pub use runtime::{FieldValue, HostRuntime, Instance, RuntimeError};
