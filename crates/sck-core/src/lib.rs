//! # sck-core — Shared Vocabulary for the Structure Conformance Kit
//!
//! Every other crate in the workspace depends on `sck-core`; it depends on
//! nothing internal. It defines the small set of primitives that the schema
//! model, the host introspection layer, and the verifiers must agree on.
//!
//! ## Key Design Principles
//!
//! 1. **Qualified names are values, not strings.** `QualifiedName` splits a
//!    `package.Type` identifier once, so lookups and messages never re-parse.
//!
//! 2. **One `TypeKind` enum.** Schema kind flags and introspected type kinds
//!    are compared through the same four variants.
//!
//! 3. **Modifiers and annotations are opaque labels.** No vocabulary is
//!    validated here; `modifier_string` only fixes the rendering order.
//!
//! 4. **Non-fatal failures are data.** `CheckFailure` is what a diagnostic
//!    unit reports. It is never propagated with `?` across a unit boundary.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sck-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod kind;
pub mod names;

pub use error::{CheckFailure, FailureKind};
pub use kind::TypeKind;
pub use names::{modifier_string, simple_type_name, NameError, QualifiedName};
