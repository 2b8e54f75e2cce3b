//! # sck-schema — Expected Structure Documents
//!
//! Loads the declarative description of expected program shape and exposes
//! it as an immutable, ordered list of expected classes.
//!
//! ## Document Layout
//!
//! A structure document is an array of class entries. Each entry has a
//! mandatory `class` object (`name`, `package`, optional `superclass`,
//! `isInterface`, `isEnum`, `isAbstract`) and optional sibling arrays
//! `enumValues`, `constructors`, `attributes`, `methods`. Every member field
//! is optional and defaults to empty.
//!
//! ```json
//! [
//!   {
//!     "class": { "name": "Contact", "package": "de.book" },
//!     "attributes": [{ "name": "age", "type": "int", "modifiers": ["final"] }],
//!     "methods": [{ "name": "getAge", "returnType": "int" }]
//!   }
//! ]
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `sck-core` internally.
//! - Loading is a trust boundary: malformed documents are rejected whole,
//!   with every violation and its JSON pointer.

pub mod loader;
pub mod model;

pub use loader::{DocumentFormat, SchemaError, SchemaLoader, Violation, Violations};
pub use model::{
    ExpectedClass, ExpectedConstructor, ExpectedField, ExpectedMethod, StructureSchema,
};
