//! # sck-verify — Structural and Behavioral Verification
//!
//! Produces [`DiagnosticUnit`]s: named, deferred, independently reportable
//! checks of a target program against an expected structure.
//!
//! - [`matcher`]: the element-matching policy (one function per element
//!   kind, with annotation and modifier rules kept separate).
//! - [`structure`]: class, attribute, constructor and method units built
//!   from a [`sck_schema::StructureSchema`].
//! - [`behavior`]: getter and setter units that construct the target and
//!   invoke accessors by name; behavior plans.
//! - [`accessor`]: accessor naming and sample values.
//! - [`report`]: the reference suite runner.
//!
//! ## Crate Policy
//!
//! - Verification never mutates the schema. Matching state lives in
//!   per-pass index sets.
//! - Nothing propagates out of a unit: host errors become failures, and
//!   panics are caught at the unit boundary.

pub mod accessor;
pub mod behavior;
pub mod diagnostic;
pub mod matcher;
pub mod report;
pub mod structure;

pub use behavior::{AccessorCheck, BehaviorPlan, BehavioralAssembler, ConstructorCall, PlanError};
pub use diagnostic::{Category, DiagnosticUnit, Outcome, Thunk};
pub use report::{Summary, SuiteReport, UnitReport, UnitStatus};
pub use structure::{MatchPass, StructuralVerifier};
