//! # covenant-validate — The Contract Validation Engine
//!
//! Validates data records against Covenant contract schemas before they
//! are accepted into a data store. Given a parsed schema (from
//! `covenant-core`) and a data set, the engine decides whether every
//! record structurally and semantically conforms, and if not, reports
//! precisely what failed.
//!
//! ## Security Invariant
//!
//! Validation is a trust boundary. Records that fail validation must be
//! rejected with structured error information: the field path, the
//! violation kind, and the expected vs actual shape. Validation always
//! runs to completion; the caller receives either `Ok` or a complete,
//! never-truncated [`ValidationReport`].
//!
//! ## Passes
//!
//! - [`matcher`] — structural conformance of one value to one type.
//! - [`resolve`] — schema-side resolution of dotted field paths.
//! - [`directive`] — structural legality of directive annotations.
//! - [`record`] — one record against one contract, all violations
//!   accumulated.
//! - [`crossref`] — foreign-record references must land on existing
//!   records; backed by an immutable identifier index.
//! - [`set`] — the entry point: compile a schema once, validate whole
//!   data sets, merge everything into one report.
//!
//! ## Crate Policy
//!
//! - Pure and stateless per call: no interior caches, no I/O, no shared
//!   mutable state. A [`SetValidator`] is an immutable compiled handle.
//! - Storage is someone else's job. Foreign-record resolution consumes
//!   the [`RecordLookup`] seam; the in-memory [`RecordIndex`] is the
//!   engine's own implementation of it.
//! - No `unwrap()`/`expect()` outside tests.

pub mod crossref;
pub mod directive;
pub mod matcher;
pub mod record;
pub mod report;
pub mod resolve;
pub mod set;

pub use crossref::{check_references, ForeignRef, RecordIndex, RecordLookup};
pub use directive::{Arity, DirectiveRegistry, DirectiveSpec, BUILTIN_DIRECTIVES};
pub use matcher::TypeMatcher;
pub use record::validate_record;
pub use report::{
    AttachmentKind, ContractSchemaErrors, FieldViolation, RecordErrors, SchemaViolation,
    ValidationReport, ValueKind,
};
pub use resolve::{resolve, UnresolvedPath};
pub use set::{validate_set, DataSet, SetValidator, ValidatorConfig};
