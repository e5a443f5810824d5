//! # covenant-core — Contract AST for the Covenant Schema Language
//!
//! This crate is the foundation of the Covenant workspace. It defines the
//! abstract syntax tree the schema compiler produces: contracts with typed
//! properties, secondary indexes, method signatures, and directives, built
//! on a closed type algebra.
//!
//! ## Key Design Principles
//!
//! 1. **Closed type algebra.** [`Type`] is a tagged enum with one variant
//!    per shape. Consumers match exhaustively; adding a shape is a
//!    compile-time event for every consumer, never a silent runtime hole.
//!
//! 2. **Structural restrictions by construction.** Arrays carry a
//!    [`Primitive`] element and map keys are [`Primitive`], so "array of
//!    objects" or "object-keyed map" cannot even be represented.
//!
//! 3. **Wire-compatible with the compiler.** Every polymorphic node is
//!    `kind`-tagged for serde, deserializing the compiler's JSON output
//!    directly (`{"kind": "contract", ...}`).
//!
//! 4. **No logic.** This crate describes schemas; it never inspects data.
//!    Validation lives in `covenant-validate`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `covenant-*` crates (this is the leaf of
//!   the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod contract;
pub mod path;
pub mod types;

// Re-export primary types for ergonomic imports.
pub use contract::{
    Contract, ContractAttribute, Directive, FieldReference, Index, IndexField,
    IndexFieldDirection, Method, MethodAttribute, Namespace, Parameter, Property, ReturnValue,
};
pub use path::{dotted, FieldPath, PathSegment};
pub use types::{MapValue, ObjectField, Primitive, PrimitiveKind, Type};
