//! # Field Resolver — Schema-Side Path Resolution
//!
//! Walks dotted field paths through a contract's property shapes. Index
//! declarations and directive arguments both name fields by path; this
//! module decides whether such a path actually exists and what type it
//! lands on. Only schema shape is consulted, never data.

use covenant_core::{Contract, Type};

/// A path that failed to resolve, with the first offending segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedPath {
    /// The full path as written in the schema.
    pub path: Vec<String>,
    /// The first segment that did not name a field.
    pub segment: String,
}

/// Resolve a dotted field path against a contract's properties.
///
/// The first segment must name a property; each further segment descends
/// into `Object` fields. Resolution fails on the first segment that does
/// not name a field, including segments that try to descend into a
/// non-object type. An empty path never resolves.
pub fn resolve<'c>(contract: &'c Contract, path: &[String]) -> Result<&'c Type, UnresolvedPath> {
    let unresolved = |segment: &str| UnresolvedPath {
        path: path.to_vec(),
        segment: segment.to_string(),
    };

    let mut segments = path.iter();
    let first = segments.next().ok_or_else(|| unresolved(""))?;
    let property = contract.property(first).ok_or_else(|| unresolved(first))?;

    let mut current = &property.ty;
    for segment in segments {
        let Type::Object { fields } = current else {
            return Err(unresolved(segment));
        };
        match fields.iter().find(|f| f.name == *segment) {
            Some(field) => current = &field.ty,
            None => return Err(unresolved(segment)),
        }
    }
    Ok(current)
}
