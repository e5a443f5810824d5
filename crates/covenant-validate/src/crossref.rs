//! # Cross-Reference Validator — Foreign Records Must Exist
//!
//! Foreign-record fields form a graph of identifier edges across
//! contracts. This pass confirms every edge lands on an existing record.
//! Only existence matters; the graph may be cyclic and no traversal is
//! needed, so a flat identifier index is sufficient.
//!
//! The full data set is required up front: a referenced record may appear
//! anywhere in the set, including later in its own sequence or in a
//! contract validated afterwards.

use std::collections::HashMap;

use serde_json::Value;

use covenant_core::FieldPath;

use crate::report::FieldViolation;
use crate::set::DataSet;

/// A foreign-record occurrence collected while matching one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignRef {
    /// Path of the referencing field within its record.
    pub path: FieldPath,
    /// The referenced contract's name.
    pub contract: String,
    /// The identifier the field carries.
    pub identifier: String,
}

/// Read-only record resolution, as supplied by a registry or storage
/// layer.
///
/// The engine ships [`RecordIndex`] for the in-memory snapshot case;
/// embedders with their own storage hand in an implementation of this
/// trait instead.
pub trait RecordLookup {
    /// Find the record of `contract` whose identifier equals `identifier`.
    fn lookup(&self, contract: &str, identifier: &str) -> Option<&Value>;
}

/// An immutable identifier index over one data set.
///
/// Built once per validation call, before any lookups happen; afterwards
/// it is only read, so sharing it across parallel record checks needs no
/// synchronization.
#[derive(Debug)]
pub struct RecordIndex<'a> {
    entries: HashMap<(&'a str, &'a str), &'a Value>,
}

impl<'a> RecordIndex<'a> {
    /// Index every record of every contract by its identifier field.
    ///
    /// Records without a string identifier are skipped: they cannot be
    /// the target of a reference, and whatever is wrong with them is the
    /// record validator's finding, not this pass's. When identifiers
    /// collide within a contract the later record wins; identifier
    /// uniqueness is a write-time concern outside this engine.
    pub fn build(data: &'a DataSet, identifier_field: &str) -> Self {
        let mut entries = HashMap::new();
        for (contract, records) in data {
            for record in records {
                if let Some(identifier) = record.get(identifier_field).and_then(Value::as_str) {
                    entries.insert((contract.as_str(), identifier), record);
                }
            }
        }
        Self { entries }
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecordLookup for RecordIndex<'_> {
    fn lookup(&self, contract: &str, identifier: &str) -> Option<&Value> {
        self.entries.get(&(contract, identifier)).copied()
    }
}

/// Check a batch of collected references against a lookup, returning a
/// [`FieldViolation::DanglingReference`] for each that fails to resolve.
pub fn check_references(
    references: &[ForeignRef],
    lookup: &dyn RecordLookup,
) -> Vec<FieldViolation> {
    references
        .iter()
        .filter(|r| lookup.lookup(&r.contract, &r.identifier).is_none())
        .map(|r| FieldViolation::DanglingReference {
            path: r.path.clone(),
            target: r.contract.clone(),
            value: r.identifier.clone(),
        })
        .collect()
}
