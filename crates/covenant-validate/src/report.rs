//! # Validation Report — Structured Failure Accounting
//!
//! Every defect the engine finds is collected into a [`ValidationReport`];
//! nothing is thrown as control flow, and validation always runs to
//! completion. The caller receives either `Ok(())` or a report that
//! itemizes every violation, grouped by contract and record.
//!
//! ## Taxonomy
//!
//! - [`SchemaViolation`] — the schema itself is inconsistent (duplicate
//!   names, unresolved paths, unknown directives, bad index fields).
//!   Contracts with schema violations are skipped for data validation.
//! - [`FieldViolation`] — a record disagrees with its contract: missing
//!   or unexpected fields, type mismatches, dangling foreign references.
//! - Undeclared contracts — the data set carries records for a contract
//!   the schema does not declare. Reported, never silently dropped.

use std::fmt;

use thiserror::Error;

use covenant_core::FieldPath;

/// The dynamic kind of a runtime JSON value, for expected-vs-actual
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// JSON `null`.
    Null,
    /// JSON `true`/`false`.
    Boolean,
    /// JSON number.
    Number,
    /// JSON string.
    String,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl ValueKind {
    /// Classify a runtime value.
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(_) => Self::Boolean,
            serde_json::Value::Number(_) => Self::Number,
            serde_json::Value::String(_) => Self::String,
            serde_json::Value::Array(_) => Self::Array,
            serde_json::Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(s)
    }
}

/// Where a directive is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Attached to the contract itself.
    Contract,
    /// Attached to a property.
    Property,
    /// Attached to a method.
    Method,
    /// Attached to a method parameter.
    Parameter,
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Contract => "contract",
            Self::Property => "property",
            Self::Method => "method",
            Self::Parameter => "parameter",
        };
        f.write_str(s)
    }
}

/// A defect in the schema itself. No meaningful data validation is
/// possible against a contract carrying one of these, so the engine
/// records the violation and skips the contract's records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    /// Two contracts in the schema set share a name.
    #[error("contract '{name}' is declared more than once")]
    DuplicateContract {
        /// The colliding contract name.
        name: String,
    },

    /// Two properties of one contract share a name.
    #[error("property '{name}' is declared more than once")]
    DuplicateProperty {
        /// The colliding property name.
        name: String,
    },

    /// An index field path does not resolve within the contract.
    #[error("path '{path}' does not resolve: no field named '{segment}'")]
    UnresolvedPath {
        /// The dotted path as written in the schema.
        path: String,
        /// The first segment that failed to resolve.
        segment: String,
    },

    /// An index field path resolves to a composite type.
    #[error("index field '{path}' must be scalar, but resolves to {actual}")]
    NonScalarIndexField {
        /// The dotted path as written in the schema.
        path: String,
        /// Label of the composite type found there.
        actual: String,
    },

    /// A directive name is not recognized for its attachment point.
    #[error("unknown directive '@{name}' on {attachment}")]
    UnknownDirective {
        /// The directive name, without `@`.
        name: String,
        /// Where it was attached.
        attachment: AttachmentKind,
    },

    /// A directive argument path does not resolve within the contract.
    #[error(
        "argument '{path}' of directive '@{directive}' does not resolve: \
         no field named '{segment}'"
    )]
    InvalidDirectiveArgument {
        /// The directive name, without `@`.
        directive: String,
        /// The dotted argument path as written.
        path: String,
        /// The first segment that failed to resolve.
        segment: String,
    },

    /// A directive received the wrong number of arguments.
    #[error("directive '@{directive}' takes {expected} arguments, got {actual}")]
    DirectiveArgumentCount {
        /// The directive name, without `@`.
        directive: String,
        /// Human-readable arity, e.g. `exactly 0` or `at least 1`.
        expected: String,
        /// How many arguments were supplied.
        actual: usize,
    },

    /// A foreign-record type names a contract absent from the schema set.
    #[error("field '{path}' references unknown contract '{contract}'")]
    UnknownForeignContract {
        /// Dotted path of the referencing field.
        path: String,
        /// The missing contract name.
        contract: String,
    },
}

/// A defect in one data record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldViolation {
    /// A required property is absent from the record.
    #[error("missing required field '{path}'")]
    MissingRequiredField {
        /// Path of the absent field.
        path: FieldPath,
    },

    /// The record carries a field the contract does not declare.
    #[error("unexpected field '{path}' is not declared by the contract")]
    UnexpectedField {
        /// Path of the undeclared field.
        path: FieldPath,
    },

    /// A value does not match its declared type.
    #[error("field '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        /// Path of the mismatched value.
        path: FieldPath,
        /// Label of the declared type.
        expected: String,
        /// Dynamic kind of the value found.
        actual: ValueKind,
    },

    /// The record itself is not a keyed mapping.
    #[error("record is not an object, got {actual}")]
    NotAnObject {
        /// Dynamic kind of the record value.
        actual: ValueKind,
    },

    /// A foreign-record value names an identifier that does not exist
    /// among the target contract's records.
    #[error("field '{path}' references {target} record '{value}', which does not exist")]
    DanglingReference {
        /// Path of the referencing field.
        path: FieldPath,
        /// The referenced contract name.
        target: String,
        /// The identifier that failed to resolve.
        value: String,
    },
}

/// All schema violations for one contract.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractSchemaErrors {
    /// The contract name.
    pub contract: String,
    /// Every schema violation found, in discovery order.
    pub violations: Vec<SchemaViolation>,
}

/// All violations for one data record, keyed by contract and position.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordErrors {
    /// The contract the record belongs to.
    pub contract: String,
    /// Zero-based position within the contract's record sequence.
    pub index: usize,
    /// The record's identifier field value, when present and a string.
    pub identifier: Option<String>,
    /// Every violation found, in discovery order.
    pub violations: Vec<FieldViolation>,
}

/// The full outcome of validating a data set.
///
/// A report is complete by construction: validation never stops at the
/// first failure and never truncates. `validate` returns the report as
/// the `Err` arm, so an empty report is never observed by callers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationReport {
    /// Contracts whose schema failed compilation, with their violations.
    pub schema_errors: Vec<ContractSchemaErrors>,
    /// Contract names present in the data set but absent from the schema.
    pub undeclared_contracts: Vec<String>,
    /// Per-record violations, grouped by contract and record position.
    pub record_errors: Vec<RecordErrors>,
}

impl ValidationReport {
    /// Whether the report contains no violations at all.
    pub fn is_empty(&self) -> bool {
        self.schema_errors.is_empty()
            && self.undeclared_contracts.is_empty()
            && self.record_errors.is_empty()
    }

    /// Total number of individual violations across all groups.
    pub fn total_violations(&self) -> usize {
        self.schema_errors
            .iter()
            .map(|c| c.violations.len())
            .sum::<usize>()
            + self.undeclared_contracts.len()
            + self
                .record_errors
                .iter()
                .map(|r| r.violations.len())
                .sum::<usize>()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first_section = true;

        if !self.schema_errors.is_empty() {
            first_section = false;
            writeln!(f, "schema errors:")?;
            for contract in &self.schema_errors {
                writeln!(f, "  contract '{}':", contract.contract)?;
                for violation in &contract.violations {
                    writeln!(f, "    {violation}")?;
                }
            }
        }

        if !self.undeclared_contracts.is_empty() {
            if !first_section {
                writeln!(f)?;
            }
            first_section = false;
            writeln!(f, "undeclared contracts in data set:")?;
            for name in &self.undeclared_contracts {
                writeln!(f, "  '{name}'")?;
            }
        }

        if !self.record_errors.is_empty() {
            if !first_section {
                writeln!(f)?;
            }
            writeln!(f, "record errors:")?;
            for record in &self.record_errors {
                match &record.identifier {
                    Some(id) => writeln!(
                        f,
                        "  '{}' record {} (id '{id}'):",
                        record.contract, record.index
                    )?,
                    None => writeln!(f, "  '{}' record {}:", record.contract, record.index)?,
                }
                for violation in &record.violations {
                    writeln!(f, "    {violation}")?;
                }
            }
        }

        Ok(())
    }
}

impl std::error::Error for ValidationReport {}
