//! # Set Validator — The Entry Point
//!
//! Orchestrates everything: compile the schema once into an immutable
//! validator handle, then validate whole data sets against it. Schema
//! compilation finds every internal inconsistency (duplicate names,
//! unknown directives, bad index paths, references to undeclared
//! contracts); data validation runs the record and cross-reference
//! passes and merges every finding into one [`ValidationReport`].
//!
//! ## Invariant
//!
//! Validation always runs to completion. A contract with a broken schema
//! is skipped for data validation, because no meaningful check is
//! possible against it, but its schema violations still appear in the
//! report. Nothing is ever silently dropped or truncated.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;
use tracing::debug;

use covenant_core::{dotted, Contract, MapValue, Type};

use crate::crossref::{check_references, RecordIndex};
use crate::directive::DirectiveRegistry;
use crate::record::validate_record;
use crate::report::{
    AttachmentKind, ContractSchemaErrors, RecordErrors, SchemaViolation, ValidationReport,
};
use crate::resolve::resolve;

/// A data set: contract name to its ordered record sequence.
///
/// The whole set is validated together so cross-references can resolve
/// regardless of declaration order.
pub type DataSet = BTreeMap<String, Vec<Value>>;

/// Policy knobs for a validation run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Reject record and object keys the schema does not declare.
    /// Relaxing this tolerates additive drift instead of reporting it.
    pub strict: bool,
    /// Name of the field holding a record's identifier, the target of
    /// foreign-record resolution.
    pub identifier_field: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            strict: true,
            identifier_field: "id".to_string(),
        }
    }
}

/// A compiled schema, ready to validate data sets.
///
/// Construction walks every contract once and records all schema
/// violations; the handle is immutable afterwards and holds no other
/// state, so it can be reused and shared freely across calls and
/// threads.
#[derive(Debug)]
pub struct SetValidator<'a> {
    contracts: BTreeMap<&'a str, &'a Contract>,
    schema_errors: BTreeMap<&'a str, Vec<SchemaViolation>>,
    config: ValidatorConfig,
}

impl<'a> SetValidator<'a> {
    /// Compile a schema with the built-in directive vocabulary.
    pub fn new(schema: &'a [Contract], config: ValidatorConfig) -> Self {
        Self::with_registry(schema, config, &DirectiveRegistry::builtin())
    }

    /// Compile a schema against a caller-supplied directive registry.
    pub fn with_registry(
        schema: &'a [Contract],
        config: ValidatorConfig,
        registry: &DirectiveRegistry,
    ) -> Self {
        let mut contracts: BTreeMap<&str, &Contract> = BTreeMap::new();
        let mut schema_errors: BTreeMap<&str, Vec<SchemaViolation>> = BTreeMap::new();

        for contract in schema {
            if contracts.insert(contract.name.as_str(), contract).is_some() {
                schema_errors
                    .entry(contract.name.as_str())
                    .or_default()
                    .push(SchemaViolation::DuplicateContract {
                        name: contract.name.clone(),
                    });
            }
        }

        let known_names: HashSet<&str> = contracts.keys().copied().collect();
        for contract in schema {
            let violations = compile_contract(contract, &known_names, registry);
            if !violations.is_empty() {
                debug!(
                    contract = %contract.name,
                    count = violations.len(),
                    "schema compilation found violations"
                );
                schema_errors
                    .entry(contract.name.as_str())
                    .or_default()
                    .extend(violations);
            }
        }

        Self {
            contracts,
            schema_errors,
            config,
        }
    }

    /// The configuration this validator was built with.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Whether a contract compiled cleanly and will have its data
    /// validated.
    pub fn schema_is_valid(&self, contract: &str) -> bool {
        self.contracts.contains_key(contract) && !self.schema_errors.contains_key(contract)
    }

    /// Validate a whole data set.
    ///
    /// Returns `Ok(())` only when the schema compiled cleanly, every
    /// record conforms, and every foreign reference resolves. Otherwise
    /// the complete report is the error value.
    pub fn validate(&self, data: &DataSet) -> Result<(), ValidationReport> {
        let mut report = ValidationReport::default();

        for (contract, violations) in &self.schema_errors {
            report.schema_errors.push(ContractSchemaErrors {
                contract: contract.to_string(),
                violations: violations.clone(),
            });
        }

        let index = RecordIndex::build(data, &self.config.identifier_field);
        debug!(records = index.len(), "record index built");

        for (contract_name, records) in data {
            let Some(contract) = self.contracts.get(contract_name.as_str()).copied() else {
                report.undeclared_contracts.push(contract_name.clone());
                continue;
            };
            if self.schema_errors.contains_key(contract_name.as_str()) {
                debug!(contract = %contract_name, "skipping data validation for broken schema");
                continue;
            }

            for (i, record) in records.iter().enumerate() {
                let (mut violations, references) = validate_record(contract, record, &self.config);
                violations.extend(check_references(&references, &index));
                if !violations.is_empty() {
                    report.record_errors.push(RecordErrors {
                        contract: contract_name.clone(),
                        index: i,
                        identifier: record
                            .get(&self.config.identifier_field)
                            .and_then(Value::as_str)
                            .map(str::to_owned),
                        violations,
                    });
                }
            }
        }

        debug!(total = report.total_violations(), "validation complete");
        if report.is_empty() {
            Ok(())
        } else {
            Err(report)
        }
    }
}

/// Validate a data set against a schema with the default configuration.
///
/// The one-call form of [`SetValidator`]; compile once and reuse the
/// handle when validating repeatedly against the same schema.
pub fn validate_set(schema: &[Contract], data: &DataSet) -> Result<(), ValidationReport> {
    SetValidator::new(schema, ValidatorConfig::default()).validate(data)
}

/// All schema-level checks for one contract.
fn compile_contract(
    contract: &Contract,
    known_names: &HashSet<&str>,
    registry: &DirectiveRegistry,
) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();

    // Property names must be unique.
    let mut seen = HashSet::new();
    for property in contract.properties() {
        if !seen.insert(property.name.as_str()) {
            violations.push(SchemaViolation::DuplicateProperty {
                name: property.name.clone(),
            });
        }
    }

    for directive in contract.directives() {
        violations.extend(registry.check(directive, contract, AttachmentKind::Contract));
    }

    for property in contract.properties() {
        for directive in &property.directives {
            violations.extend(registry.check(directive, contract, AttachmentKind::Property));
        }
        let mut path = vec![property.name.clone()];
        collect_unknown_contracts(&property.ty, &mut path, known_names, &mut violations);
    }

    for method in contract.methods() {
        for directive in method.directives() {
            violations.extend(registry.check(directive, contract, AttachmentKind::Method));
        }
        for parameter in method.parameters() {
            for directive in &parameter.directives {
                violations.extend(registry.check(directive, contract, AttachmentKind::Parameter));
            }
            let mut path = vec![method.name.clone(), parameter.name.clone()];
            collect_unknown_contracts(&parameter.ty, &mut path, known_names, &mut violations);
        }
        if let Some(ret) = method.return_value() {
            let mut path = vec![method.name.clone(), ret.name.clone()];
            collect_unknown_contracts(&ret.ty, &mut path, known_names, &mut violations);
        }
    }

    for index in contract.indexes() {
        for field in &index.fields {
            match resolve(contract, &field.field_path) {
                Ok(ty) if !ty.is_scalar() => violations.push(SchemaViolation::NonScalarIndexField {
                    path: dotted(&field.field_path),
                    actual: ty.label(),
                }),
                Ok(_) => {}
                Err(err) => violations.push(SchemaViolation::UnresolvedPath {
                    path: dotted(&field.field_path),
                    segment: err.segment,
                }),
            }
        }
    }

    violations
}

/// Walk a type tree for foreign-record references to contracts the
/// schema set does not declare.
fn collect_unknown_contracts(
    ty: &Type,
    path: &mut Vec<String>,
    known_names: &HashSet<&str>,
    violations: &mut Vec<SchemaViolation>,
) {
    match ty {
        Type::ForeignRecord { contract } => {
            if !known_names.contains(contract.as_str()) {
                violations.push(SchemaViolation::UnknownForeignContract {
                    path: dotted(path),
                    contract: contract.clone(),
                });
            }
        }
        Type::Map {
            value: MapValue::ForeignRecord { contract },
            ..
        } => {
            if !known_names.contains(contract.as_str()) {
                violations.push(SchemaViolation::UnknownForeignContract {
                    path: dotted(path),
                    contract: contract.clone(),
                });
            }
        }
        Type::Object { fields } => {
            for field in fields {
                path.push(field.name.clone());
                collect_unknown_contracts(&field.ty, path, known_names, violations);
                path.pop();
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(value: Value) -> Vec<Contract> {
        serde_json::from_value(value).unwrap()
    }

    fn user_and_post() -> Vec<Contract> {
        schema(json!([
            {
                "namespace": {"value": "org.example"},
                "name": "User",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                ],
            },
            {
                "namespace": {"value": "org.example"},
                "name": "Post",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                    {
                        "kind": "property",
                        "name": "author",
                        "type": {"kind": "foreignrecord", "contract": "User"},
                    },
                ],
            },
        ]))
    }

    fn data(value: Value) -> DataSet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_conforming_set() {
        let schema = user_and_post();
        let data = data(json!({
            "User": [{"id": "u1"}],
            "Post": [{"id": "p1", "author": "u1"}],
        }));
        assert!(validate_set(&schema, &data).is_ok());
    }

    #[test]
    fn test_dangling_reference() {
        let schema = user_and_post();
        let data = data(json!({
            "User": [{"id": "u1"}],
            "Post": [{"id": "p1", "author": "u2"}],
        }));
        let report = validate_set(&schema, &data).unwrap_err();
        assert_eq!(report.record_errors.len(), 1);
        let record = &report.record_errors[0];
        assert_eq!(record.contract, "Post");
        assert_eq!(record.index, 0);
        assert_eq!(record.identifier.as_deref(), Some("p1"));
        assert!(record.violations[0]
            .to_string()
            .contains("references User record 'u2'"));
    }

    #[test]
    fn test_undeclared_contract_in_data() {
        let schema = user_and_post();
        let data = data(json!({
            "User": [{"id": "u1"}],
            "Ghost": [{"id": "g1"}],
        }));
        let report = validate_set(&schema, &data).unwrap_err();
        assert_eq!(report.undeclared_contracts, vec!["Ghost".to_string()]);
    }

    #[test]
    fn test_broken_schema_skips_data_but_reports() {
        let schema = schema(json!([
            {
                "namespace": {"value": "org.example"},
                "name": "Bad",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "number"},
                    },
                ],
            },
        ]));
        // The record would also fail data validation; it must NOT be
        // reported, because its contract never compiled.
        let data = data(json!({"Bad": [{"id": 42}]}));
        let report = SetValidator::new(&schema, ValidatorConfig::default())
            .validate(&data)
            .unwrap_err();
        assert_eq!(report.schema_errors.len(), 1);
        assert!(matches!(
            &report.schema_errors[0].violations[0],
            SchemaViolation::DuplicateProperty { name } if name == "id"
        ));
        assert!(report.record_errors.is_empty());
    }

    #[test]
    fn test_duplicate_contract_names() {
        let mut contracts = user_and_post();
        contracts.push(contracts[0].clone());
        let validator = SetValidator::new(&contracts, ValidatorConfig::default());
        assert!(!validator.schema_is_valid("User"));
        assert!(validator.schema_is_valid("Post"));
    }

    #[test]
    fn test_unknown_foreign_contract_in_schema() {
        let schema = schema(json!([
            {
                "namespace": {"value": "org.example"},
                "name": "Post",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                    {
                        "kind": "property",
                        "name": "author",
                        "type": {"kind": "foreignrecord", "contract": "User"},
                    },
                ],
            },
        ]));
        let report = validate_set(&schema, &BTreeMap::new()).unwrap_err();
        assert!(matches!(
            &report.schema_errors[0].violations[0],
            SchemaViolation::UnknownForeignContract { contract, path }
                if contract == "User" && path == "author"
        ));
    }

    #[test]
    fn test_nested_foreign_contract_path() {
        let schema = schema(json!([
            {
                "namespace": {"value": "org.example"},
                "name": "Team",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                    {
                        "kind": "property",
                        "name": "lead",
                        "type": {
                            "kind": "object",
                            "fields": [
                                {"name": "member", "type": {"kind": "foreignrecord", "contract": "Nobody"}},
                            ],
                        },
                    },
                ],
            },
        ]));
        let report = validate_set(&schema, &BTreeMap::new()).unwrap_err();
        assert!(matches!(
            &report.schema_errors[0].violations[0],
            SchemaViolation::UnknownForeignContract { path, .. } if path == "lead.member"
        ));
    }

    #[test]
    fn test_index_checks() {
        let schema = schema(json!([
            {
                "namespace": {"value": "org.example"},
                "name": "Doc",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                    {
                        "kind": "property",
                        "name": "meta",
                        "type": {
                            "kind": "object",
                            "fields": [
                                {"name": "rank", "type": {"kind": "primitive", "value": "number"}},
                            ],
                        },
                    },
                    {
                        "kind": "index",
                        "fields": [
                            {"direction": "asc", "fieldPath": ["meta", "rank"]},
                            {"direction": "desc", "fieldPath": ["meta"]},
                            {"direction": "asc", "fieldPath": ["ghost"]},
                        ],
                    },
                ],
            },
        ]));
        let report = validate_set(&schema, &BTreeMap::new()).unwrap_err();
        let violations = &report.schema_errors[0].violations;
        assert_eq!(violations.len(), 2, "{violations:?}");
        assert!(violations.iter().any(|v| matches!(
            v,
            SchemaViolation::NonScalarIndexField { path, .. } if path == "meta"
        )));
        assert!(violations.iter().any(|v| matches!(
            v,
            SchemaViolation::UnresolvedPath { path, .. } if path == "ghost"
        )));
    }

    #[test]
    fn test_method_signature_checks() {
        let schema = schema(json!([
            {
                "namespace": {"value": "org.example"},
                "name": "Account",
                "attributes": [
                    {
                        "kind": "property",
                        "name": "id",
                        "type": {"kind": "primitive", "value": "string"},
                    },
                    {
                        "kind": "method",
                        "name": "transfer",
                        "code": "/* opaque */",
                        "attributes": [
                            {
                                "kind": "directive",
                                "name": "call",
                                "arguments": [
                                    {"kind": "fieldreference", "path": ["missing"]},
                                ],
                            },
                            {
                                "kind": "parameter",
                                "name": "to",
                                "type": {"kind": "foreignrecord", "contract": "Nowhere"},
                                "required": true,
                            },
                        ],
                    },
                ],
            },
        ]));
        let report = validate_set(&schema, &BTreeMap::new()).unwrap_err();
        let violations = &report.schema_errors[0].violations;
        assert!(violations
            .iter()
            .any(|v| matches!(v, SchemaViolation::InvalidDirectiveArgument { .. })));
        assert!(violations.iter().any(|v| matches!(
            v,
            SchemaViolation::UnknownForeignContract { path, .. } if path == "transfer.to"
        )));
    }

    #[test]
    fn test_contract_without_records_is_fine() {
        let schema = user_and_post();
        let data = data(json!({"User": [{"id": "u1"}]}));
        assert!(validate_set(&schema, &data).is_ok());
    }

    #[test]
    fn test_empty_everything() {
        assert!(validate_set(&[], &BTreeMap::new()).is_ok());
    }
}
