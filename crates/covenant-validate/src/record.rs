//! # Record Validator — One Record Against One Contract
//!
//! Checks a single data record against its contract: required properties
//! present, present values type-correct, nothing undeclared smuggled in.
//! All violations are accumulated before returning so callers see the
//! complete defect list in one pass, never just the first failure.

use serde_json::Value;

use covenant_core::{Contract, FieldPath, Property};

use crate::crossref::ForeignRef;
use crate::directive::OPTIONAL_DIRECTIVE;
use crate::matcher::TypeMatcher;
use crate::report::{FieldViolation, ValueKind};
use crate::set::ValidatorConfig;

/// Whether a record must carry this property.
///
/// The declared `required` flag can be suppressed by an `@optional`
/// directive; an optional property that is present is still fully
/// type-checked.
fn is_required(property: &Property) -> bool {
    property.required
        && !property
            .directives
            .iter()
            .any(|d| d.name == OPTIONAL_DIRECTIVE)
}

/// Validate one record against its contract.
///
/// Returns every violation found together with the foreign references
/// encountered during traversal; existence of those references is the
/// cross-reference pass's concern. A record that is not a JSON object
/// yields a single root violation.
pub fn validate_record(
    contract: &Contract,
    record: &Value,
    config: &ValidatorConfig,
) -> (Vec<FieldViolation>, Vec<ForeignRef>) {
    let Some(map) = record.as_object() else {
        return (
            vec![FieldViolation::NotAnObject {
                actual: ValueKind::of(record),
            }],
            Vec::new(),
        );
    };

    let mut matcher = TypeMatcher::new(config);
    for property in contract.properties() {
        match map.get(&property.name) {
            Some(value) => {
                matcher.match_value(&property.ty, value, &FieldPath::field(&property.name));
            }
            None if is_required(property) => matcher.report(FieldViolation::MissingRequiredField {
                path: FieldPath::field(&property.name),
            }),
            None => {}
        }
    }

    if config.strict {
        for key in map.keys() {
            if contract.property(key).is_none() {
                matcher.report(FieldViolation::UnexpectedField {
                    path: FieldPath::field(key),
                });
            }
        }
    }

    matcher.finish()
}
