//! # Type Matcher — Structural Conformance of Values
//!
//! Decides whether a runtime value conforms to a declared type. Pure and
//! recursive; the matcher never consults the data set or any registry, so
//! foreign-record values are only shape-checked here and remembered for
//! the cross-reference pass.
//!
//! ## Encoding Conventions
//!
//! These are fixed once, here:
//!
//! - `bytes` values travel as standard padded base64 text.
//! - Public keys are JWK objects for secp256k1 signing keys with exactly
//!   the members `kty`, `crv`, `alg`, `use`, `x`, `y`, where `x`/`y` are
//!   base64url-encoded 32-byte coordinates.
//! - A foreign-record value carries the target record's identifier,
//!   either as a bare string or as an object exposing the identifier
//!   field.
//!
//! No coercion anywhere: a numeric string never satisfies `number`.

use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde_json::Value;

use covenant_core::{FieldPath, MapValue, ObjectField, Primitive, PrimitiveKind, Type};

use crate::crossref::ForeignRef;
use crate::report::{FieldViolation, ValueKind};
use crate::set::ValidatorConfig;

/// Matches values against declared types, accumulating every violation
/// rather than stopping at the first.
///
/// One matcher instance covers one record; [`TypeMatcher::finish`] yields
/// the collected violations together with the foreign references
/// encountered, which the caller hands to the cross-reference pass.
pub struct TypeMatcher<'a> {
    config: &'a ValidatorConfig,
    violations: Vec<FieldViolation>,
    references: Vec<ForeignRef>,
}

impl<'a> TypeMatcher<'a> {
    /// Create a matcher using the given policy configuration.
    pub fn new(config: &'a ValidatorConfig) -> Self {
        Self {
            config,
            violations: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Record a violation found outside type matching proper (the record
    /// validator uses this for missing and unexpected fields).
    pub fn report(&mut self, violation: FieldViolation) {
        self.violations.push(violation);
    }

    /// Consume the matcher, yielding all violations and the foreign
    /// references seen during traversal.
    pub fn finish(self) -> (Vec<FieldViolation>, Vec<ForeignRef>) {
        (self.violations, self.references)
    }

    /// Check `value` against `ty`, accumulating violations under `path`.
    ///
    /// Never panics on well-formed schemas; malformed data only ever
    /// produces violations.
    pub fn match_value(&mut self, ty: &Type, value: &Value, path: &FieldPath) {
        match ty {
            Type::Primitive { value: kind } => {
                if !primitive_matches(*kind, value) {
                    self.mismatch(kind.to_string(), value, path);
                }
            }
            Type::Array { element } => self.match_array(*element, value, path),
            Type::Map { key, value: val_ty } => self.match_map(*key, val_ty, value, path),
            Type::Object { fields } => self.match_object(fields, value, path),
            Type::ForeignRecord { contract } => self.match_foreign_record(contract, value, path),
            Type::PublicKey => {
                if !public_key_matches(value) {
                    self.mismatch("PublicKey".to_string(), value, path);
                }
            }
        }
    }

    fn match_array(&mut self, element: Primitive, value: &Value, path: &FieldPath) {
        let Some(items) = value.as_array() else {
            self.mismatch(format!("{}[]", element.value), value, path);
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if !primitive_matches(element.value, item) {
                self.mismatch(element.value.to_string(), item, &path.at_index(i));
            }
        }
    }

    fn match_map(&mut self, key: Primitive, val_ty: &MapValue, value: &Value, path: &FieldPath) {
        let Some(entries) = value.as_object() else {
            let label = Type::Map {
                key,
                value: val_ty.clone(),
            }
            .label();
            self.mismatch(label, value, path);
            return;
        };
        for (k, v) in entries {
            if !key_matches(key.value, k) {
                self.violations.push(FieldViolation::TypeMismatch {
                    path: path.at_key(k),
                    expected: format!("{} map key", key.value),
                    actual: ValueKind::String,
                });
            }
            match val_ty {
                MapValue::Primitive { value: kind } => {
                    if !primitive_matches(*kind, v) {
                        self.mismatch(kind.to_string(), v, &path.at_key(k));
                    }
                }
                MapValue::ForeignRecord { contract } => {
                    self.match_foreign_record(contract, v, &path.at_key(k));
                }
            }
        }
    }

    fn match_object(&mut self, fields: &[ObjectField], value: &Value, path: &FieldPath) {
        let Some(map) = value.as_object() else {
            self.mismatch("object".to_string(), value, path);
            return;
        };
        for field in fields {
            match map.get(&field.name) {
                Some(v) => self.match_value(&field.ty, v, &path.child(&field.name)),
                None if field.required => self.violations.push(
                    FieldViolation::MissingRequiredField {
                        path: path.child(&field.name),
                    },
                ),
                None => {}
            }
        }
        if self.config.strict {
            for key in map.keys() {
                if !fields.iter().any(|f| f.name == *key) {
                    self.violations.push(FieldViolation::UnexpectedField {
                        path: path.child(key),
                    });
                }
            }
        }
    }

    fn match_foreign_record(&mut self, contract: &str, value: &Value, path: &FieldPath) {
        let identifier = match value {
            Value::String(s) => Some(s.clone()),
            // Record snapshots are accepted in place of a bare identifier;
            // only the identifier field participates in resolution.
            Value::Object(map) => map
                .get(&self.config.identifier_field)
                .and_then(Value::as_str)
                .map(str::to_owned),
            _ => None,
        };
        match identifier {
            Some(identifier) => self.references.push(ForeignRef {
                path: path.clone(),
                contract: contract.to_string(),
                identifier,
            }),
            None => self.mismatch(format!("{contract} record identifier"), value, path),
        }
    }

    fn mismatch(&mut self, expected: String, value: &Value, path: &FieldPath) {
        self.violations.push(FieldViolation::TypeMismatch {
            path: path.clone(),
            expected,
            actual: ValueKind::of(value),
        });
    }
}

/// Whether a value's dynamic kind equals the declared primitive kind.
fn primitive_matches(kind: PrimitiveKind, value: &Value) -> bool {
    match kind {
        PrimitiveKind::String => value.is_string(),
        PrimitiveKind::Number => value.is_number(),
        PrimitiveKind::Boolean => value.is_boolean(),
        PrimitiveKind::Bytes => value
            .as_str()
            .is_some_and(|s| STANDARD.decode(s).is_ok()),
    }
}

/// Whether a map key (always JSON text) satisfies the declared key kind.
fn key_matches(kind: PrimitiveKind, key: &str) -> bool {
    match kind {
        PrimitiveKind::String => true,
        PrimitiveKind::Number => key.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false),
        PrimitiveKind::Boolean => key == "true" || key == "false",
        PrimitiveKind::Bytes => STANDARD.decode(key).is_ok(),
    }
}

/// The exact member set of the fixed JWK public-key shape.
const PUBLIC_KEY_MEMBERS: [&str; 6] = ["kty", "crv", "alg", "use", "x", "y"];

/// Whether a value is a well-formed secp256k1 signing key in JWK form.
fn public_key_matches(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    if obj.len() != PUBLIC_KEY_MEMBERS.len()
        || !PUBLIC_KEY_MEMBERS.iter().all(|m| obj.contains_key(*m))
    {
        return false;
    }
    let constant = |member: &str| obj.get(member).and_then(Value::as_str);
    if constant("kty") != Some("EC")
        || constant("crv") != Some("secp256k1")
        || constant("alg") != Some("ES256K")
        || constant("use") != Some("sig")
    {
        return false;
    }
    ["x", "y"].iter().all(|coord| {
        obj.get(*coord)
            .and_then(Value::as_str)
            .and_then(decode_base64url)
            .is_some_and(|bytes| bytes.len() == 32)
    })
}

/// Decode base64url with or without padding; JWKs in the wild carry both.
fn decode_base64url(text: &str) -> Option<Vec<u8>> {
    URL_SAFE
        .decode(text)
        .or_else(|_| URL_SAFE_NO_PAD.decode(text))
        .ok()
}
