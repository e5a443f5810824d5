//! # The Contract Type Algebra
//!
//! The closed sum of types a contract field may carry. The compiler emits
//! every type node as `kind`-tagged JSON (`{"kind": "primitive", "value":
//! "string"}`), and the enums here deserialize that wire shape directly.
//!
//! ## Nesting Invariant
//!
//! Type nodes nest only through `Object` fields and `Map` values. Arrays
//! are homogeneous and hold primitives exclusively; a map key is always a
//! primitive. The variants encode this: `Array` carries a [`Primitive`],
//! not a [`Type`], so an array of objects is unrepresentable rather than
//! merely rejected.

use serde::{Deserialize, Serialize};

/// The four primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// UTF-8 text.
    String,
    /// A JSON number. No distinction between integer and float widths.
    Number,
    /// `true` or `false`.
    Boolean,
    /// A byte payload, carried as standard padded base64 text.
    Bytes,
}

impl PrimitiveKind {
    /// The wire name of this primitive kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Bytes => "bytes",
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive type node, as nested inside [`Type::Array`] and [`Type::Map`].
///
/// Standalone primitives appear as `Type::Primitive`; this struct exists for
/// the positions where the grammar only admits a primitive, so the
/// restriction holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Primitive {
    /// Which primitive this node denotes.
    pub value: PrimitiveKind,
}

/// The value side of a `Map` type: a primitive or a foreign-record reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapValue {
    /// Map values of a primitive kind.
    Primitive {
        /// Which primitive the values must be.
        value: PrimitiveKind,
    },
    /// Map values referencing records of another contract.
    ForeignRecord {
        /// Name of the referenced contract.
        contract: String,
    },
}

/// One field of an `Object` type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectField {
    /// Field name, unique within the owning object.
    pub name: String,
    /// Declared type of the field.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Whether the field must be present.
    #[serde(default = "default_true")]
    pub required: bool,
}

pub(crate) fn default_true() -> bool {
    true
}

/// A type expression in a contract schema.
///
/// This is a closed sum: matching on it is exhaustive, and adding a shape
/// forces every consumer to handle it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Type {
    /// A primitive value.
    Primitive {
        /// Which primitive.
        value: PrimitiveKind,
    },
    /// A homogeneous array of primitives.
    Array {
        /// Element type of the array.
        element: Primitive,
    },
    /// A keyed mapping with primitive keys.
    Map {
        /// Key type. Always a primitive.
        key: Primitive,
        /// Value type. A primitive or a foreign-record reference.
        value: MapValue,
    },
    /// A nested record with a fixed field set.
    Object {
        /// The declared fields, in source order.
        fields: Vec<ObjectField>,
    },
    /// A reference to a record of another contract, held by identifier.
    ForeignRecord {
        /// Name of the referenced contract.
        contract: String,
    },
    /// An opaque cryptographic public key in the fixed JWK shape.
    PublicKey,
}

impl Type {
    /// Whether this type is a scalar leaf, i.e. admissible as an index field.
    ///
    /// Scalars are primitives, public keys, and foreign-record identifiers.
    /// Objects, arrays, and maps are composite and cannot be indexed.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Primitive { .. } | Self::PublicKey | Self::ForeignRecord { .. }
        )
    }

    /// A short human-readable label for error messages, e.g. `string`,
    /// `string[]`, `map<string, number>`, `User`.
    pub fn label(&self) -> String {
        match self {
            Self::Primitive { value } => value.to_string(),
            Self::Array { element } => format!("{}[]", element.value),
            Self::Map { key, value } => {
                let value_label = match value {
                    MapValue::Primitive { value } => value.to_string(),
                    MapValue::ForeignRecord { contract } => contract.clone(),
                };
                format!("map<{}, {value_label}>", key.value)
            }
            Self::Object { .. } => "object".to_string(),
            Self::ForeignRecord { contract } => contract.clone(),
            Self::PublicKey => "PublicKey".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primitive_wire_shape() {
        let ty: Type = serde_json::from_value(json!({
            "kind": "primitive",
            "value": "string",
        }))
        .unwrap();
        assert_eq!(
            ty,
            Type::Primitive {
                value: PrimitiveKind::String
            }
        );
    }

    #[test]
    fn test_publickey_wire_shape() {
        let ty: Type = serde_json::from_value(json!({"kind": "publickey"})).unwrap();
        assert_eq!(ty, Type::PublicKey);
    }

    #[test]
    fn test_map_with_foreign_record_value() {
        let ty: Type = serde_json::from_value(json!({
            "kind": "map",
            "key": {"kind": "primitive", "value": "string"},
            "value": {"kind": "foreignrecord", "contract": "User"},
        }))
        .unwrap();
        match ty {
            Type::Map { key, value } => {
                assert_eq!(key.value, PrimitiveKind::String);
                assert_eq!(
                    value,
                    MapValue::ForeignRecord {
                        contract: "User".to_string()
                    }
                );
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_object_fields_default_required() {
        let ty: Type = serde_json::from_value(json!({
            "kind": "object",
            "fields": [
                {"name": "street", "type": {"kind": "primitive", "value": "string"}},
                {"name": "unit", "type": {"kind": "primitive", "value": "string"}, "required": false},
            ],
        }))
        .unwrap();
        match ty {
            Type::Object { fields } => {
                assert!(fields[0].required);
                assert!(!fields[1].required);
            }
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            Type::Array {
                element: Primitive {
                    value: PrimitiveKind::Number
                }
            }
            .label(),
            "number[]"
        );
        assert_eq!(
            Type::Map {
                key: Primitive {
                    value: PrimitiveKind::String
                },
                value: MapValue::Primitive {
                    value: PrimitiveKind::Number
                },
            }
            .label(),
            "map<string, number>"
        );
        assert_eq!(
            Type::ForeignRecord {
                contract: "User".to_string()
            }
            .label(),
            "User"
        );
    }

    #[test]
    fn test_scalar_classification() {
        assert!(Type::PublicKey.is_scalar());
        assert!(Type::ForeignRecord {
            contract: "User".to_string()
        }
        .is_scalar());
        assert!(!Type::Object { fields: vec![] }.is_scalar());
        assert!(!Type::Array {
            element: Primitive {
                value: PrimitiveKind::Bytes
            }
        }
        .is_scalar());
    }

    #[test]
    fn test_round_trip_preserves_kind_tag() {
        let original = json!({
            "kind": "map",
            "key": {"value": "string"},
            "value": {"kind": "primitive", "value": "number"},
        });
        let ty: Type = serde_json::from_value(original).unwrap();
        let emitted = serde_json::to_value(&ty).unwrap();
        assert_eq!(emitted["kind"], "map");
        assert_eq!(emitted["value"]["kind"], "primitive");
    }
}
