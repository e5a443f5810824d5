//! # Contract Schema Nodes
//!
//! The attribute nodes a contract is made of: properties, indexes, methods,
//! and directives, plus the method-local parameter and return-value nodes.
//! All of it arrives pre-parsed from the compiler as `kind`-tagged JSON;
//! nothing here evaluates data.
//!
//! Method bodies are opaque text. Only the signature shape (parameters,
//! return value, attached directives) participates in validation.

use serde::{Deserialize, Serialize};

use crate::types::{default_true, Type};

/// A named record-type schema: the unit of validation.
///
/// # Invariants
///
/// - `name` is unique within a schema set.
/// - Property names are unique within the contract.
///
/// Both invariants are checked by the validation engine at schema
/// compilation time, not assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    /// Namespace the contract lives in.
    pub namespace: Namespace,
    /// Contract name, unique within a schema set.
    pub name: String,
    /// Properties, indexes, methods, and contract-level directives,
    /// in source order.
    #[serde(default)]
    pub attributes: Vec<ContractAttribute>,
}

impl Contract {
    /// The declared properties, in source order.
    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.attributes.iter().filter_map(|a| match a {
            ContractAttribute::Property(p) => Some(p),
            _ => None,
        })
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties().find(|p| p.name == name)
    }

    /// The declared indexes, in source order.
    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.attributes.iter().filter_map(|a| match a {
            ContractAttribute::Index(i) => Some(i),
            _ => None,
        })
    }

    /// The declared methods, in source order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.attributes.iter().filter_map(|a| match a {
            ContractAttribute::Method(m) => Some(m),
            _ => None,
        })
    }

    /// Contract-level directives, in source order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.attributes.iter().filter_map(|a| match a {
            ContractAttribute::Directive(d) => Some(d),
            _ => None,
        })
    }
}

/// The namespace a contract is declared under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Dotted namespace path, e.g. `org.example`.
    pub value: String,
}

/// One attribute of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContractAttribute {
    /// A typed data field.
    Property(Property),
    /// A secondary index over scalar fields.
    Index(Index),
    /// A method signature with opaque code.
    Method(Method),
    /// A contract-level directive.
    Directive(Directive),
}

/// A typed data field of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Field name, unique within the contract.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Whether a record must carry this field. Directives can override;
    /// the engine owns that decision.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Directives attached to this property.
    #[serde(default)]
    pub directives: Vec<Directive>,
}

/// A secondary index over one or more scalar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// The indexed fields, in precedence order.
    pub fields: Vec<IndexField>,
}

/// One component of an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexField {
    /// Sort direction.
    pub direction: IndexFieldDirection,
    /// Dotted path to the indexed field, which must resolve to a
    /// scalar-typed leaf within the owning contract.
    #[serde(rename = "fieldPath")]
    pub field_path: Vec<String>,
}

/// Sort direction of an index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexFieldDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// A method signature. The body is opaque; only the signature is validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Opaque source text of the body. Never executed here.
    pub code: String,
    /// Parameters, the return value, and method-level directives.
    #[serde(default)]
    pub attributes: Vec<MethodAttribute>,
}

impl Method {
    /// The declared parameters, in source order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.attributes.iter().filter_map(|a| match a {
            MethodAttribute::Parameter(p) => Some(p),
            _ => None,
        })
    }

    /// The declared return value, if any.
    pub fn return_value(&self) -> Option<&ReturnValue> {
        self.attributes.iter().find_map(|a| match a {
            MethodAttribute::ReturnValue(r) => Some(r),
            _ => None,
        })
    }

    /// Method-level directives, in source order.
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.attributes.iter().filter_map(|a| match a {
            MethodAttribute::Directive(d) => Some(d),
            _ => None,
        })
    }
}

/// One attribute of a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MethodAttribute {
    /// A typed parameter.
    Parameter(Parameter),
    /// The declared return value.
    #[serde(rename = "returnvalue")]
    ReturnValue(ReturnValue),
    /// A method-level directive.
    Directive(Directive),
}

/// A typed method parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: Type,
    /// Whether the caller must supply this parameter.
    pub required: bool,
    /// Directives attached to this parameter.
    #[serde(default)]
    pub directives: Vec<Directive>,
}

/// A declared method return value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnValue {
    /// Return value name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: Type,
}

/// A schema annotation: a name plus field-path arguments.
///
/// Directives attach to contracts, properties, methods, or parameters.
/// Their runtime semantics (authorization, delegation) belong to the
/// system around the engine; structural legality is checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Directive name, without the leading `@`.
    pub name: String,
    /// Field-path arguments, in source order.
    #[serde(default)]
    pub arguments: Vec<FieldReference>,
}

/// A dotted field path used as a directive argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReference {
    /// Path segments, outermost first.
    pub path: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;
    use serde_json::json;

    /// The shape the compiler emits for a small contract with every
    /// attribute kind present.
    fn account_contract_json() -> serde_json::Value {
        json!({
            "kind": "contract",
            "namespace": {"kind": "namespace", "value": "org.example"},
            "name": "Account",
            "attributes": [
                {"kind": "directive", "name": "public", "arguments": []},
                {
                    "kind": "property",
                    "name": "id",
                    "type": {"kind": "primitive", "value": "string"},
                    "directives": [],
                },
                {
                    "kind": "property",
                    "name": "pk",
                    "type": {"kind": "publickey"},
                    "directives": [
                        {"kind": "directive", "name": "delegate", "arguments": []},
                    ],
                },
                {
                    "kind": "index",
                    "fields": [
                        {"direction": "asc", "fieldPath": ["id"]},
                    ],
                },
                {
                    "kind": "method",
                    "name": "setName",
                    "code": "this.name = name;",
                    "attributes": [
                        {
                            "kind": "directive",
                            "name": "call",
                            "arguments": [
                                {"kind": "fieldreference", "path": ["pk"]},
                            ],
                        },
                        {
                            "kind": "parameter",
                            "name": "name",
                            "type": {"kind": "primitive", "value": "string"},
                            "required": true,
                            "directives": [],
                        },
                        {
                            "kind": "returnvalue",
                            "name": "_",
                            "type": {"kind": "primitive", "value": "string"},
                        },
                    ],
                },
            ],
        })
    }

    #[test]
    fn test_deserialize_compiler_output() {
        let contract: Contract = serde_json::from_value(account_contract_json()).unwrap();
        assert_eq!(contract.name, "Account");
        assert_eq!(contract.namespace.value, "org.example");
        assert_eq!(contract.properties().count(), 2);
        assert_eq!(contract.indexes().count(), 1);
        assert_eq!(contract.methods().count(), 1);
        assert_eq!(contract.directives().count(), 1);
    }

    #[test]
    fn test_property_lookup_and_defaults() {
        let contract: Contract = serde_json::from_value(account_contract_json()).unwrap();
        let id = contract.property("id").unwrap();
        assert!(id.required, "required defaults to true");
        assert_eq!(
            id.ty,
            Type::Primitive {
                value: PrimitiveKind::String
            }
        );
        assert!(contract.property("nope").is_none());
    }

    #[test]
    fn test_method_signature_accessors() {
        let contract: Contract = serde_json::from_value(account_contract_json()).unwrap();
        let method = contract.methods().next().unwrap();
        assert_eq!(method.name, "setName");
        let params: Vec<_> = method.parameters().collect();
        assert_eq!(params.len(), 1);
        assert_eq!(params[0].name, "name");
        assert!(method.return_value().is_some());
        let call = method.directives().next().unwrap();
        assert_eq!(call.name, "call");
        assert_eq!(call.arguments[0].path, vec!["pk"]);
    }

    #[test]
    fn test_index_field_path_wire_name() {
        let index: Index = serde_json::from_value(json!({
            "fields": [
                {"direction": "desc", "fieldPath": ["info", "age"]},
            ],
        }))
        .unwrap();
        assert_eq!(index.fields[0].direction, IndexFieldDirection::Desc);
        assert_eq!(index.fields[0].field_path, vec!["info", "age"]);
    }
}
