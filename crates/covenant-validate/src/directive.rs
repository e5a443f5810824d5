//! # Directive Validator — Structural Legality of Annotations
//!
//! Directives annotate contracts, properties, methods, and parameters
//! with access and behavior hints (`@public`, `@call(pk)`, ...). Their
//! runtime semantics are enforced by the system around the engine; what
//! is checked here is purely structural: the name is recognized at its
//! attachment point, the argument count fits, and every field-path
//! argument resolves within the owning contract.
//!
//! The recognized vocabulary lives in a [`DirectiveRegistry`]. The
//! built-in table covers the directives the surrounding system ships
//! with; embedders can register additional names without touching the
//! engine.

use std::collections::HashMap;

use covenant_core::{dotted, Contract, Directive};

use crate::report::{AttachmentKind, SchemaViolation};
use crate::resolve::resolve;

/// Name of the directive that suppresses a property's required flag.
pub const OPTIONAL_DIRECTIVE: &str = "optional";

/// How many field-path arguments a directive accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exactly(usize),
    /// This many or more.
    AtLeast(usize),
    /// Any number, including none.
    Any,
}

impl Arity {
    /// Whether `count` arguments satisfy this arity.
    pub fn admits(&self, count: usize) -> bool {
        match self {
            Self::Exactly(n) => count == *n,
            Self::AtLeast(n) => count >= *n,
            Self::Any => true,
        }
    }

    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Exactly(n) => format!("exactly {n}"),
            Self::AtLeast(n) => format!("at least {n}"),
            Self::Any => "any number of".to_string(),
        }
    }
}

/// A directive the engine recognizes, with its legal attachment points.
#[derive(Debug, Clone)]
pub struct DirectiveSpec {
    /// Directive name, without the leading `@`.
    pub name: &'static str,
    /// Attachment points where this directive is legal.
    pub attachments: &'static [AttachmentKind],
    /// Accepted argument count.
    pub arity: Arity,
    /// What the directive means to the surrounding system.
    pub description: &'static str,
}

/// The built-in directive vocabulary.
///
/// Semantics listed here are descriptive only; the engine never enforces
/// them. Structural checks (name, attachment, arity, argument paths) are
/// all that happen at validation time.
pub const BUILTIN_DIRECTIVES: &[DirectiveSpec] = &[
    DirectiveSpec {
        name: "public",
        attachments: &[AttachmentKind::Contract],
        arity: Arity::Exactly(0),
        description: "records of this contract are world-readable",
    },
    DirectiveSpec {
        name: "private",
        attachments: &[AttachmentKind::Contract],
        arity: Arity::Exactly(0),
        description: "records are readable only where another directive grants access",
    },
    DirectiveSpec {
        name: "call",
        attachments: &[AttachmentKind::Contract, AttachmentKind::Method],
        arity: Arity::Any,
        description: "grants call access to holders of the referenced key fields",
    },
    DirectiveSpec {
        name: "read",
        attachments: &[AttachmentKind::Contract, AttachmentKind::Property],
        arity: Arity::Any,
        description: "grants read access to holders of the referenced key fields",
    },
    DirectiveSpec {
        name: "delegate",
        attachments: &[AttachmentKind::Property],
        arity: Arity::Exactly(0),
        description: "marks a key or reference field as an authority delegation target",
    },
    DirectiveSpec {
        name: OPTIONAL_DIRECTIVE,
        attachments: &[AttachmentKind::Property, AttachmentKind::Parameter],
        arity: Arity::Exactly(0),
        description: "suppresses the required flag of the annotated field",
    },
];

#[derive(Debug, Clone)]
struct RegisteredDirective {
    attachments: Vec<AttachmentKind>,
    arity: Arity,
}

/// The set of directive names the engine will accept, per attachment
/// point, with their arities.
#[derive(Debug, Clone)]
pub struct DirectiveRegistry {
    entries: HashMap<String, RegisteredDirective>,
}

impl DirectiveRegistry {
    /// A registry containing only the built-in vocabulary.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for spec in BUILTIN_DIRECTIVES {
            registry.register(spec.name, spec.attachments, spec.arity);
        }
        registry
    }

    /// A registry recognizing nothing. Useful for embedders that define
    /// their own vocabulary from scratch.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register (or replace) a directive name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        attachments: &[AttachmentKind],
        arity: Arity,
    ) {
        self.entries.insert(
            name.into(),
            RegisteredDirective {
                attachments: attachments.to_vec(),
                arity,
            },
        );
    }

    /// Whether `name` is recognized at the given attachment point.
    pub fn recognizes(&self, name: &str, attachment: AttachmentKind) -> bool {
        self.entries
            .get(name)
            .is_some_and(|entry| entry.attachments.contains(&attachment))
    }

    /// Structurally check one directive against its owning contract.
    ///
    /// Returns every violation found: an unrecognized name short-circuits
    /// (arity and arguments are meaningless for an unknown directive),
    /// while arity and argument-path problems accumulate independently.
    pub fn check(
        &self,
        directive: &Directive,
        owner: &Contract,
        attachment: AttachmentKind,
    ) -> Vec<SchemaViolation> {
        let Some(entry) = self.entries.get(&directive.name) else {
            return vec![SchemaViolation::UnknownDirective {
                name: directive.name.clone(),
                attachment,
            }];
        };
        if !entry.attachments.contains(&attachment) {
            return vec![SchemaViolation::UnknownDirective {
                name: directive.name.clone(),
                attachment,
            }];
        }

        let mut violations = Vec::new();
        if !entry.arity.admits(directive.arguments.len()) {
            violations.push(SchemaViolation::DirectiveArgumentCount {
                directive: directive.name.clone(),
                expected: entry.arity.describe(),
                actual: directive.arguments.len(),
            });
        }
        for argument in &directive.arguments {
            if let Err(err) = resolve(owner, &argument.path) {
                violations.push(SchemaViolation::InvalidDirectiveArgument {
                    directive: directive.name.clone(),
                    path: dotted(&argument.path),
                    segment: err.segment,
                });
            }
        }
        violations
    }
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
