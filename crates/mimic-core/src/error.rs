use std::result;

use thiserror::Error;

use crate::ast::{Ident, Signature, Ty};
use crate::class::MemberKey;

/// Failures of the class-model provider when querying or mutating definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassModelError {
    /// The destination already declares a member with the same key.
    #[error("{class} already declares {key}")]
    DuplicateMember { class: Ident, key: MemberKey },
    #[error("{class} is frozen and can no longer be modified")]
    Frozen { class: Ident },
    #[error("{class} has no field `{field}`")]
    UnknownField { class: Ident, field: Ident },
    #[error("{member} of {class} uses void as a value type")]
    VoidType { class: Ident, member: MemberKey },
    #[error("{member} of {class} reads parameter ${} but takes {arity}", .index + 1)]
    ParamOutOfRange {
        class: Ident,
        member: MemberKey,
        index: usize,
        arity: usize,
    },
    #[error("class {name} already exists in the pool")]
    DuplicateClass { name: Ident },
    #[error("class {name} does not exist in the pool")]
    UnknownClass { name: Ident },
    #[error("{class} refers to unresolved type {name}")]
    UnresolvedType { class: Ident, name: Ident },
    #[error("{class} implements {name}, which is not an interface")]
    NotAnInterface { class: Ident, name: Ident },
}

impl ClassModelError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ClassModelError::DuplicateMember { .. })
    }
}

/// Failures while running realized classes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("{class} has no constructor accepting {signature}")]
    NoSuchConstructor { class: Ident, signature: String },
    #[error("{class} has no method {method}{signature}")]
    NoSuchMethod {
        class: Ident,
        method: Ident,
        signature: String,
    },
    #[error("{class} has no field `{field}`")]
    NoSuchField { class: Ident, field: Ident },
    #[error("type mismatch in {context}: expected {expected}, found {found}")]
    TypeMismatch {
        context: String,
        expected: Ty,
        found: String,
    },
    #[error("{class}.{method}{signature} finished without returning a value")]
    MissingReturn {
        class: Ident,
        method: Ident,
        signature: Signature,
    },
    #[error("instance member `{member}` of {class} used without an instance")]
    NoReceiver { class: Ident, member: Ident },
    #[error("{class} is an interface and cannot be instantiated")]
    AbstractInstantiation { class: Ident },
    #[error("call depth exceeded while calling {class}.{method}")]
    StackOverflow { class: Ident, method: Ident },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Class model error: {0}")]
    Model(#[from] ClassModelError),
    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
    #[error("Generic error: {0}")]
    Generic(String),
}

pub type Result<T> = result::Result<T, Error>;

// Convert from eyre::Report to our Error type
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Generic(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Generic(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Generic(e.to_string())
    }
}
