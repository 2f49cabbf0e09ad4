use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::ast::{Ident, Value};
use crate::common_enum;

common_enum! {
    /// Declared type of a field, parameter or return value
    #[serde(rename_all = "snake_case")]
    pub enum Ty {
        Void,
        Bool,
        Int,
        Str,
        /// Reference to another class or interface of the pool, by name
        Object(Ident),
    }
}

impl Ty {
    pub fn object(name: impl Into<Ident>) -> Self {
        Ty::Object(name.into())
    }

    pub fn as_object(&self) -> Option<&Ident> {
        match self {
            Ty::Object(name) => Some(name),
            _ => None,
        }
    }

    /// Value a field of this type holds before any initializer runs.
    pub fn default_value(&self) -> Value {
        match self {
            Ty::Void => Value::Unit,
            Ty::Bool => Value::Bool(false),
            Ty::Int => Value::Int(0),
            Ty::Str | Ty::Object(_) => Value::Null,
        }
    }
}

impl Display for Ty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Ty::Void => write!(f, "void"),
            Ty::Bool => write!(f, "boolean"),
            Ty::Int => write!(f, "int"),
            Ty::Str => write!(f, "String"),
            Ty::Object(name) => write!(f, "{}", name),
        }
    }
}

/// Ordered parameter types of a constructor or method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Signature {
    pub params: Vec<Ty>,
}

impl Signature {
    pub fn new(params: Vec<Ty>) -> Self {
        Self { params }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Whether `args` can be passed to a member with this signature.
    pub fn accepts(&self, args: &[Value]) -> bool {
        self.params.len() == args.len()
            && self
                .params
                .iter()
                .zip(args)
                .all(|(ty, arg)| arg.conforms_to(ty))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.params.iter().join(", "))
    }
}

impl From<Vec<Ty>> for Signature {
    fn from(params: Vec<Ty>) -> Self {
        Self::new(params)
    }
}
