use std::fmt::{Display, Formatter};

use crate::ast::Ty;
use crate::common_enum;

common_enum! {
    /// Literal and runtime values of the body language
    #[serde(rename_all = "snake_case")]
    pub enum Value {
        Unit,
        Null,
        Bool(bool),
        Int(i64),
        Str(String),
    }
}

impl Value {
    pub fn int(v: i64) -> Self {
        Value::Int(v)
    }

    pub fn bool(v: bool) -> Self {
        Value::Bool(v)
    }

    pub fn string(v: impl Into<String>) -> Self {
        Value::Str(v.into())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn conforms_to(&self, ty: &Ty) -> bool {
        match (self, ty) {
            (Value::Unit, Ty::Void) => true,
            (Value::Bool(_), Ty::Bool) => true,
            (Value::Int(_), Ty::Int) => true,
            (Value::Str(_), Ty::Str) => true,
            (Value::Null, Ty::Str | Ty::Object(_)) => true,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Str(v) => write!(f, "{:?}", v),
        }
    }
}
