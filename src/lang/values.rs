use std::borrow::Cow;
use std::fmt;

use ordered_float::OrderedFloat;

use crate::{EnumValueName, FieldName, Pos};

pub type Float64 = OrderedFloat<f64>;

/// A literal value in a query document.
///
/// Strings are stored unescaped; they borrow from the source when no escape
/// sequences were present.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value<'a> {
    Int(Int),
    Float(Float64),
    String(Cow<'a, str>),
    Boolean(bool),
    Null,
    Enum(EnumValueName<'a>),
    List(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    /// A short name for the kind of literal, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Boolean(_) => "Boolean",
            Value::Null => "null",
            Value::Enum(_) => "enum value",
            Value::List(_) => "list",
        }
    }
}

impl<'a> fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i.0),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
            Value::Enum(name) => write!(f, "{}", name),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

// TODO: do we need a big-int for Int?
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Int(pub(crate) i64);

impl Int {
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl From<i32> for Int {
    fn from(i: i32) -> Self {
        Int(i as i64)
    }
}

impl From<i64> for Int {
    fn from(i: i64) -> Self {
        Int(i)
    }
}

/// `name: value` inside a field's parentheses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Argument<'a> {
    pub pos: Pos,
    pub name: FieldName<'a>,
    pub value: Value<'a>,
}
