use std::fmt;

use crate::{Pos, Token, TokenValue};

macro_rules! impl_name_from_token {
    ($t:ident) => {
        impl<'a> From<Token<'a>> for $t<'a> {
            fn from(token: Token<'a>) -> Self {
                let val = match token.val {
                    TokenValue::Name(name) => name,
                    _ => unreachable!(),
                };
                $t(val)
            }
        }

        impl<'a> $t<'a> {
            pub fn as_str(&self) -> &'a str {
                self.0
            }
        }

        impl<'a> fmt::Display for $t<'a> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.0)
            }
        }
    };
}

impl_name_from_token!(TypeName);
impl_name_from_token!(EnumValueName);
impl_name_from_token!(FieldName);
impl_name_from_token!(InterfaceName);
impl_name_from_token!(OpName);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName<'a>(pub &'a str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpName<'a>(pub &'a str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EnumValueName<'a>(pub &'a str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldName<'a>(pub &'a str);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InterfaceName<'a>(pub &'a str);

/// A type reference as written in source: `T`, `[T]`, `T!`, and nestings thereof.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType<'a> {
    Name(TypeName<'a>),
    List(Box<FieldType<'a>>),
    NonNull(Box<FieldType<'a>>),
}

impl<'a> FieldType<'a> {
    /// The named type at the bottom of all list and non-null wrappers.
    pub fn innermost_name(&self) -> TypeName<'a> {
        match self {
            FieldType::Name(name) => *name,
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.innermost_name(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, FieldType::NonNull(_))
    }
}

impl<'a> fmt::Display for FieldType<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Name(name) => write!(f, "{}", name),
            FieldType::List(inner) => write!(f, "[{}]", inner),
            FieldType::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Description<'a> {
    pub pos: Pos,
    pub value: std::borrow::Cow<'a, str>,
}
