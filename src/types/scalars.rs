use serde_json::{Number, Value as Json};

use crate::Value;

/// The representation a scalar type coerces to.
///
/// The five builtins are pre-registered in every schema; `Custom` covers SDL
/// `scalar` declarations, whose values pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Int,
    Float,
    Boolean,
    Id,
    Custom,
}

impl ScalarKind {
    pub const BUILTINS: [ScalarKind; 5] = [
        ScalarKind::String,
        ScalarKind::Int,
        ScalarKind::Boolean,
        ScalarKind::Float,
        ScalarKind::Id,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::String => "String",
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Id => "ID",
            ScalarKind::Custom => "custom scalar",
        }
    }

    /// Coerces a resolved value for output.
    pub fn serialize(&self, raw: &Json) -> Result<Json, String> {
        let coerced = match (self, raw) {
            (ScalarKind::String, Json::String(_)) => Some(raw.clone()),
            (ScalarKind::Id, Json::String(_)) => Some(raw.clone()),
            (ScalarKind::Id, Json::Number(n)) if n.is_i64() || n.is_u64() => {
                Some(Json::String(n.to_string()))
            }
            (ScalarKind::Int, Json::Number(n)) => int_from_number(n).map(Json::from),
            (ScalarKind::Float, Json::Number(n)) => {
                n.as_f64().and_then(Number::from_f64).map(Json::Number)
            }
            (ScalarKind::Boolean, Json::Bool(_)) => Some(raw.clone()),
            (ScalarKind::Custom, Json::Null) => None,
            (ScalarKind::Custom, _) => Some(raw.clone()),
            _ => None,
        };
        coerced.ok_or_else(|| format!("{} cannot represent value: {}", self.name(), raw))
    }

    /// Coerces a query literal into an argument value.
    pub fn deserialize(&self, literal: &Value<'_>) -> Result<Json, String> {
        let coerced = match (self, literal) {
            (ScalarKind::String, Value::String(s)) => Some(Json::String(s.to_string())),
            (ScalarKind::Id, Value::String(s)) => Some(Json::String(s.to_string())),
            (ScalarKind::Id, Value::Int(i)) => Some(Json::String(i.as_i64().to_string())),
            (ScalarKind::Int, Value::Int(i)) => i32::try_from(i.as_i64()).ok().map(Json::from),
            (ScalarKind::Float, Value::Int(i)) => Some(Json::from(i.as_i64() as f64)),
            (ScalarKind::Float, Value::Float(x)) => Number::from_f64(x.0).map(Json::Number),
            (ScalarKind::Boolean, Value::Boolean(b)) => Some(Json::Bool(*b)),
            (ScalarKind::Custom, Value::String(s)) => Some(Json::String(s.to_string())),
            (ScalarKind::Custom, Value::Int(i)) => Some(Json::from(i.as_i64())),
            (ScalarKind::Custom, Value::Float(x)) => Number::from_f64(x.0).map(Json::Number),
            (ScalarKind::Custom, Value::Boolean(b)) => Some(Json::Bool(*b)),
            _ => None,
        };
        coerced.ok_or_else(|| {
            format!(
                "{} cannot represent {} literal: {}",
                self.name(),
                literal.kind(),
                literal
            )
        })
    }
}

fn int_from_number(n: &Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    // integral floats such as 3.0 are accepted
    let f = n.as_f64()?;
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}
