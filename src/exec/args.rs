use indexmap::IndexMap;
use serde_json::Value as Json;

use super::response::ErrorKind;
use crate::types::{Field, NamedType, TypeRef};
use crate::{Argument, Schema, Value};

/// The arguments bound for one field, in the order they were written.
///
/// An explicit `null` literal is present as `Value::Null`; an omitted
/// optional argument is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, Json>,
}

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Json> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name)?.as_str()
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name)?.as_f64()
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Json)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BindError {
    pub kind: ErrorKind,
    pub message: String,
}

impl BindError {
    fn new(kind: ErrorKind, message: String) -> BindError {
        BindError { kind, message }
    }
}

/// Binds the literal arguments of a selected field against its parameters.
pub(crate) fn bind(
    schema: &Schema,
    field: &Field,
    arguments: &[Argument<'_>],
) -> Result<Arguments, BindError> {
    let mut bound = Arguments::default();
    for arg in arguments {
        let name = arg.name.as_str();
        if bound.contains(name) {
            return Err(BindError::new(
                ErrorKind::DuplicateArgument,
                format!("argument \"{}\" is given more than once", name),
            ));
        }
        let param = field
            .parameters()
            .iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| {
                BindError::new(
                    ErrorKind::UnknownArgument,
                    format!("unknown argument \"{}\" on field \"{}\"", name, field.name()),
                )
            })?;
        let value = coerce_literal(schema, param.ty(), &arg.value).map_err(|reason| {
            BindError::new(
                ErrorKind::ArgumentTypeMismatch,
                format!("argument \"{}\" of type {}: {}", name, param.ty(), reason),
            )
        })?;
        bound.values.insert(name.to_string(), value);
    }

    let missing = field
        .parameters()
        .iter()
        .find(|p| p.required() && !bound.contains(p.name()));
    if let Some(param) = missing {
        return Err(BindError::new(
            ErrorKind::MissingRequiredArgument,
            format!(
                "field \"{}\" argument \"{}\" of type {} is required",
                field.name(),
                param.name(),
                param.ty()
            ),
        ));
    }
    Ok(bound)
}

/// Coerces a query literal to `ty`.
///
/// A single value given where a list is expected becomes a one element list.
fn coerce_literal(schema: &Schema, ty: &TypeRef, literal: &Value<'_>) -> Result<Json, String> {
    match (ty, literal) {
        (TypeRef::NonNull(_), Value::Null) => Err(format!("null given for non-null type {}", ty)),
        (TypeRef::NonNull(inner), _) => coerce_literal(schema, inner, literal),
        (_, Value::Null) => Ok(Json::Null),
        (TypeRef::List(inner), Value::List(items)) => items
            .iter()
            .map(|item| coerce_literal(schema, inner, item))
            .collect::<Result<Vec<Json>, String>>()
            .map(Json::Array),
        (TypeRef::List(inner), _) => {
            coerce_literal(schema, inner, literal).map(|item| Json::Array(vec![item]))
        }
        (TypeRef::Named(name), _) => {
            let named = schema.get_type(name).map_err(|e| e.to_string())?;
            match named {
                NamedType::Scalar(scalar) => scalar.kind().deserialize(literal),
                NamedType::Enum(enum_type) => match literal {
                    Value::Enum(value) if enum_type.has_value(value.as_str()) => {
                        Ok(Json::String(value.as_str().to_string()))
                    }
                    Value::Enum(value) => Err(format!(
                        "{} is not a member of enum {}",
                        value,
                        enum_type.name()
                    )),
                    other => Err(format!("expected an enum value, found {}", other.kind())),
                },
                NamedType::Object(_) | NamedType::Interface(_) => {
                    Err(format!("{} {} cannot be an argument", named.kind(), name))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_query;
    use serde_json::json;

    const SDL: &str = r#"
        enum Episode { NEWHOPE EMPIRE JEDI }
        type Query {
            human(id: ID!, episodes: [Episode!], limit: Int, ratio: Float): String
            plain: String
        }
    "#;

    fn bind_query(query: &str, field: &str) -> Result<Arguments, BindError> {
        let schema = Schema::parse(SDL).unwrap();
        let doc = parse_query(query).unwrap();
        let selected = &doc.definitions[0].selection_set()[0];
        let def = schema.query_type().unwrap().field(field).unwrap().clone();
        bind(&schema, &def, &selected.arguments)
    }

    #[test]
    fn binds_literals_in_written_order() {
        let args = bind_query(
            r#"{ human(limit: 3, id: 1000, episodes: [EMPIRE, JEDI], ratio: 2) }"#,
            "human",
        )
        .unwrap();
        let names: Vec<&str> = args.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["limit", "id", "episodes", "ratio"]);
        assert_eq!(args.get_str("id"), Some("1000"));
        assert_eq!(args.get_i64("limit"), Some(3));
        assert_eq!(args.get_f64("ratio"), Some(2.0));
        assert_eq!(args.get("episodes"), Some(&json!(["EMPIRE", "JEDI"])));
    }

    #[test]
    fn single_values_coerce_to_lists_and_nulls_are_kept() {
        let args = bind_query(r#"{ human(id: "1", episodes: JEDI, limit: null) }"#, "human").unwrap();
        assert_eq!(args.get("episodes"), Some(&json!(["JEDI"])));
        assert_eq!(args.get("limit"), Some(&Json::Null));
        assert!(!args.contains("ratio"));
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn reports_each_binding_failure() {
        let kind = |query: &str, field: &str| bind_query(query, field).unwrap_err().kind;
        assert_eq!(
            kind("{ human(limit: 1) }", "human"),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            kind(r#"{ human(id: "1", limit: "many") }"#, "human"),
            ErrorKind::ArgumentTypeMismatch
        );
        assert_eq!(
            kind(r#"{ human(id: "1", episodes: [PHANTOM]) }"#, "human"),
            ErrorKind::ArgumentTypeMismatch
        );
        assert_eq!(
            kind("{ human(id: null) }", "human"),
            ErrorKind::ArgumentTypeMismatch
        );
        assert_eq!(
            kind(r#"{ human(id: "1", side: DARK) }"#, "human"),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            kind(r#"{ human(id: "1", id: "2") }"#, "human"),
            ErrorKind::DuplicateArgument
        );
        assert_eq!(kind("{ plain(x: 1) }", "plain"), ErrorKind::UnknownArgument);
    }
}
