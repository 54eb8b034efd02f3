use fnv::FnvHashMap;
use thiserror::Error as ThisError;

use crate::builder::SchemaBuilder;
use crate::types::{InterfaceType, NamedType, ObjectType, ScalarKind, ScalarType};
use crate::{parse_schema, Error};

pub const DEFAULT_QUERY_TYPE: &str = "Query";

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("type already exists: {name:?}")]
    DuplicateType { name: String },

    #[error("unknown type {name:?} referenced by {referenced_by:?}")]
    UnknownTypeReference { name: String, referenced_by: String },

    #[error("field already exists: {type_name:?}.{field_name:?}")]
    DuplicateField {
        type_name: String,
        field_name: String,
    },

    #[error("{object:?} does not conform to interface {interface:?}: {reason}")]
    InterfaceConformance {
        object: String,
        interface: String,
        reason: String,
    },

    #[error("argument {argument:?} has type {type_name:?}, which is not a scalar or enum")]
    InvalidArgumentType { argument: String, type_name: String },

    #[error("type not found: {name:?}")]
    NotFound { name: String },

    #[error("field not found: {type_name:?}.{field_name:?}")]
    FieldNotFound {
        type_name: String,
        field_name: String,
    },

    #[error("{name:?} is not a {expected}")]
    WrongKind { name: String, expected: &'static str },
}

impl SchemaError {
    pub fn duplicate_type(name: &str) -> SchemaError {
        SchemaError::DuplicateType {
            name: name.to_string(),
        }
    }

    pub fn unknown_type(name: &str, referenced_by: &str) -> SchemaError {
        SchemaError::UnknownTypeReference {
            name: name.to_string(),
            referenced_by: referenced_by.to_string(),
        }
    }

    pub fn nonconforming(object: &str, interface: &str, reason: impl Into<String>) -> SchemaError {
        SchemaError::InterfaceConformance {
            object: object.to_string(),
            interface: interface.to_string(),
            reason: reason.into(),
        }
    }
}

/// The type registry.
///
/// A `Schema` is only ever mutated by the [`SchemaBuilder`] that produces it.
/// Once handed out it is read-only and may be shared across threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    types: FnvHashMap<String, NamedType>,
    query_type: String,
}

impl Schema {
    /// An empty registry holding only the builtin scalars.
    pub(crate) fn new() -> Schema {
        let mut types = FnvHashMap::default();
        for kind in ScalarKind::BUILTINS {
            let scalar = ScalarType::builtin(kind);
            types.insert(scalar.name().to_string(), NamedType::Scalar(scalar));
        }
        Schema {
            types,
            query_type: DEFAULT_QUERY_TYPE.to_string(),
        }
    }

    /// Parses SDL text and builds a registry from it.
    pub fn parse(sdl: &str) -> Result<Schema, Error> {
        let doc = parse_schema(sdl)?;
        let schema = SchemaBuilder::new().build(&doc)?;
        Ok(schema)
    }

    pub(crate) fn add(&mut self, named: NamedType) -> Result<(), SchemaError> {
        if self.types.contains_key(named.name()) {
            return Err(SchemaError::duplicate_type(named.name()));
        }
        self.types.insert(named.name().to_string(), named);
        Ok(())
    }

    pub(crate) fn get_type_mut(&mut self, name: &str) -> Result<&mut NamedType, SchemaError> {
        self.types.get_mut(name).ok_or_else(|| SchemaError::NotFound {
            name: name.to_string(),
        })
    }

    pub(crate) fn set_query_type(&mut self, name: &str) {
        self.query_type = name.to_string();
    }

    pub fn get_type(&self, name: &str) -> Result<&NamedType, SchemaError> {
        self.types.get(name).ok_or_else(|| SchemaError::NotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn get_object(&self, name: &str) -> Result<&ObjectType, SchemaError> {
        match self.get_type(name)? {
            NamedType::Object(object) => Ok(object),
            _ => Err(SchemaError::WrongKind {
                name: name.to_string(),
                expected: "object",
            }),
        }
    }

    pub fn get_interface(&self, name: &str) -> Result<&InterfaceType, SchemaError> {
        match self.get_type(name)? {
            NamedType::Interface(interface) => Ok(interface),
            _ => Err(SchemaError::WrongKind {
                name: name.to_string(),
                expected: "interface",
            }),
        }
    }

    /// All registered types, builtins included, in no particular order.
    pub fn types(&self) -> impl Iterator<Item = &NamedType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn query_type_name(&self) -> &str {
        &self.query_type
    }

    /// The root object type queries start from.
    pub fn query_type(&self) -> Result<&ObjectType, SchemaError> {
        self.get_object(&self.query_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn schema_is_shareable() {
        assert_send_sync::<Schema>();
    }

    #[test]
    fn new_schema_holds_the_builtin_scalars() {
        let schema = Schema::new();
        assert_eq!(schema.len(), 5);
        for name in ["String", "Int", "Boolean", "Float", "ID"] {
            let ty = schema.get_type(name).unwrap();
            assert_eq!(ty.kind(), "scalar");
            assert!(ty.is_leaf());
        }
        assert_eq!(schema.query_type_name(), "Query");
        assert!(matches!(
            schema.query_type(),
            Err(SchemaError::NotFound { .. })
        ));
    }

    #[test]
    fn builtins_cannot_be_redefined() {
        let mut schema = Schema::new();
        let err = schema
            .add(NamedType::Scalar(ScalarType::custom("Int", None)))
            .unwrap_err();
        assert_eq!(err, SchemaError::duplicate_type("Int"));
    }

    #[test]
    fn typed_lookups_fail_explicitly() {
        let mut schema = Schema::new();
        schema
            .add(NamedType::Object(ObjectType::new("Query", None)))
            .unwrap();
        assert!(schema.get_object("Query").is_ok());
        assert_eq!(
            schema.get_interface("Query").unwrap_err(),
            SchemaError::WrongKind {
                name: "Query".to_string(),
                expected: "interface"
            }
        );
        assert_eq!(
            schema.get_type("Nope").unwrap_err(),
            SchemaError::NotFound {
                name: "Nope".to_string()
            }
        );
    }
}
