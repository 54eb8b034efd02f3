//! The type model held by a [`Schema`](crate::Schema).
//!
//! Field types are [`TypeRef`]s: a named type wrapped in any nesting of list and
//! non-null markers. Nullability is part of the type, so `[Int!]` and `[Int]!`
//! are different values and element nullability composes with field
//! nullability. The `required` flag that SDL users think in is derived from the
//! outermost wrapper.

use std::fmt;

use indexmap::IndexMap;

use crate::{FieldType, SchemaError};

mod scalars;
pub use scalars::ScalarKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef::Named(name.into())
    }

    pub fn list(inner: TypeRef) -> TypeRef {
        TypeRef::List(Box::new(inner))
    }

    pub fn non_null(inner: TypeRef) -> TypeRef {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// The type with its outermost non-null marker removed.
    pub fn nullable(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// The element type if this is a (possibly non-null) list.
    pub fn list_element(&self) -> Option<&TypeRef> {
        match self.nullable() {
            TypeRef::List(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn innermost_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.innermost_name(),
        }
    }

    /// Display name: the named type, or "list" for list types.
    pub fn name(&self) -> &str {
        match self.nullable() {
            TypeRef::Named(name) => name,
            _ => "list",
        }
    }

    pub(crate) fn from_ast(field_type: &FieldType<'_>) -> TypeRef {
        match field_type {
            FieldType::Name(name) => TypeRef::named(name.as_str()),
            FieldType::List(inner) => TypeRef::list(TypeRef::from_ast(inner)),
            FieldType::NonNull(inner) => TypeRef::non_null(TypeRef::from_ast(inner)),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// A field without arguments. Also used for method parameters and enum members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    ty: TypeRef,
    description: Option<String>,
}

/// A method argument.
pub type Parameter = Property;

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Property {
        Property {
            name: name.into(),
            ty,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Property {
        self.description = description;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// The value may not be null.
    pub fn required(&self) -> bool {
        self.ty.is_non_null()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

/// A field with arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    name: String,
    ty: TypeRef,
    parameters: Vec<Parameter>,
    description: Option<String>,
}

impl Method {
    pub fn new(name: impl Into<String>, ty: TypeRef, parameters: Vec<Parameter>) -> Method {
        Method {
            name: name.into(),
            ty,
            parameters,
            description: None,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Method {
        self.description = description;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    pub fn required(&self) -> bool {
        self.ty.is_non_null()
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Result<&Parameter, SchemaError> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SchemaError::FieldNotFound {
                type_name: self.name.clone(),
                field_name: name.to_string(),
            })
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, "): {}", self.ty)
    }
}

/// A member of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Property(Property),
    Method(Method),
}

impl Field {
    pub fn name(&self) -> &str {
        match self {
            Field::Property(p) => p.name(),
            Field::Method(m) => m.name(),
        }
    }

    pub fn ty(&self) -> &TypeRef {
        match self {
            Field::Property(p) => p.ty(),
            Field::Method(m) => m.ty(),
        }
    }

    pub fn required(&self) -> bool {
        self.ty().is_non_null()
    }

    /// The parameters of a method; empty for properties.
    pub fn parameters(&self) -> &[Parameter] {
        match self {
            Field::Property(_) => &[],
            Field::Method(m) => m.parameters(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Field::Property(p) => p.description(),
            Field::Method(m) => m.description(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Property(p) => fmt::Display::fmt(p, f),
            Field::Method(m) => fmt::Display::fmt(m, f),
        }
    }
}

/// Fields keyed by name, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    type_name: String,
    map: IndexMap<String, Field>,
}

impl Fields {
    fn new(type_name: &str) -> Fields {
        Fields {
            type_name: type_name.to_string(),
            map: IndexMap::new(),
        }
    }

    pub(crate) fn add(&mut self, field: Field) -> Result<(), SchemaError> {
        if self.map.contains_key(field.name()) {
            return Err(SchemaError::DuplicateField {
                type_name: self.type_name.clone(),
                field_name: field.name().to_string(),
            });
        }
        self.map.insert(field.name().to_string(), field);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Result<&Field, SchemaError> {
        self.map.get(name).ok_or_else(|| SchemaError::FieldNotFound {
            type_name: self.type_name.clone(),
            field_name: name.to_string(),
        })
    }

    pub fn get_property(&self, name: &str) -> Result<&Property, SchemaError> {
        match self.field(name)? {
            Field::Property(p) => Ok(p),
            Field::Method(_) => Err(SchemaError::WrongKind {
                name: format!("{}.{}", self.type_name, name),
                expected: "property",
            }),
        }
    }

    pub fn get_method(&self, name: &str) -> Result<&Method, SchemaError> {
        match self.field(name)? {
            Field::Method(m) => Ok(m),
            Field::Property(_) => Err(SchemaError::WrongKind {
                name: format!("{}.{}", self.type_name, name),
                expected: "method",
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.map.values()
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.iter().filter_map(|f| match f {
            Field::Property(p) => Some(p),
            Field::Method(_) => None,
        })
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.iter().filter_map(|f| match f {
            Field::Method(m) => Some(m),
            Field::Property(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarType {
    name: String,
    kind: ScalarKind,
    description: Option<String>,
}

impl ScalarType {
    pub(crate) fn builtin(kind: ScalarKind) -> ScalarType {
        ScalarType {
            name: kind.name().to_string(),
            kind,
            description: None,
        }
    }

    pub(crate) fn custom(name: &str, description: Option<String>) -> ScalarType {
        ScalarType {
            name: name.to_string(),
            kind: ScalarKind::Custom,
            description,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }
}

/// An enum type. Each member is also exposed as a `String` property that is never required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    members: Fields,
    description: Option<String>,
}

impl EnumType {
    pub(crate) fn new(name: &str, description: Option<String>) -> EnumType {
        EnumType {
            name: name.to_string(),
            members: Fields::new(name),
            description,
        }
    }

    pub(crate) fn add_member(&mut self, property: Property) -> Result<(), SchemaError> {
        self.members.add(Field::Property(property))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get_property(&self, name: &str) -> Result<&Property, SchemaError> {
        self.members.get_property(name)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Property> {
        self.members.properties()
    }

    /// The declared member names, in order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Field::name)
    }

    pub fn has_value(&self, name: &str) -> bool {
        self.members.field(name).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    name: String,
    fields: Fields,
    description: Option<String>,
}

impl InterfaceType {
    pub(crate) fn new(name: &str, description: Option<String>) -> InterfaceType {
        InterfaceType {
            name: name.to_string(),
            fields: Fields::new(name),
            description,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Result<&Field, SchemaError> {
        self.fields.field(name)
    }

    pub fn get_property(&self, name: &str) -> Result<&Property, SchemaError> {
        self.fields.get_property(name)
    }

    pub fn get_method(&self, name: &str) -> Result<&Method, SchemaError> {
        self.fields.get_method(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    name: String,
    fields: Fields,
    interfaces: Vec<String>,
    description: Option<String>,
}

impl ObjectType {
    pub(crate) fn new(name: &str, description: Option<String>) -> ObjectType {
        ObjectType {
            name: name.to_string(),
            fields: Fields::new(name),
            interfaces: Vec::new(),
            description,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub(crate) fn fields_mut(&mut self) -> &mut Fields {
        &mut self.fields
    }

    pub fn field(&self, name: &str) -> Result<&Field, SchemaError> {
        self.fields.field(name)
    }

    pub fn get_property(&self, name: &str) -> Result<&Property, SchemaError> {
        self.fields.get_property(name)
    }

    pub fn get_method(&self, name: &str) -> Result<&Method, SchemaError> {
        self.fields.get_method(name)
    }

    /// Names of the interfaces this type declares.
    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }

    pub(crate) fn add_interface(&mut self, interface: &str) -> Result<(), SchemaError> {
        if self.implements(interface) {
            return Err(SchemaError::InterfaceConformance {
                object: self.name.clone(),
                interface: interface.to_string(),
                reason: "interface is listed more than once".to_string(),
            });
        }
        self.interfaces.push(interface.to_string());
        Ok(())
    }
}

/// A type that can be looked up by name in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedType {
    Scalar(ScalarType),
    Enum(EnumType),
    Interface(InterfaceType),
    Object(ObjectType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Scalar(t) => t.name(),
            NamedType::Enum(t) => t.name(),
            NamedType::Interface(t) => t.name(),
            NamedType::Object(t) => t.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NamedType::Scalar(_) => "scalar",
            NamedType::Enum(_) => "enum",
            NamedType::Interface(_) => "interface",
            NamedType::Object(_) => "object",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            NamedType::Scalar(t) => t.description.as_deref(),
            NamedType::Enum(t) => t.description.as_deref(),
            NamedType::Interface(t) => t.description.as_deref(),
            NamedType::Object(t) => t.description.as_deref(),
        }
    }

    /// The fields of an object or interface type.
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            NamedType::Interface(t) => Some(t.fields()),
            NamedType::Object(t) => Some(t.fields()),
            NamedType::Scalar(_) | NamedType::Enum(_) => None,
        }
    }

    /// Scalars and enums are leaves; they take no selection set.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NamedType::Scalar(_) | NamedType::Enum(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_refs_display_like_sdl() {
        let ty = TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("Int"))));
        assert_eq!(ty.to_string(), "[Int!]!");
        assert_eq!(ty.name(), "list");
        assert_eq!(ty.innermost_name(), "Int");
        assert!(ty.is_non_null());
        assert_eq!(ty.list_element(), Some(&TypeRef::non_null(TypeRef::named("Int"))));
    }

    #[test]
    fn required_follows_the_outer_wrapper() {
        let list_of_required = Property::new("xs", TypeRef::list(TypeRef::non_null(TypeRef::named("Int"))));
        assert!(!list_of_required.required());
        let required_list = Property::new("xs", TypeRef::non_null(TypeRef::list(TypeRef::named("Int"))));
        assert!(required_list.required());
    }

    #[test]
    fn fields_reject_duplicates_and_report_misses() {
        let mut fields = Fields::new("Human");
        fields
            .add(Field::Property(Property::new("id", TypeRef::named("ID"))))
            .unwrap();
        let err = fields
            .add(Field::Method(Method::new("id", TypeRef::named("ID"), vec![])))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                type_name: "Human".to_string(),
                field_name: "id".to_string()
            }
        );
        assert!(matches!(
            fields.get_method("id"),
            Err(SchemaError::WrongKind { expected: "method", .. })
        ));
        assert!(matches!(
            fields.field("nope"),
            Err(SchemaError::FieldNotFound { .. })
        ));
    }

    #[test]
    fn methods_display_their_parameters() {
        let m = Method::new(
            "human",
            TypeRef::named("Human"),
            vec![Property::new("id", TypeRef::non_null(TypeRef::named("String")))],
        );
        assert_eq!(m.to_string(), "human(id: String!): Human");
        assert!(m.parameter("id").unwrap().required());
        assert!(m.parameter("name").is_err());
    }
}
