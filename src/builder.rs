//! Builds a [`Schema`] from a parsed [`SchemaDoc`].
//!
//! SDL allows a type to be used before it is declared, so building happens in
//! two passes over the document. The declare pass registers every type name
//! with an empty body. The populate pass then fills in fields, arguments,
//! enum members and implemented interfaces, resolving every type reference
//! against the now complete set of names. Finally the checks in
//! [`crate::checker`] run over the finished registry.
//!
//! Any error aborts the build; a partially built schema is never returned.

use log::{debug, trace};

use crate::checker;
use crate::types::{
    EnumType, Field, InterfaceType, Method, NamedType, ObjectType, Parameter, Property, ScalarType,
    TypeRef,
};
use crate::{
    Description, EnumTypeDef, FieldDef, FieldType, InterfaceTypeDef, ObjectTypeDef, Schema,
    SchemaDef, SchemaDoc, SchemaError, TypeDef,
};

pub struct SchemaBuilder {
    schema: Schema,
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        SchemaBuilder::new()
    }
}

impl SchemaBuilder {
    pub fn new() -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema::new(),
        }
    }

    pub fn build(mut self, doc: &SchemaDoc<'_>) -> Result<Schema, SchemaError> {
        self.declare(doc)?;
        self.populate(doc)?;
        self.set_roots(doc)?;
        for check in checker::CHECKS {
            check.check(&self.schema)?;
        }
        debug!("schema built with {} types", self.schema.len());
        Ok(self.schema)
    }

    fn declare(&mut self, doc: &SchemaDoc<'_>) -> Result<(), SchemaError> {
        for type_def in doc.type_defs() {
            let name = type_def.name().as_str();
            let description = doc_string(type_def.description());
            let named = match type_def {
                TypeDef::Scalar(_) => NamedType::Scalar(ScalarType::custom(name, description)),
                TypeDef::Enum(_) => NamedType::Enum(EnumType::new(name, description)),
                TypeDef::Interface(_) => {
                    NamedType::Interface(InterfaceType::new(name, description))
                }
                TypeDef::Object(_) => NamedType::Object(ObjectType::new(name, description)),
            };
            trace!("declaring {} {}", named.kind(), name);
            self.schema.add(named)?;
        }
        debug!("declared {} types", doc.type_defs().count());
        Ok(())
    }

    fn populate(&mut self, doc: &SchemaDoc<'_>) -> Result<(), SchemaError> {
        for type_def in doc.type_defs() {
            match type_def {
                // scalars have no body
                TypeDef::Scalar(_) => (),
                TypeDef::Enum(def) => self.populate_enum(def)?,
                TypeDef::Interface(def) => self.populate_interface(def)?,
                TypeDef::Object(def) => self.populate_object(def)?,
            }
        }
        debug!("populated {} types", doc.type_defs().count());
        Ok(())
    }

    fn populate_enum(&mut self, def: &EnumTypeDef<'_>) -> Result<(), SchemaError> {
        let enum_type = match self.schema.get_type_mut(def.name.as_str())? {
            NamedType::Enum(enum_type) => enum_type,
            _ => return Err(wrong_kind(def.name.as_str(), "enum")),
        };
        for value in &def.values {
            // members are exposed as nullable String properties
            let member = Property::new(value.name.as_str(), TypeRef::named("String"))
                .with_description(doc_string(value.description.as_ref()));
            enum_type.add_member(member)?;
        }
        Ok(())
    }

    fn populate_interface(&mut self, def: &InterfaceTypeDef<'_>) -> Result<(), SchemaError> {
        let type_name = def.name.as_str();
        let fields = self.resolve_fields(type_name, &def.fields)?;
        let interface = match self.schema.get_type_mut(type_name)? {
            NamedType::Interface(interface) => interface,
            _ => return Err(wrong_kind(type_name, "interface")),
        };
        for field in fields {
            interface.fields_mut().add(field)?;
        }
        Ok(())
    }

    fn populate_object(&mut self, def: &ObjectTypeDef<'_>) -> Result<(), SchemaError> {
        let type_name = def.name.as_str();
        let fields = self.resolve_fields(type_name, &def.fields)?;
        for interface in &def.interfaces {
            match self.schema.get_type(interface.as_str()) {
                Ok(NamedType::Interface(_)) => (),
                Ok(other) => {
                    let reason = format!("{} {} is not an interface", other.kind(), other.name());
                    return Err(SchemaError::nonconforming(
                        type_name,
                        interface.as_str(),
                        reason,
                    ));
                }
                Err(_) => return Err(SchemaError::unknown_type(interface.as_str(), type_name)),
            }
        }
        let object = match self.schema.get_type_mut(type_name)? {
            NamedType::Object(object) => object,
            _ => return Err(wrong_kind(type_name, "object")),
        };
        for field in fields {
            object.fields_mut().add(field)?;
        }
        for interface in &def.interfaces {
            object.add_interface(interface.as_str())?;
        }
        Ok(())
    }

    fn resolve_fields(
        &self,
        type_name: &str,
        field_defs: &[FieldDef<'_>],
    ) -> Result<Vec<Field>, SchemaError> {
        field_defs
            .iter()
            .map(|def| self.resolve_field(type_name, def))
            .collect()
    }

    fn resolve_field(&self, type_name: &str, def: &FieldDef<'_>) -> Result<Field, SchemaError> {
        let field_name = def.field_name.as_str();
        let path = format!("{}.{}", type_name, field_name);
        let ty = self.resolve_type_ref(&def.field_type, &path)?;
        let description = doc_string(def.description.as_ref());
        if def.arguments.is_empty() {
            return Ok(Field::Property(
                Property::new(field_name, ty).with_description(description),
            ));
        }

        let mut parameters: Vec<Parameter> = Vec::with_capacity(def.arguments.len());
        for arg in &def.arguments {
            let arg_name = arg.field_name.as_str();
            if parameters.iter().any(|p| p.name() == arg_name) {
                return Err(SchemaError::DuplicateField {
                    type_name: type_name.to_string(),
                    field_name: format!("{}({})", field_name, arg_name),
                });
            }
            let arg_path = format!("{}({})", path, arg_name);
            let arg_ty = self.resolve_type_ref(&arg.field_type, &arg_path)?;
            self.check_argument_type(&arg_ty, &arg_path)?;
            parameters.push(
                Parameter::new(arg_name, arg_ty)
                    .with_description(doc_string(arg.description.as_ref())),
            );
        }
        Ok(Field::Method(
            Method::new(field_name, ty, parameters).with_description(description),
        ))
    }

    /// Converts a source type into a `TypeRef` whose named type is registered.
    fn resolve_type_ref(
        &self,
        field_type: &FieldType<'_>,
        referenced_by: &str,
    ) -> Result<TypeRef, SchemaError> {
        let name = field_type.innermost_name();
        if !self.schema.contains(name.as_str()) {
            return Err(SchemaError::unknown_type(name.as_str(), referenced_by));
        }
        Ok(TypeRef::from_ast(field_type))
    }

    /// Arguments are literals, so only scalars and enums can be bound to them.
    fn check_argument_type(&self, ty: &TypeRef, argument: &str) -> Result<(), SchemaError> {
        let name = ty.innermost_name();
        if self.schema.get_type(name)?.is_leaf() {
            return Ok(());
        }
        Err(SchemaError::InvalidArgumentType {
            argument: argument.to_string(),
            type_name: name.to_string(),
        })
    }

    fn set_roots(&mut self, doc: &SchemaDoc<'_>) -> Result<(), SchemaError> {
        let mut schema_defs = doc.schema_defs();
        let schema_def: &SchemaDef<'_> = match schema_defs.next() {
            Some(schema_def) => schema_def,
            None => return Ok(()),
        };
        if schema_defs.next().is_some() {
            return Err(SchemaError::duplicate_type("schema"));
        }
        let roots = [schema_def.query, schema_def.mutation, schema_def.subscription];
        for root in roots.into_iter().flatten() {
            if self.schema.get_object(root.as_str()).is_err() {
                return Err(SchemaError::unknown_type(root.as_str(), "schema"));
            }
        }
        if let Some(query) = schema_def.query {
            debug!("query root type is {}", query);
            self.schema.set_query_type(query.as_str());
        }
        Ok(())
    }
}

fn doc_string(description: Option<&Description<'_>>) -> Option<String> {
    description.map(|d| d.value.to_string())
}

fn wrong_kind(name: &str, expected: &'static str) -> SchemaError {
    SchemaError::WrongKind {
        name: name.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_schema;

    fn build(sdl: &str) -> Result<Schema, SchemaError> {
        let doc = parse_schema(sdl).unwrap();
        SchemaBuilder::new().build(&doc)
    }

    #[test]
    fn fields_keep_their_type_and_required_flag() {
        let schema = build("type X { a: Int b: Int! c: [String!] }").unwrap();
        let x = schema.get_object("X").unwrap();
        let a = x.get_property("a").unwrap();
        assert_eq!(a.ty(), &TypeRef::named("Int"));
        assert!(!a.required());
        let b = x.get_property("b").unwrap();
        assert_eq!(b.ty().to_string(), "Int!");
        assert!(b.required());
        let c = x.field("c").unwrap();
        assert_eq!(c.ty().name(), "list");
        assert!(!c.required());
    }

    #[test]
    fn forward_references_resolve() {
        let schema = build("type A { b: B } type B { id: String }").unwrap();
        let b = schema.get_object("A").unwrap().get_property("b").unwrap();
        assert_eq!(b.ty(), &TypeRef::named("B"));
        assert!(schema.get_object("B").is_ok());
    }

    #[test]
    fn fields_with_arguments_become_methods() {
        let schema = build("type Query { human(id: String!, limit: Int): Human } type Human { id: ID }")
            .unwrap();
        let query = schema.query_type().unwrap();
        let human = query.get_method("human").unwrap();
        assert_eq!(human.parameters().len(), 2);
        assert!(human.parameter("id").unwrap().required());
        assert!(!human.parameter("limit").unwrap().required());
        assert!(matches!(
            query.get_property("human"),
            Err(SchemaError::WrongKind { .. })
        ));
    }

    #[test]
    fn enum_members_are_optional_string_properties() {
        let schema = build("enum Episode { NEWHOPE EMPIRE JEDI }").unwrap();
        let episode = match schema.get_type("Episode").unwrap() {
            NamedType::Enum(e) => e,
            other => panic!("not an enum: {:?}", other),
        };
        let values: Vec<&str> = episode.values().collect();
        assert_eq!(values, vec!["NEWHOPE", "EMPIRE", "JEDI"]);
        let jedi = episode.get_property("JEDI").unwrap();
        assert_eq!(jedi.ty(), &TypeRef::named("String"));
        assert!(!jedi.required());
    }

    #[test]
    fn descriptions_are_kept() {
        let schema = build(
            r#"
            "The root"
            type Query {
                """
                The hero of a film.
                """
                hero: String
            }
            "#,
        )
        .unwrap();
        let ty = schema.get_type("Query").unwrap();
        assert_eq!(ty.description(), Some("The root"));
        let hero = schema.query_type().unwrap().field("hero").unwrap();
        assert_eq!(hero.description(), Some("The hero of a film."));
    }

    #[test]
    fn duplicate_types_fail() {
        assert_eq!(
            build("type A { a: Int } interface A { a: Int }").unwrap_err(),
            SchemaError::duplicate_type("A")
        );
        assert_eq!(
            build("scalar String").unwrap_err(),
            SchemaError::duplicate_type("String")
        );
    }

    #[test]
    fn unknown_type_references_fail() {
        assert_eq!(
            build("type A { b: [B!] }").unwrap_err(),
            SchemaError::unknown_type("B", "A.b")
        );
        assert_eq!(
            build("type A { b(x: Nope): Int }").unwrap_err(),
            SchemaError::unknown_type("Nope", "A.b(x)")
        );
        assert_eq!(
            build("type A implements Nope { b: Int }").unwrap_err(),
            SchemaError::unknown_type("Nope", "A")
        );
    }

    #[test]
    fn duplicate_fields_fail() {
        assert!(matches!(
            build("type A { a: Int a(x: Int): Int }").unwrap_err(),
            SchemaError::DuplicateField { .. }
        ));
        assert_eq!(
            build("type A { a(x: Int, x: Int): Int }").unwrap_err(),
            SchemaError::DuplicateField {
                type_name: "A".to_string(),
                field_name: "a(x)".to_string()
            }
        );
        assert!(matches!(
            build("enum E { A A }").unwrap_err(),
            SchemaError::DuplicateField { .. }
        ));
    }

    #[test]
    fn arguments_must_be_scalars_or_enums() {
        assert_eq!(
            build("type Thing { a: Int } type Query { f(x: Thing!): Int }").unwrap_err(),
            SchemaError::InvalidArgumentType {
                argument: "Query.f(x)".to_string(),
                type_name: "Thing".to_string()
            }
        );
        assert!(matches!(
            build("interface Node { id: ID } type Query { f(x: [Node]): Int }").unwrap_err(),
            SchemaError::InvalidArgumentType { .. }
        ));
        assert!(build("enum E { A } type Query { f(x: [E!], y: ID, z: Custom): Int } scalar Custom")
            .is_ok());
    }

    #[test]
    fn implements_must_name_an_interface() {
        let err = build("type B { x: Int } type A implements B { x: Int }").unwrap_err();
        assert!(matches!(err, SchemaError::InterfaceConformance { .. }));
    }

    #[test]
    fn schema_definition_sets_the_query_root() {
        let schema = build("schema { query: Root } type Root { ok: Boolean }").unwrap();
        assert_eq!(schema.query_type_name(), "Root");
        assert_eq!(schema.query_type().unwrap().name(), "Root");

        assert_eq!(
            build("schema { query: Missing }").unwrap_err(),
            SchemaError::unknown_type("Missing", "schema")
        );
    }

    #[test]
    fn building_twice_yields_equal_independent_schemas() {
        let sdl = "interface I { id: ID! } type A implements I { id: ID! n: [Int] }";
        let first = build(sdl).unwrap();
        let second = build(sdl).unwrap();
        assert_eq!(first, second);
        drop(first);
        assert!(second.get_object("A").unwrap().implements("I"));
    }
}
