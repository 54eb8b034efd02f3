use crate::{Description, EnumValueName, FieldName, FieldType, InterfaceName, Pos, TypeName};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDoc<'a> {
    pub definitions: Vec<Definition<'a>>,
}

impl<'a> SchemaDoc<'a> {
    pub fn new() -> SchemaDoc<'a> {
        SchemaDoc {
            definitions: Vec::new(),
        }
    }

    pub fn type_defs(&self) -> impl Iterator<Item = &TypeDef<'a>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::TypeDef(type_def) => Some(type_def),
            Definition::SchemaDef(_) => None,
        })
    }

    pub fn schema_defs(&self) -> impl Iterator<Item = &SchemaDef<'a>> {
        self.definitions.iter().filter_map(|def| match def {
            Definition::SchemaDef(schema_def) => Some(schema_def),
            Definition::TypeDef(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition<'a> {
    SchemaDef(SchemaDef<'a>),
    TypeDef(TypeDef<'a>),
}

/// `schema { query: Root }`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub query: Option<TypeName<'a>>,
    pub mutation: Option<TypeName<'a>>,
    pub subscription: Option<TypeName<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDef<'a> {
    Scalar(ScalarTypeDef<'a>),
    Enum(EnumTypeDef<'a>),
    Interface(InterfaceTypeDef<'a>),
    Object(ObjectTypeDef<'a>),
}

impl<'a> TypeDef<'a> {
    pub fn name(&self) -> TypeName<'a> {
        match self {
            TypeDef::Scalar(t) => t.name,
            TypeDef::Enum(t) => t.name,
            TypeDef::Interface(t) => t.name,
            TypeDef::Object(t) => t.name,
        }
    }

    pub fn pos(&self) -> Pos {
        match self {
            TypeDef::Scalar(t) => t.pos,
            TypeDef::Enum(t) => t.pos,
            TypeDef::Interface(t) => t.pos,
            TypeDef::Object(t) => t.pos,
        }
    }

    pub fn description(&self) -> Option<&Description<'a>> {
        match self {
            TypeDef::Scalar(t) => t.description.as_ref(),
            TypeDef::Enum(t) => t.description.as_ref(),
            TypeDef::Interface(t) => t.description.as_ref(),
            TypeDef::Object(t) => t.description.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarTypeDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub name: TypeName<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumTypeDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub name: TypeName<'a>,
    pub values: Vec<EnumValueDef<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub name: EnumValueName<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceTypeDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub name: TypeName<'a>,
    pub fields: Vec<FieldDef<'a>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub name: TypeName<'a>,
    pub interfaces: Vec<InterfaceName<'a>>,
    pub fields: Vec<FieldDef<'a>>,
}

/// https://spec.graphql.org/draft/#FieldDefinition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub field_name: FieldName<'a>,
    pub arguments: Vec<InputValueDef<'a>>,
    pub field_type: FieldType<'a>,
}

/// https://spec.graphql.org/draft/#InputValueDefinition
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDef<'a> {
    pub pos: Pos,
    pub description: Option<Description<'a>>,
    pub field_name: FieldName<'a>,
    pub field_type: FieldType<'a>,
}
