use super::traits::{Parser, TokenStream};
use super::values;
use super::{ParserConfig, ParserError};
use crate::{
    optional, required, Definition, Description, EnumTypeDef, FieldDef, FieldName, InputValueDef,
    InterfaceName, InterfaceTypeDef, ObjectTypeDef, ScalarTypeDef, SchemaDef, SchemaDoc, Token,
    TokenValue, TypeDef, TypeName,
};

use TokenValue::*;

type Res<T> = std::result::Result<T, ParserError>;

// The context-holding structure for parsing schemas
type SchemaParser<'a> = TokenStream<'a>;

pub fn parse_schema<'a>(text: &'a str) -> Res<SchemaDoc<'a>> {
    parse_schema_with_config(text, ParserConfig::default())
}

pub fn parse_schema_with_config<'a>(text: &'a str, config: ParserConfig) -> Res<SchemaDoc<'a>> {
    let p = SchemaParser::new(text.trim(), config)?;
    let mut doc = SchemaDoc::new();
    parse_top_level(&p, &mut doc)?;
    Ok(doc)
}

fn parse_top_level<'a>(p: &SchemaParser<'a>, doc: &mut SchemaDoc<'a>) -> Res<()> {
    while !p.at_end() {
        let description = values::parse_description(p)?;
        let top_level = p.peek()?;
        let def = parse_definition(p, description, top_level)?;
        doc.definitions.push(def);
    }
    Ok(())
}

fn parse_definition<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
    top_level: Token<'a>,
) -> Res<Definition<'a>> {
    match top_level.val {
        Name("schema") => parse_schema_def(p, description).map(Definition::SchemaDef),
        Name("type") => parse_object_type(p, description).map(Definition::TypeDef),
        Name("scalar") => parse_scalar_type(p, description).map(Definition::TypeDef),
        Name("enum") => parse_enum_type(p, description).map(Definition::TypeDef),
        Name("interface") => parse_interface_type(p, description).map(Definition::TypeDef),
        Name("extend" | "directive" | "input" | "union") => Err(ParserError::unsupported(
            top_level,
            "only schema, type, interface, enum, and scalar definitions are supported",
        )),
        Sigil(_) if top_level.val.is_sigil('$') => Err(ParserError::VariablesNotAllowed {
            value: top_level.val.into(),
            pos: top_level.pos,
        }),
        _ => {
            let message = "not a top-level schema identifier";
            Err(ParserError::syntax(top_level, message))
        }
    }
}

fn replace_none_token<'a>(
    slot: Option<Token<'a>>,
    tok: Token<'a>,
    message: &'static str,
) -> Res<Option<Token<'a>>> {
    if slot.is_some() {
        return Err(ParserError::already_exists(tok, message));
    }
    Ok(Some(tok))
}

fn reject_directives<'a>(p: &SchemaParser<'a>) -> Res<()> {
    match p.peek() {
        Ok(tok) if tok.val.is_sigil('@') => {
            Err(ParserError::unsupported(tok, "directives are not supported"))
        }
        _ => Ok(()),
    }
}

fn parse_object_type<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
) -> Res<TypeDef<'a>> {
    let Token { pos, .. } = required!(p, Name("type"), "invalid `type` identifier")?;
    let name = required!(p, Name(_), "invalid object name")?;
    let interfaces = parse_interfaces(p)?;
    reject_directives(p)?;
    let fields = parse_optional_field_defs(p, "expected '}' - object block did not close")?;

    Ok(TypeDef::Object(ObjectTypeDef {
        pos,
        description,
        name: TypeName::from(name),
        fields,
        interfaces,
    }))
}

fn parse_interfaces<'a>(p: &SchemaParser<'a>) -> Res<Vec<InterfaceName<'a>>> {
    let implements = optional!(p, Name("implements"))?;
    if implements.is_none() {
        return Ok(vec![]);
    }
    // a leading `&` is allowed: `implements & A & B`
    let _ = optional!(p, Ampersand)?;
    let mut interfaces = Vec::new();
    loop {
        let name = required!(p, Name(_), "expected an interface name")?;
        interfaces.push(InterfaceName::from(name));
        if optional!(p, Ampersand)?.is_none() {
            return Ok(interfaces);
        }
    }
}

fn parse_optional_field_defs<'a>(
    p: &SchemaParser<'a>,
    msg: &'static str,
) -> Res<Vec<FieldDef<'a>>> {
    let open = optional!(p, OpenCurly)?;
    if open.is_some() {
        let fields = parse_field_defs(p)?;
        let _ = required!(p, CloseCurly, msg)?;
        Ok(fields)
    } else {
        Ok(vec![])
    }
}

fn parse_interface_type<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
) -> Res<TypeDef<'a>> {
    let Token { pos, .. } = required!(p, Name("interface"), "invalid `interface` identifier")?;
    let name = required!(p, Name(_), "invalid interface name")?;
    if let Some(tok) = optional!(p, Name("implements"))? {
        return Err(ParserError::unsupported(
            tok,
            "interfaces implementing interfaces are not supported",
        ));
    }
    reject_directives(p)?;
    let fields = parse_optional_field_defs(p, "expected '}' - unclosed interface fields block")?;
    Ok(TypeDef::Interface(InterfaceTypeDef {
        pos,
        description,
        name: TypeName::from(name),
        fields,
    }))
}

fn parse_scalar_type<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
) -> Res<TypeDef<'a>> {
    // https://spec.graphql.org/draft/#sec-Scalars
    let Token { pos, .. } = required!(p, Name("scalar"), "invalid `scalar` identifier")?;
    let name = required!(p, Name(_), "invalid scalar name")?;
    reject_directives(p)?;
    Ok(TypeDef::Scalar(ScalarTypeDef {
        description,
        pos,
        name: TypeName::from(name),
    }))
}

fn parse_enum_type<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
) -> Res<TypeDef<'a>> {
    // https://spec.graphql.org/draft/#sec-Enums
    let Token { pos, .. } = required!(p, Name("enum"), "invalid `enum` identifier")?;
    let name = required!(p, Name(_), "invalid enum name")?;
    reject_directives(p)?;
    let open = optional!(p, OpenCurly)?;
    let values = if open.is_some() {
        let enum_vals = values::parse_enum_values(p)?;
        let _ = required!(p, CloseCurly, "enum values block did not close")?;
        enum_vals
    } else {
        vec![]
    };

    Ok(TypeDef::Enum(EnumTypeDef {
        pos,
        description,
        name: TypeName::from(name),
        values,
    }))
}

fn parse_field_defs<'a>(p: &SchemaParser<'a>) -> Res<Vec<FieldDef<'a>>> {
    let mut fields = Vec::new();
    loop {
        let description = values::parse_description(p)?;
        let tok = p.peek()?;
        match tok.val {
            CloseCurly => {
                if description.is_some() {
                    return Err(ParserError::syntax(
                        tok,
                        "description does not belong at the end of a block",
                    ));
                }
                return Ok(fields);
            }
            Name(_) => {
                let fd = parse_field_def(p, description)?;
                fields.push(fd);
            }
            _ => {
                let message = "invalid field definition";
                return Err(ParserError::syntax(tok, message));
            }
        }
    }
}

fn parse_input_value_defs<'a>(p: &SchemaParser<'a>) -> Res<Vec<InputValueDef<'a>>> {
    let mut args = Vec::new();
    loop {
        let description = values::parse_description(p)?;
        let tok = p.next()?;
        match tok.val {
            CloseParen if description.is_none() => {
                if args.is_empty() {
                    return Err(ParserError::syntax(tok, "argument list cannot be empty"));
                }
                return Ok(args);
            }
            Name(_) => {
                let _ = required!(p, Colon, "argument requires a colon after its name")?;
                let field_type = values::parse_field_type(p)?;
                if let Some(eq) = optional!(p, Sigil("="))? {
                    return Err(ParserError::unsupported(
                        eq,
                        "default values are not supported",
                    ));
                }
                reject_directives(p)?;
                args.push(InputValueDef {
                    pos: tok.pos,
                    description,
                    field_name: FieldName::from(tok),
                    field_type,
                });
            }
            _ => return Err(ParserError::syntax(tok, "invalid argument definition")),
        }
    }
}

fn parse_field_def<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
) -> Res<FieldDef<'a>> {
    // https://spec.graphql.org/draft/#FieldDefinition
    let name = required!(p, Name(_), "invalid object field name")?;
    let pos = name.pos;
    // only parse arguments if there is an open paren
    let open_paren = optional!(p, OpenParen)?;
    let arguments = if open_paren.is_some() {
        parse_input_value_defs(p)?
    } else {
        vec![]
    };
    let _ = required!(
        p,
        Colon,
        "invalid object field - requires a colon after the field name and args"
    )?;
    let field_type = values::parse_field_type(p)?;
    reject_directives(p)?;

    Ok(FieldDef {
        pos,
        description,
        field_name: FieldName::from(name),
        arguments,
        field_type,
    })
}

fn parse_schema_def<'a>(
    p: &SchemaParser<'a>,
    description: Option<Description<'a>>,
) -> Res<SchemaDef<'a>> {
    let schema = required!(p, Name("schema"), "expected top-level keyword `schema`")?;
    reject_directives(p)?;
    let _ = required!(
        p,
        OpenCurly,
        "schema fields did not open with curly brackets"
    )?;

    let mut q = None;
    let mut m = None;
    let mut s = None;

    loop {
        let field_tok = p.next()?;
        match field_tok.val {
            Name("query") => {
                let _ = required!(p, Colon, "schema query field must be followed by a colon")?;
                let tok = required!(p, Name(_), "schema query requires a name")?;
                let msg = "schema definition can only have one root query";
                q = replace_none_token(q, tok, msg)?;
            }
            Name("mutation") => {
                let _ = required!(
                    p,
                    Colon,
                    "schema mutation field must be followed by a colon"
                )?;
                let tok = required!(p, Name(_), "schema mutation requires a name")?;
                let msg = "schema definition can only have one root mutation";
                m = replace_none_token(m, tok, msg)?;
            }
            Name("subscription") => {
                let _ = required!(
                    p,
                    Colon,
                    "schema subscription field must be followed by a colon"
                )?;
                let tok = required!(p, Name(_), "schema subscription requires a name")?;
                let msg = "schema definition can only have one root subscription";
                s = replace_none_token(s, tok, msg)?;
            }
            CloseCurly => {
                // we reached the end of the schema definition block.
                return Ok(SchemaDef {
                    pos: schema.pos,
                    query: q.map(TypeName::from),
                    mutation: m.map(TypeName::from),
                    subscription: s.map(TypeName::from),
                    description,
                });
            }
            _ => return Err(ParserError::syntax(field_tok, "invalid schema definition")),
        }
    }
}
