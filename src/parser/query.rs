use super::traits::{Parser, TokenStream};
use super::values;
use super::{ParserConfig, ParserError};

use crate::{
    optional, required, Field, FieldName, OpDef, OpName, OpType, Operation, QueryDoc, Token,
    TokenValue,
};
use TokenValue::*;

type Res<T> = Result<T, ParserError>;

// The context-holding structure for parsing queries
type QueryParser<'a> = TokenStream<'a>;

pub fn parse_query<'a>(text: &'a str) -> Res<QueryDoc<'a>> {
    parse_query_with_config(text, ParserConfig::default())
}

pub fn parse_query_with_config<'a>(text: &'a str, config: ParserConfig) -> Res<QueryDoc<'a>> {
    let p = QueryParser::new(text.trim(), config)?;
    let mut doc = QueryDoc::new();
    parse_top_level(&p, &mut doc)?;
    Ok(doc)
}

fn parse_top_level<'a>(p: &QueryParser<'a>, doc: &mut QueryDoc<'a>) -> Res<()> {
    while !p.at_end() {
        let top_level = p.peek()?;
        let op = parse_top_level_once(p, top_level)?;
        doc.definitions.push(op);
    }
    Ok(())
}

fn parse_top_level_once<'a>(p: &QueryParser<'a>, top_level: Token<'a>) -> Res<Operation<'a>> {
    match top_level.val {
        OpenCurly => {
            let ss = parse_selection_set(p)?;
            Ok(Operation::SelectionSet(ss))
        }
        Name("query") => parse_operation(p, OpType::Query),
        Name("mutation") => parse_operation(p, OpType::Mutation),
        Name("subscription") => parse_operation(p, OpType::Subscription),
        Name("fragment") => Err(ParserError::unsupported(
            top_level,
            "fragments are not supported",
        )),
        _ => {
            let message = "expected query operation identifier or selection set";
            Err(ParserError::syntax(top_level, message))
        }
    }
}

fn parse_operation<'a>(p: &QueryParser<'a>, op_type: OpType) -> Res<Operation<'a>> {
    let tok = required!(p, Name(_), "invalid operation identifier")?;
    if tok.as_str() != op_type.as_str() {
        return Err(ParserError::unexpected(tok, op_type.as_str()));
    }
    let pos = tok.pos;

    let op_name = optional!(p, Name(_))?;
    if let Some(open) = optional!(p, OpenParen)? {
        return Err(ParserError::unsupported(
            open,
            "variable definitions are not supported",
        ));
    }
    reject_directives(p)?;
    let selection_set = parse_selection_set(p)?;
    if selection_set.is_empty() {
        return Err(ParserError::syntax(tok, "an operation requires a selection set"));
    }
    Ok(Operation::OpDef(OpDef {
        pos,
        op_type,
        op_name: op_name.map(OpName::from),
        selection_set,
    }))
}

fn reject_directives<'a>(p: &QueryParser<'a>) -> Res<()> {
    match p.peek() {
        Ok(tok) if tok.val.is_sigil('@') => {
            Err(ParserError::unsupported(tok, "directives are not supported"))
        }
        _ => Ok(()),
    }
}

fn parse_selection_set<'a>(p: &QueryParser<'a>) -> Res<Vec<Field<'a>>> {
    let open_curly = match optional!(p, OpenCurly)? {
        Some(tok) => tok,
        // we are not parsing a selection set
        None => return Ok(vec![]),
    };
    // the curly was consumed and we are into the body/block of the selection set.
    p.descend(open_curly)?;

    let mut selections = Vec::new();
    loop {
        let tok = p.peek()?;
        match tok.val {
            Name(_) => {
                let sel = parse_selection_field(p)?;
                selections.push(sel);
            }
            CloseCurly => {
                _ = p.next();
                break;
            }
            Sigil(_) if tok.val.is_sigil('.') => {
                return Err(ParserError::unsupported(tok, "fragments are not supported"));
            }
            _ => {
                return Err(ParserError::syntax(tok, "invalid selection set field"));
            }
        }
    }
    p.ascend();

    if selections.is_empty() {
        return Err(ParserError::syntax(open_curly, "selection set cannot be empty"));
    }
    Ok(selections)
}

fn parse_selection_field<'a>(p: &QueryParser<'a>) -> Res<Field<'a>> {
    let name_or_alias = required!(p, Name(_), "field requires a name or alias")?;
    let pos = name_or_alias.pos;
    let colon = optional!(p, Colon)?;
    let (alias, name) = if colon.is_some() {
        // name_or_alias is alias. next is name.
        let name = required!(p, Name(_), "aliased field requires a name")?;
        (Some(name_or_alias), name)
    } else {
        // name_or_alias is name. there is no alias.
        (None, name_or_alias)
    };
    let open_paren = optional!(p, OpenParen)?;
    let arguments = if open_paren.is_some() {
        values::parse_arguments(p)?
    } else {
        vec![]
    };

    reject_directives(p)?;
    let selection_set = parse_selection_set(p)?;

    Ok(Field {
        pos,
        alias: alias.map(FieldName::from),
        name: FieldName::from(name),
        arguments,
        selection_set,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Argument, EnumValueName, Int, Pos, Value};

    fn only_op<'a>(doc: &'a QueryDoc<'a>) -> &'a OpDef<'a> {
        assert_eq!(doc.definitions.len(), 1);
        match &doc.definitions[0] {
            Operation::OpDef(op_def) => op_def,
            other => panic!("not an operation definition: {:?}", other),
        }
    }

    #[test]
    fn parses_simple_query_operation() {
        let doc = parse_query("query { name }").unwrap();
        let op = only_op(&doc);
        assert_eq!(op.pos, Pos { line: 1, col: 1 });
        assert_eq!(op.op_type, OpType::Query);
        assert_eq!(op.op_name, None);
        assert_eq!(op.selection_set.len(), 1);
        let field = &op.selection_set[0];
        assert_eq!(field.alias, None);
        assert_eq!(field.name, FieldName("name"));
        assert_eq!(field.arguments, vec![]);
        assert_eq!(field.pos, Pos { line: 1, col: 9 });
        assert_eq!(field.selection_set, vec![]);
    }

    #[test]
    fn parses_lone_selection_set_operation() {
        let doc = parse_query("{ name }").unwrap();
        assert_eq!(doc.definitions.len(), 1);
        match &doc.definitions[0] {
            Operation::SelectionSet(selection_set) => {
                assert_eq!(selection_set.len(), 1);
                assert_eq!(selection_set[0].name, FieldName("name"));
                assert_eq!(selection_set[0].pos, Pos { line: 1, col: 3 });
            }
            other => panic!("not a selection set: {:?}", other),
        }
        assert_eq!(doc.definitions[0].op_type(), OpType::Query);
    }

    #[test]
    fn parses_a_named_operation_with_nested_fields() {
        let text = r#"
    query myQuery {
        theQuery {
            names
        }
    }
    "#;
        let doc = parse_query(text).unwrap();
        let op = only_op(&doc);
        assert_eq!(op.op_name, Some(OpName("myQuery")));
        let the_query = &op.selection_set[0];
        assert_eq!(the_query.name, FieldName("theQuery"));
        assert_eq!(the_query.pos, Pos { line: 2, col: 9 });
        assert_eq!(the_query.selection_set.len(), 1);
        let names = &the_query.selection_set[0];
        assert_eq!(names.name, FieldName("names"));
        assert_eq!(names.pos, Pos { line: 3, col: 13 });
    }

    #[test]
    fn parses_aliases_and_literal_arguments() {
        let doc = parse_query(r#"{ luke: human(id: "1000", ep: EMPIRE, n: 3) { name } }"#).unwrap();
        let field = &doc.definitions[0].selection_set()[0];
        assert_eq!(field.alias, Some(FieldName("luke")));
        assert_eq!(field.name, FieldName("human"));
        assert_eq!(field.response_name(), "luke");
        let values: Vec<&Value> = field.arguments.iter().map(|a: &Argument| &a.value).collect();
        assert_eq!(
            values,
            vec![
                &Value::String("1000".into()),
                &Value::Enum(EnumValueName("EMPIRE")),
                &Value::Int(Int(3)),
            ]
        );
    }

    #[test]
    fn parses_mutations_so_they_can_be_rejected_later() {
        let doc = parse_query("mutation M { doIt }").unwrap();
        assert_eq!(only_op(&doc).op_type, OpType::Mutation);
    }

    #[test]
    fn rejects_unsupported_syntax() {
        for text in [
            "query Q($id: ID) { a }",
            "{ a { ...frag } }",
            "{ a { ... on B { c } } }",
            "fragment f on A { a }",
            "{ a @skip(if: true) }",
            "{ a(id: $id) }",
        ] {
            let err = parse_query(text).unwrap_err();
            assert!(
                matches!(err, ParserError::Unsupported { .. }),
                "{}: {:?}",
                text,
                err
            );
        }
    }

    #[test]
    fn rejects_empty_selection_sets() {
        let err = parse_query("{ a { } }").unwrap_err();
        assert!(matches!(err, ParserError::SyntaxError { .. }));
    }

    #[test]
    fn selection_depth_is_limited() {
        let config = ParserConfig::default().with_depth_limit(2);
        let err = parse_query_with_config("{ a { b { c } } }", config).unwrap_err();
        assert!(matches!(err, ParserError::DepthLimitExceeded { .. }));
        assert!(parse_query_with_config("{ a { b } }", config).is_ok());
    }
}
