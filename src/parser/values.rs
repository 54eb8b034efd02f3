use std::borrow::Cow;

use super::traits::Parser;
use super::ParserError;
use crate::{optional, required};
use crate::{
    Argument, Description, EnumValueDef, EnumValueName, FieldName, FieldType, Float64, Int, Token,
    TokenValue, TypeName, Value,
};
use TokenValue::*;

type Res<T> = Result<T, ParserError>;

pub fn parse_arguments<'a, P: Parser<'a>>(p: &P) -> Res<Vec<Argument<'a>>> {
    // the open paren was already consumed by the caller.
    let mut arguments = Vec::new();
    loop {
        let tok = p.peek()?;
        match &tok.val {
            Name(_) => {
                _ = p.next();
                let name = FieldName::from(tok);
                _ = required!(p, Colon, "expected ':' after arg name")?;
                let value = parse_value(p)?;
                arguments.push(Argument {
                    pos: tok.pos,
                    name,
                    value,
                });
            }
            CloseParen => {
                _ = p.next();
                break;
            }
            Sigil(_) if tok.val.is_sigil('$') => {
                return Err(ParserError::unsupported(tok, "variables are not supported"))
            }
            _ => return Err(ParserError::syntax(tok, "expected argument name")),
        }
    }
    if arguments.is_empty() {
        let tok = p.peek_prev().ok_or_else(|| ParserError::unexpected_eof(None, "expected `)`"))?;
        return Err(ParserError::syntax(tok, "argument list cannot be empty"));
    }
    Ok(arguments)
}

#[inline]
pub fn parse_value<'a, P: Parser<'a>>(p: &P) -> Res<Value<'a>> {
    let tok = p.next()?;
    let val = match tok.val {
        StringLit(s) => Value::String(string_value(s, tok)?),
        BlockStringLit(s) => Value::String(block_string_value(s)),
        IntLit(s) => parse_int(s, tok)?,
        FloatLit(s) => parse_float(s, tok)?,
        Name("true") => Value::Boolean(true),
        Name("false") => Value::Boolean(false),
        Name("null") => Value::Null,
        Name(name) => Value::Enum(EnumValueName(name)),
        OpenBracket => parse_rest_list(p, tok)?,
        Sigil(_) if tok.val.is_sigil('$') => {
            return Err(ParserError::unsupported(tok, "variables are not supported"))
        }
        OpenCurly => {
            return Err(ParserError::unsupported(
                tok,
                "input object literals are not supported",
            ))
        }
        _ => return Err(ParserError::syntax(tok, "expected a value")),
    };
    Ok(val)
}

fn parse_rest_list<'a, P: Parser<'a>>(p: &P, open: Token<'a>) -> Res<Value<'a>> {
    p.descend(open)?;
    let mut items = Vec::new();
    loop {
        let tok = p.peek()?;
        if tok.val == CloseBracket {
            _ = p.next();
            break;
        }
        items.push(parse_value(p)?);
    }
    p.ascend();
    Ok(Value::List(items))
}

fn parse_int<'a>(s: &'a str, tok: Token<'a>) -> Res<Value<'a>> {
    s.parse::<i64>()
        .map(Int::from)
        .map(Value::Int)
        .map_err(|_| ParserError::int(tok))
}

fn parse_float<'a>(s: &'a str, tok: Token<'a>) -> Res<Value<'a>> {
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Float64::from)
        .map(Value::Float)
        .ok_or_else(|| ParserError::float(tok))
}

/// Strips the quotes from a string literal and resolves escape sequences.
pub(crate) fn string_value<'a>(raw: &'a str, tok: Token<'a>) -> Res<Cow<'a, str>> {
    let inner = &raw[1..raw.len() - 1];
    if !inner.contains('\\') {
        return Ok(Cow::Borrowed(inner));
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('"') => '"',
            Some('\\') => '\\',
            Some('/') => '/',
            Some('b') => '\u{0008}',
            Some('f') => '\u{000C}',
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return Err(ParserError::string(tok, "incomplete unicode escape"));
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| ParserError::string(tok, "invalid unicode escape"))?
            }
            _ => return Err(ParserError::string(tok, "invalid escape sequence")),
        };
        out.push(escaped);
    }
    Ok(Cow::Owned(out))
}

/// Strips the triple quotes from a block string and removes the common indentation.
pub(crate) fn block_string_value<'a>(raw: &'a str) -> Cow<'a, str> {
    let inner = raw[3..raw.len() - 3].replace("\\\"\"\"", "\"\"\"");
    let lines: Vec<&str> = inner.lines().collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut cooked: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.len() < common_indent {
                line.trim_start_matches(|c| i > 0 && (c == ' ' || c == '\t'))
            } else {
                &line[common_indent..]
            }
        })
        .collect();
    while cooked.first().map_or(false, |l| l.trim().is_empty()) {
        cooked.remove(0);
    }
    while cooked.last().map_or(false, |l| l.trim().is_empty()) {
        cooked.pop();
    }
    Cow::Owned(cooked.join("\n"))
}

pub fn parse_field_type<'a, P: Parser<'a>>(p: &P) -> Res<FieldType<'a>> {
    let tok = p.next()?;
    let ty = match tok.val {
        Name(_) => FieldType::Name(TypeName::from(tok)),
        OpenBracket => {
            p.descend(tok)?;
            let inner = parse_field_type(p)?;
            _ = required!(p, CloseBracket, "expected ']' to close the list type")?;
            p.ascend();
            FieldType::List(Box::new(inner))
        }
        _ => return Err(ParserError::syntax(tok, "expected a type")),
    };
    let bang = optional!(p, Bang)?;
    if bang.is_some() {
        Ok(FieldType::NonNull(Box::new(ty)))
    } else {
        Ok(ty)
    }
}

pub fn parse_description<'a, P: Parser<'a>>(p: &P) -> Res<Option<Description<'a>>> {
    match p.peek() {
        Err(_) => Ok(None),
        Ok(tok) => match tok.val {
            StringLit(s) => {
                _ = p.next();
                Ok(Some(Description {
                    pos: tok.pos,
                    value: string_value(s, tok)?,
                }))
            }
            BlockStringLit(s) => {
                _ = p.next();
                Ok(Some(Description {
                    pos: tok.pos,
                    value: block_string_value(s),
                }))
            }
            _ => Ok(None),
        },
    }
}

pub fn parse_enum_value<'a, P: Parser<'a>>(p: &P) -> Res<EnumValueDef<'a>> {
    // https://spec.graphql.org/draft/#EnumValueDefinition
    let description = parse_description(p)?;
    let name = required!(p, Name(_), "enum value name is required")?;
    match name.val {
        Name("true" | "false" | "null") => {
            return Err(ParserError::syntax(name, "enum value cannot be true, false, or null"))
        }
        _ => (),
    }
    let Token { pos, .. } = name;
    Ok(EnumValueDef {
        pos,
        name: EnumValueName::from(name),
        description,
    })
}

pub fn parse_enum_values<'a, P: Parser<'a>>(p: &P) -> Res<Vec<EnumValueDef<'a>>> {
    let mut values = Vec::new();
    loop {
        let peeked = p.peek()?;
        // look for description or name
        match &peeked.val {
            Name(_) | StringLit(_) | BlockStringLit(_) => {
                let value = parse_enum_value(p)?;
                values.push(value);
                continue;
            }

            CloseCurly => return Ok(values),
            _ => return Err(ParserError::syntax(peeked, "invalid enum value")),
        }
    }
}
