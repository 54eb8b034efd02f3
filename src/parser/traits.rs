use std::cell::Cell;

use super::{ParserConfig, ParserError};
use crate::{LexerIter, Token};

type Res<T> = Result<T, ParserError>;

pub trait Parser<'a> {
    fn peek(&self) -> Res<Token<'a>>;
    fn next(&self) -> Res<Token<'a>>;
    fn peek_prev(&self) -> Option<Token<'a>>;
    fn at_end(&self) -> bool;

    /// Enters one level of nesting; errors once the configured depth limit is passed.
    fn descend(&self, tok: Token<'a>) -> Res<()>;
    fn ascend(&self);
}

/// The significant tokens of a document plus a cursor.
///
/// The whole text is lexed up front so lexer errors surface before any parsing.
/// Access is through `&self` and interior mutability; a stream is not meant to be
/// shared between threads.
#[derive(Clone)]
pub(crate) struct TokenStream<'a> {
    tokens: Vec<Token<'a>>,
    cursor: Cell<usize>,
    prev_token: Cell<Option<Token<'a>>>,
    depth: Cell<usize>,
    config: ParserConfig,
}

impl<'a> TokenStream<'a> {
    pub(crate) fn new(text: &'a str, config: ParserConfig) -> Res<TokenStream<'a>> {
        if text.len() > config.text_size_limit {
            return Err(ParserError::TextSizeLimitExceeded {
                limit: config.text_size_limit,
                text_size: text.len(),
            });
        }
        let tokens = LexerIter::new(text).collect::<Result<Vec<_>, _>>()?;
        Ok(TokenStream {
            tokens,
            cursor: Cell::new(0),
            prev_token: Cell::new(None),
            depth: Cell::new(0),
            config,
        })
    }
}

impl<'a> Parser<'a> for TokenStream<'a> {
    fn peek(&self) -> Res<Token<'a>> {
        match self.tokens.get(self.cursor.get()) {
            Some(tok) => Ok(*tok),
            None => Err(ParserError::unexpected_eof(
                self.prev_token.get(),
                "expected more tokens",
            )),
        }
    }

    fn next(&self) -> Res<Token<'a>> {
        let tok = self.peek()?;
        self.cursor.set(self.cursor.get() + 1);
        self.prev_token.set(Some(tok));
        Ok(tok)
    }

    fn peek_prev(&self) -> Option<Token<'a>> {
        self.prev_token.get()
    }

    fn at_end(&self) -> bool {
        self.cursor.get() >= self.tokens.len()
    }

    fn descend(&self, tok: Token<'a>) -> Res<()> {
        let depth = self.depth.get() + 1;
        if depth > self.config.depth_limit {
            return Err(ParserError::DepthLimitExceeded {
                limit: self.config.depth_limit,
                pos: tok.pos,
            });
        }
        self.depth.set(depth);
        Ok(())
    }

    fn ascend(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

#[doc(hidden)]
#[macro_export]
macro_rules! required {
    ($p:expr, $val:pat, $message:expr) => {{
        match $p.next() {
            Ok(tok @ $crate::Token { val: $val, .. }) => Ok(tok),
            Ok(tok) => Err($crate::ParserError::syntax(tok, $message)),
            Err(e) => Err(e),
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! optional {
    ($p:expr, $val:pat) => {{
        match $p.peek() {
            Ok(tok @ $crate::Token { val: $val, .. }) => {
                _ = $p.next();
                Ok(Some(tok))
            }
            Ok(_) => Ok(None),
            Err(err) => {
                if $crate::ParserError::is_eof(&err) {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }};
}
