use crate::{LexerError, Pos, Token, TokenValue};

use thiserror::Error as ThisError;

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    #[error("text size limit exceeded - limit: {limit:?}, text_size: {text_size:?}")]
    TextSizeLimitExceeded { limit: usize, text_size: usize },

    #[error("depth limit exceeded - limit: {limit:?} at {pos:?}")]
    DepthLimitExceeded { limit: usize, pos: Pos },

    #[error("{0}")]
    Lexer(LexerError),

    #[error("unexpected token: {value:?} {pos:?} {message:?}")]
    UnexpectedToken {
        value: TokenValue<String>,
        pos: Pos,
        message: &'static str,
    },

    #[error("token already exists: {value:?} {pos:?}: {message:?}")]
    AlreadyExists {
        value: TokenValue<String>,
        pos: Pos,
        message: &'static str,
    },

    #[error("syntax error: {value:?} {pos:?} {message:?}")]
    SyntaxError {
        value: TokenValue<String>,
        pos: Pos,
        message: &'static str,
    },

    #[error("unsupported syntax: {value:?} {pos:?} {message:?}")]
    Unsupported {
        value: TokenValue<String>,
        pos: Pos,
        message: &'static str,
    },

    #[error("invalid float value: {value:?} {pos:?}")]
    ParseFloatError { value: TokenValue<String>, pos: Pos },

    #[error("invalid int value: {value:?} {pos:?}")]
    ParseIntError { value: TokenValue<String>, pos: Pos },

    #[error("invalid string value: {value:?} {pos:?} {message:?}")]
    ParseStringError {
        value: TokenValue<String>,
        pos: Pos,
        message: &'static str,
    },

    #[error("variables are not allowed in schema docs: {value:?} {pos:?}")]
    VariablesNotAllowed { value: TokenValue<String>, pos: Pos },

    #[error("parser reached eof unexpectedly - {prev_value:?}  {prev_pos:?} {message:?}")]
    UnexpectedEOF {
        prev_value: Option<TokenValue<String>>,
        prev_pos: Option<Pos>,
        message: &'static str,
    },
}

impl From<LexerError> for ParserError {
    fn from(e: LexerError) -> ParserError {
        ParserError::Lexer(e)
    }
}

impl ParserError {
    pub fn syntax<'a>(token: Token<'a>, message: &'static str) -> ParserError {
        ParserError::SyntaxError {
            value: token.val.into(),
            pos: token.pos,
            message,
        }
    }

    pub fn already_exists<'a>(token: Token<'a>, message: &'static str) -> ParserError {
        ParserError::AlreadyExists {
            value: token.val.into(),
            pos: token.pos,
            message,
        }
    }

    pub fn unsupported<'a>(token: Token<'a>, message: &'static str) -> ParserError {
        ParserError::Unsupported {
            value: token.val.into(),
            pos: token.pos,
            message,
        }
    }

    pub fn int<'a>(tok: Token<'a>) -> ParserError {
        Self::ParseIntError {
            value: tok.val.into(),
            pos: tok.pos,
        }
    }

    pub fn float<'a>(tok: Token<'a>) -> ParserError {
        Self::ParseFloatError {
            value: tok.val.into(),
            pos: tok.pos,
        }
    }

    pub fn string<'a>(tok: Token<'a>, message: &'static str) -> ParserError {
        Self::ParseStringError {
            value: tok.val.into(),
            pos: tok.pos,
            message,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, ParserError::UnexpectedEOF { .. })
    }

    pub fn unexpected_eof<'a>(prev_tok: Option<Token<'a>>, message: &'static str) -> ParserError {
        ParserError::UnexpectedEOF {
            prev_value: prev_tok.map(|t| t.val.into()),
            prev_pos: prev_tok.map(|t| t.pos),
            message,
        }
    }

    pub fn unexpected<'a>(tok: Token<'a>, message: &'static str) -> ParserError {
        ParserError::UnexpectedToken {
            value: tok.val.into(),
            pos: tok.pos,
            message,
        }
    }
}
