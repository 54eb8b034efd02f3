//! Turns source text into tokens.
//!
//! Whitespace, commas, byte order marks and `#` comments carry no meaning in
//! either document kind, so the lexer drops them and only yields tokens the
//! parser acts on. Syntax that neither document supports (variables,
//! directives, fragments, default values, unions) is lexed as a single
//! [`TokenValue::Sigil`] so the parser can reject it with a precise message.

use thiserror::Error as ThisError;

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub line: usize,
    pub col: usize,
}

impl Pos {
    fn advance(mut self, c: char) -> Pos {
        match c {
            '\n' => {
                self.line += 1;
                self.col = 1;
            }
            // zero width
            '\r' | '\u{FEFF}' => (),
            '\t' => self.col += 8,
            _ => self.col += 1,
        }
        self
    }
}

impl Default for Pos {
    fn default() -> Self {
        Pos { line: 1, col: 1 }
    }
}

fn char_starts_name(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn char_continues_name(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Characters swallowed into the word of an invalid token.
fn char_in_bad_word(c: char) -> bool {
    char_continues_name(c) || matches!(c, '-' | '+' | '.')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue<T: AsRef<str>> {
    Name(T),
    IntLit(T),
    FloatLit(T),
    // "hello"
    StringLit(T),
    // """things"""
    BlockStringLit(T),
    OpenParen,
    CloseParen,
    OpenCurly,
    CloseCurly,
    OpenBracket,
    CloseBracket,
    Colon,
    Bang,
    Ampersand,
    // $var, @directive, ..., ...frag, =, |
    Sigil(T),
}

impl<T: AsRef<str>> TokenValue<T> {
    pub fn map<U: AsRef<str>, F: FnOnce(T) -> U>(self, f: F) -> TokenValue<U> {
        use TokenValue::*;
        match self {
            Name(s) => Name(f(s)),
            IntLit(s) => IntLit(f(s)),
            FloatLit(s) => FloatLit(f(s)),
            StringLit(s) => StringLit(f(s)),
            BlockStringLit(s) => BlockStringLit(f(s)),
            Sigil(s) => Sigil(f(s)),
            OpenParen => OpenParen,
            CloseParen => CloseParen,
            OpenCurly => OpenCurly,
            CloseCurly => CloseCurly,
            OpenBracket => OpenBracket,
            CloseBracket => CloseBracket,
            Colon => Colon,
            Bang => Bang,
            Ampersand => Ampersand,
        }
    }

    /// True for a sigil token starting with `c`.
    pub fn is_sigil(&self, c: char) -> bool {
        matches!(self, TokenValue::Sigil(s) if s.as_ref().starts_with(c))
    }
}

impl<'a> TokenValue<&'a str> {
    /// The source text of the token, or "" for punctuation.
    pub fn as_str(&self) -> &'a str {
        use TokenValue::*;
        match *self {
            Name(s) | IntLit(s) | FloatLit(s) | StringLit(s) | BlockStringLit(s) | Sigil(s) => s,
            _ => "",
        }
    }
}

/// Detaches a token value from the source text, for errors that outlive it.
impl<'a> From<TokenValue<&'a str>> for TokenValue<String> {
    fn from(val: TokenValue<&'a str>) -> Self {
        val.map(str::to_string)
    }
}

type TokenValueStr<'a> = TokenValue<&'a str>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub(crate) val: TokenValueStr<'a>,
    pub(crate) pos: Pos,
}

impl<'a> Token<'a> {
    pub(crate) fn new(val: TokenValueStr<'a>, pos: Pos) -> Self {
        Token { val, pos }
    }

    pub fn value(&self) -> TokenValueStr<'a> {
        self.val
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn as_str(&self) -> &'a str {
        self.val.as_str()
    }
}

#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    #[error("end of input")]
    EOF,
    #[error("invalid token {word:?} at {pos:?}: {message}")]
    InvalidToken {
        word: String,
        pos: Pos,
        message: &'static str,
    },
}

/// Yields tokens until the input ends or the first error, which is yielded
/// once.
#[derive(Clone)]
pub struct LexerIter<'a> {
    done: bool,
    lexer: Lexer<'a>,
}

impl<'a> LexerIter<'a> {
    pub fn new(text: &'a str) -> LexerIter<'a> {
        LexerIter {
            done: false,
            lexer: Lexer::new(text),
        }
    }
}

impl<'a> Iterator for LexerIter<'a> {
    type Item = Result<Token<'a>, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next() {
            Ok(tok) => Some(Ok(tok)),
            Err(LexerError::EOF) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[derive(Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    // byte offset of the next unread char
    offset: usize,
    pos: Pos,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Lexer<'a> {
        Lexer {
            text,
            offset: 0,
            pos: Pos::default(),
        }
    }

    pub fn next(&mut self) -> Result<Token<'a>, LexerError> {
        self.skip_ignored();
        let start = self.offset;
        let pos = self.pos;
        let c = self.bump().ok_or(LexerError::EOF)?;

        use TokenValue::*;
        let val = match c {
            '(' => OpenParen,
            ')' => CloseParen,
            '{' => OpenCurly,
            '}' => CloseCurly,
            '[' => OpenBracket,
            ']' => CloseBracket,
            ':' => Colon,
            '!' => Bang,
            '&' => Ampersand,
            '=' | '|' => Sigil(self.since(start)),
            '$' | '@' => self.named_sigil(start, pos)?,
            '.' => self.spread(start, pos)?,
            '"' => self.string(start, pos)?,
            '-' | '0'..='9' => self.number(start, pos)?,
            c if char_starts_name(c) => {
                self.eat_while(char_continues_name);
                Name(self.since(start))
            }
            _ => return Err(self.invalid(start, pos, "unexpected character")),
        };
        Ok(Token::new(val, pos))
    }

    fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    fn since(&self, start: usize) -> &'a str {
        &self.text[start..self.offset]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        self.pos = self.pos.advance(c);
        Some(c)
    }

    /// Consumes chars while `f` holds; returns how many were consumed.
    fn eat_while<F: Fn(char) -> bool>(&mut self, f: F) -> usize {
        let mut count = 0;
        while self.peek().map_or(false, &f) {
            self.bump();
            count += 1;
        }
        count
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if !self.rest().starts_with(s) {
            return false;
        }
        for _ in s.chars() {
            self.bump();
        }
        true
    }

    fn skip_ignored(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\n' | '\r' | ',' | '\u{FEFF}') => {
                    self.bump();
                }
                Some('#') => {
                    self.eat_while(|c| c != '\n');
                }
                _ => return,
            }
        }
    }

    fn invalid(&self, start: usize, pos: Pos, message: &'static str) -> LexerError {
        LexerError::InvalidToken {
            word: self.since(start).to_string(),
            pos,
            message,
        }
    }

    /// Like `invalid`, but first swallows the rest of the malformed word.
    fn invalid_word(&mut self, start: usize, pos: Pos, message: &'static str) -> LexerError {
        self.eat_while(char_in_bad_word);
        self.invalid(start, pos, message)
    }

    fn named_sigil(&mut self, start: usize, pos: Pos) -> Result<TokenValueStr<'a>, LexerError> {
        if !self.peek().map_or(false, char_starts_name) {
            return Err(self.invalid_word(start, pos, "expected a name after the sigil"));
        }
        self.eat_while(char_continues_name);
        Ok(TokenValue::Sigil(self.since(start)))
    }

    fn spread(&mut self, start: usize, pos: Pos) -> Result<TokenValueStr<'a>, LexerError> {
        if self.eat_while(|c| c == '.') != 2 {
            return Err(self.invalid_word(start, pos, "expected exactly 3 dots"));
        }
        // `...name` is a fragment spread, `...` alone an inline fragment
        self.eat_while(char_continues_name);
        Ok(TokenValue::Sigil(self.since(start)))
    }

    fn number(&mut self, start: usize, pos: Pos) -> Result<TokenValueStr<'a>, LexerError> {
        let signed = self.since(start) == "-";
        let digits = self.eat_while(|c| c.is_ascii_digit());
        if signed && digits == 0 {
            return Err(self.invalid_word(start, pos, "expected a digit after the minus"));
        }
        let mut float = false;
        if self.eat_str(".") {
            if self.eat_while(|c| c.is_ascii_digit()) == 0 {
                return Err(self.invalid_word(start, pos, "expected a digit after the decimal point"));
            }
            float = true;
        }
        if let Some('e' | 'E') = self.peek() {
            self.bump();
            if let Some('+' | '-') = self.peek() {
                self.bump();
            }
            if self.eat_while(|c| c.is_ascii_digit()) == 0 {
                return Err(self.invalid_word(start, pos, "expected a digit in the exponent"));
            }
            float = true;
        }
        if self.peek().map_or(false, char_in_bad_word) {
            return Err(self.invalid_word(start, pos, "number runs into other characters"));
        }
        let text = self.since(start);
        Ok(if float {
            TokenValue::FloatLit(text)
        } else {
            TokenValue::IntLit(text)
        })
    }

    /// The opening quote was consumed. Escapes are left for the parser.
    fn string(&mut self, start: usize, pos: Pos) -> Result<TokenValueStr<'a>, LexerError> {
        if self.eat_str("\"\"") {
            return self.block_string(start, pos);
        }
        loop {
            match self.peek() {
                None => return Err(self.invalid(start, pos, "unclosed string")),
                Some('\n' | '\r') => return Err(self.invalid(start, pos, "newline in string")),
                Some('"') => {
                    self.bump();
                    return Ok(TokenValue::StringLit(self.since(start)));
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn block_string(&mut self, start: usize, pos: Pos) -> Result<TokenValueStr<'a>, LexerError> {
        loop {
            if self.eat_str("\\\"\"\"") {
                continue;
            }
            if self.eat_str("\"\"\"") {
                return Ok(TokenValue::BlockStringLit(self.since(start)));
            }
            if self.bump().is_none() {
                return Err(self.invalid(start, pos, "unclosed block string"));
            }
        }
    }
}
