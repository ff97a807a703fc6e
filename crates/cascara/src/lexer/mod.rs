//! CSS tokenizer.
//!
//! Implements the tokenization algorithm from CSS Syntax Level 3 as an
//! on-demand stream: callers push the lexer along with [`Lexer::advance`],
//! which populates [`Lexer::current`] and the current literals. Escape
//! sequences are never decoded; literal slices point back into the source
//! so the printer can re-emit them byte-identically.

use crate::error::{Diagnostic, Error, Result};
use crate::source::{Source, Span};

/// The set of lexical tokens in CSS.
///
/// See <https://www.w3.org/TR/css-syntax-3/#consume-token>.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input.
    Eof,
    /// `/* ... */`; the literal is the comment text.
    Comment,
    /// An identifier; the literal is the name.
    Ident,
    /// `@name`; the literal is the name without `@`.
    AtKeyword,
    /// `#name`; the literal is the name without `#`.
    Hash,
    /// A quoted string; the literal is the raw content between quotes.
    String,
    /// An unquoted `url(...)`; the literal is the url body.
    Url,
    /// A numeric literal with no unit.
    Number,
    /// A numeric literal followed by `%`.
    Percentage,
    /// A numeric literal followed by a unit name.
    Dimension,
    /// `name(`; the literal is the function name.
    FunctionStart,
    /// Any other single code point; the literal is the code point.
    Delim,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LCurly,
    /// `}`
    RCurly,
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// A whitespace run; only emitted while [`Lexer::retain_whitespace`]
    /// is set.
    Whitespace,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Eof => "EOF",
            TokenKind::Comment => "comment",
            TokenKind::Ident => "identifier",
            TokenKind::AtKeyword => "at-keyword",
            TokenKind::Hash => "hash",
            TokenKind::String => "string",
            TokenKind::Url => "url",
            TokenKind::Number => "number",
            TokenKind::Percentage => "percentage",
            TokenKind::Dimension => "dimension",
            TokenKind::FunctionStart => "function",
            TokenKind::Delim => "delimiter",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LCurly => "{",
            TokenKind::RCurly => "}",
            TokenKind::Cdo => "<!--",
            TokenKind::Cdc => "-->",
            TokenKind::Whitespace => "whitespace",
        };
        f.write_str(name)
    }
}

/// Streaming tokenizer over a [`Source`].
///
/// Construction advances to the first token. The lexer records the byte
/// offset of every line start it passes; the completed table is handed
/// to the source when the parser finishes.
pub struct Lexer<'s> {
    source: &'s Source,

    /// The last code point loaded by `step`; `None` once the input is
    /// exhausted.
    ch: Option<char>,
    /// Byte offset of `ch`, or the content length at EOF.
    last_pos: usize,
    /// Byte offset one past `ch`.
    pos: usize,

    /// Byte offset of the first code point of the current token.
    token_start: usize,

    /// Kind of the last token lexed by `advance`.
    pub current: TokenKind,
    /// The last literal string lexed. It is not cleared between valid
    /// literals.
    pub current_string: &'s str,
    /// The last numeric literal lexed, kept in its source form.
    pub current_numeral: &'s str,

    /// When set, whitespace runs are emitted as tokens instead of being
    /// skipped. The selector parser needs this to see descendant
    /// combinators.
    pub retain_whitespace: bool,

    line_offsets: Vec<usize>,
}

impl<'s> Lexer<'s> {
    /// Create a lexer and advance it to the first token.
    pub fn new(source: &'s Source) -> Result<Self> {
        let mut lexer = Self {
            source,
            ch: None,
            last_pos: 0,
            pos: 0,
            token_start: 0,
            current: TokenKind::Eof,
            current_string: "",
            current_numeral: "",
            retain_whitespace: false,
            line_offsets: vec![0],
        };
        lexer.step();
        lexer.advance()?;
        Ok(lexer)
    }

    /// The span of the current token.
    pub fn token_span(&self) -> Span {
        Span::new(self.token_start, self.last_pos)
    }

    /// The end offset of the current token.
    pub fn token_end(&self) -> usize {
        self.last_pos
    }

    /// Check that the current token is `kind`, then advance past it.
    pub fn expect(&mut self, kind: TokenKind) -> Result<()> {
        if self.current != kind {
            return Err(Error::Parse(Diagnostic::error(
                self.source,
                self.token_span(),
                format!("expected {kind}, got {}", self.describe_current()),
            )));
        }
        self.advance()
    }

    /// A short description of the current token for error messages.
    pub fn describe_current(&self) -> String {
        match self.current {
            TokenKind::Ident | TokenKind::AtKeyword | TokenKind::FunctionStart | TokenKind::Delim => {
                format!("{} `{}`", self.current, self.current_string)
            }
            kind => kind.to_string(),
        }
    }

    /// Hand back the line-offset table accumulated so far.
    pub fn into_line_offsets(self) -> Vec<usize> {
        self.line_offsets
    }

    /// Lex the next token into `current`.
    pub fn advance(&mut self) -> Result<()> {
        loop {
            self.token_start = self.last_pos;

            let ch = match self.ch {
                None => {
                    self.current = TokenKind::Eof;
                    return Ok(());
                }
                Some(ch) => ch,
            };

            match ch {
                ';' => {
                    self.step();
                    self.current = TokenKind::Semicolon;
                }
                ':' => {
                    self.step();
                    self.current = TokenKind::Colon;
                }
                ',' => {
                    self.step();
                    self.current = TokenKind::Comma;
                }
                '(' => {
                    self.step();
                    self.current = TokenKind::LParen;
                }
                ')' => {
                    self.step();
                    self.current = TokenKind::RParen;
                }
                '[' => {
                    self.step();
                    self.current = TokenKind::LBracket;
                }
                ']' => {
                    self.step();
                    self.current = TokenKind::RBracket;
                }
                '{' => {
                    self.step();
                    self.current = TokenKind::LCurly;
                }
                '}' => {
                    self.step();
                    self.current = TokenKind::RCurly;
                }

                '+' => {
                    if self.starts_number() {
                        self.next_numeric_token();
                    } else {
                        self.next_delim_token();
                    }
                }

                '-' => {
                    if self.starts_number() {
                        self.next_numeric_token();
                    } else if self.peek(0) == Some('-') && self.peek(1) == Some('>') {
                        self.step();
                        self.step();
                        self.step();
                        self.current = TokenKind::Cdc;
                    } else if would_start_identifier(Some(ch), self.peek(0), self.peek(1)) {
                        self.next_ident_like_token()?;
                    } else {
                        self.next_delim_token();
                    }
                }

                '<' => {
                    if self.peek(0) == Some('!')
                        && self.peek(1) == Some('-')
                        && self.peek(2) == Some('-')
                    {
                        self.step();
                        self.step();
                        self.step();
                        self.step();
                        self.current = TokenKind::Cdo;
                    } else {
                        self.next_delim_token();
                    }
                }

                '@' => {
                    if would_start_identifier(self.peek(0), self.peek(1), self.peek(2)) {
                        self.step();
                        let start = self.last_pos;
                        self.next_name()?;
                        self.current_string = self.slice(start, self.last_pos);
                        self.current = TokenKind::AtKeyword;
                    } else {
                        self.next_delim_token();
                    }
                }

                '#' => {
                    let starts_name = self.peek(0).is_some_and(is_name_code_point)
                        || starts_escape(self.peek(0), self.peek(1));
                    if starts_name {
                        self.step();
                        let start = self.last_pos;
                        self.next_name()?;
                        self.current_string = self.slice(start, self.last_pos);
                        self.current = TokenKind::Hash;
                    } else {
                        self.next_delim_token();
                    }
                }

                '.' => {
                    if self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                        self.next_numeric_token();
                    } else {
                        self.next_delim_token();
                    }
                }

                '/' => {
                    if self.peek(0) == Some('*') {
                        self.next_comment_token()?;
                    } else {
                        self.next_delim_token();
                    }
                }

                '"' | '\'' => self.next_string_token(ch)?,

                '\\' => {
                    if starts_escape(Some(ch), self.peek(0)) {
                        self.next_ident_like_token()?;
                    } else {
                        return Err(self.error_here("invalid escape"));
                    }
                }

                _ if is_whitespace(ch) => {
                    while self.ch.is_some_and(is_whitespace) {
                        self.step();
                    }
                    if self.retain_whitespace {
                        self.current = TokenKind::Whitespace;
                    } else {
                        continue;
                    }
                }

                _ if ch.is_ascii_digit() => self.next_numeric_token(),

                _ if is_name_start_code_point(ch) => self.next_ident_like_token()?,

                _ => self.next_delim_token(),
            }

            return Ok(());
        }
    }

    /// Consume a numeric token per
    /// <https://www.w3.org/TR/css-syntax-3/#consume-a-numeric-token>.
    fn next_numeric_token(&mut self) {
        let start = self.last_pos;
        self.next_number();
        self.current_numeral = self.slice(start, self.last_pos);

        if would_start_identifier(self.ch, self.peek(0), self.peek(1)) {
            let unit_start = self.last_pos;
            // Unit names never fail to lex here: would_start_identifier
            // guarantees at least one name code point.
            let _ = self.next_name();
            self.current_string = self.slice(unit_start, self.last_pos);
            self.current = TokenKind::Dimension;
        } else if self.ch == Some('%') {
            self.step();
            self.current = TokenKind::Percentage;
        } else {
            self.current = TokenKind::Number;
        }
    }

    /// Consume a number per
    /// <https://www.w3.org/TR/css-syntax-3/#consume-a-number>. Integers
    /// and reals are not distinguished; the numeral keeps its source form.
    fn next_number(&mut self) {
        if matches!(self.ch, Some('+') | Some('-')) {
            self.step();
        }

        while self.ch.is_some_and(|c| c.is_ascii_digit()) {
            self.step();
        }

        if self.ch == Some('.') && self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            self.step();
            while self.ch.is_some_and(|c| c.is_ascii_digit()) {
                self.step();
            }
        }

        let exponent = matches!(self.ch, Some('e') | Some('E'))
            && (self.peek(0).is_some_and(|c| c.is_ascii_digit())
                || (matches!(self.peek(0), Some('+') | Some('-'))
                    && self.peek(1).is_some_and(|c| c.is_ascii_digit())));
        if exponent {
            self.step();
            if matches!(self.ch, Some('+') | Some('-')) {
                self.step();
            }
            while self.ch.is_some_and(|c| c.is_ascii_digit()) {
                self.step();
            }
        }
    }

    /// Consume an ident-like token per
    /// <https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token>,
    /// special-casing `url(` with unquoted content.
    fn next_ident_like_token(&mut self) -> Result<()> {
        let start = self.last_pos;
        self.next_name()?;
        self.current_string = self.slice(start, self.last_pos);

        if self.current_string.eq_ignore_ascii_case("url") && self.ch == Some('(') {
            self.step();
            while self.ch.is_some_and(is_whitespace) {
                self.step();
            }

            // Quoted urls lex as a normal function with a string argument.
            if matches!(self.ch, Some('"') | Some('\'')) {
                self.current = TokenKind::FunctionStart;
                return Ok(());
            }

            return self.next_url_token();
        }

        if self.ch == Some('(') {
            self.step();
            self.current = TokenKind::FunctionStart;
            return Ok(());
        }

        self.current = TokenKind::Ident;
        Ok(())
    }

    /// Consume the body of an unquoted `url(...)` per
    /// <https://www.w3.org/TR/css-syntax-3/#consume-url-token>. The
    /// opening paren and leading whitespace are already consumed.
    fn next_url_token(&mut self) -> Result<()> {
        let start = self.last_pos;
        let mut end;

        loop {
            match self.ch {
                None => return Err(self.error_here("unexpected EOF in url")),
                Some(')') => {
                    end = self.last_pos;
                    self.step();
                    break;
                }
                Some(c) if is_whitespace(c) => {
                    end = self.last_pos;
                    while self.ch.is_some_and(is_whitespace) {
                        self.step();
                    }
                    match self.ch {
                        Some(')') => {
                            self.step();
                            break;
                        }
                        None => return Err(self.error_here("unexpected EOF in url")),
                        _ => return Err(self.error_here("expected ) to close url")),
                    }
                }
                Some(c) if c == '"' || c == '\'' || c == '(' || is_non_printable(c) => {
                    return Err(self.error_here(format!("unexpected character in url: {c:?}")));
                }
                Some('\\') => {
                    if starts_escape(self.ch, self.peek(0)) {
                        self.next_escaped();
                    } else {
                        return Err(self.error_here("invalid escape in url"));
                    }
                }
                Some(_) => self.step(),
            }
        }

        self.current_string = self.slice(start, end);
        self.current = TokenKind::Url;
        Ok(())
    }

    /// Consume a comment token. The comment text (without delimiters)
    /// becomes the current literal.
    fn next_comment_token(&mut self) -> Result<()> {
        self.step();
        self.step();
        let start = self.last_pos;

        loop {
            match self.ch {
                None => return Err(self.error_here("unexpected EOF in comment")),
                Some('*') if self.peek(0) == Some('/') => {
                    let end = self.last_pos;
                    self.step();
                    self.step();
                    self.current_string = self.slice(start, end);
                    self.current = TokenKind::Comment;
                    return Ok(());
                }
                Some(_) => self.step(),
            }
        }
    }

    /// Consume a string token delimited by `mark`. Raw newlines are
    /// rejected; `\` before a newline is a line continuation. The
    /// literal is the raw content with escapes preserved.
    fn next_string_token(&mut self, mark: char) -> Result<()> {
        self.step();
        let start = self.last_pos;

        loop {
            match self.ch {
                None => return Err(self.error_here("unexpected EOF in string")),
                Some('\n') => return Err(self.error_here("unexpected newline in string")),
                Some(c) if c == mark => {
                    let end = self.last_pos;
                    self.step();
                    self.current_string = self.slice(start, end);
                    self.current = TokenKind::String;
                    return Ok(());
                }
                Some('\\') => {
                    self.step();
                    match self.ch {
                        None => return Err(self.error_here("unexpected EOF in string")),
                        // Line continuation.
                        Some('\n') => self.step(),
                        Some(c) if is_hex_digit(c) => {
                            self.next_hex_escape_tail();
                        }
                        Some(_) => self.step(),
                    }
                }
                Some(_) => self.step(),
            }
        }
    }

    /// Consume a name, including embedded escapes, per
    /// <https://www.w3.org/TR/css-syntax-3/#consume-a-name>.
    fn next_name(&mut self) -> Result<()> {
        loop {
            match self.ch {
                Some(c) if is_name_code_point(c) => self.step(),
                Some('\\') if starts_escape(self.ch, self.peek(0)) => self.next_escaped(),
                _ => return Ok(()),
            }
        }
    }

    /// Consume an escaped code point per
    /// <https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point>.
    ///
    /// The code point is not interpreted; byte offsets are recorded
    /// as-is so downstream stages can re-emit the raw form.
    fn next_escaped(&mut self) {
        self.step();
        match self.ch {
            Some(c) if is_hex_digit(c) => self.next_hex_escape_tail(),
            Some(_) => self.step(),
            None => {}
        }
    }

    /// Consume the remainder of a hex escape: up to six hex digits and
    /// one optional trailing whitespace. The first digit is current.
    fn next_hex_escape_tail(&mut self) {
        let mut digits = 0;
        while digits < 6 && self.ch.is_some_and(is_hex_digit) {
            self.step();
            digits += 1;
        }
        if self.ch.is_some_and(is_whitespace) {
            self.step();
        }
    }

    /// Consume a single code point as a delimiter token.
    fn next_delim_token(&mut self) {
        let start = self.last_pos;
        self.step();
        self.current_string = self.slice(start, self.last_pos);
        self.current = TokenKind::Delim;
    }

    fn starts_number(&self) -> bool {
        starts_number(self.ch, self.peek(0), self.peek(1))
    }

    fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.source.content()[start..end]
    }

    fn error_here(&self, message: impl Into<String>) -> Error {
        Error::Lex(Diagnostic::error(
            self.source,
            Span::new(self.token_start, self.last_pos.max(self.token_start)),
            message,
        ))
    }

    /// Load the next code point. Leaving a `\n` behind records the
    /// offset of the line that follows it.
    fn step(&mut self) {
        if self.ch == Some('\n') {
            self.line_offsets.push(self.pos);
        }

        let rest = &self.source.content()[self.pos..];
        match rest.chars().next() {
            Some(c) => {
                self.ch = Some(c);
                self.last_pos = self.pos;
                self.pos += c.len_utf8();
            }
            None => {
                self.ch = None;
                self.last_pos = self.pos;
            }
        }
    }

    /// The `i`th unconsumed code point past `ch`, without consuming it.
    fn peek(&self, i: usize) -> Option<char> {
        self.source.content()[self.pos..].chars().nth(i)
    }
}

/// <https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier>
fn would_start_identifier(p0: Option<char>, p1: Option<char>, p2: Option<char>) -> bool {
    match p0 {
        Some('-') => {
            p1.is_some_and(is_name_start_code_point) || p1 == Some('-') || starts_escape(p1, p2)
        }
        Some('\\') => starts_escape(p0, p1),
        Some(c) => is_name_start_code_point(c),
        None => false,
    }
}

/// <https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape>
fn starts_escape(p0: Option<char>, p1: Option<char>) -> bool {
    p0 == Some('\\') && p1 != Some('\n')
}

/// <https://www.w3.org/TR/css-syntax-3/#starts-with-a-number>
fn starts_number(p0: Option<char>, p1: Option<char>, p2: Option<char>) -> bool {
    match p0 {
        Some('+') | Some('-') => {
            p1.is_some_and(|c| c.is_ascii_digit())
                || (p1 == Some('.') && p2.is_some_and(|c| c.is_ascii_digit()))
        }
        Some('.') => p1.is_some_and(|c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

/// <https://www.w3.org/TR/css-syntax-3/#whitespace>
fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0c')
}

/// <https://www.w3.org/TR/css-syntax-3/#name-start-code-point>
fn is_name_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c as u32 >= 0x80 || c == '_'
}

/// <https://www.w3.org/TR/css-syntax-3/#name-code-point>
fn is_name_code_point(c: char) -> bool {
    is_name_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

/// <https://www.w3.org/TR/css-syntax-3/#hex-digit>
fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// <https://www.w3.org/TR/css-syntax-3/#non-printable-code-point>
fn is_non_printable(c: char) -> bool {
    matches!(c, '\0'..='\x08' | '\x0b' | '\x0e'..='\x1f' | '\x7f')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_kinds(input: &str) -> Vec<TokenKind> {
        let source = Source::new("test.css", input);
        let mut lexer = Lexer::new(&source).expect("lex");
        let mut kinds = vec![];
        while lexer.current != TokenKind::Eof {
            kinds.push(lexer.current);
            lexer.advance().expect("lex");
        }
        kinds
    }

    #[test]
    fn simple_rule() {
        assert_eq!(
            lex_kinds(".class { width: 2rem }"),
            vec![
                TokenKind::Delim,
                TokenKind::Ident,
                TokenKind::LCurly,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Dimension,
                TokenKind::RCurly,
            ]
        );
    }

    #[test]
    fn numeric_tokens() {
        let source = Source::new("test.css", "12 3.5% -4px +.25em 1e3 2.5E-2");
        let mut lexer = Lexer::new(&source).unwrap();

        assert_eq!(lexer.current, TokenKind::Number);
        assert_eq!(lexer.current_numeral, "12");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Percentage);
        assert_eq!(lexer.current_numeral, "3.5");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Dimension);
        assert_eq!(lexer.current_numeral, "-4");
        assert_eq!(lexer.current_string, "px");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Dimension);
        assert_eq!(lexer.current_numeral, "+.25");
        assert_eq!(lexer.current_string, "em");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Number);
        assert_eq!(lexer.current_numeral, "1e3");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Number);
        assert_eq!(lexer.current_numeral, "2.5E-2");
    }

    #[test]
    fn ident_like_tokens() {
        let source = Source::new("test.css", "--custom -webkit-box rgba( url(a.png)");
        let mut lexer = Lexer::new(&source).unwrap();

        assert_eq!(lexer.current, TokenKind::Ident);
        assert_eq!(lexer.current_string, "--custom");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Ident);
        assert_eq!(lexer.current_string, "-webkit-box");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::FunctionStart);
        assert_eq!(lexer.current_string, "rgba");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Url);
        assert_eq!(lexer.current_string, "a.png");
    }

    #[test]
    fn quoted_url_is_a_function() {
        let source = Source::new("test.css", "url(\"a.png\")");
        let mut lexer = Lexer::new(&source).unwrap();

        assert_eq!(lexer.current, TokenKind::FunctionStart);
        assert_eq!(lexer.current_string, "url");
        lexer.advance().unwrap();
        assert_eq!(lexer.current, TokenKind::String);
        assert_eq!(lexer.current_string, "a.png");
        lexer.advance().unwrap();
        assert_eq!(lexer.current, TokenKind::RParen);
    }

    #[test]
    fn url_with_inner_whitespace() {
        let source = Source::new("test.css", "url( a.png )");
        let mut lexer = Lexer::new(&source).unwrap();
        assert_eq!(lexer.current, TokenKind::Url);
        assert_eq!(lexer.current_string, "a.png");
    }

    #[test]
    fn at_keyword_and_hash() {
        let source = Source::new("test.css", "@media #aabbcc #-x");
        let mut lexer = Lexer::new(&source).unwrap();

        assert_eq!(lexer.current, TokenKind::AtKeyword);
        assert_eq!(lexer.current_string, "media");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Hash);
        assert_eq!(lexer.current_string, "aabbcc");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Hash);
        assert_eq!(lexer.current_string, "-x");
    }

    #[test]
    fn cdo_and_cdc() {
        assert_eq!(
            lex_kinds("<!-- a --> <"),
            vec![TokenKind::Cdo, TokenKind::Ident, TokenKind::Cdc, TokenKind::Delim]
        );
    }

    #[test]
    fn an_plus_b_shapes() {
        // `2n+3` lexes as a dimension followed by a signed number; the
        // parser splits these back apart.
        let source = Source::new("test.css", "2n+3 2n-3");
        let mut lexer = Lexer::new(&source).unwrap();

        assert_eq!(lexer.current, TokenKind::Dimension);
        assert_eq!(lexer.current_numeral, "2");
        assert_eq!(lexer.current_string, "n");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Number);
        assert_eq!(lexer.current_numeral, "+3");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::Dimension);
        assert_eq!(lexer.current_numeral, "2");
        assert_eq!(lexer.current_string, "n-3");
    }

    #[test]
    fn whitespace_retention() {
        let source = Source::new("test.css", "a b");
        let mut lexer = Lexer::new(&source).unwrap();
        lexer.retain_whitespace = true;

        assert_eq!(lexer.current, TokenKind::Ident);
        lexer.advance().unwrap();
        assert_eq!(lexer.current, TokenKind::Whitespace);
        lexer.advance().unwrap();
        assert_eq!(lexer.current, TokenKind::Ident);
    }

    #[test]
    fn comments_and_strings() {
        let source = Source::new("test.css", "/* note */ \"hi\\\" there\"");
        let mut lexer = Lexer::new(&source).unwrap();

        assert_eq!(lexer.current, TokenKind::Comment);
        assert_eq!(lexer.current_string, " note ");
        lexer.advance().unwrap();

        assert_eq!(lexer.current, TokenKind::String);
        assert_eq!(lexer.current_string, "hi\\\" there");
    }

    #[test]
    fn string_line_continuation() {
        let source = Source::new("test.css", "\"a\\\nb\"");
        let mut lexer = Lexer::new(&source).unwrap();
        assert_eq!(lexer.current, TokenKind::String);
        assert_eq!(lexer.current_string, "a\\\nb");
    }

    #[test]
    fn unterminated_string_fails() {
        let source = Source::new("test.css", ".a { content: \"oops }");
        let mut lexer = Lexer::new(&source).unwrap();
        let mut result = Ok(());
        while lexer.current != TokenKind::Eof {
            result = lexer.advance();
            if result.is_err() {
                break;
            }
        }
        let err = result.unwrap_err();
        assert!(matches!(err, Error::Lex(_)));
        assert!(err.to_string().contains("unexpected EOF in string"));
    }

    #[test]
    fn raw_newline_in_string_fails() {
        let source = Source::new("test.css", "\"a\nb\"");
        assert!(Lexer::new(&source).is_err());
    }

    #[test]
    fn unterminated_comment_fails() {
        let source = Source::new("test.css", "/* never closed");
        assert!(Lexer::new(&source).is_err());
    }

    #[test]
    fn escapes_are_preserved_raw() {
        let source = Source::new("test.css", "\\26 b");
        let mut lexer = Lexer::new(&source).unwrap();
        assert_eq!(lexer.current, TokenKind::Ident);
        assert_eq!(lexer.current_string, "\\26 b");
        lexer.advance().unwrap();
        assert_eq!(lexer.current, TokenKind::Eof);
    }

    #[test]
    fn token_spans() {
        let source = Source::new("test.css", "abc: 10px;");
        let mut lexer = Lexer::new(&source).unwrap();
        assert_eq!(lexer.token_span(), Span::new(0, 3));
        lexer.advance().unwrap();
        assert_eq!(lexer.token_span(), Span::new(3, 4));
        lexer.advance().unwrap();
        assert_eq!(lexer.token_span(), Span::new(5, 9));
        assert_eq!(lexer.token_end(), 9);
    }

    #[test]
    fn line_offsets_recorded() {
        let source = Source::new("test.css", "a{}\nb{}\nc{}");
        let mut lexer = Lexer::new(&source).unwrap();
        while lexer.current != TokenKind::Eof {
            lexer.advance().unwrap();
        }
        assert_eq!(lexer.into_line_offsets(), vec![0, 4, 8]);
    }
}
