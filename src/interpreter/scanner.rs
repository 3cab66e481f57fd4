use crate::{ast::Position, error::ParseError, interpreter::operators::OperatorTable};

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the scanner.
/// Operator and keyword tokens carry their text rather than a closed enum
/// variant, because both sets are registered in the [`OperatorTable`] and
/// may grow at run time.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A numeric literal such as `42`, `3.14`, `1.2e-3` or `2i`.
    Number {
        /// The scanned magnitude.
        value:     f64,
        /// Whether the literal carried the imaginary `i` suffix.
        imaginary: bool,
    },
    /// A string literal with its escapes already decoded.
    Str(String),
    /// A plain identifier.
    Identifier(String),
    /// A word registered as a keyword in the operator table.
    Keyword(String),
    /// An operator symbol matched against the operator table.
    Operator(String),
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// A line break; a soft statement separator.
    Newline,
}

impl Token {
    /// A short description used in error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Number { value, imaginary } => {
                if *imaginary {
                    format!("number {value}i")
                } else {
                    format!("number {value}")
                }
            },
            Self::Str(s) => format!("string \"{s}\""),
            Self::Identifier(name) => format!("identifier '{name}'"),
            Self::Keyword(word) => format!("keyword '{word}'"),
            Self::Operator(symbol) => format!("operator '{symbol}'"),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::LBracket => "'['".to_string(),
            Self::RBracket => "']'".to_string(),
            Self::LBrace => "'{'".to_string(),
            Self::RBrace => "'}'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Semicolon => "';'".to_string(),
            Self::Newline => "end of line".to_string(),
        }
    }
}

/// A token together with its source position and lexeme length.
///
/// The length lets the parser apply the call rule: `name(args)` is a call
/// only when the `(` starts exactly where the identifier ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed {
    /// The classified token.
    pub token: Token,
    /// Where the lexeme starts.
    pub pos:   Position,
    /// The lexeme length in characters.
    pub len:   usize,
}

/// Tests whether a character can start an identifier.
#[must_use]
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Tests whether a character can continue an identifier.
#[must_use]
pub fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// The character scanner: a char buffer with a movable cursor.
///
/// Each `scan_*` method either consumes nothing and reports no match, or
/// advances the cursor past one literal. Scanning has no side effects beyond
/// cursor movement and error collection, and can restart from any valid
/// cursor position.
pub struct Scanner<'t> {
    chars:  Vec<char>,
    cursor: usize,
    line:   usize,
    column: usize,
    table:  &'t OperatorTable,
    errors: Vec<ParseError>,
}

impl<'t> Scanner<'t> {
    /// Creates a scanner over the given source.
    #[must_use]
    pub fn new(source: &str, table: &'t OperatorTable) -> Self {
        Self { chars: source.chars().collect(),
               cursor: 0,
               line: 1,
               column: 1,
               table,
               errors: Vec::new() }
    }

    /// The current cursor position.
    #[must_use]
    pub const fn position(&self) -> Position {
        Position { line:   self.line,
                   column: self.column,
                   offset: self.cursor, }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.cursor).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.cursor + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Scans a numeric literal at the cursor.
    ///
    /// Supports an integer part, an optional fraction, an optional exponent
    /// (consumed only when digits actually follow it) and the imaginary
    /// suffix `i` (recognized only when the following character does not
    /// continue an identifier, so `2in` is the number `2` followed by the
    /// identifier `in`). Returns `None` without consuming anything when the
    /// cursor does not start a number.
    pub fn scan_number(&mut self) -> Option<(f64, bool)> {
        let starts_with_digit = self.peek().is_some_and(|c| c.is_ascii_digit());
        let starts_with_dot =
            self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit());
        if !starts_with_digit && !starts_with_dot {
            return None;
        }

        let mut text = String::new();

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.bump()?);
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.bump()?);
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                text.push(self.bump()?);
            }
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let digits_follow = match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if digits_follow {
                text.push(self.bump()?);
                if matches!(self.peek(), Some('+' | '-')) {
                    text.push(self.bump()?);
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    text.push(self.bump()?);
                }
            }
        }

        let mut imaginary = false;
        if self.peek() == Some('i') && !self.peek_at(1).is_some_and(is_identifier_continue) {
            self.bump();
            imaginary = true;
        }

        text.parse().ok().map(|value| (value, imaginary))
    }

    /// Scans a double-quoted string literal at the cursor.
    ///
    /// Backslash escapes `\\`, `\"`, `\n`, `\t` and `\r` are decoded; an
    /// unknown escape records [`ParseError::EscapeUnknown`] and keeps the
    /// raw character. A missing closing quote records
    /// [`ParseError::StringNotTerminated`] anchored at the opening quote.
    /// Returns `None` without consuming when the cursor is not at a quote.
    pub fn scan_string(&mut self) -> Option<String> {
        if self.peek() != Some('"') {
            return None;
        }

        let start = self.position();
        self.bump();

        let mut text = String::new();
        loop {
            match self.bump() {
                None => {
                    self.errors
                        .push(ParseError::StringNotTerminated { position: start });
                    break;
                },
                Some('"') => break,
                Some('\\') => {
                    let escape_pos = self.position();
                    match self.bump() {
                        Some('\\') => text.push('\\'),
                        Some('"') => text.push('"'),
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some('r') => text.push('\r'),
                        Some(other) => {
                            self.errors.push(ParseError::EscapeUnknown { escape:   other,
                                                                         position: escape_pos, });
                            text.push(other);
                        },
                        None => {
                            self.errors
                                .push(ParseError::StringNotTerminated { position: start });
                            break;
                        },
                    }
                },
                Some(c) => text.push(c),
            }
        }

        Some(text)
    }

    /// Scans an identifier at the cursor.
    ///
    /// Returns `None` without consuming when the cursor does not start an
    /// identifier. Whether the word is a keyword is decided by the caller
    /// against the operator table.
    pub fn scan_identifier(&mut self) -> Option<String> {
        if !self.peek().is_some_and(is_identifier_start) {
            return None;
        }

        let mut name = String::new();
        while self.peek().is_some_and(is_identifier_continue) {
            name.push(self.bump()?);
        }
        Some(name)
    }

    /// Consumes the scanner and produces the token list plus every scan
    /// error encountered.
    #[must_use]
    pub fn tokenize(mut self) -> (Vec<Lexed>, Vec<ParseError>) {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek() {
            // Line comments run to the end of the line.
            if c == '/' && self.peek_at(1) == Some('/') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
                continue;
            }

            if c == ' ' || c == '\t' || c == '\r' {
                self.bump();
                continue;
            }

            let pos = self.position();

            if c == '\n' {
                self.bump();
                tokens.push(Lexed { token: Token::Newline,
                                    pos,
                                    len: 1 });
                continue;
            }

            if let Some((value, imaginary)) = self.scan_number() {
                tokens.push(Lexed { token: Token::Number { value, imaginary },
                                    pos,
                                    len: self.cursor - pos.offset });
                continue;
            }

            if let Some(text) = self.scan_string() {
                tokens.push(Lexed { token: Token::Str(text),
                                    pos,
                                    len: self.cursor - pos.offset });
                continue;
            }

            if let Some(name) = self.scan_identifier() {
                let token = if self.table.is_keyword(&name) {
                    Token::Keyword(name)
                } else {
                    Token::Identifier(name)
                };
                tokens.push(Lexed { token,
                                    pos,
                                    len: self.cursor - pos.offset });
                continue;
            }

            let simple = match c {
                '(' => Some(Token::LParen),
                ')' => Some(Token::RParen),
                '[' => Some(Token::LBracket),
                ']' => Some(Token::RBracket),
                '{' => Some(Token::LBrace),
                '}' => Some(Token::RBrace),
                ',' => Some(Token::Comma),
                ';' => Some(Token::Semicolon),
                _ => None,
            };
            if let Some(token) = simple {
                self.bump();
                tokens.push(Lexed { token, pos, len: 1 });
                continue;
            }

            if let Some(symbol) = self.table.longest_match(&self.chars, self.cursor) {
                let len = symbol.chars().count();
                for _ in 0..len {
                    self.bump();
                }
                tokens.push(Lexed { token: Token::Operator(symbol),
                                    pos,
                                    len });
                continue;
            }

            self.errors.push(ParseError::UnknownCharacter { character: c,
                                                            position:  pos, });
            self.bump();
        }

        (tokens, self.errors)
    }
}
