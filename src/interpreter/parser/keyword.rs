use crate::{
    ast::{Expr, Position},
    error::ParseError,
    interpreter::{parser::core::Parser, scanner::Token},
};

impl Parser<'_> {
    /// Consumes a `(`, or records how the keyword's shape broke.
    fn expect_condition_paren(&mut self, keyword: &str) -> Option<Position> {
        if let Some(lexed) = self.peek()
           && lexed.token == Token::LParen
        {
            let pos = lexed.pos;
            self.advance();
            return Some(pos);
        }

        let position = self.current_position();
        self.error(ParseError::KeywordMisused { keyword: keyword.to_string(),
                                                expected: "a parenthesized condition".to_string(),
                                                position });
        None
    }

    /// Parses a parenthesized condition, anchoring an unclosed-paren error
    /// at the opening bracket.
    fn parse_condition(&mut self, open: Position) -> Expr {
        self.depth += 1;
        let condition = self.parse_expression(0);
        if !self.eat(&Token::RParen) {
            self.error(ParseError::BracketNotClosed { bracket:  '(',
                                                      position: open, });
        }
        self.depth -= 1;
        condition
    }

    /// Parses `if (condition) branch [else branch]` with `else if` chains.
    ///
    /// A second `else` after a complete `if`/`else` records `SingleElse`;
    /// its branch is still consumed so the statements after it parse.
    pub(crate) fn parse_if(&mut self) -> Expr {
        let pos = self.current_position();
        self.advance(); // `if`

        let Some(open) = self.expect_condition_paren("if") else {
            return Expr::Empty { pos };
        };
        let condition = self.parse_condition(open);
        let then_branch = self.parse_branch();

        self.skip_newlines();
        let else_branch = if self.eat(&Token::Keyword("else".to_string())) {
            self.skip_newlines();
            let branch = if let Some(lexed) = self.peek()
                            && lexed.token == Token::Keyword("if".to_string())
            {
                self.parse_if()
            } else {
                self.parse_branch()
            };

            self.skip_newlines();
            if let Some(lexed) = self.peek()
               && lexed.token == Token::Keyword("else".to_string())
            {
                let position = lexed.pos;
                self.error(ParseError::SingleElse { position });
                self.advance();
                self.skip_newlines();
                self.parse_branch();
            }

            Some(Box::new(branch))
        } else {
            None
        };

        Expr::If { condition: Box::new(condition),
                   then_branch: Box::new(then_branch),
                   else_branch,
                   pos }
    }

    /// Parses `while (condition) body`.
    pub(crate) fn parse_while(&mut self) -> Expr {
        let pos = self.current_position();
        self.advance(); // `while`

        let Some(open) = self.expect_condition_paren("while") else {
            return Expr::Empty { pos };
        };
        let condition = self.parse_condition(open);
        let body = self.parse_branch();

        Expr::While { condition: Box::new(condition),
                      body: Box::new(body),
                      pos }
    }

    /// Parses `do body while (condition);`.
    ///
    /// The trailing `;` is required; its absence is `MissingTerminator`.
    pub(crate) fn parse_do(&mut self) -> Expr {
        let pos = self.current_position();
        self.advance(); // `do`

        let body = self.parse_branch();

        self.skip_newlines();
        if !self.eat(&Token::Keyword("while".to_string())) {
            let position = self.current_position();
            self.error(ParseError::KeywordMisused { keyword: "do".to_string(),
                                                    expected:
                                                        "'while (condition);' after the body"
                                                                                             .to_string(),
                                                    position });
            return Expr::Empty { pos };
        }

        let Some(open) = self.expect_condition_paren("while") else {
            return Expr::Empty { pos };
        };
        let condition = self.parse_condition(open);

        if !self.eat(&Token::Semicolon) {
            let position = self.current_position();
            self.error(ParseError::MissingTerminator { position });
        }

        Expr::DoWhile { body: Box::new(body),
                        condition: Box::new(condition),
                        pos }
    }

    /// Parses `for (init; condition; step) body`.
    ///
    /// The head must contain exactly three semicolon-separated slots; a slot
    /// may be empty, but commas are rejected.
    pub(crate) fn parse_for(&mut self) -> Expr {
        let pos = self.current_position();
        self.advance(); // `for`

        let Some(open) = self.expect_condition_paren("for") else {
            return Expr::Empty { pos };
        };

        self.depth += 1;
        let mut slots: Vec<Expr> = Vec::new();
        loop {
            let slot = match self.peek().map(|l| l.token.clone()) {
                Some(Token::Semicolon | Token::RParen) => Expr::Empty { pos: self.current_position(), },
                _ => self.parse_expression(0),
            };
            slots.push(slot);

            match self.peek().map(|l| l.token.clone()) {
                Some(Token::Semicolon) => {
                    self.advance();
                },
                Some(Token::RParen) => {
                    self.advance();
                    break;
                },
                Some(Token::Comma) => {
                    let position = self.current_position();
                    self.error(ParseError::KeywordMisused { keyword: "for".to_string(),
                                                            expected:
                                                                "three semicolon-separated slots \
                                                                 without commas"
                                                                                .to_string(),
                                                            position });
                    self.advance();
                },
                None => {
                    self.error(ParseError::BracketNotClosed { bracket:  '(',
                                                              position: open, });
                    break;
                },
                Some(other) => {
                    let position = self.current_position();
                    self.error(ParseError::UnexpectedToken { token: other.describe(),
                                                             position });
                    self.advance();
                },
            }
        }
        self.depth -= 1;

        if slots.len() != 3 {
            self.error(ParseError::ForArguments { found:    slots.len(),
                                                  position: pos, });
        }
        while slots.len() < 3 {
            slots.push(Expr::Empty { pos });
        }
        slots.truncate(3);

        let body = self.parse_branch();

        let mut iter = slots.into_iter();
        let init = iter.next().unwrap_or(Expr::Empty { pos });
        let condition = iter.next().unwrap_or(Expr::Empty { pos });
        let step = iter.next().unwrap_or(Expr::Empty { pos });

        Expr::For { init: Box::new(init),
                    condition: Box::new(condition),
                    step: Box::new(step),
                    body: Box::new(body),
                    pos }
    }

    /// Parses `function name(params) { body }`.
    ///
    /// Parameters must be plain symbols; anything else records
    /// `FunctionArgumentsSymbols` and is skipped.
    pub(crate) fn parse_function(&mut self) -> Expr {
        let pos = self.current_position();
        self.advance(); // `function`

        let name = if let Some(lexed) = self.peek()
                      && let Token::Identifier(name) = &lexed.token
        {
            let name = name.clone();
            self.advance();
            name
        } else {
            let position = self.current_position();
            self.error(ParseError::KeywordMisused { keyword:  "function".to_string(),
                                                    expected: "a function name".to_string(),
                                                    position, });
            return Expr::Empty { pos };
        };

        if !self.eat(&Token::LParen) {
            let position = self.current_position();
            self.error(ParseError::KeywordMisused { keyword:  "function".to_string(),
                                                    expected: "a parameter list".to_string(),
                                                    position, });
            return Expr::Empty { pos };
        }

        self.depth += 1;
        let mut params = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                match self.peek().map(|l| l.token.clone()) {
                    Some(Token::Identifier(param)) => {
                        params.push(param);
                        self.advance();
                    },
                    Some(Token::RParen) => {
                        self.advance();
                        break;
                    },
                    None => {
                        self.error(ParseError::BracketNotClosed { bracket:  '(',
                                                                  position: pos, });
                        break;
                    },
                    Some(_) => {
                        let position = self.current_position();
                        self.error(ParseError::FunctionArgumentsSymbols { position });
                        self.advance();
                        continue;
                    },
                }

                match self.peek().map(|l| l.token.clone()) {
                    Some(Token::Comma) => {
                        self.advance();
                    },
                    Some(Token::RParen) => {
                        self.advance();
                        break;
                    },
                    None => {
                        self.error(ParseError::BracketNotClosed { bracket:  '(',
                                                                  position: pos, });
                        break;
                    },
                    Some(other) => {
                        let position = self.current_position();
                        self.error(ParseError::UnexpectedToken { token: other.describe(),
                                                                 position });
                        self.advance();
                    },
                }
            }
        }
        self.depth -= 1;

        self.skip_newlines();
        let body = if let Some(lexed) = self.peek()
                      && lexed.token == Token::LBrace
        {
            let open = lexed.pos;
            self.advance();
            self.parse_block(open)
        } else {
            let position = self.current_position();
            self.error(ParseError::KeywordMisused { keyword:  "function".to_string(),
                                                    expected: "a '{' body block".to_string(),
                                                    position, });
            Expr::Empty { pos }
        };

        Expr::FunctionDef { name,
                            params,
                            body: Box::new(body),
                            pos }
    }
}
