use crate::{
    ast::{Expr, Position, Special},
    error::ParseError,
    interpreter::{
        parser::core::Parser,
        scanner::Token,
        value::scalar::Scalar,
    },
};

impl Parser<'_> {
    /// Parses a primary expression: a literal, a symbol with its call/index
    /// chains, a bracketed group, a matrix literal, a block, a prefix
    /// operator application, or a keyword form used in expression position.
    pub(crate) fn parse_primary(&mut self) -> Expr {
        let Some(lexed) = self.peek() else {
            let pos = self.current_position();
            self.error(ParseError::MissingExpression { position: pos });
            return Expr::Empty { pos };
        };
        let pos = lexed.pos;
        let lexeme_len = lexed.len;

        match lexed.token.clone() {
            Token::Number { value, imaginary } => {
                self.advance();
                let value = if imaginary {
                    Scalar::new(0.0, value)
                } else {
                    Scalar::real(value)
                };
                self.parse_postfix_chain(Expr::Number { value, pos })
            },
            Token::Str(value) => {
                self.advance();
                Expr::Str { value, pos }
            },
            Token::Identifier(name) => {
                self.advance();

                // Call syntax requires the `(` to touch the identifier;
                // `name (…)` is a symbol followed by a group.
                let adjacent_paren = self.tokens
                                         .get(self.cursor)
                                         .is_some_and(|next| {
                                             next.token == Token::LParen
                                             && next.pos.offset == pos.offset + lexeme_len
                                         });
                let expr = if adjacent_paren {
                    let open = self.current_position();
                    self.advance();
                    let args = self.parse_call_args(open);
                    Expr::Call { name, args, pos }
                } else {
                    Expr::Symbol { name, pos }
                };

                self.parse_postfix_chain(expr)
            },
            Token::Keyword(word) => match word.as_str() {
                "if" => self.parse_if(),
                "while" => self.parse_while(),
                "do" => self.parse_do(),
                "for" => self.parse_for(),
                "function" => self.parse_function(),
                other => {
                    if other == "else" {
                        self.error(ParseError::IfRequired { position: pos });
                    } else {
                        let token = format!("keyword '{other}'");
                        self.error(ParseError::UnexpectedToken { token,
                                                                 position: pos });
                    }
                    self.advance();
                    Expr::Empty { pos }
                },
            },
            Token::LParen => {
                self.advance();
                let group = self.parse_group(pos);
                self.parse_postfix_chain(group)
            },
            Token::LBracket => {
                self.advance();
                let matrix = self.parse_matrix(pos);
                self.parse_postfix_chain(matrix)
            },
            Token::LBrace => {
                self.advance();
                self.parse_block(pos)
            },
            Token::Operator(symbol) => {
                if let Some(def) = self.table.prefix(&symbol) {
                    let precedence = def.precedence;
                    self.advance();
                    let operand = self.parse_operand(&symbol, precedence);
                    return Expr::Container { op:    Some(symbol),
                                             items: vec![operand],
                                             pos };
                }
                if symbol == ":" {
                    // The whole-axis placeholder inside an index.
                    self.advance();
                    return Expr::Special { token: Special::Colon,
                                           pos };
                }
                self.error(ParseError::MissingExpression { position: pos });
                Expr::Empty { pos }
            },
            Token::RParen => {
                self.advance();
                self.error(ParseError::BracketUnmatched { bracket:  ')',
                                                          position: pos, });
                Expr::Empty { pos }
            },
            Token::RBracket => {
                self.advance();
                self.error(ParseError::BracketUnmatched { bracket:  ']',
                                                          position: pos, });
                Expr::Empty { pos }
            },
            Token::RBrace | Token::Comma | Token::Semicolon | Token::Newline => {
                self.error(ParseError::MissingExpression { position: pos });
                Expr::Empty { pos }
            },
        }
    }

    /// Folds index brackets onto a parsed expression: `m[0, 1]`, `f()[2]`.
    fn parse_postfix_chain(&mut self, mut expr: Expr) -> Expr {
        while let Some(lexed) = self.peek() {
            if lexed.token != Token::LBracket {
                break;
            }
            let open = lexed.pos;
            self.advance();
            let indices = self.parse_index_args(open);
            expr = Expr::Index { base: Box::new(expr),
                                 indices,
                                 pos: open };
        }
        expr
    }

    /// Parses a parenthesized group after its `(` was consumed.
    ///
    /// A single child is plain grouping; several comma-separated children
    /// form an operator-less container, which is how `(a, b) = f()` targets
    /// and multi-value expressions parse.
    fn parse_group(&mut self, open: Position) -> Expr {
        self.depth += 1;
        let mut items = Vec::new();

        if self.eat(&Token::RParen) {
            self.depth -= 1;
            return Expr::Container { op: None,
                                     items,
                                     pos: open };
        }

        loop {
            items.push(self.parse_expression(0));
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
        Expr::Container { op: None,
                          items,
                          pos: open }
    }

    /// Parses call arguments after the opening `(` was consumed.
    pub(crate) fn parse_call_args(&mut self, open: Position) -> Vec<Expr> {
        self.depth += 1;
        let mut args = Vec::new();

        if self.eat(&Token::RParen) {
            self.depth -= 1;
            return args;
        }

        loop {
            args.push(self.parse_expression(0));
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
        args
    }

    /// Parses index arguments after the opening `[` was consumed.
    pub(crate) fn parse_index_args(&mut self, open: Position) -> Vec<Expr> {
        self.depth += 1;
        let mut indices = Vec::new();

        if self.eat(&Token::RBracket) {
            self.depth -= 1;
            return indices;
        }

        loop {
            indices.push(self.parse_expression(0));
            match self.peek().map(|l| l.token.clone()) {
                Some(Token::Comma) => {
                    self.advance();
                },
                Some(Token::RBracket) => {
                    self.advance();
                    break;
                },
                None => {
                    self.error(ParseError::BracketNotClosed { bracket:  '[',
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
        indices
    }

    /// Parses a matrix literal after the opening `[` was consumed.
    ///
    /// Cells are separated by `,`, rows by `;`. Row lengths are checked at
    /// evaluation time, not here.
    pub(crate) fn parse_matrix(&mut self, open: Position) -> Expr {
        self.depth += 1;
        let mut rows = Vec::new();
        let mut current = Vec::new();

        if self.eat(&Token::RBracket) {
            self.depth -= 1;
            return Expr::MatrixLiteral { rows, pos: open };
        }

        loop {
            current.push(self.parse_expression(0));
            match self.peek().map(|l| l.token.clone()) {
                Some(Token::Comma) => {
                    self.advance();
                },
                Some(Token::Semicolon) => {
                    self.advance();
                    rows.push(std::mem::take(&mut current));
                },
                Some(Token::RBracket) => {
                    self.advance();
                    rows.push(current);
                    break;
                },
                None => {
                    self.error(ParseError::BracketNotClosed { bracket:  '[',
                                                              position: open, });
                    rows.push(current);
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
        Expr::MatrixLiteral { rows, pos: open }
    }

    /// Parses a `{ … }` block after the opening brace was consumed.
    ///
    /// Newlines inside a block separate statements again, whatever the
    /// surrounding bracket depth was.
    pub(crate) fn parse_block(&mut self, open: Position) -> Expr {
        let saved_depth = self.depth;
        self.depth = 0;

        let mut statements = Vec::new();
        loop {
            while matches!(self.tokens.get(self.cursor).map(|l| &l.token),
                           Some(Token::Newline | Token::Semicolon))
            {
                self.cursor += 1;
            }
            match self.tokens.get(self.cursor).map(|l| &l.token) {
                Some(Token::RBrace) => {
                    self.cursor += 1;
                    break;
                },
                None => {
                    self.error(ParseError::BracketNotClosed { bracket:  '{',
                                                              position: open, });
                    break;
                },
                Some(_) => statements.push(self.parse_statement()),
            }
        }

        self.depth = saved_depth;
        Expr::Block { statements,
                      pos: open }
    }
}
