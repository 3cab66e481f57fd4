use crate::{
    ast::{AssignTarget, Expr, Position},
    error::ParseError,
    interpreter::{
        operators::{Assoc, OperatorTable},
        scanner::{Lexed, Scanner, Token},
    },
};

/// Parses a complete source text.
///
/// The returned error list contains every structural problem found in one
/// pass: the parser records each error, resynchronizes, and continues, so a
/// script with three broken statements reports all three. The statement list
/// is always returned; regions that failed to parse appear as `Expr::Empty`.
///
/// # Example
/// ```
/// use matrica::interpreter::{operators::OperatorTable, parser::core::parse_source};
///
/// let table = OperatorTable::with_defaults();
/// let (statements, errors) = parse_source("1 + 2 * 3", &table);
/// assert!(errors.is_empty());
/// assert_eq!(statements.len(), 1);
/// ```
#[must_use]
pub fn parse_source(source: &str, table: &OperatorTable) -> (Vec<Expr>, Vec<ParseError>) {
    let (tokens, scan_errors) = Scanner::new(source, table).tokenize();

    let mut parser = Parser { tokens: &tokens,
                              cursor: 0,
                              table,
                              errors: scan_errors,
                              depth: 0 };

    let statements = parser.parse_program();
    (statements, parser.errors)
}

/// The precedence-climbing parser over a scanned token list.
///
/// `depth` tracks bracket nesting: inside brackets newlines are plain
/// whitespace, at the top level they separate statements.
pub struct Parser<'t> {
    pub(crate) tokens: &'t [Lexed],
    pub(crate) cursor: usize,
    pub(crate) table:  &'t OperatorTable,
    pub(crate) errors: Vec<ParseError>,
    pub(crate) depth:  usize,
}

impl Parser<'_> {
    /// Looks at the next significant token without consuming it.
    ///
    /// Inside brackets, newline tokens are skipped over.
    pub(crate) fn peek(&mut self) -> Option<&Lexed> {
        if self.depth > 0 {
            while let Some(lexed) = self.tokens.get(self.cursor) {
                if lexed.token == Token::Newline {
                    self.cursor += 1;
                } else {
                    break;
                }
            }
        }
        self.tokens.get(self.cursor)
    }

    /// Consumes and returns the next significant token.
    pub(crate) fn advance(&mut self) -> Option<Lexed> {
        let lexed = self.peek()?.clone();
        self.cursor += 1;
        Some(lexed)
    }

    /// The position of the next token, or of the end of input.
    pub(crate) fn current_position(&mut self) -> Position {
        if let Some(lexed) = self.peek() {
            return lexed.pos;
        }
        self.tokens
            .last()
            .map_or_else(Position::start, |lexed| lexed.pos)
    }

    /// Records a parse error.
    pub(crate) fn error(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Consumes the next token if it equals `token`.
    pub(crate) fn eat(&mut self, token: &Token) -> bool {
        if self.peek().map(|lexed| &lexed.token) == Some(token) {
            self.cursor += 1;
            return true;
        }
        false
    }

    /// Consumes newline tokens at the cursor.
    pub(crate) fn skip_newlines(&mut self) {
        while let Some(lexed) = self.tokens.get(self.cursor) {
            if lexed.token == Token::Newline {
                self.cursor += 1;
            } else {
                break;
            }
        }
    }

    /// Skips ahead to the next statement boundary after an error.
    ///
    /// The recovery rule is explicit: advance until just past a `;` or a
    /// newline, or until a closing brace or the end of input is ahead.
    pub(crate) fn synchronize(&mut self) {
        while let Some(lexed) = self.tokens.get(self.cursor) {
            match lexed.token {
                Token::Semicolon | Token::Newline => {
                    self.cursor += 1;
                    return;
                },
                Token::RBrace => return,
                _ => self.cursor += 1,
            }
        }
    }

    /// Parses statements until the end of input.
    pub(crate) fn parse_program(&mut self) -> Vec<Expr> {
        let mut statements = Vec::new();

        loop {
            while matches!(self.tokens.get(self.cursor).map(|l| &l.token),
                           Some(Token::Newline | Token::Semicolon))
            {
                self.cursor += 1;
            }
            let Some(lexed) = self.tokens.get(self.cursor) else {
                break;
            };
            // A closing brace here has no block to end; blocks consume
            // their own braces.
            if lexed.token == Token::RBrace {
                let position = lexed.pos;
                self.error(ParseError::BracketUnmatched { bracket: '}',
                                                          position });
                self.cursor += 1;
                continue;
            }
            statements.push(self.parse_statement());
        }

        statements
    }

    /// Parses one statement: a keyword form or an expression followed by a
    /// terminator.
    pub(crate) fn parse_statement(&mut self) -> Expr {
        if let Some(lexed) = self.peek() {
            let pos = lexed.pos;
            if let Token::Keyword(word) = &lexed.token {
                let word = word.clone();
                match word.as_str() {
                    "if" => return self.parse_if(),
                    "while" => return self.parse_while(),
                    "do" => return self.parse_do(),
                    "for" => return self.parse_for(),
                    "function" => return self.parse_function(),
                    "else" => {
                        self.error(ParseError::IfRequired { position: pos });
                        self.advance();
                        // Consume the orphaned branch so later statements
                        // still parse.
                        self.parse_branch();
                        return Expr::Empty { pos };
                    },
                    other => {
                        let token = format!("keyword '{other}'");
                        self.error(ParseError::UnexpectedToken { token,
                                                                 position: pos });
                        self.advance();
                        return Expr::Empty { pos };
                    },
                }
            }
        }

        let expr = self.parse_expression(0);
        self.expect_terminator();
        expr
    }

    /// Parses a branch body: a block when a `{` follows, otherwise a single
    /// statement. The body may start on the next line.
    pub(crate) fn parse_branch(&mut self) -> Expr {
        self.skip_newlines();
        if let Some(lexed) = self.peek()
           && lexed.token == Token::LBrace
        {
            let open = lexed.pos;
            self.advance();
            return self.parse_block(open);
        }
        self.parse_statement()
    }

    /// Requires a statement terminator: `;`, a newline, a closing brace, an
    /// `else`, or the end of input. `;` and newlines are consumed, the rest
    /// is left for the caller.
    pub(crate) fn expect_terminator(&mut self) {
        match self.tokens.get(self.cursor).map(|l| &l.token) {
            None | Some(Token::RBrace | Token::Keyword(_)) => {},
            Some(Token::Semicolon | Token::Newline) => {
                self.cursor += 1;
            },
            Some(_) => {
                let position = self.current_position();
                self.error(ParseError::MissingTerminator { position });
                self.synchronize();
            },
        }
    }

    /// The climbing loop: folds infix and postfix operators of at least
    /// `min_prec` onto a parsed primary.
    pub(crate) fn parse_expression(&mut self, min_prec: u8) -> Expr {
        let mut left = self.parse_primary();

        loop {
            let Some(lexed) = self.peek() else { break };
            let Token::Operator(symbol) = &lexed.token else {
                break;
            };
            let symbol = symbol.clone();
            let pos = lexed.pos;

            if self.table.infix(&symbol).is_none()
               && let Some(def) = self.table.postfix(&symbol)
            {
                if def.precedence < min_prec {
                    break;
                }
                self.advance();
                left = Expr::Container { op:    Some(symbol),
                                         items: vec![left],
                                         pos };
                continue;
            }

            let Some(def) = self.table.infix(&symbol) else {
                break;
            };
            if def.precedence < min_prec {
                break;
            }
            let next_min = match def.assoc {
                Assoc::Left => def.precedence + 1,
                Assoc::Right => def.precedence,
            };
            self.advance();

            match symbol.as_str() {
                "=" => left = self.finish_assign(left, pos, next_min),
                "=>" => left = self.finish_lambda(left, pos, next_min),
                _ => {
                    let right = self.parse_operand(&symbol, next_min);
                    left = Expr::Container { op:    Some(symbol),
                                             items: vec![left, right],
                                             pos };
                },
            }
        }

        left
    }

    /// Parses the right operand of an operator that expects one.
    ///
    /// Newlines directly after the operator are continuation whitespace. A
    /// terminator instead of an operand records `MissingOperand` and
    /// degrades to `Expr::Empty`.
    pub(crate) fn parse_operand(&mut self, operator: &str, min_prec: u8) -> Expr {
        self.skip_newlines();

        let position = self.current_position();
        let missing = match self.tokens.get(self.cursor).map(|l| &l.token) {
            None | Some(Token::Semicolon | Token::RParen | Token::RBracket | Token::RBrace) => {
                true
            },
            _ => false,
        };
        if missing {
            self.error(ParseError::MissingOperand { operator: operator.to_string(),
                                                    position });
            return Expr::Empty { pos: position };
        }

        self.parse_expression(min_prec)
    }

    /// Folds `left = value` into an assignment, validating the target shape.
    fn finish_assign(&mut self, left: Expr, pos: Position, min_prec: u8) -> Expr {
        let value = self.parse_operand("=", min_prec);

        let target = match assign_target(left) {
            Ok(target) => target,
            Err(target_pos) => {
                self.error(ParseError::AssignTargetInvalid { position: target_pos });
                return value;
            },
        };

        Expr::Assign { target,
                       value: Box::new(value),
                       pos }
    }

    /// Folds `params => body` into a lambda, validating that every
    /// parameter is a plain symbol.
    fn finish_lambda(&mut self, left: Expr, pos: Position, min_prec: u8) -> Expr {
        let params = match lambda_params(&left) {
            Some(params) => params,
            None => {
                self.error(ParseError::FunctionArgumentsSymbols { position: left.position() });
                Vec::new()
            },
        };

        let body = self.parse_operand("=>", min_prec);
        Expr::Lambda { params,
                       body: Box::new(body),
                       pos }
    }
}

/// Converts a parsed left-hand expression into an assignment target.
///
/// Valid targets: a symbol, an index on a symbol, or a parenthesized list
/// of symbols. Everything else reports the position to anchor the error at.
fn assign_target(left: Expr) -> Result<AssignTarget, Position> {
    match left {
        Expr::Symbol { name, pos } => Ok(AssignTarget::Symbol { name, pos }),
        Expr::Index { base, indices, pos } => match *base {
            Expr::Symbol { name, .. } => Ok(AssignTarget::Index { name, indices, pos }),
            other => Err(other.position()),
        },
        Expr::Container { op: None, items, pos } => {
            let mut names = Vec::with_capacity(items.len());
            for item in &items {
                match item {
                    Expr::Symbol { name, .. } => names.push(name.clone()),
                    other => return Err(other.position()),
                }
            }
            if names.is_empty() {
                return Err(pos);
            }
            Ok(AssignTarget::List { names, pos })
        },
        other => Err(other.position()),
    }
}

/// Extracts lambda parameter names from the expression before `=>`.
fn lambda_params(left: &Expr) -> Option<Vec<String>> {
    match left {
        Expr::Symbol { name, .. } => Some(vec![name.clone()]),
        Expr::Container { op: None, items, .. } => {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Expr::Symbol { name, .. } => names.push(name.clone()),
                    _ => return None,
                }
            }
            Some(names)
        },
        _ => None,
    }
}
