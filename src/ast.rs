use std::collections::HashSet;

use crate::interpreter::value::scalar::Scalar;

/// A location in the source text.
///
/// Positions are attached to tokens and to every parse error. Lines and
/// columns are 1-based, the offset is a 0-based character index into the
/// buffer. A position only ever advances while scanning; the parser rewinds
/// by index, never by mutating a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// 1-based line number.
    pub line:   usize,
    /// 1-based column number.
    pub column: usize,
    /// 0-based character offset into the source buffer.
    pub offset: usize,
}

impl Position {
    /// The position of the first character of a buffer.
    ///
    /// # Example
    /// ```
    /// use matrica::ast::Position;
    ///
    /// let p = Position::start();
    /// assert_eq!((p.line, p.column, p.offset), (1, 1, 0));
    /// ```
    #[must_use]
    pub const fn start() -> Self {
        Self { line:   1,
               column: 1,
               offset: 0, }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Placeholder tokens that stand for something other than a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    /// The whole-axis placeholder `:` inside an index, as in `m[:, 1]`.
    Colon,
}

/// An expression-tree node.
///
/// The tree is built once by the parser and never mutated afterwards;
/// evaluation is a read-only walk. Operator applications use the generic
/// `Container` node (one item for prefix/postfix operators, two for infix),
/// and a `Container` without an operator is a parenthesized group — a single
/// child degrades to that child's value, several children form an argument
/// list.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal. `2i` scans to a pure-imaginary scalar.
    Number {
        /// The literal value.
        value: Scalar,
        /// Where the literal starts.
        pos:   Position,
    },
    /// A string literal.
    Str {
        /// The decoded text (escapes already applied).
        value: String,
        /// Where the opening quote is.
        pos:   Position,
    },
    /// A reference to a name, resolved at evaluation time.
    Symbol {
        /// The referenced name.
        name: String,
        /// Where the name starts.
        pos:  Position,
    },
    /// A placeholder token such as the whole-axis `:`.
    Special {
        /// Which placeholder.
        token: Special,
        /// Where it is.
        pos:   Position,
    },
    /// The generic operator/grouping node.
    Container {
        /// The operator symbol, or `None` for a plain group.
        op:    Option<String>,
        /// Operand sub-expressions.
        items: Vec<Expr>,
        /// Position of the operator or of the opening bracket.
        pos:   Position,
    },
    /// A bracketed matrix literal such as `[1, 2; 3, 4]`.
    MatrixLiteral {
        /// The rows, outer to inner.
        rows: Vec<Vec<Expr>>,
        /// Position of the opening bracket.
        pos:  Position,
    },
    /// A function application `name(args)`. Only produced when the `(`
    /// immediately follows the identifier.
    Call {
        /// The callee name.
        name: String,
        /// Argument expressions.
        args: Vec<Expr>,
        /// Position of the callee.
        pos:  Position,
    },
    /// An indexing expression `base[indices]`.
    Index {
        /// The indexed expression.
        base:    Box<Expr>,
        /// One or two index expressions (or `:` placeholders).
        indices: Vec<Expr>,
        /// Position of the opening bracket.
        pos:     Position,
    },
    /// An assignment. The target was validated at parse time.
    Assign {
        /// Where the value goes.
        target: AssignTarget,
        /// The value expression.
        value:  Box<Expr>,
        /// Position of the `=`.
        pos:    Position,
    },
    /// A lambda `params => body`.
    Lambda {
        /// Parameter names.
        params: Vec<String>,
        /// The body expression.
        body:   Box<Expr>,
        /// Position of the `=>`.
        pos:    Position,
    },
    /// `if (condition) branch [else branch]`.
    If {
        condition:   Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Option<Box<Expr>>,
        /// Position of the `if`.
        pos:         Position,
    },
    /// `while (condition) body`.
    While {
        condition: Box<Expr>,
        body:      Box<Expr>,
        /// Position of the `while`.
        pos:       Position,
    },
    /// `do body while (condition);`.
    DoWhile {
        body:      Box<Expr>,
        condition: Box<Expr>,
        /// Position of the `do`.
        pos:       Position,
    },
    /// `for (init; condition; step) body`.
    For {
        init:      Box<Expr>,
        condition: Box<Expr>,
        step:      Box<Expr>,
        body:      Box<Expr>,
        /// Position of the `for`.
        pos:       Position,
    },
    /// `function name(params) { body }`.
    FunctionDef {
        /// The function name.
        name:   String,
        /// Parameter names.
        params: Vec<String>,
        /// The body block.
        body:   Box<Expr>,
        /// Position of the `function` keyword.
        pos:    Position,
    },
    /// A `{ … }` block of statements.
    Block {
        /// The statements in order.
        statements: Vec<Expr>,
        /// Position of the opening brace.
        pos:        Position,
    },
    /// The empty expression, produced by error recovery and empty groups.
    Empty {
        /// Where the expression would have been.
        pos: Position,
    },
}

/// The left side of an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// A plain name: `x = …`.
    Symbol {
        /// The assigned name.
        name: String,
        /// Position of the name.
        pos:  Position,
    },
    /// An indexed cell of a matrix variable: `m[r, c] = …`.
    Index {
        /// The matrix variable name.
        name:    String,
        /// Index expressions.
        indices: Vec<Expr>,
        /// Position of the name.
        pos:     Position,
    },
    /// A parenthesized list of names: `(a, b) = …`.
    List {
        /// The assigned names in order.
        names: Vec<String>,
        /// Position of the opening parenthesis.
        pos:   Position,
    },
}

impl AssignTarget {
    /// Gets the source position of the target.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Symbol { pos, .. } | Self::Index { pos, .. } | Self::List { pos, .. } => *pos,
        }
    }
}

impl Expr {
    /// Gets the source position of the node.
    ///
    /// ## Example
    /// ```
    /// use matrica::ast::{Expr, Position};
    ///
    /// let expr = Expr::Symbol { name: "x".to_string(),
    ///                           pos:  Position::start(), };
    ///
    /// assert_eq!(expr.position().line, 1);
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Number { pos, .. }
            | Self::Str { pos, .. }
            | Self::Symbol { pos, .. }
            | Self::Special { pos, .. }
            | Self::Container { pos, .. }
            | Self::MatrixLiteral { pos, .. }
            | Self::Call { pos, .. }
            | Self::Index { pos, .. }
            | Self::Assign { pos, .. }
            | Self::Lambda { pos, .. }
            | Self::If { pos, .. }
            | Self::While { pos, .. }
            | Self::DoWhile { pos, .. }
            | Self::For { pos, .. }
            | Self::FunctionDef { pos, .. }
            | Self::Block { pos, .. }
            | Self::Empty { pos } => *pos,
        }
    }

    /// Collects the symbols a subtree references, split into bound and free.
    ///
    /// A name counts as bound when it is a parameter of the analyzed lambda
    /// itself, a parameter of a nested lambda (within that lambda's body), or
    /// a name the subtree assigns before reading. Every other referenced name
    /// is free and must be found in the defining environment. The analysis is
    /// purely structural: it walks the tree, not runtime values.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashSet;
    ///
    /// use matrica::interpreter::{operators::OperatorTable, parser::core::parse_source};
    ///
    /// let table = OperatorTable::with_defaults();
    /// let (statements, errors) = parse_source("x => x + y", &table);
    /// assert!(errors.is_empty());
    ///
    /// let mut bound = HashSet::new();
    /// let mut free = HashSet::new();
    /// statements[0].collect_symbols(&mut bound, &mut free);
    ///
    /// // `x` is the lambda's own parameter; only `y` must be captured.
    /// assert!(!free.contains("x"));
    /// assert!(free.contains("y"));
    /// ```
    pub fn collect_symbols(&self, bound: &mut HashSet<String>, free: &mut HashSet<String>) {
        match self {
            Self::Symbol { name, .. } => {
                if !bound.contains(name) {
                    free.insert(name.clone());
                }
            },
            Self::Container { items, .. } => {
                for item in items {
                    item.collect_symbols(bound, free);
                }
            },
            Self::MatrixLiteral { rows, .. } => {
                for row in rows {
                    for cell in row {
                        cell.collect_symbols(bound, free);
                    }
                }
            },
            Self::Call { name, args, .. } => {
                // The callee may itself be a captured function value.
                if !bound.contains(name) {
                    free.insert(name.clone());
                }
                for arg in args {
                    arg.collect_symbols(bound, free);
                }
            },
            Self::Index { base, indices, .. } => {
                base.collect_symbols(bound, free);
                for index in indices {
                    index.collect_symbols(bound, free);
                }
            },
            Self::Assign { target, value, .. } => {
                value.collect_symbols(bound, free);
                match target {
                    AssignTarget::Symbol { name, .. } => {
                        bound.insert(name.clone());
                    },
                    AssignTarget::Index { name, indices, .. } => {
                        if !bound.contains(name) {
                            free.insert(name.clone());
                        }
                        for index in indices {
                            index.collect_symbols(bound, free);
                        }
                    },
                    AssignTarget::List { names, .. } => {
                        for name in names {
                            bound.insert(name.clone());
                        }
                    },
                }
            },
            Self::Lambda { params, body, .. } => {
                // Nested lambda parameters bind within the nested body only.
                let mut inner = bound.clone();
                inner.extend(params.iter().cloned());
                body.collect_symbols(&mut inner, free);
            },
            Self::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                condition.collect_symbols(bound, free);
                then_branch.collect_symbols(bound, free);
                if let Some(branch) = else_branch {
                    branch.collect_symbols(bound, free);
                }
            },
            Self::While { condition, body, .. } => {
                condition.collect_symbols(bound, free);
                body.collect_symbols(bound, free);
            },
            Self::DoWhile { body, condition, .. } => {
                body.collect_symbols(bound, free);
                condition.collect_symbols(bound, free);
            },
            Self::For { init,
                        condition,
                        step,
                        body,
                        .. } => {
                init.collect_symbols(bound, free);
                condition.collect_symbols(bound, free);
                step.collect_symbols(bound, free);
                body.collect_symbols(bound, free);
            },
            Self::FunctionDef { params, body, .. } => {
                let mut inner = bound.clone();
                inner.extend(params.iter().cloned());
                body.collect_symbols(&mut inner, free);
            },
            Self::Block { statements, .. } => {
                for statement in statements {
                    statement.collect_symbols(bound, free);
                }
            },
            Self::Number { .. } | Self::Str { .. } | Self::Special { .. } | Self::Empty { .. } => {
            },
        }
    }
}
