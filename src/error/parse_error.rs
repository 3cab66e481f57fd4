use crate::ast::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur during scanning or parsing.
///
/// Parse errors are collected, not thrown: the parser records each problem
/// with the position it is anchored to, resynchronizes, and keeps going so
/// that a single pass reports every structural error in the source.
pub enum ParseError {
    /// A character that no classification accepts.
    UnknownCharacter {
        /// The offending character.
        character: char,
        /// Where it was found.
        position:  Position,
    },
    /// A string literal reached the end of input without a closing quote.
    /// Anchored at the opening quote, not at end-of-input.
    StringNotTerminated {
        /// Position of the opening quote.
        position: Position,
    },
    /// A backslash escape that the scanner does not recognize.
    EscapeUnknown {
        /// The character following the backslash.
        escape:   char,
        /// Position of the backslash.
        position: Position,
    },
    /// An opening bracket whose match was never found.
    /// Anchored at the opening bracket.
    BracketNotClosed {
        /// The opening bracket character.
        bracket:  char,
        /// Position of the opening bracket.
        position: Position,
    },
    /// A closing bracket with no opening partner.
    BracketUnmatched {
        /// The closing bracket character.
        bracket:  char,
        /// Where it was found.
        position: Position,
    },
    /// An expression was required but none was found.
    MissingExpression {
        /// Where the expression was expected.
        position: Position,
    },
    /// An operator that expects a right-hand operand did not get one.
    MissingOperand {
        /// The operator symbol.
        operator: String,
        /// Position of the operator.
        position: Position,
    },
    /// A statement terminator (`;`, newline or end of block) was expected.
    MissingTerminator {
        /// Where the terminator was expected.
        position: Position,
    },
    /// An `else` with no `if` to attach to.
    IfRequired {
        /// Position of the `else`.
        position: Position,
    },
    /// A second `else` after an `if`/`else` that already has one.
    SingleElse {
        /// Position of the duplicate `else`.
        position: Position,
    },
    /// A `for` head without exactly three semicolon-separated slots.
    ForArguments {
        /// The number of slots actually present.
        found:    usize,
        /// Position of the `for` keyword.
        position: Position,
    },
    /// A function or lambda parameter list containing something other than
    /// plain symbols.
    FunctionArgumentsSymbols {
        /// Position of the offending parameter.
        position: Position,
    },
    /// The left side of `=` is not an assignable target.
    AssignTargetInvalid {
        /// Position of the left-hand expression.
        position: Position,
    },
    /// A keyword used outside its required shape.
    KeywordMisused {
        /// The keyword.
        keyword:  String,
        /// What the parser expected instead.
        expected: String,
        /// Where the shape broke.
        position: Position,
    },
    /// A token that no rule accepts at this point.
    UnexpectedToken {
        /// A description of the token.
        token:    String,
        /// Where it was found.
        position: Position,
    },
}

impl ParseError {
    /// Returns the source position this error is anchored to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::UnknownCharacter { position, .. }
            | Self::StringNotTerminated { position }
            | Self::EscapeUnknown { position, .. }
            | Self::BracketNotClosed { position, .. }
            | Self::BracketUnmatched { position, .. }
            | Self::MissingExpression { position }
            | Self::MissingOperand { position, .. }
            | Self::MissingTerminator { position }
            | Self::IfRequired { position }
            | Self::SingleElse { position }
            | Self::ForArguments { position, .. }
            | Self::FunctionArgumentsSymbols { position }
            | Self::AssignTargetInvalid { position }
            | Self::KeywordMisused { position, .. }
            | Self::UnexpectedToken { position, .. } => *position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.position();
        write!(f, "Error at line {}, column {}: ", p.line, p.column)?;

        match self {
            Self::UnknownCharacter { character, .. } => {
                write!(f, "Unrecognized character '{character}'.")
            },
            Self::StringNotTerminated { .. } => {
                write!(f, "String literal is never terminated.")
            },
            Self::EscapeUnknown { escape, .. } => {
                write!(f, "Unknown escape sequence '\\{escape}'.")
            },
            Self::BracketNotClosed { bracket, .. } => {
                write!(f, "Bracket '{bracket}' is never closed.")
            },
            Self::BracketUnmatched { bracket, .. } => {
                write!(f, "Closing bracket '{bracket}' has no opening partner.")
            },
            Self::MissingExpression { .. } => write!(f, "Expected an expression."),
            Self::MissingOperand { operator, .. } => {
                write!(f, "Operator '{operator}' is missing its operand.")
            },
            Self::MissingTerminator { .. } => write!(f, "Expected ';' to end the statement."),
            Self::IfRequired { .. } => write!(f, "'else' without a preceding 'if'."),
            Self::SingleElse { .. } => {
                write!(f, "Only a single 'else' may follow an 'if'.")
            },
            Self::ForArguments { found, .. } => write!(f,
                                                       "'for' expects exactly 3 slots: (init; condition; step), found {found}."),
            Self::FunctionArgumentsSymbols { .. } => {
                write!(f, "Parameters must be plain symbols.")
            },
            Self::AssignTargetInvalid { .. } => {
                write!(f, "Left side of '=' cannot be assigned to.")
            },
            Self::KeywordMisused { keyword, expected, .. } => {
                write!(f, "'{keyword}' expects {expected}.")
            },
            Self::UnexpectedToken { token, .. } => write!(f, "Unexpected {token}."),
        }
    }
}

impl std::error::Error for ParseError {}
