#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can be raised during evaluation.
pub enum RuntimeError {
    /// A symbol resolved through the whole chain without a match.
    SymbolMissing {
        /// The name of the symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call named a function that does not exist anywhere.
    FunctionMissing {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A call named a symbol whose value is not callable.
    NotCallable {
        /// The name of the symbol.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// No dispatch entry accepts the operator for this pair of value kinds.
    OperationInvalid {
        /// The operator symbol.
        operator: String,
        /// Kind name of the left operand.
        left:     String,
        /// Kind name of the right operand.
        right:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A value had an unexpected kind.
    KindMismatch {
        /// The kind that was required.
        expected: String,
        /// The kind that was found.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// The wrong number of arguments was supplied to a function.
    ArgumentCount {
        /// The name of the function.
        name:     String,
        /// A description of the accepted argument counts.
        expected: String,
        /// The number of arguments actually supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Two matrices with incompatible dimensions met in an operation.
    DimensionMismatch {
        /// `(rows, cols)` of the left operand.
        left:  (usize, usize),
        /// `(rows, cols)` of the right operand.
        right: (usize, usize),
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A matrix could not be built from the given cells.
    MatrixInvalid {
        /// Details about the shape problem.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// An index position was fractional, negative or not a real number.
    IndexNotInteger {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index was outside the valid bounds.
    IndexOutOfBounds {
        /// The largest valid index.
        max:   usize,
        /// The index that was actually requested.
        found: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Attempted division by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A range was constructed with a zero step.
    RangeStepZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A condition evaluated to something other than a scalar.
    ConditionNotScalar {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to assign to a registered constant.
    ConstantImmutable {
        /// The name of the constant.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An expected value was missing (the expression produced nothing).
    MissingValue {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The `:` placeholder appeared outside an index position.
    SpecialMisplaced {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arithmetic overflowed the representable range.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A file-backed function failed to parse.
    ScriptErrors {
        /// The name of the function whose file was loaded.
        name:  String,
        /// How many parse errors the file produced.
        count: usize,
        /// The source line of the reference that triggered the load.
        line:  usize,
    },
    /// A file-backed function's file could not be read.
    ScriptUnreadable {
        /// The name of the function whose file was loaded.
        name: String,
        /// The source line of the reference that triggered the load.
        line: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SymbolMissing { name, line } => {
                write!(f, "Error on line {line}: Unknown symbol '{name}'.")
            },
            Self::FunctionMissing { name, line } => {
                write!(f, "Error on line {line}: Unknown function '{name}'.")
            },
            Self::NotCallable { name, line } => {
                write!(f, "Error on line {line}: '{name}' is not callable.")
            },
            Self::OperationInvalid { operator,
                                     left,
                                     right,
                                     line, } => write!(f,
                                                       "Error on line {line}: Operator '{operator}' is not supported for {left} and {right}."),
            Self::KindMismatch { expected, found, line } => {
                write!(f, "Error on line {line}: Expected {expected}, found {found}.")
            },
            Self::ArgumentCount { name,
                                  expected,
                                  found,
                                  line, } => write!(f,
                                                    "Error on line {line}: '{name}' expects {expected} argument(s), found {found}."),
            Self::DimensionMismatch { left, right, line } => write!(f,
                                                                    "Error on line {line}: Dimension mismatch: {}x{} against {}x{}.",
                                                                    left.0,
                                                                    left.1,
                                                                    right.0,
                                                                    right.1),
            Self::MatrixInvalid { details, line } => {
                write!(f, "Error on line {line}: Invalid matrix: {details}.")
            },
            Self::IndexNotInteger { line } => write!(f,
                                                     "Error on line {line}: Index must be a non-negative integer."),
            Self::IndexOutOfBounds { max, found, line } => write!(f,
                                                                  "Error on line {line}: Index out of bounds. Maximum is {max}, but found {found} instead."),
            Self::DivisionByZero { line } => write!(f, "Error on line {line}: Division by zero."),
            Self::RangeStepZero { line } => {
                write!(f, "Error on line {line}: Range step must not be zero.")
            },
            Self::ConditionNotScalar { line } => {
                write!(f, "Error on line {line}: Condition must be a scalar.")
            },
            Self::ConstantImmutable { name, line } => {
                write!(f, "Error on line {line}: Cannot assign to constant '{name}'.")
            },
            Self::MissingValue { line } => write!(f, "Error on line {line}: Value missing."),
            Self::SpecialMisplaced { line } => write!(f,
                                                      "Error on line {line}: ':' is only valid inside an index."),
            Self::Overflow { line } => {
                write!(f, "Error on line {line}: Result is too large to represent.")
            },
            Self::ScriptErrors { name, count, line } => write!(f,
                                                               "Error on line {line}: Script for '{name}' contains {count} parse error(s)."),
            Self::ScriptUnreadable { name, line } => {
                write!(f, "Error on line {line}: Script for '{name}' could not be read.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
