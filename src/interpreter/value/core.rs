use std::{fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{function::FunctionValue, matrix::Matrix, range::Range, scalar::Scalar},
    },
};

/// The kind tag of a runtime value.
///
/// Kinds are the dispatch key of the operator registry. The built-in kinds
/// are closed; collaborators extend the set by allocating `Extension` tags
/// at run time and wrapping their payloads in [`Value::Object`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Complex scalar.
    Scalar,
    /// Dense matrix.
    Matrix,
    /// Text string.
    Text,
    /// Arithmetic progression.
    Range,
    /// Callable value.
    Function,
    /// Multiple simultaneous results.
    ArgumentList,
    /// A kind allocated by an extension.
    Extension(u16),
}

impl ValueKind {
    /// A human-readable name for error messages.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Scalar => "scalar".to_string(),
            Self::Matrix => "matrix".to_string(),
            Self::Text => "string".to_string(),
            Self::Range => "range".to_string(),
            Self::Function => "function".to_string(),
            Self::ArgumentList => "argument list".to_string(),
            Self::Extension(tag) => format!("extension kind #{tag}"),
        }
    }
}

/// The capability set an extension value kind must provide.
///
/// Anything that can name its kind and render itself can participate in the
/// language; arithmetic over the new kind is added through dispatch-table
/// registrations, never by modifying the core.
pub trait CustomValue: fmt::Debug {
    /// The human-readable name of the kind.
    fn type_name(&self) -> &str;
    /// Renders the value for display.
    fn to_text(&self) -> String;
}

/// A reference-shared extension value with its allocated kind tag.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    /// The tag allocated for this kind.
    pub kind:  ValueKind,
    /// The payload.
    pub inner: Rc<dyn CustomValue>,
}

/// Represents a runtime value in the interpreter.
///
/// Values are copy-on-assign: binding one to a second name copies it, so
/// mutating through one name never changes the other. The exceptions are
/// `Function` and `Object`, which are reference-shared by design.
#[derive(Debug, Clone)]
pub enum Value {
    /// A complex scalar.
    Scalar(Scalar),
    /// A dense matrix of scalars.
    Matrix(Matrix),
    /// A text string.
    Text(String),
    /// An arithmetic progression.
    Range(Range),
    /// A callable value (user function, lambda or builtin).
    Function(Rc<FunctionValue>),
    /// Multiple simultaneous results, produced by multi-return functions and
    /// consumed by list assignment.
    ArgumentList(Vec<Value>),
    /// An extension-provided value.
    Object(ObjectRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a == b,
            (Self::Matrix(a), Self::Matrix(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Range(a), Self::Range(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::ArgumentList(a), Self::ArgumentList(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(&a.inner, &b.inner),
            _ => false,
        }
    }
}

impl Value {
    /// The kind tag used for dispatch.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::{
    ///     core::{Value, ValueKind},
    ///     scalar::Scalar,
    /// };
    ///
    /// assert_eq!(Value::Scalar(Scalar::real(1.0)).kind(), ValueKind::Scalar);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Matrix(_) => ValueKind::Matrix,
            Self::Text(_) => ValueKind::Text,
            Self::Range(_) => ValueKind::Range,
            Self::Function(_) => ValueKind::Function,
            Self::ArgumentList(_) => ValueKind::ArgumentList,
            Self::Object(object) => object.kind,
        }
    }

    /// A human-readable kind name for error messages.
    #[must_use]
    pub fn kind_name(&self) -> String {
        if let Self::Object(object) = self {
            return object.inner.type_name().to_string();
        }
        self.kind().name()
    }

    /// Extracts a scalar, or reports the actual kind.
    ///
    /// # Errors
    /// `RuntimeError::KindMismatch` for every other kind.
    pub fn as_scalar(&self, line: usize) -> EvalResult<Scalar> {
        match self {
            Self::Scalar(s) => Ok(*s),
            other => Err(RuntimeError::KindMismatch { expected: "a scalar".to_string(),
                                                      found:    other.kind_name(),
                                                      line, }),
        }
    }

    /// Extracts a real number, rejecting complex scalars.
    ///
    /// # Errors
    /// `RuntimeError::KindMismatch` for non-scalars and complex scalars.
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        self.as_scalar(line)?.as_real(line)
    }

    /// Borrows a matrix, or reports the actual kind.
    ///
    /// # Errors
    /// `RuntimeError::KindMismatch` for every other kind.
    pub fn as_matrix(&self, line: usize) -> EvalResult<&Matrix> {
        match self {
            Self::Matrix(m) => Ok(m),
            other => Err(RuntimeError::KindMismatch { expected: "a matrix".to_string(),
                                                      found:    other.kind_name(),
                                                      line, }),
        }
    }

    /// Borrows a string, or reports the actual kind.
    ///
    /// # Errors
    /// `RuntimeError::KindMismatch` for every other kind.
    pub fn as_text(&self, line: usize) -> EvalResult<&str> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(RuntimeError::KindMismatch { expected: "a string".to_string(),
                                                      found:    other.kind_name(),
                                                      line, }),
        }
    }

    /// Tests a condition value. Only scalars may be conditions; any nonzero
    /// scalar is true.
    ///
    /// # Errors
    /// `RuntimeError::ConditionNotScalar` for every other kind.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::{core::Value, scalar::Scalar};
    ///
    /// assert!(Value::Scalar(Scalar::real(2.0)).is_true(1).unwrap());
    /// assert!(!Value::Scalar(Scalar::real(0.0)).is_true(1).unwrap());
    /// assert!(Value::Text("yes".to_string()).is_true(1).is_err());
    /// ```
    pub fn is_true(&self, line: usize) -> EvalResult<bool> {
        match self {
            Self::Scalar(s) => Ok(!s.is_zero()),
            _ => Err(RuntimeError::ConditionNotScalar { line }),
        }
    }

    /// Returns `true` if the value is [`Scalar`](Self::Scalar).
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(..))
    }

    /// Returns `true` if the value is [`Matrix`](Self::Matrix).
    #[must_use]
    pub const fn is_matrix(&self) -> bool {
        matches!(self, Self::Matrix(..))
    }

    /// Returns `true` if the value is [`Function`](Self::Function).
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self, Self::Function(..))
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::real(v))
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}

impl From<Range> for Value {
    fn from(r: Range) -> Self {
        Self::Range(r)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Matrix(m) => write!(f, "{m}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Range(r) => write!(f, "{r}"),
            Self::Function(function) => write!(f, "{function}"),
            Self::ArgumentList(values) => {
                write!(f, "(")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, ")")
            },
            Self::Object(object) => write!(f, "{}", object.inner.to_text()),
        }
    }
}
