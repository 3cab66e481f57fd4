use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{matrix::Matrix, scalar::Scalar},
    },
};

/// An arithmetic progression of real numbers.
///
/// Built by the `:` operator: `a:b` steps by one, `a:s:b` steps by `s`.
/// The end is inclusive when it lies exactly on the progression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// First value.
    pub start: f64,
    /// Inclusive bound.
    pub end:   f64,
    /// Increment per element. Never zero.
    pub step:  f64,
}

impl Range {
    /// Constructs a range, rejecting a zero step.
    ///
    /// # Errors
    /// `RuntimeError::RangeStepZero` when `step == 0`.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::range::Range;
    ///
    /// let r = Range::new(0.0, 10.0, 2.0, 1).unwrap();
    /// assert_eq!(r.len(), 6);
    /// assert!(Range::new(0.0, 10.0, 0.0, 1).is_err());
    /// ```
    pub fn new(start: f64, end: f64, step: f64, line: usize) -> EvalResult<Self> {
        if step == 0.0 {
            return Err(RuntimeError::RangeStepZero { line });
        }
        Ok(Self { start, end, step })
    }

    /// The number of elements in the progression.
    ///
    /// An empty range (the step walks away from the end) has length zero.
    #[must_use]
    pub fn len(&self) -> usize {
        let span = (self.end - self.start) / self.step;
        if span < 0.0 || !span.is_finite() {
            return 0;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            (span + 1e-12).floor() as usize + 1
        }
    }

    /// Returns `true` when the progression contains no element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the element at `index`.
    ///
    /// # Errors
    /// `RuntimeError::IndexOutOfBounds` past the last element.
    pub fn at(&self, index: usize, line: usize) -> EvalResult<f64> {
        if index >= self.len() {
            return Err(RuntimeError::IndexOutOfBounds { max: self.len().saturating_sub(1),
                                                        found: index,
                                                        line });
        }
        #[allow(clippy::cast_precision_loss)]
        Ok(self.start + self.step * index as f64)
    }

    /// Iterates over the elements of the progression.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        #[allow(clippy::cast_precision_loss)]
        (0..self.len()).map(move |i| self.start + self.step * i as f64)
    }

    /// Expands the progression into a single-row matrix.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::range::Range;
    ///
    /// let m = Range::new(1.0, 3.0, 1.0, 1).unwrap().to_matrix();
    /// assert_eq!(m.cols, 3);
    /// ```
    #[must_use]
    pub fn to_matrix(&self) -> Matrix {
        Matrix::row(self.values().map(Scalar::real).collect())
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 1.0 {
            write!(f, "{}:{}", self.start, self.end)
        } else {
            write!(f, "{}:{}:{}", self.start, self.step, self.end)
        }
    }
}
