use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

/// Largest argument for which `n!` is finite in `f64` arithmetic.
pub const MAX_FACTORIAL_ARG: f64 = 170.0;

/// Converts a scalar's real part into a cell index.
///
/// The value must be finite, non-negative and integral. Fractional or
/// negative values are rejected rather than truncated, so `m[1.5]` is an
/// error and never a silent read of `m[1]`.
///
/// # Errors
/// Returns `RuntimeError::IndexNotInteger` when the value cannot serve as an
/// index.
///
/// # Example
/// ```
/// use matrica::util::num::f64_to_index;
///
/// assert_eq!(f64_to_index(3.0, 1).unwrap(), 3);
/// assert!(f64_to_index(1.5, 1).is_err());
/// assert!(f64_to_index(-2.0, 1).is_err());
/// ```
pub fn f64_to_index(value: f64, line: usize) -> EvalResult<usize> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > MAX_SAFE_INT {
        return Err(RuntimeError::IndexNotInteger { line });
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(value as usize)
}

/// Computes `n!` for a non-negative integral argument.
///
/// The factorial is accumulated in `f64`; arguments above
/// [`MAX_FACTORIAL_ARG`] overflow to infinity and are reported as such
/// instead of being returned.
///
/// # Errors
/// - `RuntimeError::IndexNotInteger` for fractional or negative arguments.
/// - `RuntimeError::Overflow` for arguments above [`MAX_FACTORIAL_ARG`].
///
/// # Example
/// ```
/// use matrica::util::num::checked_factorial;
///
/// assert_eq!(checked_factorial(0.0, 1).unwrap(), 1.0);
/// assert_eq!(checked_factorial(5.0, 1).unwrap(), 120.0);
/// assert!(checked_factorial(200.0, 1).is_err());
/// ```
pub fn checked_factorial(value: f64, line: usize) -> EvalResult<f64> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(RuntimeError::IndexNotInteger { line });
    }
    if value > MAX_FACTORIAL_ARG {
        return Err(RuntimeError::Overflow { line });
    }

    let mut acc = 1.0;
    let mut n = 2.0;
    while n <= value {
        acc *= n;
        n += 1.0;
    }

    Ok(acc)
}
