use std::{fmt::Display, ops};

use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// `0` as a scalar.
pub const ZERO: Scalar = Scalar::new(0.0, 0.0);
/// `1` as a scalar.
pub const ONE: Scalar = Scalar::new(1.0, 0.0);
/// The imaginary unit.
pub const I: Scalar = Scalar::new(0.0, 1.0);

/// The numeric scalar kind: a complex number with real and imaginary parts.
///
/// Every numeric literal produces a `Scalar`; `123` and `1.5` have a zero
/// imaginary part, `2i` a zero real part. Comparisons yield `1` or `0` as
/// scalars, and conditions treat any nonzero scalar as true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scalar {
    /// The real part.
    pub re: f64,
    /// The imaginary part.
    pub im: f64,
}

impl Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.re, self.im) {
            (0.0, 0.0) => write!(f, "0"),
            (re, 0.0) => write!(f, "{re}"),
            (0.0, im) => write!(f, "{im}i"),
            (re, im) if im > 0.0 => write!(f, "{re} + {im}i"),
            (re, im) => write!(f, "{re} - {}i", -im),
        }
    }
}

impl Scalar {
    /// Constructs a new scalar from real and imaginary components.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::scalar::Scalar;
    /// let s = Scalar::new(5.0, -1.0);
    /// assert_eq!(s.re, 5.0);
    /// assert_eq!(s.im, -1.0);
    /// ```
    #[must_use]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Constructs a purely real scalar.
    #[must_use]
    pub const fn real(re: f64) -> Self {
        Self { re, im: 0.0 }
    }

    /// Returns `true` when both components are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }

    /// Returns `true` when the imaginary part is zero.
    #[must_use]
    pub fn is_real(&self) -> bool {
        self.im == 0.0
    }

    /// Converts to `f64`, or reports an error for a non-real scalar.
    ///
    /// # Errors
    /// Returns `RuntimeError::KindMismatch` when the imaginary part is
    /// nonzero.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::scalar::Scalar;
    ///
    /// assert_eq!(Scalar::real(2.5).as_real(1).unwrap(), 2.5);
    /// assert!(Scalar::new(0.0, 1.0).as_real(1).is_err());
    /// ```
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        if self.is_real() {
            Ok(self.re)
        } else {
            Err(RuntimeError::KindMismatch { expected: "a real scalar".to_string(),
                                             found:    format!("the complex scalar {self}"),
                                             line, })
        }
    }

    /// Returns the magnitude of the scalar.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::scalar::Scalar;
    /// assert_eq!(Scalar::new(3.0, 4.0).abs(), 5.0);
    /// ```
    #[must_use]
    pub fn abs(&self) -> f64 {
        self.re.hypot(self.im)
    }

    /// Returns the complex conjugate.
    #[must_use]
    pub const fn conj(&self) -> Self {
        Self { re: self.re,
               im: -self.im, }
    }

    /// Returns the reciprocal `1/z`.
    #[must_use]
    pub const fn recip(&self) -> Self {
        let norm = self.re * self.re + self.im * self.im;

        Self { re: self.re / norm,
               im: -(self.im / norm), }
    }

    /// Returns the argument (phase angle) in radians.
    #[must_use]
    pub fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Returns the principal square root.
    ///
    /// Negative real scalars yield a purely imaginary root.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::scalar::Scalar;
    ///
    /// let r = Scalar::real(-4.0).sqrt();
    /// assert!(r.re.abs() < 1e-12);
    /// assert!((r.im - 2.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn sqrt(self) -> Self {
        if self.im == 0.0 {
            if self.re >= 0.0 {
                return Self::real(self.re.sqrt());
            }
            return Self::new(0.0, (-self.re).sqrt());
        }

        let magnitude = self.abs().sqrt();
        let angle = self.arg() / 2.0;
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    /// Raises the scalar to an integer power.
    ///
    /// Uses multiplication by squaring with overflow and division-by-zero
    /// checks.
    ///
    /// # Errors
    /// - `RuntimeError::DivisionByZero` for `0` raised to a negative power.
    /// - `RuntimeError::Overflow` when an intermediate value leaves the
    ///   finite range.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::scalar::Scalar;
    ///
    /// let two = Scalar::real(2.0);
    /// assert_eq!(two.checked_powi(10, 0).unwrap(), Scalar::real(1024.0));
    /// ```
    pub fn checked_powi(self, exp: i64, line: usize) -> EvalResult<Self> {
        if exp == 0 {
            return Ok(ONE);
        }

        if self.is_zero() && exp < 0 {
            return Err(RuntimeError::DivisionByZero { line });
        }

        let mut base = self;
        let mut result = ONE;
        let mut n = exp.abs();

        while n > 0 {
            if n % 2 == 1 {
                result = result * base;
                if !result.re.is_finite() || !result.im.is_finite() {
                    return Err(RuntimeError::Overflow { line });
                }
            }
            base = base * base;
            if !base.re.is_finite() || !base.im.is_finite() {
                return Err(RuntimeError::Overflow { line });
            }
            n /= 2;
        }

        if exp < 0 {
            result = result.recip();
            if !result.re.is_finite() || !result.im.is_finite() {
                return Err(RuntimeError::Overflow { line });
            }
        }

        Ok(result)
    }

    /// Raises the scalar to an arbitrary complex power via `exp(w · ln z)`.
    ///
    /// # Example
    /// ```
    /// use matrica::interpreter::value::scalar::Scalar;
    ///
    /// let r = Scalar::real(4.0).powc(Scalar::real(0.5));
    /// assert!((r.re - 2.0).abs() < 1e-12);
    /// assert!(r.im.abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn powc(self, exp: Self) -> Self {
        if self.is_zero() {
            return if exp.is_zero() { ONE } else { ZERO };
        }

        let ln_r = self.abs().ln();
        let theta = self.arg();

        // w * ln(z) with ln(z) = ln|z| + i·arg(z)
        let re = exp.re * ln_r - exp.im * theta;
        let im = exp.re * theta + exp.im * ln_r;

        let scale = re.exp();
        Self::new(scale * im.cos(), scale * im.sin())
    }
}

impl From<f64> for Scalar {
    fn from(re: f64) -> Self {
        Self::real(re)
    }
}

impl ops::Add for Scalar {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl ops::Sub for Scalar {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl ops::Mul for Scalar {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.re * rhs.re - self.im * rhs.im,
                  self.re * rhs.im + self.im * rhs.re)
    }
}

impl ops::Div for Scalar {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        self * rhs.recip()
    }
}

impl ops::Neg for Scalar {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.re, -self.im)
    }
}

impl ops::AddAssign for Scalar {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl ops::MulAssign for Scalar {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
