use crate::{
    error::RuntimeError,
    interpreter::{
        dispatch::{scalar::flag, table::DispatchTable},
        evaluator::core::EvalResult,
        value::{
            core::{Value, ValueKind},
            matrix::Matrix,
            scalar::Scalar,
        },
    },
};

/// Installs matrix/matrix and scalar/matrix entries.
pub(crate) fn install(table: &mut DispatchTable) {
    use ValueKind::{Matrix as M, Scalar as S};

    table.register("+", M, M, |a, b, line| {
             zip(a, b, line, |x, y| x + y)
         });
    table.register("-", M, M, |a, b, line| {
             zip(a, b, line, |x, y| x - y)
         });
    table.register("*", M, M, matmul);

    table.register("+", M, S, |a, b, line| broadcast(a, b, line, |x, s| x + s));
    table.register("+", S, M, |a, b, line| broadcast(b, a, line, |x, s| s + x));
    table.register("-", M, S, |a, b, line| broadcast(a, b, line, |x, s| x - s));
    table.register("-", S, M, |a, b, line| broadcast(b, a, line, |x, s| s - x));
    table.register("*", M, S, |a, b, line| broadcast(a, b, line, |x, s| x * s));
    table.register("*", S, M, |a, b, line| broadcast(b, a, line, |x, s| s * x));
    table.register("/", M, S, div_scalar);
    table.register("^", M, S, pow_scalar);

    table.register("==", M, M, |a, b, line| {
             Ok(flag(a.as_matrix(line)? == b.as_matrix(line)?))
         });
    table.register("!=", M, M, |a, b, line| {
             Ok(flag(a.as_matrix(line)? != b.as_matrix(line)?))
         });
}

/// Combines two matrices cell by cell, checking shapes.
fn zip(a: &Value,
       b: &Value,
       line: usize,
       f: impl Fn(Scalar, Scalar) -> Scalar)
       -> EvalResult<Value> {
    let left = a.as_matrix(line)?;
    let right = b.as_matrix(line)?;

    left.zip_map(right, f)
        .map(Value::Matrix)
        .ok_or(RuntimeError::DimensionMismatch { left:  (left.rows, left.cols),
                                                 right: (right.rows, right.cols),
                                                 line, })
}

/// Applies `f(cell, scalar)` to every cell.
fn broadcast(matrix: &Value,
             scalar: &Value,
             line: usize,
             f: impl Fn(Scalar, Scalar) -> Scalar)
             -> EvalResult<Value> {
    let m = matrix.as_matrix(line)?;
    let s = scalar.as_scalar(line)?;
    Ok(Value::Matrix(m.map(|cell| f(cell, s))))
}

/// The matrix product. Inner dimensions must agree.
fn matmul(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let left = a.as_matrix(line)?;
    let right = b.as_matrix(line)?;

    left.matmul(right)
        .map(Value::Matrix)
        .ok_or(RuntimeError::DimensionMismatch { left:  (left.rows, left.cols),
                                                 right: (right.rows, right.cols),
                                                 line, })
}

fn div_scalar(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let divisor = b.as_scalar(line)?;
    if divisor.is_zero() {
        return Err(RuntimeError::DivisionByZero { line });
    }
    let m = a.as_matrix(line)?;
    Ok(Value::Matrix(m.map(|cell| cell / divisor)))
}

/// Matrix power: a non-negative integral exponent on a square matrix,
/// computed by repeated products.
fn pow_scalar(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let base = a.as_matrix(line)?;
    let exp = b.as_real(line)?;

    if base.rows != base.cols {
        return Err(RuntimeError::DimensionMismatch { left:  (base.rows, base.cols),
                                                     right: (base.rows, base.cols),
                                                     line, });
    }
    if exp < 0.0 || exp.fract() != 0.0 {
        return Err(RuntimeError::KindMismatch { expected:
                                                    "a non-negative integer exponent".to_string(),
                                                found:    format!("{exp}"),
                                                line, });
    }

    let mut result = identity(base.rows);
    let mut remaining = exp;
    while remaining >= 1.0 {
        result = result.matmul(base)
                       .ok_or(RuntimeError::DimensionMismatch { left:  (base.rows, base.cols),
                                                                right: (base.rows, base.cols),
                                                                line, })?;
        remaining -= 1.0;
    }

    Ok(Value::Matrix(result))
}

fn identity(n: usize) -> Matrix {
    let mut m = Matrix::zeros(n, n);
    for i in 0..n {
        m.cells[i * n + i] = Scalar::real(1.0);
    }
    m
}
