use crate::{
    error::RuntimeError,
    interpreter::{
        dispatch::table::DispatchTable,
        evaluator::core::EvalResult,
        value::{
            core::{Value, ValueKind},
            scalar::Scalar,
        },
    },
};

/// Installs the scalar/scalar entries: arithmetic, power and comparison.
pub(crate) fn install(table: &mut DispatchTable) {
    use ValueKind::Scalar as S;

    table.register("+", S, S, add);
    table.register("-", S, S, sub);
    table.register("*", S, S, mul);
    table.register("/", S, S, div);
    table.register("^", S, S, pow);
    table.register(":", S, S, super::range::build);

    table.register("==", S, S, |a, b, line| {
             Ok(flag(a.as_scalar(line)? == b.as_scalar(line)?))
         });
    table.register("!=", S, S, |a, b, line| {
             Ok(flag(a.as_scalar(line)? != b.as_scalar(line)?))
         });
    table.register("<", S, S, |a, b, line| {
             Ok(flag(a.as_real(line)? < b.as_real(line)?))
         });
    table.register(">", S, S, |a, b, line| {
             Ok(flag(a.as_real(line)? > b.as_real(line)?))
         });
    table.register("<=", S, S, |a, b, line| {
             Ok(flag(a.as_real(line)? <= b.as_real(line)?))
         });
    table.register(">=", S, S, |a, b, line| {
             Ok(flag(a.as_real(line)? >= b.as_real(line)?))
         });
}

/// A comparison result: scalar `1` or `0`.
pub(crate) fn flag(condition: bool) -> Value {
    Value::Scalar(Scalar::real(if condition { 1.0 } else { 0.0 }))
}

fn add(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(a.as_scalar(line)? + b.as_scalar(line)?))
}

fn sub(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(a.as_scalar(line)? - b.as_scalar(line)?))
}

fn mul(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(a.as_scalar(line)? * b.as_scalar(line)?))
}

fn div(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let divisor = b.as_scalar(line)?;
    if divisor.is_zero() {
        return Err(RuntimeError::DivisionByZero { line });
    }
    Ok(Value::Scalar(a.as_scalar(line)? / divisor))
}

/// Scalar power: an integral real exponent uses the checked
/// squaring path, everything else goes through `exp(w · ln z)`.
fn pow(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let base = a.as_scalar(line)?;
    let exp = b.as_scalar(line)?;

    if exp.is_real() && exp.re.fract() == 0.0 && exp.re.abs() <= 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        return Ok(Value::Scalar(base.checked_powi(exp.re as i64, line)?));
    }

    Ok(Value::Scalar(base.powc(exp)))
}
