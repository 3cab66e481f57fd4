use crate::interpreter::{
    dispatch::{scalar::flag, table::DispatchTable},
    evaluator::core::EvalResult,
    value::{
        core::{Value, ValueKind},
        range::Range,
    },
};

/// Installs the range entries.
///
/// `a:b` builds a unit-step range. A second `:` re-folds the pair: in
/// `a:s:b` the left side arrives as the range `a:s`, whose end becomes the
/// step and whose new end is `b`.
pub(crate) fn install(table: &mut DispatchTable) {
    use ValueKind::{Range as R, Scalar as S};

    table.register(":", R, S, refold);
    table.register("+", R, S, |a, b, line| shift(a, b, line, 1.0));
    table.register("-", R, S, |a, b, line| shift(a, b, line, -1.0));
    table.register("==", R, R, |a, b, _line| Ok(flag(a == b)));
    table.register("!=", R, R, |a, b, _line| Ok(flag(a != b)));
}

/// `(:, Scalar, Scalar)`: the two-part form `start:end` with step one.
pub(crate) fn build(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let start = a.as_real(line)?;
    let end = b.as_real(line)?;
    Ok(Value::Range(Range::new(start, end, 1.0, line)?))
}

/// `(:, Range, Scalar)`: re-folds `(start:step):end` into the three-part
/// form `start:step:end`.
fn refold(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let two_part = match a {
        Value::Range(r) => *r,
        other => {
            return Err(crate::error::RuntimeError::KindMismatch { expected:
                                                                      "a range".to_string(),
                                                                  found:    other.kind_name(),
                                                                  line, });
        },
    };
    let end = b.as_real(line)?;
    Ok(Value::Range(Range::new(two_part.start, end, two_part.end, line)?))
}

/// Shifts every element of a range by a real offset.
fn shift(a: &Value, b: &Value, line: usize, sign: f64) -> EvalResult<Value> {
    let range = match a {
        Value::Range(r) => *r,
        other => {
            return Err(crate::error::RuntimeError::KindMismatch { expected:
                                                                      "a range".to_string(),
                                                                  found:    other.kind_name(),
                                                                  line, });
        },
    };
    let offset = sign * b.as_real(line)?;
    Ok(Value::Range(Range::new(range.start + offset,
                               range.end + offset,
                               range.step,
                               line)?))
}
