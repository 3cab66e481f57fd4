use crate::{
    interpreter::{
        dispatch::table::DispatchTable,
        evaluator::core::EvalResult,
        value::core::{Value, ValueKind},
    },
    util::num::f64_to_index,
};

/// Installs the string entries: concatenation with strings and with the
/// displayable kinds, and repetition by a count.
///
/// String equality and ordering are not registered here; the evaluator
/// special-cases two text operands before consulting the table.
pub(crate) fn install(table: &mut DispatchTable) {
    use ValueKind::{Scalar as S, Text as T};

    table.register("+", T, T, |a, b, line| {
             Ok(Value::Text(format!("{}{}", a.as_text(line)?, b.as_text(line)?)))
         });
    for kind in [S, ValueKind::Matrix, ValueKind::Range] {
        table.register("+", T, kind, |a, b, line| {
                 Ok(Value::Text(format!("{}{b}", a.as_text(line)?)))
             });
        table.register("+", kind, T, |a, b, line| {
                 Ok(Value::Text(format!("{a}{}", b.as_text(line)?)))
             });
    }
    table.register("*", T, S, repeat);
}

fn repeat(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    let text = a.as_text(line)?;
    let count = f64_to_index(b.as_real(line)?, line)?;
    Ok(Value::Text(text.repeat(count)))
}
