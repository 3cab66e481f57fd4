use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Bindings, Context, EvalResult},
        value::{core::Value, scalar::Scalar},
    },
    util::num::checked_factorial,
};

impl Context {
    /// Evaluates a unary operator application.
    ///
    /// `-` and `+` accept scalars and matrices (applied cell by cell),
    /// postfix `!` is the factorial of a non-negative integral real.
    ///
    /// # Errors
    /// `RuntimeError::KindMismatch` for unsupported operand kinds and
    /// unknown unary symbols.
    pub(crate) fn eval_unary(&mut self,
                             symbol: &str,
                             operand: &Expr,
                             pos: Position,
                             bindings: &mut Bindings)
                             -> EvalResult<Value> {
        let line = pos.line;
        let value = self.eval_child(operand, bindings, line)?;

        match symbol {
            "-" => match value {
                Value::Scalar(s) => Ok(Value::Scalar(-s)),
                Value::Matrix(m) => Ok(Value::Matrix(m.map(|cell| -cell))),
                other => Err(RuntimeError::KindMismatch { expected:
                                                              "a scalar or matrix".to_string(),
                                                          found:    other.kind_name(),
                                                          line, }),
            },
            "+" => match value {
                Value::Scalar(_) | Value::Matrix(_) => Ok(value),
                other => Err(RuntimeError::KindMismatch { expected:
                                                              "a scalar or matrix".to_string(),
                                                          found:    other.kind_name(),
                                                          line, }),
            },
            "!" => {
                let n = value.as_real(line)?;
                Ok(Value::Scalar(Scalar::real(checked_factorial(n, line)?)))
            },
            other => Err(RuntimeError::KindMismatch { expected:
                                                          "a supported unary operator".to_string(),
                                                      found:    format!("'{other}'"),
                                                      line, }),
        }
    }
}
