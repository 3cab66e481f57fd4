use crate::{
    ast::{AssignTarget, Expr, Position, Special},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Bindings, Context, EvalResult},
        value::{core::Value, matrix::Matrix},
    },
    util::num::f64_to_index,
};

/// One resolved index argument: a concrete position or the whole axis.
#[derive(Clone, Copy)]
enum IndexArg {
    At(usize),
    All,
}

impl Context {
    /// Evaluates an assignment.
    ///
    /// The three target forms:
    /// - a plain symbol updates the overlay when the name is bound there,
    ///   else the nearest scope already holding the name, else creates the
    ///   variable in the current scope;
    /// - an indexed target writes one cell of a matrix variable in place;
    /// - a parenthesized symbol list unpacks an argument-list result
    ///   positionally (truncating to the shorter side) and broadcasts any
    ///   other value to every name.
    ///
    /// The assignment yields the assigned value, so `a = b = 1` chains.
    ///
    /// # Errors
    /// `ConstantImmutable` for registered constants, plus index and kind
    /// errors for the indexed form.
    pub(crate) fn eval_assign(&mut self,
                              target: &AssignTarget,
                              value_expr: &Expr,
                              pos: Position,
                              bindings: &mut Bindings)
                              -> EvalResult<Option<Value>> {
        let line = pos.line;
        let value = self.eval_child(value_expr, bindings, line)?;

        match target {
            AssignTarget::Symbol { name, .. } => {
                self.assign_symbol(name, value.clone(), line, bindings)?;
            },
            AssignTarget::Index { name, indices, .. } => {
                self.assign_indexed(name, indices, &value, line, bindings)?;
            },
            AssignTarget::List { names, .. } => {
                self.assign_list(names, &value, line, bindings)?;
            },
        }

        Ok(Some(value))
    }

    /// The plain-symbol assignment rule.
    pub(crate) fn assign_symbol(&mut self,
                                name: &str,
                                value: Value,
                                line: usize,
                                bindings: &mut Bindings)
                                -> EvalResult<()> {
        if self.lookup_constant(self.current_scope(), name).is_some() {
            return Err(RuntimeError::ConstantImmutable { name: name.to_string(),
                                                         line });
        }

        if bindings.contains_key(name) {
            bindings.insert(name.to_string(), value);
            return Ok(());
        }

        let scope = self.scope_holding_variable(self.current_scope(), name)
                        .unwrap_or(self.current_scope());
        self.assign_variable(scope, name, value);
        Ok(())
    }

    /// The index set-form: writes one scalar cell of a matrix variable.
    fn assign_indexed(&mut self,
                      name: &str,
                      indices: &[Expr],
                      value: &Value,
                      line: usize,
                      bindings: &mut Bindings)
                      -> EvalResult<()> {
        let cell = value.as_scalar(line)?;

        let mut resolved = Vec::with_capacity(indices.len());
        for index in indices {
            match self.eval_index_arg(index, line, bindings)? {
                IndexArg::At(position) => resolved.push(position),
                IndexArg::All => return Err(RuntimeError::SpecialMisplaced { line }),
            }
        }

        if self.lookup_constant(self.current_scope(), name).is_some() {
            return Err(RuntimeError::ConstantImmutable { name: name.to_string(),
                                                         line });
        }

        let slot = if bindings.contains_key(name) {
            bindings.get_mut(name)
        } else {
            let scope = self.scope_holding_variable(self.current_scope(), name)
                            .ok_or_else(|| RuntimeError::SymbolMissing { name: name.to_string(),
                                                                         line })?;
            self.scope_mut(scope).variables.get_mut(name)
        };
        let Some(slot) = slot else {
            return Err(RuntimeError::SymbolMissing { name: name.to_string(),
                                                     line });
        };

        match slot {
            Value::Matrix(matrix) => match resolved[..] {
                [index] => matrix.set_linear(index, cell, line),
                [row, col] => matrix.set(row, col, cell, line),
                _ => Err(RuntimeError::KindMismatch { expected: "one or two indices".to_string(),
                                                      found:    format!("{} indices",
                                                                        resolved.len()),
                                                      line, }),
            },
            other => Err(RuntimeError::KindMismatch { expected: "a matrix variable".to_string(),
                                                      found:    other.kind_name(),
                                                      line, }),
        }
    }

    /// The list form: positional unpacking with broadcast.
    fn assign_list(&mut self,
                   names: &[String],
                   value: &Value,
                   line: usize,
                   bindings: &mut Bindings)
                   -> EvalResult<()> {
        match value {
            Value::ArgumentList(results) => {
                // Truncate to the shorter of targets and results.
                for (name, result) in names.iter().zip(results.iter()) {
                    self.assign_symbol(name, result.clone(), line, bindings)?;
                }
            },
            single => {
                for name in names {
                    self.assign_symbol(name, single.clone(), line, bindings)?;
                }
            },
        }
        Ok(())
    }

    /// Evaluates one index argument, honoring the `:` placeholder.
    fn eval_index_arg(&mut self,
                      index: &Expr,
                      line: usize,
                      bindings: &mut Bindings)
                      -> EvalResult<IndexArg> {
        if let Expr::Special { token: Special::Colon, .. } = index {
            return Ok(IndexArg::All);
        }
        let value = self.eval_child(index, bindings, line)?;
        Ok(IndexArg::At(f64_to_index(value.as_real(line)?, line)?))
    }

    /// Evaluates an indexed read.
    ///
    /// Matrices accept one index (linear, vectors only), two indices, and
    /// the `:` placeholder for a whole row or column. Ranges and strings
    /// accept a single position.
    pub(crate) fn eval_index(&mut self,
                             base: &Expr,
                             indices: &[Expr],
                             pos: Position,
                             bindings: &mut Bindings)
                             -> EvalResult<Value> {
        let line = pos.line;
        let target = self.eval_child(base, bindings, line)?;

        let mut resolved = Vec::with_capacity(indices.len());
        for index in indices {
            resolved.push(self.eval_index_arg(index, line, bindings)?);
        }

        match &target {
            Value::Matrix(matrix) => Self::index_matrix(matrix, &resolved, line),
            Value::Range(range) => match resolved[..] {
                [IndexArg::At(index)] => Ok(Value::Scalar(range.at(index, line)?.into())),
                [IndexArg::All] => Ok(Value::Matrix(range.to_matrix())),
                _ => Err(RuntimeError::KindMismatch { expected: "a single index".to_string(),
                                                      found:    format!("{} indices",
                                                                        resolved.len()),
                                                      line, }),
            },
            Value::Text(text) => match resolved[..] {
                [IndexArg::At(index)] => {
                    text.chars()
                        .nth(index)
                        .map(|c| Value::Text(c.to_string()))
                        .ok_or(RuntimeError::IndexOutOfBounds { max: text.chars()
                                                                         .count()
                                                                         .saturating_sub(1),
                                                                found: index,
                                                                line })
                },
                _ => Err(RuntimeError::KindMismatch { expected: "a single index".to_string(),
                                                      found:    format!("{} indices",
                                                                        resolved.len()),
                                                      line, }),
            },
            other => Err(RuntimeError::KindMismatch { expected: "an indexable value".to_string(),
                                                      found:    other.kind_name(),
                                                      line, }),
        }
    }

    fn index_matrix(matrix: &Matrix, resolved: &[IndexArg], line: usize) -> EvalResult<Value> {
        match resolved {
            [IndexArg::At(index)] => Ok(Value::Scalar(matrix.get_linear(*index, line)?)),
            [IndexArg::All] => {
                // Flatten into a column, row by row.
                let cells = matrix.cells.clone();
                Ok(Value::Matrix(Matrix { rows: cells.len(),
                                          cols: 1,
                                          cells }))
            },
            [IndexArg::At(row), IndexArg::At(col)] => {
                Ok(Value::Scalar(matrix.get(*row, *col, line)?))
            },
            [IndexArg::All, IndexArg::At(col)] => Ok(Value::Matrix(matrix.col_at(*col, line)?)),
            [IndexArg::At(row), IndexArg::All] => Ok(Value::Matrix(matrix.row_at(*row, line)?)),
            [IndexArg::All, IndexArg::All] => Ok(Value::Matrix(matrix.clone())),
            _ => Err(RuntimeError::KindMismatch { expected: "one or two indices".to_string(),
                                                  found:    format!("{} indices", resolved.len()),
                                                  line, }),
        }
    }
}
