use crate::{
    ast::{Expr, Position},
    interpreter::evaluator::core::{Bindings, Context, EvalResult},
    interpreter::value::core::Value,
};

impl Context {
    /// Evaluates `if`/`else`. The untaken side is never evaluated; an `if`
    /// without `else` whose condition is false yields nothing.
    pub(crate) fn eval_if(&mut self,
                          condition: &Expr,
                          then_branch: &Expr,
                          else_branch: Option<&Expr>,
                          pos: Position,
                          bindings: &mut Bindings)
                          -> EvalResult<Option<Value>> {
        let line = pos.line;
        let chosen = self.eval_child(condition, bindings, line)?.is_true(line)?;

        if chosen {
            self.eval(then_branch, bindings)
        } else if let Some(branch) = else_branch {
            self.eval(branch, bindings)
        } else {
            Ok(None)
        }
    }

    /// Evaluates `while`. Yields the last value the body produced.
    pub(crate) fn eval_while(&mut self,
                             condition: &Expr,
                             body: &Expr,
                             pos: Position,
                             bindings: &mut Bindings)
                             -> EvalResult<Option<Value>> {
        let line = pos.line;
        let mut last = None;

        loop {
            if !self.eval_child(condition, bindings, line)?.is_true(line)? {
                break;
            }
            if let Some(value) = self.eval(body, bindings)? {
                last = Some(value);
            }
        }

        Ok(last)
    }

    /// Evaluates `do … while`: the body runs once before the first test.
    pub(crate) fn eval_do_while(&mut self,
                                body: &Expr,
                                condition: &Expr,
                                pos: Position,
                                bindings: &mut Bindings)
                                -> EvalResult<Option<Value>> {
        let line = pos.line;
        let mut last = None;

        loop {
            if let Some(value) = self.eval(body, bindings)? {
                last = Some(value);
            }
            if !self.eval_child(condition, bindings, line)?.is_true(line)? {
                break;
            }
        }

        Ok(last)
    }

    /// Evaluates a C-style `for`. An empty condition slot counts as true.
    pub(crate) fn eval_for(&mut self,
                           init: &Expr,
                           condition: &Expr,
                           step: &Expr,
                           body: &Expr,
                           pos: Position,
                           bindings: &mut Bindings)
                           -> EvalResult<Option<Value>> {
        let line = pos.line;
        let mut last = None;

        self.eval(init, bindings)?;

        loop {
            let keep_going = match condition {
                Expr::Empty { .. } => true,
                expr => self.eval_child(expr, bindings, line)?.is_true(line)?,
            };
            if !keep_going {
                break;
            }

            if let Some(value) = self.eval(body, bindings)? {
                last = Some(value);
            }

            self.eval(step, bindings)?;
        }

        Ok(last)
    }

    /// Evaluates a `{ … }` block in a fresh child scope.
    ///
    /// Assignments to names that already exist outside the block update
    /// them in place; names first assigned inside the block end with it.
    /// The block yields the last value any statement produced.
    pub(crate) fn eval_block(&mut self,
                             statements: &[Expr],
                             bindings: &mut Bindings)
                             -> EvalResult<Option<Value>> {
        let (frame, previous) = self.enter_frame(self.current_scope());

        let mut result = Ok(None);
        for statement in statements {
            match self.eval(statement, bindings) {
                Ok(Some(value)) => {
                    if let Ok(last) = result.as_mut() {
                        *last = Some(value);
                    }
                },
                Ok(None) => {},
                Err(error) => {
                    result = Err(error);
                    break;
                },
            }
        }

        self.leave_frame(previous, frame);
        result
    }
}
