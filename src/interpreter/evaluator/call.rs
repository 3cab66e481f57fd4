use std::{collections::HashSet, rc::Rc};

use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Bindings, Context, EvalResult},
            scope::ScopeId,
        },
        value::{
            core::Value,
            function::{FunctionValue, LambdaValue},
        },
    },
};

impl Context {
    /// Evaluates a function call.
    ///
    /// Arguments are evaluated first; an argument that produces an argument
    /// list is spliced into the call positionally. The callee resolves in
    /// the same order as any symbol: a binding or variable holding a
    /// function value wins over a registered function of the same name, and
    /// a file-backed function is the last resort.
    ///
    /// # Errors
    /// - `NotCallable` when the name resolves to a non-function value.
    /// - `FunctionMissing` when nothing resolves.
    /// - `ArgumentCount` and anything the invoked body raises.
    pub(crate) fn eval_call(&mut self,
                            name: &str,
                            args: &[Expr],
                            pos: Position,
                            bindings: &mut Bindings)
                            -> EvalResult<Value> {
        let line = pos.line;

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            match self.eval_child(arg, bindings, line)? {
                Value::ArgumentList(results) => values.extend(results),
                value => values.push(value),
            }
        }

        let bound = bindings.get(name)
                            .or_else(|| self.lookup_variable(self.current_scope(), name))
                            .cloned();
        if let Some(value) = bound {
            let Value::Function(function) = value else {
                return Err(RuntimeError::NotCallable { name: name.to_string(),
                                                       line });
            };
            return self.invoke(&function, values, line);
        }

        if let Some(function) = self.lookup_function(self.current_scope(), name) {
            let function = Rc::clone(function);
            return self.invoke(&function, values, line);
        }

        if let Some(function) = self.load_script_function(name, line)? {
            return self.invoke(&function, values, line);
        }

        Err(RuntimeError::FunctionMissing { name: name.to_string(),
                                            line })
    }

    /// Invokes a resolved callable with already-evaluated arguments.
    ///
    /// User functions run in a fresh child of their defining scope, lambdas
    /// in a fresh child of their captured scope. Parameters become frame
    /// variables; the body must produce a value.
    pub(crate) fn invoke(&mut self,
                         function: &Rc<FunctionValue>,
                         args: Vec<Value>,
                         line: usize)
                         -> EvalResult<Value> {
        match function.as_ref() {
            FunctionValue::Builtin(builtin) => {
                if !builtin.arity.check(args.len()) {
                    return Err(RuntimeError::ArgumentCount { name:     builtin.name
                                                                              .to_string(),
                                                             expected: builtin.arity.describe(),
                                                             found:    args.len(),
                                                             line, });
                }
                (builtin.implementation)(self, &args, line)
            },
            FunctionValue::User(def) => {
                if args.len() != def.params.len() {
                    return Err(RuntimeError::ArgumentCount { name:     def.name.clone(),
                                                             expected: def.params
                                                                          .len()
                                                                          .to_string(),
                                                             found:    args.len(),
                                                             line, });
                }
                self.run_body(def.scope, &def.params, args, &def.body, line)
            },
            FunctionValue::Lambda(lambda) => {
                if args.len() != lambda.params.len() {
                    return Err(RuntimeError::ArgumentCount { name:     "<lambda>".to_string(),
                                                             expected: lambda.params
                                                                             .len()
                                                                             .to_string(),
                                                             found:    args.len(),
                                                             line, });
                }
                self.run_body(lambda.captured, &lambda.params, args, &lambda.body, line)
            },
        }
    }

    /// Runs a function body in a fresh frame below `parent`.
    fn run_body(&mut self,
                parent: ScopeId,
                params: &[String],
                args: Vec<Value>,
                body: &Expr,
                line: usize)
                -> EvalResult<Value> {
        let (frame, previous) = self.enter_frame(parent);
        for (param, arg) in params.iter().zip(args) {
            self.assign_variable(frame, param, arg);
        }

        let result = self.eval(body, &mut Bindings::new());
        self.leave_frame(previous, frame);

        result?.ok_or(RuntimeError::MissingValue { line })
    }

    /// Evaluates a lambda expression into a function value.
    ///
    /// The free variables of the body are computed structurally, and the
    /// current scope is captured by reference: the lambda sees later
    /// mutations of captured variables, it does not snapshot them.
    pub(crate) fn eval_lambda(&mut self,
                              params: &[String],
                              body: &Expr,
                              _pos: Position)
                              -> EvalResult<Value> {
        let mut bound: HashSet<String> = params.iter().cloned().collect();
        let mut free = HashSet::new();
        body.collect_symbols(&mut bound, &mut free);

        let mut free: Vec<String> = free.into_iter().collect();
        free.sort();

        let captured = self.current_scope();
        self.mark_captured(captured);

        Ok(Value::Function(Rc::new(FunctionValue::Lambda(LambdaValue { params:
                                                                           params.to_vec(),
                                                                       body: body.clone(),
                                                                       captured,
                                                                       free }))))
    }
}
