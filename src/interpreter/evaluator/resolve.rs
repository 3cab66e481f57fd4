use std::rc::Rc;

use crate::{
    ast::Position,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Bindings, Context, EvalResult},
        value::{core::Value, function::FunctionValue},
    },
};

impl Context {
    /// Resolves a symbol reference.
    ///
    /// The chain is a fixed sequence of fallible lookups with early return:
    ///
    /// 1. the caller-supplied binding overlay,
    /// 2. variables along the scope chain,
    /// 3. constants along the scope chain,
    /// 4. functions along the scope chain, wrapped as a callable value,
    /// 5. a file-backed function `<name>.mca` in the script directory,
    /// 6. failure with `SymbolMissing`.
    ///
    /// File-backed functions are looked up through the loader every time so
    /// its timestamp check stays in charge of cache invalidation; they are
    /// never copied into a scope.
    ///
    /// # Errors
    /// `RuntimeError::SymbolMissing` when the chain is exhausted, or a
    /// loader error when a script file exists but cannot be used.
    pub(crate) fn eval_symbol(&mut self,
                              name: &str,
                              pos: Position,
                              bindings: &mut Bindings)
                              -> EvalResult<Value> {
        if let Some(value) = bindings.get(name) {
            return Ok(value.clone());
        }

        if let Some(value) = self.lookup_variable(self.current_scope(), name) {
            return Ok(value.clone());
        }

        if let Some(value) = self.lookup_constant(self.current_scope(), name) {
            return Ok(value.clone());
        }

        if let Some(function) = self.lookup_function(self.current_scope(), name) {
            return Ok(Value::Function(Rc::clone(function)));
        }

        if let Some(function) = self.load_script_function(name, pos.line)? {
            return Ok(Value::Function(function));
        }

        Err(RuntimeError::SymbolMissing { name: name.to_string(),
                                          line: pos.line, })
    }

    /// Attempts the file-backed tail of the resolution chain.
    pub(crate) fn load_script_function(&mut self,
                                       name: &str,
                                       line: usize)
                                       -> EvalResult<Option<Rc<FunctionValue>>> {
        let table = self.operators.clone();
        let root = self.root();
        self.loader_mut().load(name, &table, root, line)
    }
}
