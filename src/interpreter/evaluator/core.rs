use std::{collections::HashMap, path::PathBuf, rc::Rc};

use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        dispatch::{scalar::flag, table::{DispatchTable, ExtensionId}},
        evaluator::{
            loader::ScriptLoader,
            scope::{Scope, ScopeId},
        },
        operators::OperatorTable,
        registry,
        session::{Host, SilentHost},
        value::{
            core::{Value, ValueKind},
            function::{FunctionDefinition, FunctionValue},
            matrix::Matrix,
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The caller-supplied local binding overlay.
///
/// The overlay is consulted before the scope chain during symbol
/// resolution, and assignments land in it when the name is already bound
/// there. Embedding hosts use it to feed values into an evaluation and
/// read updates back out.
pub type Bindings = HashMap<String, Value>;

/// The runtime evaluation context.
///
/// A context owns the scope arena, the operator dispatch registry, the
/// operator table consulted during parsing, the file-backed function
/// loader, and the host callback hook. There is no process-wide default
/// context: every entry point takes one explicitly, and a fresh root is a
/// plain constructor call.
pub struct Context {
    scopes:  Vec<Scope>,
    current: ScopeId,
    /// The `(operator, kind, kind)` dispatch registry.
    pub dispatch:  DispatchTable,
    /// The operator and keyword table consulted when parsing.
    pub operators: OperatorTable,
    loader:  ScriptLoader,
    host:    Rc<dyn Host>,
    extension_members: HashMap<ExtensionId, Vec<(ScopeId, String, bool)>>,
    next_kind_tag: u16,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates a fresh root context with the default operator table, the
    /// default dispatch entries, and every registered builtin and constant
    /// installed.
    #[must_use]
    pub fn new() -> Self {
        let mut context =
            Self { scopes:            vec![Scope::default()],
                   current:           ScopeId(0),
                   dispatch:          DispatchTable::with_defaults(),
                   operators:         OperatorTable::with_defaults(),
                   loader:            ScriptLoader::new(std::env::current_dir().unwrap_or_else(|_| {
                                                            PathBuf::from(".")
                                                        })),
                   host:              Rc::new(SilentHost),
                   extension_members: HashMap::new(),
                   next_kind_tag:     0, };

        registry::install(&mut context);
        context
    }

    /// The root scope of the context.
    #[must_use]
    pub const fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// The scope the evaluator currently runs in.
    #[must_use]
    pub const fn current_scope(&self) -> ScopeId {
        self.current
    }

    /// Creates a new scope whose lookups fall through to `parent`.
    pub fn child(&mut self, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::child_of(parent));
        ScopeId(self.scopes.len() - 1)
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    /// Marks a scope as captured by a lambda, pinning it in the arena.
    pub(crate) fn mark_captured(&mut self, id: ScopeId) {
        self.scopes[id.0].captured = true;
    }

    /// Enters a fresh call frame below `parent`. Returns the frame and the
    /// scope to restore on return.
    pub(crate) fn enter_frame(&mut self, parent: ScopeId) -> (ScopeId, ScopeId) {
        let frame = self.child(parent);
        let previous = self.current;
        self.current = frame;
        (frame, previous)
    }

    /// Leaves a call frame. An uncaptured frame at the arena tail is
    /// truncated; anything else is retained for the context's lifetime.
    pub(crate) fn leave_frame(&mut self, previous: ScopeId, frame: ScopeId) {
        self.current = previous;
        if frame.0 + 1 == self.scopes.len() && frame.0 > 0 && !self.scopes[frame.0].captured {
            self.scopes.pop();
        }
    }

    /// Creates or overwrites a variable in the addressed scope only.
    pub fn assign_variable(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scope_mut(scope)
            .variables
            .insert(name.to_string(), value);
    }

    /// Removes a variable from the addressed scope only.
    pub fn remove_variable(&mut self, scope: ScopeId, name: &str) -> bool {
        self.scope_mut(scope).variables.remove(name).is_some()
    }

    /// Registers a constant in the addressed scope only.
    pub fn add_constant(&mut self, scope: ScopeId, name: &str, value: Value) {
        self.scope_mut(scope)
            .constants
            .insert(name.to_string(), value);
    }

    /// Registers a function in the addressed scope only.
    pub fn add_function(&mut self, scope: ScopeId, name: &str, function: Rc<FunctionValue>) {
        self.scope_mut(scope)
            .functions
            .insert(name.to_string(), function);
    }

    /// Walks the parent chain for a variable.
    #[must_use]
    pub fn lookup_variable(&self, from: ScopeId, name: &str) -> Option<&Value> {
        let scope = self.scope_holding_variable(from, name)?;
        self.scope(scope).variables.get(name)
    }

    /// Finds the nearest scope in the chain that already holds `name`.
    pub(crate) fn scope_holding_variable(&self, from: ScopeId, name: &str) -> Option<ScopeId> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            if self.scope(id).variables.contains_key(name) {
                return Some(id);
            }
            cursor = self.scope(id).parent;
        }
        None
    }

    /// Walks the parent chain for a constant.
    #[must_use]
    pub fn lookup_constant(&self, from: ScopeId, name: &str) -> Option<&Value> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            if let Some(value) = self.scope(id).constants.get(name) {
                return Some(value);
            }
            cursor = self.scope(id).parent;
        }
        None
    }

    /// Walks the parent chain for a function.
    #[must_use]
    pub fn lookup_function(&self, from: ScopeId, name: &str) -> Option<&Rc<FunctionValue>> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            if let Some(function) = self.scope(id).functions.get(name) {
                return Some(function);
            }
            cursor = self.scope(id).parent;
        }
        None
    }

    /// Iterates over the functions registered directly in a scope.
    pub fn functions_in(&self,
                        scope: ScopeId)
                        -> impl Iterator<Item = (&String, &Rc<FunctionValue>)> {
        self.scope(scope).functions.iter()
    }

    /// Iterates over the constants registered directly in a scope.
    pub fn constants_in(&self, scope: ScopeId) -> impl Iterator<Item = (&String, &Value)> {
        self.scope(scope).constants.iter()
    }

    /// Replaces the host callback hook.
    pub fn set_host(&mut self, host: Rc<dyn Host>) {
        self.host = host;
    }

    /// The host callback hook.
    #[must_use]
    pub fn host(&self) -> Rc<dyn Host> {
        Rc::clone(&self.host)
    }

    /// Points the file-backed function loader at a directory.
    pub fn set_script_directory(&mut self, directory: PathBuf) {
        self.loader = ScriptLoader::new(directory);
    }

    pub(crate) fn loader_mut(&mut self) -> &mut ScriptLoader {
        &mut self.loader
    }

    /// Allocates an extension identifier for a batch of registrations.
    pub fn begin_extension(&mut self) -> ExtensionId {
        self.dispatch.begin_extension()
    }

    /// Allocates a fresh value-kind tag for an extension value kind.
    ///
    /// The tag is what dispatch entries key on; the extension wraps its
    /// payloads in [`Value::Object`] carrying the tag.
    pub fn allocate_kind(&mut self) -> ValueKind {
        self.next_kind_tag += 1;
        ValueKind::Extension(self.next_kind_tag)
    }

    /// Registers a function owned by an extension.
    pub fn add_extension_function(&mut self,
                                  owner: ExtensionId,
                                  scope: ScopeId,
                                  name: &str,
                                  function: Rc<FunctionValue>) {
        self.add_function(scope, name, function);
        self.extension_members
            .entry(owner)
            .or_default()
            .push((scope, name.to_string(), true));
    }

    /// Registers a constant owned by an extension.
    pub fn add_extension_constant(&mut self,
                                  owner: ExtensionId,
                                  scope: ScopeId,
                                  name: &str,
                                  value: Value) {
        self.add_constant(scope, name, value);
        self.extension_members
            .entry(owner)
            .or_default()
            .push((scope, name.to_string(), false));
    }

    /// Removes everything an extension registered: functions, constants and
    /// dispatch entries.
    pub fn unload_extension(&mut self, owner: ExtensionId) {
        if let Some(members) = self.extension_members.remove(&owner) {
            for (scope, name, is_function) in members {
                if is_function {
                    self.scope_mut(scope).functions.remove(&name);
                } else {
                    self.scope_mut(scope).constants.remove(&name);
                }
            }
        }
        self.dispatch.unregister(owner);
        log::debug!("unloaded extension registrations");
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. The
    /// evaluator dispatches on the node kind: literals, symbols, operator
    /// containers, matrix literals, calls, indexing, assignments, lambdas,
    /// keyword blocks. Nodes that define rather than produce (a function
    /// definition, the empty expression) yield `None`.
    ///
    /// # Errors
    /// Any `RuntimeError` raised while walking the tree.
    pub fn eval(&mut self, expr: &Expr, bindings: &mut Bindings) -> EvalResult<Option<Value>> {
        match expr {
            Expr::Number { value, .. } => Ok(Some(Value::Scalar(*value))),
            Expr::Str { value, .. } => Ok(Some(Value::Text(value.clone()))),
            Expr::Symbol { name, pos } => self.eval_symbol(name, *pos, bindings).map(Some),
            Expr::Special { pos, .. } => Err(RuntimeError::SpecialMisplaced { line: pos.line }),
            Expr::Container { op, items, pos } => {
                self.eval_container(op.as_deref(), items, *pos, bindings)
            },
            Expr::MatrixLiteral { rows, pos } => {
                self.eval_matrix_literal(rows, *pos, bindings).map(Some)
            },
            Expr::Call { name, args, pos } => {
                self.eval_call(name, args, *pos, bindings).map(Some)
            },
            Expr::Index { base, indices, pos } => {
                self.eval_index(base, indices, *pos, bindings).map(Some)
            },
            Expr::Assign { target, value, pos } => {
                self.eval_assign(target, value, *pos, bindings)
            },
            Expr::Lambda { params, body, pos } => {
                self.eval_lambda(params, body, *pos).map(Some)
            },
            Expr::If { condition,
                       then_branch,
                       else_branch,
                       pos, } => {
                self.eval_if(condition, then_branch, else_branch.as_deref(), *pos, bindings)
            },
            Expr::While { condition, body, pos } => {
                self.eval_while(condition, body, *pos, bindings)
            },
            Expr::DoWhile { body, condition, pos } => {
                self.eval_do_while(body, condition, *pos, bindings)
            },
            Expr::For { init,
                        condition,
                        step,
                        body,
                        pos, } => self.eval_for(init, condition, step, body, *pos, bindings),
            Expr::FunctionDef { name, params, body, .. } => {
                let definition = FunctionDefinition { name:   name.clone(),
                                                      params: params.clone(),
                                                      body:   (**body).clone(),
                                                      scope:  self.current, };
                self.add_function(self.current,
                                  name,
                                  Rc::new(FunctionValue::User(definition)));
                Ok(None)
            },
            Expr::Block { statements, .. } => self.eval_block(statements, bindings),
            Expr::Empty { .. } => Ok(None),
        }
    }

    /// Evaluates a subexpression and requires it to produce a value.
    ///
    /// Operator evaluation, call arguments and conditions all need the same
    /// sequence: evaluate, then report `MissingValue` when the expression
    /// yields nothing. This helper centralizes it.
    ///
    /// # Errors
    /// `RuntimeError::MissingValue` when the expression produces no value,
    /// plus anything the evaluation itself raises.
    pub fn eval_child(&mut self,
                      expr: &Expr,
                      bindings: &mut Bindings,
                      line: usize)
                      -> EvalResult<Value> {
        self.eval(expr, bindings)?
            .ok_or(RuntimeError::MissingValue { line })
    }

    /// Evaluates a container node.
    ///
    /// Without an operator the node is grouping: no child is nothing, one
    /// child degrades to that child's value, several children form an
    /// argument list. With an operator, one child is a unary application
    /// and two children dispatch through the operator registry.
    fn eval_container(&mut self,
                      op: Option<&str>,
                      items: &[Expr],
                      pos: Position,
                      bindings: &mut Bindings)
                      -> EvalResult<Option<Value>> {
        let line = pos.line;

        let Some(symbol) = op else {
            return match items {
                [] => Ok(None),
                [single] => self.eval(single, bindings),
                several => {
                    let mut values = Vec::with_capacity(several.len());
                    for item in several {
                        values.push(self.eval_child(item, bindings, line)?);
                    }
                    Ok(Some(Value::ArgumentList(values)))
                },
            };
        };

        match items {
            [operand] => self.eval_unary(symbol, operand, pos, bindings).map(Some),
            [left, right] => {
                let left = self.eval_child(left, bindings, line)?;
                let right = self.eval_child(right, bindings, line)?;
                self.eval_binary(symbol, &left, &right, line).map(Some)
            },
            _ => Err(RuntimeError::MissingValue { line }),
        }
    }

    /// Applies a binary operator to two values.
    ///
    /// Comparison operators special-case two string operands (textual
    /// comparison) before the dispatch table is consulted; everything else
    /// resolves through the registry, which never coerces.
    ///
    /// # Errors
    /// `RuntimeError::OperationInvalid` on a dispatch miss, plus anything
    /// the chosen implementation raises.
    pub fn eval_binary(&mut self,
                       operator: &str,
                       left: &Value,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        if let (Value::Text(a), Value::Text(b)) = (left, right) {
            let compared = match operator {
                "==" => Some(a == b),
                "!=" => Some(a != b),
                "<" => Some(a < b),
                ">" => Some(a > b),
                "<=" => Some(a <= b),
                ">=" => Some(a >= b),
                _ => None,
            };
            if let Some(result) = compared {
                return Ok(flag(result));
            }
        }

        self.dispatch.dispatch(operator, left, right, line)
    }

    /// Evaluates a matrix literal. Cells must be scalars and rows must all
    /// have the same length.
    fn eval_matrix_literal(&mut self,
                           rows: &[Vec<Expr>],
                           pos: Position,
                           bindings: &mut Bindings)
                           -> EvalResult<Value> {
        let line = pos.line;

        if rows.is_empty() {
            return Ok(Value::Matrix(Matrix::zeros(0, 0)));
        }

        let width = rows[0].len();
        let mut cells = Vec::with_capacity(rows.len() * width);

        for row in rows {
            if row.len() != width {
                return Err(RuntimeError::MatrixInvalid { details: format!("row of {} cell(s) in a matrix {width} wide",
                                                                          row.len()),
                                                         line });
            }
            for cell in row {
                let value = self.eval_child(cell, bindings, line)?;
                cells.push(value.as_scalar(line)?);
            }
        }

        Matrix::new(rows.len(), width, cells).map(Value::Matrix)
                                             .map_err(|details| {
                                                 RuntimeError::MatrixInvalid { details, line }
                                             })
    }
}
