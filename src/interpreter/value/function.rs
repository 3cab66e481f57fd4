use std::fmt;

use crate::{
    ast::Expr,
    interpreter::{evaluator::scope::ScopeId, registry::BuiltinFunction},
};

/// A user function defined with `function name(params) { body }`.
///
/// The definition remembers the scope it was created in; invocations run in
/// a fresh child of that scope.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    /// The function name.
    pub name:   String,
    /// Parameter names in order.
    pub params: Vec<String>,
    /// The body block.
    pub body:   Expr,
    /// The scope the definition was evaluated in.
    pub scope:  ScopeId,
}

/// A lambda created by `params => body`.
///
/// The defining scope is captured by reference (an arena id, not a
/// snapshot), so reassigning a captured variable after the lambda was built
/// is observed by later calls. `free` records the names the structural
/// analysis classified as captured.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaValue {
    /// Parameter names in order.
    pub params:   Vec<String>,
    /// The body expression.
    pub body:     Expr,
    /// The scope captured at definition time.
    pub captured: ScopeId,
    /// Free variables of the body, per `Expr::collect_symbols`.
    pub free:     Vec<String>,
}

/// A callable runtime value.
///
/// Function values are reference-shared: assigning one to a second name
/// aliases the same definition instead of copying it.
#[derive(Debug)]
pub enum FunctionValue {
    /// A named user function.
    User(FunctionDefinition),
    /// A lambda with its captured environment.
    Lambda(LambdaValue),
    /// A registered builtin with its metadata record.
    Builtin(&'static BuiltinFunction),
}

impl FunctionValue {
    /// The display name of the callable.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::User(def) => &def.name,
            Self::Lambda(_) => "<lambda>",
            Self::Builtin(builtin) => builtin.name,
        }
    }

    /// The number of declared parameters, or `None` for builtins with a
    /// flexible arity.
    #[must_use]
    pub fn param_count(&self) -> Option<usize> {
        match self {
            Self::User(def) => Some(def.params.len()),
            Self::Lambda(lambda) => Some(lambda.params.len()),
            Self::Builtin(_) => None,
        }
    }
}

impl fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(def) => write!(f, "function {}({})", def.name, def.params.join(", ")),
            Self::Lambda(lambda) => write!(f, "{} => …", lambda.params.join(", ")),
            Self::Builtin(builtin) => write!(f, "builtin {}", builtin.name),
        }
    }
}
