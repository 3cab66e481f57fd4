use std::{collections::HashMap, rc::Rc};

use crate::interpreter::value::{core::Value, function::FunctionValue};

/// A handle into the context's scope arena.
///
/// Scopes reference their parent by id rather than by pointer, so captured
/// environments cannot form reference cycles: a lambda stored in the very
/// scope it captures is just two ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

/// One scope record: variables, constants and functions, plus the parent
/// link lookups fall through to.
#[derive(Debug, Default)]
pub struct Scope {
    pub(crate) parent:    Option<ScopeId>,
    pub(crate) variables: HashMap<String, Value>,
    pub(crate) constants: HashMap<String, Value>,
    pub(crate) functions: HashMap<String, Rc<FunctionValue>>,
    /// Set when a lambda captured this scope. A captured frame survives the
    /// call that created it; an uncaptured one is truncated on return.
    pub(crate) captured:  bool,
}

impl Scope {
    /// Creates an empty scope below the given parent.
    #[must_use]
    pub(crate) fn child_of(parent: ScopeId) -> Self {
        Self { parent: Some(parent),
               ..Self::default() }
    }
}
