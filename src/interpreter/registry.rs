use std::rc::Rc;

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    value::{core::Value, function::FunctionValue, scalar::Scalar},
};

/// The signature of a builtin implementation.
///
/// Builtins receive the context (for host callbacks and further
/// evaluation), the already-evaluated arguments, and the call line.
pub type BuiltinImpl = fn(&mut Context, &[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
#[derive(Clone, Copy, Debug)]
pub enum Arity {
    /// Exactly `n` arguments.
    Exact(usize),
    /// Any arity listed in the slice.
    OneOf(&'static [usize]),
    /// Any number of arguments.
    Any,
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(options) => options.contains(&n),
            Self::Any => true,
        }
    }

    /// Describes the accepted counts for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::OneOf(options) => {
                let parts: Vec<String> = options.iter().map(ToString::to_string).collect();
                parts.join(" or ")
            },
            Self::Any => "any number of".to_string(),
        }
    }
}

/// A builtin function with its descriptive metadata.
///
/// The metadata (description, category, example, documentation link) is
/// what the help model extracts; the implementation is what calls invoke.
/// Entries are submitted through `inventory` at link time and installed
/// into each fresh context.
#[derive(Debug)]
pub struct BuiltinFunction {
    /// The name the function is called by.
    pub name:           &'static str,
    /// One-line description.
    pub description:    &'static str,
    /// Grouping category for documentation.
    pub category:       &'static str,
    /// A usage example.
    pub example:        &'static str,
    /// A documentation link, or the empty string.
    pub link:           &'static str,
    /// The accepted argument counts.
    pub arity:          Arity,
    /// The implementation.
    pub implementation: BuiltinImpl,
}

/// A named constant with its descriptive metadata.
#[derive(Debug)]
pub struct BuiltinConstant {
    /// The constant's name.
    pub name:        &'static str,
    /// One-line description.
    pub description: &'static str,
    /// The value.
    pub value:       Scalar,
}

inventory::collect!(BuiltinFunction);
inventory::collect!(BuiltinConstant);

/// Every builtin function submitted at link time.
#[must_use]
pub fn builtin_functions() -> Vec<&'static BuiltinFunction> {
    inventory::iter::<BuiltinFunction>().collect()
}

/// Every constant submitted at link time.
#[must_use]
pub fn builtin_constants() -> Vec<&'static BuiltinConstant> {
    inventory::iter::<BuiltinConstant>().collect()
}

/// Installs all collected builtins and constants into a context's root.
pub(crate) fn install(context: &mut Context) {
    let root = context.root();

    let functions = builtin_functions();
    let constants = builtin_constants();
    log::debug!("installing {} builtin function(s) and {} constant(s)",
                functions.len(),
                constants.len());

    for builtin in functions {
        context.add_function(root, builtin.name, Rc::new(FunctionValue::Builtin(builtin)));
    }
    for constant in constants {
        context.add_constant(root, constant.name, Value::Scalar(constant.value));
    }
}

/// What a help entry documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpKind {
    /// A registered builtin.
    Builtin,
    /// A constant.
    Constant,
    /// A user-defined function.
    UserFunction,
}

/// One record of the structured help model.
#[derive(Debug, Clone)]
pub struct HelpEntry {
    /// The documented name.
    pub name:        String,
    /// One-line description.
    pub description: String,
    /// Grouping category.
    pub category:    String,
    /// A usage example.
    pub example:     String,
    /// A documentation link, or the empty string.
    pub link:        String,
    /// What the entry documents.
    pub kind:        HelpKind,
}

/// Walks a context's root scope into the structured help model.
///
/// Builtins carry their attached metadata; user functions contribute their
/// signature. The result is sorted by name and handed to an external
/// formatter — the core exposes the data, not the rendering.
#[must_use]
pub fn help_model(context: &Context) -> Vec<HelpEntry> {
    let root = context.root();
    let mut entries = Vec::new();

    for (name, function) in context.functions_in(root) {
        match function.as_ref() {
            FunctionValue::Builtin(builtin) => {
                entries.push(HelpEntry { name:        builtin.name.to_string(),
                                         description: builtin.description.to_string(),
                                         category:    builtin.category.to_string(),
                                         example:     builtin.example.to_string(),
                                         link:        builtin.link.to_string(),
                                         kind:        HelpKind::Builtin, });
            },
            FunctionValue::User(def) => {
                entries.push(HelpEntry { name:        name.clone(),
                                         description: format!("function {}({})",
                                                              def.name,
                                                              def.params.join(", ")),
                                         category:    "user".to_string(),
                                         example:     String::new(),
                                         link:        String::new(),
                                         kind:        HelpKind::UserFunction, });
            },
            FunctionValue::Lambda(_) => {},
        }
    }

    for (name, _value) in context.constants_in(root) {
        let description = builtin_constants().into_iter()
                                             .find(|c| c.name == name.as_str())
                                             .map(|c| c.description.to_string())
                                             .unwrap_or_default();
        entries.push(HelpEntry { name: name.clone(),
                                 description,
                                 category: "constants".to_string(),
                                 example: String::new(),
                                 link: String::new(),
                                 kind: HelpKind::Constant });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
