/// Indexed reads and all assignment forms.
pub mod assign;
/// Function invocation: user functions, lambdas and builtins.
pub mod call;
/// The `Context` and the central `eval` dispatch.
pub mod core;
/// Evaluation of the keyword forms and blocks.
pub mod keyword;
/// File-backed function loading with timestamp invalidation.
pub mod loader;
/// The symbol resolution chain.
pub mod resolve;
/// Scope records and their arena identifiers.
pub mod scope;
/// Unary operator evaluation.
pub mod unary;
