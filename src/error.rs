/// Parsing errors.
///
/// Defines all error types that can occur while scanning and parsing source
/// code. Parse errors are collected into a list rather than thrown, so one
/// pass over a script reports every structural problem it contains. Each
/// error carries the source position it is anchored to.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include unresolved symbols, unsupported operator/kind pairs,
/// dimension mismatches, and invalid arguments. They propagate to the query
/// boundary and abort the current evaluation only.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
