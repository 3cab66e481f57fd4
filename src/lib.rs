//! # matrica
//!
//! matrica is an embeddable expression language for arithmetic, matrix
//! algebra, control flow and user-defined functions, evaluated by direct
//! tree interpretation. The crate is the language front end and evaluator:
//! the character scanner, the error-accumulating precedence-climbing
//! parser, the polymorphic operator dispatch registry, and the
//! nested-scope symbol resolution protocol with closures and file-backed
//! function loading.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` tree and related types: source
/// positions, assignment targets, and the structural free-variable
/// analysis lambdas use for their capture semantics.
pub mod ast;
/// Provides the split parse/runtime error taxonomies.
///
/// Parse errors are collected with positions; runtime errors propagate to
/// the query boundary. Neither side silently coerces or defaults.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// Ties together the scanner, the operator table, the parser, the value
/// kinds, the dispatch registry, the evaluator and the session layer, and
/// exposes the public API for embedding the language.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

pub use crate::{
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{Bindings, Context},
        session::{ConsoleHost, Host, Query, RunError, Session, SilentHost},
        value::{core::Value, scalar::Scalar},
    },
};

/// Parses and evaluates a source text in a fresh context.
///
/// Returns the value of the last statement that produced one, or `None`
/// for sources that only define things. A source with parse errors is not
/// evaluated; the whole error list is surfaced.
///
/// # Errors
/// `RunError::Parse` with every structural error, or `RunError::Runtime`
/// with the first evaluation failure.
///
/// # Examples
/// ```
/// use matrica::{evaluate, Scalar, Value};
///
/// // Multiplication binds tighter than addition.
/// let value = evaluate("2 + 3 * 4").unwrap();
/// assert_eq!(value, Some(Value::Scalar(Scalar::real(14.0))));
///
/// // Parse errors are collected, not thrown one at a time.
/// let failure = evaluate("(1 + 2");
/// assert!(failure.is_err());
/// ```
pub fn evaluate(source: &str) -> Result<Option<Value>, RunError> {
    Session::new().run(source)
}
