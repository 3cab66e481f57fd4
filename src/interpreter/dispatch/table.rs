use std::collections::HashMap;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueKind},
    },
};

/// The signature of a binary operator implementation.
///
/// Implementations receive the two operands and the source line for error
/// reporting, and produce a new value.
pub type BinaryFn = fn(&Value, &Value, usize) -> EvalResult<Value>;

/// Identifies a batch of registrations made by one extension, so they can
/// be removed as a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionId(u64);

#[derive(Clone, Copy)]
struct Entry {
    implementation: BinaryFn,
    owner:          Option<ExtensionId>,
}

#[derive(Default)]
struct OperatorEntries {
    exact:    HashMap<(ValueKind, ValueKind), Entry>,
    fallback: Vec<Entry>,
}

/// The operator dispatch registry.
///
/// Maps `(operator symbol, left kind, right kind)` to an implementation.
/// Resolution is two-tier: an entry whose kind pair matches exactly is a
/// direct hit and always wins; otherwise the operator's designated fallback
/// (the most recently registered one) is an indirect hit; otherwise the
/// operation fails with [`RuntimeError::OperationInvalid`]. There is no
/// silent coercion.
///
/// # Example
/// ```
/// use matrica::interpreter::{
///     dispatch::table::DispatchTable,
///     value::{
///         core::{Value, ValueKind},
///         scalar::Scalar,
///     },
/// };
///
/// let mut table = DispatchTable::new();
/// table.register("+", ValueKind::Scalar, ValueKind::Scalar, |a, b, line| {
///          Ok(Value::Scalar(a.as_scalar(line)? + b.as_scalar(line)?))
///      });
///
/// let a = Value::Scalar(Scalar::real(2.0));
/// let b = Value::Scalar(Scalar::real(3.0));
/// assert_eq!(table.dispatch("+", &a, &b, 1).unwrap(),
///            Value::Scalar(Scalar::real(5.0)));
///
/// // No entry accepts a string here, and nothing coerces.
/// let s = Value::Text("x".to_string());
/// assert!(table.dispatch("+", &a, &s, 1).is_err());
/// ```
#[derive(Default)]
pub struct DispatchTable {
    operators:      HashMap<String, OperatorEntries>,
    next_extension: u64,
}

impl DispatchTable {
    /// Creates an empty table with no entries at all.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with the default entries of the language installed:
    /// scalar arithmetic and comparison, matrix algebra with scalar
    /// broadcast, text concatenation, and range construction.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        super::scalar::install(&mut table);
        super::matrix::install(&mut table);
        super::text::install(&mut table);
        super::range::install(&mut table);
        table
    }

    /// Registers an exact entry. Re-registering the same triple replaces
    /// the previous implementation, so registration is idempotent.
    pub fn register(&mut self,
                    operator: &str,
                    left: ValueKind,
                    right: ValueKind,
                    implementation: BinaryFn) {
        self.register_entry(operator, left, right, implementation, None);
    }

    /// Registers an exact entry owned by an extension.
    pub fn register_owned(&mut self,
                          operator: &str,
                          left: ValueKind,
                          right: ValueKind,
                          implementation: BinaryFn,
                          owner: ExtensionId) {
        self.register_entry(operator, left, right, implementation, Some(owner));
    }

    fn register_entry(&mut self,
                      operator: &str,
                      left: ValueKind,
                      right: ValueKind,
                      implementation: BinaryFn,
                      owner: Option<ExtensionId>) {
        self.operators
            .entry(operator.to_string())
            .or_default()
            .exact
            .insert((left, right), Entry { implementation, owner });
    }

    /// Registers the designated fallback for an operator.
    ///
    /// The fallback is the indirect hit consulted when no exact pair
    /// matches; the most recent registration wins.
    pub fn register_fallback(&mut self, operator: &str, implementation: BinaryFn) {
        self.operators
            .entry(operator.to_string())
            .or_default()
            .fallback
            .push(Entry { implementation,
                          owner: None });
    }

    /// Registers a fallback owned by an extension.
    pub fn register_fallback_owned(&mut self,
                                   operator: &str,
                                   implementation: BinaryFn,
                                   owner: ExtensionId) {
        self.operators
            .entry(operator.to_string())
            .or_default()
            .fallback
            .push(Entry { implementation,
                          owner: Some(owner) });
    }

    /// Allocates a fresh extension identifier.
    pub fn begin_extension(&mut self) -> ExtensionId {
        self.next_extension += 1;
        ExtensionId(self.next_extension)
    }

    /// Removes every entry owned by the extension.
    pub fn unregister(&mut self, owner: ExtensionId) {
        for entries in self.operators.values_mut() {
            entries.exact.retain(|_, entry| entry.owner != Some(owner));
            entries.fallback.retain(|entry| entry.owner != Some(owner));
        }
    }

    /// Tests whether a triple would resolve to a direct hit.
    #[must_use]
    pub fn supports(&self, operator: &str, left: ValueKind, right: ValueKind) -> bool {
        self.operators
            .get(operator)
            .is_some_and(|entries| entries.exact.contains_key(&(left, right)))
    }

    /// Resolves and applies an operator to two values.
    ///
    /// # Errors
    /// `RuntimeError::OperationInvalid` when neither a direct nor an
    /// indirect hit exists; any error the chosen implementation raises.
    pub fn dispatch(&self,
                    operator: &str,
                    left: &Value,
                    right: &Value,
                    line: usize)
                    -> EvalResult<Value> {
        let entries = self.operators.get(operator);

        if let Some(entries) = entries {
            if let Some(entry) = entries.exact.get(&(left.kind(), right.kind())) {
                return (entry.implementation)(left, right, line);
            }
            if let Some(entry) = entries.fallback.last() {
                return (entry.implementation)(left, right, line);
            }
        }

        Err(RuntimeError::OperationInvalid { operator: operator.to_string(),
                                             left: left.kind_name(),
                                             right: right.kind_name(),
                                             line })
    }
}
