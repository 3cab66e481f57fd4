use std::io::{BufRead, Write};

use crate::{
    ast::Expr,
    error::{ParseError, RuntimeError},
    interpreter::{
        evaluator::core::{Bindings, Context},
        parser::core::parse_source,
        value::core::Value,
    },
};

/// The callbacks an embedding host supplies to a running evaluation.
///
/// All three are blocking calls on the evaluation thread, not a scheduler:
/// `notify` is fire-and-forget, `request_input` returns when the host has a
/// string, `pause` returns when the host acknowledges.
pub trait Host {
    /// An informational message from the running script.
    fn notify(&self, message: &str);
    /// Blocks until the host supplies a line of input.
    fn request_input(&self, prompt: &str) -> String;
    /// Blocks until the host acknowledges the pause.
    fn pause(&self);
}

/// A host that swallows notifications and answers input requests with an
/// empty string. The default for embedded use.
pub struct SilentHost;

impl Host for SilentHost {
    fn notify(&self, _message: &str) {}

    fn request_input(&self, _prompt: &str) -> String {
        String::new()
    }

    fn pause(&self) {}
}

/// A host wired to the terminal: notifications go to stdout, input requests
/// read a line from stdin, pauses wait for the enter key.
pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn request_input(&self, prompt: &str) -> String {
        print!("{prompt}");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        line.trim_end_matches(['\n', '\r']).to_string()
    }

    fn pause(&self) {
        self.request_input("-- paused, press enter --");
    }
}

/// One parse of one source text: the statement list and the ordered list of
/// parse errors found alongside it.
///
/// A query is not bound to a context; the same query can be run against
/// several contexts in turn.
pub struct Query {
    /// The parsed statements. Regions that failed to parse appear as
    /// `Expr::Empty`.
    pub statements: Vec<Expr>,
    /// Every structural error, in source order.
    pub errors:     Vec<ParseError>,
}

impl Query {
    /// Parses a source text against a context's operator table.
    #[must_use]
    pub fn parse(source: &str, context: &Context) -> Self {
        let (statements, errors) = parse_source(source, &context.operators);
        log::debug!("parsed {} statement(s), {} error(s)",
                    statements.len(),
                    errors.len());
        Self { statements, errors }
    }

    /// Returns `true` when parsing recorded at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Evaluates the statements against a context, yielding the last value
    /// any statement produced.
    ///
    /// The caller decides what parse errors mean: a host that wants
    /// all-or-nothing semantics checks [`Query::has_errors`] first and
    /// never runs an erroneous query.
    ///
    /// # Errors
    /// The first `RuntimeError` raised. The context keeps everything
    /// assigned before the failure.
    pub fn run(&self, context: &mut Context) -> Result<Option<Value>, RuntimeError> {
        self.run_with(context, &mut Bindings::new())
    }

    /// Like [`Query::run`], with a caller-supplied binding overlay that the
    /// evaluation reads and updates.
    ///
    /// # Errors
    /// The first `RuntimeError` raised.
    pub fn run_with(&self,
                    context: &mut Context,
                    bindings: &mut Bindings)
                    -> Result<Option<Value>, RuntimeError> {
        let mut result = None;
        for statement in &self.statements {
            if let Some(value) = context.eval(statement, bindings)? {
                result = Some(value);
            }
        }
        Ok(result)
    }
}

/// A parse or evaluation failure surfaced by [`Session::run`].
#[derive(Debug)]
pub enum RunError {
    /// The source had structural errors; the whole list is carried.
    Parse(Vec<ParseError>),
    /// Evaluation failed.
    Runtime(RuntimeError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(errors) => {
                for (index, error) in errors.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{error}")?;
                }
                Ok(())
            },
            Self::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for RunError {}

impl From<RuntimeError> for RunError {
    fn from(error: RuntimeError) -> Self {
        Self::Runtime(error)
    }
}

/// The convenience owner of one root context for interactive embedding.
///
/// A session parses and runs inputs one after another against the same
/// context, so variables, functions and extension registrations persist
/// between inputs. A runtime failure aborts only the current input.
pub struct Session {
    /// The session's root context.
    pub context: Context,
}

#[allow(clippy::new_without_default)]
impl Session {
    /// Creates a session with a fresh root context.
    #[must_use]
    pub fn new() -> Self {
        Self { context: Context::new() }
    }

    /// Parses one input against the session's operator table.
    #[must_use]
    pub fn parse(&self, source: &str) -> Query {
        Query::parse(source, &self.context)
    }

    /// Parses and evaluates one input.
    ///
    /// A source with parse errors is never evaluated: the whole error list
    /// is surfaced so an interactive host can show every problem at once.
    ///
    /// # Errors
    /// `RunError::Parse` with the full error list, or `RunError::Runtime`
    /// with the first evaluation failure.
    pub fn run(&mut self, source: &str) -> Result<Option<Value>, RunError> {
        let query = self.parse(source);
        if query.has_errors() {
            return Err(RunError::Parse(query.errors));
        }
        Ok(query.run(&mut self.context)?)
    }
}
