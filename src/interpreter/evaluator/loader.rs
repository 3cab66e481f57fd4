use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    time::SystemTime,
};

use crate::{
    ast::{Expr, Position},
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, scope::ScopeId},
        operators::OperatorTable,
        parser::core::parse_source,
        value::function::{FunctionDefinition, FunctionValue},
    },
};

/// The extension of file-backed function scripts.
pub const SCRIPT_EXTENSION: &str = "mca";

struct CachedScript {
    modified: SystemTime,
    function: Rc<FunctionValue>,
}

/// Loads functions from script files on demand.
///
/// When symbol resolution reaches its file-backed tail, the loader looks
/// for `<name>.mca` in its directory. A parseable file is compiled once and
/// cached keyed by its modification time: the cached function is reused
/// until the timestamp changes, and re-parsed exactly then.
pub struct ScriptLoader {
    directory: PathBuf,
    cache:     HashMap<String, CachedScript>,
}

impl ScriptLoader {
    /// Creates a loader rooted at the given directory.
    #[must_use]
    pub fn new(directory: PathBuf) -> Self {
        Self { directory,
               cache: HashMap::new() }
    }

    /// The directory scripts are looked up in.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Attempts to load the function `name` from `<name>.mca`.
    ///
    /// Returns `Ok(None)` when no such file exists, so the resolution chain
    /// can fall through to its `SymbolMissing` tail.
    ///
    /// # Errors
    /// - `RuntimeError::ScriptUnreadable` when the file exists but cannot
    ///   be read.
    /// - `RuntimeError::ScriptErrors` when it parses with errors; a script
    ///   must be error-free to be callable.
    pub(crate) fn load(&mut self,
                       name: &str,
                       table: &OperatorTable,
                       scope: ScopeId,
                       line: usize)
                       -> EvalResult<Option<Rc<FunctionValue>>> {
        let path = self.directory.join(format!("{name}.{SCRIPT_EXTENSION}"));

        let Ok(metadata) = fs::metadata(&path) else {
            return Ok(None);
        };
        let modified = metadata.modified()
                               .map_err(|_| RuntimeError::ScriptUnreadable { name: name.to_string(),
                                                                             line })?;

        if let Some(cached) = self.cache.get(name)
           && cached.modified == modified
        {
            log::debug!("script cache hit for '{name}'");
            return Ok(Some(Rc::clone(&cached.function)));
        }

        let source =
            fs::read_to_string(&path).map_err(|_| RuntimeError::ScriptUnreadable { name: name.to_string(),
                                                                                   line })?;

        let (statements, errors) = parse_source(&source, table);
        if !errors.is_empty() {
            return Err(RuntimeError::ScriptErrors { name: name.to_string(),
                                                    count: errors.len(),
                                                    line });
        }

        let function = compile(name, statements, scope);
        log::debug!("parsed script '{}' from {}", name, path.display());

        self.cache.insert(name.to_string(),
                          CachedScript { modified,
                                         function: Rc::clone(&function) });
        Ok(Some(function))
    }
}

/// Turns a parsed script into a callable.
///
/// A file whose single statement is `function <name>(…) { … }` supplies
/// that definition; any other script becomes a zero-parameter body.
fn compile(name: &str, statements: Vec<Expr>, scope: ScopeId) -> Rc<FunctionValue> {
    if statements.len() == 1
       && let Expr::FunctionDef { name: defined,
                                  params,
                                  body,
                                  .. } = &statements[0]
       && defined == name
    {
        return Rc::new(FunctionValue::User(FunctionDefinition { name:   defined.clone(),
                                                                params: params.clone(),
                                                                body:   (**body).clone(),
                                                                scope, }));
    }

    Rc::new(FunctionValue::User(FunctionDefinition { name:   name.to_string(),
                                                     params: Vec::new(),
                                                     body:   Expr::Block { statements,
                                                                           pos:
                                                                               Position::start() },
                                                     scope, }))
}
