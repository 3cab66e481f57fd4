use std::{
    fs::{self, File, FileTimes},
    path::Path,
    time::{Duration, SystemTime},
};

use matrica::{Context, Query, RuntimeError, Scalar, Value};
use tempfile::tempdir;

fn scalar(v: f64) -> Value {
    Value::Scalar(Scalar::real(v))
}

fn run(context: &mut Context, source: &str) -> Result<Option<Value>, RuntimeError> {
    let query = Query::parse(source, context);
    assert!(!query.has_errors(), "parse errors: {:?}", query.errors);
    query.run(context)
}

fn set_modified(path: &Path, to: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_times(FileTimes::new().set_modified(to)).unwrap();
}

#[test]
fn functions_load_from_script_files() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("double.mca"), "function double(x) { x * 2 }").unwrap();

    let mut context = Context::new();
    context.set_script_directory(dir.path().to_path_buf());

    assert_eq!(run(&mut context, "double(21)").unwrap(), Some(scalar(42.0)));
}

#[test]
fn a_script_without_a_definition_is_a_zero_parameter_body() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("fortytwo.mca"), "40 + 2").unwrap();

    let mut context = Context::new();
    context.set_script_directory(dir.path().to_path_buf());

    assert_eq!(run(&mut context, "fortytwo()").unwrap(), Some(scalar(42.0)));

    // The bare symbol resolves to the callable itself.
    assert_eq!(run(&mut context, "f = fortytwo\nf()").unwrap(),
               Some(scalar(42.0)));
}

#[test]
fn the_cache_is_keyed_by_modification_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("triple.mca");
    fs::write(&path, "function triple(x) { x * 3 }").unwrap();
    let original = fs::metadata(&path).unwrap().modified().unwrap();

    let mut context = Context::new();
    context.set_script_directory(dir.path().to_path_buf());
    assert_eq!(run(&mut context, "triple(10)").unwrap(), Some(scalar(30.0)));

    // Rewrite the file but pin the timestamp back: the cached function
    // must be reused, not re-parsed.
    fs::write(&path, "function triple(x) { x * 100 }").unwrap();
    set_modified(&path, original);
    assert_eq!(run(&mut context, "triple(10)").unwrap(), Some(scalar(30.0)));

    // Bump the timestamp: now the new body must be picked up.
    set_modified(&path, original + Duration::from_secs(10));
    assert_eq!(run(&mut context, "triple(10)").unwrap(), Some(scalar(1000.0)));
}

#[test]
fn an_unparsable_script_is_a_hard_failure() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.mca"), "(1 + 2").unwrap();

    let mut context = Context::new();
    context.set_script_directory(dir.path().to_path_buf());

    match run(&mut context, "broken()") {
        Err(RuntimeError::ScriptErrors { name, count, .. }) => {
            assert_eq!(name, "broken");
            assert!(count > 0);
        },
        other => panic!("expected ScriptErrors, got {other:?}"),
    }
}

#[test]
fn a_missing_file_falls_through_to_symbol_missing() {
    let dir = tempdir().unwrap();
    let mut context = Context::new();
    context.set_script_directory(dir.path().to_path_buf());

    assert!(matches!(run(&mut context, "no_such_symbol"),
                     Err(RuntimeError::SymbolMissing { .. })));
    assert!(matches!(run(&mut context, "no_such_function(1)"),
                     Err(RuntimeError::FunctionMissing { .. })));
}
