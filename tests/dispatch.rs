use matrica::{
    Context, Query, RuntimeError, Scalar, Session, Value,
    interpreter::{
        dispatch::table::DispatchTable,
        operators::{Assoc, OperatorDef, precedence},
        value::{core::ValueKind, matrix::Matrix},
    },
};

fn scalar(v: f64) -> Value {
    Value::Scalar(Scalar::real(v))
}

fn matrix_2x2() -> Value {
    Value::Matrix(Matrix::new(2,
                              2,
                              vec![Scalar::real(1.0),
                                   Scalar::real(2.0),
                                   Scalar::real(3.0),
                                   Scalar::real(4.0),]).unwrap())
}

#[test]
fn cross_registrations_do_not_satisfy_the_exact_pair() {
    let mut table = DispatchTable::new();
    table.register("+", ValueKind::Matrix, ValueKind::Scalar, |_a, _b, _l| Ok(scalar(1.0)));
    table.register("+", ValueKind::Scalar, ValueKind::Matrix, |_a, _b, _l| Ok(scalar(2.0)));

    // (Matrix, Scalar) and (Scalar, Matrix) hit their entries…
    assert!(table.dispatch("+", &matrix_2x2(), &scalar(1.0), 1).is_ok());
    assert!(table.dispatch("+", &scalar(1.0), &matrix_2x2(), 1).is_ok());

    // …but (Matrix, Matrix) must fail, not borrow either of them.
    match table.dispatch("+", &matrix_2x2(), &matrix_2x2(), 1) {
        Err(RuntimeError::OperationInvalid { operator, left, right, .. }) => {
            assert_eq!(operator, "+");
            assert_eq!(left, "matrix");
            assert_eq!(right, "matrix");
        },
        other => panic!("expected OperationInvalid, got {other:?}"),
    }
}

#[test]
fn exact_hit_beats_the_fallback() {
    let mut table = DispatchTable::new();
    table.register_fallback("+", |_a, _b, _l| Ok(scalar(-1.0)));
    table.register("+", ValueKind::Scalar, ValueKind::Scalar, |_a, _b, _l| Ok(scalar(10.0)));

    assert_eq!(table.dispatch("+", &scalar(0.0), &scalar(0.0), 1).unwrap(),
               scalar(10.0));
    // The fallback is the indirect hit for everything else.
    assert_eq!(table.dispatch("+", &matrix_2x2(), &matrix_2x2(), 1).unwrap(),
               scalar(-1.0));
}

#[test]
fn last_registered_fallback_wins() {
    let mut table = DispatchTable::new();
    table.register_fallback("*", |_a, _b, _l| Ok(scalar(1.0)));
    table.register_fallback("*", |_a, _b, _l| Ok(scalar(2.0)));

    assert_eq!(table.dispatch("*", &scalar(0.0), &scalar(0.0), 1).unwrap(),
               scalar(2.0));
}

#[test]
fn re_registration_replaces_the_triple() {
    let mut table = DispatchTable::new();
    table.register("+", ValueKind::Scalar, ValueKind::Scalar, |_a, _b, _l| Ok(scalar(1.0)));
    table.register("+", ValueKind::Scalar, ValueKind::Scalar, |_a, _b, _l| Ok(scalar(2.0)));

    assert_eq!(table.dispatch("+", &scalar(0.0), &scalar(0.0), 1).unwrap(),
               scalar(2.0));
}

#[test]
fn extension_entries_unregister_as_a_unit() {
    let mut table = DispatchTable::new();
    let owner = table.begin_extension();

    table.register_owned("%", ValueKind::Scalar, ValueKind::Scalar,
                         |a, b, line| {
                             Ok(Value::Scalar(Scalar::real(a.as_real(line)? % b.as_real(line)?)))
                         },
                         owner);
    assert!(table.dispatch("%", &scalar(7.0), &scalar(4.0), 1).is_ok());

    table.unregister(owner);
    assert!(matches!(table.dispatch("%", &scalar(7.0), &scalar(4.0), 1),
                     Err(RuntimeError::OperationInvalid { .. })));
}

#[test]
fn runtime_registered_operator_reaches_the_language() {
    let mut session = Session::new();

    // A modulo operator the default table does not have: one row in the
    // operator table, one dispatch entry, no parser changes.
    session.context
           .operators
           .register(OperatorDef::infix("%", precedence::MULTIPLICATIVE, Assoc::Left));
    session.context
           .dispatch
           .register("%", ValueKind::Scalar, ValueKind::Scalar, |a, b, line| {
               Ok(Value::Scalar(Scalar::real(a.as_real(line)? % b.as_real(line)?)))
           });

    assert_eq!(session.run("7 % 4").unwrap(), Some(scalar(3.0)));
    assert_eq!(session.run("1 + 7 % 4").unwrap(), Some(scalar(4.0)));
}

#[test]
fn extension_constants_unload_with_their_owner() {
    let mut context = Context::new();
    let owner = context.begin_extension();
    let root = context.root();

    context.add_extension_constant(owner, root, "answer", scalar(42.0));
    assert_eq!(Query::parse("answer", &context).run(&mut context).unwrap(),
               Some(scalar(42.0)));

    context.unload_extension(owner);
    assert!(Query::parse("answer", &context).run(&mut context).is_err());
}

#[test]
fn the_same_query_runs_against_different_contexts() {
    let probe = Session::new();
    let query = probe.parse("x + 1");
    assert!(!query.has_errors());

    let mut first = Context::new();
    first.assign_variable(first.root(), "x", scalar(1.0));
    let mut second = Context::new();
    second.assign_variable(second.root(), "x", scalar(10.0));

    assert_eq!(query.run(&mut first).unwrap(), Some(scalar(2.0)));
    assert_eq!(query.run(&mut second).unwrap(), Some(scalar(11.0)));
}

#[test]
fn binding_overlay_is_read_and_updated() {
    let mut context = Context::new();
    let mut bindings = matrica::Bindings::new();
    bindings.insert("x".to_string(), scalar(5.0));

    let query = Query::parse("x = x + 1", &context);
    assert!(!query.has_errors());
    query.run_with(&mut context, &mut bindings).unwrap();

    // The overlay was consulted first and the write landed in it.
    assert_eq!(bindings.get("x"), Some(&scalar(6.0)));
    assert!(context.lookup_variable(context.root(), "x").is_none());
}

#[test]
fn help_model_exposes_builtin_metadata() {
    use matrica::interpreter::registry::{HelpKind, help_model};

    let context = Context::new();
    let entries = help_model(&context);

    let sin = entries.iter()
                     .find(|e| e.name == "sin")
                     .expect("sin is registered");
    assert_eq!(sin.kind, HelpKind::Builtin);
    assert_eq!(sin.category, "trigonometry");
    assert!(!sin.description.is_empty());
    assert!(!sin.example.is_empty());

    assert!(entries.iter()
                   .any(|e| e.name == "pi" && e.kind == HelpKind::Constant));
}
