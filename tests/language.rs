use matrica::{ParseError, Scalar, Session, Value, evaluate};
use walkdir::WalkDir;

fn eval_scalar(source: &str) -> Scalar {
    match evaluate(source) {
        Ok(Some(Value::Scalar(s))) => s,
        other => panic!("expected a scalar from {source:?}, got {other:?}"),
    }
}

fn assert_real(source: &str, expected: f64) {
    let s = eval_scalar(source);
    assert!(s.is_real(), "{source:?} produced the complex value {s}");
    assert!((s.re - expected).abs() < 1e-9,
            "{source:?} produced {}, expected {expected}",
            s.re);
}

fn assert_text(source: &str, expected: &str) {
    match evaluate(source) {
        Ok(Some(Value::Text(s))) => assert_eq!(s, expected),
        other => panic!("expected a string from {source:?}, got {other:?}"),
    }
}

fn assert_failure(source: &str) {
    assert!(evaluate(source).is_err(),
            "{source:?} succeeded but was expected to fail");
}

#[test]
fn demo_scripts_work() {
    let mut count = 0;

    for entry in WalkDir::new("demos").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| {
                                          e.path().extension().is_some_and(|ext| ext == "mca")
                                      })
    {
        count += 1;
        let source = std::fs::read_to_string(entry.path()).unwrap();
        if let Err(e) = evaluate(&source) {
            panic!("demo script {:?} failed:\n{e}", entry.path());
        }
    }

    assert!(count > 0, "no demo scripts found in demos/");
}

#[test]
fn literal_scanning_round_trips() {
    for source in ["123", "123.456", "1.2e-3", "2.5e+2", "0.5", "42"] {
        let expected: f64 = source.parse().unwrap();
        assert_real(source, expected);

        // Formatting the scanned value back must reproduce it.
        let formatted = eval_scalar(source).to_string();
        assert_real(&formatted, expected);
    }

    let imaginary = eval_scalar("2.5i");
    assert_eq!(imaginary, Scalar::new(0.0, 2.5));
    assert_eq!(eval_scalar(&imaginary.to_string()), imaginary);
}

#[test]
fn precedence_and_associativity() {
    assert_real("2 + 3 * 4", 14.0);
    assert_real("2 * 3 + 4", 10.0);
    assert_real("(2 + 3) * 4", 20.0);
    assert_real("10 - 2 - 3", 5.0);
    assert_real("20 / 2 / 5", 2.0);
    assert_real("2 ^ 3 ^ 2", 512.0);
    assert_real("-2 ^ 2", -4.0);
    assert_real("1 + 2 < 4", 1.0);
}

#[test]
fn complex_arithmetic() {
    assert_eq!(eval_scalar("i * i"), Scalar::real(-1.0));
    assert_eq!(eval_scalar("(1 + 2i) * (3 + 4i)"), Scalar::new(-5.0, 10.0));
    assert_eq!(eval_scalar("conj(1 + 2i)"), Scalar::new(1.0, -2.0));
    assert_eq!(eval_scalar("sqrt(-4)"), Scalar::new(0.0, 2.0));
    assert_real("1 + 2i == 1 + 2i", 1.0);
}

#[test]
fn factorial_postfix() {
    assert_real("5!", 120.0);
    assert_real("3!!", 720.0);
    assert_real("3! + 1", 7.0);
    assert_failure("(-1)!");
    assert_failure("2.5!");
}

#[test]
fn strings_and_escapes() {
    assert_text("\"ab\" + \"cd\"", "abcd");
    assert_text("\"n = \" + 4", "n = 4");
    assert_text("\"ab\" * 3", "ababab");
    assert_text("\"a\\tb\\n\"", "a\tb\n");
    assert_real("\"abc\" == \"abc\"", 1.0);
    assert_real("\"abc\" != \"abd\"", 1.0);
    assert_real("\"ab\" < \"b\"", 1.0);
    assert_failure("\"not closed");
}

#[test]
fn variables_and_assignment() {
    assert_real("x = 2\nx + 3", 5.0);
    assert_real("a = b = 4\na + b", 8.0);
    assert_real("x = 1; x = x + 1; x", 2.0);
    // Constants cannot be assigned.
    assert_failure("pi = 3");
    // An unknown symbol is a hard failure, never a default.
    assert_failure("nope + 1");
}

#[test]
fn if_else_branches() {
    assert_real("if (0) 1; else 2;", 2.0);
    assert_real("if (1) 1; else 2;", 1.0);
    assert_real("x = 7\nif (x > 5) \"big\"; else \"small\";\n1", 1.0);
    assert_real("x = 2\nif (x == 1) 10; else if (x == 2) 20; else 30;", 20.0);
    assert_real("y = if (1) 10; else 20;\ny", 10.0);
}

#[test]
fn loops() {
    assert_real("x = 0\nwhile (x < 3) { x = x + 1 }\nx", 3.0);
    assert_real("x = 0\ndo { x = x + 1 } while (x < 3);\nx", 3.0);
    // The do-body runs once even when the condition starts false.
    assert_real("x = 10\ndo { x = x + 1 } while (x < 3);\nx", 11.0);
    assert_real("s = 0\nfor (k = 0; k < 5; k = k + 1) { s = s + k }\ns", 10.0);
    assert_real("x = 0\nfor (; x < 2; x = x + 1) {}\nx", 2.0);
}

#[test]
fn user_defined_functions() {
    assert_real("function square(x) { x * x }\nsquare(7)", 49.0);
    assert_real("function add(a, b) { a + b }\nadd(2, add(3, 4))", 9.0);
    assert_real("function fact(n) {\n    if (n <= 1) 1; else n * fact(n - 1);\n}\nfact(5)",
                120.0);
    // Wrong arity is an error, not a default.
    assert_failure("function square(x) { x * x }\nsquare(1, 2)");
}

#[test]
fn lambdas_and_closures() {
    assert_real("f = x => x + 1\nf(4)", 5.0);
    assert_real("f = (a, b) => a * b\nf(6, 7)", 42.0);

    // Capture is by reference to the defining scope: reassigning `y`
    // after the lambda was built is observed by later calls.
    assert_real("y = 1\nf = x => x + y\ny = 2\nf(10)", 12.0);

    // A closure escaping the function that created it keeps its frame.
    assert_real("function make_adder(n) {\n    f = x => x + n\n    f\n}\nadd2 = make_adder(2)\nadd2(40)",
                42.0);
    assert_real("function make_adder(n) {\n    f = x => x + n\n    f\n}\na = make_adder(2)\nb = make_adder(3)\na(1) + b(1)",
                7.0);

    // Curried form: each partial application is its own closure.
    assert_real("add = a => b => a + b\ng = add(2)\ng(3)", 5.0);
}

#[test]
fn multi_value_assignment() {
    assert_real("(a, b) = list(1, 2)\na + b", 3.0);
    assert_real("(r, c) = size([1, 2; 3, 4])\nr * 10 + c", 22.0);

    // A single non-list value broadcasts to every target.
    assert_real("(a, b) = 7\na + b", 14.0);

    // Unpacking truncates to the shorter side.
    assert_real("(a, b) = list(1, 2, 3)\na + b", 3.0);
    assert_real("(a, b, c) = list(1, 2)\na + b", 3.0);
    assert_failure("(a, b, c) = list(1, 2)\nc");
}

#[test]
fn matrices() {
    assert_real("m = [1, 2; 3, 4]\nm[1, 0]", 3.0);
    assert_real("m = [1, 2; 3, 4]\nm[0, 0] = 9\nm[0, 0]", 9.0);
    assert_real("m = [1, 2; 3, 4]\nn = m * m\nn[1, 1]", 22.0);
    assert_real("m = [1, 2; 3, 4]\nn = m + 1\nn[0, 1]", 3.0);
    assert_real("m = [1, 2; 3, 4]\nt = transpose(m)\nt[0, 1]", 3.0);
    assert_real("rows([1, 2, 3])", 1.0);
    assert_real("cols([1, 2, 3])", 3.0);
    assert_real("v = [1, 2, 3]\nv[2]", 3.0);

    // Whole-axis indexing with `:`.
    assert_real("m = [1, 2; 3, 4]\nc = m[:, 1]\nc[1]", 4.0);
    assert_real("m = [1, 2; 3, 4]\nr = m[0, :]\nr[1]", 2.0);

    assert_failure("[1, 2] + [1, 2, 3]");
    assert_failure("[1, 2; 3]");
    assert_failure("m = [1, 2; 3, 4]\nm[5, 0]");
}

#[test]
fn matrices_copy_on_assign() {
    // Assignment copies; mutating the copy never aliases the original.
    assert_real("a = [1, 2; 3, 4]\nb = a\nb[0, 0] = 99\na[0, 0]", 1.0);
}

#[test]
fn ranges() {
    assert_real("r = 1:5\nr[4]", 5.0);
    assert_real("r = 0:2:10\nr[3]", 6.0);
    assert_real("r = 0:2:10\nm = r[:]\ncols(m)", 6.0);
    assert_failure("0:0:10");
}

#[test]
fn builtin_catalogue() {
    assert_real("sqrt(9)", 3.0);
    assert_real("abs(-5)", 5.0);
    assert_real("min(2, 3) + max(2, 3)", 5.0);
    assert_real("floor(3.7) + ceil(3.2) + round(3.5)", 11.0);
    assert_real("sin(0)", 0.0);
    assert_real("cos(0)", 1.0);
    assert_real("ln(e)", 1.0);
    assert_real("log(100)", 2.0);
    assert_real("log(8, 2)", 3.0);
    assert_real("exp(0)", 1.0);
}

#[test]
fn blocks_scope_their_locals() {
    // Writes to outer names pass through; new names end with the block.
    assert_real("x = 1\n{ x = 2; t = 5 }\nx", 2.0);
    assert_failure("{ t = 5 }\nt");
}

#[test]
fn call_requires_adjacent_paren() {
    assert_real("f = x => x\nf(2)", 2.0);
    // With a gap the `(` is not a call.
    assert_failure("f = x => x\nf (2)");
}

#[test]
fn unclosed_bracket_is_anchored_at_the_opener() {
    let session = Session::new();
    let query = session.parse("(1 + 2");

    assert_eq!(query.errors.len(), 1);
    match &query.errors[0] {
        ParseError::BracketNotClosed { bracket: '(', position } => {
            assert_eq!(position.line, 1);
            assert_eq!(position.column, 1);
        },
        other => panic!("expected BracketNotClosed at the opener, got {other:?}"),
    }
}

#[test]
fn parse_errors_accumulate() {
    let session = Session::new();
    let query = session.parse("1 + ;\n2 + ;");

    let operands: Vec<_> = query.errors
                                .iter()
                                .filter(|e| matches!(e, ParseError::MissingOperand { .. }))
                                .collect();
    assert_eq!(operands.len(), 2, "both statements report, got {:?}", query.errors);
    assert_eq!(operands[0].position().line, 1);
    assert_eq!(operands[1].position().line, 2);
}

#[test]
fn keyword_shape_errors() {
    let session = Session::new();

    let query = session.parse("if (1) 1; else 2; else 3;");
    assert!(query.errors
                 .iter()
                 .any(|e| matches!(e, ParseError::SingleElse { .. })),
            "got {:?}",
            query.errors);

    let query = session.parse("else 2;");
    assert!(query.errors
                 .iter()
                 .any(|e| matches!(e, ParseError::IfRequired { .. })));

    let query = session.parse("for (x = 0; x < 3) { }");
    assert!(query.errors
                 .iter()
                 .any(|e| matches!(e, ParseError::ForArguments { found: 2, .. })));

    let query = session.parse("f = (a, 1) => a");
    assert!(query.errors
                 .iter()
                 .any(|e| matches!(e, ParseError::FunctionArgumentsSymbols { .. })));

    let query = session.parse("3 = x");
    assert!(query.errors
                 .iter()
                 .any(|e| matches!(e, ParseError::AssignTargetInvalid { .. })));
}

#[test]
fn runtime_failure_leaves_the_context_usable() {
    let mut session = Session::new();

    assert!(session.run("x = 5").is_ok());
    assert!(session.run("x + nothing_here").is_err());

    // Everything assigned before the failure is still there.
    match session.run("x") {
        Ok(Some(Value::Scalar(s))) => assert_eq!(s, Scalar::real(5.0)),
        other => panic!("context lost state after a runtime error: {other:?}"),
    }
}

#[test]
fn comments_are_ignored() {
    assert_real("// leading note\n1 + 1 // trailing note", 2.0);
}

struct RecordingHost {
    notes: std::cell::RefCell<Vec<String>>,
    reply: String,
}

impl matrica::Host for RecordingHost {
    fn notify(&self, message: &str) {
        self.notes.borrow_mut().push(message.to_string());
    }

    fn request_input(&self, _prompt: &str) -> String {
        self.reply.clone()
    }

    fn pause(&self) {}
}

#[test]
fn host_callbacks_reach_the_embedding_host() {
    let host = std::rc::Rc::new(RecordingHost { notes: std::cell::RefCell::new(Vec::new()),
                                                reply: "21".to_string(), });

    let mut session = Session::new();
    session.context.set_host(host.clone());

    session.run("print(\"hello\")").unwrap();
    assert_eq!(host.notes.borrow().as_slice(), ["hello".to_string()]);

    match session.run("input(\"? \")").unwrap() {
        Some(Value::Text(s)) => assert_eq!(s, "21"),
        other => panic!("input() should return the host's string, got {other:?}"),
    }
}
