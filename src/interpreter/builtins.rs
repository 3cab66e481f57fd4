//! The built-in function and constant catalogue.
//!
//! This is the representative slice of the full catalogue, registered
//! through the same `inventory` submissions an external extension would
//! use: each entry carries its metadata record and plugs into the context
//! at construction. Nothing here is special-cased by the evaluator.

use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    registry::{Arity, BuiltinConstant, BuiltinFunction},
    value::{core::Value, scalar::Scalar},
};

fn unary_real(args: &[Value], line: usize, f: fn(f64) -> f64) -> EvalResult<Value> {
    Ok(Value::Scalar(Scalar::real(f(args[0].as_real(line)?))))
}

fn sqrt(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(args[0].as_scalar(line)?.sqrt()))
}

fn conj(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(args[0].as_scalar(line)?.conj()))
}

fn abs(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Scalar(s) => Ok(Value::Scalar(Scalar::real(s.abs()))),
        Value::Matrix(m) => Ok(Value::Matrix(m.map(|cell| Scalar::real(cell.abs())))),
        other => Err(crate::error::RuntimeError::KindMismatch { expected:
                                                                    "a scalar or matrix"
                                                                                        .to_string(),
                                                                found:    other.kind_name(),
                                                                line, }),
    }
}

fn log(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let x = args[0].as_real(line)?;
    match args.get(1) {
        Some(base) => Ok(Value::Scalar(Scalar::real(x.log(base.as_real(line)?)))),
        None => Ok(Value::Scalar(Scalar::real(x.log10()))),
    }
}

fn min(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let a = args[0].as_real(line)?;
    let b = args[1].as_real(line)?;
    Ok(Value::Scalar(Scalar::real(a.min(b))))
}

fn max(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let a = args[0].as_real(line)?;
    let b = args[1].as_real(line)?;
    Ok(Value::Scalar(Scalar::real(a.max(b))))
}

#[allow(clippy::cast_precision_loss)]
fn rows(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(Scalar::real(args[0].as_matrix(line)?.rows as f64)))
}

#[allow(clippy::cast_precision_loss)]
fn cols(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Scalar(Scalar::real(args[0].as_matrix(line)?.cols as f64)))
}

/// `size(m)` yields both dimensions at once, so `(r, c) = size(m)` unpacks
/// them positionally.
#[allow(clippy::cast_precision_loss)]
fn size(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let matrix = args[0].as_matrix(line)?;
    Ok(Value::ArgumentList(vec![Value::Scalar(Scalar::real(matrix.rows as f64)),
                                Value::Scalar(Scalar::real(matrix.cols as f64)),]))
}

fn transpose(_context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Matrix(args[0].as_matrix(line)?.transpose()))
}

fn list(_context: &mut Context, args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::ArgumentList(args.to_vec()))
}

fn print(context: &mut Context, args: &[Value], _line: usize) -> EvalResult<Value> {
    context.host().notify(&format!("{}", args[0]));
    Ok(args[0].clone())
}

fn input(context: &mut Context, args: &[Value], line: usize) -> EvalResult<Value> {
    let prompt = match args.first() {
        Some(value) => value.as_text(line)?.to_string(),
        None => String::new(),
    };
    Ok(Value::Text(context.host().request_input(&prompt)))
}

fn pause(context: &mut Context, _args: &[Value], _line: usize) -> EvalResult<Value> {
    context.host().pause();
    Ok(Value::Scalar(Scalar::real(0.0)))
}

inventory::submit! {
    BuiltinFunction { name: "sin", description: "Sine of a real angle in radians.",
                      category: "trigonometry", example: "sin(pi / 2)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::sin) }
}
inventory::submit! {
    BuiltinFunction { name: "cos", description: "Cosine of a real angle in radians.",
                      category: "trigonometry", example: "cos(0)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::cos) }
}
inventory::submit! {
    BuiltinFunction { name: "tan", description: "Tangent of a real angle in radians.",
                      category: "trigonometry", example: "tan(0)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::tan) }
}
inventory::submit! {
    BuiltinFunction { name: "exp", description: "e raised to a real power.",
                      category: "exponential", example: "exp(1)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::exp) }
}
inventory::submit! {
    BuiltinFunction { name: "ln", description: "Natural logarithm of a positive real.",
                      category: "exponential", example: "ln(e)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::ln) }
}
inventory::submit! {
    BuiltinFunction { name: "log", description: "Logarithm, base 10 or an explicit base.",
                      category: "exponential", example: "log(100) or log(8, 2)", link: "",
                      arity: Arity::OneOf(&[1, 2]), implementation: log }
}
inventory::submit! {
    BuiltinFunction { name: "sqrt", description: "Principal square root; complex-aware.",
                      category: "exponential", example: "sqrt(-4)", link: "",
                      arity: Arity::Exact(1), implementation: sqrt }
}
inventory::submit! {
    BuiltinFunction { name: "conj", description: "Complex conjugate.",
                      category: "complex", example: "conj(1 + 2i)", link: "",
                      arity: Arity::Exact(1), implementation: conj }
}
inventory::submit! {
    BuiltinFunction { name: "abs", description: "Magnitude of a scalar, cell-wise on a matrix.",
                      category: "numeric", example: "abs(-5)", link: "",
                      arity: Arity::Exact(1), implementation: abs }
}
inventory::submit! {
    BuiltinFunction { name: "floor", description: "Largest integer not above a real.",
                      category: "rounding", example: "floor(3.7)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::floor) }
}
inventory::submit! {
    BuiltinFunction { name: "ceil", description: "Smallest integer not below a real.",
                      category: "rounding", example: "ceil(3.2)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::ceil) }
}
inventory::submit! {
    BuiltinFunction { name: "round", description: "Nearest integer to a real.",
                      category: "rounding", example: "round(3.5)", link: "",
                      arity: Arity::Exact(1),
                      implementation: |_c, args, line| unary_real(args, line, f64::round) }
}
inventory::submit! {
    BuiltinFunction { name: "min", description: "Smaller of two reals.",
                      category: "numeric", example: "min(2, 3)", link: "",
                      arity: Arity::Exact(2), implementation: min }
}
inventory::submit! {
    BuiltinFunction { name: "max", description: "Larger of two reals.",
                      category: "numeric", example: "max(2, 3)", link: "",
                      arity: Arity::Exact(2), implementation: max }
}
inventory::submit! {
    BuiltinFunction { name: "rows", description: "Row count of a matrix.",
                      category: "matrix", example: "rows([1, 2; 3, 4])", link: "",
                      arity: Arity::Exact(1), implementation: rows }
}
inventory::submit! {
    BuiltinFunction { name: "cols", description: "Column count of a matrix.",
                      category: "matrix", example: "cols([1, 2; 3, 4])", link: "",
                      arity: Arity::Exact(1), implementation: cols }
}
inventory::submit! {
    BuiltinFunction { name: "size", description: "Both dimensions of a matrix as an argument list.",
                      category: "matrix", example: "(r, c) = size(m)", link: "",
                      arity: Arity::Exact(1), implementation: size }
}
inventory::submit! {
    BuiltinFunction { name: "transpose", description: "Transpose of a matrix.",
                      category: "matrix", example: "transpose([1, 2; 3, 4])", link: "",
                      arity: Arity::Exact(1), implementation: transpose }
}
inventory::submit! {
    BuiltinFunction { name: "list", description: "Packs its arguments into an argument list.",
                      category: "core", example: "(a, b) = list(1, 2)", link: "",
                      arity: Arity::Any, implementation: list }
}
inventory::submit! {
    BuiltinFunction { name: "print", description: "Sends a value to the host and yields it back.",
                      category: "io", example: "print(\"hello\")", link: "",
                      arity: Arity::Exact(1), implementation: print }
}
inventory::submit! {
    BuiltinFunction { name: "input", description: "Blocks until the host supplies a line of text.",
                      category: "io", example: "name = input(\"name? \")", link: "",
                      arity: Arity::OneOf(&[0, 1]), implementation: input }
}
inventory::submit! {
    BuiltinFunction { name: "pause", description: "Blocks until the host acknowledges.",
                      category: "io", example: "pause()", link: "",
                      arity: Arity::Exact(0), implementation: pause }
}

inventory::submit! {
    BuiltinConstant { name: "pi", description: "The circle constant.",
                      value: Scalar::new(std::f64::consts::PI, 0.0) }
}
inventory::submit! {
    BuiltinConstant { name: "e", description: "Euler's number.",
                      value: Scalar::new(std::f64::consts::E, 0.0) }
}
inventory::submit! {
    BuiltinConstant { name: "tau", description: "2 pi.",
                      value: Scalar::new(std::f64::consts::TAU, 0.0) }
}
inventory::submit! {
    BuiltinConstant { name: "i", description: "The imaginary unit.",
                      value: Scalar::new(0.0, 1.0) }
}
inventory::submit! {
    BuiltinConstant { name: "inf", description: "Positive infinity.",
                      value: Scalar::new(f64::INFINITY, 0.0) }
}
