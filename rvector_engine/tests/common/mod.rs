//! Shared helpers for integration tests
// Consumed selectively by the individual test targets; keep the whole
// helper set compiled without requiring every file to use every helper.
#![allow(dead_code)]

use rvector_engine::{CallArgs, Conditions, Engine, Evaluated, RError, RVector, Value};

/// Evaluate one builtin call with positional arguments only.
pub fn eval(name: &str, positional: Vec<Value>) -> Result<Evaluated, RError> {
    Engine::new().invoke(name, positional, vec![])
}

/// Evaluate with named arguments as well.
pub fn eval_named(
    name: &str,
    positional: Vec<Value>,
    named: Vec<(&str, Value)>,
) -> Result<Evaluated, RError> {
    let named = named
        .into_iter()
        .map(|(n, v)| (n.to_string(), v))
        .collect();
    Engine::new().invoke(name, positional, named)
}

/// The successful value of a call, panicking on error.
pub fn value_of(name: &str, positional: Vec<Value>) -> Value {
    eval(name, positional)
        .unwrap_or_else(|e| panic!("'{}' failed: {}", name, e))
        .value
}

pub fn int(values: Vec<i32>) -> Value {
    Value::Vector(RVector::integer(values))
}

pub fn dbl(values: Vec<f64>) -> Value {
    Value::Vector(RVector::double(values))
}

pub fn lgl(values: Vec<bool>) -> Value {
    Value::Vector(RVector::logical_from_bools(values))
}

pub fn chr(values: Vec<&str>) -> Value {
    Value::Vector(RVector::strings(values))
}

pub fn scalar_int(v: i32) -> Value {
    Value::Vector(RVector::scalar_integer(v))
}

pub fn scalar_dbl(v: f64) -> Value {
    Value::Vector(RVector::scalar_double(v))
}

pub fn scalar_chr(v: &str) -> Value {
    Value::Vector(RVector::scalar_string(v))
}

pub fn scalar_lgl(v: bool) -> Value {
    Value::Vector(RVector::scalar_logical(v))
}

/// Unwrap a value into its vector, panicking on NULL.
pub fn vector_of(value: Value) -> RVector {
    match value {
        Value::Vector(v) => v,
        Value::Null => panic!("expected a vector, got NULL"),
    }
}

/// Run a method body directly, for tests that poke at dispatch.
pub fn run_args(name: &str, args: &CallArgs) -> Result<Evaluated, RError> {
    Engine::new().invoke_args(name, args)
}

/// A conditions accumulator for direct layer-level calls.
pub fn fresh_conditions() -> Conditions {
    Conditions::new()
}
