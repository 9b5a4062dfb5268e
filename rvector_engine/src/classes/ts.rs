//! Regular time series: a numeric vector plus a `tsp` attribute
//! `c(start, end, frequency)` and the `ts` class tag. Elementwise
//! arithmetic keeps the sampling description.

use crate::builtins::CallArgs;
use crate::coerce::coerced;
use crate::error::{Conditions, RError, RResult};
use crate::ops::{self, ArithOp};
use crate::scalar::ScalarKind;
use crate::value::{RVector, Value};

fn scalar_numeric(args: &CallArgs, name: &str, default: f64, conds: &mut Conditions) -> RResult<f64> {
    match args.named(name) {
        None => Ok(default),
        Some(v) => {
            let v = coerced(v.expect_vector(name)?, ScalarKind::Double, conds)?;
            match v.doubles() {
                Some([x]) if x.is_finite() => Ok(*x),
                _ => Err(RError::ArgumentError(format!(
                    "invalid '{}' argument",
                    name
                ))),
            }
        }
    }
}

/// `ts(data, start = 1, frequency = 1)`.
pub(crate) fn ts(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let data = args.require_vector(0, "ts")?;
    if !data.kind().is_arithmetic() {
        return Err(RError::ArgumentError(
            "'ts' object must have one or more observations".to_string(),
        ));
    }
    if data.is_empty() {
        return Err(RError::ArgumentError(
            "'ts' object must have one or more observations".to_string(),
        ));
    }
    let start = scalar_numeric(args, "start", 1.0, conds)?;
    let frequency = scalar_numeric(args, "frequency", 1.0, conds)?;
    if frequency <= 0.0 {
        return Err(RError::ArgumentError(
            "invalid 'frequency' argument".to_string(),
        ));
    }
    let end = start + (data.len() - 1) as f64 / frequency;

    let mut out = data.unclassed();
    out.set_attr("tsp", Some(RVector::double(vec![start, end, frequency])))?;
    out.set_attr("class", Some(RVector::strings(vec!["ts"])))?;
    Ok(Value::Vector(out))
}

/// The elementwise arithmetic methods: compute on the bare data, then
/// restore `tsp` and the class from the series operand.
fn arith_keeping_tsp(op: ArithOp, args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let a = args.require(0, op.as_str())?;
    let b = args.require(1, op.as_str())?;
    let source = [a, b]
        .into_iter()
        .find_map(|v| match v {
            Value::Vector(v) if v.has_class("ts") => Some(v.clone()),
            _ => None,
        })
        .ok_or_else(|| {
            RError::UnsupportedOperation(format!(
                "'{}' dispatched on ts without a ts operand",
                op.as_str()
            ))
        })?;

    let bare = |v: &Value| -> RResult<RVector> {
        Ok(v.expect_vector(op.as_str())?.unclassed())
    };
    let mut out = ops::arith(op, &bare(a)?, &bare(b)?, conds)?;
    if out.len() == source.len() {
        if let Some(tsp) = source.attr("tsp") {
            out.set_attr("tsp", Some(tsp.clone()))?;
        }
        out.set_attr("class", Some(RVector::strings(vec!["ts"])))?;
    }
    Ok(Value::Vector(out))
}

pub(crate) fn add(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    arith_keeping_tsp(ArithOp::Add, args, conds)
}

pub(crate) fn sub(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    arith_keeping_tsp(ArithOp::Sub, args, conds)
}

pub(crate) fn mul(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    arith_keeping_tsp(ArithOp::Mul, args, conds)
}

pub(crate) fn div(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    arith_keeping_tsp(ArithOp::Div, args, conds)
}
