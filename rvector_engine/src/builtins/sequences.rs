//! Sequence and replication builtins: `rep`, `rep_len`, `seq`,
//! `seq_len`, `seq_along`, and `length`.

use crate::builtins::CallArgs;
use crate::coerce::coerced;
use crate::error::{Conditions, RError, RResult};
use crate::scalar::{ScalarKind, NA_INTEGER};
use crate::value::{RVector, Value, VectorData};

/// A non-negative scalar count argument (`times`, `each`, `length.out`).
fn count_arg(value: &Value, what: &str, conds: &mut Conditions) -> RResult<usize> {
    let v = value.expect_vector(what)?;
    let v = coerced(v, ScalarKind::Integer, conds)?;
    match v.integers() {
        Some([n]) if *n != NA_INTEGER && *n >= 0 => Ok(*n as usize),
        _ => Err(RError::ArgumentError(format!("invalid '{}' argument", what))),
    }
}

fn repeat_data(x: &RVector, counts: &[usize]) -> VectorData {
    fn build<T: Clone>(e: &[T], counts: &[usize]) -> Vec<T> {
        let mut out = Vec::new();
        for (v, &c) in e.iter().zip(counts) {
            for _ in 0..c {
                out.push(v.clone());
            }
        }
        out
    }
    match &x.data {
        VectorData::Logical(e) => VectorData::Logical(build(e, counts)),
        VectorData::Integer(e) => VectorData::Integer(build(e, counts)),
        VectorData::Double(e) => VectorData::Double(build(e, counts)),
        VectorData::Complex(e) => VectorData::Complex(build(e, counts)),
        VectorData::Character(e) => VectorData::Character(build(e, counts)),
        VectorData::Raw(e) => VectorData::Raw(build(e, counts)),
        VectorData::List(e) => VectorData::List(build(e, counts)),
    }
}

fn tile_data(x: &RVector, len: usize) -> VectorData {
    fn build<T: Clone>(e: &[T], len: usize) -> Vec<T> {
        (0..len).map(|i| e[i % e.len()].clone()).collect()
    }
    if x.is_empty() {
        return VectorData::empty(x.kind());
    }
    match &x.data {
        VectorData::Logical(e) => VectorData::Logical(build(e, len)),
        VectorData::Integer(e) => VectorData::Integer(build(e, len)),
        VectorData::Double(e) => VectorData::Double(build(e, len)),
        VectorData::Complex(e) => VectorData::Complex(build(e, len)),
        VectorData::Character(e) => VectorData::Character(build(e, len)),
        VectorData::Raw(e) => VectorData::Raw(build(e, len)),
        VectorData::List(e) => VectorData::List(build(e, len)),
    }
}

/// `rep(x, times, each)`. `each` expands elements in place first;
/// `times` then either tiles the whole vector (scalar) or gives a
/// per-element count (vector of matching length). Names replicate
/// along with their elements.
pub(crate) fn rep(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "rep")?;

    let each = match args.named("each") {
        Some(v) => count_arg(v, "each", conds)?,
        None => 1,
    };
    let mut expanded = if each == 1 {
        x.clone()
    } else {
        let counts = vec![each; x.len()];
        let mut out = RVector::new(repeat_data(x, &counts));
        if let Some(names) = x.attr("names") {
            out.set_attr("names", Some(RVector::new(repeat_data(names, &counts))))?;
        }
        out
    };

    let times = args.named("times").or_else(|| args.arg(1));
    if let Some(times) = times {
        let tv = times.expect_vector("times")?;
        if tv.len() == expanded.len() && tv.len() != 1 {
            // Per-element counts.
            let tv = coerced(tv, ScalarKind::Integer, conds)?;
            let mut counts = Vec::with_capacity(tv.len());
            for &c in tv.integers().unwrap_or(&[]) {
                if c == NA_INTEGER || c < 0 {
                    return Err(RError::ArgumentError(
                        "invalid 'times' argument".to_string(),
                    ));
                }
                counts.push(c as usize);
            }
            let names = expanded.attr("names").cloned();
            let mut out = RVector::new(repeat_data(&expanded, &counts));
            if let Some(names) = names {
                out.set_attr("names", Some(RVector::new(repeat_data(&names, &counts))))?;
            }
            expanded = out;
        } else {
            let t = count_arg(times, "times", conds)?;
            let len = expanded.len() * t;
            let names = expanded.attr("names").cloned();
            let mut out = RVector::new(tile_data(&expanded, len));
            if let Some(names) = names {
                out.set_attr("names", Some(RVector::new(tile_data(&names, len))))?;
            }
            expanded = out;
        }
    }
    Ok(Value::Vector(expanded))
}

/// `rep_len(x, length.out)`: recycle to the exact length, silently
/// and without attributes.
pub(crate) fn rep_len(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "rep_len")?;
    let len = count_arg(args.require(1, "rep_len")?, "length.out", conds)?;
    if x.is_empty() && len > 0 {
        return Err(RError::ArgumentError(
            "cannot rep_len a zero-length vector to a positive length".to_string(),
        ));
    }
    Ok(Value::Vector(RVector::new(tile_data(x, len))))
}

/// A scalar numeric argument for `seq` endpoints and step.
fn endpoint(value: &Value, what: &str, conds: &mut Conditions) -> RResult<f64> {
    let v = value.expect_vector(what)?;
    let v = coerced(v, ScalarKind::Double, conds)?;
    match v.doubles() {
        Some([x]) if !x.is_nan() => Ok(*x),
        _ => Err(RError::ArgumentError(format!(
            "'{}' must be a finite number",
            what
        ))),
    }
}

fn integral(x: f64) -> bool {
    x.fract() == 0.0 && x.abs() <= i32::MAX as f64
}

pub(crate) fn seq(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let from_arg = args.named("from").or_else(|| args.arg(0));
    let to_arg = args.named("to").or_else(|| args.arg(1));
    let by_arg = args.named("by").or_else(|| args.arg(2));
    let length_out = match args.named("length.out") {
        Some(v) => Some(count_arg(v, "length.out", conds)?),
        None => None,
    };

    let from = match from_arg {
        Some(v) => endpoint(v, "from", conds)?,
        None => 1.0,
    };

    // seq(n) counts from 1.
    let (from, to) = match to_arg {
        Some(v) => (from, endpoint(v, "to", conds)?),
        None if by_arg.is_none() && length_out.is_none() => (1.0, from),
        None => {
            return Err(RError::ArgumentError(
                "seq: 'to' is missing".to_string(),
            ))
        }
    };

    if let Some(n) = length_out {
        if by_arg.is_some() {
            return Err(RError::ArgumentError(
                "too many arguments to 'seq'".to_string(),
            ));
        }
        let values = match n {
            0 => Vec::new(),
            1 => vec![from],
            n => {
                let step = (to - from) / (n - 1) as f64;
                (0..n).map(|i| from + step * i as f64).collect()
            }
        };
        return Ok(Value::Vector(RVector::double(values)));
    }

    match by_arg {
        None => {
            let step = if to >= from { 1.0 } else { -1.0 };
            let n = (to - from).abs() as usize + 1;
            if integral(from) && integral(to) {
                let start = from as i32;
                let values = (0..n)
                    .map(|i| start + (i as i32) * step as i32)
                    .collect();
                Ok(Value::Vector(RVector::integer(values)))
            } else {
                let values = (0..n).map(|i| from + step * i as f64).collect();
                Ok(Value::Vector(RVector::double(values)))
            }
        }
        Some(by) => {
            let by = endpoint(by, "by", conds)?;
            if by == 0.0 && from != to {
                return Err(RError::ArgumentError(
                    "invalid '(to - from)/by' in seq(.)".to_string(),
                ));
            }
            if (to - from) * by < 0.0 {
                return Err(RError::ArgumentError(
                    "wrong sign in 'by' argument".to_string(),
                ));
            }
            let n = if from == to {
                1
            } else {
                ((to - from) / by + 1e-10).floor() as usize + 1
            };
            if integral(from) && integral(to) && integral(by) {
                let (start, step) = (from as i32, by as i32);
                let values = (0..n).map(|i| start + step * i as i32).collect();
                return Ok(Value::Vector(RVector::integer(values)));
            }
            let values: Vec<f64> = (0..n).map(|i| from + by * i as f64).collect();
            Ok(Value::Vector(RVector::double(values)))
        }
    }
}

pub(crate) fn seq_len(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let n = count_arg(args.require(0, "seq_len")?, "length.out", conds)?;
    Ok(Value::Vector(RVector::integer(
        (1..=n as i32).collect(),
    )))
}

pub(crate) fn seq_along(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let n = args.require(0, "seq_along")?.len();
    Ok(Value::Vector(RVector::integer(
        (1..=n as i32).collect(),
    )))
}

pub(crate) fn length(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let n = args.require(0, "length")?.len();
    Ok(Value::Vector(RVector::scalar_integer(n as i32)))
}
