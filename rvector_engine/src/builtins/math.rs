//! Elementwise mathematical builtins: `log` (with base), `log2`,
//! `log10`, `exp`, `sqrt`, `abs`, `floor`, `ceiling`, `round`, `trunc`.
//!
//! Domain errors (log of a negative, sqrt of a negative) produce NaN
//! plus a `NaNProduced` condition instead of failing the call.

use crate::builtins::{BuiltinId, CallArgs};
use crate::coerce::coerced;
use crate::error::{Condition, Conditions, RError, RResult};
use crate::scalar::{is_na_real, ScalarKind, NA_INTEGER};
use crate::value::{RVector, Value, VectorData};

fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let diff = x - floor;
    if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

fn scalar_base(args: &CallArgs, conds: &mut Conditions) -> RResult<Option<f64>> {
    let base = args.named("base").or_else(|| args.arg(1));
    match base {
        None => Ok(None),
        Some(v) => {
            let v = coerced(v.expect_vector("base")?, ScalarKind::Double, conds)?;
            match v.doubles() {
                Some([b]) => Ok(Some(*b)),
                _ => Err(RError::ArgumentError("invalid 'base' argument".to_string())),
            }
        }
    }
}

fn scalar_digits(args: &CallArgs, conds: &mut Conditions) -> RResult<i32> {
    let digits = args.named("digits").or_else(|| args.arg(1));
    match digits {
        None => Ok(0),
        Some(v) => {
            let v = coerced(v.expect_vector("digits")?, ScalarKind::Integer, conds)?;
            match v.integers() {
                Some([d]) if *d != NA_INTEGER => Ok(*d),
                _ => Err(RError::ArgumentError(
                    "invalid 'digits' argument".to_string(),
                )),
            }
        }
    }
}

pub(crate) fn unary_math(
    id: BuiltinId,
    args: &CallArgs,
    conds: &mut Conditions,
) -> RResult<Value> {
    let builtin = match id {
        BuiltinId::Log => "log",
        BuiltinId::Log2 => "log2",
        BuiltinId::Log10 => "log10",
        BuiltinId::Exp => "exp",
        BuiltinId::Sqrt => "sqrt",
        BuiltinId::Abs => "abs",
        BuiltinId::Floor => "floor",
        BuiltinId::Ceiling => "ceiling",
        BuiltinId::Round => "round",
        BuiltinId::Trunc => "trunc",
        _ => unreachable!("not a math builtin"),
    };
    let x = args.require_vector(0, builtin)?;
    match x.kind() {
        ScalarKind::Logical | ScalarKind::Integer | ScalarKind::Double => {}
        other => {
            return Err(RError::UnsupportedOperation(format!(
                "non-numeric argument ({}) to mathematical function '{}'",
                other.name(),
                builtin
            )))
        }
    }

    // Integer-preserving cases keep their storage kind.
    if let VectorData::Integer(e) = &x.data {
        let preserved = match id {
            BuiltinId::Abs => Some(
                e.iter()
                    .map(|&v| if v == NA_INTEGER { v } else { v.wrapping_abs() })
                    .collect::<Vec<i32>>(),
            ),
            BuiltinId::Floor | BuiltinId::Ceiling | BuiltinId::Trunc | BuiltinId::Round => {
                Some(e.clone())
            }
            _ => None,
        };
        if let Some(values) = preserved {
            let mut out = RVector::integer(values);
            out.copy_shape_attrs_from(x);
            return Ok(Value::Vector(out));
        }
    }

    let base = if id == BuiltinId::Log {
        scalar_base(args, conds)?
    } else {
        None
    };
    let digits = if id == BuiltinId::Round {
        scalar_digits(args, conds)?
    } else {
        0
    };

    let input = coerced(x, ScalarKind::Double, conds)?;
    let e = input.doubles().unwrap_or(&[]);
    let mut out = Vec::with_capacity(e.len());
    for &v in e {
        if is_na_real(v) {
            out.push(v);
            continue;
        }
        let r = match id {
            BuiltinId::Log => match base {
                None => v.ln(),
                Some(b) => v.ln() / b.ln(),
            },
            BuiltinId::Log2 => v.log2(),
            BuiltinId::Log10 => v.log10(),
            BuiltinId::Exp => v.exp(),
            BuiltinId::Sqrt => v.sqrt(),
            BuiltinId::Abs => v.abs(),
            BuiltinId::Floor => v.floor(),
            BuiltinId::Ceiling => v.ceil(),
            BuiltinId::Round => {
                if digits == 0 {
                    round_half_even(v)
                } else {
                    let factor = 10f64.powi(digits);
                    round_half_even(v * factor) / factor
                }
            }
            BuiltinId::Trunc => v.trunc(),
            _ => unreachable!(),
        };
        if r.is_nan() && !v.is_nan() {
            conds.raise(Condition::NaNProduced);
        }
        out.push(r);
    }
    let mut result = RVector::double(out);
    result.copy_shape_attrs_from(x);
    Ok(Value::Vector(result))
}
