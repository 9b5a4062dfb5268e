//! Numeric reductions: `sum`, `prod`, `mean`, `max`, `min`, `range`,
//! and the running reduction `cumsum`.
//!
//! The variadic reductions fold over every positional argument in call
//! order, so `sum(1:3, 4)` behaves like `sum(c(1:3, 4))` without
//! building the concatenation.

use crate::builtins::CallArgs;
use crate::error::{Condition, Conditions, RError, RResult};
use crate::scalar::{na_real, Complex, ScalarKind, NA_INTEGER, NA_LOGICAL};
use crate::value::{RVector, Value, VectorData};

/// The widest kind among the arguments, with logical counting as
/// integer. Character and list arguments are rejected up front.
fn reduction_kind(args: &CallArgs, builtin: &str) -> RResult<ScalarKind> {
    let mut kind = ScalarKind::Integer;
    for value in &args.positional {
        let Value::Vector(v) = value else { continue };
        match v.kind() {
            ScalarKind::Logical | ScalarKind::Raw => {}
            ScalarKind::Integer | ScalarKind::Double | ScalarKind::Complex => {
                kind = kind.max(v.kind());
            }
            other => {
                return Err(RError::ArgumentError(format!(
                    "invalid 'type' ({}) of argument to '{}'",
                    other.name(),
                    builtin
                )))
            }
        }
    }
    Ok(kind)
}

/// Iterate the elements of every argument as doubles. Only the strict
/// NA sentinel counts as missing; an ordinary NaN is visited like any
/// other double so it stays contagious through the accumulator.
/// `na_rm` removes both (as `is.na` is true for both). Returns false
/// if an unremoved NA was seen.
fn fold_doubles<F: FnMut(f64)>(
    args: &CallArgs,
    na_rm: bool,
    mut visit: F,
) -> bool {
    let mut clean = true;
    for value in &args.positional {
        let Value::Vector(v) = value else { continue };
        for i in 0..v.len() {
            if v.data.is_na_strict(i) {
                if !na_rm {
                    clean = false;
                }
                continue;
            }
            if na_rm && v.is_na(i) {
                continue;
            }
            let x = match &v.data {
                VectorData::Logical(e) | VectorData::Integer(e) => e[i] as f64,
                VectorData::Double(e) => e[i],
                VectorData::Raw(e) => e[i] as f64,
                _ => unreachable!("reduction_kind admits only numeric data"),
            };
            visit(x);
        }
    }
    clean
}

fn fold_complexes<F: FnMut(Complex)>(args: &CallArgs, na_rm: bool, mut visit: F) -> bool {
    let mut clean = true;
    for value in &args.positional {
        let Value::Vector(v) = value else { continue };
        for i in 0..v.len() {
            if v.data.is_na_strict(i) {
                if !na_rm {
                    clean = false;
                }
                continue;
            }
            if na_rm && v.is_na(i) {
                continue;
            }
            let z = match &v.data {
                VectorData::Logical(e) | VectorData::Integer(e) => Complex::from(e[i] as f64),
                VectorData::Double(e) => Complex::from(e[i]),
                VectorData::Complex(e) => e[i],
                VectorData::Raw(e) => Complex::from(e[i] as f64),
                _ => unreachable!("reduction_kind admits only numeric data"),
            };
            visit(z);
        }
    }
    clean
}

pub(crate) fn sum(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let na_rm = args.flag("na.rm", false)?;
    match reduction_kind(args, "sum")? {
        ScalarKind::Complex => {
            let mut acc = Complex { re: 0.0, im: 0.0 };
            let clean = fold_complexes(args, na_rm, |z| acc = acc.add(z));
            let out = if clean { acc } else { Complex::na() };
            Ok(Value::Vector(RVector::complex(vec![out])))
        }
        ScalarKind::Double => {
            let mut acc = 0.0;
            let clean = fold_doubles(args, na_rm, |x| acc += x);
            let out = if clean { acc } else { na_real() };
            Ok(Value::Vector(RVector::scalar_double(out)))
        }
        _ => {
            // Integer sum accumulates in i64 and reports overflow as NA.
            let mut acc: i64 = 0;
            let clean = fold_doubles(args, na_rm, |x| acc += x as i64);
            let out = if !clean {
                NA_INTEGER
            } else if acc < i32::MIN as i64 + 1 || acc > i32::MAX as i64 {
                conds.raise(Condition::IntegerOverflow);
                NA_INTEGER
            } else {
                acc as i32
            };
            Ok(Value::Vector(RVector::scalar_integer(out)))
        }
    }
}

/// `prod` always widens to double (or complex), matching the identity
/// `prod(integer(0)) == 1`.
pub(crate) fn prod(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let na_rm = args.flag("na.rm", false)?;
    if reduction_kind(args, "prod")? == ScalarKind::Complex {
        let mut acc = Complex { re: 1.0, im: 0.0 };
        let clean = fold_complexes(args, na_rm, |z| acc = acc.mul(z));
        let out = if clean { acc } else { Complex::na() };
        return Ok(Value::Vector(RVector::complex(vec![out])));
    }
    let mut acc = 1.0;
    let clean = fold_doubles(args, na_rm, |x| acc *= x);
    let out = if clean { acc } else { na_real() };
    Ok(Value::Vector(RVector::scalar_double(out)))
}

pub(crate) fn mean(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let na_rm = args.flag("na.rm", false)?;
    let x = args.require_vector(0, "mean")?;
    let single = CallArgs::positional(vec![Value::Vector(x.clone())]);
    if reduction_kind(&single, "mean")? == ScalarKind::Complex {
        let mut acc = Complex { re: 0.0, im: 0.0 };
        let mut count = 0usize;
        let clean = fold_complexes(&single, na_rm, |z| {
            acc = acc.add(z);
            count += 1;
        });
        let out = if !clean {
            Complex::na()
        } else {
            acc.div(Complex::from(count as f64))
        };
        return Ok(Value::Vector(RVector::complex(vec![out])));
    }
    let mut acc = 0.0;
    let mut count = 0usize;
    let clean = fold_doubles(&single, na_rm, |v| {
        acc += v;
        count += 1;
    });
    let out = if !clean { na_real() } else { acc / count as f64 };
    Ok(Value::Vector(RVector::scalar_double(out)))
}

/// `max` (maximum = true) and `min` share one implementation. Character
/// arguments compare bytewise; complex arguments are rejected.
pub(crate) fn extreme(
    args: &CallArgs,
    conds: &mut Conditions,
    maximum: bool,
) -> RResult<Value> {
    let builtin = if maximum { "max" } else { "min" };
    let na_rm = args.flag("na.rm", false)?;

    let mut character = false;
    for value in &args.positional {
        let Value::Vector(v) = value else { continue };
        match v.kind() {
            ScalarKind::Character => character = true,
            ScalarKind::Complex | ScalarKind::List => {
                return Err(RError::ArgumentError(format!(
                    "invalid 'type' ({}) of argument to '{}'",
                    v.kind().name(),
                    builtin
                )))
            }
            _ => {}
        }
    }

    if character {
        let mut best: Option<String> = None;
        let mut saw_na = false;
        for value in &args.positional {
            let Value::Vector(v) = value else { continue };
            for i in 0..v.len() {
                let s = crate::coerce::elem_to_string(&v.data, i)?;
                match s {
                    None => saw_na = true,
                    Some(s) => {
                        let better = match &best {
                            None => true,
                            Some(b) => {
                                if maximum {
                                    s.as_bytes() > b.as_bytes()
                                } else {
                                    s.as_bytes() < b.as_bytes()
                                }
                            }
                        };
                        if better {
                            best = Some(s);
                        }
                    }
                }
            }
        }
        if saw_na && !na_rm {
            return Ok(Value::Vector(RVector::character(vec![None])));
        }
        return match best {
            Some(s) => Ok(Value::Vector(RVector::scalar_string(&s))),
            None => Err(RError::ArgumentError(format!(
                "no non-missing character arguments to '{}'",
                builtin
            ))),
        };
    }

    let kind = reduction_kind(args, builtin)?;
    let mut best: Option<f64> = None;
    let mut saw_nan = false;
    let clean = fold_doubles(args, na_rm, |x| {
        if x.is_nan() {
            saw_nan = true;
            return;
        }
        let better = match best {
            None => true,
            Some(b) => if maximum { x > b } else { x < b },
        };
        if better {
            best = Some(x);
        }
    });

    if !clean {
        let out = if kind == ScalarKind::Double {
            RVector::double(vec![na_real()])
        } else {
            RVector::integer(vec![NA_INTEGER])
        };
        return Ok(Value::Vector(out));
    }
    if saw_nan {
        // NaN beats every ordinary value but loses to NA above.
        return Ok(Value::Vector(RVector::scalar_double(f64::NAN)));
    }
    match best {
        Some(x) => {
            let out = if kind == ScalarKind::Double {
                RVector::scalar_double(x)
            } else {
                RVector::scalar_integer(x as i32)
            };
            Ok(Value::Vector(out))
        }
        None => {
            // No non-missing arguments: infinite identity, as a double.
            conds.raise(Condition::EmptyReduction);
            let out = if maximum { f64::NEG_INFINITY } else { f64::INFINITY };
            Ok(Value::Vector(RVector::scalar_double(out)))
        }
    }
}

pub(crate) fn range(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let lo = extreme(args, conds, false)?;
    let hi = extreme(args, conds, true)?;
    crate::recycle::concat(&[&lo, &hi], conds)
}

/// Running sum. Logical input widens to double (`cumsum(NA)` is
/// `NA_real_`), integer input stays integer with overflow turning the
/// tail to NA, and once an NA is seen every later element is NA.
pub(crate) fn cumsum(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "cumsum")?;
    let mut out = match &x.data {
        VectorData::Integer(e) => {
            let mut acc: i64 = 0;
            let mut poisoned = false;
            let mut result = Vec::with_capacity(e.len());
            for &v in e {
                if poisoned || v == NA_INTEGER {
                    poisoned = true;
                    result.push(NA_INTEGER);
                    continue;
                }
                acc += v as i64;
                if acc < i32::MIN as i64 + 1 || acc > i32::MAX as i64 {
                    conds.raise(Condition::IntegerOverflow);
                    poisoned = true;
                    result.push(NA_INTEGER);
                } else {
                    result.push(acc as i32);
                }
            }
            RVector::integer(result)
        }
        VectorData::Logical(e) => {
            let mut acc = 0.0;
            let mut poisoned = false;
            let mut result = Vec::with_capacity(e.len());
            for &v in e {
                if poisoned || v == NA_LOGICAL {
                    poisoned = true;
                    result.push(na_real());
                    continue;
                }
                acc += if v != 0 { 1.0 } else { 0.0 };
                result.push(acc);
            }
            RVector::double(result)
        }
        VectorData::Double(e) => {
            let mut acc = 0.0;
            let mut poisoned = false;
            let mut result = Vec::with_capacity(e.len());
            for i in 0..e.len() {
                if poisoned || x.data.is_na_strict(i) {
                    poisoned = true;
                    result.push(na_real());
                    continue;
                }
                // A plain NaN is not poisoned away; it propagates
                // through the accumulator arithmetic itself.
                acc += e[i];
                result.push(acc);
            }
            RVector::double(result)
        }
        VectorData::Complex(e) => {
            let mut acc = Complex { re: 0.0, im: 0.0 };
            let mut poisoned = false;
            let mut result = Vec::with_capacity(e.len());
            for i in 0..e.len() {
                if poisoned || x.data.is_na_strict(i) {
                    poisoned = true;
                    result.push(Complex::na());
                    continue;
                }
                acc = acc.add(e[i]);
                result.push(acc);
            }
            RVector::complex(result)
        }
        VectorData::Raw(e) => {
            let mut acc: i64 = 0;
            let mut result = Vec::with_capacity(e.len());
            for &v in e {
                acc += v as i64;
                result.push(acc as i32);
            }
            RVector::integer(result)
        }
        other => {
            return Err(RError::ArgumentError(format!(
                "invalid 'type' ({}) of argument to 'cumsum'",
                other.kind().name()
            )))
        }
    };
    // Names survive a running reduction; dim does not apply here.
    if let Some(names) = x.attr("names") {
        out.set_attr("names", Some(names.clone()))?;
    }
    Ok(Value::Vector(out))
}
