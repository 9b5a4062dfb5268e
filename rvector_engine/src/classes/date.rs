//! The `Date` class: doubles counting days since 1970-01-01, with
//! ISO `%Y-%m-%d` conversion in both directions.

use crate::builtins::CallArgs;
use crate::error::{Conditions, RError, RResult};
use crate::ops::{self, ArithOp};
use crate::scalar::na_real;
use crate::value::{RVector, Value, VectorData};

/// Days from 1970-01-01 for a proleptic Gregorian civil date.
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = (y - era * 400) as i64;
    let mp = ((m + 9) % 12) as i64;
    let doy = (153 * mp + 2) / 5 + d as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719468
}

/// The inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = z - era * 146097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    (if m <= 2 { y + 1 } else { y }, m, d)
}

fn days_in_month(y: i64, m: u32) -> u32 {
    match m {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (y % 4 == 0 && y % 100 != 0) || y % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn parse_iso_date(s: &str) -> Option<i64> {
    let mut parts = s.trim().splitn(3, '-');
    let y: i64 = parts.next()?.parse().ok()?;
    let m: u32 = parts.next()?.parse().ok()?;
    let d: u32 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&m) || d < 1 || d > days_in_month(y, m) {
        return None;
    }
    Some(days_from_civil(y, m, d))
}

fn classed_date(mut v: RVector) -> RResult<Value> {
    v.set_attr("class", Some(RVector::strings(vec!["Date"])))?;
    Ok(Value::Vector(v))
}

/// `as.Date(x)`: ISO strings parse; numeric values are taken as day
/// counts directly. An unparseable string fails the call.
pub(crate) fn as_date(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "as.Date")?;
    match &x.data {
        VectorData::Character(e) => {
            let mut days = Vec::with_capacity(e.len());
            for s in e {
                days.push(match s {
                    None => na_real(),
                    Some(s) => match parse_iso_date(s) {
                        Some(d) => d as f64,
                        None => {
                            return Err(RError::ArgumentError(format!(
                                "character string '{}' is not in a standard unambiguous format",
                                s
                            )))
                        }
                    },
                });
            }
            classed_date(RVector::double(days))
        }
        VectorData::Integer(_) | VectorData::Double(_) | VectorData::Logical(_) => {
            let v = crate::coerce::coerced(x, crate::scalar::ScalarKind::Double, conds)?;
            classed_date(v)
        }
        other => Err(RError::UnsupportedOperation(format!(
            "as.Date does not accept {} input",
            other.kind().name()
        ))),
    }
}

fn is_date(value: &Value) -> bool {
    matches!(value, Value::Vector(v) if v.has_class("Date"))
}

fn bare(value: &Value, builtin: &str) -> RResult<RVector> {
    Ok(value.expect_vector(builtin)?.unclassed())
}

/// `+.Date`: shifting a date by a day count gives a date; adding two
/// dates is meaningless.
pub(crate) fn add(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let a = args.require(0, "+")?;
    let b = args.require(1, "+")?;
    if is_date(a) && is_date(b) {
        return Err(RError::UnsupportedOperation(
            "binary '+' is not defined for Date objects".to_string(),
        ));
    }
    let out = ops::arith(ArithOp::Add, &bare(a, "+")?, &bare(b, "+")?, conds)?;
    classed_date(out)
}

/// `-.Date`: date minus date is an elapsed-days difftime; date minus
/// count is a date; subtracting a date from a number is meaningless.
pub(crate) fn sub(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let a = args.require(0, "-")?;
    let b = args.require(1, "-")?;
    if !is_date(a) {
        return Err(RError::UnsupportedOperation(
            "can only subtract from Date objects".to_string(),
        ));
    }
    let out = ops::arith(ArithOp::Sub, &bare(a, "-")?, &bare(b, "-")?, conds)?;
    if is_date(b) {
        let mut diff = out;
        diff.set_attr("units", Some(RVector::scalar_string("days")))?;
        diff.set_attr("class", Some(RVector::strings(vec!["difftime"])))?;
        return Ok(Value::Vector(diff));
    }
    classed_date(out)
}

/// `as.character.Date`: back to ISO `%Y-%m-%d`.
pub(crate) fn as_character(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "as.character")?;
    let days = x.doubles().ok_or_else(|| {
        RError::AttributeInvariant("malformed Date: not double storage".to_string())
    })?;
    let out = (0..days.len())
        .map(|i| {
            if x.is_na(i) {
                None
            } else {
                let (y, m, d) = civil_from_days(days[i] as i64);
                Some(format!("{:04}-{:02}-{:02}", y, m, d))
            }
        })
        .collect();
    Ok(Value::Vector(RVector::character(out)))
}
