//! Uniqueness and membership: `unique`, `duplicated`, `anyDuplicated`,
//! `match`, `%in%`.
//!
//! All of these hash a normalized element key. NA matches NA and NaN
//! matches NaN, but the two never match each other; negative zero
//! hashes as zero so `0` and `-0` collapse.

use std::collections::{HashMap, HashSet};

use crate::builtins::CallArgs;
use crate::coerce::{coerced, common_kind};
use crate::error::{Conditions, RError, RResult};
use crate::scalar::NA_INTEGER;
use crate::value::{RVector, Value, VectorData};

/// A hashable identity for one element, within one vector kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ElemKey {
    Na,
    Num(u64),
    Str(String),
    Cplx(u64, u64),
}

fn num_bits(x: f64) -> u64 {
    if x == 0.0 {
        // Collapses -0.0 into 0.0.
        0.0f64.to_bits()
    } else if x.is_nan() {
        f64::NAN.to_bits()
    } else {
        x.to_bits()
    }
}

fn element_key(v: &RVector, i: usize, builtin: &str) -> RResult<ElemKey> {
    let key = match &v.data {
        VectorData::Logical(e) | VectorData::Integer(e) => {
            if v.is_na(i) {
                ElemKey::Na
            } else {
                ElemKey::Num(num_bits(e[i] as f64))
            }
        }
        VectorData::Double(e) => {
            if v.data.is_na_strict(i) {
                ElemKey::Na
            } else {
                ElemKey::Num(num_bits(e[i]))
            }
        }
        VectorData::Raw(e) => ElemKey::Num(num_bits(e[i] as f64)),
        VectorData::Character(e) => match &e[i] {
            None => ElemKey::Na,
            Some(s) => ElemKey::Str(s.clone()),
        },
        VectorData::Complex(e) => {
            if v.data.is_na_strict(i) {
                ElemKey::Na
            } else {
                ElemKey::Cplx(num_bits(e[i].re), num_bits(e[i].im))
            }
        }
        VectorData::List(_) => {
            return Err(RError::UnsupportedOperation(format!(
                "'{}' is not applicable to lists",
                builtin
            )))
        }
    };
    Ok(key)
}

/// First-occurrence mask: `true` at index i when the element already
/// appeared earlier.
fn duplicate_mask(x: &RVector, builtin: &str) -> RResult<Vec<bool>> {
    let mut seen = HashSet::new();
    let mut mask = Vec::with_capacity(x.len());
    for i in 0..x.len() {
        mask.push(!seen.insert(element_key(x, i, builtin)?));
    }
    Ok(mask)
}

/// Default `unique`: first occurrences in input order, names dropped.
pub(crate) fn unique(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "unique")?;
    let mask = duplicate_mask(x, "unique")?;
    let keep: Vec<usize> = (0..x.len()).filter(|&i| !mask[i]).collect();
    let data = match &x.data {
        VectorData::Logical(e) => VectorData::Logical(keep.iter().map(|&i| e[i]).collect()),
        VectorData::Integer(e) => VectorData::Integer(keep.iter().map(|&i| e[i]).collect()),
        VectorData::Double(e) => VectorData::Double(keep.iter().map(|&i| e[i]).collect()),
        VectorData::Complex(e) => VectorData::Complex(keep.iter().map(|&i| e[i]).collect()),
        VectorData::Character(e) => {
            VectorData::Character(keep.iter().map(|&i| e[i].clone()).collect())
        }
        VectorData::Raw(e) => VectorData::Raw(keep.iter().map(|&i| e[i]).collect()),
        VectorData::List(_) => unreachable!("duplicate_mask rejects lists"),
    };
    Ok(Value::Vector(RVector::new(data)))
}

pub(crate) fn duplicated(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "duplicated")?;
    let mask = duplicate_mask(x, "duplicated")?;
    Ok(Value::Vector(RVector::logical_from_bools(mask)))
}

/// 1-based index of the first duplicate, `0L` when there is none.
pub(crate) fn any_duplicated(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "anyDuplicated")?;
    let mask = duplicate_mask(x, "anyDuplicated")?;
    let pos = mask.iter().position(|&d| d).map_or(0, |i| (i + 1) as i32);
    Ok(Value::Vector(RVector::scalar_integer(pos)))
}

fn as_operand(value: &Value) -> RVector {
    match value.as_vector() {
        Some(v) => v.clone(),
        None => RVector::logical(Vec::new()),
    }
}

fn match_indices(
    x: &Value,
    table: &Value,
    nomatch: i32,
    conds: &mut Conditions,
) -> RResult<Vec<i32>> {
    let x = as_operand(x);
    let table = as_operand(table);
    // Both sides are compared at their common kind, as if coerced.
    let kind = common_kind(x.kind(), table.kind());
    let x = coerced(&x, kind, conds)?;
    let table = coerced(&table, kind, conds)?;

    let mut first_at: HashMap<ElemKey, i32> = HashMap::new();
    for i in 0..table.len() {
        first_at
            .entry(element_key(&table, i, "match")?)
            .or_insert((i + 1) as i32);
    }
    let mut out = Vec::with_capacity(x.len());
    for i in 0..x.len() {
        let key = element_key(&x, i, "match")?;
        out.push(*first_at.get(&key).unwrap_or(&nomatch));
    }
    Ok(out)
}

pub(crate) fn match_positions(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = args.require(0, "match")?;
    let table = args.require(1, "match")?;
    let nomatch = match args.named("nomatch") {
        None => NA_INTEGER,
        Some(v) => {
            let v = v.expect_vector("nomatch")?;
            let coerced = coerced(v, crate::scalar::ScalarKind::Integer, conds)?;
            match coerced.integers() {
                Some([n]) => *n,
                _ => {
                    return Err(RError::ArgumentError(
                        "invalid 'nomatch' value".to_string(),
                    ))
                }
            }
        }
    };
    let out = match_indices(x, table, nomatch, conds)?;
    Ok(Value::Vector(RVector::integer(out)))
}

pub(crate) fn is_element(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = args.require(0, "%in%")?;
    let table = args.require(1, "%in%")?;
    let out = match_indices(x, table, 0, conds)?;
    Ok(Value::Vector(RVector::logical_from_bools(
        out.iter().map(|&p| p != 0).collect(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Conditions;
    use crate::scalar::na_real;

    fn call1(v: RVector) -> CallArgs {
        CallArgs::positional(vec![Value::Vector(v)])
    }

    fn call2(a: RVector, b: RVector) -> CallArgs {
        CallArgs::positional(vec![Value::Vector(a), Value::Vector(b)])
    }

    #[test]
    fn test_unique_keeps_first_occurrences() {
        let mut conds = Conditions::new();
        let out = unique(&call1(RVector::integer(vec![2, 1, 2, 3, 1])), &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::integer(vec![2, 1, 3])));
    }

    #[test]
    fn test_unique_na_and_nan_are_distinct() {
        let mut conds = Conditions::new();
        let out = unique(
            &call1(RVector::double(vec![na_real(), f64::NAN, na_real()])),
            &mut conds,
        )
        .unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::double(vec![na_real(), f64::NAN]))
        );
    }

    #[test]
    fn test_unique_negative_zero_collapses() {
        let mut conds = Conditions::new();
        let out = unique(&call1(RVector::double(vec![0.0, -0.0])), &mut conds).unwrap();
        assert_eq!(out.as_vector().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicated() {
        let mut conds = Conditions::new();
        let out = duplicated(&call1(RVector::strings(vec!["a", "b", "a"])), &mut conds).unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::logical_from_bools(vec![false, false, true]))
        );
    }

    #[test]
    fn test_any_duplicated_reports_position() {
        let mut conds = Conditions::new();
        assert_eq!(
            any_duplicated(&call1(RVector::integer(vec![1, 2, 1, 1])), &mut conds).unwrap(),
            Value::Vector(RVector::scalar_integer(3))
        );
        assert_eq!(
            any_duplicated(&call1(RVector::integer(vec![1, 2])), &mut conds).unwrap(),
            Value::Vector(RVector::scalar_integer(0))
        );
    }

    #[test]
    fn test_match_coerces_to_common_kind() {
        let mut conds = Conditions::new();
        let out = match_positions(
            &call2(RVector::integer(vec![2, 5]), RVector::double(vec![1.0, 2.0])),
            &mut conds,
        )
        .unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::integer(vec![2, NA_INTEGER]))
        );
    }

    #[test]
    fn test_match_na_finds_na() {
        let mut conds = Conditions::new();
        let out = match_positions(
            &call2(
                RVector::double(vec![na_real()]),
                RVector::double(vec![1.0, na_real()]),
            ),
            &mut conds,
        )
        .unwrap();
        assert_eq!(out, Value::Vector(RVector::integer(vec![2])));
    }

    #[test]
    fn test_in_operator() {
        let mut conds = Conditions::new();
        let out = is_element(
            &call2(
                RVector::strings(vec!["a", "z"]),
                RVector::strings(vec!["a", "b"]),
            ),
            &mut conds,
        )
        .unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::logical_from_bools(vec![true, false]))
        );
    }
}
