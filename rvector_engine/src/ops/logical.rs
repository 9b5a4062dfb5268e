//! Elementwise logical operators with three-valued (NA-aware) logic.
//!
//! `FALSE & NA` is `FALSE` and `TRUE | NA` is `TRUE`: a deciding operand
//! decides regardless of missingness. Operands must be logical, numeric
//! or complex; truth is "nonzero".

use crate::coerce::coerce_data;
use crate::error::{Conditions, RError, RResult};
use crate::recycle::recycled_length;
use crate::scalar::{ScalarKind, LOGICAL_FALSE, LOGICAL_TRUE, NA_LOGICAL};
use crate::value::{RVector, VectorData};

use super::merge_elementwise_attrs;

pub(crate) fn truth_data(v: &RVector, conds: &mut Conditions) -> RResult<Vec<i32>> {
    if !v.kind().is_arithmetic() {
        return Err(RError::IncompatibleTypes(
            "operations are possible only for numeric, logical or complex types".to_string(),
        ));
    }
    match coerce_data(v, ScalarKind::Logical, conds)? {
        VectorData::Logical(bits) => Ok(bits),
        _ => unreachable!("logical coercion returned a non-logical buffer"),
    }
}

fn binary(
    a: &RVector,
    b: &RVector,
    conds: &mut Conditions,
    combine: impl Fn(i32, i32) -> i32,
) -> RResult<RVector> {
    let ta = truth_data(a, conds)?;
    let tb = truth_data(b, conds)?;
    let n = recycled_length(ta.len(), tb.len(), conds);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(combine(ta[i % ta.len()], tb[i % tb.len()]));
    }
    let mut result = RVector::logical(out);
    merge_elementwise_attrs(&mut result, a, b)?;
    Ok(result)
}

/// `&`: FALSE dominates NA.
pub fn logical_and(a: &RVector, b: &RVector, conds: &mut Conditions) -> RResult<RVector> {
    binary(a, b, conds, |x, y| {
        if x == LOGICAL_FALSE || y == LOGICAL_FALSE {
            LOGICAL_FALSE
        } else if x == NA_LOGICAL || y == NA_LOGICAL {
            NA_LOGICAL
        } else {
            LOGICAL_TRUE
        }
    })
}

/// `|`: TRUE dominates NA.
pub fn logical_or(a: &RVector, b: &RVector, conds: &mut Conditions) -> RResult<RVector> {
    binary(a, b, conds, |x, y| {
        if (x != NA_LOGICAL && x != LOGICAL_FALSE) || (y != NA_LOGICAL && y != LOGICAL_FALSE) {
            LOGICAL_TRUE
        } else if x == NA_LOGICAL || y == NA_LOGICAL {
            NA_LOGICAL
        } else {
            LOGICAL_FALSE
        }
    })
}

/// `xor`: NA contaminates, unlike `&`/`|` there is no deciding operand.
pub fn logical_xor(a: &RVector, b: &RVector, conds: &mut Conditions) -> RResult<RVector> {
    binary(a, b, conds, |x, y| {
        if x == NA_LOGICAL || y == NA_LOGICAL {
            NA_LOGICAL
        } else if (x != LOGICAL_FALSE) != (y != LOGICAL_FALSE) {
            LOGICAL_TRUE
        } else {
            LOGICAL_FALSE
        }
    })
}

/// Unary `!`.
pub fn logical_not(a: &RVector, conds: &mut Conditions) -> RResult<RVector> {
    let bits = truth_data(a, conds)?;
    let out: Vec<i32> = bits
        .into_iter()
        .map(|x| {
            if x == NA_LOGICAL {
                NA_LOGICAL
            } else if x == LOGICAL_FALSE {
                LOGICAL_TRUE
            } else {
                LOGICAL_FALSE
            }
        })
        .collect();
    let mut result = RVector::logical(out);
    result.copy_shape_attrs_from(a);
    Ok(result)
}
