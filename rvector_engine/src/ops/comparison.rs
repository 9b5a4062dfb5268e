//! Binary comparison with recycling.
//!
//! Operands promote to their common kind before comparing; string
//! comparison is C-locale byte order. Any NA (or NaN) element compares
//! to NA. Complex values only support `==` and `!=`.

use crate::coerce::{coerce_data, common_kind};
use crate::error::{Conditions, RError, RResult};
use crate::recycle::recycled_length;
use crate::scalar::{ScalarKind, LOGICAL_FALSE, LOGICAL_TRUE, NA_LOGICAL};
use crate::value::{RVector, VectorData};

use super::{merge_elementwise_attrs, CmpOp};

/// Apply a comparison operator elementwise, yielding a logical vector.
pub fn compare(op: CmpOp, a: &RVector, b: &RVector, conds: &mut Conditions) -> RResult<RVector> {
    if a.kind() == ScalarKind::List || b.kind() == ScalarKind::List {
        return Err(RError::IncompatibleTypes(
            "comparison of list objects is not implemented".to_string(),
        ));
    }
    // Raw compares against raw directly; against anything numeric it
    // promotes through integer.
    let target = match common_kind(a.kind(), b.kind()) {
        ScalarKind::Raw => ScalarKind::Raw,
        k if a.kind() == ScalarKind::Raw || b.kind() == ScalarKind::Raw => {
            common_kind(k, ScalarKind::Integer)
        }
        k => k,
    };
    if target == ScalarKind::Complex && !matches!(op, CmpOp::Eq | CmpOp::Ne) {
        return Err(RError::ArgumentError(
            "invalid comparison with complex values".to_string(),
        ));
    }

    let n = recycled_length(a.len(), b.len(), conds);
    let ca = coerce_data(a, target, conds)?;
    let cb = coerce_data(b, target, conds)?;
    let (na, nb) = (a.len(), b.len());

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let (ia, ib) = (i % na.max(1), i % nb.max(1));
        out.push(compare_elem(op, &ca, ia, &cb, ib));
    }

    let mut result = RVector::logical(out);
    merge_elementwise_attrs(&mut result, a, b)?;
    Ok(result)
}

fn compare_elem(op: CmpOp, a: &VectorData, i: usize, b: &VectorData, j: usize) -> i32 {
    if a.is_na(i) || b.is_na(j) {
        return NA_LOGICAL;
    }
    let holds = match (a, b) {
        (VectorData::Logical(x), VectorData::Logical(y))
        | (VectorData::Integer(x), VectorData::Integer(y)) => op.holds(x[i].cmp(&y[j])),
        (VectorData::Double(x), VectorData::Double(y)) => match x[i].partial_cmp(&y[j]) {
            Some(ord) => op.holds(ord),
            None => return NA_LOGICAL,
        },
        (VectorData::Complex(x), VectorData::Complex(y)) => {
            let eq = x[i] == y[j];
            match op {
                CmpOp::Eq => eq,
                CmpOp::Ne => !eq,
                _ => return NA_LOGICAL,
            }
        }
        (VectorData::Character(x), VectorData::Character(y)) => match (&x[i], &y[j]) {
            (Some(s), Some(t)) => op.holds(s.as_bytes().cmp(t.as_bytes())),
            _ => return NA_LOGICAL,
        },
        (VectorData::Raw(x), VectorData::Raw(y)) => op.holds(x[i].cmp(&y[j])),
        _ => return NA_LOGICAL,
    };
    if holds {
        LOGICAL_TRUE
    } else {
        LOGICAL_FALSE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{na_real, Complex};
    use pretty_assertions::assert_eq;

    fn run(op: CmpOp, a: RVector, b: RVector) -> RVector {
        let mut conds = Conditions::new();
        compare(op, &a, &b, &mut conds).unwrap()
    }

    #[test]
    fn test_numeric_promotion_before_compare() {
        // 2L == 2.0 is TRUE through promotion to double.
        let out = run(
            CmpOp::Eq,
            RVector::integer(vec![2, 3]),
            RVector::double(vec![2.0, 4.0]),
        );
        assert_eq!(
            out.data,
            VectorData::Logical(vec![LOGICAL_TRUE, LOGICAL_FALSE])
        );
    }

    #[test]
    fn test_string_byte_order() {
        let out = run(
            CmpOp::Lt,
            RVector::strings(vec!["a", "b", "B"]),
            RVector::strings(vec!["b", "a", "a"]),
        );
        // C locale: uppercase sorts before lowercase.
        assert_eq!(
            out.data,
            VectorData::Logical(vec![LOGICAL_TRUE, LOGICAL_FALSE, LOGICAL_TRUE])
        );
    }

    #[test]
    fn test_na_and_nan_compare_to_na() {
        let out = run(
            CmpOp::Eq,
            RVector::double(vec![na_real(), f64::NAN, 1.0]),
            RVector::double(vec![1.0, 1.0, 1.0]),
        );
        assert_eq!(
            out.data,
            VectorData::Logical(vec![NA_LOGICAL, NA_LOGICAL, LOGICAL_TRUE])
        );
    }

    #[test]
    fn test_complex_only_supports_equality() {
        let a = RVector::complex(vec![Complex::new(1.0, 2.0)]);
        let b = RVector::complex(vec![Complex::new(1.0, 2.0)]);
        assert_eq!(
            run(CmpOp::Eq, a.clone(), b.clone()).data,
            VectorData::Logical(vec![LOGICAL_TRUE])
        );
        let mut conds = Conditions::new();
        assert!(compare(CmpOp::Lt, &a, &b, &mut conds).is_err());
    }

    #[test]
    fn test_number_compared_to_string_promotes_to_string() {
        // 10 < "9" because "10" < "9" in byte order.
        let out = run(
            CmpOp::Lt,
            RVector::integer(vec![10]),
            RVector::strings(vec!["9"]),
        );
        assert_eq!(out.data, VectorData::Logical(vec![LOGICAL_TRUE]));
    }
}
