//! Binary arithmetic with recycling and NA propagation.
//!
//! Integer storage overflows to NA (with a warning condition) rather than
//! wrapping; `/` and `^` always leave integer storage for double; the
//! R-specific fixed points `1 ^ x == 1` and `x ^ 0 == 1` hold even for
//! missing exponents/bases.

use crate::coerce::{arithmetic_kind, coerce_data};
use crate::error::{Condition, Conditions, RError, RResult};
use crate::recycle::recycled_length;
use crate::scalar::{is_na_real, na_real, Complex, ScalarKind, NA_INTEGER};
use crate::value::{RVector, VectorData};

use super::{merge_elementwise_attrs, ArithOp};

/// Apply a binary arithmetic operator elementwise.
pub fn arith(op: ArithOp, a: &RVector, b: &RVector, conds: &mut Conditions) -> RResult<RVector> {
    let common = arithmetic_kind(a.kind(), b.kind())?;
    let target = match op {
        // Division and exponentiation leave the integer domain.
        ArithOp::Div | ArithOp::Pow if common == ScalarKind::Integer => ScalarKind::Double,
        _ => common,
    };
    if target == ScalarKind::Complex && matches!(op, ArithOp::Mod | ArithOp::IntDiv) {
        return Err(RError::UnsupportedOperation(format!(
            "invalid operation \"{}\" on complex values",
            op.as_str()
        )));
    }

    let n = recycled_length(a.len(), b.len(), conds);
    let ca = coerce_data(a, target, conds)?;
    let cb = coerce_data(b, target, conds)?;
    let (na, nb) = (a.len(), b.len());

    let data = if n == 0 {
        VectorData::empty(target)
    } else {
        match (&ca, &cb) {
            (VectorData::Integer(xs), VectorData::Integer(ys)) => {
                let mut out = Vec::with_capacity(n);
                for i in 0..n {
                    out.push(int_op(op, xs[i % na], ys[i % nb], conds));
                }
                VectorData::Integer(out)
            }
            (VectorData::Double(xs), VectorData::Double(ys)) => {
                let mut out = Vec::with_capacity(n);
                for i in 0..n {
                    out.push(double_op(op, xs[i % na], ys[i % nb]));
                }
                VectorData::Double(out)
            }
            (VectorData::Complex(xs), VectorData::Complex(ys)) => {
                let mut out = Vec::with_capacity(n);
                for i in 0..n {
                    out.push(complex_op(op, xs[i % na], ys[i % nb]));
                }
                VectorData::Complex(out)
            }
            _ => {
                return Err(RError::IncompatibleTypes(
                    "non-numeric argument to binary operator".to_string(),
                ))
            }
        }
    };

    let mut out = RVector::new(data);
    merge_elementwise_attrs(&mut out, a, b)?;
    Ok(out)
}

fn int_op(op: ArithOp, a: i32, b: i32, conds: &mut Conditions) -> i32 {
    if a == NA_INTEGER || b == NA_INTEGER {
        return NA_INTEGER;
    }
    match op {
        ArithOp::Add => checked(a.checked_add(b), conds),
        ArithOp::Sub => checked(a.checked_sub(b), conds),
        ArithOp::Mul => checked(a.checked_mul(b), conds),
        ArithOp::IntDiv => {
            if b == 0 {
                NA_INTEGER
            } else {
                // Floor division; safe in f64 since both fit in 32 bits.
                (f64::from(a) / f64::from(b)).floor() as i32
            }
        }
        ArithOp::Mod => {
            if b == 0 {
                NA_INTEGER
            } else {
                let q = (f64::from(a) / f64::from(b)).floor();
                (f64::from(a) - q * f64::from(b)) as i32
            }
        }
        // Handled by the Double branch via target promotion.
        ArithOp::Div | ArithOp::Pow => NA_INTEGER,
    }
}

fn checked(r: Option<i32>, conds: &mut Conditions) -> i32 {
    match r {
        // The NA sentinel itself is not a representable result.
        Some(v) if v != NA_INTEGER => v,
        _ => {
            conds.raise(Condition::IntegerOverflow);
            NA_INTEGER
        }
    }
}

fn double_op(op: ArithOp, a: f64, b: f64) -> f64 {
    if let ArithOp::Pow = op {
        return r_pow(a, b);
    }
    // NA dominates NaN; check the payload before arithmetic can
    // canonicalize it away.
    if is_na_real(a) || is_na_real(b) {
        return na_real();
    }
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::Mod => {
            if b == 0.0 {
                f64::NAN
            } else {
                // R's %%: result carries the sign of the divisor.
                a - (a / b).floor() * b
            }
        }
        ArithOp::IntDiv => {
            if b == 0.0 {
                if a == 0.0 {
                    f64::NAN
                } else if (a > 0.0) == (b.is_sign_positive()) {
                    f64::INFINITY
                } else {
                    f64::NEG_INFINITY
                }
            } else {
                (a / b).floor()
            }
        }
        ArithOp::Pow => unreachable!(),
    }
}

fn r_pow(a: f64, b: f64) -> f64 {
    // 1 ^ x and x ^ 0 are 1 even for NA/NaN operands.
    if a == 1.0 || b == 0.0 {
        return 1.0;
    }
    if is_na_real(a) || is_na_real(b) {
        return na_real();
    }
    a.powf(b)
}

fn complex_op(op: ArithOp, a: Complex, b: Complex) -> Complex {
    if a.is_na() || b.is_na() {
        return Complex::na();
    }
    match op {
        ArithOp::Add => a.add(b),
        ArithOp::Sub => a.sub(b),
        ArithOp::Mul => a.mul(b),
        ArithOp::Div => a.div(b),
        ArithOp::Pow => complex_pow(a, b),
        ArithOp::Mod | ArithOp::IntDiv => unreachable!(),
    }
}

/// `a ^ b = exp(b * log(a))` over the complex plane.
fn complex_pow(a: Complex, b: Complex) -> Complex {
    if b.re == 0.0 && b.im == 0.0 {
        return Complex::new(1.0, 0.0);
    }
    if a.re == 0.0 && a.im == 0.0 {
        return Complex::new(0.0, 0.0);
    }
    let log_r = a.re.hypot(a.im).ln();
    let theta = a.im.atan2(a.re);
    let ln_a = Complex::new(log_r, theta);
    let w = b.mul(ln_a);
    let scale = w.re.exp();
    Complex::new(scale * w.im.cos(), scale * w.im.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Conditions;
    use pretty_assertions::assert_eq;

    fn run(op: ArithOp, a: RVector, b: RVector) -> (RVector, Conditions) {
        let mut conds = Conditions::new();
        let out = arith(op, &a, &b, &mut conds).unwrap();
        (out, conds)
    }

    #[test]
    fn test_integer_add_recycles() {
        let (out, conds) = run(
            ArithOp::Add,
            RVector::integer(vec![1, 2, 3, 4]),
            RVector::integer(vec![10, 20]),
        );
        assert_eq!(out.data, VectorData::Integer(vec![11, 22, 13, 24]));
        assert!(conds.is_empty());
    }

    #[test]
    fn test_uneven_recycling_warns() {
        let (out, conds) = run(
            ArithOp::Add,
            RVector::integer(vec![1, 2, 3]),
            RVector::integer(vec![10, 20]),
        );
        assert_eq!(out.data, VectorData::Integer(vec![11, 22, 13]));
        assert!(conds.contains(Condition::RecycleLengthMismatch));
    }

    #[test]
    fn test_integer_overflow_is_na_with_warning() {
        let (out, conds) = run(
            ArithOp::Add,
            RVector::integer(vec![i32::MAX]),
            RVector::integer(vec![1]),
        );
        assert_eq!(out.data, VectorData::Integer(vec![NA_INTEGER]));
        assert!(conds.contains(Condition::IntegerOverflow));
    }

    #[test]
    fn test_integer_division_promotes_to_double() {
        let (out, _) = run(
            ArithOp::Div,
            RVector::integer(vec![7]),
            RVector::integer(vec![2]),
        );
        assert_eq!(out.data, VectorData::Double(vec![3.5]));
    }

    #[test]
    fn test_modulo_sign_follows_divisor() {
        let (out, _) = run(
            ArithOp::Mod,
            RVector::double(vec![7.0, -7.0]),
            RVector::double(vec![-2.0, 2.0]),
        );
        assert_eq!(out.data, VectorData::Double(vec![-1.0, 1.0]));
    }

    #[test]
    fn test_floor_division() {
        let (out, _) = run(
            ArithOp::IntDiv,
            RVector::integer(vec![7, -7]),
            RVector::integer(vec![2, 2]),
        );
        assert_eq!(out.data, VectorData::Integer(vec![3, -4]));
    }

    #[test]
    fn test_na_propagates_but_pow_fixed_points_win() {
        let na = RVector::double(vec![na_real()]);
        let (out, _) = run(ArithOp::Add, na.clone(), RVector::double(vec![1.0]));
        assert!(is_na_real(out.doubles().unwrap()[0]));

        let (one, _) = run(ArithOp::Pow, RVector::double(vec![1.0]), na.clone());
        assert_eq!(one.data, VectorData::Double(vec![1.0]));

        let (one, _) = run(ArithOp::Pow, na, RVector::double(vec![0.0]));
        assert_eq!(one.data, VectorData::Double(vec![1.0]));
    }

    #[test]
    fn test_logical_operands_use_integer_storage() {
        let (out, _) = run(
            ArithOp::Add,
            RVector::logical_from_bools(vec![true, false]),
            RVector::integer(vec![1, 1]),
        );
        assert_eq!(out.data, VectorData::Integer(vec![2, 1]));
    }

    #[test]
    fn test_character_operand_rejected() {
        let mut conds = Conditions::new();
        let err = arith(
            ArithOp::Add,
            &RVector::strings(vec!["a"]),
            &RVector::integer(vec![1]),
            &mut conds,
        );
        assert!(matches!(err, Err(RError::IncompatibleTypes(_))));
    }

    #[test]
    fn test_names_survive_class_does_not() {
        let mut a = RVector::integer(vec![1, 2]);
        a.set_attr("names", Some(RVector::strings(vec!["x", "y"]))).unwrap();
        a.set_attr("class", Some(RVector::strings(vec!["myclass"]))).unwrap();
        let (out, _) = run(ArithOp::Add, a, RVector::integer(vec![1, 1]));
        assert_eq!(
            out.attr("names"),
            Some(&RVector::strings(vec!["x", "y"]))
        );
        assert!(out.attr("class").is_none());
    }

    #[test]
    fn test_empty_operand_gives_empty_result() {
        let (out, conds) = run(
            ArithOp::Add,
            RVector::integer(vec![]),
            RVector::integer(vec![1, 2]),
        );
        assert_eq!(out.len(), 0);
        assert_eq!(out.kind(), ScalarKind::Integer);
        assert!(conds.is_empty());
    }
}
