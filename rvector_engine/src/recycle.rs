//! Recycling rules and variadic argument combination.
//!
//! Elementwise operations pair index `i` with `a[i % len(a)]` and
//! `b[i % len(b)]`; the result has the longer length. When the longer
//! length is not a multiple of the shorter one the operation still
//! completes, but a `RecycleLengthMismatch` condition is recorded.

use crate::coerce::{coerce_data, common_kind, scalar_at};
use crate::error::{Condition, Conditions, RResult};
use crate::scalar::ScalarKind;
use crate::value::{RVector, Value, VectorData};

/// The result length for recycling two operands, raising the mismatch
/// condition when division is uneven. Either operand being empty makes
/// the result empty.
pub fn recycled_length(na: usize, nb: usize, conds: &mut Conditions) -> usize {
    if na == 0 || nb == 0 {
        return 0;
    }
    let (longer, shorter) = (na.max(nb), na.min(nb));
    if longer % shorter != 0 {
        conds.raise(Condition::RecycleLengthMismatch);
    }
    longer
}

/// Concatenate values the way `c()` and the variadic reductions do:
/// every vector argument is promoted to the common kind across ALL
/// arguments (not pairwise), then appended in order. `NULL` arguments
/// vanish; a single list argument anywhere makes the result a list of
/// the individual elements. Names are preserved, absent names becoming
/// `""`.
pub fn concat(args: &[&Value], conds: &mut Conditions) -> RResult<Value> {
    let vectors: Vec<&RVector> = args.iter().filter_map(|v| v.as_vector()).collect();
    if vectors.is_empty() {
        return Ok(Value::Null);
    }

    let kind = vectors
        .iter()
        .map(|v| v.kind())
        .fold(ScalarKind::Raw, common_kind);

    let total: usize = vectors.iter().map(|v| v.len()).sum();
    let any_names = vectors.iter().any(|v| v.attr("names").is_some());
    let mut names: Vec<Option<String>> = Vec::with_capacity(if any_names { total } else { 0 });

    let mut data = VectorData::empty(kind);
    for v in &vectors {
        if any_names {
            match v.attr("names").and_then(|n| n.characters()) {
                Some(ns) => names.extend(ns.iter().cloned().map(|n| n.or_else(|| Some(String::new())))),
                None => names.extend(std::iter::repeat(Some(String::new())).take(v.len())),
            }
        }
        append_coerced(&mut data, v, kind, conds)?;
    }

    let mut out = RVector::new(data);
    if any_names {
        out.set_attr("names", Some(RVector::character(names)))?;
    }
    Ok(Value::Vector(out))
}

fn append_coerced(
    data: &mut VectorData,
    v: &RVector,
    kind: ScalarKind,
    conds: &mut Conditions,
) -> RResult<()> {
    if let VectorData::List(out) = &mut *data {
        // Atomic vectors contribute each element as its own component.
        for i in 0..v.len() {
            out.push(scalar_at(&v.data, i));
        }
        return Ok(());
    }
    let converted = coerce_data(v, kind, conds)?;
    match (&mut *data, converted) {
        (VectorData::Logical(out), VectorData::Logical(src)) => out.extend(src),
        (VectorData::Integer(out), VectorData::Integer(src)) => out.extend(src),
        (VectorData::Double(out), VectorData::Double(src)) => out.extend(src),
        (VectorData::Complex(out), VectorData::Complex(src)) => out.extend(src),
        (VectorData::Character(out), VectorData::Character(src)) => out.extend(src),
        (VectorData::Raw(out), VectorData::Raw(src)) => out.extend(src),
        // coerce_data returned the requested kind; other pairings
        // cannot occur.
        _ => unreachable!("coerce_data returned a mismatched kind"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recycled_length_even() {
        let mut conds = Conditions::new();
        assert_eq!(recycled_length(6, 3, &mut conds), 6);
        assert_eq!(recycled_length(1, 4, &mut conds), 4);
        assert!(conds.is_empty());
    }

    #[test]
    fn test_recycled_length_uneven_warns() {
        let mut conds = Conditions::new();
        assert_eq!(recycled_length(5, 3, &mut conds), 5);
        assert!(conds.contains(Condition::RecycleLengthMismatch));
    }

    #[test]
    fn test_recycled_length_empty_operand() {
        let mut conds = Conditions::new();
        assert_eq!(recycled_length(0, 4, &mut conds), 0);
        assert!(conds.is_empty());
    }

    #[test]
    fn test_concat_promotes_across_all_arguments() {
        let mut conds = Conditions::new();
        let a = Value::Vector(RVector::logical_from_bools(vec![true]));
        let b = Value::Vector(RVector::integer(vec![2]));
        let c = Value::Vector(RVector::double(vec![3.5]));
        let out = concat(&[&a, &b, &c], &mut conds).unwrap();
        let v = out.as_vector().unwrap();
        assert_eq!(v.data, VectorData::Double(vec![1.0, 2.0, 3.5]));
    }

    #[test]
    fn test_concat_drops_null_and_empty_is_null() {
        let mut conds = Conditions::new();
        let a = Value::Vector(RVector::integer(vec![1]));
        let out = concat(&[&Value::Null, &a], &mut conds).unwrap();
        assert_eq!(out.len(), 1);
        assert!(concat(&[&Value::Null], &mut conds).unwrap().is_null());
    }

    #[test]
    fn test_concat_with_list_argument_yields_list() {
        let mut conds = Conditions::new();
        let l = Value::Vector(RVector::list(vec![Value::Vector(RVector::scalar_integer(1))]));
        let b = Value::Vector(RVector::integer(vec![2, 3]));
        let out = concat(&[&l, &b], &mut conds).unwrap();
        let v = out.as_vector().unwrap();
        assert_eq!(v.kind(), ScalarKind::List);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_concat_preserves_names() {
        let mut conds = Conditions::new();
        let mut a = RVector::integer(vec![1]);
        a.set_attr("names", Some(RVector::strings(vec!["x"]))).unwrap();
        let b = Value::Vector(RVector::integer(vec![2]));
        let out = concat(&[&Value::Vector(a), &b], &mut conds).unwrap();
        let names = out.as_vector().unwrap().attr("names").unwrap().clone();
        assert_eq!(names, RVector::strings(vec!["x", ""]));
    }
}
