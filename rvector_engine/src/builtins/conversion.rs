//! The `as.*` conversions and the `is.*` predicate family.

use crate::builtins::{BuiltinId, CallArgs};
use crate::coerce::coerce_data;
use crate::error::{Conditions, RResult};
use crate::scalar::{is_na_real, ScalarKind};
use crate::value::{RVector, Value, VectorData};

/// `as.<kind>(x)`: convert every element and drop all attributes.
/// `NULL` converts to an empty vector of the target kind.
pub(crate) fn as_kind(
    id: BuiltinId,
    args: &CallArgs,
    conds: &mut Conditions,
) -> RResult<Value> {
    let (target, builtin) = match id {
        BuiltinId::AsLogical => (ScalarKind::Logical, "as.logical"),
        BuiltinId::AsInteger => (ScalarKind::Integer, "as.integer"),
        BuiltinId::AsDouble => (ScalarKind::Double, "as.double"),
        BuiltinId::AsComplex => (ScalarKind::Complex, "as.complex"),
        BuiltinId::AsCharacter => (ScalarKind::Character, "as.character"),
        BuiltinId::AsRaw => (ScalarKind::Raw, "as.raw"),
        _ => unreachable!("as_kind handles only the as.* identifiers"),
    };
    let data = match args.require(0, builtin)? {
        Value::Null => VectorData::empty(target),
        Value::Vector(v) => coerce_data(v, target, conds)?,
    };
    Ok(Value::Vector(RVector::new(data)))
}

/// `is.na`, `is.nan`, `is.finite`, `is.infinite`: an elementwise
/// logical answer that keeps the input's shape. `NULL` tests to an
/// empty logical vector.
pub(crate) fn elementwise_predicate(
    id: BuiltinId,
    args: &CallArgs,
    _conds: &mut Conditions,
) -> RResult<Value> {
    let builtin = match id {
        BuiltinId::IsNa => "is.na",
        BuiltinId::IsNan => "is.nan",
        BuiltinId::IsFinite => "is.finite",
        BuiltinId::IsInfinite => "is.infinite",
        _ => unreachable!("not an elementwise predicate"),
    };
    let v = match args.require(0, builtin)? {
        Value::Null => return Ok(Value::Vector(RVector::logical(Vec::new()))),
        Value::Vector(v) => v,
    };

    let mut out = Vec::with_capacity(v.len());
    for i in 0..v.len() {
        let answer = match id {
            BuiltinId::IsNa => v.is_na(i),
            BuiltinId::IsNan => match &v.data {
                // NA carries NaN bits but is not NaN for this test.
                VectorData::Double(e) => e[i].is_nan() && !is_na_real(e[i]),
                VectorData::Complex(e) => e[i].is_na_or_nan() && !e[i].is_na(),
                _ => false,
            },
            BuiltinId::IsFinite => match &v.data {
                VectorData::Logical(_) | VectorData::Integer(_) => !v.is_na(i),
                VectorData::Double(e) => e[i].is_finite(),
                VectorData::Complex(e) => e[i].re.is_finite() && e[i].im.is_finite(),
                VectorData::Raw(_) => true,
                _ => false,
            },
            BuiltinId::IsInfinite => match &v.data {
                VectorData::Double(e) => e[i].is_infinite(),
                VectorData::Complex(e) => e[i].re.is_infinite() || e[i].im.is_infinite(),
                _ => false,
            },
            _ => unreachable!(),
        };
        out.push(answer);
    }
    let mut result = RVector::logical_from_bools(out);
    result.copy_shape_attrs_from(v);
    Ok(Value::Vector(result))
}

/// The whole-value `is.*` predicates: a single logical answer about
/// the argument's kind (or class, for `is.factor`).
pub(crate) fn type_predicate(id: BuiltinId, args: &CallArgs) -> RResult<Value> {
    let value = args.require(0, "is")?;
    let answer = match (id, value) {
        (BuiltinId::IsNull, v) => matches!(v, Value::Null),
        (_, Value::Null) => false,
        (BuiltinId::IsLogical, Value::Vector(v)) => v.kind() == ScalarKind::Logical,
        (BuiltinId::IsInteger, Value::Vector(v)) => v.kind() == ScalarKind::Integer,
        (BuiltinId::IsDouble, Value::Vector(v)) => v.kind() == ScalarKind::Double,
        (BuiltinId::IsNumeric, Value::Vector(v)) => {
            matches!(v.kind(), ScalarKind::Integer | ScalarKind::Double) && !v.has_class("factor")
        }
        (BuiltinId::IsCharacter, Value::Vector(v)) => v.kind() == ScalarKind::Character,
        (BuiltinId::IsComplex, Value::Vector(v)) => v.kind() == ScalarKind::Complex,
        (BuiltinId::IsList, Value::Vector(v)) => v.kind() == ScalarKind::List,
        (BuiltinId::IsFactor, Value::Vector(v)) => v.has_class("factor"),
        _ => unreachable!("not a type predicate"),
    };
    Ok(Value::Vector(RVector::scalar_logical(answer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Conditions;
    use crate::scalar::{na_real, NA_INTEGER};

    fn call1(value: Value) -> CallArgs {
        CallArgs::positional(vec![value])
    }

    #[test]
    fn test_as_integer_truncates_toward_zero() {
        let mut conds = Conditions::new();
        let out = as_kind(
            BuiltinId::AsInteger,
            &call1(Value::Vector(RVector::double(vec![2.9, -2.9]))),
            &mut conds,
        )
        .unwrap();
        assert_eq!(out, Value::Vector(RVector::integer(vec![2, -2])));
    }

    #[test]
    fn test_as_integer_accepts_padded_strings() {
        let mut conds = Conditions::new();
        let out = as_kind(
            BuiltinId::AsInteger,
            &call1(Value::Vector(RVector::strings(vec!["  33", "x"]))),
            &mut conds,
        )
        .unwrap();
        assert_eq!(out, Value::Vector(RVector::integer(vec![33, NA_INTEGER])));
    }

    #[test]
    fn test_as_character_drops_attributes() {
        let mut conds = Conditions::new();
        let mut x = RVector::integer(vec![1, 2]);
        x.set_attr("names", Some(RVector::strings(vec!["a", "b"])))
            .unwrap();
        let out = as_kind(
            BuiltinId::AsCharacter,
            &call1(Value::Vector(x)),
            &mut conds,
        )
        .unwrap();
        let v = out.as_vector().unwrap();
        assert_eq!(v.attr("names"), None);
        assert_eq!(v.characters().unwrap()[0], Some("1".to_string()));
    }

    #[test]
    fn test_as_kind_of_null_is_empty() {
        let mut conds = Conditions::new();
        let out = as_kind(BuiltinId::AsDouble, &call1(Value::Null), &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::double(vec![])));
    }

    #[test]
    fn test_is_na_vs_is_nan() {
        let mut conds = Conditions::new();
        let x = Value::Vector(RVector::double(vec![1.0, na_real(), f64::NAN]));
        assert_eq!(
            elementwise_predicate(BuiltinId::IsNa, &call1(x.clone()), &mut conds).unwrap(),
            Value::Vector(RVector::logical_from_bools(vec![false, true, true]))
        );
        assert_eq!(
            elementwise_predicate(BuiltinId::IsNan, &call1(x), &mut conds).unwrap(),
            Value::Vector(RVector::logical_from_bools(vec![false, false, true]))
        );
    }

    #[test]
    fn test_is_finite_on_integers() {
        let mut conds = Conditions::new();
        let x = Value::Vector(RVector::integer(vec![1, NA_INTEGER]));
        assert_eq!(
            elementwise_predicate(BuiltinId::IsFinite, &call1(x), &mut conds).unwrap(),
            Value::Vector(RVector::logical_from_bools(vec![true, false]))
        );
    }

    #[test]
    fn test_type_predicates() {
        let x = Value::Vector(RVector::double(vec![1.0]));
        assert_eq!(
            type_predicate(BuiltinId::IsNumeric, &call1(x.clone())).unwrap(),
            Value::Vector(RVector::scalar_logical(true))
        );
        assert_eq!(
            type_predicate(BuiltinId::IsCharacter, &call1(x)).unwrap(),
            Value::Vector(RVector::scalar_logical(false))
        );
        assert_eq!(
            type_predicate(BuiltinId::IsNull, &call1(Value::Null)).unwrap(),
            Value::Vector(RVector::scalar_logical(true))
        );
    }
}
