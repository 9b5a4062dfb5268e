//! Factors: integer codes into a character level table.
//!
//! Equality comparisons act on the labels; order comparisons need an
//! ordered factor and act on level ranks.

use crate::builtins::CallArgs;
use crate::error::{Conditions, RError, RResult};
use crate::ops::{self, CmpOp};
use crate::scalar::{ScalarKind, NA_INTEGER};
use crate::value::{RVector, Value};

/// Construct a factor from any vector. Levels default to the sorted
/// unique non-missing values; explicit `levels` win, and values not in
/// the level set code to NA. `ordered = TRUE` prepends the `ordered`
/// class tag.
pub(crate) fn factor(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = match args.require(0, "factor")? {
        Value::Null => RVector::character(Vec::new()),
        Value::Vector(v) => crate::coerce::coerced(v, ScalarKind::Character, conds)?,
    };
    let values = x.characters().unwrap_or(&[]);

    let levels: Vec<String> = match args.named("levels") {
        Some(v) => {
            let v = crate::coerce::coerced(
                v.expect_vector("levels")?,
                ScalarKind::Character,
                conds,
            )?;
            v.characters()
                .unwrap_or(&[])
                .iter()
                .flatten()
                .cloned()
                .collect()
        }
        None => {
            let mut seen: Vec<String> = Vec::new();
            for s in values.iter().flatten() {
                if !seen.contains(s) {
                    seen.push(s.clone());
                }
            }
            seen.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
            seen
        }
    };

    let codes = values
        .iter()
        .map(|s| match s {
            None => NA_INTEGER,
            Some(s) => levels
                .iter()
                .position(|l| l == s)
                .map_or(NA_INTEGER, |p| (p + 1) as i32),
        })
        .collect();

    let ordered = args.flag("ordered", false)?;
    let mut out = RVector::integer(codes);
    out.set_attr(
        "levels",
        Some(RVector::character(
            levels.into_iter().map(Some).collect(),
        )),
    )?;
    let tags = if ordered {
        vec!["ordered", "factor"]
    } else {
        vec!["factor"]
    };
    out.set_attr("class", Some(RVector::strings(tags)))?;
    Ok(Value::Vector(out))
}

/// The label each code points at, as a plain character vector.
fn labels(v: &RVector) -> RResult<RVector> {
    let codes = v.integers().ok_or_else(|| {
        RError::AttributeInvariant("malformed factor: codes are not integer".to_string())
    })?;
    let levels = v
        .attr("levels")
        .and_then(|l| l.characters())
        .ok_or_else(|| {
            RError::AttributeInvariant("malformed factor: no 'levels' attribute".to_string())
        })?;
    let out = codes
        .iter()
        .map(|&c| {
            if c == NA_INTEGER || c < 1 || c as usize > levels.len() {
                None
            } else {
                levels[c as usize - 1].clone()
            }
        })
        .collect();
    Ok(RVector::character(out))
}

/// A comparison operand: factors lower to their labels, everything
/// else passes through.
fn comparable(value: &Value) -> RResult<RVector> {
    match value {
        Value::Null => Ok(RVector::logical(Vec::new())),
        Value::Vector(v) if v.has_class("factor") => labels(v),
        Value::Vector(v) => Ok(v.clone()),
    }
}

fn compare_labels(op: CmpOp, args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let a = comparable(args.require(0, op.as_str())?)?;
    let b = comparable(args.require(1, op.as_str())?)?;
    Ok(Value::Vector(ops::compare(op, &a, &b, conds)?))
}

pub(crate) fn compare_eq(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    compare_labels(CmpOp::Eq, args, conds)
}

pub(crate) fn compare_ne(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    compare_labels(CmpOp::Ne, args, conds)
}

fn level_table(v: &RVector) -> RResult<&[Option<String>]> {
    v.attr("levels").and_then(|l| l.characters()).ok_or_else(|| {
        RError::AttributeInvariant("malformed factor: no 'levels' attribute".to_string())
    })
}

/// Position of each element within `levels`, 1-based, NA when absent.
/// This is how a non-factor operand joins an ordered comparison.
fn rank_in_levels(
    levels: &[Option<String>],
    v: &RVector,
    conds: &mut Conditions,
) -> RResult<RVector> {
    let chars = crate::coerce::coerced(v, ScalarKind::Character, conds)?;
    let codes = chars
        .characters()
        .unwrap_or(&[])
        .iter()
        .map(|s| match s {
            None => NA_INTEGER,
            Some(s) => levels
                .iter()
                .position(|l| l.as_deref() == Some(s.as_str()))
                .map_or(NA_INTEGER, |p| (p + 1) as i32),
        })
        .collect();
    Ok(RVector::integer(codes))
}

fn bare_codes(v: &RVector) -> RResult<RVector> {
    let codes = v.integers().ok_or_else(|| {
        RError::AttributeInvariant("malformed factor: codes are not integer".to_string())
    })?;
    Ok(RVector::integer(codes.to_vec()))
}

/// Order comparison compares level ranks and needs ordered factors.
/// Two factor operands must carry the same level vector; a non-factor
/// operand is matched into the factor's levels first.
fn compare_codes(op: CmpOp, args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let mut plain = Vec::with_capacity(2);
    let mut factors: Vec<Option<&RVector>> = Vec::with_capacity(2);
    for i in 0..2 {
        let value = args.require(i, op.as_str())?;
        let v = match value {
            Value::Vector(v) => v,
            Value::Null => {
                plain.push(Some(RVector::logical(Vec::new())));
                factors.push(None);
                continue;
            }
        };
        if v.has_class("factor") {
            if !v.has_class("ordered") {
                return Err(RError::UnsupportedOperation(format!(
                    "'{}' is not meaningful for unordered factors",
                    op.as_str()
                )));
            }
            plain.push(None);
            factors.push(Some(v));
        } else {
            plain.push(Some(v.clone()));
            factors.push(None);
        }
    }

    let (a, b) = match (factors[0], factors[1]) {
        (Some(fa), Some(fb)) => {
            if level_table(fa)? != level_table(fb)? {
                return Err(RError::ArgumentError(
                    "level sets of factors are different".to_string(),
                ));
            }
            (bare_codes(fa)?, bare_codes(fb)?)
        }
        (Some(fa), None) => {
            let other = plain[1].take().unwrap();
            let ranked = rank_in_levels(level_table(fa)?, &other, conds)?;
            (bare_codes(fa)?, ranked)
        }
        (None, Some(fb)) => {
            let other = plain[0].take().unwrap();
            let ranked = rank_in_levels(level_table(fb)?, &other, conds)?;
            (ranked, bare_codes(fb)?)
        }
        (None, None) => {
            let b = plain[1].take().unwrap();
            (plain[0].take().unwrap(), b)
        }
    };
    Ok(Value::Vector(ops::compare(op, &a, &b, conds)?))
}

pub(crate) fn compare_lt(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    compare_codes(CmpOp::Lt, args, conds)
}

pub(crate) fn compare_le(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    compare_codes(CmpOp::Le, args, conds)
}

pub(crate) fn compare_gt(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    compare_codes(CmpOp::Gt, args, conds)
}

pub(crate) fn compare_ge(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    compare_codes(CmpOp::Ge, args, conds)
}

/// Method body shared by `unique.factor` and `sort.factor`: run the
/// default on the bare codes, then put levels and class back.
fn on_codes(
    builtin: &str,
    args: &CallArgs,
    conds: &mut Conditions,
) -> RResult<Value> {
    let x = args.require_vector(0, builtin)?;
    let mut stripped = args.clone();
    stripped.positional[0] = Value::Vector(x.unclassed());
    let out = crate::builtins::call_default_by_name(builtin, &stripped, conds)?;
    let mut v = out
        .into_vector()
        .ok_or_else(|| RError::UnsupportedOperation(format!("{} returned NULL", builtin)))?;
    if let Some(levels) = x.attr("levels") {
        v.set_attr("levels", Some(levels.clone()))?;
    }
    if let Some(class) = x.attr("class") {
        v.set_attr("class", Some(class.clone()))?;
    }
    Ok(Value::Vector(v))
}

pub(crate) fn unique(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    on_codes("unique", args, conds)
}

pub(crate) fn sort(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    on_codes("sort", args, conds)
}

pub(crate) fn as_character(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "as.character")?;
    Ok(Value::Vector(labels(x)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Conditions;
    use crate::scalar::{LOGICAL_TRUE, NA_LOGICAL};

    fn make_factor(values: Vec<&str>, ordered: bool) -> RVector {
        let mut conds = Conditions::new();
        let mut args = CallArgs::positional(vec![Value::Vector(RVector::strings(values))]);
        if ordered {
            args.named.push((
                "ordered".to_string(),
                Value::Vector(RVector::scalar_logical(true)),
            ));
        }
        factor(&args, &mut conds)
            .unwrap()
            .into_vector()
            .unwrap()
    }

    #[test]
    fn test_factor_codes_against_sorted_levels() {
        let f = make_factor(vec!["b", "a", "b"], false);
        assert_eq!(f.integers(), Some(&[2, 1, 2][..]));
        assert_eq!(
            f.attr("levels"),
            Some(&RVector::strings(vec!["a", "b"]))
        );
        assert!(f.has_class("factor"));
    }

    #[test]
    fn test_factor_explicit_levels_code_na() {
        let mut conds = Conditions::new();
        let mut args =
            CallArgs::positional(vec![Value::Vector(RVector::strings(vec!["a", "z"]))]);
        args.named.push((
            "levels".to_string(),
            Value::Vector(RVector::strings(vec!["a", "b"])),
        ));
        let f = factor(&args, &mut conds).unwrap().into_vector().unwrap();
        assert_eq!(f.integers(), Some(&[1, NA_INTEGER][..]));
    }

    #[test]
    fn test_equality_compares_labels() {
        let mut conds = Conditions::new();
        let f = make_factor(vec!["a", "b"], false);
        let args = CallArgs::positional(vec![
            Value::Vector(f),
            Value::Vector(RVector::scalar_string("a")),
        ]);
        let out = compare_eq(&args, &mut conds).unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::logical_from_bools(vec![true, false]))
        );
    }

    #[test]
    fn test_order_comparison_requires_ordered() {
        let mut conds = Conditions::new();
        let plain = make_factor(vec!["a", "b"], false);
        let args = CallArgs::positional(vec![
            Value::Vector(plain),
            Value::Vector(RVector::scalar_string("a")),
        ]);
        assert!(compare_lt(&args, &mut conds).is_err());
    }

    #[test]
    fn test_ordered_comparison_uses_codes() {
        let mut conds = Conditions::new();
        let a = make_ordered(vec!["low", "high"], vec!["low", "high"]);
        let b = make_ordered(vec!["low", "low"], vec!["low", "high"]);
        let args = CallArgs::positional(vec![Value::Vector(a), Value::Vector(b)]);
        let out = compare_gt(&args, &mut conds).unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::logical_from_bools(vec![false, true]))
        );
    }

    fn make_ordered(values: Vec<&str>, levels: Vec<&str>) -> RVector {
        let mut conds = Conditions::new();
        let mut args = CallArgs::positional(vec![Value::Vector(RVector::strings(values))]);
        args.named.push((
            "levels".to_string(),
            Value::Vector(RVector::strings(levels)),
        ));
        args.named.push((
            "ordered".to_string(),
            Value::Vector(RVector::scalar_logical(true)),
        ));
        factor(&args, &mut conds)
            .unwrap()
            .into_vector()
            .unwrap()
    }

    #[test]
    fn test_ordered_against_label_uses_level_rank() {
        let mut conds = Conditions::new();
        let f = make_ordered(vec!["high"], vec!["low", "high"]);
        let args = CallArgs::positional(vec![
            Value::Vector(f),
            Value::Vector(RVector::scalar_string("low")),
        ]);
        // "high" ranks above "low" in the level order.
        let out = compare_lt(&args, &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::logical_from_bools(vec![false])));
    }

    #[test]
    fn test_label_absent_from_levels_ranks_na() {
        let mut conds = Conditions::new();
        let f = make_ordered(vec!["low"], vec!["low", "high"]);
        let args = CallArgs::positional(vec![
            Value::Vector(f),
            Value::Vector(RVector::scalar_string("medium")),
        ]);
        let out = compare_lt(&args, &mut conds).unwrap();
        assert_eq!(out, Value::Vector(RVector::logical(vec![NA_LOGICAL])));
    }

    #[test]
    fn test_mismatched_level_sets_error() {
        let mut conds = Conditions::new();
        let a = make_ordered(vec!["low"], vec!["low", "high"]);
        let b = make_ordered(vec!["cold"], vec!["cold", "hot"]);
        let args = CallArgs::positional(vec![Value::Vector(a), Value::Vector(b)]);
        assert!(compare_lt(&args, &mut conds).is_err());
    }

    #[test]
    fn test_unique_keeps_factorness() {
        let mut conds = Conditions::new();
        let f = make_factor(vec!["a", "b", "a"], false);
        let args = CallArgs::positional(vec![Value::Vector(f)]);
        let out = unique(&args, &mut conds).unwrap().into_vector().unwrap();
        assert_eq!(out.integers(), Some(&[1, 2][..]));
        assert!(out.has_class("factor"));
        assert_eq!(out.attr("levels"), Some(&RVector::strings(vec!["a", "b"])));
    }

    #[test]
    fn test_as_character_recovers_labels() {
        let mut conds = Conditions::new();
        let f = make_factor(vec!["b", "a"], false);
        let args = CallArgs::positional(vec![Value::Vector(f)]);
        assert_eq!(
            as_character(&args, &mut conds).unwrap(),
            Value::Vector(RVector::strings(vec!["b", "a"]))
        );
    }

    #[test]
    fn test_comparison_with_na_label() {
        let mut conds = Conditions::new();
        let mut args = CallArgs::positional(vec![Value::Vector(RVector::character(vec![
            Some("a".to_string()),
            None,
        ]))]);
        args.named.clear();
        let f = factor(&args, &mut conds).unwrap();
        let cmp = CallArgs::positional(vec![
            f,
            Value::Vector(RVector::scalar_string("a")),
        ]);
        let out = compare_eq(&cmp, &mut conds).unwrap();
        assert_eq!(
            out,
            Value::Vector(RVector::logical(vec![LOGICAL_TRUE, NA_LOGICAL]))
        );
    }
}
