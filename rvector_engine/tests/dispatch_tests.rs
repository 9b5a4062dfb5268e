//! Generic dispatch and the bundled classes, end to end.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use rvector_engine::scalar::{NA_INTEGER, NA_LOGICAL};
use rvector_engine::{CallArgs, Conditions, Engine, RError, RResult, RVector, Value};

#[test]
fn unknown_builtin_is_an_error() {
    let err = eval("frobnicate", vec![]).unwrap_err();
    assert!(matches!(err, RError::UnknownBuiltin(_)));
    assert_eq!(err.to_string(), "could not find function \"frobnicate\"");
}

#[test]
fn factor_construction_and_levels() {
    let f = vector_of(value_of("factor", vec![chr(vec!["b", "a", "b"])]));
    assert_eq!(f.integers(), Some(&[2, 1, 2][..]));
    assert_eq!(f.attr("levels"), Some(&RVector::strings(vec!["a", "b"])));
    assert!(f.has_class("factor"));
}

#[test]
fn factor_equality_compares_labels_not_codes() {
    let f = value_of("factor", vec![chr(vec!["a", "b", "a"])]);
    assert_eq!(
        value_of("==", vec![f, scalar_chr("a")]),
        lgl(vec![true, false, true])
    );
}

#[test]
fn unordered_factor_rejects_order_comparison() {
    let f = value_of("factor", vec![chr(vec!["a", "b"])]);
    assert!(eval("<", vec![f, scalar_chr("b")]).is_err());
}

#[test]
fn ordered_factor_ranks_character_operand_by_level() {
    let f = eval_named(
        "factor",
        vec![chr(vec!["high"])],
        vec![
            ("levels", chr(vec!["low", "high"])),
            ("ordered", scalar_lgl(true)),
        ],
    )
    .unwrap()
    .value;
    // "high" sits above "low" in the level order, whatever the labels
    // look like as strings.
    assert_eq!(value_of("<", vec![f.clone(), scalar_chr("low")]), lgl(vec![false]));
    assert_eq!(value_of(">", vec![f, scalar_chr("low")]), lgl(vec![true]));
}

#[test]
fn ordered_factors_with_different_levels_do_not_compare() {
    let a = eval_named(
        "factor",
        vec![chr(vec!["low"])],
        vec![
            ("levels", chr(vec!["low", "high"])),
            ("ordered", scalar_lgl(true)),
        ],
    )
    .unwrap()
    .value;
    let b = eval_named(
        "factor",
        vec![chr(vec!["cold"])],
        vec![
            ("levels", chr(vec!["cold", "hot"])),
            ("ordered", scalar_lgl(true)),
        ],
    )
    .unwrap()
    .value;
    assert!(eval("<", vec![a, b]).is_err());
}

#[test]
fn ordered_factor_compares_by_code() {
    let f = eval_named(
        "factor",
        vec![chr(vec!["low", "high", "mid"])],
        vec![
            ("levels", chr(vec!["low", "mid", "high"])),
            ("ordered", scalar_lgl(true)),
        ],
    )
    .unwrap()
    .value;
    let v = vector_of(f.clone());
    assert!(v.has_class("ordered") && v.has_class("factor"));
    // Codes against levels c("low","mid","high"): 1, 3, 2.
    let other = eval_named(
        "factor",
        vec![chr(vec!["mid", "mid", "mid"])],
        vec![
            ("levels", chr(vec!["low", "mid", "high"])),
            ("ordered", scalar_lgl(true)),
        ],
    )
    .unwrap()
    .value;
    assert_eq!(value_of("<", vec![f, other]), lgl(vec![true, false, false]));
}

#[test]
fn factor_sort_and_unique_keep_factorness() {
    let f = value_of("factor", vec![chr(vec!["b", "a", "b"])]);
    let sorted = vector_of(value_of("sort", vec![f.clone()]));
    assert_eq!(sorted.integers(), Some(&[1, 2, 2][..]));
    assert!(sorted.has_class("factor"));

    let uniq = vector_of(value_of("unique", vec![f.clone()]));
    assert_eq!(uniq.integers(), Some(&[2, 1][..]));
    assert!(uniq.has_class("factor"));

    assert_eq!(value_of("as.character", vec![f]), chr(vec!["b", "a", "b"]));
}

#[test]
fn factor_with_missing_input_codes_na() {
    let x = Value::Vector(RVector::character(vec![Some("a".to_string()), None]));
    let f = vector_of(value_of("factor", vec![x]));
    assert_eq!(f.integers(), Some(&[1, NA_INTEGER][..]));
}

#[test]
fn date_round_trip_and_shift() {
    let d = value_of("as.Date", vec![scalar_chr("2020-02-28")]);
    assert!(vector_of(d.clone()).has_class("Date"));

    let later = value_of("+", vec![d.clone(), scalar_int(2)]);
    assert_eq!(
        value_of("as.character", vec![later]),
        scalar_chr("2020-03-01")
    );

    let earlier = value_of("-", vec![d, scalar_int(28)]);
    assert_eq!(
        value_of("as.character", vec![earlier]),
        scalar_chr("2020-01-31")
    );
}

#[test]
fn number_plus_date_dispatches_on_second_operand() {
    let d = value_of("as.Date", vec![scalar_chr("1970-01-01")]);
    let shifted = vector_of(value_of("+", vec![scalar_int(1), d]));
    assert!(shifted.has_class("Date"));
    assert_eq!(shifted.doubles(), Some(&[1.0][..]));
}

#[test]
fn date_difference_is_difftime_days() {
    let a = value_of("as.Date", vec![scalar_chr("2021-01-10")]);
    let b = value_of("as.Date", vec![scalar_chr("2021-01-01")]);
    let diff = vector_of(value_of("-", vec![a, b]));
    assert!(diff.has_class("difftime"));
    assert_eq!(diff.attr("units"), Some(&RVector::scalar_string("days")));
    assert_eq!(diff.doubles(), Some(&[9.0][..]));
}

#[test]
fn ts_arithmetic_preserves_sampling() {
    let s = eval_named(
        "ts",
        vec![dbl(vec![1.0, 2.0, 3.0, 4.0])],
        vec![
            ("start", scalar_dbl(2000.0)),
            ("frequency", scalar_dbl(4.0)),
        ],
    )
    .unwrap()
    .value;
    let doubled = vector_of(value_of("*", vec![s, scalar_dbl(2.0)]));
    assert_eq!(doubled.doubles(), Some(&[2.0, 4.0, 6.0, 8.0][..]));
    assert!(doubled.has_class("ts"));
    assert_eq!(
        doubled.attr("tsp"),
        Some(&RVector::double(vec![2000.0, 2000.75, 4.0]))
    );
}

#[test]
fn unclassed_values_take_the_default_path() {
    // The factor comparison method must not fire for plain characters.
    assert_eq!(
        value_of("==", vec![chr(vec!["a", "b"]), scalar_chr("a")]),
        lgl(vec![true, false])
    );
}

#[test]
fn is_na_on_factor_flags_missing_codes() {
    let x = Value::Vector(RVector::character(vec![Some("a".to_string()), None]));
    let f = value_of("factor", vec![x]);
    assert_eq!(value_of("is.na", vec![f]), lgl(vec![false, true]));
}

#[test]
fn custom_method_overrides_default() {
    fn always_seven(_args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
        Ok(Value::Vector(RVector::scalar_integer(7)))
    }
    let mut engine = Engine::new();
    engine.register_method("length", "sevenish", always_seven);
    let mut x = RVector::integer(vec![1, 2, 3]);
    x.set_attr("class", Some(RVector::strings(vec!["sevenish"])))
        .unwrap();
    let out = engine
        .invoke("length", vec![Value::Vector(x)], vec![])
        .unwrap();
    assert_eq!(out.value, scalar_int(7));
}

#[test]
fn method_resolution_walks_tags_in_order() {
    fn first(_args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
        Ok(Value::Vector(RVector::scalar_string("first")))
    }
    fn second(_args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
        Ok(Value::Vector(RVector::scalar_string("second")))
    }
    let mut engine = Engine::new();
    engine.register_method("rev", "a", first);
    engine.register_method("rev", "b", second);
    let mut x = RVector::integer(vec![1]);
    x.set_attr("class", Some(RVector::strings(vec!["b", "a"])))
        .unwrap();
    let out = engine.invoke("rev", vec![Value::Vector(x)], vec![]).unwrap();
    assert_eq!(out.value, scalar_chr("second"));
}

#[test]
fn comparing_factor_with_na_element() {
    let x = Value::Vector(RVector::character(vec![Some("a".to_string()), None]));
    let f = value_of("factor", vec![x]);
    let out = value_of("==", vec![f, scalar_chr("a")]);
    assert_eq!(
        out,
        Value::Vector(RVector::logical(vec![1, NA_LOGICAL]))
    );
}
