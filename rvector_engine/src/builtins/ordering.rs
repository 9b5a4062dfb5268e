//! `order`, `sort`, and `rev`.
//!
//! `order` is a stable multi-key sort returning 1-based positions;
//! `sort` reorders the values themselves and drops missing elements.
//! NaN travels with NA here: neither participates in the ordering and
//! both obey `na.last`.

use std::cmp::Ordering;

use crate::builtins::CallArgs;
use crate::error::{Conditions, RError, RResult};
use crate::scalar::Complex;
use crate::value::{RVector, Value, VectorData};

/// One sort key, normalized for comparison. `None` marks an element
/// that does not participate (NA or NaN).
enum KeyColumn {
    Num(Vec<Option<f64>>),
    Str(Vec<Option<String>>),
    Cplx(Vec<Option<Complex>>),
}

impl KeyColumn {
    fn from_vector(v: &RVector, builtin: &str) -> RResult<KeyColumn> {
        let col = match &v.data {
            VectorData::Logical(e) | VectorData::Integer(e) => KeyColumn::Num(
                (0..e.len())
                    .map(|i| if v.is_na(i) { None } else { Some(e[i] as f64) })
                    .collect(),
            ),
            VectorData::Double(e) => KeyColumn::Num(
                (0..e.len())
                    .map(|i| if v.is_na(i) { None } else { Some(e[i]) })
                    .collect(),
            ),
            VectorData::Raw(e) => KeyColumn::Num(e.iter().map(|&b| Some(b as f64)).collect()),
            VectorData::Character(e) => KeyColumn::Str(e.clone()),
            VectorData::Complex(e) => KeyColumn::Cplx(
                (0..e.len())
                    .map(|i| if v.is_na(i) { None } else { Some(e[i]) })
                    .collect(),
            ),
            VectorData::List(_) => {
                return Err(RError::UnsupportedOperation(format!(
                    "'{}' is not applicable to lists",
                    builtin
                )))
            }
        };
        Ok(col)
    }

    fn is_missing(&self, i: usize) -> bool {
        match self {
            KeyColumn::Num(e) => e[i].is_none(),
            KeyColumn::Str(e) => e[i].is_none(),
            KeyColumn::Cplx(e) => e[i].is_none(),
        }
    }

    /// Compare two non-missing elements.
    fn cmp_present(&self, i: usize, j: usize) -> Ordering {
        match self {
            KeyColumn::Num(e) => e[i]
                .partial_cmp(&e[j])
                .unwrap_or(Ordering::Equal),
            KeyColumn::Str(e) => e[i]
                .as_deref()
                .map(str::as_bytes)
                .cmp(&e[j].as_deref().map(str::as_bytes)),
            KeyColumn::Cplx(e) => {
                let (a, b) = (e[i].unwrap_or(Complex::na()), e[j].unwrap_or(Complex::na()));
                a.re.partial_cmp(&b.re)
                    .unwrap_or(Ordering::Equal)
                    .then(a.im.partial_cmp(&b.im).unwrap_or(Ordering::Equal))
            }
        }
    }
}

/// Stable multi-key ordering over equally long keys. Returns the
/// permutation as 0-based indices; `na_last` of `None` drops missing
/// rows entirely (a row is missing when any key is NA there).
fn permutation(
    keys: &[KeyColumn],
    n: usize,
    decreasing: bool,
    na_last: Option<bool>,
) -> Vec<usize> {
    let missing: Vec<bool> = (0..n)
        .map(|i| keys.iter().any(|k| k.is_missing(i)))
        .collect();
    let mut idx: Vec<usize> = (0..n).collect();
    idx.sort_by(|&i, &j| {
        match (missing[i], missing[j]) {
            (true, true) => return Ordering::Equal,
            (true, false) => {
                return if na_last.unwrap_or(true) {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, true) => {
                return if na_last.unwrap_or(true) {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, false) => {}
        }
        for key in keys {
            let mut ord = key.cmp_present(i, j);
            if decreasing {
                ord = ord.reverse();
            }
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    if na_last.is_none() {
        idx.retain(|&i| !missing[i]);
    }
    idx
}

pub(crate) fn order(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let decreasing = args.flag("decreasing", false)?;
    let na_last = match args.flag_allow_na("na.last")? {
        None => Some(true),
        Some(v) => v,
    };
    if args.positional.is_empty() {
        return Err(RError::ArgumentError(
            "order: argument 1 is missing, with no default".to_string(),
        ));
    }

    let mut keys = Vec::with_capacity(args.positional.len());
    let mut n: Option<usize> = None;
    for value in &args.positional {
        let v = value.expect_vector("order")?;
        match n {
            None => n = Some(v.len()),
            Some(len) if len != v.len() => {
                return Err(RError::ArgumentError(
                    "order: argument lengths differ".to_string(),
                ))
            }
            Some(_) => {}
        }
        keys.push(KeyColumn::from_vector(v, "order")?);
    }
    let n = n.unwrap_or(0);

    let idx = permutation(&keys, n, decreasing, na_last);
    let positions = idx.iter().map(|&i| (i + 1) as i32).collect();
    Ok(Value::Vector(RVector::integer(positions)))
}

/// Reorder a vector's data by a 0-based permutation, carrying names.
fn take(v: &RVector, idx: &[usize]) -> RResult<RVector> {
    let data = match &v.data {
        VectorData::Logical(e) => VectorData::Logical(idx.iter().map(|&i| e[i]).collect()),
        VectorData::Integer(e) => VectorData::Integer(idx.iter().map(|&i| e[i]).collect()),
        VectorData::Double(e) => VectorData::Double(idx.iter().map(|&i| e[i]).collect()),
        VectorData::Complex(e) => VectorData::Complex(idx.iter().map(|&i| e[i]).collect()),
        VectorData::Character(e) => {
            VectorData::Character(idx.iter().map(|&i| e[i].clone()).collect())
        }
        VectorData::Raw(e) => VectorData::Raw(idx.iter().map(|&i| e[i]).collect()),
        VectorData::List(e) => VectorData::List(idx.iter().map(|&i| e[i].clone()).collect()),
    };
    let mut out = RVector::new(data);
    if let Some(names) = v.attr("names").and_then(|n| n.characters()) {
        let reordered: Vec<Option<String>> = idx.iter().map(|&i| names[i].clone()).collect();
        out.set_attr("names", Some(RVector::character(reordered)))?;
    }
    Ok(out)
}

/// Default `sort`: ascending unless `decreasing`, missing values
/// removed. Class methods (factor) override this through dispatch.
pub(crate) fn sort(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "sort")?;
    let decreasing = args.flag("decreasing", false)?;
    let key = KeyColumn::from_vector(x, "sort")?;
    let idx = permutation(&[key], x.len(), decreasing, None);
    Ok(Value::Vector(take(x, &idx)?))
}

pub(crate) fn rev(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = args.require_vector(0, "rev")?;
    let idx: Vec<usize> = (0..x.len()).rev().collect();
    Ok(Value::Vector(take(x, &idx)?))
}
