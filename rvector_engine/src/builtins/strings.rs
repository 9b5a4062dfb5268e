//! String builtins. Positions are 1-based and counted in characters,
//! not bytes; pattern matching goes through the `regex` crate.

use regex::Regex;

use crate::builtins::CallArgs;
use crate::coerce::{coerced, elem_to_string};
use crate::error::{Conditions, RError, RResult};
use crate::scalar::{ScalarKind, NA_INTEGER, NA_LOGICAL};
use crate::value::{RVector, Value};

fn character_arg<'a>(args: &'a CallArgs, i: usize, builtin: &str) -> RResult<&'a [Option<String>]> {
    let v = args.require_vector(i, builtin)?;
    v.characters().ok_or_else(|| {
        RError::ArgumentError(format!("{}: non-character argument", builtin))
    })
}

/// Any vector argument viewed as character, the `as.character` way.
fn stringified(args: &CallArgs, i: usize, builtin: &str) -> RResult<Vec<Option<String>>> {
    let v = args.require_vector(i, builtin)?;
    let mut out = Vec::with_capacity(v.len());
    for j in 0..v.len() {
        out.push(elem_to_string(&v.data, j)?);
    }
    Ok(out)
}

/// A position argument as integers, NA kept as `None`. Must be
/// nonempty; it recycles across the text vector.
fn positions(
    args: &CallArgs,
    i: usize,
    builtin: &str,
    conds: &mut Conditions,
) -> RResult<Vec<Option<i64>>> {
    let v = args.require_vector(i, builtin)?;
    let v = coerced(v, ScalarKind::Integer, conds)?;
    let e = v.integers().unwrap_or(&[]);
    if e.is_empty() {
        return Err(RError::ArgumentError(format!(
            "{}: invalid substring arguments",
            builtin
        )));
    }
    Ok(e.iter()
        .map(|&n| if n == NA_INTEGER { None } else { Some(n as i64) })
        .collect())
}

/// `substr(x, start, stop)`: character-indexed, clamping. Out-of-range
/// indices produce an empty string, never an error. `start` and `stop`
/// recycle along `x`; an NA position gives an NA element.
pub(crate) fn substr(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let x = character_arg(args, 0, "substr")?;
    let start = positions(args, 1, "substr", conds)?;
    let stop = positions(args, 2, "substr", conds)?;
    let mut out = Vec::with_capacity(x.len());
    for (i, s) in x.iter().enumerate() {
        let slice = match (s, start[i % start.len()], stop[i % stop.len()]) {
            (Some(s), Some(start), Some(stop)) => {
                let chars: Vec<char> = s.chars().collect();
                let from = (start.max(1) - 1) as usize;
                let to = stop.min(chars.len() as i64).max(0) as usize;
                Some(if from >= to {
                    String::new()
                } else {
                    chars[from..to].iter().collect()
                })
            }
            _ => None,
        };
        out.push(slice);
    }
    Ok(Value::Vector(RVector::character(out)))
}

/// Character count per element. NA stays NA.
pub(crate) fn nchar(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let x = stringified(args, 0, "nchar")?;
    let out = x
        .iter()
        .map(|s| match s {
            None => NA_INTEGER,
            Some(s) => s.chars().count() as i32,
        })
        .collect();
    Ok(Value::Vector(RVector::integer(out)))
}

/// `paste0`: every argument rendered as character with NA printing as
/// `"NA"`, recycled to the longest length. Zero-length arguments are
/// skipped. `collapse` joins the result into one string.
pub(crate) fn paste0(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let mut parts: Vec<Vec<String>> = Vec::new();
    for value in &args.positional {
        let Value::Vector(v) = value else { continue };
        if v.is_empty() {
            continue;
        }
        let mut rendered = Vec::with_capacity(v.len());
        for i in 0..v.len() {
            rendered.push(match elem_to_string(&v.data, i)? {
                Some(s) => s,
                None => "NA".to_string(),
            });
        }
        parts.push(rendered);
    }

    let n = parts.iter().map(Vec::len).max().unwrap_or(0);
    let mut glued = Vec::with_capacity(n);
    for i in 0..n {
        let mut s = String::new();
        for part in &parts {
            s.push_str(&part[i % part.len()]);
        }
        glued.push(Some(s));
    }

    if let Some(collapse) = args.named("collapse") {
        if let Some(sep) = collapse.as_vector().and_then(|v| v.characters()) {
            if let Some(Some(sep)) = sep.first() {
                let joined = glued
                    .iter()
                    .map(|s| s.as_deref().unwrap_or("NA"))
                    .collect::<Vec<_>>()
                    .join(sep);
                return Ok(Value::Vector(RVector::scalar_string(&joined)));
            }
        }
    }
    Ok(Value::Vector(RVector::character(glued)))
}

fn map_case(args: &CallArgs, builtin: &str, upper: bool) -> RResult<Value> {
    let x = stringified(args, 0, builtin)?;
    let out = x
        .iter()
        .map(|s| {
            s.as_ref()
                .map(|s| if upper { s.to_uppercase() } else { s.to_lowercase() })
        })
        .collect();
    Ok(Value::Vector(RVector::character(out)))
}

pub(crate) fn toupper(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    map_case(args, "toupper", true)
}

pub(crate) fn tolower(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    map_case(args, "tolower", false)
}

fn affix_test(
    args: &CallArgs,
    builtin: &str,
    conds: &mut Conditions,
    test: fn(&str, &str) -> bool,
) -> RResult<Value> {
    let x = character_arg(args, 0, builtin)?;
    let affix = character_arg(args, 1, builtin)?;
    let n = crate::recycle::recycled_length(x.len(), affix.len(), conds);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        out.push(match (&x[i % x.len()], &affix[i % affix.len()]) {
            (Some(s), Some(a)) => {
                if test(s, a) {
                    1
                } else {
                    0
                }
            }
            _ => NA_LOGICAL,
        });
    }
    Ok(Value::Vector(RVector::logical(out)))
}

pub(crate) fn starts_with(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    affix_test(args, "startsWith", conds, |s, p| s.starts_with(p))
}

pub(crate) fn ends_with(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    affix_test(args, "endsWith", conds, |s, p| s.ends_with(p))
}

fn pattern_arg(args: &CallArgs, builtin: &str) -> RResult<(String, bool)> {
    let pattern = match character_arg(args, 0, builtin)? {
        [Some(p), ..] => p.clone(),
        _ => {
            return Err(RError::ArgumentError(format!(
                "{}: invalid 'pattern' argument",
                builtin
            )))
        }
    };
    let fixed = args.flag("fixed", false)?;
    Ok((pattern, fixed))
}

fn compile(pattern: &str, fixed: bool, builtin: &str) -> RResult<Regex> {
    let source = if fixed {
        regex::escape(pattern)
    } else {
        pattern.to_string()
    };
    Regex::new(&source).map_err(|e| {
        RError::ArgumentError(format!("{}: invalid regular expression: {}", builtin, e))
    })
}

/// `grepl(pattern, x)`: NA elements test FALSE, not NA.
pub(crate) fn grepl(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let (pattern, fixed) = pattern_arg(args, "grepl")?;
    let re = compile(&pattern, fixed, "grepl")?;
    let x = stringified(args, 1, "grepl")?;
    let out = x
        .iter()
        .map(|s| matches!(s, Some(s) if re.is_match(s)))
        .collect();
    Ok(Value::Vector(RVector::logical_from_bools(out)))
}

/// `gregexpr(pattern, text)`: one list element per text element, an
/// integer vector of 1-based character positions of every match with
/// a parallel `match.length` attribute, or `-1` (length `-1`) when
/// nothing matches. NA text yields NA positions.
pub(crate) fn gregexpr(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let (pattern, fixed) = pattern_arg(args, "gregexpr")?;
    let re = compile(&pattern, fixed, "gregexpr")?;
    let text = stringified(args, 1, "gregexpr")?;

    let mut elements = Vec::with_capacity(text.len());
    for s in &text {
        let element = match s {
            None => {
                let mut v = RVector::integer(vec![NA_INTEGER]);
                v.set_attr("match.length", Some(RVector::integer(vec![NA_INTEGER])))?;
                Value::Vector(v)
            }
            Some(s) => {
                let mut starts = Vec::new();
                let mut lengths = Vec::new();
                for m in re.find_iter(s) {
                    // Regex offsets are bytes; positions are characters.
                    let start_chars = s[..m.start()].chars().count() as i32;
                    starts.push(start_chars + 1);
                    lengths.push(m.as_str().chars().count() as i32);
                }
                if starts.is_empty() {
                    starts.push(-1);
                    lengths.push(-1);
                }
                let mut v = RVector::integer(starts);
                v.set_attr("match.length", Some(RVector::integer(lengths)))?;
                Value::Vector(v)
            }
        };
        elements.push(element);
    }
    Ok(Value::Vector(RVector::list(elements)))
}
