//! Attribute and class access builtins, including the replacement
//! forms (`attr<-`, `class<-`, `names<-`, `dim<-`, ...). Replacement
//! builtins take the target as their first argument and return the
//! modified copy.

use crate::builtins::CallArgs;
use crate::coerce::coerced;
use crate::error::{Conditions, RError, RResult};
use crate::scalar::ScalarKind;
use crate::value::{RVector, Value};

fn attr_name(args: &CallArgs, i: usize, builtin: &str) -> RResult<String> {
    let v = args.require_vector(i, builtin)?;
    match v.characters() {
        Some([Some(name)]) => Ok(name.clone()),
        _ => Err(RError::ArgumentError(format!(
            "{}: 'which' must be a single character string",
            builtin
        ))),
    }
}

/// `attr(x, which)`: exact-name lookup, `NULL` when absent.
pub(crate) fn attr_get(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let which = attr_name(args, 1, "attr")?;
    match args.require(0, "attr")? {
        Value::Null => Ok(Value::Null),
        Value::Vector(v) => Ok(match v.attr(&which) {
            Some(a) => Value::Vector(a.clone()),
            None => Value::Null,
        }),
    }
}

pub(crate) fn attr_assign(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let mut x = args.require_vector(0, "attr<-")?.clone();
    let which = attr_name(args, 1, "attr<-")?;
    match args.require(2, "attr<-")? {
        Value::Null => x.set_attr(&which, None)?,
        Value::Vector(v) => {
            let v = if which == "names" {
                coerced(v, ScalarKind::Character, conds)?
            } else {
                v.clone()
            };
            x.set_attr(&which, Some(v))?;
        }
    }
    Ok(Value::Vector(x))
}

/// `attributes(x)`: a named list of every attribute, or `NULL`.
pub(crate) fn attributes_of(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let v = match args.require(0, "attributes")? {
        Value::Null => return Ok(Value::Null),
        Value::Vector(v) => v,
    };
    if v.attributes().is_empty() {
        return Ok(Value::Null);
    }
    let mut names = Vec::new();
    let mut values = Vec::new();
    for (name, value) in v.attributes().iter() {
        names.push(Some(name.to_string()));
        values.push(Value::Vector(value.clone()));
    }
    let mut out = RVector::list(values);
    out.set_attr("names", Some(RVector::character(names)))?;
    Ok(Value::Vector(out))
}

/// The implicit class of an unclassed vector.
fn implicit_class(v: &RVector) -> Vec<Option<String>> {
    if let Some(dims) = v.attr("dim") {
        if dims.len() == 2 {
            return vec![Some("matrix".to_string()), Some("array".to_string())];
        }
        if dims.len() > 2 {
            return vec![Some("array".to_string())];
        }
    }
    let name = match v.kind() {
        ScalarKind::Double => "numeric",
        other => other.name(),
    };
    vec![Some(name.to_string())]
}

pub(crate) fn class_of(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let v = match args.require(0, "class")? {
        Value::Null => return Ok(Value::Vector(RVector::scalar_string("NULL"))),
        Value::Vector(v) => v,
    };
    match v.attr("class") {
        Some(c) => Ok(Value::Vector(c.clone())),
        None => Ok(Value::Vector(RVector::character(implicit_class(v)))),
    }
}

/// `class<-`. Assigning a basic kind name coerces the data and clears
/// the class attribute instead of recording a tag; assigning `NULL`
/// just clears.
pub(crate) fn class_assign(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let mut x = args.require_vector(0, "class<-")?.clone();
    let value = match args.require(1, "class<-")? {
        Value::Null => {
            x.set_attr("class", None)?;
            return Ok(Value::Vector(x));
        }
        Value::Vector(v) => v,
    };

    if let Some([Some(single)]) = value.characters() {
        let target = match single.as_str() {
            "logical" => Some(ScalarKind::Logical),
            "integer" => Some(ScalarKind::Integer),
            "numeric" | "double" => Some(ScalarKind::Double),
            "complex" => Some(ScalarKind::Complex),
            "character" => Some(ScalarKind::Character),
            "raw" => Some(ScalarKind::Raw),
            "list" => Some(ScalarKind::List),
            _ => None,
        };
        if let Some(target) = target {
            let mut out = coerced(&x, target, conds)?;
            // Coercion dropped the attributes; restore all but class.
            out.set_attributes(x.attributes().clone());
            out.set_attr("class", None)?;
            return Ok(Value::Vector(out));
        }
    }

    let tags = coerced(value, ScalarKind::Character, conds)?;
    if tags.is_empty() {
        return Err(RError::ArgumentError(
            "invalid replacement object to be a class string".to_string(),
        ));
    }
    x.set_attr("class", Some(tags))?;
    Ok(Value::Vector(x))
}

/// `oldClass`: the explicit class attribute only, never implicit.
pub(crate) fn old_class(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    match args.require(0, "oldClass")? {
        Value::Null => Ok(Value::Null),
        Value::Vector(v) => Ok(match v.attr("class") {
            Some(c) => Value::Vector(c.clone()),
            None => Value::Null,
        }),
    }
}

pub(crate) fn names(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    match args.require(0, "names")? {
        Value::Null => Ok(Value::Null),
        Value::Vector(v) => Ok(match v.attr("names") {
            Some(n) => Value::Vector(n.clone()),
            None => Value::Null,
        }),
    }
}

/// `names<-`: coerces to character and right-pads with NA when the
/// replacement is shorter than the vector.
pub(crate) fn names_assign(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let mut x = args.require_vector(0, "names<-")?.clone();
    match args.require(1, "names<-")? {
        Value::Null => x.set_attr("names", None)?,
        Value::Vector(v) => {
            if v.len() > x.len() {
                return Err(RError::AttributeInvariant(format!(
                    "'names' attribute [{}] must be the same length as the vector [{}]",
                    v.len(),
                    x.len()
                )));
            }
            let v = coerced(v, ScalarKind::Character, conds)?;
            let mut padded = v.characters().unwrap_or(&[]).to_vec();
            padded.resize(x.len(), None);
            x.set_attr("names", Some(RVector::character(padded)))?;
        }
    }
    Ok(Value::Vector(x))
}

pub(crate) fn dim(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    match args.require(0, "dim")? {
        Value::Null => Ok(Value::Null),
        Value::Vector(v) => Ok(match v.attr("dim") {
            Some(d) => Value::Vector(d.clone()),
            None => Value::Null,
        }),
    }
}

pub(crate) fn dim_assign(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let mut x = args.require_vector(0, "dim<-")?.clone();
    match args.require(1, "dim<-")? {
        Value::Null => x.set_attr("dim", None)?,
        Value::Vector(v) => {
            let v = coerced(v, ScalarKind::Integer, conds)?;
            x.set_attr("dim", Some(v))?;
        }
    }
    Ok(Value::Vector(x))
}

pub(crate) fn dimnames(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    match args.require(0, "dimnames")? {
        Value::Null => Ok(Value::Null),
        Value::Vector(v) => Ok(match v.attr("dimnames") {
            Some(d) => Value::Vector(d.clone()),
            None => Value::Null,
        }),
    }
}

pub(crate) fn dimnames_assign(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let mut x = args.require_vector(0, "dimnames<-")?.clone();
    match args.require(1, "dimnames<-")? {
        Value::Null => x.set_attr("dimnames", None)?,
        Value::Vector(v) => x.set_attr("dimnames", Some(v.clone()))?,
    }
    Ok(Value::Vector(x))
}

pub(crate) fn levels(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    match args.require(0, "levels")? {
        Value::Null => Ok(Value::Null),
        Value::Vector(v) => Ok(match v.attr("levels") {
            Some(l) => Value::Vector(l.clone()),
            None => Value::Null,
        }),
    }
}

pub(crate) fn nlevels(args: &CallArgs, _conds: &mut Conditions) -> RResult<Value> {
    let n = match args.require(0, "nlevels")? {
        Value::Null => 0,
        Value::Vector(v) => v.attr("levels").map_or(0, |l| l.len()),
    };
    Ok(Value::Vector(RVector::scalar_integer(n as i32)))
}

/// `levels<-`: on a factor the replacement must cover every existing
/// level; a shorter set would orphan codes.
pub(crate) fn levels_assign(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    let mut x = args.require_vector(0, "levels<-")?.clone();
    match args.require(1, "levels<-")? {
        Value::Null => x.set_attr("levels", None)?,
        Value::Vector(v) => {
            let v = coerced(v, ScalarKind::Character, conds)?;
            if x.has_class("factor") {
                let old = x.attr("levels").map_or(0, |l| l.len());
                if v.len() < old {
                    return Err(RError::ArgumentError(
                        "number of levels differs".to_string(),
                    ));
                }
            }
            x.set_attr("levels", Some(v))?;
        }
    }
    Ok(Value::Vector(x))
}
