//! The logical quantifiers `all` and `any`.
//!
//! Both fold over every positional argument. A definite answer wins
//! over NA (`all` stops at the first FALSE, `any` at the first TRUE);
//! an unremoved NA only shows when no definite answer exists.

use crate::builtins::CallArgs;
use crate::error::{Conditions, RResult};
use crate::ops::logical::truth_data;
use crate::scalar::{LOGICAL_FALSE, LOGICAL_TRUE, NA_LOGICAL};
use crate::value::{RVector, Value};

fn quantify(
    args: &CallArgs,
    conds: &mut Conditions,
    stop_at: i32,
    empty: i32,
) -> RResult<Value> {
    let na_rm = args.flag("na.rm", false)?;
    let mut saw_na = false;
    for value in &args.positional {
        let Value::Vector(v) = value else { continue };
        for t in truth_data(v, conds)? {
            if t == NA_LOGICAL {
                saw_na = true;
            } else if t == stop_at {
                return Ok(Value::Vector(RVector::logical(vec![stop_at])));
            }
        }
    }
    if saw_na && !na_rm {
        return Ok(Value::Vector(RVector::scalar_na_logical()));
    }
    Ok(Value::Vector(RVector::logical(vec![empty])))
}

pub(crate) fn all(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    quantify(args, conds, LOGICAL_FALSE, LOGICAL_TRUE)
}

pub(crate) fn any(args: &CallArgs, conds: &mut Conditions) -> RResult<Value> {
    quantify(args, conds, LOGICAL_TRUE, LOGICAL_FALSE)
}
