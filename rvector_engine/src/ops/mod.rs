//! Elementwise operators: arithmetic, comparison, and logical.
//!
//! Each operator family promotes its operands to a common kind, recycles
//! the shorter operand, and assembles result attributes (`names`/`dim`/
//! `dimnames` survive; `class` does not — classed dispatch happens before
//! these functions are reached).

use crate::error::RResult;
use crate::value::RVector;

pub mod arithmetic;
pub mod comparison;
pub mod logical;

pub use arithmetic::arith;
pub use comparison::compare;
pub use logical::{logical_and, logical_not, logical_or, logical_xor};

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    IntDiv,
}

impl ArithOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Pow => "^",
            ArithOp::Mod => "%%",
            ArithOp::IntDiv => "%/%",
        }
    }
}

/// Binary comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }

    /// Apply to an `Ordering` between two non-NA elements.
    pub(crate) fn holds(&self, ord: std::cmp::Ordering) -> bool {
        match self {
            CmpOp::Eq => ord.is_eq(),
            CmpOp::Ne => ord.is_ne(),
            CmpOp::Lt => ord.is_lt(),
            CmpOp::Le => ord.is_le(),
            CmpOp::Gt => ord.is_gt(),
            CmpOp::Ge => ord.is_ge(),
        }
    }
}

/// Carry `names`/`dim`/`dimnames` onto an elementwise result: the first
/// operand of full length wins, the other fills in what is still absent.
pub(crate) fn merge_elementwise_attrs(out: &mut RVector, a: &RVector, b: &RVector) -> RResult<()> {
    let n = out.len();
    for source in [a, b] {
        if source.len() != n {
            continue;
        }
        for name in ["dim", "names", "dimnames"] {
            if out.attr(name).is_none() {
                if let Some(v) = source.attr(name) {
                    out.set_attr(name, Some(v.clone()))?;
                }
            }
        }
    }
    Ok(())
}
