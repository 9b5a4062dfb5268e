//! The vector value model.
//!
//! An [`RVector`] is a homogeneous buffer of one element kind together
//! with an attribute map. [`Value`] adds the distinguished `NULL`.
//! Assignment copies: cloning a vector yields a logically independent
//! value, so mutating one binding's attributes can never be observed
//! through another.

use crate::error::{RError, RResult};
use crate::scalar::{
    is_na_real, Complex, ScalarKind, LOGICAL_FALSE, LOGICAL_TRUE, NA_INTEGER, NA_LOGICAL,
};

pub mod attributes;

pub use attributes::Attributes;

/// A value a builtin call receives or returns: `NULL` or a vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Vector(RVector),
}

impl Value {
    pub fn vector(v: RVector) -> Value {
        Value::Vector(v)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn len(&self) -> usize {
        match self {
            Value::Null => 0,
            Value::Vector(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_vector(&self) -> Option<&RVector> {
        match self {
            Value::Null => None,
            Value::Vector(v) => Some(v),
        }
    }

    pub fn into_vector(self) -> Option<RVector> {
        match self {
            Value::Null => None,
            Value::Vector(v) => Some(v),
        }
    }

    /// The vector behind this value, or an `ArgumentError` naming the
    /// builtin that required one.
    pub fn expect_vector(&self, builtin: &str) -> RResult<&RVector> {
        self.as_vector().ok_or_else(|| {
            RError::ArgumentError(format!("{}: argument cannot be NULL", builtin))
        })
    }
}

impl From<RVector> for Value {
    fn from(v: RVector) -> Self {
        Value::Vector(v)
    }
}

/// The homogeneous element buffer of a vector, tagged by kind.
///
/// Logical vectors use `i32` storage (`0`/`1`/[`NA_LOGICAL`]) so NA fits
/// without an auxiliary mask; missing strings are `None`.
#[derive(Debug, Clone)]
pub enum VectorData {
    Logical(Vec<i32>),
    Integer(Vec<i32>),
    Double(Vec<f64>),
    Complex(Vec<Complex>),
    Character(Vec<Option<String>>),
    Raw(Vec<u8>),
    List(Vec<Value>),
}

impl VectorData {
    pub fn kind(&self) -> ScalarKind {
        match self {
            VectorData::Logical(_) => ScalarKind::Logical,
            VectorData::Integer(_) => ScalarKind::Integer,
            VectorData::Double(_) => ScalarKind::Double,
            VectorData::Complex(_) => ScalarKind::Complex,
            VectorData::Character(_) => ScalarKind::Character,
            VectorData::Raw(_) => ScalarKind::Raw,
            VectorData::List(_) => ScalarKind::List,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VectorData::Logical(v) => v.len(),
            VectorData::Integer(v) => v.len(),
            VectorData::Double(v) => v.len(),
            VectorData::Complex(v) => v.len(),
            VectorData::Character(v) => v.len(),
            VectorData::Raw(v) => v.len(),
            VectorData::List(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An empty buffer of the given kind.
    pub fn empty(kind: ScalarKind) -> VectorData {
        match kind {
            ScalarKind::Logical => VectorData::Logical(Vec::new()),
            ScalarKind::Integer => VectorData::Integer(Vec::new()),
            ScalarKind::Double => VectorData::Double(Vec::new()),
            ScalarKind::Complex => VectorData::Complex(Vec::new()),
            ScalarKind::Character => VectorData::Character(Vec::new()),
            ScalarKind::Raw => VectorData::Raw(Vec::new()),
            ScalarKind::List => VectorData::List(Vec::new()),
        }
    }

    /// Whether element `i` is NA under this kind's sentinel. `NaN` counts
    /// for doubles and complexes (the `is.na` rule); raw never has NA and
    /// a list element is NA when it is a length-1 NA vector.
    pub fn is_na(&self, i: usize) -> bool {
        match self {
            VectorData::Logical(v) | VectorData::Integer(v) => v[i] == NA_INTEGER,
            VectorData::Double(v) => v[i].is_nan(),
            VectorData::Complex(v) => v[i].is_na_or_nan(),
            VectorData::Character(v) => v[i].is_none(),
            VectorData::Raw(_) => false,
            VectorData::List(v) => match &v[i] {
                Value::Vector(inner) => inner.len() == 1 && inner.data.is_na(0),
                Value::Null => false,
            },
        }
    }

    /// NA under the strict sentinel (ordinary NaN excluded).
    pub fn is_na_strict(&self, i: usize) -> bool {
        match self {
            VectorData::Double(v) => is_na_real(v[i]),
            VectorData::Complex(v) => v[i].is_na(),
            _ => self.is_na(i),
        }
    }
}

// Doubles compare equal when numerically equal or bit-identical, so
// NA == NA and NaN == NaN hold for vector comparison in tests while
// 0.0 == -0.0 still holds through the numeric branch.
impl PartialEq for VectorData {
    fn eq(&self, other: &Self) -> bool {
        fn f64_eq(a: f64, b: f64) -> bool {
            a == b || a.to_bits() == b.to_bits()
        }
        match (self, other) {
            (VectorData::Logical(a), VectorData::Logical(b)) => a == b,
            (VectorData::Integer(a), VectorData::Integer(b)) => a == b,
            (VectorData::Double(a), VectorData::Double(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| f64_eq(x, y))
            }
            (VectorData::Complex(a), VectorData::Complex(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|(x, y)| f64_eq(x.re, y.re) && f64_eq(x.im, y.im))
            }
            (VectorData::Character(a), VectorData::Character(b)) => a == b,
            (VectorData::Raw(a), VectorData::Raw(b)) => a == b,
            (VectorData::List(a), VectorData::List(b)) => a == b,
            _ => false,
        }
    }
}

/// A homogeneous, attributed vector.
#[derive(Debug, Clone, PartialEq)]
pub struct RVector {
    pub data: VectorData,
    attrs: Attributes,
}

impl RVector {
    pub fn new(data: VectorData) -> Self {
        RVector {
            data,
            attrs: Attributes::new(),
        }
    }

    // ---- constructors ------------------------------------------------

    pub fn logical(values: Vec<i32>) -> Self {
        RVector::new(VectorData::Logical(values))
    }

    pub fn logical_from_bools(values: Vec<bool>) -> Self {
        RVector::logical(
            values
                .into_iter()
                .map(|b| if b { LOGICAL_TRUE } else { LOGICAL_FALSE })
                .collect(),
        )
    }

    pub fn integer(values: Vec<i32>) -> Self {
        RVector::new(VectorData::Integer(values))
    }

    pub fn double(values: Vec<f64>) -> Self {
        RVector::new(VectorData::Double(values))
    }

    pub fn complex(values: Vec<Complex>) -> Self {
        RVector::new(VectorData::Complex(values))
    }

    pub fn character(values: Vec<Option<String>>) -> Self {
        RVector::new(VectorData::Character(values))
    }

    pub fn strings(values: Vec<&str>) -> Self {
        RVector::character(values.into_iter().map(|s| Some(s.to_string())).collect())
    }

    pub fn raw(values: Vec<u8>) -> Self {
        RVector::new(VectorData::Raw(values))
    }

    pub fn list(values: Vec<Value>) -> Self {
        RVector::new(VectorData::List(values))
    }

    pub fn scalar_logical(value: bool) -> Self {
        RVector::logical(vec![if value { LOGICAL_TRUE } else { LOGICAL_FALSE }])
    }

    pub fn scalar_na_logical() -> Self {
        RVector::logical(vec![NA_LOGICAL])
    }

    pub fn scalar_integer(value: i32) -> Self {
        RVector::integer(vec![value])
    }

    pub fn scalar_double(value: f64) -> Self {
        RVector::double(vec![value])
    }

    pub fn scalar_string(value: &str) -> Self {
        RVector::character(vec![Some(value.to_string())])
    }

    // ---- basic accessors ---------------------------------------------

    pub fn kind(&self) -> ScalarKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_na(&self, i: usize) -> bool {
        self.data.is_na(i)
    }

    pub fn logicals(&self) -> Option<&[i32]> {
        match &self.data {
            VectorData::Logical(v) => Some(v),
            _ => None,
        }
    }

    pub fn integers(&self) -> Option<&[i32]> {
        match &self.data {
            VectorData::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn doubles(&self) -> Option<&[f64]> {
        match &self.data {
            VectorData::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn complexes(&self) -> Option<&[Complex]> {
        match &self.data {
            VectorData::Complex(v) => Some(v),
            _ => None,
        }
    }

    pub fn characters(&self) -> Option<&[Option<String>]> {
        match &self.data {
            VectorData::Character(v) => Some(v),
            _ => None,
        }
    }

    pub fn raws(&self) -> Option<&[u8]> {
        match &self.data {
            VectorData::Raw(v) => Some(v),
            _ => None,
        }
    }

    pub fn list_elements(&self) -> Option<&[Value]> {
        match &self.data {
            VectorData::List(v) => Some(v),
            _ => None,
        }
    }

    /// A length-1 logical's truth value (`None` for NA). Used for flag
    /// arguments such as `na.rm`.
    pub fn as_flag(&self) -> Option<Option<bool>> {
        match &self.data {
            VectorData::Logical(v) if v.len() == 1 => Some(match v[0] {
                x if x == NA_LOGICAL => None,
                0 => Some(false),
                _ => Some(true),
            }),
            _ => None,
        }
    }

    // ---- attributes --------------------------------------------------

    pub fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&RVector> {
        self.attrs.get(name)
    }

    /// Set, replace, or (with `None`) remove an attribute, enforcing the
    /// structural invariants of the special names. Values for the special
    /// names must already be of the required kind; builtins coerce before
    /// calling this.
    pub fn set_attr(&mut self, name: &str, value: Option<RVector>) -> RResult<()> {
        let Some(value) = value else {
            self.attrs.remove(name);
            // Without dim there is nothing for dimnames to describe.
            if name == "dim" {
                self.attrs.remove("dimnames");
            }
            return Ok(());
        };
        match name {
            "names" => {
                if value.kind() != ScalarKind::Character {
                    return Err(RError::AttributeInvariant(
                        "'names' must be a character vector".to_string(),
                    ));
                }
                if value.len() != self.len() {
                    return Err(RError::AttributeInvariant(format!(
                        "'names' attribute [{}] must be the same length as the vector [{}]",
                        value.len(),
                        self.len()
                    )));
                }
            }
            "dim" => {
                let Some(dims) = value.integers() else {
                    return Err(RError::AttributeInvariant(
                        "'dim' must be an integer vector".to_string(),
                    ));
                };
                if dims.is_empty() {
                    return Err(RError::AttributeInvariant(
                        "length-0 dimension vector is invalid".to_string(),
                    ));
                }
                let mut product: usize = 1;
                for &d in dims {
                    if d == NA_INTEGER || d < 0 {
                        return Err(RError::AttributeInvariant(
                            "the dims contain missing or negative values".to_string(),
                        ));
                    }
                    product = product.saturating_mul(d as usize);
                }
                if product != self.len() {
                    return Err(RError::AttributeInvariant(format!(
                        "dims [product {}] do not match the length of object [{}]",
                        product,
                        self.len()
                    )));
                }
                // Setting dim invalidates names and dimnames.
                self.attrs.remove("names");
                self.attrs.remove("dimnames");
            }
            "dimnames" => {
                let dims: Vec<i32> = match self.attr("dim").and_then(|d| d.integers()) {
                    Some(d) => d.to_vec(),
                    None => {
                        return Err(RError::AttributeInvariant(
                            "'dimnames' applied to non-array".to_string(),
                        ))
                    }
                };
                let Some(parts) = value.list_elements() else {
                    return Err(RError::AttributeInvariant(
                        "'dimnames' must be a list".to_string(),
                    ));
                };
                if parts.len() != dims.len() {
                    return Err(RError::AttributeInvariant(format!(
                        "length of 'dimnames' [{}] must match that of 'dims' [{}]",
                        parts.len(),
                        dims.len()
                    )));
                }
                for (axis, part) in parts.iter().enumerate() {
                    match part {
                        Value::Null => {}
                        Value::Vector(v) => {
                            if v.kind() != ScalarKind::Character {
                                return Err(RError::AttributeInvariant(format!(
                                    "invalid type for dimnames component {}",
                                    axis + 1
                                )));
                            }
                            if v.len() != dims[axis] as usize {
                                return Err(RError::AttributeInvariant(format!(
                                    "length of 'dimnames' [{}] not equal to array extent",
                                    axis + 1
                                )));
                            }
                        }
                    }
                }
            }
            "class" | "levels" => {
                if value.kind() != ScalarKind::Character {
                    return Err(RError::AttributeInvariant(format!(
                        "'{}' must be a character vector",
                        name
                    )));
                }
            }
            _ => {}
        }
        self.attrs.set(name, value);
        Ok(())
    }

    /// Replace the whole attribute map (used when a method restores the
    /// attributes of a classed input onto a freshly computed result).
    pub fn set_attributes(&mut self, attrs: Attributes) {
        self.attrs = attrs;
    }

    // ---- class handling ----------------------------------------------

    /// The explicit class tags, in dispatch order. Empty when unclassed.
    pub fn class_tags(&self) -> Vec<String> {
        match self.attr("class").and_then(|c| c.characters()) {
            Some(tags) => tags.iter().flatten().cloned().collect(),
            None => Vec::new(),
        }
    }

    pub fn has_class(&self, tag: &str) -> bool {
        self.class_tags().iter().any(|t| t == tag)
    }

    pub fn is_classed(&self) -> bool {
        self.attr("class").is_some()
    }

    /// A copy of this vector without its `class` attribute: what a class
    /// method hands to the default implementation.
    pub fn unclassed(&self) -> RVector {
        let mut out = self.clone();
        out.attrs.remove("class");
        out
    }

    /// Copy `names`/`dim`/`dimnames` (not `class` or `levels`) from a
    /// source of the same length; elementwise operations use this to
    /// carry shape while dropping classedness.
    pub fn copy_shape_attrs_from(&mut self, source: &RVector) {
        if source.len() != self.len() {
            return;
        }
        for name in ["names", "dim", "dimnames"] {
            if let Some(v) = source.attr(name) {
                // Invariants were checked when the source acquired them.
                self.attrs.set(name, v.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::na_real;

    #[test]
    fn test_vector_equality_treats_na_as_equal() {
        let a = RVector::double(vec![1.0, na_real()]);
        let b = RVector::double(vec![1.0, na_real()]);
        assert_eq!(a, b);
        let c = RVector::double(vec![1.0, f64::NAN]);
        assert_ne!(a, c);
    }

    #[test]
    fn test_names_length_invariant() {
        let mut v = RVector::integer(vec![1, 2, 3]);
        let bad = v.set_attr("names", Some(RVector::strings(vec!["a", "b"])));
        assert!(matches!(bad, Err(RError::AttributeInvariant(_))));
        v.set_attr("names", Some(RVector::strings(vec!["a", "b", "c"])))
            .unwrap();
        assert_eq!(v.attr("names").unwrap().len(), 3);
    }

    #[test]
    fn test_dim_product_invariant() {
        let mut v = RVector::integer(vec![1, 2, 3, 4, 5, 6]);
        v.set_attr("dim", Some(RVector::integer(vec![2, 3]))).unwrap();
        let bad = v.set_attr("dim", Some(RVector::integer(vec![4, 2])));
        assert!(matches!(bad, Err(RError::AttributeInvariant(_))));
    }

    #[test]
    fn test_removing_dim_removes_dimnames() {
        let mut v = RVector::integer(vec![1, 2]);
        v.set_attr("dim", Some(RVector::integer(vec![2, 1]))).unwrap();
        v.set_attr(
            "dimnames",
            Some(RVector::list(vec![
                Value::Vector(RVector::strings(vec!["r1", "r2"])),
                Value::Null,
            ])),
        )
        .unwrap();
        v.set_attr("dim", None).unwrap();
        assert!(v.attr("dimnames").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut x = RVector::integer(vec![1, 2]);
        x.set_attr("foo", Some(RVector::strings(vec!["a"]))).unwrap();
        let y = x.clone();
        x.set_attr("foo", Some(RVector::strings(vec!["c"]))).unwrap();
        assert_eq!(
            y.attr("foo"),
            Some(&RVector::strings(vec!["a"]))
        );
    }

    #[test]
    fn test_class_tags_order() {
        let mut v = RVector::integer(vec![1]);
        v.set_attr("class", Some(RVector::strings(vec!["ordered", "factor"])))
            .unwrap();
        assert_eq!(v.class_tags(), vec!["ordered", "factor"]);
        assert!(v.has_class("factor"));
        assert!(!v.unclassed().is_classed());
    }
}
