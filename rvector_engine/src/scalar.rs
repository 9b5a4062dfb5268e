//! Scalar element kinds and their missing-value sentinels.
//!
//! Every element kind reserves one bit pattern as its `NA`. Logical and
//! integer share the minimum `i32`; `NA_real_` is a specific quiet-NaN
//! payload distinguishable from an arithmetic `NaN`; a missing string is
//! `None`; raw has no NA at all.

use std::fmt;

/// NA sentinel for integer vectors (`NA_integer_`).
pub const NA_INTEGER: i32 = i32::MIN;

/// NA sentinel for logical vectors. Logical storage is `i32` with
/// `0` = FALSE, `1` = TRUE and this sentinel for NA.
pub const NA_LOGICAL: i32 = i32::MIN;

/// TRUE in logical storage.
pub const LOGICAL_TRUE: i32 = 1;

/// FALSE in logical storage.
pub const LOGICAL_FALSE: i32 = 0;

// The quiet-NaN payload GNU R and FastR use for NA_real_ (low word 1954).
const NA_REAL_BITS: u64 = 0x7ff0_0000_0000_07a2;

/// The `NA_real_` value: a NaN with a reserved payload.
#[inline]
pub fn na_real() -> f64 {
    f64::from_bits(NA_REAL_BITS)
}

/// True only for the `NA_real_` bit pattern, never for an ordinary NaN.
#[inline]
pub fn is_na_real(x: f64) -> bool {
    x.to_bits() == NA_REAL_BITS
}

/// True for both `NA_real_` and ordinary NaN. Most arithmetic treats the
/// two alike; `is.na` does as well, while `is.nan` does not.
#[inline]
pub fn is_na_or_nan(x: f64) -> bool {
    x.is_nan()
}

/// The element kind of a vector.
///
/// The declaration order is the coercion order: combining two kinds
/// promotes to the larger one. `Raw` sits below the numeric chain and
/// never participates in arithmetic; `List` absorbs everything when
/// concatenating but is otherwise outside the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScalarKind {
    Raw,
    Logical,
    Integer,
    Double,
    Complex,
    Character,
    List,
}

impl ScalarKind {
    /// The R `typeof()` name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Raw => "raw",
            ScalarKind::Logical => "logical",
            ScalarKind::Integer => "integer",
            ScalarKind::Double => "double",
            ScalarKind::Complex => "complex",
            ScalarKind::Character => "character",
            ScalarKind::List => "list",
        }
    }

    /// Kinds that take part in numeric promotion (`Logical..=Character`).
    pub fn in_promotion_chain(&self) -> bool {
        matches!(
            self,
            ScalarKind::Logical
                | ScalarKind::Integer
                | ScalarKind::Double
                | ScalarKind::Complex
                | ScalarKind::Character
        )
    }

    /// Kinds arithmetic accepts directly (logical promotes to integer).
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            ScalarKind::Logical | ScalarKind::Integer | ScalarKind::Double | ScalarKind::Complex
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A complex element: a pair of doubles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Complex { re, im }
    }

    /// `NA_complex_`: both parts are `NA_real_`.
    pub fn na() -> Self {
        Complex {
            re: na_real(),
            im: na_real(),
        }
    }

    /// A complex element is NA iff either part carries the NA payload.
    pub fn is_na(&self) -> bool {
        is_na_real(self.re) || is_na_real(self.im)
    }

    /// NA or an ordinary NaN in either part.
    pub fn is_na_or_nan(&self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    pub fn add(self, other: Complex) -> Complex {
        Complex::new(self.re + other.re, self.im + other.im)
    }

    pub fn sub(self, other: Complex) -> Complex {
        Complex::new(self.re - other.re, self.im - other.im)
    }

    pub fn mul(self, other: Complex) -> Complex {
        Complex::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    pub fn div(self, other: Complex) -> Complex {
        let denom = other.re * other.re + other.im * other.im;
        Complex::new(
            (self.re * other.re + self.im * other.im) / denom,
            (self.im * other.re - self.re * other.im) / denom,
        )
    }
}

impl From<f64> for Complex {
    fn from(re: f64) -> Self {
        Complex { re, im: 0.0 }
    }
}
