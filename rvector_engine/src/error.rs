//! Error and condition types for the engine.
//!
//! Two severities exist. Fatal errors ([`RError`]) abort the builtin call
//! with no result; they never partially mutate a caller-visible value.
//! Non-fatal conditions ([`Condition`]) degrade individual elements (to NA
//! or NaN) and are accumulated into a [`Conditions`] list returned beside
//! the successful result, one entry per condition kind per call rather than
//! one per offending element.

use thiserror::Error;

/// Fatal errors terminating a single builtin call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RError {
    /// No implementation exists for the builtin on these operand kinds.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Operand kinds cannot be combined (e.g. arithmetic on a list).
    #[error("incompatible types: {0}")]
    IncompatibleTypes(String),

    /// A special attribute would violate its structural invariant
    /// (e.g. `dim` whose product disagrees with the length).
    #[error("invalid attribute: {0}")]
    AttributeInvariant(String),

    /// Malformed builtin arguments (wrong count, bad flag value, ...).
    #[error("invalid argument: {0}")]
    ArgumentError(String),

    /// The builtin name resolves to nothing.
    #[error("could not find function \"{0}\"")]
    UnknownBuiltin(String),
}

/// Result alias used throughout the engine.
pub type RResult<T> = Result<T, RError>;

/// Non-fatal warning conditions raised during a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// At least one element became NA during coercion.
    NaIntroduced,
    /// The longer operand length is not a multiple of the shorter.
    RecycleLengthMismatch,
    /// A domain violation produced NaN (e.g. `log(-1)`).
    NaNProduced,
    /// A value outside `0..=255` (or NA) degraded to `00` in a raw vector.
    OutOfRangeRaw,
    /// Integer arithmetic overflowed 32 bits and produced NA.
    IntegerOverflow,
    /// A nonzero imaginary part was dropped coercing complex downward.
    ImaginaryDiscarded,
    /// A reduction over no non-missing elements returned its identity
    /// (e.g. `max()` of nothing is `-Inf`).
    EmptyReduction,
}

impl Condition {
    /// The warning text the host printer would show.
    pub fn message(&self) -> &'static str {
        match self {
            Condition::NaIntroduced => "NAs introduced by coercion",
            Condition::RecycleLengthMismatch => {
                "longer object length is not a multiple of shorter object length"
            }
            Condition::NaNProduced => "NaNs produced",
            Condition::OutOfRangeRaw => "out-of-range values treated as 0 in coercion to raw",
            Condition::IntegerOverflow => "NAs produced by integer overflow",
            Condition::ImaginaryDiscarded => "imaginary parts discarded in coercion",
            Condition::EmptyReduction => "no non-missing arguments; returning identity",
        }
    }
}

/// Accumulator for the conditions raised by one call.
///
/// Raising the same condition kind twice keeps a single entry, so a
/// coercion pass over a thousand bad elements reports one warning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conditions {
    raised: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Conditions::default()
    }

    /// Record a condition, deduplicating by kind.
    pub fn raise(&mut self, condition: Condition) {
        if !self.raised.contains(&condition) {
            self.raised.push(condition);
        }
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: Conditions) {
        for c in other.raised {
            self.raise(c);
        }
    }

    pub fn contains(&self, condition: Condition) -> bool {
        self.raised.contains(&condition)
    }

    pub fn is_empty(&self) -> bool {
        self.raised.is_empty()
    }

    pub fn len(&self) -> usize {
        self.raised.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.raised.iter()
    }
}
