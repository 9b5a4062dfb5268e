//! The coercion engine: promotion over the kind lattice and value-level
//! conversion between kinds.
//!
//! `coerce_data` is total at the vector level. Individual elements that do
//! not survive a conversion become NA, and one condition per kind of
//! degradation is recorded in the caller's [`Conditions`].
//!
//! Conversion subtleties mirrored from the reference implementation:
//! double → integer truncates toward zero; out-of-range, `Inf` → NA with a
//! warning; string parsing trims surrounding whitespace and accepts the
//! `Inf`/`NaN`/`NA` spellings and `0x` hex prefixes.

use crate::error::{Condition, Conditions, RError, RResult};
use crate::scalar::{
    is_na_real, na_real, Complex, ScalarKind, LOGICAL_FALSE, LOGICAL_TRUE, NA_INTEGER, NA_LOGICAL,
};
use crate::value::{RVector, Value, VectorData};

/// The common kind two operands promote to: the maximum in the lattice.
pub fn common_kind(a: ScalarKind, b: ScalarKind) -> ScalarKind {
    a.max(b)
}

/// The storage kind for arithmetic on two operands. Logical promotes to
/// integer; character, raw and list operands are rejected.
pub fn arithmetic_kind(a: ScalarKind, b: ScalarKind) -> RResult<ScalarKind> {
    if !a.is_arithmetic() || !b.is_arithmetic() {
        return Err(RError::IncompatibleTypes(
            "non-numeric argument to binary operator".to_string(),
        ));
    }
    Ok(common_kind(common_kind(a, b), ScalarKind::Integer))
}

/// Coerce a vector's elements to `target`, recording degradations in
/// `conds`. Attributes are not carried; callers decide which survive.
pub fn coerce_data(v: &RVector, target: ScalarKind, conds: &mut Conditions) -> RResult<VectorData> {
    if v.kind() == target {
        return Ok(v.data.clone());
    }
    let n = v.len();
    match target {
        ScalarKind::Logical => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(elem_to_logical(&v.data, i)?);
            }
            Ok(VectorData::Logical(out))
        }
        ScalarKind::Integer => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(elem_to_integer(&v.data, i, conds)?);
            }
            Ok(VectorData::Integer(out))
        }
        ScalarKind::Double => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(elem_to_double(&v.data, i, conds)?);
            }
            Ok(VectorData::Double(out))
        }
        ScalarKind::Complex => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(elem_to_complex(&v.data, i, conds)?);
            }
            Ok(VectorData::Complex(out))
        }
        ScalarKind::Character => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(elem_to_string(&v.data, i)?);
            }
            Ok(VectorData::Character(out))
        }
        ScalarKind::Raw => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(elem_to_raw(&v.data, i, conds)?);
            }
            Ok(VectorData::Raw(out))
        }
        ScalarKind::List => {
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                out.push(scalar_at(&v.data, i));
            }
            Ok(VectorData::List(out))
        }
    }
}

/// Convenience wrapper building an attribute-free vector of `target` kind.
pub fn coerced(v: &RVector, target: ScalarKind, conds: &mut Conditions) -> RResult<RVector> {
    Ok(RVector::new(coerce_data(v, target, conds)?))
}

/// Element `i` as a standalone length-1 value of the source kind (the
/// list-coercion element).
pub(crate) fn scalar_at(data: &VectorData, i: usize) -> Value {
    let v = match data {
        VectorData::Logical(v) => RVector::logical(vec![v[i]]),
        VectorData::Integer(v) => RVector::integer(vec![v[i]]),
        VectorData::Double(v) => RVector::double(vec![v[i]]),
        VectorData::Complex(v) => RVector::complex(vec![v[i]]),
        VectorData::Character(v) => RVector::character(vec![v[i].clone()]),
        VectorData::Raw(v) => RVector::raw(vec![v[i]]),
        VectorData::List(v) => return v[i].clone(),
    };
    Value::Vector(v)
}

fn list_coercion_error(target: ScalarKind) -> RError {
    RError::IncompatibleTypes(format!(
        "'list' object cannot be coerced to type '{}'",
        target.name()
    ))
}

/// Unwrap a list element for scalar coercion: only length-1 vector
/// components can cross into an atomic vector.
fn list_scalar(values: &[Value], i: usize, target: ScalarKind) -> RResult<RVector> {
    match &values[i] {
        Value::Vector(inner) if inner.len() == 1 && inner.kind() != ScalarKind::List => {
            Ok(inner.clone())
        }
        _ => Err(list_coercion_error(target)),
    }
}

// ---- per-element conversions -----------------------------------------

fn elem_to_logical(data: &VectorData, i: usize) -> RResult<i32> {
    Ok(match data {
        VectorData::Logical(v) => v[i],
        VectorData::Integer(v) => {
            if v[i] == NA_INTEGER {
                NA_LOGICAL
            } else if v[i] == 0 {
                LOGICAL_FALSE
            } else {
                LOGICAL_TRUE
            }
        }
        VectorData::Double(v) => double_to_logical(v[i]),
        VectorData::Complex(v) => {
            if v[i].is_na_or_nan() {
                NA_LOGICAL
            } else if v[i].re == 0.0 && v[i].im == 0.0 {
                LOGICAL_FALSE
            } else {
                LOGICAL_TRUE
            }
        }
        VectorData::Character(v) => match &v[i] {
            None => NA_LOGICAL,
            Some(s) => string_to_logical(s),
        },
        VectorData::Raw(v) => {
            if v[i] == 0 {
                LOGICAL_FALSE
            } else {
                LOGICAL_TRUE
            }
        }
        VectorData::List(values) => {
            let inner = list_scalar(values, i, ScalarKind::Logical)?;
            elem_to_logical(&inner.data, 0)?
        }
    })
}

fn elem_to_integer(data: &VectorData, i: usize, conds: &mut Conditions) -> RResult<i32> {
    Ok(match data {
        VectorData::Logical(v) | VectorData::Integer(v) => v[i],
        VectorData::Double(v) => double_to_integer(v[i], conds),
        VectorData::Complex(v) => {
            let c = v[i];
            if c.is_na_or_nan() {
                NA_INTEGER
            } else {
                if c.im != 0.0 {
                    conds.raise(Condition::ImaginaryDiscarded);
                }
                double_to_integer(c.re, conds)
            }
        }
        VectorData::Character(v) => match &v[i] {
            None => NA_INTEGER,
            Some(s) => string_to_integer(s, conds),
        },
        VectorData::Raw(v) => i32::from(v[i]),
        VectorData::List(values) => {
            let inner = list_scalar(values, i, ScalarKind::Integer)?;
            elem_to_integer(&inner.data, 0, conds)?
        }
    })
}

fn elem_to_double(data: &VectorData, i: usize, conds: &mut Conditions) -> RResult<f64> {
    Ok(match data {
        VectorData::Logical(v) | VectorData::Integer(v) => {
            if v[i] == NA_INTEGER {
                na_real()
            } else {
                f64::from(v[i])
            }
        }
        VectorData::Double(v) => v[i],
        VectorData::Complex(v) => {
            let c = v[i];
            if c.is_na() {
                na_real()
            } else {
                if c.im != 0.0 {
                    conds.raise(Condition::ImaginaryDiscarded);
                }
                c.re
            }
        }
        VectorData::Character(v) => match &v[i] {
            None => na_real(),
            Some(s) => string_to_double(s, conds),
        },
        VectorData::Raw(v) => f64::from(v[i]),
        VectorData::List(values) => {
            let inner = list_scalar(values, i, ScalarKind::Double)?;
            elem_to_double(&inner.data, 0, conds)?
        }
    })
}

fn elem_to_complex(data: &VectorData, i: usize, conds: &mut Conditions) -> RResult<Complex> {
    Ok(match data {
        VectorData::Logical(v) | VectorData::Integer(v) => {
            if v[i] == NA_INTEGER {
                Complex::na()
            } else {
                Complex::from(f64::from(v[i]))
            }
        }
        VectorData::Double(v) => {
            if is_na_real(v[i]) {
                Complex::na()
            } else {
                Complex::from(v[i])
            }
        }
        VectorData::Complex(v) => v[i],
        VectorData::Character(v) => match &v[i] {
            None => Complex::na(),
            Some(s) => string_to_complex(s, conds),
        },
        VectorData::Raw(v) => Complex::from(f64::from(v[i])),
        VectorData::List(values) => {
            let inner = list_scalar(values, i, ScalarKind::Complex)?;
            elem_to_complex(&inner.data, 0, conds)?
        }
    })
}

pub(crate) fn elem_to_string(data: &VectorData, i: usize) -> RResult<Option<String>> {
    Ok(match data {
        VectorData::Logical(v) => match v[i] {
            x if x == NA_LOGICAL => None,
            0 => Some("FALSE".to_string()),
            _ => Some("TRUE".to_string()),
        },
        VectorData::Integer(v) => {
            if v[i] == NA_INTEGER {
                None
            } else {
                Some(v[i].to_string())
            }
        }
        VectorData::Double(v) => {
            if is_na_real(v[i]) {
                None
            } else {
                Some(format_double(v[i]))
            }
        }
        VectorData::Complex(v) => {
            if v[i].is_na() {
                None
            } else {
                Some(format_complex(v[i]))
            }
        }
        VectorData::Character(v) => v[i].clone(),
        VectorData::Raw(v) => Some(format!("{:02x}", v[i])),
        VectorData::List(values) => {
            let inner = list_scalar(values, i, ScalarKind::Character)?;
            elem_to_string(&inner.data, 0)?
        }
    })
}

fn elem_to_raw(data: &VectorData, i: usize, conds: &mut Conditions) -> RResult<u8> {
    // Raw has no NA bit pattern: anything missing or out of range
    // degrades to 0x00 and signals the condition.
    let coerce_double = |x: f64, conds: &mut Conditions| -> u8 {
        if x.is_nan() || !(0.0..=255.0).contains(&x.trunc()) {
            conds.raise(Condition::OutOfRangeRaw);
            0
        } else {
            x.trunc() as u8
        }
    };
    Ok(match data {
        VectorData::Logical(v) | VectorData::Integer(v) => {
            if v[i] == NA_INTEGER || !(0..=255).contains(&v[i]) {
                conds.raise(Condition::OutOfRangeRaw);
                0
            } else {
                v[i] as u8
            }
        }
        VectorData::Double(v) => coerce_double(v[i], conds),
        VectorData::Complex(v) => {
            if !v[i].is_na_or_nan() && v[i].im != 0.0 {
                conds.raise(Condition::ImaginaryDiscarded);
            }
            coerce_double(v[i].re, conds)
        }
        VectorData::Character(v) => match &v[i] {
            None => {
                conds.raise(Condition::OutOfRangeRaw);
                0
            }
            Some(s) => {
                let mut scratch = Conditions::new();
                coerce_double(string_to_double(s, &mut scratch), conds)
            }
        },
        VectorData::Raw(v) => v[i],
        VectorData::List(values) => {
            let inner = list_scalar(values, i, ScalarKind::Raw)?;
            elem_to_raw(&inner.data, 0, conds)?
        }
    })
}

// ---- scalar conversion rules -----------------------------------------

pub(crate) fn double_to_logical(x: f64) -> i32 {
    if x.is_nan() {
        NA_LOGICAL
    } else if x == 0.0 {
        LOGICAL_FALSE
    } else {
        LOGICAL_TRUE
    }
}

/// Truncation toward zero with the 32-bit range check. `NA`/`NaN` pass
/// through silently; `Inf` and out-of-range values warn.
pub(crate) fn double_to_integer(x: f64, conds: &mut Conditions) -> i32 {
    if x.is_nan() {
        return NA_INTEGER;
    }
    let t = x.trunc();
    if !(-2_147_483_647.0..=2_147_483_647.0).contains(&t) {
        conds.raise(Condition::NaIntroduced);
        return NA_INTEGER;
    }
    t as i32
}

pub(crate) fn string_to_logical(s: &str) -> i32 {
    match s.trim() {
        "TRUE" | "true" | "T" | "True" => LOGICAL_TRUE,
        "FALSE" | "false" | "F" | "False" => LOGICAL_FALSE,
        // Everything else, including "NA", is NA without a warning.
        _ => NA_LOGICAL,
    }
}

/// Parse a string as a double, accepting surrounding whitespace, the
/// `Inf`/`NaN` spellings and `0x` hex prefixes. Failures yield NA with a
/// coercion warning.
pub(crate) fn string_to_double(s: &str, conds: &mut Conditions) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "Inf" | "+Inf" => return f64::INFINITY,
        "-Inf" => return f64::NEG_INFINITY,
        "NaN" | "+NaN" | "-NaN" => return f64::NAN,
        "NA" => return na_real(),
        _ => {}
    }
    if let Some(hex) = parse_hex(trimmed) {
        return hex;
    }
    match trimmed.parse::<f64>() {
        Ok(x) => x,
        Err(_) => {
            conds.raise(Condition::NaIntroduced);
            na_real()
        }
    }
}

fn parse_hex(s: &str) -> Option<f64> {
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X"))?;
    u64::from_str_radix(digits, 16).ok().map(|v| sign * v as f64)
}

/// Parse a string as an integer: the double parse followed by the
/// truncating range-checked conversion.
pub(crate) fn string_to_integer(s: &str, conds: &mut Conditions) -> i32 {
    let d = string_to_double(s, conds);
    if is_na_real(d) {
        return NA_INTEGER;
    }
    double_to_integer(d, conds)
}

/// Parse `"a+bi"` / `"bi"` / `"a"` forms.
pub(crate) fn string_to_complex(s: &str, conds: &mut Conditions) -> Complex {
    let trimmed = s.trim();
    if let Some(body) = trimmed.strip_suffix('i') {
        // Split real and imaginary at the last +/- that is not an
        // exponent sign and not the leading sign.
        let bytes = body.as_bytes();
        let mut split = None;
        for idx in (1..bytes.len()).rev() {
            let c = bytes[idx];
            if (c == b'+' || c == b'-') && !matches!(bytes[idx - 1], b'e' | b'E') {
                split = Some(idx);
                break;
            }
        }
        let (re_str, im_str) = match split {
            Some(idx) => (&body[..idx], &body[idx..]),
            None => ("0", body),
        };
        let mut scratch = Conditions::new();
        let re = string_to_double(re_str, &mut scratch);
        let im = match im_str {
            "+" => 1.0,
            "-" => -1.0,
            _ => string_to_double(im_str, &mut scratch),
        };
        if scratch.contains(Condition::NaIntroduced) {
            conds.raise(Condition::NaIntroduced);
            return Complex::na();
        }
        return Complex::new(re, im);
    }
    let re = string_to_double(trimmed, conds);
    if is_na_real(re) {
        Complex::na()
    } else {
        Complex::from(re)
    }
}

/// R's default `as.character` rendering of a non-NA double: integral
/// values print bare, everything else uses the shortest representation.
pub(crate) fn format_double(x: f64) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if x == x.trunc() && x.abs() < 1e15 {
        return format!("{}", x as i64);
    }
    format!("{}", x)
}

pub(crate) fn format_complex(c: Complex) -> String {
    let re = format_double(c.re);
    let im = format_double(c.im.abs());
    let sign = if c.im.is_sign_negative() && !c.im.is_nan() {
        '-'
    } else {
        '+'
    };
    format!("{}{}{}i", re, sign, im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_promotion_is_max() {
        assert_eq!(
            common_kind(ScalarKind::Logical, ScalarKind::Double),
            ScalarKind::Double
        );
        assert_eq!(
            common_kind(ScalarKind::Character, ScalarKind::Integer),
            ScalarKind::Character
        );
    }

    #[test]
    fn test_arithmetic_kind_rejects_character() {
        assert!(arithmetic_kind(ScalarKind::Double, ScalarKind::Character).is_err());
        assert!(arithmetic_kind(ScalarKind::List, ScalarKind::Integer).is_err());
        assert_eq!(
            arithmetic_kind(ScalarKind::Logical, ScalarKind::Logical).unwrap(),
            ScalarKind::Integer
        );
    }

    #[test]
    fn test_double_to_integer_truncates_toward_zero() {
        let mut conds = Conditions::new();
        assert_eq!(double_to_integer(4999.000_000_000_1, &mut conds), 4999);
        assert_eq!(double_to_integer(-1.9, &mut conds), -1);
        assert_eq!(double_to_integer(2e5, &mut conds), 200_000);
        assert!(conds.is_empty());
    }

    #[test]
    fn test_double_to_integer_out_of_range_is_na_with_warning() {
        let mut conds = Conditions::new();
        assert_eq!(double_to_integer(3e10, &mut conds), NA_INTEGER);
        assert_eq!(double_to_integer(f64::INFINITY, &mut conds), NA_INTEGER);
        assert!(conds.contains(Condition::NaIntroduced));
        // NaN converts silently.
        let mut quiet = Conditions::new();
        assert_eq!(double_to_integer(f64::NAN, &mut quiet), NA_INTEGER);
        assert!(quiet.is_empty());
    }

    #[test]
    fn test_string_parsing_trims_whitespace() {
        let mut conds = Conditions::new();
        assert_eq!(string_to_integer("  33", &mut conds), 33);
        assert_eq!(string_to_integer("-1", &mut conds), -1);
        assert_eq!(string_to_double(" 2.5 ", &mut conds), 2.5);
        assert!(conds.is_empty());
    }

    #[test]
    fn test_unparseable_string_is_na_with_warning() {
        let mut conds = Conditions::new();
        assert_eq!(string_to_integer("abc", &mut conds), NA_INTEGER);
        assert!(conds.contains(Condition::NaIntroduced));
    }

    #[test]
    fn test_string_special_spellings() {
        let mut conds = Conditions::new();
        assert_eq!(string_to_double("Inf", &mut conds), f64::INFINITY);
        assert_eq!(string_to_double("-Inf", &mut conds), f64::NEG_INFINITY);
        assert!(string_to_double("NaN", &mut conds).is_nan());
        assert!(is_na_real(string_to_double("NA", &mut conds)));
        assert_eq!(string_to_double("0x1A", &mut conds), 26.0);
        assert!(conds.is_empty());
    }

    #[test]
    fn test_string_to_complex() {
        let mut conds = Conditions::new();
        assert_eq!(string_to_complex("1+2i", &mut conds), Complex::new(1.0, 2.0));
        assert_eq!(
            string_to_complex("1.5-2i", &mut conds),
            Complex::new(1.5, -2.0)
        );
        assert_eq!(string_to_complex("3i", &mut conds), Complex::new(0.0, 3.0));
        assert_eq!(string_to_complex("4", &mut conds), Complex::new(4.0, 0.0));
        assert!(conds.is_empty());
    }

    #[test]
    fn test_format_double() {
        assert_eq!(format_double(3.0), "3");
        assert_eq!(format_double(2.5), "2.5");
        assert_eq!(format_double(f64::INFINITY), "Inf");
        assert_eq!(format_double(f64::NAN), "NaN");
    }

    #[test]
    fn test_format_complex_sign() {
        assert_eq!(format_complex(Complex::new(1.0, 2.0)), "1+2i");
        assert_eq!(format_complex(Complex::new(1.0, -2.0)), "1-2i");
    }

    #[test]
    fn test_coerce_character_vector_to_integer() {
        let mut conds = Conditions::new();
        let v = RVector::character(vec![
            Some("42".to_string()),
            Some("abc".to_string()),
            None,
        ]);
        let out = coerce_data(&v, ScalarKind::Integer, &mut conds).unwrap();
        assert_eq!(out, VectorData::Integer(vec![42, NA_INTEGER, NA_INTEGER]));
        assert!(conds.contains(Condition::NaIntroduced));
    }

    #[test]
    fn test_coerce_na_to_raw_warns() {
        let mut conds = Conditions::new();
        let v = RVector::integer(vec![10, NA_INTEGER, 300]);
        let out = coerce_data(&v, ScalarKind::Raw, &mut conds).unwrap();
        assert_eq!(out, VectorData::Raw(vec![10, 0, 0]));
        assert!(conds.contains(Condition::OutOfRangeRaw));
    }

    #[test]
    fn test_coerce_scalar_list_elements() {
        let mut conds = Conditions::new();
        let l = RVector::list(vec![
            Value::Vector(RVector::scalar_double(1.0)),
            Value::Vector(RVector::scalar_string("2")),
        ]);
        let out = coerce_data(&l, ScalarKind::Integer, &mut conds).unwrap();
        assert_eq!(out, VectorData::Integer(vec![1, 2]));

        let nested = RVector::list(vec![Value::Vector(RVector::integer(vec![1, 2]))]);
        assert!(coerce_data(&nested, ScalarKind::Integer, &mut conds).is_err());
    }

    #[test]
    fn test_logical_to_character() {
        let mut conds = Conditions::new();
        let v = RVector::logical(vec![LOGICAL_TRUE, LOGICAL_FALSE, NA_LOGICAL]);
        let out = coerce_data(&v, ScalarKind::Character, &mut conds).unwrap();
        assert_eq!(
            out,
            VectorData::Character(vec![
                Some("TRUE".to_string()),
                Some("FALSE".to_string()),
                None
            ])
        );
    }
}
