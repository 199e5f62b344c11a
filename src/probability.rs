//! Exact probabilities of basic events.
//!
//! Probabilities are rational numbers backed by arbitrary precision integers.
//! Shannon expansion multiplies and adds them once per diagram level, so any
//! floating point error would compound over deep diagrams; keeping them exact
//! makes the computed system probability exact as well.
//!
//! # Examples
//!
//! ```
//! use fault_tree_bdd::probability::Probability;
//!
//! let p: Probability = "1/7".parse().unwrap();
//! let q: Probability = "0.25".parse().unwrap();
//! let r: Probability = "2.5e-1".parse().unwrap();
//! assert_eq!(q, r);
//! assert_eq!(p.to_string(), "1/7");
//! assert!("1.5".parse::<Probability>().is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::{Error, Result};

/// An exact probability in `[0, 1]`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Probability(BigRational);

impl Probability {
    pub fn zero() -> Self {
        Probability(BigRational::zero())
    }

    pub fn one() -> Self {
        Probability(BigRational::one())
    }

    /// Wraps a rational, checking that it lies in `[0, 1]`.
    pub fn new(value: BigRational) -> Result<Self> {
        if value.is_negative() || value > BigRational::one() {
            return Err(Error::ProbabilityOutOfRange(value.to_string()));
        }
        Ok(Probability(value))
    }

    /// Builds the probability `numer / denom`.
    pub fn from_ratio(numer: u64, denom: u64) -> Result<Self> {
        if denom == 0 {
            return Err(Error::MalformedProbability(format!("{}/{}", numer, denom)));
        }
        Self::new(BigRational::new(BigInt::from(numer), BigInt::from(denom)))
    }

    pub fn value(&self) -> &BigRational {
        &self.0
    }

    pub fn into_inner(self) -> BigRational {
        self.0
    }

    /// Returns `1 - p`.
    pub fn complement(&self) -> BigRational {
        BigRational::one() - &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    /// Lossy conversion, for reporting only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Probability {
    type Err = Error;

    /// Parses a fraction (`1/7`), a decimal (`0.25`, `.5`) or a number in
    /// scientific notation (`1e-3`). The conversion is exact.
    fn from_str(s: &str) -> Result<Self> {
        let value = parse_rational(s.trim())?.ok_or_else(|| Error::MalformedProbability(s.to_string()))?;
        Self::new(value)
    }
}

impl TryFrom<BigRational> for Probability {
    type Error = Error;

    fn try_from(value: BigRational) -> Result<Self> {
        Self::new(value)
    }
}

/// Largest number of decimal places a literal may scale down by, beyond the
/// digits it spells out.
const MAX_DECIMAL_PLACES: usize = 10_000;

fn parse_integer(digits: &str) -> Option<BigInt> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    BigInt::parse_bytes(digits.as_bytes(), 10)
}

/// `Ok(None)` when the literal is malformed.
fn parse_rational(s: &str) -> Result<Option<BigRational>> {
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        Some(_) => (false, s),
        None => return Ok(None),
    };

    let value = if let Some((numer, denom)) = rest.split_once('/') {
        let (Some(numer), Some(denom)) = (parse_integer(numer.trim()), parse_integer(denom.trim())) else {
            return Ok(None);
        };
        if denom.is_zero() {
            return Ok(None);
        }
        BigRational::new(numer, denom)
    } else {
        match parse_decimal(s, rest)? {
            Some(value) => value,
            None => return Ok(None),
        }
    };

    Ok(Some(if negative { -value } else { value }))
}

/// Parses the unsigned decimal `rest` of the literal `literal`.
///
/// The power of ten is only materialised once the value is known to be small
/// enough to matter: any non-zero value scaled up by ten or more is out of
/// range, whatever its sign.
fn parse_decimal(literal: &str, rest: &str) -> Result<Option<BigRational>> {
    let (mantissa, exponent) = match rest.find(|c: char| c == 'e' || c == 'E') {
        Some(pos) => match rest[pos + 1..].parse::<i64>() {
            Ok(exponent) => (&rest[..pos], exponent),
            Err(_) => return Ok(None),
        },
        None => (rest, 0),
    };

    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Ok(None);
    }
    let digits = format!("{}{}", int_part, frac_part);
    let Some(mantissa) = parse_integer(&digits) else {
        return Ok(None);
    };
    if mantissa.is_zero() {
        return Ok(Some(BigRational::zero()));
    }

    let Some(scale) = i64::try_from(frac_part.len()).ok().and_then(|places| exponent.checked_sub(places)) else {
        return Ok(None);
    };
    if scale > 0 {
        return Err(Error::ProbabilityOutOfRange(literal.to_string()));
    }
    if scale == 0 {
        return Ok(Some(BigRational::from_integer(mantissa)));
    }
    match usize::try_from(scale.unsigned_abs()) {
        Ok(places) if places <= MAX_DECIMAL_PLACES + digits.len() => {
            Ok(Some(BigRational::new(mantissa, num_traits::pow(BigInt::from(10), places))))
        }
        _ => Err(Error::MalformedProbability(literal.to_string())),
    }
}
