use std::ops::{Add, AddAssign};

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use super::{
    format_rational, limit_denominator, parse_rational, to_f64,
    LIMIT_DENOMINATOR,
};

/// Duration (or offset) in quarter-notes, held as exact fraction.
///
/// Lengths, that came from floats, are limited to denominator of
/// [LIMIT_DENOMINATOR], so `Length::from(1.0 / 3.0)` is exactly 1/3.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "LengthRepr", into = "String")]
pub struct Length {
    fraction: Fraction,
}
impl Length {
    pub fn zero() -> Self {
        Self::from(Fraction::new(0_u64, 1_u64))
    }
    pub fn get(&self) -> Fraction {
        self.fraction
    }
    pub fn is_zero(&self) -> bool {
        self.fraction.numer() == Some(&0)
    }
    pub fn as_f64(&self) -> f64 {
        to_f64(self.fraction)
    }
    /// Subtraction, that never produces negative length.
    pub fn checked_sub(&self, rhs: Self) -> Option<Self> {
        let frac = self.fraction - rhs.fraction;
        match frac.is_sign_negative() && frac.numer() != Some(&0) {
            true => None,
            false => Some(Self::from(frac)),
        }
    }
}
impl Default for Length {
    fn default() -> Self {
        Self::zero()
    }
}
impl From<Fraction> for Length {
    fn from(value: Fraction) -> Self {
        Self { fraction: value }
    }
}
impl From<f64> for Length {
    fn from(value: f64) -> Self {
        let fraction = Fraction::from(value);
        Self::from(
            limit_denominator(fraction, LIMIT_DENOMINATOR).unwrap_or(fraction),
        )
    }
}
impl Add for Length {
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            fraction: self.fraction + rhs.fraction,
        }
    }
    type Output = Self;
}
impl AddAssign for Length {
    fn add_assign(&mut self, rhs: Self) {
        self.fraction += rhs.fraction
    }
}
impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_rational(self.fraction))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Text(String),
    Number(f64),
}
impl TryFrom<LengthRepr> for Length {
    type Error = String;
    fn try_from(value: LengthRepr) -> Result<Self, Self::Error> {
        let length = match value {
            LengthRepr::Text(s) => Self::from(parse_rational(&s)?),
            LengthRepr::Number(n) => Self::from(n),
        };
        match length.fraction.is_sign_negative() && !length.is_zero() {
            true => Err(format!("length can not be negative: {}", length)),
            false => Ok(length),
        }
    }
}
impl From<Length> for String {
    fn from(value: Length) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use fraction::Fraction;

    use crate::primitives::Length;

    #[test]
    fn length() {
        let a = Length::from(1.0);
        let b = Length::from(Fraction::from(1.0));
        assert_eq!(a, b);
        assert_eq!(a + b, Length::from(2.0));
        assert_eq!(
            Length::from(1.0 / 3.0).get(),
            Fraction::new(1u64, 3u64)
        );
        assert_eq!(Length::from(1.0 / 129.0), Length::from(1.0 / 128.0));
        assert_eq!(Length::from(0.5).to_string(), "1/2");
    }

    #[test]
    fn length_sub() {
        let one = Length::from(1.0);
        let two = Length::from(2.0);
        assert_eq!(two.checked_sub(one), Some(one));
        assert_eq!(one.checked_sub(one), Some(Length::zero()));
        assert_eq!(one.checked_sub(two), None);
    }

    #[test]
    fn length_serde() {
        let third = Length::from(Fraction::new(1u64, 3u64));
        let json = serde_json::to_string(&third).unwrap();
        assert_eq!(json, "\"1/3\"");
        assert_eq!(serde_json::from_str::<Length>(&json).unwrap(), third);
        assert_eq!(
            serde_json::from_str::<Length>("1.5").unwrap(),
            Length::from(Fraction::new(3u64, 2u64))
        );
        assert!(serde_json::from_str::<Length>("\"-1/2\"").is_err());
    }
}
