//! Tools for handling fractions as musical lengths and offsets.

use fraction::Fraction;

/// Truncate (quantize) Fraction to the closest one with denominator
/// not greater than `limit`.
///
/// Uses continued fractions, so 0.333333 becomes 1/3 rather than 43/128.
/// By default library uses 1/128 for lengths, that came from floats.
pub fn limit_denominator(
    frac: Fraction,
    limit: u64,
) -> Result<Fraction, String> {
    if limit < 1 {
        return Err(format!(
            "denominator shouldn't be less that one. input:{}",
            limit
        ));
    }
    let (num, denom) = (
        *frac
            .numer()
            .ok_or("Can not get numerator from fraction".to_string())?,
        *frac
            .denom()
            .ok_or("Can not get denominator from fraction".to_string())?,
    );
    if denom <= limit {
        return Ok(frac);
    }
    let (mut p0, mut q0, mut p1, mut q1) = (0_u64, 1_u64, 1_u64, 0_u64);
    let (mut n, mut d) = (num, denom);
    loop {
        let a = n / d;
        let q2 = q0.saturating_add(a.saturating_mul(q1));
        if q2 > limit {
            break;
        }
        (p0, q0, p1, q1) = (p1, q1, p0.saturating_add(a * p1), q2);
        (n, d) = (d, n - a * d);
    }
    let k = (limit - q0) / q1;
    let bound1 = Fraction::new(p0 + k * p1, q0 + k * q1);
    let bound2 = Fraction::new(p1, q1);
    let abs = Fraction::new(num, denom);
    let closest = match (bound2 - abs).abs() <= (bound1 - abs).abs() {
        true => bound2,
        false => bound1,
    };
    match frac.is_sign_negative() {
        true => Ok(-closest),
        false => Ok(closest),
    }
}

/// Greatest common divisor of two integers (Euclid).
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Greatest common divisor of two non-negative fractions.
///
/// For reduced fractions `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
///
/// # Returns
/// None if lcm of denominators overflows, or one of fractions is not
/// a finite number.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use vmf_codec::primitives::fraction_gcd;
/// assert_eq!(
///     fraction_gcd(Fraction::new(1u64, 1u64), Fraction::new(3u64, 2u64)),
///     Some(Fraction::new(1u64, 2u64))
/// );
/// assert_eq!(
///     fraction_gcd(Fraction::new(1u64, 2u64), Fraction::new(1u64, 3u64)),
///     Some(Fraction::new(1u64, 6u64))
/// );
/// ```
pub fn fraction_gcd(a: Fraction, b: Fraction) -> Option<Fraction> {
    let (an, ad) = (*a.numer()?, *a.denom()?);
    let (bn, bd) = (*b.numer()?, *b.denom()?);
    let lcm = (ad / gcd(ad, bd)).checked_mul(bd)?;
    Some(Fraction::new(gcd(an, bn), lcm))
}

/// Lossy conversion, used for tolerance checks and logging only.
pub fn to_f64(frac: Fraction) -> f64 {
    let value = match (frac.numer(), frac.denom()) {
        (Some(n), Some(d)) => *n as f64 / *d as f64,
        _ => f64::NAN,
    };
    match frac.is_sign_negative() {
        true => -value,
        false => value,
    }
}

/// Snap fraction to the nearest integer, if it differs from it less than
/// by `precision`. Otherwise fraction is returned untouched.
pub fn snap_to_integer(frac: Fraction, precision: f64) -> Fraction {
    if frac.denom() == Some(&1) {
        return frac;
    }
    let value = to_f64(frac);
    let rounded = value.round();
    if rounded >= 0.0 && (value - rounded).abs() < precision {
        return Fraction::new(rounded as u64, 1_u64);
    }
    frac
}

/// If fraction is an integer (maybe, within precision) returns it.
pub fn as_integer(frac: Fraction, precision: f64) -> Option<u64> {
    let snapped = snap_to_integer(frac, precision);
    match (snapped.denom(), snapped.is_sign_negative()) {
        (Some(1), false) => snapped.numer().copied(),
        _ => None,
    }
}

/// Render fraction as "num/den", or just "num" for integers.
pub fn format_rational(frac: Fraction) -> String {
    let sign = match frac.is_sign_negative() {
        true => "-",
        false => "",
    };
    match (frac.numer(), frac.denom()) {
        (Some(n), Some(1)) => format!("{sign}{n}"),
        (Some(n), Some(d)) => format!("{sign}{n}/{d}"),
        _ => frac.to_string(),
    }
}

/// Render offset the way VMF header keys look like: "0.0", "1.5", and
/// "10/3" for offsets, that have no finite decimal representation.
/// Decimal, which `parse_rational` can not read back, is also written
/// as "num/den".
pub fn format_offset(frac: Fraction) -> String {
    match format_decimal(frac) {
        Some(decimal) if parse_rational(&decimal) == Ok(frac) => decimal,
        _ => format_rational(frac),
    }
}

/// Exact decimal digits of fraction, if they are finite.
fn format_decimal(frac: Fraction) -> Option<String> {
    let (n, d) = match (frac.numer(), frac.denom()) {
        (Some(n), Some(d)) if *d != 0 => (*n, *d),
        _ => return None,
    };
    let mut rest = d;
    for factor in [2, 5] {
        while rest % factor == 0 {
            rest /= factor;
        }
    }
    if rest != 1 {
        return None;
    }
    let sign = match frac.is_sign_negative() && n != 0 {
        true => "-",
        false => "",
    };
    let int = n / d;
    let mut digits = String::new();
    let mut remainder = u128::from(n % d) * 10;
    let d = u128::from(d);
    while remainder != 0 {
        digits.push(char::from(b'0' + (remainder / d) as u8));
        remainder = remainder % d * 10;
    }
    if digits.is_empty() {
        digits.push('0');
    }
    Some(format!("{sign}{int}.{digits}"))
}

/// Parse "3/2", "-1/4", "2", "1.5" or "0.0" into exact fraction.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use vmf_codec::primitives::parse_rational;
/// assert_eq!(parse_rational("1/6"), Ok(Fraction::new(1u64, 6u64)));
/// assert_eq!(parse_rational("4.0"), Ok(Fraction::new(4u64, 1u64)));
/// assert_eq!(parse_rational("0.25"), Ok(Fraction::new(1u64, 4u64)));
/// assert!(parse_rational("1/0").is_err());
/// ```
pub fn parse_rational(s: &str) -> Result<Fraction, String> {
    let trimmed = s.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let parse_u64 = |part: &str| {
        part.parse::<u64>()
            .map_err(|e| format!("Can not parse `{}` as rational: {}", s, e))
    };
    let frac = if let Some((num, den)) = body.split_once('/') {
        let den = parse_u64(den)?;
        if den == 0 {
            return Err(format!("Zero denominator in `{}`", s));
        }
        Fraction::new(parse_u64(num)?, den)
    } else if let Some((int, decimals)) = body.split_once('.') {
        let int = match int {
            "" => 0,
            x => parse_u64(x)?,
        };
        let scale = 10_u64
            .checked_pow(decimals.len() as u32)
            .ok_or(format!("Too many decimals in `{}`", s))?;
        let decimals = match decimals {
            "" => 0,
            x => parse_u64(x)?,
        };
        let num = int
            .checked_mul(scale)
            .and_then(|n| n.checked_add(decimals))
            .ok_or(format!("Value `{}` is too big", s))?;
        Fraction::new(num, scale)
    } else {
        Fraction::new(parse_u64(body)?, 1_u64)
    };
    match negative {
        true => Ok(-frac),
        false => Ok(frac),
    }
}
