//! Exact conversion between chain minor units and human-readable decimal strings.
//!
//! All ratios are computed on integers scaled by `10^precision` before the
//! division and rounded half-up; no binary floating point is involved.

use crate::domain::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("amount is empty")]
    Empty,
    #[error("invalid amount {0:?}")]
    Invalid(String),
    #[error("amount {text:?} has more than {decimals} fractional digits")]
    ExcessPrecision { text: String, decimals: u8 },
    #[error("amount {0:?} does not fit in u128 minor units")]
    Overflow(String),
}

/// Render `amount / 10^decimals` with exactly `precision` fractional digits.
///
/// Digits past `precision` are truncated, so a displayed balance never exceeds the real one.
pub fn to_display(amount: u128, decimals: u8, precision: u8) -> String {
    let decimals = usize::from(decimals);
    let precision = usize::from(precision);
    let digits = amount.to_string();

    let (int_part, frac_part) = if decimals == 0 {
        (digits, String::new())
    } else {
        let padded = format!("{:0>width$}", digits, width = decimals + 1);
        let split = padded.len() - decimals;
        (padded[..split].to_string(), padded[split..].to_string())
    };

    if precision == 0 {
        return int_part;
    }

    let mut frac: String = frac_part.chars().take(precision).collect();
    while frac.len() < precision {
        frac.push('0');
    }
    format!("{}.{}", int_part, frac)
}

/// Parse a non-negative decimal string into minor units.
pub fn from_display(text: &str, decimals: u8) -> Result<u128, UnitError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(UnitError::Empty);
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };

    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part)
    {
        return Err(UnitError::Invalid(trimmed.to_string()));
    }
    if frac_part.len() > usize::from(decimals) {
        return Err(UnitError::ExcessPrecision {
            text: trimmed.to_string(),
            decimals,
        });
    }

    let overflow = || UnitError::Overflow(trimmed.to_string());
    let padding = usize::from(decimals) - frac_part.len();
    int_part
        .bytes()
        .chain(frac_part.bytes())
        .chain(std::iter::repeat(b'0').take(padding))
        .try_fold(0u128, |acc, b| {
            acc.checked_mul(10)
                .and_then(|acc| acc.checked_add(u128::from(b - b'0')))
        })
        .ok_or_else(overflow)
}

/// Exact conversion of minor units into a Decimal carrying `decimals` digits.
///
/// `None` when the value exceeds Decimal's 96-bit mantissa or 28-digit scale.
pub fn to_decimal(amount: u128, decimals: u8) -> Option<Decimal> {
    Decimal::from_scaled(amount, u32::from(decimals))
}

/// `floor(a * b / c)` together with the remainder, without requiring `a * b` to fit.
///
/// `None` when `c == 0` or the quotient itself overflows.
fn mul_div_rem(a: u128, b: u128, c: u128) -> Option<(u128, u128)> {
    if c == 0 {
        return None;
    }
    if let Some(product) = a.checked_mul(b) {
        return Some((product / c, product % c));
    }
    // a*b = (q*c + r)*b, so a*b/c = q*b + r*b/c.
    let (q, r) = (a / c, a % c);
    let rb = r.checked_mul(b)?;
    let quotient = q.checked_mul(b)?.checked_add(rb / c)?;
    Some((quotient, rb % c))
}

/// `a * b / c` rounded down.
pub fn mul_div_floor(a: u128, b: u128, c: u128) -> Option<u128> {
    mul_div_rem(a, b, c).map(|(quotient, _)| quotient)
}

/// `a * b / c` rounded half-up.
pub fn mul_div(a: u128, b: u128, c: u128) -> Option<u128> {
    let (quotient, rem) = mul_div_rem(a, b, c)?;
    if rem >= c - rem {
        quotient.checked_add(1)
    } else {
        Some(quotient)
    }
}

/// `numerator * factor / denominator` rendered as a Decimal with `precision` digits.
///
/// Scales by `10^precision` before dividing; `None` on zero denominator or overflow.
pub fn scaled_quotient(
    numerator: u128,
    factor: u128,
    denominator: u128,
    precision: u8,
) -> Option<Decimal> {
    let scale = 10u128.checked_pow(u32::from(precision))?;
    let scaled_factor = factor.checked_mul(scale)?;
    let mantissa = mul_div(numerator, scaled_factor, denominator)?;
    Decimal::from_scaled(mantissa, u32::from(precision))
}
