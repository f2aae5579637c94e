// 💰 Monetary Strings - sign classification & locale-ambiguous parsing
//
// Accepts the shapes people actually type into a DRE form:
//   "R$ 10.000,00"   "10,000.00"   "(2.500,00)"   "-1.234"   "1.234,5"
// No runtime locale is consulted; separators are resolved by position.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// SIGN CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueSign {
    Positive,
    Negative,
    Zero,
    Invalid,
}

impl ValueSign {
    pub fn of_number(value: f64) -> ValueSign {
        if !value.is_finite() {
            ValueSign::Invalid
        } else if value == 0.0 {
            ValueSign::Zero
        } else if value > 0.0 {
            ValueSign::Positive
        } else {
            ValueSign::Negative
        }
    }

    /// Cheap sign read of a monetary string, without parsing it.
    ///
    /// The digit run decides zero vs non-zero; any `-` or a full `(...)` wrap
    /// makes a non-zero value negative. No digits at all is `Invalid`.
    pub fn of_text(raw: &str) -> ValueSign {
        let trimmed = raw.trim();
        let mut digits = trimmed.chars().filter(|c| c.is_ascii_digit()).peekable();

        if digits.peek().is_none() {
            return ValueSign::Invalid;
        }
        if digits.all(|c| c == '0') {
            return ValueSign::Zero;
        }
        if trimmed.contains('-') || is_paren_wrapped(trimmed) {
            return ValueSign::Negative;
        }
        ValueSign::Positive
    }
}

fn is_paren_wrapped(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('(') && s.ends_with(')')
}

// ============================================================================
// DECIMAL SEPARATOR DETECTION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecimalSeparator {
    Comma,
    Dot,
    None,
}

impl DecimalSeparator {
    fn as_char(&self) -> Option<char> {
        match self {
            DecimalSeparator::Comma => Some(','),
            DecimalSeparator::Dot => Some('.'),
            DecimalSeparator::None => None,
        }
    }

    /// Resolve which of `,` / `.` is the decimal mark.
    ///
    /// Both present: whichever occurs last. Only one present: it is decimal when
    /// 1 or 2 characters follow its last occurrence, otherwise grouping.
    pub fn detect(s: &str) -> DecimalSeparator {
        match (s.rfind(','), s.rfind('.')) {
            (Some(comma), Some(dot)) => {
                if comma > dot {
                    DecimalSeparator::Comma
                } else {
                    DecimalSeparator::Dot
                }
            }
            (Some(comma), None) if has_short_fraction(s, comma) => DecimalSeparator::Comma,
            (None, Some(dot)) if has_short_fraction(s, dot) => DecimalSeparator::Dot,
            _ => DecimalSeparator::None,
        }
    }
}

fn has_short_fraction(s: &str, separator_at: usize) -> bool {
    let trailing = s[separator_at + 1..].chars().count();
    (1..=2).contains(&trailing)
}

// ============================================================================
// MONETARY PARSER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoneyParseError {
    #[error("empty monetary value")]
    Empty,
    #[error("no digits in monetary value")]
    NoDigits,
    #[error("monetary value out of range")]
    NotFinite,
}

const CURRENCY_GLYPHS: &[char] = &['$', '€', '£', '¥', '₹', '₽', '₩', '¢'];

/// Parse a locale-formatted monetary string into a value rounded to cents.
///
/// - `(...)` negates; an odd number of `-` negates, an even number cancels out
/// - `+`, whitespace, letters and currency glyphs are dropped
/// - the decimal mark is chosen by [`DecimalSeparator::detect`]; the other
///   separator is treated as grouping and discarded
pub fn parse_monetary(raw: &str) -> Result<f64, MoneyParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MoneyParseError::Empty);
    }

    let mut negative = false;
    let mut working = trimmed;

    if is_paren_wrapped(working) {
        negative = true;
        working = &working[1..working.len() - 1];
    }

    let minus_count = working.matches('-').count();
    if minus_count % 2 == 1 {
        negative = !negative;
    }

    let working: String = working
        .chars()
        .filter(|&c| {
            c != '-'
                && c != '+'
                && !c.is_whitespace()
                && !c.is_ascii_alphabetic()
                && !CURRENCY_GLYPHS.contains(&c)
        })
        .collect();

    let separator = DecimalSeparator::detect(&working);
    let decimal_at = separator.as_char().and_then(|c| working.rfind(c));

    let mut cleaned = String::with_capacity(working.len() + 1);
    for (i, c) in working.char_indices() {
        if c.is_ascii_digit() {
            cleaned.push(c);
        } else if Some(i) == decimal_at {
            cleaned.push('.');
        }
    }

    if cleaned.starts_with('.') {
        cleaned.insert(0, '0');
    }
    if cleaned.ends_with('.') {
        cleaned.pop();
    }
    if cleaned.is_empty() {
        return Err(MoneyParseError::NoDigits);
    }

    let magnitude = match Decimal::from_str(&cleaned) {
        Ok(magnitude) => magnitude,
        Err(_) => return parse_oversized(&cleaned, negative),
    };
    let signed = if negative { -magnitude } else { magnitude };

    // Exact decimal rounding: half-cent ties go away from zero ("1.234,125" -> 1234.13)
    let rounded = signed
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .ok_or(MoneyParseError::NotFinite)?;

    // "-0,00" is just zero
    Ok(if rounded == 0.0 { 0.0 } else { rounded })
}

/// Digit runs past `Decimal`'s range have no cents left to round
fn parse_oversized(cleaned: &str, negative: bool) -> Result<f64, MoneyParseError> {
    let parsed: f64 = cleaned.parse().map_err(|_| MoneyParseError::NoDigits)?;
    if !parsed.is_finite() {
        return Err(MoneyParseError::NotFinite);
    }
    Ok(if negative { -parsed } else { parsed })
}

// ============================================================================
// TESTS
// ============================================================================
