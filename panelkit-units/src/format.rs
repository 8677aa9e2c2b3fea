//! Result formatting for the converter display
//!
//! Rounding is half away from zero on the exact binary value, so a double
//! that sits exactly between two displayable values rounds up in
//! magnitude. `format!` alone would round such ties to even.

use crate::registry::Category;

/// Magnitudes at or above this switch to exponential notation
const EXPONENTIAL_ABOVE: f64 = 1_000_000.0;
/// Non-zero magnitudes at or below this switch to exponential notation
const EXPONENTIAL_BELOW: f64 = 0.000_001;
const MANTISSA_DECIMALS: u32 = 4;
const FIXED_DECIMALS: u32 = 6;
const CURRENCY_DECIMALS: u32 = 2;
/// Every double at or above 2^53 is a whole number
const WHOLE_ABOVE: f64 = 9_007_199_254_740_992.0;
/// Upper end of the whole numbers handled in `u128`
const EXACT_BELOW: f64 = 1e38;

/// Render a converted value for display.
///
/// Magnitudes `>= 1e6` or in `(0, 1e-6]` use exponential notation with
/// four mantissa decimals and a signed exponent (`1.5000e+6`). Everything
/// else is rounded to six decimals with trailing zeros removed.
pub fn format_result(value: f64) -> String {
    if let Some(text) = non_finite(value, "Infinity") {
        return text;
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENTIAL_ABOVE || (magnitude > 0.0 && magnitude <= EXPONENTIAL_BELOW) {
        exponential(value)
    } else {
        let raw = to_fixed(value, FIXED_DECIMALS);
        let trimmed = raw.trim_end_matches('0').trim_end_matches('.');
        // -0.0 has no sign on screen
        if trimmed == "-0" { "0" } else { trimmed }.to_string()
    }
}

/// Render a money amount: two decimals with comma thousands separators
/// (`1,234.50`).
pub fn format_currency(value: f64) -> String {
    if let Some(text) = non_finite(value, "∞") {
        return text;
    }
    group_thousands(&to_fixed(value, CURRENCY_DECIMALS))
}

impl Category {
    /// Display string for a value converted in this category
    pub fn format_value(&self, value: f64) -> String {
        if self.is_rate() {
            format_currency(value)
        } else {
            format_result(value)
        }
    }
}

fn non_finite(value: f64, infinity: &str) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_string())
    } else if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        Some(format!("{}{}", sign, infinity))
    } else {
        None
    }
}

fn exponential(value: f64) -> String {
    if let Some((mantissa, exp)) = exponential_tie(value.abs()) {
        let sign = if value < 0.0 { "-" } else { "" };
        let scale = 10u128.pow(MANTISSA_DECIMALS);
        return format!(
            "{}{}.{:0width$}e+{}",
            sign, mantissa / scale, mantissa % scale, exp,
            width = MANTISSA_DECIMALS as usize
        );
    }

    let raw = format!("{:.*e}", MANTISSA_DECIMALS as usize, value);
    match raw.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
        _ => raw,
    }
}

/// Mantissa digits and exponent when the value sits exactly halfway
/// between two four-decimal mantissas.
///
/// Only whole numbers can: below `1e-6` a double has too few binary
/// places to end in a 5 right after the fourth mantissa decimal.
fn exponential_tie(magnitude: f64) -> Option<(u128, u32)> {
    if !(EXPONENTIAL_ABOVE..EXACT_BELOW).contains(&magnitude) || magnitude.fract() != 0.0 {
        return None;
    }

    let whole = magnitude as u128;
    let mut exp = whole.ilog10();
    let unit = 10u128.pow(exp - MANTISSA_DECIMALS - 1);
    if whole % unit != 0 {
        return None;
    }
    let digits = whole / unit;
    if digits % 10 != 5 {
        return None;
    }

    let mut mantissa = digits / 10 + 1;
    if mantissa == 10u128.pow(MANTISSA_DECIMALS + 1) {
        mantissa /= 10;
        exp += 1;
    }
    Some((mantissa, exp))
}

/// `value` with exactly `decimals` places
fn to_fixed(value: f64, decimals: u32) -> String {
    match fixed_tie(value.abs(), decimals) {
        Some(units) => {
            let sign = if value < 0.0 { "-" } else { "" };
            let scale = 10u128.pow(decimals);
            format!(
                "{}{}.{:0width$}",
                sign, units / scale, units % scale,
                width = decimals as usize
            )
        }
        None => format!("{:.*}", decimals as usize, value),
    }
}

/// The rounded-up result, in units of `10^-decimals`, when the value sits
/// exactly halfway between two `decimals`-place numbers.
fn fixed_tie(magnitude: f64, decimals: u32) -> Option<u128> {
    if magnitude >= WHOLE_ABOVE {
        return None;
    }
    // A tie ends in a 5 at place decimals + 1, so it is a whole multiple
    // of 2^-(decimals + 1); the scaling is exact
    let scaled = magnitude * f64::from(2u32.pow(decimals + 1));
    if scaled.fract() != 0.0 {
        return None;
    }
    let tenths = scaled as u128 * 5u128.pow(decimals + 1);
    (tenths % 10 == 5).then_some(tenths / 10 + 1)
}

fn group_thousands(fixed: &str) -> String {
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    let mut grouped = String::with_capacity(fixed.len() + whole.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
