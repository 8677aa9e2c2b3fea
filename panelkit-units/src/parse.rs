//! Lenient amount parsing for the free-text amount field
//!
//! The longest numeric prefix wins: `"12abc"` is 12, `" .5"` is 0.5,
//! `"1e3 g"` is 1000. Text with no numeric prefix is `None`.

/// Parse the amount field. `Infinity` prefixes parse to ±∞.
pub fn parse_amount(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let prefix = numeric_prefix(s);

    if prefix.is_empty() {
        return parse_infinity(s);
    }

    prefix.parse::<f64>().ok()
}

/// `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i = 1;
    }

    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < len && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let frac = j - (i + 1);
        if digits + frac > 0 {
            i = j;
            digits += frac;
        }
    }

    if digits == 0 {
        return "";
    }

    if i < len && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < len && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        // "2e" or "2e+" keep only the mantissa
        if j > exp_start {
            i = j;
        }
    }

    &s[..i]
}

fn parse_infinity(s: &str) -> Option<f64> {
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    rest.starts_with("Infinity").then_some(sign * f64::INFINITY)
}
