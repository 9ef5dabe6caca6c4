// Utility helpers for parsing scenario fields and formatting figures.
//
// Parsing is forgiving in the same way spreadsheet exports need it to be;
// formatting is the display side only and never feeds back into estimates.
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64`, tolerating thousands separators,
/// surrounding whitespace and a leading currency sign.
///
/// Returns `None` for blanks and for anything containing letters.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.trim_start_matches('$').replace(',', "");
    s.parse::<f64>().ok()
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

/// Blank or missing text becomes `None`.
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

pub fn average(v: &[f64]) -> f64 {
    // Arithmetic mean; 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
        Err(_) => group_digits(int_part),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

// Comma groups for digit strings wider than any integer type.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_currency(n: f64, decimals: usize) -> String {
    let s = format_number(n, decimals);
    match s.strip_prefix('-') {
        Some(rest) => format!("-${}", rest),
        None => format!("${}", s),
    }
}

/// Like `format_number`, but undefined values, and values too large to
/// be meaningful, read "not calculable".
pub fn format_or_na(n: f64, decimals: usize) -> String {
    if n.is_finite() && n.abs() < i64::MAX as f64 {
        format_number(n, decimals)
    } else {
        "not calculable".to_string()
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exported_numbers() {
        assert_eq!(parse_f64_safe(Some(" 1,250.50 ")), Some(1250.5));
        assert_eq!(parse_f64_safe(Some("$200")), Some(200.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("abc")), None);
        assert_eq!(parse_f64_safe(None), None);
        assert_eq!(parse_u32_safe(Some("20")), Some(20));
        assert_eq!(parse_u32_safe(Some("-1")), None);
    }

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_number(7.0, 0), "7");
        assert_eq!(format_currency(21343.01, 2), "$21,343.01");
        assert_eq!(format_currency(-500.0, 0), "-$500");
        assert_eq!(format_int(9855u32), "9,855");
    }

    #[test]
    fn undefined_values_are_labelled() {
        assert_eq!(format_or_na(f64::INFINITY, 1), "not calculable");
        assert_eq!(format_or_na(f64::NAN, 1), "not calculable");
        assert_eq!(format_or_na(8.89, 1), "8.9");
    }

    #[test]
    fn huge_values_keep_their_digits() {
        assert_eq!(format_number(1.0e19, 0), "10,000,000,000,000,000,000");
        assert_eq!(format_currency(2.0e19, 2), "$20,000,000,000,000,000,000.00");
        let beyond_u128 = format_number(1.0e40, 0);
        assert!(beyond_u128.starts_with("10,000,000,000"), "got {}", beyond_u128);
        assert_eq!(beyond_u128.len(), 41 + 13);
        assert_eq!(group_digits("1234567"), "1,234,567");
        assert_eq!(group_digits("123"), "123");
    }

    #[test]
    fn values_past_i64_are_not_calculable() {
        assert_eq!(format_or_na(9.3e18, 1), "not calculable");
        assert_eq!(format_or_na(-1.0e30, 0), "not calculable");
        assert_eq!(format_or_na(1.3e12, 1), "1,300,000,000,000.0");
    }

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[2.0, 4.0]), 3.0);
    }
}
