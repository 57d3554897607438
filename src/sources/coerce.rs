//! Field coercion rules
//!
//! Coercion never fails loudly: text that does not fit the target type
//! becomes `None`.

/// Strict year rule for XML: every char an ASCII digit, nothing else
pub fn digits_to_year(text: &str) -> Option<i64> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Strict price rule for XML
///
/// With the first `.` removed, the rest must be non-empty ASCII digits.
/// Signs, exponents and a second point all fail the check.
pub fn decimal_to_price(text: &str) -> Option<f64> {
    let digits = text.replacen('.', "", 1);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Lenient integer parse for tabular cells (`2015`, `2015.0`, ` 2015 `)
pub fn parse_integer(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(value) = text.parse::<i64>() {
        return Some(value);
    }
    text.parse::<f64>().ok().and_then(integral)
}

/// Lenient real parse for tabular cells
pub fn parse_real(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// A float with no fractional part, as an integer
pub fn integral(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_to_year() {
        assert_eq!(digits_to_year("2021"), Some(2021));
        assert_eq!(digits_to_year("abc"), None);
        assert_eq!(digits_to_year(""), None);
        assert_eq!(digits_to_year("-2021"), None);
        assert_eq!(digits_to_year("2021.0"), None);
        assert_eq!(digits_to_year(" 2021"), None);
        assert_eq!(digits_to_year("99999999999999999999999"), None);
    }

    #[test]
    fn test_decimal_to_price() {
        assert_eq!(decimal_to_price("12.34"), Some(12.34));
        assert_eq!(decimal_to_price("35000"), Some(35000.0));
        assert_eq!(decimal_to_price("12."), Some(12.0));
        assert_eq!(decimal_to_price(".5"), Some(0.5));
        assert_eq!(decimal_to_price("12.34.56"), None);
        assert_eq!(decimal_to_price("."), None);
        assert_eq!(decimal_to_price(""), None);
        assert_eq!(decimal_to_price("-12.5"), None);
        assert_eq!(decimal_to_price("1e5"), None);
        assert_eq!(decimal_to_price("\"12.34\""), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("2015"), Some(2015));
        assert_eq!(parse_integer("2015.0"), Some(2015));
        assert_eq!(parse_integer(" 2015 "), Some(2015));
        assert_eq!(parse_integer("2015.5"), None);
        assert_eq!(parse_integer("twenty"), None);
        assert_eq!(parse_integer("NaN"), None);
    }

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real("15000"), Some(15000.0));
        assert_eq!(parse_real("-1.5e3"), Some(-1500.0));
        assert_eq!(parse_real("cheap"), None);
    }
}
