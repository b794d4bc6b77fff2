//! Date and number formatting for Macedonian documents

use chrono::NaiveDate;

/// Dates arrive from HTML date inputs
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const OUTPUT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `YYYY-MM-DD` date; surrounding whitespace is ignored
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), INPUT_DATE_FORMAT).ok()
}

/// Render as `dd.mm.yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format(OUTPUT_DATE_FORMAT).to_string()
}

/// Largest amount a document will print (one trillion denars)
pub const MAX_AMOUNT: f64 = 1e12;

/// Parse an amount in `0..=MAX_AMOUNT`, accepting a decimal comma
pub fn parse_amount(value: &str) -> Option<f64> {
    let normalized = value.trim().replace(' ', "").replace(',', ".");
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (0.0..=MAX_AMOUNT).contains(v))
}

/// Render an amount with thousands grouped by dots and a decimal comma,
/// dropping the fraction when it is zero (`45000` -> `45.000`, `12.5` -> `12,50`)
pub fn format_amount(value: f64) -> String {
    let cents = (value * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if fraction == 0 {
        grouped
    } else {
        format!("{grouped},{fraction:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_round_trip_to_local_format() {
        let date = parse_date("2024-03-01").unwrap();
        assert_eq!(format_date(date), "01.03.2024");
    }

    #[test]
    fn test_invalid_dates() {
        assert!(parse_date("01.03.2024").is_none());
        assert!(parse_date("2024-02-30").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn test_amounts() {
        assert_eq!(parse_amount("45000"), Some(45000.0));
        assert_eq!(parse_amount("12,5"), Some(12.5));
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1e12"), Some(MAX_AMOUNT));
        assert_eq!(parse_amount("1e25"), None);
        assert_eq!(parse_amount("inf"), None);

        assert_eq!(format_amount(45000.0), "45.000");
        assert_eq!(format_amount(1234567.5), "1.234.567,50");
        assert_eq!(format_amount(999.0), "999");
    }
}
