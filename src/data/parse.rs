use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

// ---------------------------------------------------------------------------
// Shared parsing rules used by filters, statistics, charts and loaders
// ---------------------------------------------------------------------------

fn magnitude_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:[.,]\d+)?").expect("magnitude pattern is valid"))
}

/// Extract the first integer or decimal token embedded in free text,
/// e.g. `"120 g/km"` → `120.0`, `"98,5 g/km"` → `98.5`.
///
/// Returns `None` when the text holds no numeric token at all. Callers pick
/// their own fallback: numeric filters treat `None` as `0`, statistics and
/// charts leave the record out of the emission aggregates.
pub fn parse_magnitude(text: &str) -> Option<f64> {
    let token = magnitude_regex().find(text)?;
    token.as_str().replace(',', ".").parse::<f64>().ok()
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-+]?\d[\d.,]*").expect("number pattern is valid"))
}

/// Parse a number typed by a person or exported by a spreadsheet.
///
/// Only the first numeric token counts, so trailing notes are ignored
/// (`"850 (IVA 22%)"` → `850`). Separators inside the token:
/// - both `.` and `,`: the rightmost one is the decimal separator
///   (`"1.234,56"`, `"1,234.56"`);
/// - a repeated separator groups thousands (`"1.234.567"`, `"1,234,567"`);
/// - a single `,` is a decimal comma (`"850,50"`);
/// - a single `.` followed by exactly three digits groups thousands
///   (`"€ 1.200"` → `1200`), otherwise it is a decimal point (`"850.5"`).
pub fn parse_number(text: &str) -> Option<f64> {
    let token = number_regex().find(text)?.as_str();
    let token = token.trim_end_matches(['.', ',']);

    let dots = token.matches('.').count();
    let commas = token.matches(',').count();
    let normalized = match (dots, commas) {
        (0, 0) => token.to_string(),
        (_, 0) if dots > 1 || is_thousands_group(token, '.') => token.replace('.', ""),
        (_, 0) => token.to_string(),
        (0, _) if commas > 1 => token.replace(',', ""),
        (0, _) => token.replace(',', "."),
        _ if token.rfind(',') > token.rfind('.') => token.replace('.', "").replace(',', "."),
        _ => token.replace(',', ""),
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether the only `separator` in `token` is followed by exactly three digits.
fn is_thousands_group(token: &str, separator: char) -> bool {
    token
        .split_once(separator)
        .is_some_and(|(_, tail)| tail.len() == 3)
}

/// Parse an ISO-8601 date or date-time.
///
/// Supported shapes: `2025-03-31`, `2025-03-31T10:00:00`,
/// `2025-03-31 10:00:00` and RFC 3339 with an offset. Values with an offset
/// keep their wall-clock time; a bare date means midnight.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Round to a fixed number of decimals; non-finite input collapses to `0`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_takes_first_token() {
        assert_eq!(parse_magnitude("120 g/km"), Some(120.0));
        assert_eq!(parse_magnitude("CO2: 98,5 g/km (WLTP 104)"), Some(98.5));
        assert_eq!(parse_magnitude("0 g/km"), Some(0.0));
        assert_eq!(parse_magnitude("abc"), None);
        assert_eq!(parse_magnitude(""), None);
    }

    #[test]
    fn number_handles_both_decimal_conventions() {
        assert_eq!(parse_number("850"), Some(850.0));
        assert_eq!(parse_number("€ 850,50"), Some(850.5));
        assert_eq!(parse_number("1.234,56"), Some(1234.56));
        assert_eq!(parse_number("1,234.56"), Some(1234.56));
        assert_eq!(parse_number("850.5"), Some(850.5));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("  "), None);
    }

    #[test]
    fn number_ignores_text_after_the_first_token() {
        assert_eq!(parse_number("850 (IVA 22%)"), Some(850.0));
        assert_eq!(parse_number("120000 km / 36 mesi"), Some(120000.0));
        assert_eq!(parse_number("canone: 499,90 €/mese"), Some(499.9));
        assert_eq!(parse_number("850, da rivedere"), Some(850.0));
    }

    #[test]
    fn number_reads_dot_thousands_groups() {
        assert_eq!(parse_number("€ 1.200"), Some(1200.0));
        assert_eq!(parse_number("1.234.567"), Some(1234567.0));
        assert_eq!(parse_number("1,234,567"), Some(1234567.0));
        assert_eq!(parse_number("12.50"), Some(12.5));
        assert_eq!(parse_number("-7,5"), Some(-7.5));
    }

    #[test]
    fn date_accepts_iso_shapes() {
        let midnight = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert_eq!(parse_date("2025-03-31"), Some(midnight));
        assert_eq!(
            parse_date("2025-03-31T10:30:00").map(|d| d.date()),
            Some(midnight.date())
        );
        assert_eq!(
            parse_date("2025-03-31T10:30:00+02:00").map(|d| d.time().to_string()),
            Some("10:30:00".to_string())
        );
        assert_eq!(parse_date("31/03/2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn rounding_is_stable() {
        assert_eq!(round_to(850.456, 2), 850.46);
        assert_eq!(round_to(f64::NAN, 2), 0.0);
    }
}
