//! Equity percentage normalization

/// Lowest representable equity share
pub const MIN_PERCENT: f64 = 0.0;

/// Highest representable equity share
pub const MAX_PERCENT: f64 = 100.0;

/// Format a share as a two-decimal percentage string, e.g. `12.50%`
///
/// The value is clamped to [0, 100] first.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", clamp_percent(value))
}

/// Clamp a share into [0, 100]; NaN and negative zero become 0
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() || value <= MIN_PERCENT {
        return MIN_PERCENT;
    }
    value.min(MAX_PERCENT)
}

/// Parse a percentage string such as `"8"`, `"12.5%"` or `"3.00％"`
///
/// Returns `None` if the remainder is not a number.
pub fn parse_percent(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_end_matches(['%', '％']).trim();
    cleaned.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Normalize a percentage string to the `\d{1,3}\.\d{2}%` form
///
/// Unparsable input falls back to `fallback`; parsed values are clamped.
///
/// # Examples
///
/// ```
/// use ipovc_domain::percent::normalize_percent;
///
/// assert_eq!(normalize_percent("8", 0.0), "8.00%");
/// assert_eq!(normalize_percent("150%", 0.0), "100.00%");
/// assert_eq!(normalize_percent("abc", 5.0), "5.00%");
/// ```
pub fn normalize_percent(raw: &str, fallback: f64) -> String {
    format_percent(parse_percent(raw).unwrap_or(fallback))
}
