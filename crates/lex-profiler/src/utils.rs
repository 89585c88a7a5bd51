//! Shared value helpers for classification and summarization.
//!
//! The same numeric parser backs both the type inferencer and the numeric
//! summarizer, so a value counted as numeric during classification is always
//! eligible for the numeric statistics.

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Thousands separator stripped before numeric parsing.
pub const THOUSANDS_SEPARATOR: char = ',';

/// Null tokens excluded from categorical statistics by default.
pub const DEFAULT_NULL_TOKENS: [&str; 3] = ["NA", "N/A", "NULL"];

/// Clean a raw value for numeric parsing.
///
/// ```rust
/// use lex_profiler::utils::clean_numeric_string;
///
/// assert_eq!(clean_numeric_string(" 1,234.5 "), "1234.5");
/// ```
pub fn clean_numeric_string(s: &str) -> String {
    s.replace(THOUSANDS_SEPARATOR, "").trim().to_string()
}

/// Parse a raw value as `f64`.
///
/// Thousands separators and surrounding whitespace are removed first.
/// Anything else that `f64::from_str` rejects is a parse failure.
pub fn parse_numeric_value(s: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

/// Parse an optional raw value; a missing value is a parse failure.
#[inline]
pub fn parse_optional_numeric(value: Option<&str>) -> Option<f64> {
    value.and_then(parse_numeric_value)
}

// =============================================================================
// Null Tokens
// =============================================================================

/// Normalize a null token for comparison (trimmed, upper-cased).
#[inline]
pub fn normalize_token(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Check whether a value is one of the (already normalized) tokens.
pub fn is_null_like(value: &str, normalized_tokens: &[String]) -> bool {
    let normalized = normalize_token(value);
    normalized_tokens.iter().any(|token| *token == normalized)
}

/// A value that is actually there: an empty string counts as missing.
///
/// CSV readers give `None` for an unquoted empty field but `Some("")` for a
/// quoted one (`""`); both mean the same thing. Whitespace is a value.
#[inline]
pub fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Default null tokens as owned strings.
pub fn default_null_tokens() -> Vec<String> {
    DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect()
}

// =============================================================================
// Formatting
// =============================================================================

/// Render a float with Rust's shortest round-trip representation.
///
/// Whole numbers keep a trailing `.0` (`20.0`), others print every digit
/// needed to round-trip (`3.3333333333333335`). Never locale dependent.
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
