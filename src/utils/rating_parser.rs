//! Defensive parsing of the review API's decorative rating and count strings.
//!
//! The API presents aggregate values for display rather than for machines,
//! e.g. `"★★★★½ (4.5 av 5)"` for the average and `"12 st"` for the count.
//! Nothing here fails: unparseable input yields a documented default.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Average used when a formatted rating cannot be parsed.
///
/// Zero reads as "no rating information" and keeps the value inside the valid
/// `0.0..=5.0` range of [`crate::domain::entities::ReviewStats`].
pub const DEFAULT_AVERAGE_RATING: f64 = 0.0;

/// Count used when a formatted review count cannot be parsed.
pub const DEFAULT_REVIEW_COUNT: u32 = 0;

/// First number inside a parenthetical, dot or comma decimal: `"(4.5 av 5)"` -> `4.5`.
static PARENTHETICAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*(\d+(?:[.,]\d+)?)").unwrap());

/// Leading integer of a count string: `"12 st"` -> `12`.
static LEADING_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());

/// Extracts the average rating from a decorative string.
///
/// Tries the parenthetical value first, then the whole string as a plain
/// number. The result is clamped to `0.0..=5.0`.
pub fn parse_formatted_rating(raw: &str) -> Option<f64> {
    let from_parenthetical = PARENTHETICAL_NUMBER
        .captures(raw)
        .and_then(|caps| parse_decimal(&caps[1]));

    from_parenthetical
        .or_else(|| parse_decimal(raw))
        .map(clamp_average)
}

/// Like [`parse_formatted_rating`], falling back to [`DEFAULT_AVERAGE_RATING`].
pub fn formatted_rating_or_default(raw: &str) -> f64 {
    parse_formatted_rating(raw).unwrap_or(DEFAULT_AVERAGE_RATING)
}

/// Extracts a review count from strings such as `"1 st"` or `"12 reviews"`.
///
/// Returns [`DEFAULT_REVIEW_COUNT`] when no leading integer is present or it
/// does not fit in a `u32`.
pub fn parse_review_count(raw: &str) -> u32 {
    LEADING_INTEGER
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(DEFAULT_REVIEW_COUNT)
}

/// Reads a review count that may arrive as a JSON number or a string.
pub fn review_count_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(DEFAULT_REVIEW_COUNT),
        Value::String(s) => parse_review_count(s),
        _ => DEFAULT_REVIEW_COUNT,
    }
}

/// Reads a single review's rating that may arrive as a number, a numeric
/// string or a formatted string. Anything else is treated as missing.
pub fn rating_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|r| r.is_finite()),
        Value::String(s) => parse_formatted_rating(s),
        _ => None,
    }
}

fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn clamp_average(value: f64) -> f64 {
    value.clamp(0.0, 5.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_parenthetical_value() {
        assert_eq!(parse_formatted_rating("★★★★½ (4.5 av 5)"), Some(4.5));
        assert_eq!(parse_formatted_rating("★★★☆☆ (3 av 5)"), Some(3.0));
        assert_eq!(parse_formatted_rating("(4,2 of 5)"), Some(4.2));
    }

    #[test]
    fn test_parses_plain_number() {
        assert_eq!(parse_formatted_rating("4.7"), Some(4.7));
        assert_eq!(parse_formatted_rating(" 3,5 "), Some(3.5));
    }

    #[test]
    fn test_clamps_out_of_range() {
        assert_eq!(parse_formatted_rating("(9.1 av 5)"), Some(5.0));
    }

    #[test]
    fn test_malformed_rating_uses_default() {
        assert_eq!(parse_formatted_rating("★★★★½ (x.y av 5)"), None);
        assert_eq!(formatted_rating_or_default("★★★★½ (x.y av 5)"), DEFAULT_AVERAGE_RATING);
        assert_eq!(formatted_rating_or_default(""), DEFAULT_AVERAGE_RATING);
        assert_eq!(formatted_rating_or_default("great"), DEFAULT_AVERAGE_RATING);
    }

    #[test]
    fn test_parse_review_count() {
        assert_eq!(parse_review_count("1 st"), 1);
        assert_eq!(parse_review_count("12 reviews"), 12);
        assert_eq!(parse_review_count("  7"), 7);
        assert_eq!(parse_review_count("many"), 0);
        assert_eq!(parse_review_count(""), 0);
        assert_eq!(parse_review_count("99999999999 st"), 0);
    }

    #[test]
    fn test_review_count_from_value() {
        assert_eq!(review_count_from_value(&json!(3)), 3);
        assert_eq!(review_count_from_value(&json!("4 st")), 4);
        assert_eq!(review_count_from_value(&json!(-2)), 0);
        assert_eq!(review_count_from_value(&json!(null)), 0);
    }

    #[test]
    fn test_rating_from_value() {
        assert_eq!(rating_from_value(&json!(4)), Some(4.0));
        assert_eq!(rating_from_value(&json!("3.5")), Some(3.5));
        assert_eq!(rating_from_value(&json!("★★ (2 av 5)")), Some(2.0));
        assert_eq!(rating_from_value(&json!("n/a")), None);
        assert_eq!(rating_from_value(&json!({ "stars": 4 })), None);
    }
}
