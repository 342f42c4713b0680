//! Lenient access to form-encoded admin fields.
//!
//! Integer fields take the leading integer of the value (`"12abc"` is 12,
//! garbage is 0). Text fields have control characters removed, whitespace runs
//! collapsed and ends trimmed. Textarea fields keep their line breaks.

use std::collections::HashMap;

/// Fields of one form-encoded request.
#[derive(Debug, Clone, Default)]
pub struct AjaxParams(HashMap<String, String>);

impl From<HashMap<String, String>> for AjaxParams {
    fn from(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }
}

impl AjaxParams {
    /// Whether the field was sent at all
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sanitized text of `key`, `None` when absent.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.0.get(key).map(|v| sanitize_text(v))
    }

    /// Sanitized text of `key`, or `default` when absent.
    #[must_use]
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    /// Sanitized multi-line text of `key`, empty when absent.
    #[must_use]
    pub fn textarea(&self, key: &str) -> String {
        self.0.get(key).map(|v| sanitize_textarea(v)).unwrap_or_default()
    }

    /// Leading integer of `key`, or `default` when absent.
    #[must_use]
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        self.0.get(key).map_or(default, |v| parse_int(v))
    }
}

/// Parses the leading integer of `value`, saturating on overflow.
#[must_use]
pub fn parse_int(value: &str) -> i64 {
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut result: i64 = 0;
    for digit in digits.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(digit - b'0');
        result = if negative {
            result.saturating_mul(10).saturating_sub(d)
        } else {
            result.saturating_mul(10).saturating_add(d)
        };
    }
    result
}

/// Single-line text: controls dropped, whitespace collapsed, trimmed.
#[must_use]
pub fn sanitize_text(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace())
        .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Multi-line text: CRLF normalized, controls other than newline and tab dropped, trimmed.
#[must_use]
pub fn sanitize_textarea(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
