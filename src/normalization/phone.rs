//! WhatsApp numbers as stored in site settings vs. the digits-only form `wa.me` wants.

use regex::Regex;
use std::sync::OnceLock;

fn e164_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("static regex"))
}

/// True when `raw` is an E.164-style number (optional `+`, no leading zero, 2..=15 digits).
pub fn is_valid_whatsapp_number(raw: &str) -> bool {
    e164_pattern().is_match(raw.trim())
}

/// Reduces a human-entered number to the digits `wa.me` expects.
///
/// Separators (spaces, dashes, dots, parentheses) and a leading `+` or `00`
/// international prefix are removed.
pub fn normalize_whatsapp(raw: &str) -> String {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    match digits.strip_prefix("00") {
        Some(rest) if !raw.trim_start().starts_with('+') => rest.to_string(),
        _ => digits,
    }
}
