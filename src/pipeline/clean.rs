//! Text cleanup: turn a raw span body into a presentable card field.
//!
//! Each step is a small pure function (`&str → String`) so rules can be
//! combined per field through [`TextRule`]. Steps run in this order:
//!
//! 1. Unescape HTML entities (`&amp;` → `&`, `&#243;` → `ó`), when enabled
//! 2. Trim surrounding whitespace
//! 3. Capitalise the first character
//! 4. Apply the trailing-period policy

use crate::config::{TextRule, TrailingPeriod};

/// Apply `rule` to a raw field.
///
/// An empty (or whitespace-only) input always produces an empty string, so
/// missing content is caught by record validation rather than hidden behind
/// a lone `"."`.
pub fn clean_field(raw: &str, rule: TextRule) -> String {
    let s = if rule.unescape_entities {
        unescape_entities(raw)
    } else {
        raw.to_string()
    };
    let s = capitalize_first(s.trim());
    apply_trailing_period(&s, rule.trailing_period)
}

/// Decode named and numeric HTML character references.
pub fn unescape_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

/// Upper-case the first character, leaving the rest untouched.
pub fn capitalize_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip, enforce, or keep the trailing period.
pub fn apply_trailing_period(input: &str, policy: TrailingPeriod) -> String {
    match policy {
        TrailingPeriod::Keep => input.to_string(),
        TrailingPeriod::Strip => input.trim_end_matches('.').trim_end().to_string(),
        TrailingPeriod::Enforce => {
            let body = input.trim_end_matches('.').trim_end();
            if body.is_empty() {
                String::new()
            } else {
                format!("{body}.")
            }
        }
    }
}
