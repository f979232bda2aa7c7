//! Presentation helpers for note lists.
//!
//! # Responsibility
//! - Render compact relative timestamps (`5M AGO`, `YESTERDAY`).
//! - Shorten and HTML-escape note text for previews.

use chrono::DateTime;

const SECOND_MS: i64 = 1_000;

/// Formats `timestamp_ms` relative to `now_ms`.
///
/// Timestamps older than a year (of 30-day months) fall back to an
/// uppercase absolute date such as `MAR 4, 2024`.
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff_ms = (now_ms - timestamp_ms).max(0);
    let seconds = diff_ms / SECOND_MS;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;
    let weeks = days / 7;
    let months = days / 30;

    if seconds < 60 {
        return "JUST NOW".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}M AGO");
    }
    if hours < 24 {
        return format!("{hours}H AGO");
    }
    if days == 1 {
        return "YESTERDAY".to_string();
    }
    if days < 7 {
        return format!("{days}D AGO");
    }
    if weeks < 4 {
        return format!("{weeks}W AGO");
    }
    if months < 12 {
        return format!("{months}MO AGO");
    }

    match DateTime::from_timestamp_millis(timestamp_ms) {
        Some(date) => date.format("%b %-d, %Y").to_string().to_uppercase(),
        None => "UNKNOWN".to_string(),
    }
}

/// Cuts `value` to `max_chars` characters, appending `...` when shortened.
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Escapes `<`, `>`, `"` and `'` for embedding in HTML.
pub fn sanitize(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}
