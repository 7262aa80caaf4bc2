//! Pure display formatters
//!
//! These reproduce the bot UI's historical output byte for byte, including the
//! sign asymmetry: the `+` prefix is added only for non-negative values, and
//! the currency formatter drops the minus sign entirely because it prints the
//! absolute value, while the percent formatter keeps the native minus from
//! numeric formatting. `format_currency(-12.5)` is `"$12.50"` but
//! `format_percent(-12.5)` is `"-12.50%"`.

use chrono::{DateTime, Local, Utc};

/// Format a dollar amount with the UI's sign convention
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}${:.2}", value.abs())
}

/// Format a percentage with the UI's sign convention
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "0.00%".to_string();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{sign}{value:.2}%")
}

/// Format a hold duration given in seconds
///
/// Under a minute renders as seconds, under an hour as whole minutes,
/// otherwise as hours and minutes.
pub fn format_hold_time(seconds: f64) -> String {
    let secs = seconds as i64;
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

/// Format a close timestamp relative to the viewer's local day
pub fn format_timestamp(ts: Option<DateTime<Utc>>) -> String {
    format_timestamp_at(ts, Local::now())
}

/// Same as [`format_timestamp`] with an explicit "now" for deterministic tests
pub fn format_timestamp_at(ts: Option<DateTime<Utc>>, now: DateTime<Local>) -> String {
    let Some(ts) = ts else {
        return "N/A".to_string();
    };
    let local = ts.with_timezone(&Local);
    let today = now.date_naive();
    if local.date_naive() == today {
        local.format("Today %H:%M:%S").to_string()
    } else if today
        .pred_opt()
        .is_some_and(|yesterday| local.date_naive() == yesterday)
    {
        local.format("Yesterday %H:%M").to_string()
    } else {
        local.format("%b %-d %H:%M").to_string()
    }
}

/// Sign-based presentation class: positive, negative, or neither for zero
pub fn value_class(value: f64) -> Option<&'static str> {
    if value > 0.0 {
        Some("positive")
    } else if value < 0.0 {
        Some("negative")
    } else {
        None
    }
}
