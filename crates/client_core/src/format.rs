//! Display formatting shared by the GUI and CLI.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// US-dollar amount with thousands separators and no cents. Missing
/// compensation renders as "--" rather than a misleading zero.
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount else {
        return "--".to_string();
    };
    let negative = amount < 0.0;
    let grouped = group_thousands(amount.abs().round() as u64);
    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Counts come over the wire as floats; whole values render without a
/// decimal point.
pub fn format_count(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

/// Timestamp as e.g. "Mar 4, 2026". Accepts RFC 3339 as well as the naive
/// date and datetime forms the service has used; anything unparseable is
/// shown verbatim instead of erroring a whole table row.
pub fn format_date(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%b %-d, %Y").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    raw.to_string()
}

/// Risk badge text; missing risk shows as "N/A".
pub fn risk_display(risk: Option<&str>) -> String {
    match risk {
        Some(level) if !level.is_empty() => capitalize(level),
        _ => "N/A".to_string(),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Extraction status with the wire's SCREAMING_SNAKE_CASE softened for
/// display, e.g. "IN_PROGRESS" -> "In Progress".
pub fn status_display(status: &str) -> String {
    status
        .split('_')
        .map(|word| capitalize(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
