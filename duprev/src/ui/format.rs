//! Small display-formatting helpers shared by the panel renderers.

use chrono::{DateTime, Utc};

/// Formats a byte count with binary units, two decimals at most.
///
/// Trailing zeros are trimmed, so `1536` renders as `1.5 KB` and `1024`
/// as `1 KB`.
pub fn human_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        return format!("{} B", bytes);
    }
    let text = format!("{:.2}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

/// Inserts thousands separators: `1234567` becomes `1,234,567`.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// First 16 characters of a content hash, with a `...` tail when truncated.
pub fn short_hash(hash: &str) -> String {
    match hash.char_indices().nth(16) {
        Some((idx, _)) => format!("{}...", &hash[..idx]),
        None => hash.to_owned(),
    }
}

/// Truncates a path from the front so the most specific suffix stays visible.
pub fn truncate_front(path: &str, max: usize) -> String {
    if path.len() <= max {
        return path.to_owned();
    }
    let mut idx = path.len() - max.saturating_sub(3);
    while !path.is_char_boundary(idx) {
        idx += 1;
    }
    format!("...{}", &path[idx..])
}

/// Short date for file rows, e.g. `Jan 5, 2026`.
pub fn short_date(when: &DateTime<Utc>) -> String {
    when.format("%b %-d, %Y").to_string()
}
