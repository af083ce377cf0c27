//! Shared utility functions used across modules.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::constants::SPINNER_CHARS;

/// Truncate `s` to at most `max_width` terminal columns, appending "…" if cut.
pub fn truncate_str(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Get the spinner character for the current tick.
pub fn spinner_char(tick: u64) -> &'static str {
    SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize]
}

/// Collapse newlines and runs of whitespace so text fits in one table cell.
pub fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
