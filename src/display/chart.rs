//! Text charts and column helpers for terminal reports

use crate::models::Money;

/// Horizontal bar for `value` scaled against `max`, always `width` cells wide
pub fn format_bar(value: Money, max: Money, width: usize) -> String {
    if !max.is_positive() || !value.is_positive() {
        return "░".repeat(width);
    }

    let ratio = value.cents() as f64 / max.cents() as f64;
    let filled = ((ratio * width as f64).round() as usize).clamp(1, width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a percentage with precision that shrinks as the value grows
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Truncate to `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Single rule line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Double rule line
pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}
