//! String formatting helpers.

use chrono::{DateTime, Utc};

/// First eight characters of an id.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Cut `text` to `max` characters on one line, ending in an ellipsis when cut.
pub fn truncate(text: &str, max: usize, unicode: bool) -> String {
    let line = text.lines().next().unwrap_or("");
    let cut = line.chars().count() > max || text.lines().nth(1).is_some();
    if !cut {
        return line.to_string();
    }
    let ellipsis = if unicode { "\u{2026}" } else { "..." };
    let keep = max.saturating_sub(ellipsis.chars().count());
    let mut out: String = line.chars().take(keep).collect();
    out.push_str(ellipsis);
    out
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10, false), "short");
        assert_eq!(truncate("a longer line", 8, false), "a lon...");
        assert_eq!(truncate("first\nsecond", 20, true), "first\u{2026}");
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "2024-03-09");
    }
}
