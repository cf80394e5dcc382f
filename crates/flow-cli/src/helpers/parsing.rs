//! Parsing helpers for dates, amounts, priorities, and id prefixes.

use chrono::{DateTime, NaiveDate, Utc};

use flow_core::model::{Priority, Record};

/// Parse a datetime string (ISO-8601 or YYYY-MM-DD).
pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(anyhow::anyhow!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    ))
}

/// Parse a money amount such as `12.50` or `$12.50`.
pub fn parse_amount(value: &str) -> anyhow::Result<f64> {
    let cleaned = value.trim().trim_start_matches('$').replace(',', "");
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid amount: {}", value))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(anyhow::anyhow!(
            "Invalid amount: {} (use a positive number; pass --income for money in)",
            value
        ));
    }
    Ok(amount)
}

pub fn parse_priority(value: &str) -> anyhow::Result<Priority> {
    value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid priority: {} (use high, medium, or low)", value))
}

/// Find the one record whose id is `prefix` or starts with it.
pub fn resolve_id<'a, R: Record>(records: &'a [R], prefix: &str) -> anyhow::Result<&'a R> {
    if let Some(exact) = records.iter().find(|r| r.id() == prefix) {
        return Ok(exact);
    }
    let mut matches = records.iter().filter(|r| r.id().starts_with(prefix));
    match (matches.next(), matches.next()) {
        (Some(found), None) if !prefix.is_empty() => Ok(found),
        (Some(_), Some(_)) => Err(anyhow::anyhow!(
            "ID prefix \"{}\" matches more than one {}; use more characters",
            prefix,
            R::ENTITY
        )),
        _ => Err(anyhow::anyhow!("{} not found: {}", capitalize(R::ENTITY), prefix)),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::model::Task;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            user_id: "u1".to_string(),
            title: id.to_string(),
            description: None,
            deadline: None,
            priority: Priority::High,
            list_name: "Default".to_string(),
            is_completed: false,
        }
    }

    #[test]
    fn test_parse_datetime_formats() {
        assert!(parse_datetime("2024-01-15").is_ok());
        assert!(parse_datetime("2024-01-15T10:30:00Z").is_ok());
        assert!(parse_datetime("15/01/2024").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), 12.5);
        assert_eq!(parse_amount("$1,200").unwrap(), 1200.0);
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_resolve_id_prefix() {
        let tasks = vec![task("abc123"), task("abd456"), task("xyz")];
        assert_eq!(resolve_id(&tasks, "abc").unwrap().id, "abc123");
        assert_eq!(resolve_id(&tasks, "xyz").unwrap().id, "xyz");

        let ambiguous = resolve_id(&tasks, "ab").unwrap_err().to_string();
        assert!(ambiguous.contains("more than one task"));

        let missing = resolve_id(&tasks, "zzz").unwrap_err().to_string();
        assert_eq!(missing, "Task not found: zzz");
    }
}
