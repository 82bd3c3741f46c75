//! Due-date input parsing and relative formatting.

use chrono::{Duration, NaiveDate};

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
///
/// `today` anchors the relative forms so parsing stays deterministic.
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Describe a due date relative to a reference day, compact enough for a
/// table cell: "today", "tomorrow", "5d left", "2d over", or "-" when the
/// task has no due date.
pub fn describe_due(due: Option<NaiveDate>, today: NaiveDate) -> String {
    let Some(due) = due else {
        return "-".into();
    };
    match (due - today).num_days() {
        0 => "today".into(),
        1 => "tomorrow".into(),
        days if days > 1 => format!("{days}d left"),
        days => format!("{}d over", -days),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 4).unwrap()
    }

    #[test]
    fn parses_relative_keywords() {
        assert_eq!(parse_due_input("today", anchor()), Some(anchor()));
        assert_eq!(
            parse_due_input("Tomorrow", anchor()),
            Some(anchor() + Duration::days(1))
        );
    }

    #[test]
    fn parses_offsets_and_iso() {
        assert_eq!(
            parse_due_input("in 3d", anchor()),
            Some(anchor() + Duration::days(3))
        );
        assert_eq!(
            parse_due_input("in 2w", anchor()),
            Some(anchor() + Duration::weeks(2))
        );
        assert_eq!(
            parse_due_input("2026-12-24", anchor()),
            NaiveDate::from_ymd_opt(2026, 12, 24)
        );
    }

    #[test]
    fn rejects_unrecognised_input() {
        assert_eq!(parse_due_input("someday", anchor()), None);
        assert_eq!(parse_due_input("in 3 fortnights", anchor()), None);
    }

    #[test]
    fn describes_due_dates_relative_to_today() {
        assert_eq!(describe_due(None, anchor()), "-");
        assert_eq!(describe_due(Some(anchor()), anchor()), "today");
        assert_eq!(
            describe_due(Some(anchor() + Duration::days(1)), anchor()),
            "tomorrow"
        );
        assert_eq!(
            describe_due(Some(anchor() + Duration::days(5)), anchor()),
            "5d left"
        );
        assert_eq!(
            describe_due(Some(anchor() - Duration::days(2)), anchor()),
            "2d over"
        );
    }
}
