use chrono::NaiveDate;
use cosmictasks::display::{due_label, stars, stats_label, truncate};
use cosmictasks::models::*;
use cosmictasks::projector::{CompletionStats, Visibility};
use cosmictasks::Error;
use yare::parameterized;

#[parameterized(
    low = { "low", Priority::Low },
    medium_upper = { "MEDIUM", Priority::Medium },
    high_padded = { " high ", Priority::High },
)]
fn test_priority_parsing(raw: &str, expected: Priority) {
    assert_eq!(raw.parse::<Priority>().unwrap(), expected);
    assert_eq!(expected.to_string().parse::<Priority>().unwrap(), expected);
}

#[test]
fn test_priority_ordering() {
    assert!(Priority::High > Priority::Medium);
    assert!(Priority::Medium > Priority::Low);
    assert_eq!(Priority::default(), Priority::Medium);
}

#[parameterized(
    priority = { "urgent" },
    empty = { "" },
)]
fn test_invalid_priority(raw: &str) {
    assert!(matches!(raw.parse::<Priority>(), Err(Error::InvalidPriority(_))));
}

#[test]
fn test_every_category_and_status_parses_back() {
    for category in WikiCategory::ALL {
        assert_eq!(category.as_str().parse::<WikiCategory>().unwrap(), category);
    }
    for status in WikiStatus::ALL {
        assert_eq!(status.as_str().parse::<WikiStatus>().unwrap(), status);
    }
    assert!(matches!("gardening".parse::<WikiCategory>(), Err(Error::InvalidCategory(_))));
    assert!(matches!("deleted".parse::<WikiStatus>(), Err(Error::InvalidStatus(_))));
}

#[parameterized(
    all = { "all", Visibility::All },
    empty = { "", Visibility::All },
    public = { "Public", Visibility::Public },
    private = { "private", Visibility::Private },
)]
fn test_visibility_parsing(raw: &str, expected: Visibility) {
    assert_eq!(raw.parse::<Visibility>().unwrap(), expected);
}

#[test]
fn test_lenient_decoding_of_stored_values() {
    let priority: Priority = serde_json::from_str("\"urgent\"").unwrap();
    assert_eq!(priority, Priority::Low);
    let status: WikiStatus = serde_json::from_str("\"PUBLISHED\"").unwrap();
    assert_eq!(status, WikiStatus::Published);
    assert_eq!(serde_json::to_string(&WikiCategory::Ideas).unwrap(), "\"ideas\"");
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2025-03-14").unwrap(), NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    assert!(matches!(parse_date("14/03/2025"), Err(Error::InvalidDate(_))));
}

#[test]
fn test_display_helpers() {
    let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    assert_eq!(due_label(None, today), "-");
    assert_eq!(due_label(Some(today), today), "Today");
    assert_eq!(due_label(NaiveDate::from_ymd_opt(2025, 3, 17), today), "3d");
    assert_eq!(due_label(NaiveDate::from_ymd_opt(2025, 3, 12), today), "2d overdue");

    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a longer title", 8), "a longer...");
    assert_eq!(stars(Some(3)), "★★★☆☆");
    assert_eq!(stars(None), "");
    assert_eq!(stats_label(&CompletionStats { completed: 3, total: 4, percentage: 75 }), "3/4 (75%)");
}
