mod common;

use chrono::{FixedOffset, TimeZone};
use common::{assignment, at, completed};
use overdue::models::AssignmentStatus;
use overdue::services::status_calculator::days_until_due;
use overdue::services::{StatusColor, classify, is_due_soon, is_overdue};

#[test]
fn completed_is_always_gray() {
    let now = at(2025, 1, 10, 0, 0);
    for deadline in [at(2024, 12, 1, 0, 0), at(2025, 1, 10, 12, 0), at(2025, 3, 1, 0, 0)] {
        let a = completed("a", deadline, now);
        let status = classify(&a, &now);
        assert_eq!(status.color, StatusColor::Gray);
        assert_eq!(status.message, "Completed");
        assert_eq!(status.days_until_due, 0);
    }
}

#[test]
fn late_tonight_is_due_today() {
    let now = at(2025, 1, 10, 0, 0);
    let a = assignment("a", at(2025, 1, 10, 23, 59), AssignmentStatus::NotStarted);
    let status = classify(&a, &now);
    assert_eq!(status.days_until_due, 0);
    assert_eq!(status.message, "Due today");
    assert_eq!(status.color, StatusColor::Red);
}

#[test]
fn early_morning_deadline_read_late_in_the_day_is_still_today() {
    let now = at(2025, 1, 10, 23, 0);
    let a = assignment("a", at(2025, 1, 10, 0, 1), AssignmentStatus::InProgress);
    let status = classify(&a, &now);
    assert_eq!(status.days_until_due, 0);
    assert_eq!(status.message, "Due today");
}

#[test]
fn five_days_overdue() {
    let now = at(2025, 1, 10, 0, 0);
    let a = assignment("a", at(2025, 1, 5, 0, 0), AssignmentStatus::NotStarted);
    let status = classify(&a, &now);
    assert_eq!(status.days_until_due, -5);
    assert_eq!(status.message, "5 days overdue");
    assert_eq!(status.color, StatusColor::Red);
}

#[test]
fn singular_day_wording() {
    let now = at(2025, 1, 10, 9, 0);
    let yesterday = assignment("a", at(2025, 1, 9, 9, 0), AssignmentStatus::NotStarted);
    let tomorrow = assignment("b", at(2025, 1, 11, 9, 0), AssignmentStatus::NotStarted);
    assert_eq!(classify(&yesterday, &now).message, "1 day overdue");
    assert_eq!(classify(&tomorrow, &now).message, "Due in 1 day");
    assert_eq!(classify(&tomorrow, &now).color, StatusColor::Red);
}

#[test]
fn color_bands() {
    let now = at(2025, 1, 10, 0, 0);
    let cases = [
        (12, StatusColor::Red, "Due in 2 days"),
        (13, StatusColor::Yellow, "Due in 3 days"),
        (14, StatusColor::Yellow, "Due in 4 days"),
        (15, StatusColor::Yellow, "Due in 5 days"),
        (16, StatusColor::Green, "Due in 6 days"),
        (17, StatusColor::Green, "Due in 7 days"),
        (18, StatusColor::Gray, "Due in 8 days"),
    ];
    for (day, color, message) in cases {
        let a = assignment("a", at(2025, 1, day, 12, 0), AssignmentStatus::NotStarted);
        let status = classify(&a, &now);
        assert_eq!(status.color, color, "deadline on day {}", day);
        assert_eq!(status.message, message);
    }
}

#[test]
fn calendar_day_follows_the_callers_timezone() {
    // 20:00 on the 10th in UTC-5; the deadline is 01:00 on the 11th locally.
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let now = offset.with_ymd_and_hms(2025, 1, 10, 20, 0, 0).unwrap();
    let deadline = at(2025, 1, 11, 6, 0);

    assert_eq!(days_until_due(&deadline, &now), 1);
    assert_eq!(days_until_due(&deadline, &now.with_timezone(&chrono::Utc)), 0);
}

#[test]
fn overdue_uses_raw_instants() {
    let now = at(2025, 1, 10, 10, 0);
    let this_morning = assignment("a", at(2025, 1, 10, 9, 0), AssignmentStatus::NotStarted);
    let tonight = assignment("b", at(2025, 1, 10, 22, 0), AssignmentStatus::NotStarted);
    assert!(is_overdue(&this_morning, &now));
    assert!(!is_overdue(&tonight, &now));
    assert!(!is_overdue(&completed("c", at(2025, 1, 1, 0, 0), now), &now));
}

#[test]
fn due_soon_covers_today_through_two_days() {
    let now = at(2025, 1, 10, 10, 0);
    let this_morning = assignment("a", at(2025, 1, 10, 9, 0), AssignmentStatus::NotStarted);
    let in_two_days = assignment("b", at(2025, 1, 12, 23, 0), AssignmentStatus::NotStarted);
    let in_three_days = assignment("c", at(2025, 1, 13, 0, 0), AssignmentStatus::NotStarted);
    let last_week = assignment("d", at(2025, 1, 3, 0, 0), AssignmentStatus::NotStarted);

    assert!(is_due_soon(&this_morning, &now));
    assert!(is_due_soon(&in_two_days, &now));
    assert!(!is_due_soon(&in_three_days, &now));
    assert!(!is_due_soon(&last_week, &now));
    assert!(!is_due_soon(&completed("e", at(2025, 1, 11, 0, 0), now), &now));
}

#[test]
fn classification_is_repeatable() {
    let now = at(2025, 1, 10, 0, 0);
    let a = assignment("a", at(2025, 1, 14, 0, 0), AssignmentStatus::NotStarted);
    assert_eq!(classify(&a, &now), classify(&a, &now));
}
