//! Deadline proximity classification.
//!
//! Color rules:
//! - Red: overdue, or due within the next two calendar days
//! - Yellow: due in 3-5 days
//! - Green: due in 6-7 days
//! - Gray: completed, or due after 7 days

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Assignment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    Red,
    Yellow,
    Green,
    Gray,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusIndicatorData {
    pub color: StatusColor,
    pub days_until_due: i64,
    pub message: String,
}

/// Signed number of calendar days from `now` to `deadline`, both taken in
/// the timezone carried by `now`.
pub fn days_until_due<Tz: TimeZone>(deadline: &DateTime<Utc>, now: &DateTime<Tz>) -> i64 {
    let due_day = deadline.with_timezone(&now.timezone()).date_naive();
    (due_day - now.date_naive()).num_days()
}

pub fn classify<Tz: TimeZone>(assignment: &Assignment, now: &DateTime<Tz>) -> StatusIndicatorData {
    if assignment.is_completed() {
        return StatusIndicatorData {
            color: StatusColor::Gray,
            days_until_due: 0,
            message: "Completed".to_string(),
        };
    }

    let days = days_until_due(&assignment.deadline, now);

    let (color, message) = match days {
        d if d < 0 => {
            let overdue = d.abs();
            (StatusColor::Red, format!("{} {} overdue", overdue, day_word(overdue)))
        }
        0 => (StatusColor::Red, "Due today".to_string()),
        1..=2 => (StatusColor::Red, format!("Due in {} {}", days, day_word(days))),
        3..=5 => (StatusColor::Yellow, format!("Due in {} days", days)),
        6..=7 => (StatusColor::Green, format!("Due in {} days", days)),
        _ => (StatusColor::Gray, format!("Due in {} days", days)),
    };

    StatusIndicatorData {
        color,
        days_until_due: days,
        message,
    }
}

/// Compares raw instants, so something due at 09:00 today is overdue by 10:00.
pub fn is_overdue<Tz: TimeZone>(assignment: &Assignment, now: &DateTime<Tz>) -> bool {
    if assignment.is_completed() {
        return false;
    }
    assignment.deadline < now.with_timezone(&Utc)
}

/// Red and not yet past its due day.
pub fn is_due_soon<Tz: TimeZone>(assignment: &Assignment, now: &DateTime<Tz>) -> bool {
    if assignment.is_completed() {
        return false;
    }
    let status = classify(assignment, now);
    status.color == StatusColor::Red && status.days_until_due >= 0
}

fn day_word(n: i64) -> &'static str {
    if n == 1 { "day" } else { "days" }
}
