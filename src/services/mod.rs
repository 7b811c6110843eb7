pub mod assignment_query;
pub mod reminder;
pub mod statistics;
pub mod status_calculator;

pub use assignment_query::{AssignmentQuery, SortBy, SortOrder};
pub use reminder::{LogReminderSink, Reminder, ReminderKind, ReminderLog, ReminderScheduler, ReminderSink};
pub use statistics::{InsightThresholds, StatisticsBundle, TrendPeriod, compute_statistics};
pub use status_calculator::{StatusColor, StatusIndicatorData, classify, is_due_soon, is_overdue};
