//! Productivity statistics derived from an assignment/course snapshot.
//!
//! Every function here is pure: it reads the slices it is given plus an
//! explicit `now`, and event-category items are left out of every figure.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Assignment, AssignmentStatus, Course, Priority};
use crate::services::status_calculator::{is_due_soon, is_overdue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMetrics {
    pub total: usize,
    pub completed: usize,
    pub rate: u32,
    pub on_time: usize,
    pub late: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakData {
    pub current: u32,
    pub longest: u32,
    pub last_completed_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickStats {
    pub total: usize,
    pub completed: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub in_progress: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseWorkloadItem {
    pub course_id: String,
    pub course_code: String,
    pub course_name: String,
    pub course_color: String,
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    #[default]
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendDataPoint {
    /// First day of the bucket, `YYYY-MM-DD`.
    pub date: String,
    pub label: String,
    pub due: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductivityInsight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Tunable cut-offs for the insight cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightThresholds {
    /// Completion rate (percent) at or above which the rate card is positive.
    pub high_completion_rate: u32,
    /// Completion rate (percent) below which the rate card is a warning.
    pub low_completion_rate: u32,
    /// More than this many items due in the next 7 days is a busy week.
    pub busy_week_threshold: usize,
    /// Minimum current streak (days) that earns a streak card.
    pub active_streak_days: u32,
    /// Completed items needed before an average completion time is shown.
    pub min_samples_for_average: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            high_completion_rate: 70,
            low_completion_rate: 40,
            busy_week_threshold: 5,
            active_streak_days: 3,
            min_samples_for_average: 3,
        }
    }
}

pub const MAX_INSIGHTS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsBundle {
    pub generated_at: DateTime<Utc>,
    pub period: TrendPeriod,
    pub completion: CompletionMetrics,
    pub streak: StreakData,
    pub quick_stats: QuickStats,
    pub status_distribution: StatusDistribution,
    pub priority_distribution: PriorityDistribution,
    pub course_workload: Vec<CourseWorkloadItem>,
    pub deadline_trends: Vec<TrendDataPoint>,
    pub insights: Vec<ProductivityInsight>,
}

fn countable(assignments: &[Assignment]) -> impl Iterator<Item = &Assignment> {
    assignments.iter().filter(|a| !a.is_event())
}

pub fn completion_metrics(assignments: &[Assignment]) -> CompletionMetrics {
    let mut total = 0;
    let mut completed = 0;
    let mut on_time = 0;
    let mut late = 0;

    for a in countable(assignments) {
        total += 1;
        if !a.is_completed() {
            continue;
        }
        completed += 1;
        match a.completed_at {
            Some(done) if done <= a.deadline => on_time += 1,
            Some(_) => late += 1,
            None => {}
        }
    }

    CompletionMetrics {
        total,
        completed,
        rate: percentage(completed, total),
        on_time,
        late,
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}

/// The current streak survives an empty "today" as long as yesterday had a
/// completion; it is zero once the latest completion day is two or more days
/// back.
pub fn streak<Tz: TimeZone>(assignments: &[Assignment], now: &DateTime<Tz>) -> StreakData {
    let tz = now.timezone();
    let mut days = BTreeSet::new();
    let mut last_completed_date: Option<DateTime<Utc>> = None;

    for a in countable(assignments).filter(|a| a.is_completed()) {
        if let Some(done) = a.completed_at {
            days.insert(done.with_timezone(&tz).date_naive());
            last_completed_date = Some(last_completed_date.map_or(done, |prev| prev.max(done)));
        }
    }

    let Some(&latest) = days.last() else {
        return StreakData {
            current: 0,
            longest: 0,
            last_completed_date: None,
        };
    };

    let today = now.date_naive();
    let mut current = 0;
    if matches!((today - latest).num_days(), 0 | 1) {
        let mut expected = latest;
        for &day in days.iter().rev() {
            if day != expected {
                break;
            }
            current += 1;
            expected = day - Duration::days(1);
        }
    }

    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for &day in &days {
        run = match prev {
            Some(p) if (day - p).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    StreakData {
        current,
        longest: longest.max(current),
        last_completed_date,
    }
}

pub fn quick_stats<Tz: TimeZone>(assignments: &[Assignment], now: &DateTime<Tz>) -> QuickStats {
    let mut stats = QuickStats {
        total: 0,
        completed: 0,
        overdue: 0,
        due_soon: 0,
        in_progress: 0,
    };

    for a in countable(assignments) {
        stats.total += 1;
        match a.status {
            AssignmentStatus::Completed => stats.completed += 1,
            AssignmentStatus::InProgress => stats.in_progress += 1,
            AssignmentStatus::NotStarted => {}
        }
        if is_overdue(a, now) {
            stats.overdue += 1;
        }
        if is_due_soon(a, now) {
            stats.due_soon += 1;
        }
    }

    stats
}

pub fn status_distribution(assignments: &[Assignment]) -> StatusDistribution {
    countable(assignments).fold(StatusDistribution::default(), |mut dist, a| {
        match a.status {
            AssignmentStatus::NotStarted => dist.not_started += 1,
            AssignmentStatus::InProgress => dist.in_progress += 1,
            AssignmentStatus::Completed => dist.completed += 1,
        }
        dist
    })
}

pub fn priority_distribution(assignments: &[Assignment]) -> PriorityDistribution {
    countable(assignments).fold(PriorityDistribution::default(), |mut dist, a| {
        match a.priority {
            Priority::Low => dist.low += 1,
            Priority::Medium => dist.medium += 1,
            Priority::High => dist.high += 1,
        }
        dist
    })
}

/// One entry per active course that has at least one assignment, busiest
/// first. Courses without assignments are left out.
pub fn course_workload(assignments: &[Assignment], courses: &[Course]) -> Vec<CourseWorkloadItem> {
    let active: HashMap<&str, &Course> = courses
        .iter()
        .filter(|c| c.active)
        .map(|c| (c.id.as_str(), c))
        .collect();
    let mut workload: HashMap<&str, CourseWorkloadItem> = HashMap::new();

    for a in countable(assignments) {
        let Some(course) = a.course_id.as_deref().and_then(|id| active.get(id)) else {
            continue;
        };
        let entry = workload.entry(course.id.as_str()).or_insert_with(|| CourseWorkloadItem {
            course_id: course.id.clone(),
            course_code: course.code.clone(),
            course_name: course.name.clone(),
            course_color: course.color.clone(),
            total: 0,
            completed: 0,
            pending: 0,
        });
        entry.total += 1;
        if a.is_completed() {
            entry.completed += 1;
        } else {
            entry.pending += 1;
        }
    }

    let mut items: Vec<CourseWorkloadItem> = workload.into_values().collect();
    items.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.course_code.cmp(&b.course_code))
            .then_with(|| a.course_id.cmp(&b.course_id))
    });
    items
}

/// Buckets assignments by the local calendar week (Monday start) or month of
/// their deadline. Only non-empty buckets are returned, oldest first.
pub fn deadline_trends<Tz: TimeZone>(
    assignments: &[Assignment],
    period: TrendPeriod,
    now: &DateTime<Tz>,
) -> Vec<TrendDataPoint> {
    let tz = now.timezone();
    let mut buckets: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for a in countable(assignments) {
        let day = a.deadline.with_timezone(&tz).date_naive();
        let entry = buckets.entry(bucket_start(day, period)).or_default();
        entry.0 += 1;
        if a.is_completed() {
            entry.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(start, (due, completed))| TrendDataPoint {
            date: start.format("%Y-%m-%d").to_string(),
            label: match period {
                TrendPeriod::Week => start.format("%b %-d").to_string(),
                TrendPeriod::Month => start.format("%b %Y").to_string(),
            },
            due,
            completed,
        })
        .collect()
}

fn bucket_start(day: NaiveDate, period: TrendPeriod) -> NaiveDate {
    match period {
        TrendPeriod::Week => {
            day - Duration::days(i64::from(day.weekday().num_days_from_monday()))
        }
        TrendPeriod::Month => day.with_day(1).unwrap_or(day),
    }
}

pub fn productivity_insights<Tz: TimeZone>(
    assignments: &[Assignment],
    now: &DateTime<Tz>,
    thresholds: &InsightThresholds,
) -> Vec<ProductivityInsight> {
    let mut insights = Vec::new();
    let now_utc = now.with_timezone(&Utc);

    let overdue = countable(assignments).filter(|a| is_overdue(a, now)).count();
    if overdue > 0 {
        insights.push(ProductivityInsight {
            kind: InsightKind::Warning,
            title: "Overdue".to_string(),
            message: format!("{} assignment{} past deadline", overdue, plural(overdue)),
            value: Some(overdue.to_string()),
        });
    } else {
        insights.push(ProductivityInsight {
            kind: InsightKind::Positive,
            title: "On Track".to_string(),
            message: "No overdue assignments".to_string(),
            value: None,
        });
    }

    let week_end = now_utc + Duration::days(7);
    let due_this_week = countable(assignments)
        .filter(|a| !a.is_completed() && a.deadline >= now_utc && a.deadline <= week_end)
        .count();
    insights.push(ProductivityInsight {
        kind: if due_this_week > thresholds.busy_week_threshold {
            InsightKind::Warning
        } else {
            InsightKind::Neutral
        },
        title: "This Week".to_string(),
        message: format!("{} assignment{} due", due_this_week, plural(due_this_week)),
        value: Some(due_this_week.to_string()),
    });

    let completion = completion_metrics(assignments);
    if completion.total > 0 {
        let (kind, message) = if completion.rate >= thresholds.high_completion_rate {
            (InsightKind::Positive, "Great job keeping up with your work")
        } else if completion.rate < thresholds.low_completion_rate {
            (InsightKind::Warning, "Most of your assignments are still open")
        } else {
            (InsightKind::Neutral, "Steady progress on your assignments")
        };
        insights.push(ProductivityInsight {
            kind,
            title: "Completion Rate".to_string(),
            message: message.to_string(),
            value: Some(format!("{}%", completion.rate)),
        });
    }

    let streak = streak(assignments, now);
    if streak.current >= thresholds.active_streak_days {
        insights.push(ProductivityInsight {
            kind: InsightKind::Positive,
            title: "Streak".to_string(),
            message: format!("{} days in a row with completed work", streak.current),
            value: Some(streak.current.to_string()),
        });
    }

    let durations: Vec<f64> = countable(assignments)
        .filter(|a| a.is_completed())
        .filter_map(|a| a.completed_at.map(|done| (done - a.created_at).num_seconds() as f64 / 86_400.0))
        .collect();
    if !durations.is_empty() && durations.len() >= thresholds.min_samples_for_average {
        let avg_days = (durations.iter().sum::<f64>() / durations.len() as f64).round() as i64;
        insights.push(ProductivityInsight {
            kind: InsightKind::Neutral,
            title: "Avg Completion".to_string(),
            message: format!("Tasks completed in ~{} days on average", avg_days),
            value: Some(format!("{}d", avg_days)),
        });
    }

    if completion.late > 0 && completion.late > completion.on_time {
        insights.push(ProductivityInsight {
            kind: InsightKind::Warning,
            title: "Late Work".to_string(),
            message: format!(
                "{} of {} completed assignments were turned in late",
                completion.late,
                completion.late + completion.on_time
            ),
            value: Some(completion.late.to_string()),
        });
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

pub fn compute_statistics<Tz: TimeZone>(
    assignments: &[Assignment],
    courses: &[Course],
    now: &DateTime<Tz>,
    period: TrendPeriod,
    thresholds: &InsightThresholds,
) -> StatisticsBundle {
    StatisticsBundle {
        generated_at: now.with_timezone(&Utc),
        period,
        completion: completion_metrics(assignments),
        streak: streak(assignments, now),
        quick_stats: quick_stats(assignments, now),
        status_distribution: status_distribution(assignments),
        priority_distribution: priority_distribution(assignments),
        course_workload: course_workload(assignments, courses),
        deadline_trends: deadline_trends(assignments, period, now),
        insights: productivity_insights(assignments, now, thresholds),
    }
}
