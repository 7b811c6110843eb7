mod common;

use chrono::{FixedOffset, TimeZone};
use common::{assignment, at, completed, course};
use overdue::models::{Assignment, AssignmentCategory, AssignmentStatus, Priority};
use overdue::services::statistics::{
    InsightKind, completion_metrics, course_workload, deadline_trends, priority_distribution,
    productivity_insights, quick_stats, status_distribution, streak,
};
use overdue::services::{InsightThresholds, TrendPeriod, compute_statistics};

fn event(id: &str, deadline: chrono::DateTime<chrono::Utc>) -> Assignment {
    Assignment {
        category: AssignmentCategory::Event,
        ..assignment(id, deadline, AssignmentStatus::NotStarted)
    }
}

fn in_course(a: Assignment, course_id: &str) -> Assignment {
    Assignment {
        course_id: Some(course_id.to_string()),
        ..a
    }
}

#[test]
fn empty_snapshot_degrades_to_zero() {
    let now = at(2025, 1, 10, 12, 0);
    let stats = compute_statistics(&[], &[], &now, TrendPeriod::Week, &InsightThresholds::default());

    assert_eq!(stats.completion.total, 0);
    assert_eq!(stats.completion.rate, 0);
    assert_eq!(stats.quick_stats.total, 0);
    assert_eq!(stats.streak.current, 0);
    assert_eq!(stats.streak.longest, 0);
    assert!(stats.streak.last_completed_date.is_none());
    assert_eq!(stats.status_distribution.not_started + stats.status_distribution.completed, 0);
    assert!(stats.course_workload.is_empty());
    assert!(stats.deadline_trends.is_empty());

    let titles: Vec<&str> = stats.insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["On Track", "This Week"]);
}

#[test]
fn completion_rate_rounds_to_whole_percent() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments = vec![
        completed("a", at(2025, 1, 5, 12, 0), at(2025, 1, 4, 12, 0)),
        completed("b", at(2025, 1, 6, 12, 0), at(2025, 1, 7, 12, 0)),
        completed("c", at(2025, 1, 7, 12, 0), at(2025, 1, 7, 12, 0)),
        assignment("d", at(2025, 1, 20, 12, 0), AssignmentStatus::NotStarted),
    ];
    let metrics = completion_metrics(&assignments);
    assert_eq!(metrics.total, 4);
    assert_eq!(metrics.completed, 3);
    assert_eq!(metrics.rate, 75);
    assert_eq!(metrics.on_time, 2);
    assert_eq!(metrics.late, 1);

    let third = vec![
        completed("a", now, now),
        assignment("b", now, AssignmentStatus::NotStarted),
        assignment("c", now, AssignmentStatus::NotStarted),
    ];
    assert_eq!(completion_metrics(&third).rate, 33);
}

#[test]
fn streak_through_today() {
    let now = at(2025, 1, 10, 18, 0);
    let assignments = vec![
        completed("a", at(2025, 1, 12, 0, 0), at(2025, 1, 10, 9, 0)),
        completed("b", at(2025, 1, 12, 0, 0), at(2025, 1, 9, 9, 0)),
        completed("c", at(2025, 1, 12, 0, 0), at(2025, 1, 8, 9, 0)),
    ];
    let data = streak(&assignments, &now);
    assert_eq!(data.current, 3);
    assert_eq!(data.longest, 3);
    assert_eq!(data.last_completed_date, Some(at(2025, 1, 10, 9, 0)));
}

#[test]
fn empty_today_keeps_a_streak_that_ran_through_yesterday() {
    let now = at(2025, 1, 10, 8, 0);
    let assignments = vec![
        completed("a", at(2025, 1, 12, 0, 0), at(2025, 1, 9, 21, 0)),
        completed("b", at(2025, 1, 12, 0, 0), at(2025, 1, 8, 21, 0)),
    ];
    assert_eq!(streak(&assignments, &now).current, 2);
}

#[test]
fn streak_ending_two_days_ago_is_broken() {
    let now = at(2025, 1, 10, 8, 0);
    let assignments = vec![
        completed("a", at(2025, 1, 12, 0, 0), at(2025, 1, 8, 21, 0)),
        completed("b", at(2025, 1, 12, 0, 0), at(2025, 1, 7, 21, 0)),
    ];
    let data = streak(&assignments, &now);
    assert_eq!(data.current, 0);
    assert_eq!(data.longest, 2);
}

#[test]
fn longest_run_survives_a_gap() {
    let now = at(2025, 1, 10, 20, 0);
    let done = |id: &str, day: u32| completed(id, at(2025, 1, 20, 0, 0), at(2025, 1, day, 10, 0));
    let assignments = vec![
        done("a", 1),
        done("b", 2),
        done("c", 3),
        done("d", 4),
        done("e", 4),
        done("f", 6),
        done("g", 9),
        done("h", 10),
    ];
    let data = streak(&assignments, &now);
    assert_eq!(data.current, 2);
    assert_eq!(data.longest, 4);
}

#[test]
fn streak_days_use_the_callers_calendar() {
    // 02:00 UTC on the 10th is still the 9th in UTC-5.
    let offset = FixedOffset::west_opt(5 * 3600).unwrap();
    let now = offset.with_ymd_and_hms(2025, 1, 10, 12, 0, 0).unwrap();
    let assignments = vec![
        completed("a", at(2025, 1, 20, 0, 0), at(2025, 1, 10, 2, 0)),
        completed("b", at(2025, 1, 20, 0, 0), at(2025, 1, 10, 20, 0)),
    ];
    let data = streak(&assignments, &now);
    assert_eq!(data.current, 2);
}

#[test]
fn quick_stats_count_the_snapshot() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments = vec![
        assignment("a", at(2025, 1, 9, 12, 0), AssignmentStatus::NotStarted),
        assignment("b", at(2025, 1, 11, 12, 0), AssignmentStatus::InProgress),
        assignment("c", at(2025, 1, 20, 12, 0), AssignmentStatus::NotStarted),
        completed("d", at(2025, 1, 9, 12, 0), at(2025, 1, 8, 12, 0)),
        event("e", at(2025, 1, 9, 12, 0)),
    ];
    let stats = quick_stats(&assignments, &now);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.due_soon, 1);
    assert_eq!(stats.in_progress, 1);
}

#[test]
fn distributions_skip_events() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments = vec![
        Assignment {
            priority: Priority::High,
            ..assignment("a", now, AssignmentStatus::NotStarted)
        },
        Assignment {
            priority: Priority::High,
            ..assignment("b", now, AssignmentStatus::InProgress)
        },
        Assignment {
            priority: Priority::Low,
            ..completed("c", now, now)
        },
        event("d", now),
    ];

    let status = status_distribution(&assignments);
    assert_eq!((status.not_started, status.in_progress, status.completed), (1, 1, 1));

    let priority = priority_distribution(&assignments);
    assert_eq!((priority.low, priority.medium, priority.high), (1, 0, 2));
}

#[test]
fn workload_covers_active_courses_with_assignments() {
    let now = at(2025, 1, 10, 12, 0);
    let courses = vec![
        course("c1", "ECE 306", true),
        course("c2", "CS 101", true),
        course("c3", "HIST 200", false),
        course("c4", "MATH 241", true),
    ];
    let assignments = vec![
        in_course(assignment("a", now, AssignmentStatus::NotStarted), "c1"),
        in_course(completed("b", now, now), "c1"),
        in_course(assignment("c", now, AssignmentStatus::InProgress), "c2"),
        in_course(assignment("d", now, AssignmentStatus::NotStarted), "c3"),
        in_course(assignment("e", now, AssignmentStatus::NotStarted), "missing"),
        assignment("f", now, AssignmentStatus::NotStarted),
    ];

    let workload = course_workload(&assignments, &courses);
    assert_eq!(workload.len(), 2);

    assert_eq!(workload[0].course_code, "ECE 306");
    assert_eq!((workload[0].total, workload[0].completed, workload[0].pending), (2, 1, 1));
    assert_eq!(workload[0].course_color, "#3b82f6");

    assert_eq!(workload[1].course_code, "CS 101");
    assert_eq!((workload[1].total, workload[1].completed, workload[1].pending), (1, 0, 1));
}

#[test]
fn weekly_trends_bucket_by_monday() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments = vec![
        assignment("a", at(2025, 1, 13, 9, 0), AssignmentStatus::NotStarted),
        assignment("b", at(2025, 1, 6, 9, 0), AssignmentStatus::NotStarted),
        completed("c", at(2025, 1, 12, 9, 0), at(2025, 1, 11, 9, 0)),
        assignment("d", at(2024, 12, 31, 9, 0), AssignmentStatus::NotStarted),
        event("e", at(2025, 1, 7, 9, 0)),
    ];

    let trends = deadline_trends(&assignments, TrendPeriod::Week, &now);
    let keys: Vec<&str> = trends.iter().map(|t| t.date.as_str()).collect();
    assert_eq!(keys, vec!["2024-12-30", "2025-01-06", "2025-01-13"]);

    assert_eq!(trends[1].label, "Jan 6");
    assert_eq!(trends[1].due, 2);
    assert_eq!(trends[1].completed, 1);
    assert_eq!(trends[2].due, 1);
}

#[test]
fn monthly_trends_are_chronological() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments = vec![
        assignment("a", at(2025, 2, 3, 9, 0), AssignmentStatus::NotStarted),
        assignment("b", at(2025, 1, 30, 9, 0), AssignmentStatus::NotStarted),
        assignment("c", at(2024, 12, 1, 9, 0), AssignmentStatus::NotStarted),
        assignment("d", at(2025, 1, 2, 9, 0), AssignmentStatus::NotStarted),
    ];

    let trends = deadline_trends(&assignments, TrendPeriod::Month, &now);
    let labels: Vec<&str> = trends.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Dec 2024", "Jan 2025", "Feb 2025"]);
    assert_eq!(trends[1].date, "2025-01-01");
    assert_eq!(trends[1].due, 2);
}

#[test]
fn insights_cover_every_heuristic_in_order() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments = vec![
        assignment("overdue", at(2025, 1, 8, 12, 0), AssignmentStatus::NotStarted),
        completed("late-1", at(2025, 1, 5, 12, 0), at(2025, 1, 8, 10, 0)),
        completed("late-2", at(2025, 1, 6, 12, 0), at(2025, 1, 9, 10, 0)),
        completed("early", at(2025, 1, 20, 12, 0), at(2025, 1, 10, 9, 0)),
    ];

    let insights = productivity_insights(&assignments, &now, &InsightThresholds::default());
    let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Overdue", "This Week", "Completion Rate", "Streak", "Avg Completion", "Late Work"]
    );

    assert_eq!(insights[0].kind, InsightKind::Warning);
    assert_eq!(insights[0].message, "1 assignment past deadline");
    assert_eq!(insights[1].kind, InsightKind::Neutral);
    assert_eq!(insights[2].kind, InsightKind::Positive);
    assert_eq!(insights[2].value.as_deref(), Some("75%"));
    assert_eq!(insights[3].value.as_deref(), Some("3"));
    assert_eq!(insights[4].value.as_deref(), Some("13d"));
    assert_eq!(insights[5].kind, InsightKind::Warning);
}

#[test]
fn busy_week_and_low_completion_are_warnings() {
    let now = at(2025, 1, 10, 12, 0);
    let assignments: Vec<Assignment> = (0..6)
        .map(|i| assignment(&format!("a{}", i), at(2025, 1, 12, 12, 0), AssignmentStatus::NotStarted))
        .collect();

    let insights = productivity_insights(&assignments, &now, &InsightThresholds::default());
    let this_week = insights.iter().find(|i| i.title == "This Week").unwrap();
    assert_eq!(this_week.kind, InsightKind::Warning);
    assert_eq!(this_week.message, "6 assignments due");

    let rate = insights.iter().find(|i| i.title == "Completion Rate").unwrap();
    assert_eq!(rate.kind, InsightKind::Warning);

    let relaxed = InsightThresholds {
        busy_week_threshold: 10,
        ..InsightThresholds::default()
    };
    let insights = productivity_insights(&assignments, &now, &relaxed);
    let this_week = insights.iter().find(|i| i.title == "This Week").unwrap();
    assert_eq!(this_week.kind, InsightKind::Neutral);
}

#[test]
fn statistics_are_repeatable() {
    let now = at(2025, 1, 10, 12, 0);
    let courses = vec![course("c1", "ECE 306", true)];
    let assignments = vec![
        in_course(assignment("a", at(2025, 1, 9, 12, 0), AssignmentStatus::NotStarted), "c1"),
        in_course(completed("b", at(2025, 1, 12, 12, 0), at(2025, 1, 10, 8, 0)), "c1"),
    ];
    let thresholds = InsightThresholds::default();

    let first = compute_statistics(&assignments, &courses, &now, TrendPeriod::Month, &thresholds);
    let second = compute_statistics(&assignments, &courses, &now, TrendPeriod::Month, &thresholds);
    assert_eq!(first, second);
    assert_eq!(first.period, TrendPeriod::Month);
    assert_eq!(first.generated_at, now);
}
