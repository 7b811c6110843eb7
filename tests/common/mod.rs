#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use overdue::db::MIGRATOR;
use overdue::models::{Assignment, AssignmentCategory, AssignmentStatus, Course, Priority};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn assignment(id: &str, deadline: DateTime<Utc>, status: AssignmentStatus) -> Assignment {
    Assignment {
        id: id.to_string(),
        title: format!("Assignment {}", id),
        description: None,
        course_id: None,
        deadline,
        status,
        priority: Priority::Medium,
        category: AssignmentCategory::Assignment,
        estimated_hours: None,
        created_at: deadline - chrono::Duration::days(14),
        updated_at: deadline - chrono::Duration::days(14),
        completed_at: None,
    }
}

pub fn completed(id: &str, deadline: DateTime<Utc>, completed_at: DateTime<Utc>) -> Assignment {
    Assignment {
        completed_at: Some(completed_at),
        ..assignment(id, deadline, AssignmentStatus::Completed)
    }
}

pub fn course(id: &str, code: &str, active: bool) -> Course {
    Course {
        id: id.to_string(),
        code: code.to_string(),
        name: format!("{} course", code),
        color: "#3b82f6".to_string(),
        instructor: None,
        active,
        created_at: at(2025, 1, 1, 0, 0),
    }
}
