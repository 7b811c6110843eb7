use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::nullable;

pub const ASSIGNMENT_TITLE_MAX: usize = 100;
pub const ASSIGNMENT_DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AssignmentStatus {
    NotStarted,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight, higher is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// Calendar imports are stored as `Event` and never count toward statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AssignmentCategory {
    #[default]
    Assignment,
    Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub course_id: Option<String>,
    pub deadline: DateTime<Utc>,
    pub status: AssignmentStatus,
    pub priority: Priority,
    pub category: AssignmentCategory,
    pub estimated_hours: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn is_completed(&self) -> bool {
        self.status == AssignmentStatus::Completed
    }

    pub fn is_event(&self) -> bool {
        self.category == AssignmentCategory::Event
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub course_id: Option<String>,
    pub deadline: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: AssignmentCategory,
    pub estimated_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    /// `Some(None)` clears the stored value.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub course_id: Option<Option<String>>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<AssignmentStatus>,
    pub priority: Option<Priority>,
    pub category: Option<AssignmentCategory>,
    #[serde(default, deserialize_with = "nullable")]
    pub estimated_hours: Option<Option<f64>>,
}

impl NewAssignmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        if let Some(hours) = self.estimated_hours {
            validate_hours(hours)?;
        }
        Ok(())
    }
}

impl UpdateAssignmentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(Some(description)) = &self.description {
            validate_description(description)?;
        }
        if let Some(Some(hours)) = self.estimated_hours {
            validate_hours(hours)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), AppError> {
    let len = title.trim().chars().count();
    if len == 0 || len > ASSIGNMENT_TITLE_MAX {
        return Err(AppError::BadRequest(format!(
            "title must be 1-{} characters",
            ASSIGNMENT_TITLE_MAX
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), AppError> {
    if description.chars().count() > ASSIGNMENT_DESCRIPTION_MAX {
        return Err(AppError::BadRequest(format!(
            "description must be at most {} characters",
            ASSIGNMENT_DESCRIPTION_MAX
        )));
    }
    Ok(())
}

fn validate_hours(hours: f64) -> Result<(), AppError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(AppError::BadRequest("estimated_hours must be a non-negative number".to_string()));
    }
    Ok(())
}
