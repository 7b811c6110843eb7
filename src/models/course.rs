use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::models::nullable;

pub const COURSE_CODE_MAX: usize = 20;
pub const COURSE_NAME_MAX: usize = 100;
pub const DEFAULT_COURSE_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    pub color: String,
    pub instructor: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub code: String,
    pub name: String,
    pub color: Option<String>,
    pub instructor: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub color: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub instructor: Option<Option<String>>,
    pub active: Option<bool>,
}

impl NewCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_code(&self.code)?;
        validate_name(&self.name)?;
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(code) = &self.code {
            validate_code(code)?;
        }
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(color) = &self.color {
            validate_color(color)?;
        }
        Ok(())
    }
}

fn validate_code(code: &str) -> Result<(), AppError> {
    let len = code.trim().chars().count();
    if len == 0 || len > COURSE_CODE_MAX {
        return Err(AppError::BadRequest(format!(
            "course code must be 1-{} characters",
            COURSE_CODE_MAX
        )));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), AppError> {
    let len = name.trim().chars().count();
    if len == 0 || len > COURSE_NAME_MAX {
        return Err(AppError::BadRequest(format!(
            "course name must be 1-{} characters",
            COURSE_NAME_MAX
        )));
    }
    Ok(())
}

/// Accepts `#rrggbb` hex colors only.
fn validate_color(color: &str) -> Result<(), AppError> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::BadRequest(format!("invalid course color: {}", color)));
    }
    Ok(())
}
