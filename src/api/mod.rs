use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{delete, patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{Config, tz_offset};
use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::{
    AssignmentQuery, SortBy, SortOrder, StatisticsBundle, StatusIndicatorData, TrendPeriod,
    classify, compute_statistics,
};
use crate::state::AppState;

#[derive(Deserialize)]
struct CourseQueryParams {
    #[serde(default)]
    include_inactive: bool,
}

#[derive(Deserialize)]
struct ClockParams {
    tz_offset: Option<i32>,
    now: Option<String>,
}

#[derive(Deserialize)]
struct AssignmentListParams {
    status: Option<AssignmentStatus>,
    course_id: Option<String>,
    q: Option<String>,
    sort: Option<SortBy>,
    order: Option<SortOrder>,
    tz_offset: Option<i32>,
    now: Option<String>,
}

#[derive(Deserialize)]
struct StatisticsParams {
    #[serde(default)]
    period: TrendPeriod,
    tz_offset: Option<i32>,
    now: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssignmentWithStatus {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub status_indicator: StatusIndicatorData,
}

#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", patch(update_course))
        .route("/assignments", get(list_assignments).post(create_assignment))
        .route("/assignments/completed", delete(delete_completed))
        .route("/assignments/{id}", patch(update_assignment).delete(delete_assignment))
        .route("/assignments/{id}/complete", post(complete_assignment))
        .route("/assignments/{id}/uncomplete", post(uncomplete_assignment))
        .route("/assignments/{id}/status", get(assignment_status))
        .route("/statistics", get(statistics))
        .with_state(state)
}

/// Samples the clock once per request, in the caller's timezone.
fn resolve_now(
    config: &Config,
    now: Option<&str>,
    offset_minutes: Option<i32>,
) -> Result<DateTime<FixedOffset>, AppError> {
    let offset = match offset_minutes {
        Some(minutes) => tz_offset(minutes)?,
        None => config.default_offset(),
    };
    let instant = match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| AppError::BadRequest(format!("invalid now '{}': {}", raw, e)))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    Ok(instant.with_timezone(&offset))
}

async fn ensure_course_exists(state: &AppState, course_id: Option<&str>) -> Result<(), AppError> {
    if let Some(id) = course_id {
        if repository::find_course_by_id(&state.db, id).await?.is_none() {
            return Err(AppError::BadRequest(format!("unknown course: {}", id)));
        }
    }
    Ok(())
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = repository::fetch_courses(&state.db, params.include_inactive).await?;
    Ok(Json(courses))
}

async fn create_course(
    State(state): State<AppState>,
    Json(req): Json<NewCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    let course = repository::insert_course(&state.db, req).await?;
    info!("created course {} ({})", course.code, course.id);
    Ok(Json(course))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    req.validate()?;
    let course = repository::update_course(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(course))
}

async fn list_assignments(
    State(state): State<AppState>,
    Query(params): Query<AssignmentListParams>,
) -> Result<Json<Vec<AssignmentWithStatus>>, AppError> {
    let now = resolve_now(&state.config, params.now.as_deref(), params.tz_offset)?;
    let query = AssignmentQuery {
        status: params.status,
        course_id: params.course_id,
        search: params.q,
        sort_by: params.sort.unwrap_or_default(),
        order: params.order.unwrap_or_default(),
    };

    let assignments = query.apply(repository::fetch_assignments(&state.db).await?);
    let rows = assignments
        .into_iter()
        .map(|assignment| AssignmentWithStatus {
            status_indicator: classify(&assignment, &now),
            assignment,
        })
        .collect();
    Ok(Json(rows))
}

async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<NewAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    req.validate()?;
    ensure_course_exists(&state, req.course_id.as_deref()).await?;
    let assignment = repository::insert_assignment(&state.db, req).await?;
    info!("created assignment {} ({})", assignment.title, assignment.id);
    Ok(Json(assignment))
}

async fn update_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    req.validate()?;
    ensure_course_exists(&state, req.course_id.as_ref().and_then(|c| c.as_deref())).await?;
    let assignment = repository::update_assignment(&state.db, &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(assignment))
}

async fn complete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = repository::set_assignment_completed(&state.db, &id, true)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(assignment))
}

async fn uncomplete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = repository::set_assignment_completed(&state.db, &id, false)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(assignment))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_assignment(&state.db, &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn delete_completed(State(state): State<AppState>) -> Result<Json<DeletedCount>, AppError> {
    let deleted = repository::delete_completed_assignments(&state.db).await?;
    info!("deleted {} completed assignments", deleted);
    Ok(Json(DeletedCount { deleted }))
}

async fn assignment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ClockParams>,
) -> Result<Json<StatusIndicatorData>, AppError> {
    let now = resolve_now(&state.config, params.now.as_deref(), params.tz_offset)?;
    let assignment = repository::find_assignment_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(classify(&assignment, &now)))
}

async fn statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsParams>,
) -> Result<Json<StatisticsBundle>, AppError> {
    let now = resolve_now(&state.config, params.now.as_deref(), params.tz_offset)?;
    let assignments = repository::fetch_assignments(&state.db).await?;
    let courses = repository::fetch_courses(&state.db, true).await?;
    debug!(
        "computing statistics over {} assignments, {} courses",
        assignments.len(),
        courses.len()
    );

    let bundle = compute_statistics(
        &assignments,
        &courses,
        &now,
        params.period,
        &state.config.insight_thresholds,
    );
    Ok(Json(bundle))
}
