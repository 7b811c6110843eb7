use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    Assignment, AssignmentStatus, Course, NewAssignmentRequest, NewCourseRequest,
    UpdateAssignmentRequest, UpdateCourseRequest,
};
use crate::models::course::DEFAULT_COURSE_COLOR;

const COURSE_COLUMNS: &str = "id, code, name, color, instructor, active, created_at";
const ASSIGNMENT_COLUMNS: &str = "id, title, description, course_id, deadline, status, priority, \
     category, estimated_hours, created_at, updated_at, completed_at";

pub async fn fetch_courses(db: &SqlitePool, include_inactive: bool) -> Result<Vec<Course>, sqlx::Error> {
    let sql = if include_inactive {
        format!("SELECT {} FROM courses ORDER BY code ASC", COURSE_COLUMNS)
    } else {
        format!("SELECT {} FROM courses WHERE active = 1 ORDER BY code ASC", COURSE_COLUMNS)
    };
    sqlx::query_as::<_, Course>(&sql).fetch_all(db).await
}

pub async fn find_course_by_id(db: &SqlitePool, id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert_course(db: &SqlitePool, req: NewCourseRequest) -> Result<Course, sqlx::Error> {
    let course = Course {
        id: Uuid::new_v4().to_string(),
        code: req.code.trim().to_string(),
        name: req.name.trim().to_string(),
        color: req.color.unwrap_or_else(|| DEFAULT_COURSE_COLOR.to_string()),
        instructor: req.instructor,
        active: req.active.unwrap_or(true),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO courses (id, code, name, color, instructor, active, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&course.id)
    .bind(&course.code)
    .bind(&course.name)
    .bind(&course.color)
    .bind(&course.instructor)
    .bind(course.active)
    .bind(course.created_at)
    .execute(db)
    .await?;

    Ok(course)
}

pub async fn update_course(
    db: &SqlitePool,
    id: &str,
    req: UpdateCourseRequest,
) -> Result<Option<Course>, sqlx::Error> {
    let mut current = match find_course_by_id(db, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(code) = req.code {
        current.code = code.trim().to_string();
    }
    if let Some(name) = req.name {
        current.name = name.trim().to_string();
    }
    if let Some(color) = req.color {
        current.color = color;
    }
    if let Some(instructor) = req.instructor {
        current.instructor = instructor;
    }
    if let Some(active) = req.active {
        current.active = active;
    }

    sqlx::query(
        r#"
        UPDATE courses
        SET code = ?1,
            name = ?2,
            color = ?3,
            instructor = ?4,
            active = ?5
        WHERE id = ?6
        "#,
    )
    .bind(&current.code)
    .bind(&current.name)
    .bind(&current.color)
    .bind(&current.instructor)
    .bind(current.active)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn fetch_assignments(db: &SqlitePool) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {} FROM assignments ORDER BY deadline ASC",
        ASSIGNMENT_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_assignment_by_id(db: &SqlitePool, id: &str) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {} FROM assignments WHERE id = ?",
        ASSIGNMENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_assignment(
    db: &SqlitePool,
    req: NewAssignmentRequest,
) -> Result<Assignment, sqlx::Error> {
    let now = Utc::now();
    let assignment = Assignment {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        description: req.description,
        course_id: req.course_id,
        deadline: req.deadline,
        status: AssignmentStatus::NotStarted,
        priority: req.priority,
        category: req.category,
        estimated_hours: req.estimated_hours,
        created_at: now,
        updated_at: now,
        completed_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO assignments
            (id, title, description, course_id, deadline, status, priority,
            category, estimated_hours, created_at, updated_at, completed_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL)
        "#,
    )
    .bind(&assignment.id)
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(&assignment.course_id)
    .bind(assignment.deadline)
    .bind(assignment.status)
    .bind(assignment.priority)
    .bind(assignment.category)
    .bind(assignment.estimated_hours)
    .bind(assignment.created_at)
    .bind(assignment.updated_at)
    .execute(db)
    .await?;

    Ok(assignment)
}

/// Applies a partial update. Nullable fields sent as `Some(None)` are
/// cleared. `completed_at` is stamped when the status moves
/// into `completed` and cleared when it moves out.
pub async fn update_assignment(
    db: &SqlitePool,
    id: &str,
    req: UpdateAssignmentRequest,
) -> Result<Option<Assignment>, sqlx::Error> {
    let mut current = match find_assignment_by_id(db, id).await? {
        Some(a) => a,
        None => return Ok(None),
    };
    let now = Utc::now();

    if let Some(title) = req.title {
        current.title = title.trim().to_string();
    }
    if let Some(description) = req.description {
        current.description = description;
    }
    if let Some(course_id) = req.course_id {
        current.course_id = course_id;
    }
    if let Some(deadline) = req.deadline {
        current.deadline = deadline;
    }
    if let Some(priority) = req.priority {
        current.priority = priority;
    }
    if let Some(category) = req.category {
        current.category = category;
    }
    if let Some(hours) = req.estimated_hours {
        current.estimated_hours = hours;
    }
    if let Some(status) = req.status {
        if status == AssignmentStatus::Completed {
            if current.status != AssignmentStatus::Completed {
                current.completed_at = Some(now);
            }
        } else {
            current.completed_at = None;
        }
        current.status = status;
    }
    current.updated_at = now;

    sqlx::query(
        r#"
        UPDATE assignments
        SET title = ?1,
            description = ?2,
            course_id = ?3,
            deadline = ?4,
            status = ?5,
            priority = ?6,
            category = ?7,
            estimated_hours = ?8,
            updated_at = ?9,
            completed_at = ?10
        WHERE id = ?11
        "#,
    )
    .bind(&current.title)
    .bind(&current.description)
    .bind(&current.course_id)
    .bind(current.deadline)
    .bind(current.status)
    .bind(current.priority)
    .bind(current.category)
    .bind(current.estimated_hours)
    .bind(current.updated_at)
    .bind(current.completed_at)
    .bind(id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn set_assignment_completed(
    db: &SqlitePool,
    id: &str,
    completed: bool,
) -> Result<Option<Assignment>, sqlx::Error> {
    let status = if completed {
        AssignmentStatus::Completed
    } else {
        AssignmentStatus::NotStarted
    };
    update_assignment(
        db,
        id,
        UpdateAssignmentRequest {
            status: Some(status),
            ..Default::default()
        },
    )
    .await
}

pub async fn delete_assignment(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = ?1")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_completed_assignments(db: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE status = ?1")
        .bind(AssignmentStatus::Completed)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result)
}
