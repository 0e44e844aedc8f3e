// src/handlers/profile.rs
//
// Student-facing endpoints: the personal profile view, the two sides of the
// assignment partition (pending / delivered), and the delivery capability.

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    core::ledger,
    error::AppError,
    models::{
        assignment::DeliverTaskRequest,
        badge::GrantedBadge,
        profile::{PersonalProfile, ProfileResponse},
    },
    utils::jwt::Claims,
};

/// Get the current student's profile: aggregate counters plus earned badges.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let profile = sqlx::query_as::<_, PersonalProfile>(
        "SELECT student_email, total_points, tasks_completed FROM personal_profile WHERE student_email = ?",
    )
    .bind(&claims.sub)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Personal profile not found".to_string()))?;

    let badges = sqlx::query_as::<_, GrantedBadge>(
        r#"
        SELECT g.badge_name, b.description, g.date_granted
        FROM badge_grant g
        JOIN badge b ON b.name = g.badge_name
        WHERE g.student_email = ?
        ORDER BY g.date_granted
        "#,
    )
    .bind(&claims.sub)
    .fetch_all(&pool)
    .await?;

    Ok(Json(ProfileResponse {
        student_email: profile.student_email,
        total_points: profile.total_points,
        tasks_completed: profile.tasks_completed,
        badges,
    }))
}

/// Tasks assigned to the current student and not yet delivered.
pub async fn list_assigned_tasks(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = ledger::assigned_tasks_for(&pool, &claims.sub).await?;
    Ok(Json(tasks))
}

/// Tasks the current student has already delivered.
pub async fn list_completed_tasks(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let tasks = ledger::completed_tasks_for(&pool, &claims.sub).await?;
    Ok(Json(tasks))
}

/// Marks one of the current student's assignments as delivered.
/// Delivering the same task twice is rejected with 409.
pub async fn deliver_task(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<DeliverTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    ledger::mark_delivered(&pool, &claims.sub, &payload.task_title).await?;

    Ok(Json(json!({
        "message": format!("Task '{}' delivered", payload.task_title),
    })))
}
