// src/handlers/tasks.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    core::{catalog, directory},
    error::AppError,
    models::task::CreateTaskRequest,
    utils::jwt::Claims,
};

/// Creates a task for one of the current teacher's classes and fans it out
/// to every enrolled student.
///
/// Returns 201 Created with the task, 409 on a duplicate title, 404 when the
/// class does not exist or belongs to another teacher.
pub async fn create_task(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    directory::class_owned_by(&pool, &payload.class_code, &claims.sub).await?;

    let task = catalog::create_task(&pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(task)))
}
