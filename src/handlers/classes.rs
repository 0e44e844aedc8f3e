// src/handlers/classes.rs
//
// Teacher-facing class queries. Every class-scoped route checks ownership
// through the directory first; a class owned by another teacher looks the
// same as a missing one.

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{
    core::{catalog, directory, ledger},
    error::AppError,
    utils::jwt::Claims,
};

/// Lists the classes owned by the current teacher.
pub async fn list_my_classes(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let classes = directory::classes_of(&pool, &claims.sub).await?;
    Ok(Json(classes))
}

/// Lists the tasks of one of the teacher's classes that are still pending
/// for at least one student.
pub async fn list_class_tasks(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    directory::class_owned_by(&pool, &code, &claims.sub).await?;

    let tasks = catalog::open_tasks_for_class(&pool, &code).await?;
    Ok(Json(tasks))
}

/// Lists the students of one of the teacher's classes that have delivered
/// at least one task.
pub async fn list_class_completions(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    directory::class_owned_by(&pool, &code, &claims.sub).await?;

    let students = ledger::students_with_completion(&pool, &code).await?;
    Ok(Json(students))
}
