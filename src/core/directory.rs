// src/core/directory.rs

use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{class::Class, student::Student},
};

// Every lookup here goes straight to the database. The directory is the
// fan-out target resolver, so a stale in-process roster would silently
// shrink or inflate the set of created assignments; per-request fetching
// keeps it correct under multiple concurrent sessions.

/// Students currently enrolled in the class.
pub async fn students_of(pool: &SqlitePool, class_code: &str) -> Result<Vec<Student>, AppError> {
    let students = sqlx::query_as::<_, Student>(
        "SELECT email, name, surname, password, class_code FROM student WHERE class_code = ?",
    )
    .bind(class_code)
    .fetch_all(pool)
    .await?;

    Ok(students)
}

/// Classes owned by the teacher.
pub async fn classes_of(pool: &SqlitePool, teacher_email: &str) -> Result<Vec<Class>, AppError> {
    let classes = sqlx::query_as::<_, Class>(
        "SELECT code, name, teacher_email FROM class_virtual WHERE teacher_email = ?",
    )
    .bind(teacher_email)
    .fetch_all(pool)
    .await?;

    Ok(classes)
}

/// Looks up a class by its unique code.
pub async fn class_by_code(pool: &SqlitePool, code: &str) -> Result<Class, AppError> {
    let class = sqlx::query_as::<_, Class>(
        "SELECT code, name, teacher_email FROM class_virtual WHERE code = ?",
    )
    .bind(code)
    .fetch_optional(pool)
    .await?;

    class.ok_or_else(|| AppError::NotFound(format!("Class '{}' not found", code)))
}

/// Looks up a class and checks it belongs to the given teacher.
/// A class owned by someone else is reported as absent, not as forbidden.
pub async fn class_owned_by(
    pool: &SqlitePool,
    code: &str,
    teacher_email: &str,
) -> Result<Class, AppError> {
    let class = class_by_code(pool, code).await?;
    if class.teacher_email != teacher_email {
        return Err(AppError::NotFound(format!("Class '{}' not found", code)));
    }
    Ok(class)
}
