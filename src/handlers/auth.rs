// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    core::achievements,
    error::AppError,
    models::{
        profile::PersonalProfile,
        student::{RegisterStudentRequest, Student},
        teacher::{LoginRequest, RegisterTeacherRequest, Teacher},
    },
    utils::{
        hash::{hash_password, verify_password},
        jwt::{ROLE_STUDENT, ROLE_TEACHER, sign_jwt},
    },
};

/// Registers a new student together with their personal profile.
///
/// The two inserts share one transaction: a student row without a profile
/// row would break every later profile load and badge evaluation.
/// Returns 201 Created and the student object (excluding password).
pub async fn register_student(
    State(pool): State<SqlitePool>,
    Json(payload): Json<RegisterStudentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO student (email, name, surname, password, class_code)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.email)
    .bind(&payload.name)
    .bind(&payload.surname)
    .bind(&hashed_password)
    .bind(&payload.class_code)
    .execute(&mut *tx)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => AppError::Conflict(format!(
            "A student with email '{}' already exists",
            payload.email
        )),
        other => other,
    })?;

    sqlx::query(
        "INSERT INTO personal_profile (student_email, total_points, tasks_completed) VALUES (?, 0, 0)",
    )
    .bind(&payload.email)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    let student = Student {
        email: payload.email,
        name: payload.name,
        surname: payload.surname,
        password: hashed_password,
        class_code: payload.class_code,
    };

    Ok((StatusCode::CREATED, Json(student)))
}

/// Registers a new teacher.
pub async fn register_teacher(
    State(pool): State<SqlitePool>,
    Json(payload): Json<RegisterTeacherRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    sqlx::query("INSERT INTO teacher (email, name, surname, password) VALUES (?, ?, ?, ?)")
        .bind(&payload.email)
        .bind(&payload.name)
        .bind(&payload.surname)
        .bind(&hashed_password)
        .execute(&pool)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(format!(
                "A teacher with email '{}' already exists",
                payload.email
            )),
            other => other,
        })?;

    let teacher = Teacher {
        email: payload.email,
        name: payload.name,
        surname: payload.surname,
        password: hashed_password,
    };

    Ok((StatusCode::CREATED, Json(teacher)))
}

/// Authenticates a student and returns a JWT token.
///
/// A successful login also reloads the personal profile and runs the badge
/// evaluation over it; the outcome travels back in the response so the
/// client can show newly earned badges. A partial grant failure is reported,
/// not treated as a login failure.
pub async fn login_student(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student = sqlx::query_as::<_, Student>(
        "SELECT email, name, surname, password, class_code FROM student WHERE email = ?",
    )
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let student = student.ok_or(AppError::AuthError("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &student.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let profile = sqlx::query_as::<_, PersonalProfile>(
        "SELECT student_email, total_points, tasks_completed FROM personal_profile WHERE student_email = ?",
    )
    .bind(&student.email)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Personal profile not found".to_string()))?;

    let badge_outcome = achievements::evaluate_and_grant(&pool, &profile).await;

    let token = sign_jwt(
        &student.email,
        ROLE_STUDENT,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "profile": profile,
        "badge_outcome": badge_outcome,
    })))
}

/// Authenticates a teacher and returns a JWT token.
pub async fn login_teacher(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let teacher = sqlx::query_as::<_, Teacher>(
        "SELECT email, name, surname, password FROM teacher WHERE email = ?",
    )
    .bind(&payload.email)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Login DB error: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    let teacher = teacher.ok_or(AppError::AuthError("User not found".to_string()))?;

    let is_valid = verify_password(&payload.password, &teacher.password)?;

    if !is_valid {
        return Err(AppError::AuthError("Invalid password".to_string()));
    }

    let token = sign_jwt(
        &teacher.email,
        ROLE_TEACHER,
        &config.jwt_secret,
        config.jwt_expiration,
    )?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
    })))
}
