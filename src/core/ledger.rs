// src/core/ledger.rs

use sqlx::{SqliteConnection, SqlitePool};

use crate::{
    error::AppError,
    models::{student::Student, task::Task},
};

/// Inserts one PENDING assignment for every student currently enrolled in
/// the class, via a single INSERT..SELECT. Students who join the class later
/// are never backfilled.
///
/// Runs on the caller's transaction so that task creation and fan-out commit
/// or roll back together. Returns the number of rows created; zero enrolled
/// students is reported as a failure, same as a failed bulk insert.
pub async fn fan_out(
    conn: &mut SqliteConnection,
    task_title: &str,
    class_code: &str,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO assignment (student_email, task_title, delivered)
        SELECT s.email, ?, 0
        FROM student s
        WHERE s.class_code = ?
        "#,
    )
    .bind(task_title)
    .bind(class_code)
    .execute(conn)
    .await
    .map_err(|e| {
        tracing::error!("Fan-out insert failed for task '{}': {:?}", task_title, e);
        AppError::from(e)
    })?;

    let created = result.rows_affected();
    if created == 0 {
        return Err(AppError::PartialFailure(format!(
            "Task '{}' was not fanned out: no students enrolled in class '{}'",
            task_title, class_code
        )));
    }

    tracing::info!(
        "Fanned out task '{}' to {} students of class '{}'",
        task_title,
        created,
        class_code
    );
    Ok(created)
}

/// Tasks assigned to the student and not yet delivered.
pub async fn assigned_tasks_for(pool: &SqlitePool, email: &str) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT t.title, t.description, t.due_date, t.max_points, t.class_code
        FROM task t
        JOIN assignment a ON a.task_title = t.title
        WHERE a.student_email = ? AND a.delivered = 0
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Tasks the student has already delivered.
pub async fn completed_tasks_for(pool: &SqlitePool, email: &str) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT t.title, t.description, t.due_date, t.max_points, t.class_code
        FROM task t
        JOIN assignment a ON a.task_title = t.title
        WHERE a.student_email = ? AND a.delivered = 1
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}

/// Distinct students of the class that have delivered at least one task.
pub async fn students_with_completion(
    pool: &SqlitePool,
    class_code: &str,
) -> Result<Vec<Student>, AppError> {
    let students = sqlx::query_as::<_, Student>(
        r#"
        SELECT DISTINCT s.email, s.name, s.surname, s.password, s.class_code
        FROM student s
        JOIN assignment a ON a.student_email = s.email
        WHERE a.delivered = 1 AND s.class_code = ?
        "#,
    )
    .bind(class_code)
    .fetch_all(pool)
    .await?;

    Ok(students)
}

/// Flips an assignment from PENDING to DELIVERED and bumps the student's
/// denormalized profile counters in the same transaction, so the counters
/// can never drift from the assignment rows.
///
/// The transition is one-way: delivering an already-delivered task is a
/// `Conflict`, a missing assignment is `NotFound`.
pub async fn mark_delivered(
    pool: &SqlitePool,
    email: &str,
    task_title: &str,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    let max_points: Option<(i64,)> =
        sqlx::query_as("SELECT max_points FROM task WHERE title = ?")
            .bind(task_title)
            .fetch_optional(&mut *tx)
            .await?;

    let (max_points,) = max_points
        .ok_or_else(|| AppError::NotFound(format!("Task '{}' does not exist", task_title)))?;

    let updated = sqlx::query(
        r#"
        UPDATE assignment
        SET delivered = 1
        WHERE student_email = ? AND task_title = ? AND delivered = 0
        "#,
    )
    .bind(email)
    .bind(task_title)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        let existing: Option<(bool,)> = sqlx::query_as(
            "SELECT delivered FROM assignment WHERE student_email = ? AND task_title = ?",
        )
        .bind(email)
        .bind(task_title)
        .fetch_optional(&mut *tx)
        .await?;

        return match existing {
            None => Err(AppError::NotFound(format!(
                "Task '{}' is not assigned to '{}'",
                task_title, email
            ))),
            Some(_) => Err(AppError::Conflict(format!(
                "Task '{}' was already delivered by '{}'",
                task_title, email
            ))),
        };
    }

    sqlx::query(
        r#"
        UPDATE personal_profile
        SET total_points = total_points + ?, tasks_completed = tasks_completed + 1
        WHERE student_email = ?
        "#,
    )
    .bind(max_points)
    .bind(email)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Student '{}' delivered task '{}'", email, task_title);
    Ok(())
}
