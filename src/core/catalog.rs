// src/core/catalog.rs

use sqlx::SqlitePool;

use crate::{
    core::ledger,
    error::AppError,
    models::task::{CreateTaskRequest, Task},
};

/// Creates a task for a class and immediately fans it out to every enrolled
/// student, all inside one transaction: either the task row and all its
/// assignment rows exist afterwards, or none of them do.
///
/// A duplicate title surfaces as `Conflict` (titles are a global key); a
/// fan-out that matches no students rolls the task back and surfaces as
/// `PartialFailure`.
pub async fn create_task(pool: &SqlitePool, req: &CreateTaskRequest) -> Result<Task, AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO task (title, description, due_date, max_points, class_code)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(req.due_date)
    .bind(req.max_points)
    .bind(&req.class_code)
    .execute(&mut *tx)
    .await
    .map_err(|e| match AppError::from(e) {
        AppError::Conflict(_) => {
            AppError::Conflict(format!("A task titled '{}' already exists", req.title))
        }
        other => other,
    })?;

    ledger::fan_out(&mut *tx, &req.title, &req.class_code).await?;

    tx.commit().await?;

    Ok(Task {
        title: req.title.clone(),
        description: req.description.clone(),
        due_date: req.due_date,
        max_points: req.max_points,
        class_code: req.class_code.clone(),
    })
}

/// Tasks of the class that are still pending for at least one student.
pub async fn open_tasks_for_class(
    pool: &SqlitePool,
    class_code: &str,
) -> Result<Vec<Task>, AppError> {
    let tasks = sqlx::query_as::<_, Task>(
        r#"
        SELECT DISTINCT t.title, t.description, t.due_date, t.max_points, t.class_code
        FROM task t
        JOIN assignment a ON a.task_title = t.title
        WHERE a.delivered = 0 AND t.class_code = ?
        "#,
    )
    .bind(class_code)
    .fetch_all(pool)
    .await?;

    Ok(tasks)
}
