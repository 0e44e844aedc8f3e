// src/models/task.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'task' table in the database.
///
/// A task is immutable once created: there is no edit or delete operation.
/// The title is the identifying key and is unique across ALL classes, not
/// per class.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub description: String,
    pub due_date: chrono::NaiveDate,
    pub max_points: i64,
    pub class_code: String,
}

/// DTO for creating a new task.
///
/// The due date is validated upstream by the caller (it must lie in the
/// future); only the structural constraints are re-checked here.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 100, message = "Title must be 1-100 characters."))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: String,
    pub due_date: chrono::NaiveDate,
    #[validate(range(min = 0, max = 500, message = "max_points must be between 0 and 500."))]
    pub max_points: i64,
    #[validate(length(min = 1, max = 50))]
    pub class_code: String,
}
