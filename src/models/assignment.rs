// src/models/assignment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'assignment' table: the associative record between a
/// student and a task, created in bulk at task fan-out time.
///
/// `delivered` is the whole state machine: false is PENDING (initial),
/// true is DELIVERED (terminal). The transition is one-way.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Assignment {
    pub student_email: String,
    pub task_title: String,
    pub delivered: bool,
}

/// DTO for a student delivering a task.
#[derive(Debug, Deserialize, Validate)]
pub struct DeliverTaskRequest {
    #[validate(length(min = 1, max = 100))]
    pub task_title: String,
}
