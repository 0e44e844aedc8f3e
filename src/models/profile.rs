// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::badge::GrantedBadge;

/// Represents the 'personal_profile' table.
///
/// The counters are denormalized: they are bumped inside the same transaction
/// that flips an assignment to delivered, rather than derived by aggregation
/// on read. Both are monotonic non-decreasing.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PersonalProfile {
    pub student_email: String,
    pub total_points: i64,
    pub tasks_completed: i64,
}

/// Aggregated profile view for the current student: counters plus the
/// badges earned so far.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub student_email: String,
    pub total_points: i64,
    pub tasks_completed: i64,
    pub badges: Vec<GrantedBadge>,
}
