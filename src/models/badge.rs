// src/models/badge.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'badge' table: the fixed badge catalog.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Badge {
    pub name: String,
    pub description: String,
}

/// A badge granted to a student, joined from 'badge_grant' and 'badge'.
/// The (student, badge) pair is unique: a badge can never be granted twice.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GrantedBadge {
    pub badge_name: String,
    pub description: String,
    pub date_granted: chrono::NaiveDate,
}
