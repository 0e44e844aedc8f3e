// src/models/class.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'class_virtual' table in the database.
/// The roster of enrolled students is not embedded here; it is resolved
/// per request through the directory queries.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Class {
    /// Unique class code (e.g. "3A-INF").
    pub code: String,

    pub name: String,

    /// Email of the owning teacher.
    pub teacher_email: String,
}
