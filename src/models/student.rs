// src/models/student.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'student' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Student {
    /// Institutional email, the global identifying key.
    pub email: String,

    pub name: String,
    pub surname: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    /// Code of the class the student is enrolled in, if any.
    pub class_code: Option<String>,
}

/// DTO for registering a new student.
///
/// Registration also creates the student's personal profile; enrollment is
/// optional and happens only here (a student who joins a class later does not
/// receive assignments for tasks created before joining).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterStudentRequest {
    #[validate(email(message = "A valid institutional email is required."))]
    pub email: String,
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub surname: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    pub class_code: Option<String>,
}
