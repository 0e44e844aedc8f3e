pub mod auth;
pub mod classes;
pub mod profile;
pub mod tasks;
