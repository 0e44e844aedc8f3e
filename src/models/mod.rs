pub mod assignment;
pub mod badge;
pub mod class;
pub mod profile;
pub mod student;
pub mod task;
pub mod teacher;
