//! HTTP handlers for login and student CRUD.

pub mod auth;
pub mod students;
pub use auth::*;
pub use students::*;
