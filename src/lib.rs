//! Student registry: JWT-guarded CRUD over a PostgreSQL `students` table,
//! with JSON or XML responses selected by `?format=`.

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;
pub mod validation;

pub use auth::{AdminCredential, TokenService};
pub use config::{AppConfig, AuthConfig, DatabaseConfig, HttpConfig};
pub use error::{AppError, ConfigError};
pub use model::{Gender, NewStudent, Student, StudentFilter, StudentPatch};
pub use routes::{api_routes, app_router, common_routes};
pub use state::AppState;
pub use store::{PgStudentStore, StudentStore};
