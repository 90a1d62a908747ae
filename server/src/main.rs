//! Student registry HTTP server.
//!
//! Reads settings from the environment (and `.env`), connects to PostgreSQL,
//! and serves the API. Expects the `students` table from `schema.sql`.

use std::sync::Arc;
use student_registry::{app_router, AppConfig, AppState, PgStudentStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("student_registry=info,tower_http=info")
            }),
        )
        .init();

    let config = AppConfig::from_env()?;
    let store = PgStudentStore::connect(&config.database).await?;
    let state = AppState::new(Arc::new(store), &config.auth);
    let app = app_router(state, &config.http);

    let listener = TcpListener::bind(&config.http.bind_addr).await?;
    tracing::info!("student registry listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
