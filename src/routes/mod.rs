//! Router assembly.

mod api;
mod common;

pub use api::api_routes;
pub use common::common_routes;

use crate::config::HttpConfig;
use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Full application: common routes at the root, the student API under `/api`.
pub fn app_router(state: AppState, http: &HttpConfig) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", api_routes(state))
        .layer(RequestBodyLimitLayer::new(http.body_limit))
        .layer(TraceLayer::new_for_http())
}
