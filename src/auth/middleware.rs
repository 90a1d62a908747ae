//! Bearer-token guard layered in front of every protected route.

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

/// Verified subject of the presented token, inserted into request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(pub String);

/// Rejects the request with 401 before any handler logic runs unless the
/// `Authorization` header carries a valid, unexpired token.
///
/// Missing, malformed, forged and expired tokens all yield the same
/// `Invalid token` response; only the debug log tells them apart.
pub async fn require_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = state.tokens.verify(header).map_err(|e| {
        tracing::debug!(reason = %e, path = %req.uri().path(), "token rejected");
        AppError::Unauthorized("Invalid token".into())
    })?;

    req.extensions_mut().insert(Identity(identity));
    Ok(next.run(req).await)
}
