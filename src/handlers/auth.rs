//! Login: exchange the admin credential for a bearer token.

use crate::error::AppError;
use crate::extractors::Format;
use crate::response::{respond, Outcome};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{extract::State, http::StatusCode, response::Response, Json};
use serde_json::{json, Value};

pub async fn login(
    State(state): State<AppState>,
    Format(format): Format,
    body: Option<Json<Value>>,
) -> Response {
    respond(format, issue_token(&state, body.map(|Json(v)| v)))
}

fn issue_token(state: &AppState, body: Option<Value>) -> Outcome {
    let body = RequestValidator::object(body)?;
    let input = RequestValidator::login(&body)?;
    if !state.admin.authenticate(&input.username, &input.password) {
        tracing::warn!(username = %input.username, "login rejected");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }
    let token = state
        .tokens
        .issue(state.admin.username())
        .map_err(|e| AppError::Internal(e.to_string()))?;
    tracing::info!(username = %input.username, "token issued");
    Ok((StatusCode::OK, json!({ "token": token })))
}
