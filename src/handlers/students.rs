//! Student CRUD handlers: create, list, search, read, update, delete.
//! Each validates its input before touching the store and renders through `respond`.

use crate::error::AppError;
use crate::extractors::{FirstQuery, Format};
use crate::model::StudentFilter;
use crate::response::{message_body, respond, Outcome};
use crate::state::AppState;
use crate::validation::RequestValidator;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde_json::{json, Value};

/// Path ids that are not integers match no student, as an integer route would not match.
fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::student_not_found())
}

pub async fn create_student(
    State(state): State<AppState>,
    Format(format): Format,
    body: Option<Json<Value>>,
) -> Response {
    respond(format, create(&state, body.map(|Json(v)| v)).await)
}

async fn create(state: &AppState, body: Option<Value>) -> Outcome {
    let body = RequestValidator::object(body)?;
    let student = RequestValidator::new_student(&body)?;
    let id = state.store.insert(&student).await?;
    tracing::info!(id, "student created");
    Ok((
        StatusCode::CREATED,
        json!({ "message": "Student created successfully", "id": id }),
    ))
}

pub async fn list_students(State(state): State<AppState>, Format(format): Format) -> Response {
    respond(format, list(&state).await)
}

async fn list(state: &AppState) -> Outcome {
    let students = state.store.list_all().await?;
    Ok((StatusCode::OK, json!({ "students": students })))
}

pub async fn search_students(
    State(state): State<AppState>,
    Format(format): Format,
    params: FirstQuery,
) -> Response {
    respond(format, search(&state, params).await)
}

async fn search(state: &AppState, mut params: FirstQuery) -> Outcome {
    let filter = StudentFilter::new(
        params.take("first_name"),
        params.take("last_name"),
        params.take("gender"),
    );
    let students = state.store.search(&filter).await?;
    let count = students.len() as u64;
    Ok((StatusCode::OK, json!({ "students": students, "count": count })))
}

pub async fn get_student(
    State(state): State<AppState>,
    Format(format): Format,
    Path(id_str): Path<String>,
) -> Response {
    respond(format, read(&state, &id_str).await)
}

async fn read(state: &AppState, id_str: &str) -> Outcome {
    let id = parse_id(id_str)?;
    let student = state
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(AppError::student_not_found)?;
    Ok((StatusCode::OK, serde_json::to_value(student)?))
}

pub async fn update_student(
    State(state): State<AppState>,
    Format(format): Format,
    Path(id_str): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    respond(format, update(&state, &id_str, body.map(|Json(v)| v)).await)
}

async fn update(state: &AppState, id_str: &str, body: Option<Value>) -> Outcome {
    let id = parse_id(id_str)?;
    let body = RequestValidator::object(body)?;
    let patch = RequestValidator::patch(&body)?;
    state
        .store
        .update(id, &patch)
        .await?
        .ok_or_else(AppError::student_not_found)?;
    tracing::info!(id, "student updated");
    Ok((StatusCode::OK, message_body("Student updated successfully")))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Format(format): Format,
    Path(id_str): Path<String>,
) -> Response {
    respond(format, delete(&state, &id_str).await)
}

async fn delete(state: &AppState, id_str: &str) -> Outcome {
    let id = parse_id(id_str)?;
    if !state.store.delete(id).await? {
        return Err(AppError::student_not_found());
    }
    tracing::info!(id, "student deleted");
    Ok((StatusCode::OK, message_body("Student deleted successfully")))
}
