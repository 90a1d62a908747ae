//! Request body validation. Runs before any store access.

use crate::error::AppError;
use crate::model::{Gender, NewStudent, StudentColumn, StudentPatch};
use serde_json::{Map, Value};

const CREATE_FIELDS: [StudentColumn; 3] = [
    StudentColumn::FirstName,
    StudentColumn::LastName,
    StudentColumn::Gender,
];

pub struct RequestValidator;

/// Login input after presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl RequestValidator {
    /// Accept only a JSON object body.
    pub fn object(body: Option<Value>) -> Result<Map<String, Value>, AppError> {
        match body {
            Some(Value::Object(m)) => Ok(m),
            _ => Err(AppError::MissingInput("Request body must be a JSON object".into())),
        }
    }

    pub fn login(body: &Map<String, Value>) -> Result<LoginInput, AppError> {
        let username = present_text(body, "username");
        let password = present_text(body, "password");
        match (username, password) {
            (Some(username), Some(password)) => Ok(LoginInput {
                username: username.to_string(),
                password: password.to_string(),
            }),
            _ => Err(AppError::MissingInput("Username and password are required".into())),
        }
    }

    /// All three fields required, non-empty, gender in the enumeration.
    pub fn new_student(body: &Map<String, Value>) -> Result<NewStudent, AppError> {
        let missing: Vec<&str> = CREATE_FIELDS
            .iter()
            .map(StudentColumn::as_str)
            .filter(|f| is_absent(body.get(*f)))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::MissingInput(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }
        Ok(NewStudent {
            first_name: text_field(body, StudentColumn::FirstName)?,
            last_name: text_field(body, StudentColumn::LastName)?,
            gender: gender(&text_field(body, StudentColumn::Gender)?)?,
        })
    }

    /// Only recognized keys are considered; each present one must be valid.
    pub fn patch(body: &Map<String, Value>) -> Result<StudentPatch, AppError> {
        let mut patch = StudentPatch::default();
        if body.contains_key(StudentColumn::FirstName.as_str()) {
            patch.first_name = Some(text_field(body, StudentColumn::FirstName)?);
        }
        if body.contains_key(StudentColumn::LastName.as_str()) {
            patch.last_name = Some(text_field(body, StudentColumn::LastName)?);
        }
        if body.contains_key(StudentColumn::Gender.as_str()) {
            patch.gender = Some(gender(&text_field(body, StudentColumn::Gender)?)?);
        }
        if patch.is_empty() {
            return Err(AppError::MissingInput("No fields to update".into()));
        }
        Ok(patch)
    }
}

fn is_absent(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn present_text<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn text_field(body: &Map<String, Value>, col: StudentColumn) -> Result<String, AppError> {
    let name = col.as_str();
    match body.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(AppError::InvalidValue(format!("{} must not be empty", name))),
        _ => Err(AppError::InvalidValue(format!("{} must be a string", name))),
    }
}

fn gender(s: &str) -> Result<Gender, AppError> {
    s.parse::<Gender>()
        .map_err(|e| AppError::InvalidValue(e.to_string()))
}
