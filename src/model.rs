//! Student record and the typed inputs the store accepts.

use crate::sql::BindValue;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Error, Debug)]
#[error("Gender must be 'Male' or 'Female'")]
pub struct InvalidGender(pub String);

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the two stored spellings.
impl FromStr for Gender {
    type Err = InvalidGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            other => Err(InvalidGender(other.to_string())),
        }
    }
}

impl TryFrom<String> for Gender {
    type Error = InvalidGender;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    #[sqlx(try_from = "String")]
    pub gender: Gender,
}

/// Writable columns. Identifiers in generated SQL only ever come from here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudentColumn {
    FirstName,
    LastName,
    Gender,
}

impl StudentColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentColumn::FirstName => "first_name",
            StudentColumn::LastName => "last_name",
            StudentColumn::Gender => "gender",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

/// Partial update. Only `Some` fields are written.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
}

impl StudentPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.gender.is_none()
    }

    /// (column, value) pairs in column order.
    pub fn changes(&self) -> Vec<(StudentColumn, BindValue)> {
        let mut out = Vec::new();
        if let Some(v) = &self.first_name {
            out.push((StudentColumn::FirstName, BindValue::Text(v.clone())));
        }
        if let Some(v) = &self.last_name {
            out.push((StudentColumn::LastName, BindValue::Text(v.clone())));
        }
        if let Some(g) = self.gender {
            out.push((StudentColumn::Gender, BindValue::Text(g.as_str().to_string())));
        }
        out
    }
}

/// Search filters; all optional and combined with AND.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StudentFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
}

impl StudentFilter {
    /// Drops empty strings so they impose no constraint.
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        gender: Option<String>,
    ) -> Self {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty());
        StudentFilter {
            first_name: keep(first_name),
            last_name: keep(last_name),
            gender: keep(gender),
        }
    }
}
