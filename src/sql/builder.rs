//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the students table.

use crate::model::{NewStudent, StudentColumn, StudentFilter};
use crate::sql::BindValue;

pub const STUDENTS_TABLE: &str = "students";

const ID: &str = "id";

/// Quote identifier for PostgreSQL (safe: only from `StudentColumn` and constants).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn table() -> String {
    quoted(STUDENTS_TABLE)
}

/// Column list returned by every row-producing statement, in `Student` field order.
fn select_column_list() -> String {
    [
        ID,
        StudentColumn::FirstName.as_str(),
        StudentColumn::LastName.as_str(),
        StudentColumn::Gender.as_str(),
    ]
    .iter()
    .map(|c| quoted(c))
    .collect::<Vec<_>>()
    .join(", ")
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// INSERT one student; returns the generated id.
pub fn insert(student: &NewStudent) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        (StudentColumn::FirstName, student.first_name.as_str()),
        (StudentColumn::LastName, student.last_name.as_str()),
        (StudentColumn::Gender, student.gender.as_str()),
    ];
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (col, val) in values {
        let n = q.push_param(BindValue::Text(val.to_string()));
        cols.push(quoted(col.as_str()));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table(),
        cols.join(", "),
        placeholders.join(", "),
        quoted(ID)
    );
    q
}

pub fn select_all() -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!(
        "SELECT {} FROM {} ORDER BY {}",
        select_column_list(),
        table(),
        quoted(ID)
    );
    q
}

pub fn select_by_id(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Int(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ${}",
        select_column_list(),
        table(),
        quoted(ID),
        n
    );
    q
}

/// SELECT with optional filters: substring match on names, exact match on gender.
/// Filters are ANDed; none at all selects every row.
pub fn search(filter: &StudentFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::new();
    let substr = [
        (StudentColumn::FirstName, filter.first_name.as_deref()),
        (StudentColumn::LastName, filter.last_name.as_deref()),
    ];
    for (col, needle) in substr {
        if let Some(needle) = needle {
            let n = q.push_param(BindValue::contains_pattern(needle));
            where_parts.push(format!("{} LIKE ${}", quoted(col.as_str()), n));
        }
    }
    if let Some(gender) = filter.gender.as_deref() {
        let n = q.push_param(BindValue::Text(gender.to_string()));
        where_parts.push(format!("{} = ${}", quoted(StudentColumn::Gender.as_str()), n));
    }
    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        select_column_list(),
        table(),
        where_clause,
        quoted(ID)
    );
    q
}

/// UPDATE by id: SET only the given columns. Caller guarantees `changes` is non-empty.
/// Zero rows returned means the id does not exist.
pub fn update(id: i64, changes: &[(StudentColumn, BindValue)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(changes.len());
    for (col, val) in changes {
        let n = q.push_param(val.clone());
        sets.push(format!("{} = ${}", quoted(col.as_str()), n));
    }
    let id_param = q.push_param(BindValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table(),
        sets.join(", "),
        quoted(ID),
        id_param,
        select_column_list()
    );
    q
}

/// DELETE by id. Zero rows returned means the id does not exist.
pub fn delete(id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = ${} RETURNING {}",
        table(),
        quoted(ID),
        n,
        quoted(ID)
    );
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Gender, StudentPatch};

    const COLS: &str = r#""id", "first_name", "last_name", "gender""#;

    #[test]
    fn insert_binds_every_field() {
        let q = insert(&NewStudent {
            first_name: "A".into(),
            last_name: "B".into(),
            gender: Gender::Male,
        });
        assert_eq!(
            q.sql,
            r#"INSERT INTO "students" ("first_name", "last_name", "gender") VALUES ($1, $2, $3) RETURNING "id""#
        );
        assert_eq!(
            q.params,
            vec![
                BindValue::Text("A".into()),
                BindValue::Text("B".into()),
                BindValue::Text("Male".into()),
            ]
        );
    }

    #[test]
    fn select_all_orders_by_id() {
        let q = select_all();
        assert_eq!(q.sql, format!(r#"SELECT {} FROM "students" ORDER BY "id""#, COLS));
        assert!(q.params.is_empty());
    }

    #[test]
    fn select_by_id_binds_integer() {
        let q = select_by_id(7);
        assert_eq!(q.sql, format!(r#"SELECT {} FROM "students" WHERE "id" = $1"#, COLS));
        assert_eq!(q.params, vec![BindValue::Int(7)]);
    }

    #[test]
    fn unconstrained_search_has_no_where() {
        let q = search(&StudentFilter::default());
        assert_eq!(q.sql, select_all().sql);
        assert!(q.params.is_empty());
    }

    #[test]
    fn search_ands_supplied_filters() {
        let filter = StudentFilter::new(Some("An".into()), None, Some("Female".into()));
        let q = search(&filter);
        assert_eq!(
            q.sql,
            format!(
                r#"SELECT {} FROM "students" WHERE "first_name" LIKE $1 AND "gender" = $2 ORDER BY "id""#,
                COLS
            )
        );
        assert_eq!(
            q.params,
            vec![BindValue::Text("%An%".into()), BindValue::Text("Female".into())]
        );
    }

    #[test]
    fn update_sets_only_supplied_columns() {
        let patch = StudentPatch {
            last_name: Some("C".into()),
            gender: Some(Gender::Female),
            ..Default::default()
        };
        let q = update(3, &patch.changes());
        assert_eq!(
            q.sql,
            format!(
                r#"UPDATE "students" SET "last_name" = $1, "gender" = $2 WHERE "id" = $3 RETURNING {}"#,
                COLS
            )
        );
        assert_eq!(
            q.params,
            vec![
                BindValue::Text("C".into()),
                BindValue::Text("Female".into()),
                BindValue::Int(3),
            ]
        );
    }

    #[test]
    fn values_never_reach_sql_text() {
        let filter = StudentFilter::new(Some("x'; DROP TABLE students; --".into()), None, None);
        let q = search(&filter);
        assert!(!q.sql.contains("DROP"));
    }

    #[test]
    fn delete_returns_id() {
        let q = delete(9);
        assert_eq!(q.sql, r#"DELETE FROM "students" WHERE "id" = $1 RETURNING "id""#);
        assert_eq!(q.params, vec![BindValue::Int(9)]);
    }
}
