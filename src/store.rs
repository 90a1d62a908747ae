//! Student persistence: the store trait and its PostgreSQL implementation.

use crate::config::DatabaseConfig;
use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentFilter, StudentPatch};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Sole authority on persisted students. Handlers hold no copies across requests.
#[async_trait]
pub trait StudentStore: Send + Sync {
    /// Insert and return the generated id.
    async fn insert(&self, student: &NewStudent) -> Result<i64, AppError>;

    async fn list_all(&self) -> Result<Vec<Student>, AppError>;

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, AppError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Student>, AppError>;

    /// Apply a non-empty patch. `None` means no such id and nothing was written.
    async fn update(&self, id: i64, patch: &StudentPatch) -> Result<Option<Student>, AppError>;

    /// `false` means no such id and nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Cheap liveness probe for readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        PgStudentStore { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;
        Ok(PgStudentStore { pool })
    }

    async fn fetch_students(&self, q: &QueryBuf) -> Result<Vec<Student>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Student>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    async fn fetch_student(&self, q: &QueryBuf) -> Result<Option<Student>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_as::<_, Student>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }

    async fn fetch_id(&self, q: &QueryBuf) -> Result<Option<i64>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    async fn insert(&self, student: &NewStudent) -> Result<i64, AppError> {
        let q = sql::insert(student);
        self.fetch_id(&q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn list_all(&self) -> Result<Vec<Student>, AppError> {
        self.fetch_students(&sql::select_all()).await
    }

    async fn search(&self, filter: &StudentFilter) -> Result<Vec<Student>, AppError> {
        self.fetch_students(&sql::search(filter)).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Student>, AppError> {
        self.fetch_student(&sql::select_by_id(id)).await
    }

    async fn update(&self, id: i64, patch: &StudentPatch) -> Result<Option<Student>, AppError> {
        let changes = patch.changes();
        if changes.is_empty() {
            return Err(AppError::MissingInput("No fields to update".into()));
        }
        // Single conditional statement: a missing id matches no row and writes nothing.
        self.fetch_student(&sql::update(id, &changes)).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.fetch_id(&sql::delete(id)).await?.is_some())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
