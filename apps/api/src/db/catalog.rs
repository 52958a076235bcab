use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::models::student::StudentRow;
use crate::recommendation::source::CatalogStore;

const JOB_COLUMNS: &str = r#"
    SELECT j.id, j.company_id, c.name AS company_name, j.title, j.requirements,
           j.is_active, j.deadline
    FROM jobs j
    LEFT JOIN companies c ON c.id = j.company_id
"#;

pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn find_student(&self, student_id: Uuid) -> Result<Option<StudentRow>, AppError> {
        Ok(sqlx::query_as::<_, StudentRow>(
            "SELECT id, first_name, last_name FROM students WHERE id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError> {
        Ok(sqlx::query_as::<_, StudentRow>(
            "SELECT id, first_name, last_name FROM students ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(
            sqlx::query_as::<_, JobRow>(&format!("{JOB_COLUMNS} WHERE j.id = $1"))
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_active_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(&format!(
            "{JOB_COLUMNS} WHERE j.is_active = TRUE ORDER BY j.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn student_skills(&self, student_id: Uuid) -> Result<Vec<String>, AppError> {
        Ok(sqlx::query_scalar::<_, String>(
            r#"
            SELECT s.name
            FROM student_skills ss
            JOIN skills s ON s.id = ss.skill_id
            WHERE ss.student_id = $1
            ORDER BY ss.created_at
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
