use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::{SkillRow, StudentSkillRow};
use crate::skills::profile::SkillLevel;
use crate::skills::store::SkillStore;

const ASSIGNMENT_COLUMNS: &str = r#"
    SELECT ss.id, ss.student_id, ss.skill_id, s.name AS skill_name,
           ss.level, ss.years_experience, ss.created_at
    FROM student_skills ss
    JOIN skills s ON s.id = ss.skill_id
"#;

pub struct PgSkillStore {
    pool: PgPool,
}

impl PgSkillStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn assignment(&self, assignment_id: Uuid) -> Result<Option<StudentSkillRow>, AppError> {
        Ok(
            sqlx::query_as::<_, StudentSkillRow>(&format!("{ASSIGNMENT_COLUMNS} WHERE ss.id = $1"))
                .bind(assignment_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }
}

#[async_trait]
impl SkillStore for PgSkillStore {
    async fn create_skill(&self, name: &str) -> Result<SkillRow, AppError> {
        Ok(sqlx::query_as::<_, SkillRow>(
            "INSERT INTO skills (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn find_skill(&self, skill_id: Uuid) -> Result<Option<SkillRow>, AppError> {
        Ok(
            sqlx::query_as::<_, SkillRow>("SELECT id, name, created_at FROM skills WHERE id = $1")
                .bind(skill_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<SkillRow>, AppError> {
        Ok(sqlx::query_as::<_, SkillRow>(
            "SELECT id, name, created_at FROM skills WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_skills(&self) -> Result<Vec<SkillRow>, AppError> {
        Ok(
            sqlx::query_as::<_, SkillRow>("SELECT id, name, created_at FROM skills ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn find_assignment(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
    ) -> Result<Option<StudentSkillRow>, AppError> {
        Ok(sqlx::query_as::<_, StudentSkillRow>(&format!(
            "{ASSIGNMENT_COLUMNS} WHERE ss.student_id = $1 AND ss.skill_id = $2"
        ))
        .bind(student_id)
        .bind(skill_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn insert_assignment(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        level: SkillLevel,
        years_experience: i32,
    ) -> Result<StudentSkillRow, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO student_skills (student_id, skill_id, level, years_experience)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(student_id)
        .bind(skill_id)
        .bind(level.as_str())
        .bind(years_experience)
        .fetch_one(&self.pool)
        .await?;

        self.assignment(id)
            .await?
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("student skill {id} vanished")))
    }

    async fn list_assignments(&self, student_id: Uuid) -> Result<Vec<StudentSkillRow>, AppError> {
        Ok(sqlx::query_as::<_, StudentSkillRow>(&format!(
            "{ASSIGNMENT_COLUMNS} WHERE ss.student_id = $1 ORDER BY ss.created_at DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_assignment(
        &self,
        assignment_id: Uuid,
        level: Option<SkillLevel>,
        years_experience: Option<i32>,
    ) -> Result<Option<StudentSkillRow>, AppError> {
        let updated = sqlx::query(
            r#"
            UPDATE student_skills
            SET level = COALESCE($2, level),
                years_experience = COALESCE($3, years_experience)
            WHERE id = $1
            "#,
        )
        .bind(assignment_id)
        .bind(level.map(|l| l.as_str()))
        .bind(years_experience)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.assignment(assignment_id).await
    }

    async fn delete_assignment(&self, assignment_id: Uuid) -> Result<bool, AppError> {
        let deleted = sqlx::query("DELETE FROM student_skills WHERE id = $1")
            .bind(assignment_id)
            .execute(&self.pool)
            .await?;
        Ok(deleted.rows_affected() > 0)
    }
}
