use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::applications::candidates::CandidateRecord;
use crate::applications::status::ApplicationStatus;
use crate::applications::store::{ApplicationStore, HistoryDraft, StatusChange};
use crate::errors::AppError;
use crate::models::application::{
    Application, ApplicationHistoryEntry, ApplicationRow, HistoryRow, NewApplication,
};

pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn append_history(
    tx: &mut Transaction<'_, Postgres>,
    application_id: Uuid,
    entry: &HistoryDraft,
) -> Result<ApplicationHistoryEntry, AppError> {
    let row = sqlx::query_as::<_, HistoryRow>(
        r#"
        INSERT INTO application_history (application_id, status, notes, changed_by)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(application_id)
    .bind(entry.status.as_str())
    .bind(&entry.notes)
    .bind(entry.changed_by.as_str())
    .fetch_one(&mut **tx)
    .await?;
    row.try_into()
}

fn into_applications(rows: Vec<ApplicationRow>) -> Result<Vec<Application>, AppError> {
    rows.into_iter().map(Application::try_from).collect()
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, ApplicationRow>("SELECT * FROM job_applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Application::try_from)
            .transpose()
    }

    async fn find_by_pair(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM job_applications WHERE student_id = $1 AND job_id = $2",
        )
        .bind(student_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?
        .map(Application::try_from)
        .transpose()
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM job_applications WHERE student_id = $1 ORDER BY applied_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;
        into_applications(rows)
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            "SELECT * FROM job_applications WHERE job_id = $1 ORDER BY applied_at DESC",
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        into_applications(rows)
    }

    async fn create_with_history(
        &self,
        new: &NewApplication,
        applied_at: DateTime<Utc>,
        entry: &HistoryDraft,
    ) -> Result<(Application, ApplicationHistoryEntry), AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            INSERT INTO job_applications
                (student_id, job_id, status, cover_letter, resume_url, applied_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.student_id)
        .bind(new.job_id)
        .bind(ApplicationStatus::Applied.as_str())
        .bind(&new.cover_letter)
        .bind(&new.resume_url)
        .bind(applied_at)
        .fetch_one(&mut *tx)
        .await?;
        let application = Application::try_from(row)?;

        let history = append_history(&mut tx, application.id, entry).await?;
        tx.commit().await?;
        Ok((application, history))
    }

    async fn record_status_change(
        &self,
        change: &StatusChange,
    ) -> Result<Option<(Application, ApplicationHistoryEntry)>, AppError> {
        let mut tx = self.pool.begin().await?;

        let status = change.entry.status.as_str();
        let row = match change.stamp {
            Some((field, at)) => {
                // column names come from a closed enum
                let sql = format!(
                    "UPDATE job_applications SET status = $1, {} = $2 WHERE id = $3 RETURNING *",
                    field.column()
                );
                sqlx::query_as::<_, ApplicationRow>(&sql)
                    .bind(status)
                    .bind(at)
                    .bind(change.application_id)
                    .fetch_optional(&mut *tx)
                    .await?
            }
            None => {
                sqlx::query_as::<_, ApplicationRow>(
                    "UPDATE job_applications SET status = $1 WHERE id = $2 RETURNING *",
                )
                .bind(status)
                .bind(change.application_id)
                .fetch_optional(&mut *tx)
                .await?
            }
        };

        let Some(row) = row else {
            tx.rollback().await?;
            return Ok(None);
        };
        let application = Application::try_from(row)?;

        let history = append_history(&mut tx, application.id, &change.entry).await?;
        tx.commit().await?;
        Ok(Some((application, history)))
    }

    async fn history(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationHistoryEntry>, AppError> {
        sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT * FROM application_history
            WHERE application_id = $1
            ORDER BY changed_at ASC, seq ASC
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(ApplicationHistoryEntry::try_from)
        .collect()
    }

    async fn last_history_entry(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationHistoryEntry>, AppError> {
        sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT * FROM application_history
            WHERE application_id = $1
            ORDER BY changed_at DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await?
        .map(ApplicationHistoryEntry::try_from)
        .transpose()
    }

    async fn count_history(&self, application_id: Uuid) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM application_history WHERE application_id = $1",
        )
        .bind(application_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.max(0) as u64)
    }

    async fn company_candidates(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CandidateRecord>, AppError> {
        Ok(sqlx::query_as::<_, CandidateRecord>(
            r#"
            SELECT a.id AS application_id,
                   j.id AS job_id,
                   j.title AS job_title,
                   j.requirements,
                   a.status,
                   a.applied_at,
                   s.id AS student_id,
                   s.first_name,
                   s.last_name,
                   COALESCE(
                       (SELECT array_agg(sk.name ORDER BY ss.created_at)
                        FROM student_skills ss
                        JOIN skills sk ON sk.id = ss.skill_id
                        WHERE ss.student_id = s.id),
                       '{}'
                   ) AS skills,
                   (SELECT COUNT(*) FROM projects p WHERE p.student_id = s.id) AS project_count,
                   (SELECT COUNT(*) FROM certifications ce WHERE ce.student_id = s.id)
                       AS certification_count
            FROM job_applications a
            JOIN jobs j ON j.id = a.job_id
            JOIN students s ON s.id = a.student_id
            WHERE j.company_id = $1
            ORDER BY a.applied_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }
}
