use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::applications::status::{ApplicationStatus, ChangedBy, StatusDateField, UnknownLabel};
use crate::errors::AppError;

#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub status: String,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub interview_at: Option<DateTime<Utc>>,
    pub technical_test_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub company_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The application aggregate: current status plus per-status timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
    pub applied_at: Option<DateTime<Utc>>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub interview_at: Option<DateTime<Utc>>,
    pub technical_test_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub company_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Application {
    pub fn date(&self, field: StatusDateField) -> Option<DateTime<Utc>> {
        match field {
            StatusDateField::AppliedAt => self.applied_at,
            StatusDateField::ReviewedAt => self.reviewed_at,
            StatusDateField::InterviewAt => self.interview_at,
            StatusDateField::TechnicalTestAt => self.technical_test_at,
            StatusDateField::DecidedAt => self.decided_at,
        }
    }

    #[cfg(test)]
    pub fn stamp(&mut self, field: StatusDateField, at: DateTime<Utc>) {
        let slot = match field {
            StatusDateField::AppliedAt => &mut self.applied_at,
            StatusDateField::ReviewedAt => &mut self.reviewed_at,
            StatusDateField::InterviewAt => &mut self.interview_at,
            StatusDateField::TechnicalTestAt => &mut self.technical_test_at,
            StatusDateField::DecidedAt => &mut self.decided_at,
        };
        *slot = Some(at);
    }
}

impl TryFrom<ApplicationRow> for Application {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ApplicationStatus>()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("application {}: {e}", row.id)))?;

        Ok(Application {
            id: row.id,
            student_id: row.student_id,
            job_id: row.job_id,
            status,
            cover_letter: row.cover_letter,
            resume_url: row.resume_url,
            applied_at: row.applied_at,
            reviewed_at: row.reviewed_at,
            interview_at: row.interview_at,
            technical_test_at: row.technical_test_at,
            decided_at: row.decided_at,
            company_notes: row.company_notes,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
}

/// One immutable entry of an application's status audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationHistoryEntry {
    pub id: Uuid,
    pub application_id: Uuid,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub changed_by: ChangedBy,
    pub changed_at: DateTime<Utc>,
}

impl TryFrom<HistoryRow> for ApplicationHistoryEntry {
    type Error = AppError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        let invalid =
            |e: UnknownLabel| AppError::Internal(anyhow::anyhow!("history entry {}: {e}", row.id));
        Ok(ApplicationHistoryEntry {
            id: row.id,
            application_id: row.application_id,
            status: row.status.parse().map_err(invalid)?,
            changed_by: row.changed_by.parse().map_err(invalid)?,
            notes: row.notes,
            changed_at: row.changed_at,
        })
    }
}

/// Input for a new application; status is always forced to `applied`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewApplication {
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            status: status.to_string(),
            cover_letter: None,
            resume_url: None,
            applied_at: Some(Utc::now()),
            reviewed_at: None,
            interview_at: None,
            technical_test_at: None,
            decided_at: None,
            company_notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_with_known_status_converts() {
        let app = Application::try_from(row("technical_test")).unwrap();
        assert_eq!(app.status, ApplicationStatus::TechnicalTest);
    }

    #[test]
    fn test_row_with_unknown_status_is_internal_error() {
        let err = Application::try_from(row("limbo")).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_stamp_sets_only_the_given_field() {
        let mut app = Application::try_from(row("applied")).unwrap();
        let at = Utc::now();
        app.stamp(StatusDateField::DecidedAt, at);
        assert_eq!(app.date(StatusDateField::DecidedAt), Some(at));
        assert_eq!(app.reviewed_at, None);
        assert_eq!(app.interview_at, None);
        assert_eq!(app.technical_test_at, None);
    }
}
