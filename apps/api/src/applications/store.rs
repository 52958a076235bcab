use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::applications::candidates::CandidateRecord;
use crate::applications::status::{ApplicationStatus, ChangedBy, StatusDateField};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationHistoryEntry, NewApplication};

/// A history entry about to be appended. Id and `changed_at` are assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryDraft {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub changed_by: ChangedBy,
}

/// Everything one status transition writes.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub application_id: Uuid,
    pub entry: HistoryDraft,
    pub stamp: Option<(StatusDateField, DateTime<Utc>)>,
}

/// Persistence for applications and their append-only history.
///
/// Implementations must apply `create_with_history` and `record_status_change`
/// atomically: a reader never sees an application state without its history entry.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, AppError>;

    async fn find_by_pair(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError>;

    /// Newest `applied_at` first.
    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Application>, AppError>;

    /// Newest `applied_at` first.
    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, AppError>;

    /// Inserts a new `applied` application together with history entry zero.
    async fn create_with_history(
        &self,
        new: &NewApplication,
        applied_at: DateTime<Utc>,
        entry: &HistoryDraft,
    ) -> Result<(Application, ApplicationHistoryEntry), AppError>;

    /// Updates status and the stamped date column, then appends one history entry.
    /// Returns `None` when the application does not exist.
    async fn record_status_change(
        &self,
        change: &StatusChange,
    ) -> Result<Option<(Application, ApplicationHistoryEntry)>, AppError>;

    /// Oldest first.
    async fn history(&self, application_id: Uuid)
        -> Result<Vec<ApplicationHistoryEntry>, AppError>;

    async fn last_history_entry(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationHistoryEntry>, AppError>;

    async fn count_history(&self, application_id: Uuid) -> Result<u64, AppError>;

    /// Every application to any job of the company, with the applicant's portfolio counts.
    async fn company_candidates(&self, company_id: Uuid)
        -> Result<Vec<CandidateRecord>, AppError>;
}
