//! Application status tracker: creation, status transitions and the derived timeline.
//!
//! Every write goes through `ApplicationStore`, which pairs the status update with
//! its history entry in one transaction. No transition rules are enforced here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::applications::candidates::CandidateView;
use crate::applications::status::{ApplicationStatus, ChangedBy};
use crate::applications::store::{ApplicationStore, HistoryDraft, StatusChange};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationHistoryEntry, NewApplication};
use crate::recommendation::source::CatalogStore;

const MS_PER_DAY: f64 = 86_400_000.0;
const SUBMITTED_NOTE: &str = "Application submitted";

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("Application {0} not found")]
    ApplicationNotFound(Uuid),

    #[error("Student {0} not found")]
    StudentNotFound(Uuid),

    #[error("Job {0} not found or no longer active")]
    JobUnavailable(Uuid),

    #[error("Student has already applied to this job")]
    AlreadyApplied,

    #[error("The application deadline for this job has passed")]
    DeadlinePassed,

    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<ApplicationError> for AppError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Store(inner) => inner,
            ApplicationError::ApplicationNotFound(_)
            | ApplicationError::StudentNotFound(_)
            | ApplicationError::JobUnavailable(_) => AppError::NotFound(err.to_string()),
            ApplicationError::AlreadyApplied | ApplicationError::DeadlinePassed => {
                AppError::Conflict(err.to_string())
            }
        }
    }
}

/// Current status, full ordered history and elapsed days between first and last entry.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationTimeline {
    pub current_status: ApplicationStatus,
    pub timeline: Vec<ApplicationHistoryEntry>,
    pub total_days: i64,
}

pub struct ApplicationTracker {
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn ApplicationStore>,
}

impl ApplicationTracker {
    pub fn new(catalog: Arc<dyn CatalogStore>, store: Arc<dyn ApplicationStore>) -> Self {
        Self { catalog, store }
    }

    /// Submits a new application in status `applied` with history entry zero.
    ///
    /// Rejected before anything is written when the student or an active job is
    /// missing, when the pair already has an application, or after the deadline.
    pub async fn create_application(
        &self,
        new: NewApplication,
    ) -> Result<Application, ApplicationError> {
        self.catalog
            .find_student(new.student_id)
            .await?
            .ok_or(ApplicationError::StudentNotFound(new.student_id))?;

        let job = self
            .catalog
            .find_job(new.job_id)
            .await?
            .filter(|job| job.is_active)
            .ok_or(ApplicationError::JobUnavailable(new.job_id))?;

        if self
            .store
            .find_by_pair(new.student_id, new.job_id)
            .await?
            .is_some()
        {
            return Err(ApplicationError::AlreadyApplied);
        }

        let now = Utc::now();
        if !job.accepts_applications_at(now) {
            return Err(ApplicationError::DeadlinePassed);
        }

        let entry = HistoryDraft {
            status: ApplicationStatus::Applied,
            notes: Some(SUBMITTED_NOTE.to_string()),
            changed_by: ChangedBy::Student,
        };
        let (application, _) = self.store.create_with_history(&new, now, &entry).await?;

        info!(
            "Student {} applied to job {} (application {})",
            application.student_id, application.job_id, application.id
        );
        Ok(application)
    }

    pub async fn find_application(&self, id: Uuid) -> Result<Application, ApplicationError> {
        self.store
            .find_application(id)
            .await?
            .ok_or(ApplicationError::ApplicationNotFound(id))
    }

    /// Moves an application to `status`, stamping the mapped date column and
    /// appending one history entry. Any status may follow any other.
    pub async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        notes: Option<String>,
        changed_by: ChangedBy,
    ) -> Result<Application, ApplicationError> {
        let current = self.find_application(id).await?;

        let change = StatusChange {
            application_id: id,
            entry: HistoryDraft {
                status,
                notes,
                changed_by,
            },
            stamp: status.date_field().map(|field| (field, Utc::now())),
        };

        let (application, entry) = self
            .store
            .record_status_change(&change)
            .await?
            .ok_or(ApplicationError::ApplicationNotFound(id))?;

        info!(
            "Application {id}: {} -> {} by {} (history entry {})",
            current.status,
            application.status,
            entry.changed_by.as_str(),
            entry.id
        );
        if let Some((field, _)) = change.stamp {
            debug!("Application {id}: {} = {:?}", field.column(), application.date(field));
        }
        if application.status.is_terminal() {
            info!("Application {id} closed as {}", application.status);
        }
        Ok(application)
    }

    pub async fn history(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationHistoryEntry>, ApplicationError> {
        Ok(self.store.history(application_id).await?)
    }

    pub async fn last_status_change(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationHistoryEntry>, ApplicationError> {
        Ok(self.store.last_history_entry(application_id).await?)
    }

    pub async fn status_changes_count(&self, application_id: Uuid) -> Result<u64, ApplicationError> {
        Ok(self.store.count_history(application_id).await?)
    }

    pub async fn full_timeline(
        &self,
        application_id: Uuid,
    ) -> Result<ApplicationTimeline, ApplicationError> {
        let (application, history) = futures::try_join!(
            self.store.find_application(application_id),
            self.store.history(application_id)
        )?;
        let application =
            application.ok_or(ApplicationError::ApplicationNotFound(application_id))?;

        Ok(ApplicationTimeline {
            current_status: application.status,
            total_days: total_days(&history),
            timeline: history,
        })
    }

    pub async fn applications_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<Application>, ApplicationError> {
        Ok(self.store.list_for_student(student_id).await?)
    }

    pub async fn applications_for_job(
        &self,
        job_id: Uuid,
    ) -> Result<Vec<Application>, ApplicationError> {
        Ok(self.store.list_for_job(job_id).await?)
    }

    pub async fn has_applied(&self, student_id: Uuid, job_id: Uuid) -> Result<bool, ApplicationError> {
        Ok(self.store.find_by_pair(student_id, job_id).await?.is_some())
    }

    pub async fn company_candidates(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CandidateView>, ApplicationError> {
        let records = self.store.company_candidates(company_id).await?;
        let views = records
            .into_iter()
            .map(CandidateView::try_from)
            .collect::<Result<Vec<_>, AppError>>()?;
        Ok(views)
    }
}

/// Whole days (rounded up) between the first and last entry of an ordered history.
pub fn total_days(history: &[ApplicationHistoryEntry]) -> i64 {
    match (history.first(), history.last()) {
        (Some(first), Some(last)) => days_between(first.changed_at, last.changed_at),
        _ => 0,
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let ms = (to - from).num_milliseconds() as f64;
    (ms / MS_PER_DAY).ceil() as i64
}
