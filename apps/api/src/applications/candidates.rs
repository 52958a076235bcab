//! Employer-facing candidate view: every applicant to a company's jobs with the
//! composite match score (skills + projects + certifications, capped at 95).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use crate::applications::status::ApplicationStatus;
use crate::errors::AppError;
use crate::matching::scoring::composite_candidate_score;
use crate::matching::skills::requirement_tokens;

/// One application joined with its job and the applicant's portfolio.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRecord {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub requirements: Option<String>,
    pub status: String,
    pub applied_at: Option<DateTime<Utc>>,
    pub student_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Normalized skill names in assignment order.
    pub skills: Vec<String>,
    pub project_count: i64,
    pub certification_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateView {
    pub application_id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
    pub student_id: Uuid,
    pub student_name: String,
    pub skills: Vec<String>,
    pub project_count: u32,
    pub certification_count: u32,
    #[serde(rename = "match")]
    pub match_score: u32,
}

impl TryFrom<CandidateRecord> for CandidateView {
    type Error = AppError;

    fn try_from(record: CandidateRecord) -> Result<Self, Self::Error> {
        let status = record.status.parse::<ApplicationStatus>().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("application {}: {e}", record.application_id))
        })?;

        let required = requirement_tokens(record.requirements.as_deref());
        let projects = count(record.project_count);
        let certifications = count(record.certification_count);
        let match_score = composite_candidate_score(
            &required,
            &record.skills,
            projects as usize,
            certifications as usize,
        );

        Ok(CandidateView {
            application_id: record.application_id,
            job_id: record.job_id,
            job_title: record.job_title,
            status,
            applied_at: record.applied_at,
            student_id: record.student_id,
            student_name: format!("{} {}", record.first_name, record.last_name),
            skills: record.skills,
            project_count: projects,
            certification_count: certifications,
            match_score,
        })
    }
}

fn count(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}
