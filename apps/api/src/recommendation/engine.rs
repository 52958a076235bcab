//! Recommendation engine: ranks jobs for a student and students for a job.
//!
//! Best-effort by contract: a missing record or a failing collaborator yields an
//! empty list (or a zeroed detailed score) and a log line, never an error.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::applications::store::ApplicationStore;
use crate::errors::AppError;
use crate::matching::scoring::{build_reasoning, calculate_matching_score, evaluate, match_skills};
use crate::matching::skills::extract_skills;
use crate::models::job::JobRow;
use crate::recommendation::source::CatalogStore;

/// Bonus for a student/job pairing the student has not applied to yet.
pub const DIVERSITY_BONUS: u32 = 10;

const MAX_TOTAL_SCORE: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub job_id: Uuid,
    pub title: String,
    pub company: String,
    pub match_score: u32,
    pub match_percentage: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentCandidateMatch {
    pub student_id: Uuid,
    pub student_name: String,
    pub match_score: u32,
    pub match_percentage: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedMatchScore {
    pub match_score: u32,
    pub skills_score: u32,
    pub diversity_score: u32,
    pub total_score: u32,
}

pub struct RecommendationEngine {
    catalog: Arc<dyn CatalogStore>,
    applications: Arc<dyn ApplicationStore>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>, applications: Arc<dyn ApplicationStore>) -> Self {
        Self {
            catalog,
            applications,
        }
    }

    /// Top `limit` active jobs for a student, best score first.
    pub async fn recommend_jobs_for_student(
        &self,
        student_id: Uuid,
        limit: usize,
    ) -> Vec<JobRecommendation> {
        match self.try_recommend_jobs(student_id, limit).await {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!("Error recommending jobs for student {student_id}: {e}");
                vec![]
            }
        }
    }

    /// Top `limit` students for a job, best score first.
    /// A job without stated requirements has no candidates.
    pub async fn recommend_candidates_for_job(
        &self,
        job_id: Uuid,
        limit: usize,
    ) -> Vec<StudentCandidateMatch> {
        match self.try_recommend_candidates(job_id, limit).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("Error recommending candidates for job {job_id}: {e}");
                vec![]
            }
        }
    }

    /// Skills score plus the diversity bonus, capped at 100.
    pub async fn detailed_match_score(&self, student_id: Uuid, job_id: Uuid) -> DetailedMatchScore {
        match self.try_detailed_match_score(student_id, job_id).await {
            Ok(score) => score,
            Err(e) => {
                error!(
                    "Error calculating detailed match score for student {student_id} and job {job_id}: {e}"
                );
                DetailedMatchScore::default()
            }
        }
    }

    async fn try_recommend_jobs(
        &self,
        student_id: Uuid,
        limit: usize,
    ) -> Result<Vec<JobRecommendation>, AppError> {
        if self.catalog.find_student(student_id).await?.is_none() {
            warn!("Student {student_id} not found");
            return Ok(vec![]);
        }

        let student_skills = self.student_skills(student_id).await;

        let jobs = self.catalog.list_active_jobs().await?;
        if jobs.is_empty() {
            warn!("No active jobs found");
            return Ok(vec![]);
        }

        let recommendations = jobs
            .into_iter()
            .map(|job| score_job(&student_skills, job))
            .collect();

        Ok(rank(recommendations, limit, |r| r.match_score))
    }

    async fn try_recommend_candidates(
        &self,
        job_id: Uuid,
        limit: usize,
    ) -> Result<Vec<StudentCandidateMatch>, AppError> {
        let Some(job) = self.catalog.find_job(job_id).await? else {
            warn!("Job {job_id} not found");
            return Ok(vec![]);
        };

        let job_skills = extract_skills(job.requirements.as_deref());
        if job_skills.is_empty() {
            warn!("No skills defined for job {job_id}");
            return Ok(vec![]);
        }

        let students = self.catalog.list_students().await?;
        if students.is_empty() {
            warn!("No students found");
            return Ok(vec![]);
        }

        // Independent lookups; ranking waits for all of them.
        let profiles = join_all(
            students
                .iter()
                .map(|student| self.student_skills(student.id)),
        )
        .await;

        let matches = students
            .iter()
            .zip(profiles)
            .map(|(student, skills)| {
                let result = evaluate(&skills, &job_skills);
                StudentCandidateMatch {
                    student_id: student.id,
                    student_name: student.full_name(),
                    match_score: result.score,
                    match_percentage: result.percentage,
                    matched_skills: result.matched_skills,
                    missing_skills: result.missing_skills,
                }
            })
            .collect();

        Ok(rank(matches, limit, |m| m.match_score))
    }

    async fn try_detailed_match_score(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<DetailedMatchScore, AppError> {
        let (student, job) = futures::try_join!(
            self.catalog.find_student(student_id),
            self.catalog.find_job(job_id)
        )?;
        let Some(job) = job.filter(|_| student.is_some()) else {
            warn!("Student {student_id} or job {job_id} not found");
            return Ok(DetailedMatchScore::default());
        };

        let student_skills = self.student_skills(student_id).await;
        let job_skills = extract_skills(job.requirements.as_deref());
        let matched = match_skills(&student_skills, &job_skills);
        let skills_score =
            calculate_matching_score(matched.matched.len(), matched.missing.len()).score;

        let already_applied = self
            .applications
            .find_by_pair(student_id, job_id)
            .await?
            .is_some();
        let diversity_score = if already_applied { 0 } else { DIVERSITY_BONUS };

        Ok(DetailedMatchScore {
            match_score: skills_score,
            skills_score,
            diversity_score,
            total_score: (skills_score + diversity_score).min(MAX_TOTAL_SCORE),
        })
    }

    /// Never fails: a lookup error reads as "no skills".
    async fn student_skills(&self, student_id: Uuid) -> Vec<String> {
        match self.catalog.student_skills(student_id).await {
            Ok(skills) => {
                if skills.is_empty() {
                    debug!("No skills found for student {student_id}");
                }
                skills
            }
            Err(e) => {
                error!("Error fetching skills for student {student_id}: {e}");
                vec![]
            }
        }
    }
}

fn score_job(student_skills: &[String], job: JobRow) -> JobRecommendation {
    let job_skills = extract_skills(job.requirements.as_deref());
    let result = evaluate(student_skills, &job_skills);
    let reasoning = build_reasoning(
        result.matched_skills.len(),
        result.missing_skills.len(),
        result.score,
    );

    JobRecommendation {
        job_id: job.id,
        title: job.title,
        company: job.company_name.unwrap_or_else(|| "Unknown".to_string()),
        match_score: result.score,
        match_percentage: result.percentage,
        matched_skills: result.matched_skills,
        missing_skills: result.missing_skills,
        reasoning,
    }
}

/// Stable sort by descending score, then keep the first `limit`.
fn rank<T>(mut items: Vec<T>, limit: usize, score: impl Fn(&T) -> u32) -> Vec<T> {
    items.sort_by(|a, b| score(b).cmp(&score(a)));
    items.truncate(limit);
    items
}
