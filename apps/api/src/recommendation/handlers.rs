//! Axum route handlers for the recommendation API.
//!
//! Recommendations are best-effort: these handlers never fail. An unknown or
//! malformed id yields an empty list, and an unusable `limit` falls back to
//! the configured default.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::recommendation::engine::{DetailedMatchScore, JobRecommendation, StudentCandidateMatch};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

impl LimitQuery {
    /// Negative limits clamp to 0; anything non-numeric uses `default`.
    pub fn resolve(&self, default: usize) -> usize {
        let Some(raw) = self.limit.as_deref().map(str::trim).filter(|raw| !raw.is_empty())
        else {
            return default;
        };
        match raw.parse::<i64>() {
            Ok(n) if n < 0 => 0,
            Ok(n) => usize::try_from(n).unwrap_or(usize::MAX),
            Err(_) => {
                warn!("Ignoring non-numeric limit '{raw}'");
                default
            }
        }
    }
}

fn limit_from(query: Option<Query<LimitQuery>>, default: usize) -> usize {
    query.map_or(default, |Query(query)| query.resolve(default))
}

fn parse_id(raw: &str) -> Option<Uuid> {
    let id = Uuid::parse_str(raw).ok();
    if id.is_none() {
        warn!("Malformed id '{raw}' in recommendation request");
    }
    id
}

/// GET /api/v1/students/:student_id/recommended-jobs
pub async fn handle_recommended_jobs(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    query: Option<Query<LimitQuery>>,
) -> Json<Vec<JobRecommendation>> {
    let limit = limit_from(query, state.config.job_recommendation_limit);
    let Some(student_id) = parse_id(&student_id) else {
        return Json(vec![]);
    };
    Json(
        state
            .recommender
            .recommend_jobs_for_student(student_id, limit)
            .await,
    )
}

/// GET /api/v1/jobs/:job_id/recommended-candidates
pub async fn handle_recommended_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    query: Option<Query<LimitQuery>>,
) -> Json<Vec<StudentCandidateMatch>> {
    let limit = limit_from(query, state.config.candidate_recommendation_limit);
    let Some(job_id) = parse_id(&job_id) else {
        return Json(vec![]);
    };
    Json(
        state
            .recommender
            .recommend_candidates_for_job(job_id, limit)
            .await,
    )
}

/// GET /api/v1/students/:student_id/jobs/:job_id/match-score
pub async fn handle_match_score(
    State(state): State<AppState>,
    Path((student_id, job_id)): Path<(String, String)>,
) -> Json<DetailedMatchScore> {
    let (Some(student_id), Some(job_id)) = (parse_id(&student_id), parse_id(&job_id)) else {
        return Json(DetailedMatchScore::default());
    };
    Json(
        state
            .recommender
            .detailed_match_score(student_id, job_id)
            .await,
    )
}
