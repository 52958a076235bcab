use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::candidates::CandidateView;
use crate::applications::status::{ApplicationStatus, ChangedBy};
use crate::applications::tracker::ApplicationTimeline;
use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::models::application::{Application, ApplicationHistoryEntry, NewApplication};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub changed_by: ChangedBy,
}

#[derive(Debug, Serialize)]
pub struct ChangesCountResponse {
    pub changes_count: u64,
}

#[derive(Debug, Serialize)]
pub struct HasAppliedResponse {
    pub exists: bool,
}

/// POST /api/v1/applications
pub async fn handle_create_application(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewApplication>,
) -> Result<(StatusCode, Json<Application>), AppError> {
    let application = state.tracker.create_application(req).await?;
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<Application>, AppError> {
    Ok(Json(state.tracker.find_application(id).await?))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateStatusRequest>,
) -> Result<Json<Application>, AppError> {
    let application = state
        .tracker
        .update_status(id, req.status, req.notes, req.changed_by)
        .await?;
    Ok(Json(application))
}

/// GET /api/v1/applications/:id/history
pub async fn handle_history(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<Vec<ApplicationHistoryEntry>>, AppError> {
    Ok(Json(state.tracker.history(id).await?))
}

/// GET /api/v1/applications/:id/history/timeline
pub async fn handle_timeline(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ApplicationTimeline>, AppError> {
    Ok(Json(state.tracker.full_timeline(id).await?))
}

/// GET /api/v1/applications/:id/history/last
///
/// `null` when the application has no history.
pub async fn handle_last_change(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<Option<ApplicationHistoryEntry>>, AppError> {
    Ok(Json(state.tracker.last_status_change(id).await?))
}

/// GET /api/v1/applications/:id/history/count
pub async fn handle_changes_count(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<Json<ChangesCountResponse>, AppError> {
    let changes_count = state.tracker.status_changes_count(id).await?;
    Ok(Json(ChangesCountResponse { changes_count }))
}

/// GET /api/v1/students/:student_id/applications
pub async fn handle_student_applications(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<Uuid>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(state.tracker.applications_for_student(student_id).await?))
}

/// GET /api/v1/jobs/:job_id/applications
pub async fn handle_job_applications(
    State(state): State<AppState>,
    ValidPath(job_id): ValidPath<Uuid>,
) -> Result<Json<Vec<Application>>, AppError> {
    Ok(Json(state.tracker.applications_for_job(job_id).await?))
}

/// GET /api/v1/students/:student_id/jobs/:job_id/application
pub async fn handle_has_applied(
    State(state): State<AppState>,
    ValidPath((student_id, job_id)): ValidPath<(Uuid, Uuid)>,
) -> Result<Json<HasAppliedResponse>, AppError> {
    let exists = state.tracker.has_applied(student_id, job_id).await?;
    Ok(Json(HasAppliedResponse { exists }))
}

/// GET /api/v1/companies/:company_id/candidates
pub async fn handle_company_candidates(
    State(state): State<AppState>,
    ValidPath(company_id): ValidPath<Uuid>,
) -> Result<Json<Vec<CandidateView>>, AppError> {
    Ok(Json(state.tracker.company_candidates(company_id).await?))
}
