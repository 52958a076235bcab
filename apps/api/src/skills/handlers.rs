use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{ValidJson, ValidPath};
use crate::models::skill::{SkillRow, StudentSkillRow};
use crate::skills::profile::{AddSkillRequest, CreateSkillRequest, UpdateSkillRequest};
use crate::state::AppState;

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<SkillRow>>, AppError> {
    Ok(Json(state.skills.list_skills().await?))
}

/// POST /api/v1/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateSkillRequest>,
) -> Result<(StatusCode, Json<SkillRow>), AppError> {
    let skill = state.skills.create_skill(req).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/v1/students/:student_id/skills
pub async fn handle_student_skills(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<Uuid>,
) -> Result<Json<Vec<StudentSkillRow>>, AppError> {
    Ok(Json(state.skills.student_skills(student_id).await?))
}

/// POST /api/v1/students/:student_id/skills
pub async fn handle_add_student_skill(
    State(state): State<AppState>,
    ValidPath(student_id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<AddSkillRequest>,
) -> Result<(StatusCode, Json<StudentSkillRow>), AppError> {
    let assignment = state.skills.add_skill(student_id, req).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// PATCH /api/v1/student-skills/:id
pub async fn handle_update_student_skill(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
    ValidJson(req): ValidJson<UpdateSkillRequest>,
) -> Result<Json<StudentSkillRow>, AppError> {
    Ok(Json(state.skills.update_skill(id, req).await?))
}

/// DELETE /api/v1/student-skills/:id
pub async fn handle_remove_student_skill(
    State(state): State<AppState>,
    ValidPath(id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.skills.remove_skill(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
