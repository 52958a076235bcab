pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::applications::handlers as applications;
use crate::recommendation::handlers as recommendation;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Recommendations
        .route(
            "/api/v1/students/:student_id/recommended-jobs",
            get(recommendation::handle_recommended_jobs),
        )
        .route(
            "/api/v1/jobs/:job_id/recommended-candidates",
            get(recommendation::handle_recommended_candidates),
        )
        .route(
            "/api/v1/students/:student_id/jobs/:job_id/match-score",
            get(recommendation::handle_match_score),
        )
        // Applications
        .route(
            "/api/v1/applications",
            post(applications::handle_create_application),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .route(
            "/api/v1/applications/:id/history",
            get(applications::handle_history),
        )
        .route(
            "/api/v1/applications/:id/history/timeline",
            get(applications::handle_timeline),
        )
        .route(
            "/api/v1/applications/:id/history/last",
            get(applications::handle_last_change),
        )
        .route(
            "/api/v1/applications/:id/history/count",
            get(applications::handle_changes_count),
        )
        .route(
            "/api/v1/students/:student_id/applications",
            get(applications::handle_student_applications),
        )
        .route(
            "/api/v1/jobs/:job_id/applications",
            get(applications::handle_job_applications),
        )
        .route(
            "/api/v1/students/:student_id/jobs/:job_id/application",
            get(applications::handle_has_applied),
        )
        .route(
            "/api/v1/companies/:company_id/candidates",
            get(applications::handle_company_candidates),
        )
        // Skill catalog and profiles
        .route(
            "/api/v1/skills",
            get(skills::handle_list_skills).post(skills::handle_create_skill),
        )
        .route(
            "/api/v1/students/:student_id/skills",
            get(skills::handle_student_skills).post(skills::handle_add_student_skill),
        )
        .route(
            "/api/v1/student-skills/:id",
            patch(skills::handle_update_student_skill).delete(skills::handle_remove_student_skill),
        )
        .with_state(state)
}
