use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobRow;
use crate::models::student::StudentRow;

/// Read access to students, jobs and student skills.
///
/// Shared by the recommender and the application tracker; carried in
/// `AppState` as `Arc<dyn CatalogStore>`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_student(&self, student_id: Uuid) -> Result<Option<StudentRow>, AppError>;

    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError>;

    async fn list_active_jobs(&self) -> Result<Vec<JobRow>, AppError>;

    /// Normalized skill names in assignment order. Empty when the student has none.
    async fn student_skills(&self, student_id: Uuid) -> Result<Vec<String>, AppError>;
}
