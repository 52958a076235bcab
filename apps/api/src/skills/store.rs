use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::{SkillRow, StudentSkillRow};
use crate::skills::profile::SkillLevel;

/// Persistence for the skill catalog and per-student skill assignments.
#[async_trait]
pub trait SkillStore: Send + Sync {
    /// `name` is already normalized.
    async fn create_skill(&self, name: &str) -> Result<SkillRow, AppError>;

    async fn find_skill(&self, skill_id: Uuid) -> Result<Option<SkillRow>, AppError>;

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<SkillRow>, AppError>;

    /// Alphabetical.
    async fn list_skills(&self) -> Result<Vec<SkillRow>, AppError>;

    async fn find_assignment(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
    ) -> Result<Option<StudentSkillRow>, AppError>;

    async fn insert_assignment(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        level: SkillLevel,
        years_experience: i32,
    ) -> Result<StudentSkillRow, AppError>;

    /// Newest first.
    async fn list_assignments(&self, student_id: Uuid) -> Result<Vec<StudentSkillRow>, AppError>;

    /// Applies the provided fields; `None` when the assignment does not exist.
    async fn update_assignment(
        &self,
        assignment_id: Uuid,
        level: Option<SkillLevel>,
        years_experience: Option<i32>,
    ) -> Result<Option<StudentSkillRow>, AppError>;

    /// `false` when nothing was deleted.
    async fn delete_assignment(&self, assignment_id: Uuid) -> Result<bool, AppError>;
}
