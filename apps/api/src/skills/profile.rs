//! Student skill profiles: the catalog of named skills and each student's
//! assignments with proficiency level and years of experience.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::skills::normalize_skill;
use crate::models::skill::{SkillRow, StudentSkillRow};
use crate::recommendation::source::CatalogStore;
use crate::skills::store::SkillStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddSkillRequest {
    pub skill_id: Uuid,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default)]
    pub years_experience: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSkillRequest {
    pub level: Option<SkillLevel>,
    pub years_experience: Option<i32>,
}

pub struct SkillProfileService {
    catalog: Arc<dyn CatalogStore>,
    store: Arc<dyn SkillStore>,
}

impl SkillProfileService {
    pub fn new(catalog: Arc<dyn CatalogStore>, store: Arc<dyn SkillStore>) -> Self {
        Self { catalog, store }
    }

    pub async fn create_skill(&self, req: CreateSkillRequest) -> Result<SkillRow, AppError> {
        let name = normalize_skill(&req.name);
        if name.is_empty() {
            return Err(AppError::Validation("Skill name must not be empty".to_string()));
        }
        if self.store.find_skill_by_name(&name).await?.is_some() {
            return Err(AppError::Conflict(format!("Skill '{name}' already exists")));
        }
        let skill = self.store.create_skill(&name).await?;
        info!("Created skill {} ({})", skill.name, skill.id);
        Ok(skill)
    }

    pub async fn list_skills(&self) -> Result<Vec<SkillRow>, AppError> {
        self.store.list_skills().await
    }

    /// One assignment per (student, skill); a second one is a conflict.
    pub async fn add_skill(
        &self,
        student_id: Uuid,
        req: AddSkillRequest,
    ) -> Result<StudentSkillRow, AppError> {
        validate_years(req.years_experience)?;
        self.require_student(student_id).await?;

        let skill = self
            .store
            .find_skill(req.skill_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Skill {} not found", req.skill_id)))?;

        if self
            .store
            .find_assignment(student_id, skill.id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Student already has skill '{}'",
                skill.name
            )));
        }

        let assignment = self
            .store
            .insert_assignment(student_id, skill.id, req.level, req.years_experience)
            .await?;
        info!(
            "Student {student_id} added skill {} at level {}",
            skill.name, req.level
        );
        Ok(assignment)
    }

    pub async fn student_skills(&self, student_id: Uuid) -> Result<Vec<StudentSkillRow>, AppError> {
        self.require_student(student_id).await?;
        self.store.list_assignments(student_id).await
    }

    pub async fn update_skill(
        &self,
        assignment_id: Uuid,
        req: UpdateSkillRequest,
    ) -> Result<StudentSkillRow, AppError> {
        if let Some(years) = req.years_experience {
            validate_years(years)?;
        }
        self.store
            .update_assignment(assignment_id, req.level, req.years_experience)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Student skill {assignment_id} not found")))
    }

    pub async fn remove_skill(&self, assignment_id: Uuid) -> Result<(), AppError> {
        if !self.store.delete_assignment(assignment_id).await? {
            return Err(AppError::NotFound(format!(
                "Student skill {assignment_id} not found"
            )));
        }
        Ok(())
    }

    async fn require_student(&self, student_id: Uuid) -> Result<(), AppError> {
        self.catalog
            .find_student(student_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Student {student_id} not found")))
    }
}

fn validate_years(years: i32) -> Result<(), AppError> {
    if years < 0 {
        return Err(AppError::Validation(
            "years_experience must not be negative".to_string(),
        ));
    }
    Ok(())
}
