use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An entry of the shared skill catalog. Names are stored lower-cased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A student's assignment of one catalog skill, joined with the skill name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StudentSkillRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub level: String,
    pub years_experience: i32,
    pub created_at: DateTime<Utc>,
}
