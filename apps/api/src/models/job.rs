use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posting joined with its company's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub company_name: Option<String>,
    pub title: String,
    /// Free-text, comma-separated skill requirements.
    pub requirements: Option<String>,
    pub is_active: bool,
    pub deadline: DateTime<Utc>,
}

impl JobRow {
    pub fn accepts_applications_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.deadline
    }
}
