//! In-memory collaborators for unit and router tests.
//!
//! `MemoryStore` implements every store trait over one mutex, so each call is
//! atomic the same way a database transaction would be.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::applications::candidates::CandidateRecord;
use crate::applications::status::ApplicationStatus;
use crate::applications::store::{ApplicationStore, HistoryDraft, StatusChange};
use crate::errors::AppError;
use crate::models::application::{Application, ApplicationHistoryEntry, NewApplication};
use crate::models::job::JobRow;
use crate::models::skill::{SkillRow, StudentSkillRow};
use crate::models::student::StudentRow;
use crate::recommendation::source::CatalogStore;
use crate::skills::profile::SkillLevel;
use crate::skills::store::SkillStore;

pub const ACME: Uuid = Uuid::from_u128(0xac3e);

pub fn student(first: &str, last: &str) -> StudentRow {
    StudentRow {
        id: Uuid::new_v4(),
        first_name: first.to_string(),
        last_name: last.to_string(),
    }
}

/// An active Acme job closing in 30 days.
pub fn job(title: &str, requirements: Option<&str>) -> JobRow {
    JobRow {
        id: Uuid::new_v4(),
        company_id: ACME,
        company_name: Some("Acme".to_string()),
        title: title.to_string(),
        requirements: requirements.map(String::from),
        is_active: true,
        deadline: Utc::now() + Duration::days(30),
    }
}

#[derive(Default)]
struct Inner {
    students: Vec<StudentRow>,
    jobs: Vec<JobRow>,
    skills: Vec<SkillRow>,
    assignments: Vec<StudentSkillRow>,
    applications: Vec<Application>,
    history: Vec<ApplicationHistoryEntry>,
    portfolios: HashMap<Uuid, (i64, i64)>,
}

impl Inner {
    fn skill_named(&mut self, name: &str) -> SkillRow {
        if let Some(existing) = self.skills.iter().find(|s| s.name == name) {
            return existing.clone();
        }
        let skill = SkillRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.skills.push(skill.clone());
        skill
    }

    fn assign(&mut self, student_id: Uuid, skill: &SkillRow, level: SkillLevel, years: i32) -> StudentSkillRow {
        let row = StudentSkillRow {
            id: Uuid::new_v4(),
            student_id,
            skill_id: skill.id,
            skill_name: skill.name.clone(),
            level: level.as_str().to_string(),
            years_experience: years,
            created_at: Utc::now(),
        };
        self.assignments.push(row.clone());
        row
    }

    fn append(&mut self, application_id: Uuid, draft: &HistoryDraft) -> ApplicationHistoryEntry {
        let entry = ApplicationHistoryEntry {
            id: Uuid::new_v4(),
            application_id,
            status: draft.status,
            notes: draft.notes.clone(),
            changed_by: draft.changed_by,
            changed_at: Utc::now(),
        };
        self.history.push(entry.clone());
        entry
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Registers a student whose skills are assigned in the given order.
    pub fn add_student(&self, student: StudentRow, skills: &[&str]) {
        let mut inner = self.inner.lock().unwrap();
        for name in skills {
            let skill = inner.skill_named(name);
            inner.assign(student.id, &skill, SkillLevel::Intermediate, 1);
        }
        inner.students.push(student);
    }

    pub fn add_job(&self, job: JobRow) {
        self.inner.lock().unwrap().jobs.push(job);
    }

    pub fn set_portfolio(&self, student_id: Uuid, projects: i64, certifications: i64) {
        self.inner
            .lock()
            .unwrap()
            .portfolios
            .insert(student_id, (projects, certifications));
    }
}

/// What the unique constraints of the schema report through `AppError`.
fn unique_violation(constraint: &str) -> AppError {
    AppError::Conflict(format!(
        "A record with the same unique key already exists ({constraint})"
    ))
}

fn newest_first(mut apps: Vec<Application>) -> Vec<Application> {
    apps.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
    apps
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_student(&self, student_id: Uuid) -> Result<Option<StudentRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.students.iter().find(|s| s.id == student_id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError> {
        Ok(self.inner.lock().unwrap().students.clone())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn list_active_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.jobs.iter().filter(|j| j.is_active).cloned().collect())
    }

    async fn student_skills(&self, student_id: Uuid) -> Result<Vec<String>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .assignments
            .iter()
            .filter(|a| a.student_id == student_id)
            .map(|a| a.skill_name.clone())
            .collect())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn find_application(&self, id: Uuid) -> Result<Option<Application>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.applications.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_pair(
        &self,
        student_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<Application>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .applications
            .iter()
            .find(|a| a.student_id == student_id && a.job_id == job_id)
            .cloned())
    }

    async fn list_for_student(&self, student_id: Uuid) -> Result<Vec<Application>, AppError> {
        let inner = self.inner.lock().unwrap();
        let apps = inner
            .applications
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        Ok(newest_first(apps))
    }

    async fn list_for_job(&self, job_id: Uuid) -> Result<Vec<Application>, AppError> {
        let inner = self.inner.lock().unwrap();
        let apps = inner
            .applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        Ok(newest_first(apps))
    }

    async fn create_with_history(
        &self,
        new: &NewApplication,
        applied_at: DateTime<Utc>,
        entry: &HistoryDraft,
    ) -> Result<(Application, ApplicationHistoryEntry), AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner
            .applications
            .iter()
            .any(|a| a.student_id == new.student_id && a.job_id == new.job_id)
        {
            return Err(unique_violation("job_applications_student_id_job_id_key"));
        }
        let application = Application {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            job_id: new.job_id,
            status: ApplicationStatus::Applied,
            cover_letter: new.cover_letter.clone(),
            resume_url: new.resume_url.clone(),
            applied_at: Some(applied_at),
            reviewed_at: None,
            interview_at: None,
            technical_test_at: None,
            decided_at: None,
            company_notes: None,
            created_at: applied_at,
        };
        inner.applications.push(application.clone());
        let entry = inner.append(application.id, entry);
        Ok((application, entry))
    }

    async fn record_status_change(
        &self,
        change: &StatusChange,
    ) -> Result<Option<(Application, ApplicationHistoryEntry)>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(application) = inner
            .applications
            .iter_mut()
            .find(|a| a.id == change.application_id)
        else {
            return Ok(None);
        };

        application.status = change.entry.status;
        if let Some((field, at)) = change.stamp {
            application.stamp(field, at);
        }
        let application = application.clone();
        let entry = inner.append(application.id, &change.entry);
        Ok(Some((application, entry)))
    }

    async fn history(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationHistoryEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<_> = inner
            .history
            .iter()
            .filter(|h| h.application_id == application_id)
            .cloned()
            .collect();
        entries.sort_by_key(|h| h.changed_at);
        Ok(entries)
    }

    async fn last_history_entry(
        &self,
        application_id: Uuid,
    ) -> Result<Option<ApplicationHistoryEntry>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .history
            .iter()
            .filter(|h| h.application_id == application_id)
            .max_by_key(|h| h.changed_at)
            .cloned())
    }

    async fn count_history(&self, application_id: Uuid) -> Result<u64, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .history
            .iter()
            .filter(|h| h.application_id == application_id)
            .count() as u64)
    }

    async fn company_candidates(
        &self,
        company_id: Uuid,
    ) -> Result<Vec<CandidateRecord>, AppError> {
        let inner = self.inner.lock().unwrap();
        let mut records = Vec::new();
        for app in &inner.applications {
            let Some(job) = inner
                .jobs
                .iter()
                .find(|j| j.id == app.job_id && j.company_id == company_id)
            else {
                continue;
            };
            let Some(student) = inner.students.iter().find(|s| s.id == app.student_id) else {
                continue;
            };
            let (project_count, certification_count) =
                inner.portfolios.get(&student.id).copied().unwrap_or((0, 0));
            records.push(CandidateRecord {
                application_id: app.id,
                job_id: job.id,
                job_title: job.title.clone(),
                requirements: job.requirements.clone(),
                status: app.status.as_str().to_string(),
                applied_at: app.applied_at,
                student_id: student.id,
                first_name: student.first_name.clone(),
                last_name: student.last_name.clone(),
                skills: inner
                    .assignments
                    .iter()
                    .filter(|a| a.student_id == student.id)
                    .map(|a| a.skill_name.clone())
                    .collect(),
                project_count,
                certification_count,
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl SkillStore for MemoryStore {
    async fn create_skill(&self, name: &str) -> Result<SkillRow, AppError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.skills.iter().any(|s| s.name == name) {
            return Err(unique_violation("skills_name_key"));
        }
        Ok(inner.skill_named(name))
    }

    async fn find_skill(&self, skill_id: Uuid) -> Result<Option<SkillRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.skills.iter().find(|s| s.id == skill_id).cloned())
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<SkillRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.skills.iter().find(|s| s.name == name).cloned())
    }

    async fn list_skills(&self) -> Result<Vec<SkillRow>, AppError> {
        let mut skills = self.inner.lock().unwrap().skills.clone();
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(skills)
    }

    async fn find_assignment(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
    ) -> Result<Option<StudentSkillRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .assignments
            .iter()
            .find(|a| a.student_id == student_id && a.skill_id == skill_id)
            .cloned())
    }

    async fn insert_assignment(
        &self,
        student_id: Uuid,
        skill_id: Uuid,
        level: SkillLevel,
        years_experience: i32,
    ) -> Result<StudentSkillRow, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let skill = inner
            .skills
            .iter()
            .find(|s| s.id == skill_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Skill {skill_id} not found")))?;
        if inner
            .assignments
            .iter()
            .any(|a| a.student_id == student_id && a.skill_id == skill_id)
        {
            return Err(unique_violation("student_skills_student_id_skill_id_key"));
        }
        Ok(inner.assign(student_id, &skill, level, years_experience))
    }

    async fn list_assignments(&self, student_id: Uuid) -> Result<Vec<StudentSkillRow>, AppError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .assignments
            .iter()
            .rev()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn update_assignment(
        &self,
        assignment_id: Uuid,
        level: Option<SkillLevel>,
        years_experience: Option<i32>,
    ) -> Result<Option<StudentSkillRow>, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let Some(row) = inner.assignments.iter_mut().find(|a| a.id == assignment_id) else {
            return Ok(None);
        };
        if let Some(level) = level {
            row.level = level.as_str().to_string();
        }
        if let Some(years) = years_experience {
            row.years_experience = years;
        }
        Ok(Some(row.clone()))
    }

    async fn delete_assignment(&self, assignment_id: Uuid) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let before = inner.assignments.len();
        inner.assignments.retain(|a| a.id != assignment_id);
        Ok(inner.assignments.len() != before)
    }
}

/// A catalog whose every call fails, for exercising the best-effort paths.
pub struct FailingCatalog;

fn offline() -> AppError {
    AppError::Internal(anyhow::anyhow!("catalog offline"))
}

#[async_trait]
impl CatalogStore for FailingCatalog {
    async fn find_student(&self, _student_id: Uuid) -> Result<Option<StudentRow>, AppError> {
        Err(offline())
    }

    async fn list_students(&self) -> Result<Vec<StudentRow>, AppError> {
        Err(offline())
    }

    async fn find_job(&self, _job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        Err(offline())
    }

    async fn list_active_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        Err(offline())
    }

    async fn student_skills(&self, _student_id: Uuid) -> Result<Vec<String>, AppError> {
        Err(offline())
    }
}
