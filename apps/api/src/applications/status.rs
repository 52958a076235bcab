//! Application status vocabulary.
//!
//! Any status may follow any other; the tracker records transitions, it does not
//! police them. The status → timestamp-column mapping lives in
//! [`STATUS_DATE_FIELDS`] and nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Applied,
    Reviewed,
    Interview,
    TechnicalTest,
    FinalInterview,
    Accepted,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 8] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Interview,
        ApplicationStatus::TechnicalTest,
        ApplicationStatus::FinalInterview,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Interview => "interview",
            ApplicationStatus::TechnicalTest => "technical_test",
            ApplicationStatus::FinalInterview => "final_interview",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
            ApplicationStatus::Withdrawn => "withdrawn",
        }
    }

    /// Accepted, rejected and withdrawn close the hiring process.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ApplicationStatus::Accepted | ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
        )
    }

    /// The timestamp column stamped when an application enters this status.
    pub fn date_field(&self) -> Option<StatusDateField> {
        STATUS_DATE_FIELDS
            .iter()
            .find(|(status, _)| status == self)
            .map(|(_, field)| *field)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unrecognized label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Denormalized "when did this status last become active" columns on an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusDateField {
    AppliedAt,
    ReviewedAt,
    InterviewAt,
    TechnicalTestAt,
    DecidedAt,
}

impl StatusDateField {
    pub fn column(&self) -> &'static str {
        match self {
            StatusDateField::AppliedAt => "applied_at",
            StatusDateField::ReviewedAt => "reviewed_at",
            StatusDateField::InterviewAt => "interview_at",
            StatusDateField::TechnicalTestAt => "technical_test_at",
            StatusDateField::DecidedAt => "decided_at",
        }
    }
}

/// Both interview rounds share `interview_at`; the later one wins.
pub const STATUS_DATE_FIELDS: [(ApplicationStatus, StatusDateField); 8] = [
    (ApplicationStatus::Applied, StatusDateField::AppliedAt),
    (ApplicationStatus::Reviewed, StatusDateField::ReviewedAt),
    (ApplicationStatus::Interview, StatusDateField::InterviewAt),
    (ApplicationStatus::TechnicalTest, StatusDateField::TechnicalTestAt),
    (ApplicationStatus::FinalInterview, StatusDateField::InterviewAt),
    (ApplicationStatus::Accepted, StatusDateField::DecidedAt),
    (ApplicationStatus::Rejected, StatusDateField::DecidedAt),
    (ApplicationStatus::Withdrawn, StatusDateField::DecidedAt),
];

/// Who triggered a status change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedBy {
    #[default]
    System,
    Student,
    Company,
}

impl ChangedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangedBy::System => "system",
            ChangedBy::Student => "student",
            ChangedBy::Company => "company",
        }
    }
}

impl FromStr for ChangedBy {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "system" => Ok(ChangedBy::System),
            "student" => Ok(ChangedBy::Student),
            "company" => Ok(ChangedBy::Company),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}
