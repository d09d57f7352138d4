use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::accounts::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

/// Progress of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    InProgress,
    Completed,
    Rejected,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::InProgress => "in_progress",
            JobState::Completed => "completed",
            JobState::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "pending" => Some(JobState::Pending),
            "in_progress" => Some(JobState::InProgress),
            "completed" => Some(JobState::Completed),
            "rejected" => Some(JobState::Rejected),
            _ => None,
        }
    }

    /// Stage label shown on the progress page.
    pub fn progress_stage(&self) -> &'static str {
        match self {
            JobState::Pending => "تحت المراجعة",
            JobState::InProgress => "قيد التنفيذ",
            JobState::Completed => "مكتملة",
            JobState::Rejected => "مرفوضة",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Job {
    pub id: JobId,
    pub user_id: UserId,
    pub title: String,
    pub code: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub governorate: String,
    pub status: JobState,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub user_id: UserId,
    pub title: String,
    pub code: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub governorate: String,
}

/// One entry of the append-only status log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatusEntry {
    pub id: i64,
    pub job_id: JobId,
    pub status: JobState,
    pub notes: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobStatus {
    pub job_id: JobId,
    pub status: JobState,
    pub notes: String,
    pub author_id: UserId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobForm {
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_code: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobStatusForm {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: String,
}

/// Summary returned by the job progress lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobProgress {
    pub job_title: String,
    pub job_code: String,
    pub status: JobState,
    pub created_at: String,
    pub deadline: String,
    pub progress_stage: &'static str,
    pub latest_note: Option<String>,
}
