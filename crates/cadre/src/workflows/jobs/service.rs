use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{
    Job, JobForm, JobId, JobProgress, JobState, JobStatusEntry, JobStatusForm, NewJob,
    NewJobStatus,
};
use super::repository::JobRepository;
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::SessionUser;

/// Job posting registration and status tracking.
pub struct JobService<R> {
    repository: Arc<R>,
}

impl<R> JobService<R>
where
    R: JobRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn register(&self, actor: &SessionUser, form: JobForm) -> Result<Job, JobServiceError> {
        let title = required("job_title", &form.job_title)?;
        let code = required("job_code", &form.job_code)?;
        let description = required("job_description", &form.job_description)?;
        let deadline = NaiveDate::parse_from_str(form.deadline.trim(), "%Y-%m-%d")
            .map_err(|_| JobServiceError::InvalidDeadline(form.deadline.clone()))?;

        if self.repository.job_by_code(code)?.is_some() {
            warn!(job_code = code, "job code already registered");
            return Err(JobServiceError::CodeTaken(code.to_string()));
        }

        let job = self
            .repository
            .insert_job(NewJob {
                user_id: actor.user_id,
                title: title.to_string(),
                code: code.to_string(),
                description: description.to_string(),
                deadline,
                governorate: actor.governorate.clone(),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => JobServiceError::CodeTaken(code.to_string()),
                other => JobServiceError::Repository(other),
            })?;

        info!(job_code = %job.code, user = %actor.full_name, "registered job");
        Ok(job)
    }

    /// Jobs still awaiting action.
    pub fn in_progress(&self) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.repository.jobs_by_status(JobState::Pending)?)
    }

    pub fn completed(&self) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.repository.jobs_by_status(JobState::Completed)?)
    }

    /// Jobs registered by the actor.
    pub fn outbox(&self, actor: &SessionUser) -> Result<Vec<Job>, JobServiceError> {
        Ok(self.repository.jobs_by_owner(actor.user_id)?)
    }

    pub fn progress(&self, code: &str) -> Result<JobProgress, JobServiceError> {
        let job = self
            .repository
            .job_by_code(code)?
            .ok_or(JobServiceError::JobNotFound)?;
        let latest_note = self
            .repository
            .status_history(job.id)?
            .into_iter()
            .map(|entry| entry.notes)
            .find(|notes| !notes.is_empty());

        Ok(JobProgress {
            job_title: job.title,
            job_code: job.code,
            status: job.status,
            created_at: job.created_at.format("%Y-%m-%d").to_string(),
            deadline: job.deadline.format("%Y-%m-%d").to_string(),
            progress_stage: job.status.progress_stage(),
            latest_note,
        })
    }

    pub fn update_status(
        &self,
        actor: &SessionUser,
        job_id: JobId,
        form: JobStatusForm,
    ) -> Result<JobStatusEntry, JobServiceError> {
        let raw = form
            .status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .ok_or(JobServiceError::MissingStatus)?;
        let status =
            JobState::parse(raw).ok_or_else(|| JobServiceError::UnknownStatus(raw.to_string()))?;

        let entry = self
            .repository
            .record_status(NewJobStatus {
                job_id,
                status,
                notes: form.notes.trim().to_string(),
                author_id: actor.user_id,
            })
            .map_err(|err| match err {
                RepositoryError::NotFound => JobServiceError::JobNotFound,
                other => JobServiceError::Repository(other),
            })?;

        info!(
            job_id = job_id.0,
            status = status.as_str(),
            user = %actor.full_name,
            "updated job status"
        );
        Ok(entry)
    }

    pub fn history(&self, job_id: JobId) -> Result<(Job, Vec<JobStatusEntry>), JobServiceError> {
        let job = self
            .repository
            .job(job_id)?
            .ok_or(JobServiceError::JobNotFound)?;
        let history = self.repository.status_history(job_id)?;
        Ok((job, history))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, JobServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(JobServiceError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JobServiceError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("deadline `{0}` must use the YYYY-MM-DD format")]
    InvalidDeadline(String),
    #[error("job code `{0}` is already in use")]
    CodeTaken(String),
    #[error("a new status is required")]
    MissingStatus,
    #[error("unknown job status `{0}`")]
    UnknownStatus(String),
    #[error("job not found")]
    JobNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
