use super::domain::{Job, JobId, JobState, JobStatusEntry, NewJob, NewJobStatus};
use crate::workflows::accounts::UserId;
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for job postings and their status log.
pub trait JobRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the code is already used.
    fn insert_job(&self, job: NewJob) -> Result<Job, RepositoryError>;
    fn job(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;
    fn job_by_code(&self, code: &str) -> Result<Option<Job>, RepositoryError>;
    fn jobs_by_status(&self, status: JobState) -> Result<Vec<Job>, RepositoryError>;
    fn jobs_by_owner(&self, owner: UserId) -> Result<Vec<Job>, RepositoryError>;
    /// Append a log entry and set the job's current status atomically.
    fn record_status(&self, entry: NewJobStatus) -> Result<JobStatusEntry, RepositoryError>;
    /// Log entries, newest first.
    fn status_history(&self, id: JobId) -> Result<Vec<JobStatusEntry>, RepositoryError>;
}
