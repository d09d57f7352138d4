//! Job postings and their append-only status log.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
#[cfg(test)]
mod tests;

pub use domain::{Job, JobForm, JobId, JobProgress, JobState, JobStatusEntry, JobStatusForm};
pub use repository::JobRepository;
pub use router::job_router;
pub use service::{JobService, JobServiceError};
