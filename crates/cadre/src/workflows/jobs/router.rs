use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{JobForm, JobId, JobStatusForm};
use super::repository::JobRepository;
use super::service::{JobService, JobServiceError};
use crate::workflows::session::SessionUser;

/// Router builder exposing job registration, listings and status tracking.
pub fn job_router<R>(service: Arc<JobService<R>>) -> Router
where
    R: JobRepository + 'static,
{
    Router::new()
        .route("/register_new_job", post(register_handler::<R>))
        .route("/jobs_in_progress", get(in_progress_handler::<R>))
        .route("/job_results", get(in_progress_handler::<R>))
        .route("/completed_jobs", get(completed_handler::<R>))
        .route("/outbox", get(outbox_handler::<R>))
        .route("/job_progress/:job_code", get(progress_handler::<R>))
        .route("/update_job_status/:job_id", post(update_status_handler::<R>))
        .route("/job_status_history/:job_id", get(history_handler::<R>))
        .with_state(service)
}

impl IntoResponse for JobServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            JobServiceError::MissingField(_)
            | JobServiceError::InvalidDeadline(_)
            | JobServiceError::MissingStatus
            | JobServiceError::UnknownStatus(_) => StatusCode::UNPROCESSABLE_ENTITY,
            JobServiceError::CodeTaken(_) => StatusCode::CONFLICT,
            JobServiceError::JobNotFound => StatusCode::NOT_FOUND,
            JobServiceError::Repository(_) => {
                error!(error = %self, "job storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    user: SessionUser,
    Form(form): Form<JobForm>,
) -> Result<Response, JobServiceError>
where
    R: JobRepository + 'static,
{
    let job = service.register(&user, form)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "job registered", "job": job })),
    )
        .into_response())
}

pub(crate) async fn in_progress_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    _user: SessionUser,
) -> Result<Json<serde_json::Value>, JobServiceError>
where
    R: JobRepository + 'static,
{
    Ok(Json(json!({ "jobs": service.in_progress()? })))
}

pub(crate) async fn completed_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    _user: SessionUser,
) -> Result<Json<serde_json::Value>, JobServiceError>
where
    R: JobRepository + 'static,
{
    Ok(Json(json!({ "jobs": service.completed()? })))
}

pub(crate) async fn outbox_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, JobServiceError>
where
    R: JobRepository + 'static,
{
    Ok(Json(json!({ "jobs": service.outbox(&user)? })))
}

pub(crate) async fn progress_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    _user: SessionUser,
    Path(job_code): Path<String>,
) -> Result<Json<serde_json::Value>, JobServiceError>
where
    R: JobRepository + 'static,
{
    Ok(Json(json!(service.progress(&job_code)?)))
}

pub(crate) async fn update_status_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    user: SessionUser,
    Path(job_id): Path<i64>,
    Form(form): Form<JobStatusForm>,
) -> Result<Json<serde_json::Value>, JobServiceError>
where
    R: JobRepository + 'static,
{
    let entry = service.update_status(&user, JobId(job_id), form)?;
    Ok(Json(json!({ "message": "job status updated", "entry": entry })))
}

pub(crate) async fn history_handler<R>(
    State(service): State<Arc<JobService<R>>>,
    _user: SessionUser,
    Path(job_id): Path<i64>,
) -> Result<Json<serde_json::Value>, JobServiceError>
where
    R: JobRepository + 'static,
{
    let (job, history) = service.history(JobId(job_id))?;
    Ok(Json(json!({ "job": job, "status_history": history })))
}
