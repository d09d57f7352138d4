use std::collections::HashMap;
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

use super::domain::{DecisionKind, DecisionStatus};
use super::forms::AppointmentForm;
use super::repository::DecisionRepository;
use super::service::{DecisionService, DecisionServiceError};
use crate::workflows::session::SessionUser;

/// Router builder exposing the decision forms and draft management.
pub fn decision_router<R>(service: Arc<DecisionService<R>>) -> Router
where
    R: DecisionRepository + 'static,
{
    Router::new()
        .route(
            "/form_leadership_committee",
            get(latest_committee_handler::<R>).post(submit_committee_handler::<R>),
        )
        .route(
            "/issue_appointment_decision",
            get(latest_appointment_handler::<R>).post(submit_appointment_handler::<R>),
        )
        .route("/previous_draft", get(drafts_handler::<R>))
        .route(
            "/delete_draft/:decision_number/:draft_type",
            post(delete_draft_handler::<R>),
        )
        .with_state(service)
}

impl IntoResponse for DecisionServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            DecisionServiceError::Form(_) | DecisionServiceError::Roster(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DecisionServiceError::UnknownKind(_) => StatusCode::BAD_REQUEST,
            DecisionServiceError::DraftNotFound | DecisionServiceError::RecordNotFound => {
                StatusCode::NOT_FOUND
            }
            DecisionServiceError::Repository(_) => {
                error!(error = %self, "decision storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn latest_committee_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, DecisionServiceError>
where
    R: DecisionRepository + 'static,
{
    let latest = service.latest_created(&user, DecisionKind::Committee)?;
    Ok(Json(json!({ "latest_decision": latest })))
}

pub(crate) async fn submit_committee_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    user: SessionUser,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, DecisionServiceError>
where
    R: DecisionRepository + 'static,
{
    let record = service.submit_committee(&user, &fields)?;
    let message = status_message("committee decision", record.meta.status);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": message, "decision": record })),
    )
        .into_response())
}

pub(crate) async fn latest_appointment_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, DecisionServiceError>
where
    R: DecisionRepository + 'static,
{
    let latest = service.latest_created(&user, DecisionKind::Appointment)?;
    Ok(Json(json!({ "latest_decision": latest })))
}

pub(crate) async fn submit_appointment_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    user: SessionUser,
    Form(form): Form<AppointmentForm>,
) -> Result<Response, DecisionServiceError>
where
    R: DecisionRepository + 'static,
{
    let record = service.submit_appointment(&user, form)?;
    let message = status_message("appointment decision", record.meta.status);
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": message, "decision": record })),
    )
        .into_response())
}

pub(crate) async fn drafts_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, DecisionServiceError>
where
    R: DecisionRepository + 'static,
{
    let drafts = service.drafts(&user)?;
    Ok(Json(json!({ "drafts": drafts })))
}

pub(crate) async fn delete_draft_handler<R>(
    State(service): State<Arc<DecisionService<R>>>,
    user: SessionUser,
    Path((decision_number, draft_type)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, DecisionServiceError>
where
    R: DecisionRepository + 'static,
{
    service.delete_draft(&user, &decision_number, &draft_type)?;
    Ok(Json(json!({ "message": "draft deleted" })))
}

fn status_message(subject: &str, status: DecisionStatus) -> String {
    match status {
        DecisionStatus::Draft => format!("{subject} saved as draft"),
        DecisionStatus::Created => format!("{subject} created"),
        DecisionStatus::Referred => format!("{subject} referred"),
        DecisionStatus::Next => format!("{subject} moved to the next step"),
    }
}
