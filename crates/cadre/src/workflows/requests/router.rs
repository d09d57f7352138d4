use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tracing::error;

use super::domain::{ForwardForm, NotesForm, ProcessForm, RequestId, ReturnForm};
use super::repository::RequestRepository;
use super::service::{RequestService, RequestServiceError};
use crate::workflows::accounts::UserRepository;
use crate::workflows::attachments::{
    file_response, is_inline_type, read_multipart, AttachmentError, Disposition,
};
use crate::workflows::session::SessionUser;

/// Router builder for service requests and their attachments.
pub fn request_router<R, U>(service: Arc<RequestService<R, U>>) -> Router
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    Router::new()
        .route("/submit_request", post(submit_handler::<R, U>))
        .route("/update_request/:id", post(update_handler::<R, U>))
        .route("/process_request/:id", post(process_handler::<R, U>))
        .route("/forward_request/:id", post(forward_handler::<R, U>))
        .route("/return_request/:id", post(return_handler::<R, U>))
        .route("/save_request/:id", post(save_handler::<R, U>))
        .route("/get_requests", get(list_handler::<R, U>))
        .route("/inbox", get(inbox_handler::<R, U>))
        .route(
            "/view_attachment/:request_id/*filename",
            get(view_attachment_handler::<R, U>),
        )
        .route(
            "/download_attachment/:request_id/*filename",
            get(download_attachment_handler::<R, U>),
        )
        .with_state(service)
}

impl IntoResponse for RequestServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            RequestServiceError::Attachment(AttachmentError::NotFound(_)) => StatusCode::NOT_FOUND,
            RequestServiceError::Attachment(AttachmentError::Io(_))
            | RequestServiceError::Repository(_) => {
                error!(error = %self, "request storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RequestServiceError::Attachment(
                AttachmentError::NotAllowed(_) | AttachmentError::InvalidName(_),
            ) => StatusCode::UNPROCESSABLE_ENTITY,
            RequestServiceError::Attachment(_) => StatusCode::BAD_REQUEST,
            RequestServiceError::MissingField(_)
            | RequestServiceError::InvalidDate(_)
            | RequestServiceError::InvalidStatus(_)
            | RequestServiceError::InvalidRecipient(_)
            | RequestServiceError::RecipientNotFound => StatusCode::UNPROCESSABLE_ENTITY,
            RequestServiceError::RequestNotFound | RequestServiceError::AttachmentNotFound => {
                StatusCode::NOT_FOUND
            }
            RequestServiceError::Forbidden => StatusCode::FORBIDDEN,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

type Shared<R, U> = State<Arc<RequestService<R, U>>>;

pub(crate) async fn submit_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    multipart: Multipart,
) -> Result<Response, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let form = read_multipart(multipart).await?;
    let request = service.submit(&user, form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "request submitted", "request": request })),
    )
        .into_response())
}

pub(crate) async fn update_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let form = read_multipart(multipart).await?;
    let request = service.update(&user, RequestId(id), form).await?;
    Ok(Json(json!({ "message": "request updated", "request": request })))
}

pub(crate) async fn process_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<ProcessForm>,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let request = service.process(&user, RequestId(id), form)?;
    Ok(Json(json!({
        "message": format!("request {}", request.status.as_str()),
        "request": request,
    })))
}

pub(crate) async fn forward_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<ForwardForm>,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let forward = service.forward(&user, RequestId(id), form)?;
    Ok(Json(json!({ "message": "request forwarded", "forward": forward })))
}

pub(crate) async fn return_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<ReturnForm>,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let entry = service.return_to_owner(&user, RequestId(id), form)?;
    Ok(Json(json!({ "message": "request returned", "return": entry })))
}

pub(crate) async fn save_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path(id): Path<i64>,
    Form(form): Form<NotesForm>,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let request = service.save_notes(&user, RequestId(id), form)?;
    Ok(Json(json!({ "message": "request saved", "request": request })))
}

pub(crate) async fn list_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    Ok(Json(json!({ "data": service.list(&user)? })))
}

pub(crate) async fn inbox_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    Ok(Json(json!(service.inbox(&user).await?)))
}

pub(crate) async fn view_attachment_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path((request_id, filename)): Path<(i64, String)>,
) -> Result<Response, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let bytes = service
        .attachment(&user, RequestId(request_id), &filename)
        .await?;
    let disposition = if is_inline_type(&filename) {
        Disposition::Inline
    } else {
        Disposition::Attachment
    };
    Ok(file_response(bytes, &filename, disposition))
}

pub(crate) async fn download_attachment_handler<R, U>(
    State(service): Shared<R, U>,
    user: SessionUser,
    Path((request_id, filename)): Path<(i64, String)>,
) -> Result<Response, RequestServiceError>
where
    R: RequestRepository + 'static,
    U: UserRepository + 'static,
{
    let bytes = service
        .attachment(&user, RequestId(request_id), &filename)
        .await?;
    Ok(file_response(bytes, &filename, Disposition::Attachment))
}
