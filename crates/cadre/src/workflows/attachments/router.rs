use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::multipart::read_multipart;
use super::response::{file_response, Disposition};
use super::store::{AttachmentError, FileStore};
use crate::workflows::session::SessionUser;

/// Router builder for generic uploads and downloads under the uploads root.
pub fn attachment_router(store: Arc<FileStore>) -> Router {
    Router::new()
        .route("/upload_file", post(upload_handler))
        .route("/download_file/*path", get(download_handler))
        .with_state(store)
}

impl IntoResponse for AttachmentError {
    fn into_response(self) -> Response {
        let status = match &self {
            AttachmentError::MissingFile
            | AttachmentError::Multipart(_)
            | AttachmentError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            AttachmentError::NotAllowed(_) | AttachmentError::InvalidName(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AttachmentError::NotFound(_) => StatusCode::NOT_FOUND,
            AttachmentError::Io(_) => {
                error!(error = %self, "attachment storage failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn upload_handler(
    State(store): State<Arc<FileStore>>,
    user: SessionUser,
    multipart: Multipart,
) -> Result<Response, AttachmentError> {
    let form = read_multipart(multipart).await?;
    let file = form
        .files_named("file")
        .next()
        .ok_or(AttachmentError::MissingFile)?;

    let stored = store
        .save(&file.file_name, form.text("folder"), &file.bytes)
        .await
        .inspect_err(|err| warn!(error = %err, user = %user.full_name, "upload rejected"))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "filename": stored, "message": "file uploaded" })),
    )
        .into_response())
}

pub(crate) async fn download_handler(
    State(store): State<Arc<FileStore>>,
    _user: SessionUser,
    Path(path): Path<String>,
) -> Result<Response, AttachmentError> {
    let bytes = store.read(&path).await?;
    Ok(file_response(bytes, &path, Disposition::Attachment))
}
