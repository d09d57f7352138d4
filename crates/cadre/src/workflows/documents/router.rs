use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::renderer::{PdfRenderer, RenderError};
use super::service::{DocumentService, RenderedDocument};
use crate::workflows::attachments::{file_response, Disposition};
use crate::workflows::decisions::{
    DecisionKind, DecisionRepository, DecisionService, DecisionServiceError,
};
use crate::workflows::session::SessionUser;

pub(crate) struct DocumentRoutes<R, P> {
    decisions: Arc<DecisionService<R>>,
    documents: Arc<DocumentService<P>>,
}

impl<R, P> Clone for DocumentRoutes<R, P> {
    fn clone(&self) -> Self {
        Self {
            decisions: Arc::clone(&self.decisions),
            documents: Arc::clone(&self.documents),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PdfQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Router builder exposing PDF renditions of the signed-in user's decisions.
pub fn document_router<R, P>(
    decisions: Arc<DecisionService<R>>,
    documents: Arc<DocumentService<P>>,
) -> Router
where
    R: DecisionRepository + 'static,
    P: PdfRenderer + 'static,
{
    Router::new()
        .route("/view_pdf", get(inline_pdf_handler::<R, P>))
        .route("/print_pdf", get(inline_pdf_handler::<R, P>))
        .route("/download_pdf", get(download_pdf_handler::<R, P>))
        .route("/decision_pdf/:kind/:id", get(decision_pdf_handler::<R, P>))
        .with_state(DocumentRoutes {
            decisions,
            documents,
        })
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("unknown decision type `{0}`")]
    UnknownKind(String),
    #[error(transparent)]
    Decision(#[from] DecisionServiceError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for DocumentError {
    fn into_response(self) -> Response {
        match self {
            DocumentError::Decision(err) => err.into_response(),
            DocumentError::UnknownKind(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            DocumentError::Render(_) => {
                error!(error = %self, "pdf fallback page failed to render");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "unable to produce the pdf document" })),
                )
                    .into_response()
            }
        }
    }
}

fn parse_kind(raw: Option<&str>) -> Result<DecisionKind, DocumentError> {
    match raw {
        None | Some("") => Ok(DecisionKind::Committee),
        Some(value) => {
            DecisionKind::parse(value).ok_or_else(|| DocumentError::UnknownKind(value.to_string()))
        }
    }
}

async fn latest_pdf<R, P>(
    routes: &DocumentRoutes<R, P>,
    user: &SessionUser,
    query: &PdfQuery,
    disposition: Disposition,
) -> Result<Response, DocumentError>
where
    R: DecisionRepository + 'static,
    P: PdfRenderer + 'static,
{
    let kind = parse_kind(query.kind.as_deref())?;
    let record = routes.decisions.latest_created(user, kind)?;
    let document = routes.documents.render_decision(record.as_ref()).await?;
    Ok(pdf_response(document, disposition))
}

pub(crate) async fn inline_pdf_handler<R, P>(
    State(routes): State<DocumentRoutes<R, P>>,
    user: SessionUser,
    Query(query): Query<PdfQuery>,
) -> Result<Response, DocumentError>
where
    R: DecisionRepository + 'static,
    P: PdfRenderer + 'static,
{
    latest_pdf(&routes, &user, &query, Disposition::Inline).await
}

pub(crate) async fn download_pdf_handler<R, P>(
    State(routes): State<DocumentRoutes<R, P>>,
    user: SessionUser,
    Query(query): Query<PdfQuery>,
) -> Result<Response, DocumentError>
where
    R: DecisionRepository + 'static,
    P: PdfRenderer + 'static,
{
    latest_pdf(&routes, &user, &query, Disposition::Attachment).await
}

pub(crate) async fn decision_pdf_handler<R, P>(
    State(routes): State<DocumentRoutes<R, P>>,
    user: SessionUser,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Response, DocumentError>
where
    R: DecisionRepository + 'static,
    P: PdfRenderer + 'static,
{
    let kind = parse_kind(Some(&kind))?;
    let record = routes.decisions.find_owned(&user, kind, id)?;
    let document = routes.documents.render_decision(Some(&record)).await?;
    Ok(pdf_response(document, Disposition::Attachment))
}

fn pdf_response(document: RenderedDocument, disposition: Disposition) -> Response {
    file_response(document.bytes, &document.filename, disposition)
}
