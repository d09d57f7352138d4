use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::workflows::accounts::{Role, UserId};
use crate::workflows::attachments::{attachment_router, FileStore};
use crate::workflows::session::{self, SessionUser};

pub(super) const BOUNDARY: &str = "cadre-test-boundary";

/// File store rooted in a fresh temporary directory; keep the guard alive.
pub(super) fn temp_store() -> (FileStore, TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    (FileStore::new(dir.path().join("uploads")), dir)
}

fn clerk(id: i64) -> SessionUser {
    SessionUser {
        user_id: UserId(id),
        roles: vec![Role::User],
        full_name: format!("Clerk {id}"),
        governorate: "Giza".to_string(),
    }
}

pub(super) fn routed(store: FileStore) -> Router {
    attachment_router(Arc::new(store))
        .route(
            "/test_login/:id",
            get(
                |session: Session, axum::extract::Path(id): axum::extract::Path<i64>| async move {
                    session::establish(&session, &clerk(id))
                        .await
                        .expect("establish session");
                },
            ),
        )
        .layer(SessionManagerLayer::new(MemoryStore::default()))
}

pub(super) async fn login_cookie(router: &Router, user_id: i64) -> String {
    use tower::ServiceExt;

    let response = router
        .clone()
        .oneshot(get_request(&format!("/test_login/{user_id}"), None))
        .await
        .expect("login executes");
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .expect("ascii cookie");
    raw.split(';').next().unwrap_or_default().to_string()
}

/// One part of a hand-built multipart body.
pub(super) enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub(super) fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_post(uri: &str, parts: &[Part<'_>], cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(multipart_body(parts)))
        .expect("request")
}

pub(super) fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
