use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::storage::SqliteStore;
use crate::workflows::accounts::domain::NewUser;
use crate::workflows::accounts::{Role, UserId, UserRepository};
use crate::workflows::attachments::{FileStore, MultipartForm, UploadedFile};
use crate::workflows::requests::{request_router, RequestService};
use crate::workflows::session::{self, SessionUser};

pub(super) const CLERK: i64 = 1;
pub(super) const COLLEAGUE: i64 = 2;
pub(super) const GOVERNOR: i64 = 3;

pub(super) type Service = RequestService<SqliteStore, SqliteStore>;

/// Everything a request test needs; the temp dir guard must outlive the store.
pub(super) struct Fixture {
    pub(super) service: Service,
    pub(super) files: Arc<FileStore>,
    _dir: TempDir,
}

fn role_of(id: i64) -> Role {
    if id == GOVERNOR {
        Role::Governor
    } else {
        Role::User
    }
}

pub(super) fn fixture() -> Fixture {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    for id in [CLERK, COLLEAGUE, GOVERNOR] {
        store
            .insert_user(NewUser {
                full_name: format!("Portal user {id}"),
                email: format!("user{id}@giza.gov.eg"),
                password_hash: "unused".to_string(),
                roles: vec![role_of(id)],
                governorate: "Giza".to_string(),
                active: true,
            })
            .expect("user stored");
    }
    let store = Arc::new(store);
    let dir = tempfile::tempdir().expect("temp dir");
    let files = Arc::new(FileStore::new(dir.path().join("uploads")));
    Fixture {
        service: RequestService::new(store.clone(), store, files.clone()),
        files,
        _dir: dir,
    }
}

pub(super) fn actor(id: i64) -> SessionUser {
    SessionUser {
        user_id: UserId(id),
        roles: vec![role_of(id)],
        full_name: format!("Portal user {id}"),
        governorate: "Giza".to_string(),
    }
}

/// Leave request form with the given attachments sent as `attachments` parts.
pub(super) fn leave_form(files: &[(&str, &[u8])]) -> MultipartForm {
    let mut form = MultipartForm::default();
    for (name, value) in [
        ("request_type", "leave"),
        ("title", "Annual leave"),
        ("description", "Two weeks in August"),
    ] {
        form.fields.insert(name.to_string(), value.to_string());
    }
    form.files = files
        .iter()
        .map(|(file_name, bytes)| UploadedFile {
            field: "attachments".to_string(),
            file_name: file_name.to_string(),
            bytes: bytes.to_vec(),
        })
        .collect();
    form
}

/// Request routes plus a `/test_login/:id` helper.
pub(super) fn routed(service: Service) -> Router {
    request_router(Arc::new(service))
        .route(
            "/test_login/:id",
            get(
                |session: Session, axum::extract::Path(id): axum::extract::Path<i64>| async move {
                    session::establish(&session, &actor(id))
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

const BOUNDARY: &str = "cadre-request-boundary";

pub(super) fn multipart_post(
    uri: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &[u8])],
    cookie: &str,
) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"attachments\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .expect("request")
}

pub(super) fn form_post(uri: &str, fields: &[(&str, &str)], cookie: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(
            serde_urlencoded::to_string(fields).expect("encode form"),
        ))
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
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
