use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::Value;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::storage::SqliteStore;
use crate::workflows::accounts::domain::NewUser;
use crate::workflows::accounts::{Role, UserId, UserRepository};
use crate::workflows::jobs::domain::{Job, JobId, JobState, JobStatusEntry, NewJob, NewJobStatus};
use crate::workflows::jobs::{job_router, JobForm, JobRepository, JobService};
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::{self, SessionUser};

/// Job repository whose backing database is offline.
pub(super) struct UnavailableJobs;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl JobRepository for UnavailableJobs {
    fn insert_job(&self, _job: NewJob) -> Result<Job, RepositoryError> {
        offline()
    }

    fn job(&self, _id: JobId) -> Result<Option<Job>, RepositoryError> {
        offline()
    }

    fn job_by_code(&self, _code: &str) -> Result<Option<Job>, RepositoryError> {
        offline()
    }

    fn jobs_by_status(&self, _status: JobState) -> Result<Vec<Job>, RepositoryError> {
        offline()
    }

    fn jobs_by_owner(&self, _owner: UserId) -> Result<Vec<Job>, RepositoryError> {
        offline()
    }

    fn record_status(&self, _entry: NewJobStatus) -> Result<JobStatusEntry, RepositoryError> {
        offline()
    }

    fn status_history(&self, _id: JobId) -> Result<Vec<JobStatusEntry>, RepositoryError> {
        offline()
    }
}

/// In-memory SQLite store with HR officers 1 and 2 registered.
pub(super) fn seeded_store() -> Arc<SqliteStore> {
    let store = SqliteStore::open_in_memory().expect("in-memory store");
    for id in 1..=2 {
        store
            .insert_user(NewUser {
                full_name: format!("HR officer {id}"),
                email: format!("hr{id}@giza.gov.eg"),
                password_hash: "unused".to_string(),
                roles: vec![Role::User],
                governorate: "Giza".to_string(),
                active: true,
            })
            .expect("officer stored");
    }
    Arc::new(store)
}

pub(super) fn officer(id: i64) -> SessionUser {
    SessionUser {
        user_id: UserId(id),
        roles: vec![Role::User],
        full_name: format!("HR officer {id}"),
        governorate: "Giza".to_string(),
    }
}

pub(super) fn job_form(code: &str) -> JobForm {
    JobForm {
        job_title: "مدير مديرية".to_string(),
        job_code: code.to_string(),
        job_description: "Head of the housing directorate".to_string(),
        deadline: "2024-06-30".to_string(),
    }
}

pub(super) fn build_service() -> (JobService<SqliteStore>, Arc<SqliteStore>) {
    let store = seeded_store();
    (JobService::new(store.clone()), store)
}

/// Job routes plus a `/test_login/:id` helper that signs in an officer.
pub(super) fn routed<R>(service: JobService<R>) -> Router
where
    R: JobRepository + 'static,
{
    job_router(Arc::new(service))
        .route(
            "/test_login/:id",
            get(
                |session: Session, axum::extract::Path(id): axum::extract::Path<i64>| async move {
                    session::establish(&session, &officer(id))
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

pub(super) fn form_post(uri: &str, body: &[(&str, &str)], cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let encoded = serde_urlencoded::to_string(body).expect("encode form");
    builder.body(Body::from(encoded)).expect("request")
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
