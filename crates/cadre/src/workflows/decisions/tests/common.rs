use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::workflows::accounts::{Role, UserId};
use crate::workflows::decisions::domain::{
    AppointmentDecision, AppointmentRecord, CommitteeDecision, CommitteeRecord, DecisionKind,
    DecisionStatus, NewDecision, RecordMeta,
};
use crate::workflows::decisions::repository::DecisionRepository;
use crate::workflows::decisions::{decision_router, DecisionService};
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::{self, SessionUser};

#[derive(Default)]
struct Tables {
    next_id: i64,
    committees: Vec<CommitteeRecord>,
    appointments: Vec<AppointmentRecord>,
}

/// Decision store keeping rows in insertion order; listings reverse it.
#[derive(Default, Clone)]
pub(super) struct MemoryDecisions {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDecisions {
    fn meta(tables: &mut Tables, user_id: UserId, governorate: String, status: DecisionStatus) -> RecordMeta {
        tables.next_id += 1;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).single().expect("valid timestamp");
        RecordMeta {
            id: tables.next_id,
            user_id,
            governorate,
            status,
            created_at: base + Duration::minutes(tables.next_id),
        }
    }

    pub(super) fn committee_count(&self) -> usize {
        self.tables.lock().expect("decisions mutex poisoned").committees.len()
    }
}

impl DecisionRepository for MemoryDecisions {
    fn insert_committee(
        &self,
        decision: NewDecision<CommitteeDecision>,
    ) -> Result<CommitteeRecord, RepositoryError> {
        let mut tables = self.tables.lock().expect("decisions mutex poisoned");
        let meta = Self::meta(&mut tables, decision.user_id, decision.governorate, decision.status);
        let record = CommitteeRecord {
            meta,
            decision: decision.decision,
        };
        tables.committees.push(record.clone());
        Ok(record)
    }

    fn insert_appointment(
        &self,
        decision: NewDecision<AppointmentDecision>,
    ) -> Result<AppointmentRecord, RepositoryError> {
        let mut tables = self.tables.lock().expect("decisions mutex poisoned");
        let meta = Self::meta(&mut tables, decision.user_id, decision.governorate, decision.status);
        let record = AppointmentRecord {
            meta,
            decision: decision.decision,
        };
        tables.appointments.push(record.clone());
        Ok(record)
    }

    fn committees_by_status(
        &self,
        owner: UserId,
        status: DecisionStatus,
    ) -> Result<Vec<CommitteeRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("decisions mutex poisoned");
        Ok(tables
            .committees
            .iter()
            .rev()
            .filter(|record| record.meta.user_id == owner && record.meta.status == status)
            .cloned()
            .collect())
    }

    fn appointments_by_status(
        &self,
        owner: UserId,
        status: DecisionStatus,
    ) -> Result<Vec<AppointmentRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("decisions mutex poisoned");
        Ok(tables
            .appointments
            .iter()
            .rev()
            .filter(|record| record.meta.user_id == owner && record.meta.status == status)
            .cloned()
            .collect())
    }

    fn committee(&self, id: i64) -> Result<Option<CommitteeRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("decisions mutex poisoned");
        Ok(tables.committees.iter().find(|record| record.meta.id == id).cloned())
    }

    fn appointment(&self, id: i64) -> Result<Option<AppointmentRecord>, RepositoryError> {
        let tables = self.tables.lock().expect("decisions mutex poisoned");
        Ok(tables.appointments.iter().find(|record| record.meta.id == id).cloned())
    }

    fn delete_draft(
        &self,
        owner: UserId,
        kind: DecisionKind,
        decision_number: &str,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.lock().expect("decisions mutex poisoned");
        let matches = |meta: &RecordMeta, number: &str| {
            meta.user_id == owner && meta.status == DecisionStatus::Draft && number == decision_number
        };
        let position = match kind {
            DecisionKind::Committee => tables
                .committees
                .iter()
                .rposition(|record| matches(&record.meta, &record.decision.decision_number)),
            DecisionKind::Appointment => tables
                .appointments
                .iter()
                .rposition(|record| matches(&record.meta, &record.decision.decision_number)),
        };
        match (kind, position) {
            (DecisionKind::Committee, Some(index)) => {
                tables.committees.remove(index);
                Ok(true)
            }
            (DecisionKind::Appointment, Some(index)) => {
                tables.appointments.remove(index);
                Ok(true)
            }
            (_, None) => Ok(false),
        }
    }
}

pub(super) fn clerk(id: i64) -> SessionUser {
    SessionUser {
        user_id: UserId(id),
        roles: vec![Role::User],
        full_name: format!("Clerk {id}"),
        governorate: "Giza".to_string(),
    }
}

pub(super) fn build_service() -> (DecisionService<MemoryDecisions>, Arc<MemoryDecisions>) {
    let repository = Arc::new(MemoryDecisions::default());
    (DecisionService::new(repository.clone()), repository)
}

/// Decision routes plus a `/test_login/:id` helper that signs in a clerk.
pub(super) fn routed(service: DecisionService<MemoryDecisions>) -> Router {
    decision_router(Arc::new(service))
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

pub(super) fn form_post(uri: &str, body: String, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).expect("request")
}

pub(super) fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub(super) fn encode_form(fields: &std::collections::HashMap<String, String>) -> String {
    serde_urlencoded::to_string(fields).expect("encode form")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
