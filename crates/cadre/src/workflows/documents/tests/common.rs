use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::routing::get;
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use tower_sessions::{MemoryStore, Session, SessionManagerLayer};

use crate::workflows::accounts::{Role, UserId};
use crate::workflows::decisions::{
    AppointmentAttachments, AppointmentDecision, AppointmentRecord, DecisionStatus, RecordMeta,
};
use crate::workflows::documents::renderer::{PdfRenderer, RenderError};
use crate::workflows::session::{self, SessionUser};

/// Records every page it is asked to render and returns a fake PDF.
#[derive(Default)]
pub(super) struct StubRenderer {
    pub(super) pages: Mutex<Vec<String>>,
}

impl StubRenderer {
    pub(super) fn pages(&self) -> Vec<String> {
        self.pages.lock().expect("pages mutex poisoned").clone()
    }
}

impl PdfRenderer for StubRenderer {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        self.pages
            .lock()
            .expect("pages mutex poisoned")
            .push(html.to_string());
        Ok(b"%PDF-1.7 stub".to_vec())
    }
}

/// Fails on decision pages but renders the error page.
pub(super) struct DecisionPageFails;

impl PdfRenderer for DecisionPageFails {
    fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        if html.contains("تعذر إنشاء المستند") {
            Ok(b"%PDF-1.7 error page".to_vec())
        } else {
            Err(RenderError::EmptyOutput {
                program: "stub".to_string(),
            })
        }
    }
}

pub(super) struct AlwaysFails;

impl PdfRenderer for AlwaysFails {
    fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::EmptyOutput {
            program: "stub".to_string(),
        })
    }
}

pub(super) fn appointment_record(number: &str) -> AppointmentRecord {
    AppointmentRecord {
        meta: RecordMeta {
            id: 3,
            user_id: UserId(1),
            governorate: "Giza".to_string(),
            status: DecisionStatus::Created,
            created_at: Utc
                .with_ymd_and_hms(2024, 4, 1, 9, 30, 0)
                .single()
                .expect("valid timestamp"),
        },
        decision: AppointmentDecision {
            announcement_number: "A-4".to_string(),
            candidate_code: "<C-19>".to_string(),
            decision_number: number.to_string(),
            decision_date: NaiveDate::from_ymd_opt(2024, 4, 1).expect("valid date"),
            article_one_text: "يعين المرشح".to_string(),
            article_two_text: "يعمل به من تاريخه".to_string(),
            article_three_text: "ينشر القرار".to_string(),
            competent_authority: "المحافظ".to_string(),
            authority_approval: "معتمد".to_string(),
            files: AppointmentAttachments::default(),
        },
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

pub(super) fn with_login(router: Router) -> Router {
    router
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

pub(super) fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub(super) fn shared<P>(renderer: P) -> Arc<P> {
    Arc::new(renderer)
}
