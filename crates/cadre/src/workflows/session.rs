//! Cookie-keyed server-side sessions carrying the signed-in user.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::SessionConfig;

use super::accounts::domain::{Role, User, UserId, ACCOUNT_APPROVERS, REQUEST_ADMINISTRATORS};

const SESSION_USER_KEY: &str = "session_user";

/// Identity stored in the session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: UserId,
    pub roles: Vec<Role>,
    pub full_name: String,
    pub governorate: String,
}

impl SessionUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            roles: user.roles.clone(),
            full_name: user.full_name.clone(),
            governorate: user.governorate.clone(),
        }
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.roles.iter().any(|role| roles.contains(role))
    }

    pub fn can_activate_users(&self) -> bool {
        self.has_any_role(&ACCOUNT_APPROVERS)
    }

    pub fn administers_requests(&self) -> bool {
        self.has_any_role(&REQUEST_ADMINISTRATORS)
    }
}

/// Store the user under a fresh session id.
pub async fn establish(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await
}

pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(config.idle_minutes)))
}

/// Why a protected route refused to resolve the session user.
#[derive(Debug)]
pub enum SessionRejection {
    MissingLayer,
    Anonymous,
    Store(String),
}

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            SessionRejection::Anonymous => (StatusCode::UNAUTHORIZED, "please log in first".to_string()),
            SessionRejection::MissingLayer => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "session layer not configured".to_string(),
            ),
            SessionRejection::Store(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("session store unavailable: {err}"),
            ),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|_| SessionRejection::MissingLayer)?;

        match session.get::<SessionUser>(SESSION_USER_KEY).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(SessionRejection::Anonymous),
            Err(err) => {
                tracing::error!(error = %err, "failed to read session");
                Err(SessionRejection::Store(err.to_string()))
            }
        }
    }
}
