use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tower_sessions::Session;
use tracing::error;

use super::domain::{LoginForm, SignupForm, UserId};
use super::repository::UserRepository;
use super::service::{AccountError, AccountService};
use crate::workflows::session::{self, SessionUser};

/// Router builder exposing sign-up, login and account administration endpoints.
pub fn account_router<R>(service: Arc<AccountService<R>>) -> Router
where
    R: UserRepository + 'static,
{
    Router::new()
        .route("/signup", post(signup_handler::<R>))
        .route("/login", post(login_handler::<R>))
        .route("/logout", get(logout_handler).post(logout_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/profile", get(profile_handler))
        .route("/pending_users", get(pending_users_handler::<R>))
        .route("/activate_user/:user_id", post(activate_handler::<R>))
        .with_state(service)
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = match &self {
            AccountError::MissingField(_) | AccountError::PasswordMismatch => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AccountError::EmailTaken => StatusCode::CONFLICT,
            AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AccountError::Inactive | AccountError::Forbidden => StatusCode::FORBIDDEN,
            AccountError::UserNotFound => StatusCode::NOT_FOUND,
            AccountError::Password(_) | AccountError::Repository(_) => {
                error!(error = %self, "account operation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub(crate) async fn signup_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    Form(form): Form<SignupForm>,
) -> Result<Response, AccountError>
where
    R: UserRepository + 'static,
{
    let user = service.signup(form)?;
    let message = if user.active {
        "registration complete; you can now log in"
    } else {
        "registration complete; wait for an administrator to activate your account"
    };
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": message, "user": user })),
    )
        .into_response())
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AccountError>
where
    R: UserRepository + 'static,
{
    let user = service.login(&form)?;
    if let Err(err) = session::establish(&session, &user).await {
        error!(error = %err, "failed to persist login session");
        return Ok(session_failure());
    }
    Ok((
        StatusCode::OK,
        Json(json!({ "message": "logged in", "user": user })),
    )
        .into_response())
}

pub(crate) async fn logout_handler(session: Session) -> Response {
    match session::clear(&session).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "message": "logged out" }))).into_response(),
        Err(err) => {
            error!(error = %err, "failed to clear session");
            session_failure()
        }
    }
}

pub(crate) async fn dashboard_handler(user: SessionUser) -> Json<serde_json::Value> {
    Json(json!({
        "full_name": user.full_name,
        "roles": user.roles,
        "governorate": user.governorate,
        "capabilities": {
            "activate_users": user.can_activate_users(),
            "administer_requests": user.administers_requests(),
        },
    }))
}

pub(crate) async fn profile_handler(user: SessionUser) -> Json<serde_json::Value> {
    Json(json!({
        "user_id": user.user_id,
        "full_name": user.full_name,
        "roles": user.roles,
    }))
}

pub(crate) async fn pending_users_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    user: SessionUser,
) -> Result<Json<serde_json::Value>, AccountError>
where
    R: UserRepository + 'static,
{
    let pending = service.pending_users(&user)?;
    Ok(Json(json!({ "pending_users": pending })))
}

pub(crate) async fn activate_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    user: SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AccountError>
where
    R: UserRepository + 'static,
{
    let activated = service.activate(&user, UserId(user_id))?;
    Ok(Json(json!({
        "message": format!("activated {}", activated.full_name),
        "user": activated,
    })))
}

fn session_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "session store unavailable" })),
    )
        .into_response()
}
