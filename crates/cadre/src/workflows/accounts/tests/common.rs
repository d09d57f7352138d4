use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use chrono::Utc;
use serde_json::Value;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::workflows::accounts::domain::{NewUser, Role, User, UserId};
use crate::workflows::accounts::password::hash_password;
use crate::workflows::accounts::repository::UserRepository;
use crate::workflows::accounts::{account_router, AccountService, SignupForm, SignupPolicy};
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::SessionUser;

#[derive(Default, Clone)]
pub(super) struct MemoryUsers {
    pub(super) users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUsers {
    pub(super) fn with_account(&self, email: &str, password: &str, role: Role, active: bool) -> User {
        self.insert_user(NewUser {
            full_name: format!("{role:?} account"),
            email: email.to_string(),
            password_hash: hash_password(password).expect("hash password"),
            roles: vec![role],
            governorate: "Cairo".to_string(),
            active,
        })
        .expect("insert account")
    }
}

impl UserRepository for MemoryUsers {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        if guard.iter().any(|existing| existing.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        let stored = User {
            id: UserId(guard.len() as i64 + 1),
            full_name: user.full_name,
            email: user.email,
            password_hash: user.password_hash,
            roles: user.roles,
            governorate: user.governorate,
            active: user.active,
            created_at: Utc::now(),
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.iter().find(|user| user.id == id).cloned())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.iter().find(|user| user.email == email).cloned())
    }

    fn inactive_users(&self) -> Result<Vec<User>, RepositoryError> {
        let guard = self.users.lock().expect("users mutex poisoned");
        Ok(guard.iter().filter(|user| !user.active).cloned().collect())
    }

    fn set_active(&self, id: UserId, active: bool) -> Result<(), RepositoryError> {
        let mut guard = self.users.lock().expect("users mutex poisoned");
        match guard.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.active = active;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn user_count(&self) -> Result<usize, RepositoryError> {
        Ok(self.users.lock().expect("users mutex poisoned").len())
    }
}

pub(super) struct UnavailableUsers;

impl UserRepository for UnavailableUsers {
    fn insert_user(&self, _user: NewUser) -> Result<User, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn user(&self, _id: UserId) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn user_by_email(&self, _email: &str) -> Result<Option<User>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn inactive_users(&self) -> Result<Vec<User>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_active(&self, _id: UserId, _active: bool) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn user_count(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service(auto_activate: bool) -> (AccountService<MemoryUsers>, Arc<MemoryUsers>) {
    let repository = Arc::new(MemoryUsers::default());
    let service = AccountService::new(repository.clone(), SignupPolicy { auto_activate });
    (service, repository)
}

pub(super) fn signup_form(email: &str) -> SignupForm {
    SignupForm {
        username: "Mona Adel".to_string(),
        password: "s3cret-pass".to_string(),
        confirm_password: "s3cret-pass".to_string(),
        email: email.to_string(),
        governorate: "Giza".to_string(),
    }
}

pub(super) fn session_user(user: &User) -> SessionUser {
    SessionUser::from_user(user)
}

pub(super) fn routed(service: AccountService<MemoryUsers>) -> Router {
    account_router(Arc::new(service)).layer(SessionManagerLayer::new(MemoryStore::default()))
}

pub(super) fn form_post(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub(super) fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// `name=value` pair of the session cookie set by a response.
pub(super) fn session_cookie(response: &Response) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie set")
        .to_str()
        .expect("ascii cookie");
    raw.split(';').next().unwrap_or_default().to_string()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
