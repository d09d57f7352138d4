use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{LoginForm, NewUser, Role, SignupForm, UserId, UserView};
use super::password::{hash_password, verify_password, PasswordError};
use super::repository::UserRepository;
use super::seed::SAMPLE_ACCOUNTS;
use crate::workflows::repository::RepositoryError;
use crate::workflows::session::SessionUser;

/// Whether self-registered accounts may sign in before an approver activates them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignupPolicy {
    pub auto_activate: bool,
}

/// Registration, login and activation of portal accounts.
pub struct AccountService<R> {
    repository: Arc<R>,
    policy: SignupPolicy,
}

impl<R> AccountService<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repository: Arc<R>, policy: SignupPolicy) -> Self {
        Self { repository, policy }
    }

    /// Register a new `user`-role account.
    pub fn signup(&self, form: SignupForm) -> Result<UserView, AccountError> {
        let full_name = required("username", &form.username)?;
        let email = normalize_email(required("email", &form.email)?);
        let governorate = required("governorate", &form.governorate)?;
        if form.password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        if form.password != form.confirm_password {
            warn!(%email, "signup rejected: password confirmation mismatch");
            return Err(AccountError::PasswordMismatch);
        }

        if self.repository.user_by_email(&email)?.is_some() {
            warn!(%email, "signup rejected: email already registered");
            return Err(AccountError::EmailTaken);
        }

        let user = self
            .repository
            .insert_user(NewUser {
                full_name: full_name.to_string(),
                email,
                password_hash: hash_password(&form.password)?,
                roles: vec![Role::User],
                governorate: governorate.to_string(),
                active: self.policy.auto_activate,
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => AccountError::EmailTaken,
                other => AccountError::Repository(other),
            })?;

        info!(user_id = user.id.0, active = user.active, "registered portal account");
        Ok(user.view())
    }

    /// Check credentials; inactive accounts are refused even with a correct password.
    pub fn login(&self, form: &LoginForm) -> Result<SessionUser, AccountError> {
        let email = normalize_email(&form.email);
        let Some(user) = self.repository.user_by_email(&email)? else {
            warn!(%email, "login rejected: unknown account");
            return Err(AccountError::InvalidCredentials);
        };

        if !verify_password(&form.password, &user.password_hash)? {
            warn!(user_id = user.id.0, "login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        if !user.active {
            info!(user_id = user.id.0, "login refused: account awaiting activation");
            return Err(AccountError::Inactive);
        }

        info!(user_id = user.id.0, "user signed in");
        Ok(SessionUser::from_user(&user))
    }

    pub fn pending_users(&self, actor: &SessionUser) -> Result<Vec<UserView>, AccountError> {
        if !actor.can_activate_users() {
            return Err(AccountError::Forbidden);
        }
        Ok(self
            .repository
            .inactive_users()?
            .iter()
            .map(|user| user.view())
            .collect())
    }

    pub fn activate(&self, actor: &SessionUser, user_id: UserId) -> Result<UserView, AccountError> {
        if !actor.can_activate_users() {
            warn!(actor = actor.user_id.0, target = user_id.0, "activation refused");
            return Err(AccountError::Forbidden);
        }

        let mut user = self
            .repository
            .user(user_id)?
            .ok_or(AccountError::UserNotFound)?;
        self.repository.set_active(user_id, true)?;
        user.active = true;

        info!(
            target = user_id.0,
            actor = actor.user_id.0,
            "activated portal account"
        );
        Ok(user.view())
    }

    /// Populate an empty user table with one account per administrative role.
    pub fn seed_sample_users(&self) -> Result<usize, AccountError> {
        if self.repository.user_count()? > 0 {
            info!("user table already populated; skipping sample accounts");
            return Ok(0);
        }

        for account in SAMPLE_ACCOUNTS.iter() {
            self.repository.insert_user(NewUser {
                full_name: account.full_name.to_string(),
                email: account.email.to_string(),
                password_hash: hash_password(account.password)?,
                roles: vec![account.role],
                governorate: account.governorate.to_string(),
                active: true,
            })?;
            info!(email = account.email, "seeded sample account");
        }

        Ok(SAMPLE_ACCOUNTS.len())
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AccountError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(AccountError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Error raised by the account service.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("password and confirmation do not match")]
    PasswordMismatch,
    #[error("email address is already registered")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account is awaiting activation")]
    Inactive,
    #[error("not permitted to manage user accounts")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
