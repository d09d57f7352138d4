use super::common::*;
use crate::workflows::accounts::domain::{LoginForm, Role, UserId};
use crate::workflows::accounts::repository::UserRepository;
use crate::workflows::accounts::{AccountError, AccountService, SignupPolicy};
use std::sync::Arc;

#[test]
fn signup_creates_inactive_user_account() {
    let (service, repository) = build_service(false);

    let view = service
        .signup(signup_form(" Mona@Example.com "))
        .expect("signup succeeds");

    assert_eq!(view.email, "mona@example.com");
    assert_eq!(view.roles, vec![Role::User]);
    assert!(!view.active);
    let stored = repository
        .user_by_email("mona@example.com")
        .expect("lookup")
        .expect("stored");
    assert_ne!(stored.password_hash, "s3cret-pass");
}

#[test]
fn signup_policy_can_auto_activate() {
    let (service, _) = build_service(true);
    let view = service
        .signup(signup_form("auto@example.com"))
        .expect("signup succeeds");
    assert!(view.active);
}

#[test]
fn signup_rejects_mismatched_confirmation() {
    let (service, repository) = build_service(false);
    let mut form = signup_form("mona@example.com");
    form.confirm_password = "different".to_string();

    match service.signup(form) {
        Err(AccountError::PasswordMismatch) => {}
        other => panic!("expected mismatch, got {other:?}"),
    }
    assert_eq!(repository.user_count().expect("count"), 0);
}

#[test]
fn signup_rejects_blank_fields() {
    let (service, _) = build_service(false);
    let mut form = signup_form("mona@example.com");
    form.governorate = "   ".to_string();

    match service.signup(form) {
        Err(AccountError::MissingField("governorate")) => {}
        other => panic!("expected missing governorate, got {other:?}"),
    }
}

#[test]
fn signup_rejects_duplicate_email() {
    let (service, _) = build_service(false);
    service
        .signup(signup_form("mona@example.com"))
        .expect("first signup");

    match service.signup(signup_form("MONA@example.com")) {
        Err(AccountError::EmailTaken) => {}
        other => panic!("expected email taken, got {other:?}"),
    }
}

#[test]
fn login_refuses_inactive_accounts_after_checking_password() {
    let (service, repository) = build_service(false);
    repository.with_account("clerk@example.com", "pass123", Role::User, false);

    let wrong = service.login(&LoginForm {
        email: "clerk@example.com".to_string(),
        password: "nope".to_string(),
    });
    assert!(matches!(wrong, Err(AccountError::InvalidCredentials)));

    let right = service.login(&LoginForm {
        email: "clerk@example.com".to_string(),
        password: "pass123".to_string(),
    });
    assert!(matches!(right, Err(AccountError::Inactive)));
}

#[test]
fn login_returns_session_identity() {
    let (service, repository) = build_service(false);
    let user = repository.with_account("gov@example.com", "pass123", Role::Governor, true);

    let session = service
        .login(&LoginForm {
            email: "GOV@example.com".to_string(),
            password: "pass123".to_string(),
        })
        .expect("login succeeds");

    assert_eq!(session.user_id, user.id);
    assert!(session.can_activate_users());
}

#[test]
fn only_approvers_activate_accounts() {
    let (service, repository) = build_service(false);
    let clerk = repository.with_account("clerk@example.com", "pass123", Role::User, true);
    let central = repository.with_account("central@example.com", "pass123", Role::CentralAdmin, true);
    let admin = repository.with_account("admin@example.com", "pass123", Role::GeneralAdmin, true);
    let pending = repository.with_account("new@example.com", "pass123", Role::User, false);

    for actor in [&clerk, &central] {
        match service.activate(&session_user(actor), pending.id) {
            Err(AccountError::Forbidden) => {}
            other => panic!("expected forbidden, got {other:?}"),
        }
    }

    let listed = service
        .pending_users(&session_user(&admin))
        .expect("admin lists pending");
    assert_eq!(listed.len(), 1);

    let activated = service
        .activate(&session_user(&admin), pending.id)
        .expect("admin activates");
    assert!(activated.active);
    assert!(service
        .pending_users(&session_user(&admin))
        .expect("list")
        .is_empty());
}

#[test]
fn activating_unknown_user_is_not_found() {
    let (service, repository) = build_service(false);
    let admin = repository.with_account("admin@example.com", "pass123", Role::GeneralAdmin, true);

    match service.activate(&session_user(&admin), UserId(999)) {
        Err(AccountError::UserNotFound) => {}
        other => panic!("expected user not found, got {other:?}"),
    }
}

#[test]
fn seeding_only_populates_empty_tables() {
    let (service, repository) = build_service(false);
    assert_eq!(service.seed_sample_users().expect("seed"), 5);
    assert_eq!(service.seed_sample_users().expect("reseed"), 0);
    assert_eq!(repository.user_count().expect("count"), 5);

    let admin = repository
        .user_by_email("admin@example.com")
        .expect("lookup")
        .expect("seeded admin");
    assert!(admin.active);
    assert_eq!(admin.roles, vec![Role::GeneralAdmin]);
}

#[test]
fn repository_outages_surface_as_repository_errors() {
    let service = AccountService::new(Arc::new(UnavailableUsers), SignupPolicy::default());
    match service.signup(signup_form("mona@example.com")) {
        Err(AccountError::Repository(_)) => {}
        other => panic!("expected repository error, got {other:?}"),
    }
}
