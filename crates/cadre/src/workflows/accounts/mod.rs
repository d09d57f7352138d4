//! Portal accounts: self-registration, login, and activation by approvers.

pub mod domain;
pub mod password;
pub mod repository;
pub mod router;
mod seed;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{LoginForm, NewUser, Role, SignupForm, User, UserId, UserView};
pub use repository::UserRepository;
pub use router::account_router;
pub use service::{AccountError, AccountService, SignupPolicy};
