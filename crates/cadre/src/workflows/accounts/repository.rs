use super::domain::{NewUser, User, UserId};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction for portal accounts.
pub trait UserRepository: Send + Sync {
    fn insert_user(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn user_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;
    fn inactive_users(&self) -> Result<Vec<User>, RepositoryError>;
    fn set_active(&self, id: UserId, active: bool) -> Result<(), RepositoryError>;
    fn user_count(&self) -> Result<usize, RepositoryError>;
}
