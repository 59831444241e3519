//! Driving port for the administrative user directory.

use async_trait::async_trait;

use crate::domain::{Error, Identity, SignupDetails, User, UserId};

/// Domain use-case port for managing registered users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create a USER without signing them in; ADMIN only.
    async fn create_user(&self, actor: &Identity, details: SignupDetails) -> Result<User, Error>;

    /// List every user; ADMIN only.
    async fn list_users(&self, actor: &Identity) -> Result<Vec<User>, Error>;

    /// Fetch one user, visible to that user or an admin.
    async fn user(&self, actor: &Identity, id: &UserId) -> Result<User, Error>;
}
