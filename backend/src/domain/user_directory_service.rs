//! Administrative user directory service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::auth_service::USER_NOT_FOUND;
use crate::domain::port_error_mapping::{
    DUPLICATE_EMAIL_MESSAGE, map_hash_error, map_user_persistence_error,
};
use crate::domain::ports::{PasswordHasher, UserDirectory, UserRepository};
use crate::domain::{Error, Identity, NewUser, Role, SignupDetails, User, UserId};

fn require_admin(actor: &Identity) -> Result<(), Error> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(Error::forbidden("Forbidden"))
    }
}

/// Service implementing [`UserDirectory`].
#[derive(Clone)]
pub struct UserDirectoryService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserDirectoryService {
    /// Create the service from the user repository and password hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl UserDirectory for UserDirectoryService {
    async fn create_user(&self, actor: &Identity, details: SignupDetails) -> Result<User, Error> {
        require_admin(actor)?;

        let existing = self
            .users
            .find_by_email(&details.email)
            .await
            .map_err(map_user_persistence_error)?;
        if existing.is_some() {
            return Err(Error::conflict(DUPLICATE_EMAIL_MESSAGE));
        }

        let password_hash = self
            .hasher
            .hash(&details.password)
            .await
            .map_err(map_hash_error)?;
        let user = self
            .users
            .create(&NewUser {
                name: details.name,
                email: details.email,
                password_hash,
                role: Role::User,
            })
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %user.id, created_by = %actor.user_id, "user created by admin");
        Ok(user)
    }

    async fn list_users(&self, actor: &Identity) -> Result<Vec<User>, Error> {
        require_admin(actor)?;
        self.users.list().await.map_err(map_user_persistence_error)
    }

    async fn user(&self, actor: &Identity, id: &UserId) -> Result<User, Error> {
        if !actor.can_view(*id) {
            return Err(Error::forbidden("Forbidden"));
        }
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }
}
