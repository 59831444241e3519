//! Authentication service implementing the [`AuthCommand`] driving port.
//!
//! Signup and login both end in a freshly issued access token. Unknown
//! emails and wrong passwords fail with the same message so callers cannot
//! discover which addresses are registered.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::port_error_mapping::{
    DUPLICATE_EMAIL_MESSAGE, map_hash_error, map_token_error, map_user_persistence_error,
};
use crate::domain::ports::{AuthCommand, PasswordHasher, TokenService, UserRepository};
use crate::domain::{
    AuthSession, Error, Identity, LoginCredentials, NewUser, Role, SignupDetails, User,
};

const INVALID_CREDENTIALS: &str = "Invalid Credentials";
pub(crate) const USER_NOT_FOUND: &str = "User not found.";

/// Authentication service backed by a user repository, a password hasher,
/// and a token signer.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    /// Create the service from its driven ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let identity = Identity::new(user.id, user.role);
        let access_token = self.tokens.issue(&identity).map_err(map_token_error)?;
        Ok(AuthSession { access_token, user })
    }
}

#[async_trait]
impl AuthCommand for AuthService {
    async fn signup(&self, details: SignupDetails) -> Result<AuthSession, Error> {
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

        info!(user_id = %user.id, "user signed up");
        self.session_for(user)
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error> {
        let Some(stored) = self
            .users
            .find_by_email(&credentials.email)
            .await
            .map_err(map_user_persistence_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(&credentials.password, &stored.password_hash)
            .await
            .map_err(map_hash_error)?;
        if !matches {
            warn!(user_id = %stored.user.id, "login rejected");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        self.session_for(stored.user)
    }

    async fn current_user(&self, identity: &Identity) -> Result<User, Error> {
        self.users
            .find_by_id(&identity.user_id)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    fn authenticate(&self, token: &str) -> Result<Identity, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }
}
