//! Driving port for signup, login, and bearer-token authentication.
//!
//! Inbound adapters call it without knowing how users are stored or how
//! tokens are signed, which keeps HTTP handler tests free of persistence.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, Identity, LoginCredentials, SignupDetails, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthCommand: Send + Sync {
    /// Register a USER account holder and sign them in.
    async fn signup(&self, details: SignupDetails) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    async fn login(&self, credentials: LoginCredentials) -> Result<AuthSession, Error>;

    /// Load the caller's own profile.
    async fn current_user(&self, identity: &Identity) -> Result<User, Error>;

    /// Verify a bearer token.
    fn authenticate(&self, token: &str) -> Result<Identity, Error>;
}
