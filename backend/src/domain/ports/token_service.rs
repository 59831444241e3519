//! Port for issuing and verifying signed access tokens.

use crate::domain::{AccessToken, Identity};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token adapters.
    pub enum TokenError {
        /// Signature, format, or claim check failed.
        Invalid { message: String } => "invalid access token: {message}",
        /// The token is past its expiry.
        Expired => "access token expired",
        /// Signing a new token failed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Port for stateless bearer tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the identity's claims.
    fn issue(&self, identity: &Identity) -> Result<AccessToken, TokenError>;

    /// Verify a token and recover the identity it carries.
    fn verify(&self, token: &str) -> Result<Identity, TokenError>;
}
