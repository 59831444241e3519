//! HS256 JSON Web Token adapter.
//!
//! Claims are `{sub, role, iat, exp}` with `sub` holding the user id as a
//! string. Expiry is checked against the injected clock rather than the
//! system time so lifetimes are testable.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, Identity, Role, UserId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// [`TokenService`] issuing HS256-signed JWTs.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build the service from a shared secret and token lifetime.
    pub fn new(secret: &[u8], lifetime: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            lifetime_secs: i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX),
            clock,
        }
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, identity: &Identity) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc().timestamp();
        let claims = Claims {
            sub: identity.user_id.to_string(),
            role: identity.role,
            iat: issued_at,
            exp: issued_at.saturating_add(self.lifetime_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &Self::validation())
            .map_err(|err| TokenError::invalid(err.to_string()))?
            .claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::expired());
        }

        let user_id = claims
            .sub
            .parse::<i64>()
            .ok()
            .and_then(|raw| UserId::new(raw).ok())
            .ok_or_else(|| TokenError::invalid("subject is not a user id"))?;
        Ok(Identity::new(user_id, claims.role))
    }
}
