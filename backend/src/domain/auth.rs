//! Authentication primitives: validated credentials, the acting identity
//! derived from a bearer token, and the session returned after login.
//!
//! Inbound adapters parse raw strings through these constructors before any
//! port is called, so services only ever see well-formed values.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{EmailAddress, Role, User, UserId, UserName, UserValidationError};

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 6;

/// Errors raised while validating signup or login input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Name failed validation.
    #[error("{0}")]
    Name(UserValidationError),
    /// Email failed validation.
    #[error("{0}")]
    Email(UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
}

impl CredentialsValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Email(_) => "email",
            Self::PasswordTooShort => "password",
        }
    }

    /// Machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Name(_) => "name_too_short",
            Self::Email(_) => "invalid_email",
            Self::PasswordTooShort => "password_too_short",
        }
    }
}

/// Plain-text password held only as long as a request needs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate length and wrap the password.
    pub fn new(raw: &str) -> Result<Self, CredentialsValidationError> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(CredentialsValidationError::PasswordTooShort);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the secret for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Validated signup payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupDetails {
    /// Display name.
    pub name: UserName,
    /// Login email.
    pub email: EmailAddress,
    /// Chosen password.
    pub password: Password,
}

impl SignupDetails {
    /// Validate raw signup fields in request order.
    ///
    /// # Examples
    /// ```
    /// use banking_backend::domain::SignupDetails;
    ///
    /// let details = SignupDetails::try_from_parts("Ada", "ada@example.com", "pass1234").unwrap();
    /// assert_eq!(details.email.as_ref(), "ada@example.com");
    /// ```
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            name: UserName::new(name).map_err(CredentialsValidationError::Name)?,
            email: EmailAddress::new(email).map_err(CredentialsValidationError::Email)?,
            password: Password::new(password)?,
        })
    }
}

/// Validated login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    /// Login email.
    pub email: EmailAddress,
    /// Supplied password.
    pub password: Password,
}

impl LoginCredentials {
    /// Validate raw login fields.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            email: EmailAddress::new(email).map_err(CredentialsValidationError::Email)?,
            password: Password::new(password)?,
        })
    }
}

/// Authenticated caller derived from a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Token subject.
    pub user_id: UserId,
    /// Role claim.
    pub role: Role,
}

impl Identity {
    /// Construct an identity from its claims.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Whether the caller holds the ADMIN role.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Owner-or-admin visibility rule shared by read operations.
    pub fn can_view(&self, owner: UserId) -> bool {
        self.is_admin() || self.user_id == owner
    }
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap an encoded token.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(Zeroizing::new(encoded.into()))
    }

    /// Encoded token text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Result of a successful signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Freshly issued access token.
    pub access_token: AccessToken,
    /// The authenticated user.
    pub user: User,
}
