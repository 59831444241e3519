//! Shared mapping from driven-port failures to HTTP-safe domain errors.

use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{
    AccountPersistenceError, LedgerStoreError, PasswordHashError, TokenError,
    UserPersistenceError,
};

pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str = "User exists with email";
pub(crate) const DUPLICATE_ACCOUNT_NUMBER_MESSAGE: &str = "Account number already exists";

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
    }
}

pub(crate) fn map_account_persistence_error(error: AccountPersistenceError) -> Error {
    match error {
        AccountPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountPersistenceError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountPersistenceError::DuplicateNumber { .. } => {
            Error::conflict(DUPLICATE_ACCOUNT_NUMBER_MESSAGE)
        }
        AccountPersistenceError::MissingOwner { .. } => Error::not_found("User not found."),
    }
}

pub(crate) fn map_ledger_error(error: LedgerStoreError) -> Error {
    match error {
        LedgerStoreError::Connection { message } => {
            Error::service_unavailable(format!("ledger store unavailable: {message}"))
        }
        LedgerStoreError::Query { message } => {
            Error::internal(format!("ledger store error: {message}"))
        }
    }
}

pub(crate) fn map_hash_error(error: PasswordHashError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("password hashing failed")
}

pub(crate) fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Signing { message } => {
            error!(error = %message, "token signing failed");
            Error::internal("token signing failed")
        }
        TokenError::Invalid { .. } | TokenError::Expired => {
            Error::unauthorized("Invalid or expired token")
        }
    }
}
