//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed banking entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Types validate on construction so adapters cannot smuggle malformed
//! values past the boundary.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - Account, Transaction, User: persisted aggregates.
//! - PostingRequest: deposit or withdrawal attempt and its balance rule.
//! - Services implementing [`ports::AuthCommand`], [`ports::AccountRegistry`],
//!   [`ports::TransactionLedger`], and [`ports::UserDirectory`].

pub mod account;
pub mod account_service;
pub mod admin_seed;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ids;
pub mod ledger_service;
pub mod money;
mod port_error_mapping;
pub mod ports;
pub mod trace_id;
pub mod transaction;
pub mod user;
pub mod user_directory_service;

pub use self::account::{
    Account, AccountNumber, AccountType, AccountValidationError, NewAccount, OpenAccountRequest,
};
pub use self::account_service::AccountService;
pub use self::admin_seed::{AdminSeed, AdminSeedOutcome, AdminSeeder};
pub use self::auth::{
    AccessToken, AuthSession, CredentialsValidationError, Identity, LoginCredentials, Password,
    SignupDetails,
};
pub use self::auth_service::AuthService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{AccountId, InvalidId, TransactionId, UserId};
pub use self::ledger_service::LedgerService;
pub use self::money::{Amount, AmountValidationError, MONEY_SCALE, at_money_scale, max_money};
pub use self::trace_id::TraceId;
pub use self::transaction::{
    Description, DescriptionTooLong, NewTransaction, PostingDecision, PostingOutcome,
    PostingRequest, Transaction, TransactionRecord, TransactionStatus, TransactionType,
    UnknownLedgerValue,
};
pub use self::user::{
    EmailAddress, NewUser, PasswordHash, Role, User, UserCredentials, UserName,
    UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use banking_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("Forbidden"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
