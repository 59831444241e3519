//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`LedgerStore`], [`PasswordHasher`],
//! [`TokenService`]) are implemented by outbound adapters. Driving ports
//! ([`AuthCommand`], [`AccountRegistry`], [`TransactionLedger`],
//! [`UserDirectory`]) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_registry;
mod account_repository;
mod auth_command;
mod ledger_store;
mod password_hasher;
mod token_service;
mod transaction_ledger;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use account_registry::MockAccountRegistry;
pub use account_registry::AccountRegistry;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountPersistenceError, AccountRepository};
#[cfg(test)]
pub use auth_command::MockAuthCommand;
pub use auth_command::AuthCommand;
#[cfg(test)]
pub use ledger_store::MockLedgerStore;
pub use ledger_store::{LedgerStore, LedgerStoreError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use transaction_ledger::MockTransactionLedger;
pub use transaction_ledger::{MoneyMovement, PostingReceipt, TransactionLedger};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
