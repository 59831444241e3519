//! Port for account persistence.
//!
//! Balances are read here but never written: only the
//! [`LedgerStore`](super::LedgerStore) mutates a balance, and only inside a
//! posting.

use async_trait::async_trait;

use crate::domain::{Account, AccountId, AccountNumber, NewAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account repository adapters.
    pub enum AccountPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "account repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "account repository query failed: {message}",
        /// The generated account number is already taken.
        DuplicateNumber { number: String } => "account number {number} already exists",
        /// The owning user does not exist.
        MissingOwner { user_id: i64 } => "account owner {user_id} does not exist",
    }
}

/// Port for creating and reading accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account.
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountPersistenceError>;

    /// Fetch an account by id.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError>;

    /// Fetch an account by its number.
    async fn find_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, AccountPersistenceError>;

    /// List an owner's accounts ordered by id.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Account>, AccountPersistenceError>;
}
