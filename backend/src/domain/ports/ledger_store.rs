//! Port for the transactional ledger.
//!
//! `post` is the only operation in the system that changes a balance. An
//! adapter must perform the whole posting as one atomic unit:
//!
//! 1. lock the target account row (or equivalent) against concurrent posts;
//! 2. call [`PostingRequest::decide`] on the locked snapshot;
//! 3. write the balance and ledger entry the decision asks for;
//! 4. commit, or roll back everything on any error.
//!
//! Two concurrent posts against one account must serialise; the second one
//! observes the balance the first one committed.

use async_trait::async_trait;

use crate::domain::{AccountId, PostingOutcome, PostingRequest, Transaction, TransactionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ledger store adapters.
    pub enum LedgerStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "ledger store connection failed: {message}",
        /// Query or mutation failed; any partial posting was rolled back.
        Query { message: String } => "ledger store query failed: {message}",
    }
}

/// Port for atomic postings and ledger reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Atomically apply one posting.
    async fn post(&self, request: &PostingRequest) -> Result<PostingOutcome, LedgerStoreError>;

    /// Fetch a transaction by id.
    async fn find_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, LedgerStoreError>;

    /// List an account's transactions, newest first.
    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Transaction>, LedgerStoreError>;
}
