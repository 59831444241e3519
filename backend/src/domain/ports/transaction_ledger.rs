//! Driving port for deposits, withdrawals, and ledger reads.

use async_trait::async_trait;

use crate::domain::{
    Account, AccountId, Amount, Description, Error, Identity, TransactionId, TransactionRecord,
};

/// Successful posting as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingReceipt {
    /// Account after the posting.
    pub account: Account,
    /// Recorded SUCCESS entry.
    pub transaction: TransactionRecord,
}

/// Validated money-movement command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyMovement {
    /// Target account.
    pub account_id: AccountId,
    /// Positive amount.
    pub amount: Amount,
    /// Optional note.
    pub description: Option<Description>,
}

/// Domain use-case port for the transaction ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    /// Credit an account.
    async fn deposit(
        &self,
        actor: &Identity,
        movement: MoneyMovement,
    ) -> Result<PostingReceipt, Error>;

    /// Debit an account owned by the caller.
    async fn withdraw(
        &self,
        actor: &Identity,
        movement: MoneyMovement,
    ) -> Result<PostingReceipt, Error>;

    /// Fetch one transaction visible to the caller.
    async fn transaction(
        &self,
        actor: &Identity,
        id: &TransactionId,
    ) -> Result<TransactionRecord, Error>;

    /// List one account's transactions visible to the caller, newest first.
    ///
    /// Non-admins only see entries they made themselves.
    async fn transactions_for_account(
        &self,
        actor: &Identity,
        account_id: &AccountId,
    ) -> Result<Vec<TransactionRecord>, Error>;
}
