//! Transaction ledger service.
//!
//! Deposits and withdrawals are handed to the [`LedgerStore`] as a single
//! [`PostingRequest`]; the store applies the domain decision atomically and
//! this service translates the outcome into the caller-facing result. A
//! rejected withdrawal is still an audit record: the store writes the FAILED
//! entry and commits before the service raises `insufficient_funds`.
//!
//! Deposits carry no ownership check: any authenticated caller may credit any
//! account. Withdrawals are owner-only, admins included.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::port_error_mapping::{map_account_persistence_error, map_ledger_error};
use crate::domain::ports::{
    AccountRepository, LedgerStore, MoneyMovement, PostingReceipt, TransactionLedger,
};
use crate::domain::{
    AccountId, Error, Identity, PostingOutcome, PostingRequest, TransactionId,
    TransactionRecord, TransactionStatus, TransactionType,
};

const ACCOUNT_MISSING: &str = "Account not exists";
const WITHDRAW_FORBIDDEN: &str = "Forbidden: cannot withdraw from other's account";
const INSUFFICIENT_BALANCE: &str = "Not sufficient balance";
const BALANCE_LIMIT: &str = "Balance would exceed the maximum account balance";
const NO_TRANSACTIONS: &str = "Transactions not exists for this account/user";

/// Service implementing [`TransactionLedger`].
#[derive(Clone)]
pub struct LedgerService {
    ledger: Arc<dyn LedgerStore>,
    accounts: Arc<dyn AccountRepository>,
}

impl LedgerService {
    /// Create the service from the ledger store and the account repository
    /// used to resolve account numbers on reads.
    pub fn new(ledger: Arc<dyn LedgerStore>, accounts: Arc<dyn AccountRepository>) -> Self {
        Self { ledger, accounts }
    }

    async fn post(
        &self,
        actor: &Identity,
        kind: TransactionType,
        movement: MoneyMovement,
    ) -> Result<PostingReceipt, Error> {
        let request = PostingRequest {
            account_id: movement.account_id,
            kind,
            amount: movement.amount,
            description: movement.description,
            actor: *actor,
        };

        let outcome = self.ledger.post(&request).await.map_err(map_ledger_error)?;
        let (account, transaction) = match outcome {
            PostingOutcome::AccountMissing => return Err(Error::not_found(ACCOUNT_MISSING)),
            PostingOutcome::Refused => return Err(Error::forbidden(WITHDRAW_FORBIDDEN)),
            PostingOutcome::LimitExceeded => return Err(Error::invalid_request(BALANCE_LIMIT)),
            PostingOutcome::Recorded {
                account,
                transaction,
            } => (account, transaction),
        };

        if transaction.status == TransactionStatus::Failed {
            info!(
                account_id = %account.id,
                transaction_id = %transaction.id,
                amount = %transaction.amount,
                balance = %transaction.balance_after,
                "withdrawal rejected for insufficient funds"
            );
            return Err(Error::insufficient_funds(INSUFFICIENT_BALANCE));
        }

        info!(
            account_id = %account.id,
            transaction_id = %transaction.id,
            kind = %kind,
            amount = %transaction.amount,
            balance = %transaction.balance_after,
            "posting applied"
        );
        let record = TransactionRecord {
            transaction,
            account_number: account.number.clone(),
        };
        Ok(PostingReceipt {
            account,
            transaction: record,
        })
    }
}

#[async_trait]
impl TransactionLedger for LedgerService {
    async fn deposit(
        &self,
        actor: &Identity,
        movement: MoneyMovement,
    ) -> Result<PostingReceipt, Error> {
        self.post(actor, TransactionType::Deposit, movement).await
    }

    async fn withdraw(
        &self,
        actor: &Identity,
        movement: MoneyMovement,
    ) -> Result<PostingReceipt, Error> {
        self.post(actor, TransactionType::Withdraw, movement).await
    }

    async fn transaction(
        &self,
        actor: &Identity,
        id: &TransactionId,
    ) -> Result<TransactionRecord, Error> {
        let transaction = self
            .ledger
            .find_transaction(id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| Error::not_found("Transaction not found"))?;

        if !actor.can_view(transaction.user_id) {
            return Err(Error::forbidden("Forbidden"));
        }

        let Some(account) = self
            .accounts
            .find_by_id(&transaction.account_id)
            .await
            .map_err(map_account_persistence_error)?
        else {
            error!(
                transaction_id = %transaction.id,
                account_id = %transaction.account_id,
                "transaction references a missing account"
            );
            return Err(Error::internal("Account not exist for this transaction"));
        };

        Ok(TransactionRecord {
            transaction,
            account_number: account.number,
        })
    }

    async fn transactions_for_account(
        &self,
        actor: &Identity,
        account_id: &AccountId,
    ) -> Result<Vec<TransactionRecord>, Error> {
        let account = self
            .accounts
            .find_by_id(account_id)
            .await
            .map_err(map_account_persistence_error)?
            .ok_or_else(|| Error::not_found(ACCOUNT_MISSING))?;

        let records: Vec<TransactionRecord> = self
            .ledger
            .list_for_account(account_id)
            .await
            .map_err(map_ledger_error)?
            .into_iter()
            .filter(|transaction| actor.is_admin() || transaction.user_id == actor.user_id)
            .map(|transaction| TransactionRecord {
                transaction,
                account_number: account.number.clone(),
            })
            .collect();

        if records.is_empty() {
            return Err(Error::not_found(NO_TRANSACTIONS));
        }
        Ok(records)
    }
}

#[cfg(test)]
#[path = "ledger_service_tests.rs"]
mod tests;
