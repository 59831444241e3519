//! PostgreSQL-backed `LedgerStore` implementation using Diesel ORM.
//!
//! A posting runs inside one database transaction. The account row is read
//! with `SELECT ... FOR UPDATE`, so a second posting against the same account
//! blocks until the first commits and then decides against the committed
//! balance. The balance update and the ledger insert commit together; any
//! error rolls both back.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{LedgerStore, LedgerStoreError};
use crate::domain::{
    AccountId, PostingDecision, PostingOutcome, PostingRequest, Transaction, TransactionId,
};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{AccountRow, NewTransactionRow, TransactionRow};
use super::pool::{DbPool, PoolError};
use super::schema::{accounts, transactions};

/// Diesel-backed implementation of the ledger store port.
#[derive(Clone)]
pub struct DieselLedgerStore {
    pool: DbPool,
}

impl DieselLedgerStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Failure inside the posting transaction; either variant rolls back.
#[derive(Debug)]
enum PostingFailure {
    Diesel(DieselError),
    Corrupt(String),
}

impl From<DieselError> for PostingFailure {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> LedgerStoreError {
    map_basic_pool_error(error, LedgerStoreError::connection)
}

fn map_diesel_error(error: &DieselError) -> LedgerStoreError {
    map_basic_diesel_error(error, LedgerStoreError::query, LedgerStoreError::connection)
}

fn map_posting_failure(failure: PostingFailure) -> LedgerStoreError {
    match failure {
        PostingFailure::Diesel(error) => map_diesel_error(&error),
        PostingFailure::Corrupt(message) => LedgerStoreError::query(message),
    }
}

fn decode(row: TransactionRow) -> Result<Transaction, LedgerStoreError> {
    row.into_domain().map_err(LedgerStoreError::query)
}

#[async_trait]
impl LedgerStore for DieselLedgerStore {
    async fn post(&self, request: &PostingRequest) -> Result<PostingOutcome, LedgerStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction::<_, PostingFailure, _>(|conn| {
            async move {
                let locked: Option<AccountRow> = accounts::table
                    .find(request.account_id.get())
                    .select(AccountRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = locked else {
                    return Ok(PostingOutcome::AccountMissing);
                };
                let mut account = row.into_domain().map_err(PostingFailure::Corrupt)?;

                let decision = request.decide(&account);
                let entry = match request.entry_for(decision) {
                    Ok(entry) => entry,
                    Err(unrecorded) => return Ok(unrecorded),
                };

                if let PostingDecision::Apply { balance_after } = decision {
                    diesel::update(accounts::table.find(account.id.get()))
                        .set(accounts::balance.eq(balance_after))
                        .execute(conn)
                        .await?;
                    account.balance = balance_after;
                }

                let inserted: TransactionRow = diesel::insert_into(transactions::table)
                    .values(&NewTransactionRow::from(&entry))
                    .returning(TransactionRow::as_returning())
                    .get_result(conn)
                    .await?;
                let transaction = inserted.into_domain().map_err(PostingFailure::Corrupt)?;

                Ok(PostingOutcome::Recorded {
                    account,
                    transaction,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_posting_failure)
    }

    async fn find_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, LedgerStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = transactions::table
            .find(id.get())
            .select(TransactionRow::as_select())
            .first::<TransactionRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(decode).transpose()
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Transaction>, LedgerStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<TransactionRow> = transactions::table
            .filter(transactions::account_id.eq(account_id.get()))
            .order((transactions::created_at.desc(), transactions::id.desc()))
            .select(TransactionRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        rows.into_iter().map(decode).collect()
    }
}
