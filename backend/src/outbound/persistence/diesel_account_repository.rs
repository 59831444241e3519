//! PostgreSQL-backed `AccountRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AccountPersistenceError, AccountRepository};
use crate::domain::{Account, AccountId, AccountNumber, NewAccount, UserId};

use super::diesel_error_mapping::{
    foreign_key_violation, map_basic_diesel_error, map_basic_pool_error, unique_violation,
};
use super::models::{AccountRow, NewAccountRow};
use super::pool::{DbPool, PoolError};
use super::schema::accounts;

/// Diesel-backed implementation of the account repository port.
#[derive(Clone)]
pub struct DieselAccountRepository {
    pool: DbPool,
}

impl DieselAccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AccountPersistenceError {
    map_basic_pool_error(error, AccountPersistenceError::connection)
}

fn map_diesel_error(error: &diesel::result::Error) -> AccountPersistenceError {
    map_basic_diesel_error(
        error,
        AccountPersistenceError::query,
        AccountPersistenceError::connection,
    )
}

fn decode(row: AccountRow) -> Result<Account, AccountPersistenceError> {
    row.into_domain().map_err(AccountPersistenceError::query)
}

#[async_trait]
impl AccountRepository for DieselAccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewAccountRow {
            user_id: account.owner.get(),
            account_number: account.number.as_ref(),
            account_type: account.account_type.as_str(),
            balance: account.balance,
            is_primary: account.is_primary,
        };

        let row = diesel::insert_into(accounts::table)
            .values(&new_row)
            .returning(AccountRow::as_returning())
            .get_result::<AccountRow>(&mut conn)
            .await
            .map_err(|err| {
                if unique_violation(&err).is_some() {
                    AccountPersistenceError::duplicate_number(account.number.as_ref())
                } else if foreign_key_violation(&err) {
                    AccountPersistenceError::missing_owner(account.owner.get())
                } else {
                    map_diesel_error(&err)
                }
            })?;
        decode(row)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .find(id.get())
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(decode).transpose()
    }

    async fn find_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = accounts::table
            .filter(accounts::account_number.eq(number.as_ref()))
            .select(AccountRow::as_select())
            .first::<AccountRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err))?;

        row.map(decode).transpose()
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Account>, AccountPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AccountRow> = accounts::table
            .filter(accounts::user_id.eq(owner.get()))
            .order(accounts::id.asc())
            .select(AccountRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?;

        rows.into_iter().map(decode).collect()
    }
}
