//! Account registry service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::port_error_mapping::map_account_persistence_error;
use crate::domain::ports::{AccountRegistry, AccountRepository};
use crate::domain::{
    Account, AccountNumber, Error, Identity, NewAccount, OpenAccountRequest, UserId,
};

/// Service implementing [`AccountRegistry`] over an [`AccountRepository`].
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    /// Create the service; `clock` stamps generated account numbers.
    pub fn new(accounts: Arc<dyn AccountRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { accounts, clock }
    }
}

#[async_trait]
impl AccountRegistry for AccountService {
    async fn open_account(
        &self,
        actor: &Identity,
        request: OpenAccountRequest,
    ) -> Result<Account, Error> {
        if actor.user_id != request.owner {
            return Err(Error::forbidden("Forbidden"));
        }

        let new_account = NewAccount {
            owner: request.owner,
            number: AccountNumber::generate(request.owner, self.clock.utc()),
            account_type: request.account_type,
            balance: request.opening_balance.value(),
            is_primary: request.is_primary,
        };
        let account = self
            .accounts
            .create(&new_account)
            .await
            .map_err(map_account_persistence_error)?;

        info!(
            account_id = %account.id,
            user_id = %account.owner,
            account_number = %account.number,
            "account created"
        );
        Ok(account)
    }

    async fn account_by_number(
        &self,
        actor: &Identity,
        number: &AccountNumber,
    ) -> Result<Account, Error> {
        let account = self
            .accounts
            .find_by_number(number)
            .await
            .map_err(map_account_persistence_error)?
            .ok_or_else(|| Error::not_found("Account not found"))?;

        if !actor.can_view(account.owner) {
            return Err(Error::forbidden("Forbidden"));
        }
        Ok(account)
    }

    async fn accounts_for_user(
        &self,
        actor: &Identity,
        owner: &UserId,
    ) -> Result<Vec<Account>, Error> {
        if !actor.can_view(*owner) {
            return Err(Error::forbidden("Forbidden"));
        }

        let accounts = self
            .accounts
            .list_by_owner(owner)
            .await
            .map_err(map_account_persistence_error)?;
        // An empty list is reported as NotFound, matching the transaction reads.
        if accounts.is_empty() {
            return Err(Error::not_found("No accounts found for this user"));
        }
        Ok(accounts)
    }
}
