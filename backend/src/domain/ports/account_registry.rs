//! Driving port for opening and looking up accounts.

use async_trait::async_trait;

use crate::domain::{Account, AccountNumber, Error, Identity, OpenAccountRequest, UserId};

/// Domain use-case port for the account registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    /// Open an account for `request.owner`; callers may only open their own.
    async fn open_account(
        &self,
        actor: &Identity,
        request: OpenAccountRequest,
    ) -> Result<Account, Error>;

    /// Look up an account by number, visible to its owner or an admin.
    async fn account_by_number(
        &self,
        actor: &Identity,
        number: &AccountNumber,
    ) -> Result<Account, Error>;

    /// List a user's accounts, visible to that user or an admin.
    async fn accounts_for_user(
        &self,
        actor: &Identity,
        owner: &UserId,
    ) -> Result<Vec<Account>, Error>;
}
