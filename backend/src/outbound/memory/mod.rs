//! In-process bank store used when no database is configured.
//!
//! One [`InMemoryBank`] implements the user, account, and ledger ports over a
//! single state guarded by an async mutex. Postings hold the lock across
//! read, decide, and write, which gives the same per-account serialisation
//! the PostgreSQL adapter gets from `SELECT ... FOR UPDATE`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tokio::sync::Mutex;

use crate::domain::ports::{
    AccountPersistenceError, AccountRepository, LedgerStore, LedgerStoreError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Account, AccountId, AccountNumber, EmailAddress, InvalidId, NewAccount, NewUser,
    PostingDecision, PostingOutcome, PostingRequest, Role, Transaction, TransactionId, User,
    UserCredentials, UserId,
};

#[derive(Default)]
struct BankState {
    users: BTreeMap<UserId, UserCredentials>,
    accounts: BTreeMap<AccountId, Account>,
    transactions: BTreeMap<TransactionId, Transaction>,
    last_user_id: i64,
    last_account_id: i64,
    last_transaction_id: i64,
}

fn next_id<T>(counter: &mut i64, build: fn(i64) -> Result<T, InvalidId>) -> Result<T, String> {
    let next = counter
        .checked_add(1)
        .ok_or_else(|| "identifier space exhausted".to_owned())?;
    let id = build(next).map_err(|err| err.to_string())?;
    *counter = next;
    Ok(id)
}

/// Shared in-memory store for users, accounts, and the ledger.
pub struct InMemoryBank {
    state: Mutex<BankState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryBank {
    /// Create an empty store; `clock` stamps ledger entries.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(BankState::default()),
            clock,
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryBank {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut state = self.state.lock().await;
        if state
            .users
            .values()
            .any(|stored| stored.user.email == user.email)
        {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        let id = next_id(&mut state.last_user_id, UserId::new).map_err(UserPersistenceError::query)?;
        let created = User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        };
        state.users.insert(
            id,
            UserCredentials {
                user: created.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(created)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|stored| &stored.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.users.get(id).map(|stored| stored.user.clone()))
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .map(|stored| stored.user.clone())
            .collect())
    }

    async fn exists_with_role(&self, role: Role) -> Result<bool, UserPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.users.values().any(|stored| stored.user.role == role))
    }
}

#[async_trait]
impl AccountRepository for InMemoryBank {
    async fn create(&self, account: &NewAccount) -> Result<Account, AccountPersistenceError> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&account.owner) {
            return Err(AccountPersistenceError::missing_owner(account.owner.get()));
        }
        if state
            .accounts
            .values()
            .any(|existing| existing.number == account.number)
        {
            return Err(AccountPersistenceError::duplicate_number(
                account.number.as_ref(),
            ));
        }
        let id = next_id(&mut state.last_account_id, AccountId::new)
            .map_err(AccountPersistenceError::query)?;
        let created = Account {
            id,
            owner: account.owner,
            number: account.number.clone(),
            account_type: account.account_type,
            balance: account.balance,
            is_primary: account.is_primary,
        };
        state.accounts.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountPersistenceError> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(id).cloned())
    }

    async fn find_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, AccountPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .find(|account| &account.number == number)
            .cloned())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Account>, AccountPersistenceError> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .filter(|account| &account.owner == owner)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LedgerStore for InMemoryBank {
    async fn post(&self, request: &PostingRequest) -> Result<PostingOutcome, LedgerStoreError> {
        let mut state = self.state.lock().await;
        let Some(mut account) = state.accounts.get(&request.account_id).cloned() else {
            return Ok(PostingOutcome::AccountMissing);
        };

        let decision = request.decide(&account);
        let entry = match request.entry_for(decision) {
            Ok(entry) => entry,
            Err(unrecorded) => return Ok(unrecorded),
        };

        let id = next_id(&mut state.last_transaction_id, TransactionId::new)
            .map_err(LedgerStoreError::query)?;
        let transaction = Transaction {
            id,
            account_id: entry.account_id,
            user_id: entry.user_id,
            kind: entry.kind,
            amount: entry.amount,
            status: entry.status,
            description: entry.description,
            balance_after: entry.balance_after,
            created_at: self.clock.utc(),
        };

        if let PostingDecision::Apply { balance_after } = decision {
            account.balance = balance_after;
            state.accounts.insert(account.id, account.clone());
        }
        state.transactions.insert(id, transaction.clone());

        Ok(PostingOutcome::Recorded {
            account,
            transaction,
        })
    }

    async fn find_transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<Transaction>, LedgerStoreError> {
        let state = self.state.lock().await;
        Ok(state.transactions.get(id).cloned())
    }

    async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Transaction>, LedgerStoreError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .values()
            .rev()
            .filter(|transaction| &transaction.account_id == account_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests;
