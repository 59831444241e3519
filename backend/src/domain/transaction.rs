//! Ledger model: transactions, postings, and the balance decision.
//!
//! A posting is one deposit or withdrawal attempt. Stores lock the target
//! account, ask [`PostingRequest::decide`] what to do with the locked
//! snapshot, and persist the resulting [`PostingDecision`] before releasing
//! the lock. Keeping the decision pure means every store adapter applies the
//! same rules, and atomicity stays the store's job.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AccountId, AccountNumber, Amount, Identity, TransactionId, UserId, max_money,
};

/// Maximum stored description length.
pub const DESCRIPTION_MAX: usize = 255;

/// Direction of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Money in.
    Deposit,
    /// Money out.
    Withdraw,
}

/// Outcome recorded for a posting attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Balance was mutated.
    Success,
    /// Attempt rejected; balance untouched.
    Failed,
}

/// Raised when stored enum text is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownLedgerValue {
    kind: &'static str,
    value: String,
}

impl TransactionType {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdraw => "WITHDRAW",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownLedgerValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            other => Err(UnknownLedgerValue {
                kind: "transaction type",
                value: other.to_owned(),
            }),
        }
    }
}

impl TransactionStatus {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownLedgerValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            other => Err(UnknownLedgerValue {
                kind: "transaction status",
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a description exceeds [`DESCRIPTION_MAX`] characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("description must be at most 255 characters")]
pub struct DescriptionTooLong;

/// Optional free-text note on a posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Validate an optional raw description; blank text becomes `None`.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, DescriptionTooLong> {
        let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
            return Ok(None);
        };
        if text.chars().count() > DESCRIPTION_MAX {
            return Err(DescriptionTooLong);
        }
        Ok(Some(Self(text.to_owned())))
    }

    /// Wrap text read back from storage.
    pub fn from_stored(text: String) -> Self {
        Self(text)
    }
}

impl AsRef<str> for Description {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Immutable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Primary key.
    pub id: TransactionId,
    /// Account the posting targeted.
    pub account_id: AccountId,
    /// Acting identity.
    pub user_id: UserId,
    /// Deposit or withdraw.
    pub kind: TransactionType,
    /// Requested amount.
    pub amount: Decimal,
    /// Success or failure.
    pub status: TransactionStatus,
    /// Optional note.
    pub description: Option<Description>,
    /// Account balance right after the attempt.
    pub balance_after: Decimal,
    /// Insertion time.
    pub created_at: DateTime<Utc>,
}

/// Ledger entry awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Target account.
    pub account_id: AccountId,
    /// Acting identity.
    pub user_id: UserId,
    /// Deposit or withdraw.
    pub kind: TransactionType,
    /// Requested amount.
    pub amount: Decimal,
    /// Success or failure.
    pub status: TransactionStatus,
    /// Optional note.
    pub description: Option<Description>,
    /// Balance snapshot after the attempt.
    pub balance_after: Decimal,
}

/// Transaction enriched with the owning account's number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// The ledger entry.
    pub transaction: Transaction,
    /// Number of the account it belongs to.
    pub account_number: AccountNumber,
}

/// What a store must do with a locked account for one posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingDecision {
    /// Write `balance_after` to the account and record a SUCCESS entry.
    Apply {
        /// New account balance.
        balance_after: Decimal,
    },
    /// Record a FAILED entry; leave the balance untouched.
    RecordFailure {
        /// Unchanged account balance.
        balance_after: Decimal,
    },
    /// Persist nothing; the caller may not touch this account.
    Refuse,
    /// Persist nothing; the credited balance would leave the money range.
    ExceedsLimit,
}

/// A deposit or withdrawal attempt by an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingRequest {
    /// Target account.
    pub account_id: AccountId,
    /// Direction.
    pub kind: TransactionType,
    /// Positive amount.
    pub amount: Amount,
    /// Optional note.
    pub description: Option<Description>,
    /// Acting identity.
    pub actor: Identity,
}

impl PostingRequest {
    /// Decide the posting against a locked account snapshot.
    ///
    /// - Deposits apply unless the new balance would pass [`max_money`]. Any
    ///   authenticated identity may deposit into any account; only
    ///   withdrawals check ownership.
    /// - Withdrawals by anyone but the owner are refused, admins included.
    /// - Withdrawals above the balance record a failure at the old balance.
    ///
    /// # Examples
    /// ```
    /// use banking_backend::domain::{
    ///     Account, AccountId, AccountNumber, AccountType, Amount, Identity, PostingDecision,
    ///     PostingRequest, Role, TransactionType, UserId,
    /// };
    /// use rust_decimal::Decimal;
    ///
    /// let owner = UserId::new(1).unwrap();
    /// let account = Account {
    ///     id: AccountId::new(10).unwrap(),
    ///     owner,
    ///     number: AccountNumber::parse("ACC-1-1").unwrap(),
    ///     account_type: AccountType::Savings,
    ///     balance: Decimal::new(10000, 2),
    ///     is_primary: true,
    /// };
    /// let request = PostingRequest {
    ///     account_id: account.id,
    ///     kind: TransactionType::Withdraw,
    ///     amount: Amount::new(Decimal::new(20000, 2)).unwrap(),
    ///     description: None,
    ///     actor: Identity::new(owner, Role::User),
    /// };
    /// assert_eq!(
    ///     request.decide(&account),
    ///     PostingDecision::RecordFailure { balance_after: Decimal::new(10000, 2) }
    /// );
    /// ```
    pub fn decide(&self, account: &Account) -> PostingDecision {
        let amount = self.amount.value();
        match self.kind {
            TransactionType::Deposit => match account.balance.checked_add(amount) {
                Some(balance_after) if balance_after <= max_money() => {
                    PostingDecision::Apply { balance_after }
                }
                _ => PostingDecision::ExceedsLimit,
            },
            TransactionType::Withdraw if self.actor.user_id != account.owner => {
                PostingDecision::Refuse
            }
            TransactionType::Withdraw if account.balance < amount => {
                PostingDecision::RecordFailure {
                    balance_after: account.balance,
                }
            }
            TransactionType::Withdraw => PostingDecision::Apply {
                balance_after: account.balance - amount,
            },
        }
    }

    /// Build the ledger entry to insert for a recording decision.
    ///
    /// Decisions that write nothing return the outcome the store reports
    /// instead.
    pub fn entry_for(&self, decision: PostingDecision) -> Result<NewTransaction, PostingOutcome> {
        let (status, balance_after) = match decision {
            PostingDecision::Apply { balance_after } => (TransactionStatus::Success, balance_after),
            PostingDecision::RecordFailure { balance_after } => {
                (TransactionStatus::Failed, balance_after)
            }
            PostingDecision::Refuse => return Err(PostingOutcome::Refused),
            PostingDecision::ExceedsLimit => return Err(PostingOutcome::LimitExceeded),
        };
        Ok(NewTransaction {
            account_id: self.account_id,
            user_id: self.actor.user_id,
            kind: self.kind,
            amount: self.amount.value(),
            status,
            description: self.description.clone(),
            balance_after,
        })
    }
}

/// Result of handing a [`PostingRequest`] to a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostingOutcome {
    /// The target account does not exist; nothing was written.
    AccountMissing,
    /// The decision was [`PostingDecision::Refuse`]; nothing was written.
    Refused,
    /// The decision was [`PostingDecision::ExceedsLimit`]; nothing was written.
    LimitExceeded,
    /// A ledger entry was written (SUCCESS or FAILED).
    Recorded {
        /// Account state after the posting committed.
        account: Account,
        /// The inserted entry.
        transaction: Transaction,
    },
}
