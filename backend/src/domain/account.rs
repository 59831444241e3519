//! Account registry model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, Amount, UserId};

/// Validation errors for account fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountValidationError {
    /// Account number was blank.
    #[error("account number must not be empty")]
    EmptyNumber,
    /// Account type text is not one of the known products.
    #[error("accountType must be one of SAVINGS, CHECKING, CREDIT, LOAN")]
    UnknownType(String),
}

/// Human-facing account number, `ACC-<ownerUserId>-<epochMillis>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Derive the number for a new account opened at `opened_at`.
    ///
    /// Uniqueness is best-effort; the store's unique constraint is the
    /// final arbiter.
    ///
    /// # Examples
    /// ```
    /// use banking_backend::domain::{AccountNumber, UserId};
    /// use chrono::{TimeZone, Utc};
    ///
    /// let at = Utc.timestamp_millis_opt(1_756_595_377_248).unwrap();
    /// let number = AccountNumber::generate(UserId::new(7).unwrap(), at);
    /// assert_eq!(number.as_ref(), "ACC-7-1756595377248");
    /// ```
    pub fn generate(owner: UserId, opened_at: DateTime<Utc>) -> Self {
        Self(format!("ACC-{owner}-{}", opened_at.timestamp_millis()))
    }

    /// Wrap an externally supplied number for lookups.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, AccountValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyNumber);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

/// Account product type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Savings account (default).
    #[default]
    Savings,
    /// Current/checking account.
    Checking,
    /// Credit account.
    Credit,
    /// Loan account.
    Loan,
}

impl AccountType {
    /// Storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Savings => "SAVINGS",
            Self::Checking => "CHECKING",
            Self::Credit => "CREDIT",
            Self::Loan => "LOAN",
        }
    }
}

impl FromStr for AccountType {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SAVINGS" => Ok(Self::Savings),
            "CHECKING" => Ok(Self::Checking),
            "CREDIT" => Ok(Self::Credit),
            "LOAN" => Ok(Self::Loan),
            other => Err(AccountValidationError::UnknownType(other.to_owned())),
        }
    }
}

/// Persisted account.
///
/// ## Invariants
/// - `balance >= 0` after every committed operation.
/// - `balance` only changes through ledger postings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Primary key.
    pub id: AccountId,
    /// Owning user.
    pub owner: UserId,
    /// Unique account number.
    pub number: AccountNumber,
    /// Product type.
    pub account_type: AccountType,
    /// Current balance.
    pub balance: Decimal,
    /// Whether this is the owner's primary account.
    pub is_primary: bool,
}

/// Account awaiting insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Owning user.
    pub owner: UserId,
    /// Generated account number.
    pub number: AccountNumber,
    /// Product type.
    pub account_type: AccountType,
    /// Opening balance.
    pub balance: Decimal,
    /// Primary flag.
    pub is_primary: bool,
}

/// Validated account-opening request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenAccountRequest {
    /// User the account is opened for.
    pub owner: UserId,
    /// Opening balance, strictly positive.
    pub opening_balance: Amount,
    /// Product type, defaulting to SAVINGS.
    pub account_type: AccountType,
    /// Primary flag, defaulting to false.
    pub is_primary: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn generated_numbers_embed_owner_and_millis() {
        let at = Utc
            .timestamp_millis_opt(1_700_000_000_123)
            .single()
            .expect("valid timestamp");
        let owner = UserId::new(42).expect("positive id");
        assert_eq!(
            AccountNumber::generate(owner, at).as_ref(),
            "ACC-42-1700000000123"
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_numbers_are_rejected(#[case] raw: &str) {
        assert_eq!(
            AccountNumber::parse(raw),
            Err(AccountValidationError::EmptyNumber)
        );
    }

    #[rstest]
    #[case("SAVINGS", AccountType::Savings)]
    #[case("CHECKING", AccountType::Checking)]
    #[case("CREDIT", AccountType::Credit)]
    #[case("LOAN", AccountType::Loan)]
    fn account_types_parse_from_storage_text(#[case] raw: &str, #[case] expected: AccountType) {
        assert_eq!(raw.parse::<AccountType>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[test]
    fn account_type_defaults_to_savings() {
        assert_eq!(AccountType::default(), AccountType::Savings);
        assert!("savings".parse::<AccountType>().is_err());
    }
}
