//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions back into domain types go
//! through the validating constructors and report corrupt rows as strings
//! for the caller to wrap in its port error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, AccountNumber, AccountType, Description, EmailAddress, NewTransaction,
    PasswordHash, Role, Transaction, TransactionId, TransactionStatus, TransactionType, User,
    UserCredentials, UserId, UserName,
};

use super::schema::{accounts, transactions, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

impl UserRow {
    pub(crate) fn into_credentials(self) -> Result<UserCredentials, String> {
        let user = User {
            id: UserId::new(self.id).map_err(|err| err.to_string())?,
            name: UserName::new(&self.name).map_err(|err| err.to_string())?,
            email: EmailAddress::new(&self.email).map_err(|err| err.to_string())?,
            role: self.role.parse::<Role>().map_err(|err| err.to_string())?,
        };
        Ok(UserCredentials {
            user,
            password_hash: PasswordHash::new(self.password_hash),
        })
    }

    pub(crate) fn into_user(self) -> Result<User, String> {
        self.into_credentials().map(|credentials| credentials.user)
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub user_id: i64,
    pub account_number: String,
    pub account_type: String,
    pub balance: Decimal,
    pub is_primary: bool,
}

impl AccountRow {
    pub(crate) fn into_domain(self) -> Result<Account, String> {
        Ok(Account {
            id: AccountId::new(self.id).map_err(|err| err.to_string())?,
            owner: UserId::new(self.user_id).map_err(|err| err.to_string())?,
            number: AccountNumber::parse(&self.account_number).map_err(|err| err.to_string())?,
            account_type: self
                .account_type
                .parse::<AccountType>()
                .map_err(|err| err.to_string())?,
            balance: self.balance,
            is_primary: self.is_primary,
        })
    }
}

/// Insertable struct for creating new account records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub user_id: i64,
    pub account_number: &'a str,
    pub account_type: &'a str,
    pub balance: Decimal,
    pub is_primary: bool,
}

/// Row struct for reading from the transactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TransactionRow {
    pub id: i64,
    pub account_id: i64,
    pub user_id: i64,
    pub transaction_type: String,
    pub amount: Decimal,
    pub status: String,
    pub description: Option<String>,
    pub balance_after: Decimal,
    pub created_at: DateTime<Utc>,
}

impl TransactionRow {
    pub(crate) fn into_domain(self) -> Result<Transaction, String> {
        Ok(Transaction {
            id: TransactionId::new(self.id).map_err(|err| err.to_string())?,
            account_id: AccountId::new(self.account_id).map_err(|err| err.to_string())?,
            user_id: UserId::new(self.user_id).map_err(|err| err.to_string())?,
            kind: self
                .transaction_type
                .parse::<TransactionType>()
                .map_err(|err| err.to_string())?,
            amount: self.amount,
            status: self
                .status
                .parse::<TransactionStatus>()
                .map_err(|err| err.to_string())?,
            description: self.description.map(Description::from_stored),
            balance_after: self.balance_after,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for appending ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub(crate) struct NewTransactionRow<'a> {
    pub account_id: i64,
    pub user_id: i64,
    pub transaction_type: &'a str,
    pub amount: Decimal,
    pub status: &'a str,
    pub description: Option<&'a str>,
    pub balance_after: Decimal,
}

impl<'a> From<&'a NewTransaction> for NewTransactionRow<'a> {
    fn from(entry: &'a NewTransaction) -> Self {
        Self {
            account_id: entry.account_id.get(),
            user_id: entry.user_id.get(),
            transaction_type: entry.kind.as_str(),
            amount: entry.amount,
            status: entry.status.as_str(),
            description: entry.description.as_ref().map(AsRef::as_ref),
            balance_after: entry.balance_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn account_row(account_type: &str) -> AccountRow {
        AccountRow {
            id: 3,
            user_id: 1,
            account_number: "ACC-1-1700000000000".to_owned(),
            account_type: account_type.to_owned(),
            balance: Decimal::new(1_050, 2),
            is_primary: false,
        }
    }

    #[test]
    fn account_rows_convert_to_domain() {
        let account = account_row("CHECKING").into_domain().expect("valid row");
        assert_eq!(account.account_type, AccountType::Checking);
        assert_eq!(account.balance, Decimal::new(1_050, 2));
    }

    #[rstest]
    #[case("checking")]
    #[case("BROKERAGE")]
    fn unknown_account_types_are_corrupt(#[case] raw: &str) {
        assert!(account_row(raw).into_domain().is_err());
    }

    #[test]
    fn user_rows_keep_the_hash_alongside_the_user() {
        let row = UserRow {
            id: 8,
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            password_hash: "$argon2id$hash".to_owned(),
            role: "ADMIN".to_owned(),
        };
        let credentials = row.into_credentials().expect("valid row");
        assert_eq!(credentials.user.role, Role::Admin);
        assert_eq!(credentials.password_hash.as_str(), "$argon2id$hash");
    }

    #[test]
    fn transaction_rows_round_trip_enum_text() {
        let row = TransactionRow {
            id: 1,
            account_id: 3,
            user_id: 1,
            transaction_type: "WITHDRAW".to_owned(),
            amount: Decimal::new(20_000, 2),
            status: "FAILED".to_owned(),
            description: Some("rent".to_owned()),
            balance_after: Decimal::new(15_000, 2),
            created_at: Utc::now(),
        };
        let transaction = row.into_domain().expect("valid row");
        assert_eq!(transaction.kind, TransactionType::Withdraw);
        assert_eq!(transaction.status, TransactionStatus::Failed);

        let entry = NewTransaction {
            account_id: transaction.account_id,
            user_id: transaction.user_id,
            kind: transaction.kind,
            amount: transaction.amount,
            status: transaction.status,
            description: transaction.description.clone(),
            balance_after: transaction.balance_after,
        };
        let insertable = NewTransactionRow::from(&entry);
        assert_eq!(insertable.transaction_type, "WITHDRAW");
        assert_eq!(insertable.status, "FAILED");
        assert_eq!(insertable.description, Some("rent"));
    }
}
