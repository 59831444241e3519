//! Test helpers for inbound HTTP components.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::domain::ports::{
    MockAccountRegistry, MockAuthCommand, MockTransactionLedger, MockUserDirectory,
};
use crate::domain::{
    Account, AccountId, AccountNumber, AccountType, EmailAddress, Identity, Role, Transaction,
    TransactionId, TransactionRecord, TransactionStatus, TransactionType, User, UserId, UserName,
};
use crate::inbound::http::state::{CookieSettings, HttpState, HttpStatePorts};

/// Build HTTP state from expectation-free mocks, letting `configure` swap in
/// the ones a test cares about.
pub fn state_with(configure: impl FnOnce(&mut HttpStatePorts)) -> HttpState {
    let mut ports = HttpStatePorts {
        auth: Arc::new(MockAuthCommand::new()),
        accounts: Arc::new(MockAccountRegistry::new()),
        ledger: Arc::new(MockTransactionLedger::new()),
        users: Arc::new(MockUserDirectory::new()),
    };
    configure(&mut ports);
    HttpState::new(ports, CookieSettings::default())
}

/// Auth port that accepts any bearer token as `identity`.
pub fn auth_as(identity: Identity) -> MockAuthCommand {
    let mut auth = MockAuthCommand::new();
    auth.expect_authenticate().returning(move |_| Ok(identity));
    auth
}

pub fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("decimal literal")
}

pub fn user_identity(id: i64) -> Identity {
    Identity::new(UserId::new(id).expect("positive id"), Role::User)
}

pub fn admin_identity(id: i64) -> Identity {
    Identity::new(UserId::new(id).expect("positive id"), Role::Admin)
}

pub fn sample_user(id: i64, role: Role) -> User {
    User {
        id: UserId::new(id).expect("positive id"),
        name: UserName::new("Ada Lovelace").expect("valid name"),
        email: EmailAddress::new("ada@example.com").expect("valid email"),
        role,
    }
}

pub fn sample_account(id: i64, owner: i64, balance: &str) -> Account {
    Account {
        id: AccountId::new(id).expect("positive id"),
        owner: UserId::new(owner).expect("positive id"),
        number: AccountNumber::parse(format!("ACC-{owner}-1767603600000")).expect("number"),
        account_type: AccountType::Savings,
        balance: dec(balance),
        is_primary: true,
    }
}

pub fn sample_record(
    id: i64,
    kind: TransactionType,
    status: TransactionStatus,
    amount: &str,
    balance_after: &str,
) -> TransactionRecord {
    TransactionRecord {
        transaction: Transaction {
            id: TransactionId::new(id).expect("positive id"),
            account_id: AccountId::new(21).expect("positive id"),
            user_id: UserId::new(1).expect("positive id"),
            kind,
            amount: dec(amount),
            status,
            description: None,
            balance_after: dec(balance_after),
            created_at: Utc
                .with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        },
        account_number: AccountNumber::parse("ACC-1-1767603600000").expect("number"),
    }
}
