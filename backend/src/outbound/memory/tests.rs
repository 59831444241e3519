//! Ledger behaviour against the in-memory store, driven through the services.

use std::str::FromStr;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

use super::*;
use crate::domain::ports::{AccountRegistry, MoneyMovement, TransactionLedger};
use crate::domain::{
    AccountService, AccountType, Amount, ErrorCode, Identity, LedgerService, OpenAccountRequest,
    PasswordHash, TransactionStatus, TransactionType, UserName,
};

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("decimal literal")
}

struct Harness {
    bank: Arc<InMemoryBank>,
    accounts: AccountService,
    ledger: LedgerService,
}

impl Harness {
    async fn register(&self, name: &str, email: &str, role: Role) -> Identity {
        let user = UserRepository::create(
            self.bank.as_ref(),
            &NewUser {
                name: UserName::new(name).expect("valid name"),
                email: EmailAddress::new(email).expect("valid email"),
                password_hash: PasswordHash::new("hash"),
                role,
            },
        )
        .await
        .expect("user stored");
        Identity::new(user.id, role)
    }

    async fn open(&self, owner: &Identity, balance: &str) -> Account {
        self.accounts
            .open_account(
                owner,
                OpenAccountRequest {
                    owner: owner.user_id,
                    opening_balance: Amount::new(dec(balance)).expect("valid amount"),
                    account_type: AccountType::Savings,
                    is_primary: true,
                },
            )
            .await
            .expect("account opens")
    }

    async fn balance(&self, account: &Account) -> Decimal {
        AccountRepository::find_by_id(self.bank.as_ref(), &account.id)
            .await
            .expect("lookup succeeds")
            .expect("account exists")
            .balance
    }
}

fn movement(account: &Account, amount: &str) -> MoneyMovement {
    MoneyMovement {
        account_id: account.id,
        amount: Amount::new(dec(amount)).expect("valid amount"),
        description: None,
    }
}

#[fixture]
fn harness() -> Harness {
    let bank = Arc::new(InMemoryBank::new(Arc::new(DefaultClock)));
    Harness {
        accounts: AccountService::new(bank.clone(), Arc::new(DefaultClock)),
        ledger: LedgerService::new(bank.clone(), bank.clone()),
        bank,
    }
}

#[rstest]
#[tokio::test]
async fn deposit_then_overdraw_then_drain(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;
    let account = harness.open(&owner, "100.00").await;

    let deposit = harness
        .ledger
        .deposit(&owner, movement(&account, "50.00"))
        .await
        .expect("deposit succeeds");
    assert_eq!(deposit.transaction.transaction.kind, TransactionType::Deposit);
    assert_eq!(
        deposit.transaction.transaction.status,
        TransactionStatus::Success
    );
    assert_eq!(deposit.transaction.transaction.balance_after, dec("150.00"));

    let err = harness
        .ledger
        .withdraw(&owner, movement(&account, "200.00"))
        .await
        .expect_err("overdraw fails");
    assert_eq!(err.code(), ErrorCode::InsufficientFunds);
    assert_eq!(harness.balance(&account).await, dec("150.00"));

    let history = harness
        .ledger
        .transactions_for_account(&owner, &account.id)
        .await
        .expect("history visible");
    let failed = history.first().expect("newest entry first");
    assert_eq!(failed.transaction.status, TransactionStatus::Failed);
    assert_eq!(failed.transaction.balance_after, dec("150.00"));
    assert_eq!(failed.transaction.amount, dec("200.00"));

    let drain = harness
        .ledger
        .withdraw(&owner, movement(&account, "150.00"))
        .await
        .expect("withdraw succeeds");
    assert_eq!(drain.transaction.transaction.balance_after, dec("0.00"));
    assert_eq!(harness.balance(&account).await, Decimal::ZERO);
}

#[rstest]
#[tokio::test]
async fn withdraw_by_admin_writes_nothing(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;
    let admin = harness
        .register("Root", "root@example.com", Role::Admin)
        .await;
    let account = harness.open(&owner, "100.00").await;

    let err = harness
        .ledger
        .withdraw(&admin, movement(&account, "10.00"))
        .await
        .expect_err("admin cannot withdraw");

    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(harness.balance(&account).await, dec("100.00"));
    let history = harness
        .ledger
        .transactions_for_account(&admin, &account.id)
        .await;
    assert_eq!(history.err().map(|e| e.code()), Some(ErrorCode::NotFound));
}

#[rstest]
#[tokio::test]
async fn anyone_authenticated_may_deposit(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;
    let stranger = harness
        .register("Bob", "bob@example.com", Role::User)
        .await;
    let account = harness.open(&owner, "1.00").await;

    let receipt = harness
        .ledger
        .deposit(&stranger, movement(&account, "2.50"))
        .await
        .expect("deposit succeeds");

    assert_eq!(receipt.transaction.transaction.user_id, stranger.user_id);
    assert_eq!(harness.balance(&account).await, dec("3.50"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_withdrawals_cannot_both_succeed(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;
    let account = harness.open(&owner, "100.00").await;

    let (first, second) = tokio::join!(
        harness.ledger.withdraw(&owner, movement(&account, "70.00")),
        harness.ledger.withdraw(&owner, movement(&account, "60.00")),
    );

    let outcomes = [first, second];
    let succeeded = outcomes.iter().filter(|result| result.is_ok()).count();
    let starved = outcomes
        .iter()
        .filter(|result| {
            matches!(result, Err(err) if err.code() == ErrorCode::InsufficientFunds)
        })
        .count();
    assert_eq!((succeeded, starved), (1, 1));

    let remaining = harness.balance(&account).await;
    assert!(remaining == dec("30.00") || remaining == dec("40.00"));
    assert!(remaining >= Decimal::ZERO);
}

#[rstest]
#[tokio::test]
async fn account_round_trips_through_number_lookup(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;
    let opened = harness.open(&owner, "12.34").await;

    let fetched = harness
        .accounts
        .account_by_number(&owner, &opened.number)
        .await
        .expect("lookup succeeds");

    assert_eq!(fetched, opened);
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_rejected(harness: Harness) {
    harness
        .register("Ada", "ada@example.com", Role::User)
        .await;

    let err = UserRepository::create(
        harness.bank.as_ref(),
        &NewUser {
            name: UserName::new("Ada Two").expect("valid name"),
            email: EmailAddress::new("ada@example.com").expect("valid email"),
            password_hash: PasswordHash::new("hash"),
            role: Role::User,
        },
    )
    .await
    .expect_err("duplicate email");

    assert_eq!(
        err,
        UserPersistenceError::duplicate_email("ada@example.com")
    );
}

#[rstest]
#[tokio::test]
async fn posting_to_a_missing_account_reports_it(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;

    let err = harness
        .ledger
        .deposit(
            &owner,
            MoneyMovement {
                account_id: AccountId::new(999).expect("positive id"),
                amount: Amount::new(dec("1.00")).expect("valid amount"),
                description: None,
            },
        )
        .await
        .expect_err("missing account");

    assert_eq!(err.message(), "Account not exists");
}

#[rstest]
#[tokio::test]
async fn deposits_past_the_balance_ceiling_are_rejected(harness: Harness) {
    let owner = harness
        .register("Ada", "ada@example.com", Role::User)
        .await;
    let account = harness.open(&owner, "999999999999999999.99").await;

    let err = harness
        .ledger
        .deposit(&owner, movement(&account, "0.01"))
        .await
        .expect_err("ceiling reached");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(harness.balance(&account).await, dec("999999999999999999.99"));
    let history = harness
        .ledger
        .transactions_for_account(&owner, &account.id)
        .await;
    assert_eq!(history.err().map(|e| e.code()), Some(ErrorCode::NotFound));
}
