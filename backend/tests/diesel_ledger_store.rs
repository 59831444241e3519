//! Integration tests for the Diesel adapters against a real PostgreSQL.
//!
//! Set `BANK_TEST_DATABASE_URL` to run them; each test creates its own users
//! so runs can share a database.

use std::str::FromStr;

use banking_backend::domain::ports::{
    AccountPersistenceError, AccountRepository, LedgerStore, UserPersistenceError, UserRepository,
};
use banking_backend::domain::{
    Account, AccountId, AccountNumber, AccountType, Amount, EmailAddress, Identity, NewAccount,
    NewUser, PasswordHash, PostingOutcome, PostingRequest, Role, TransactionStatus,
    TransactionType, User, UserId, UserName,
};
use banking_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselLedgerStore, DieselUserRepository,
};
use chrono::Utc;
use rust_decimal::Decimal;

mod support;

use support::{migrated_pool, test_database_url, unique_email};

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).expect("decimal literal")
}

struct Adapters {
    users: DieselUserRepository,
    accounts: DieselAccountRepository,
    ledger: DieselLedgerStore,
}

impl Adapters {
    fn new(pool: DbPool) -> Self {
        Self {
            users: DieselUserRepository::new(pool.clone()),
            accounts: DieselAccountRepository::new(pool.clone()),
            ledger: DieselLedgerStore::new(pool),
        }
    }

    async fn user(&self, prefix: &str, role: Role) -> User {
        self.users
            .create(&NewUser {
                name: UserName::new(prefix).expect("valid name"),
                email: EmailAddress::new(unique_email(prefix)).expect("valid email"),
                password_hash: PasswordHash::new("$argon2id$stub"),
                role,
            })
            .await
            .expect("user inserts")
    }

    async fn account(&self, owner: &User, balance: &str) -> Account {
        self.accounts
            .create(&NewAccount {
                owner: owner.id,
                number: AccountNumber::generate(owner.id, Utc::now()),
                account_type: AccountType::Savings,
                balance: dec(balance),
                is_primary: true,
            })
            .await
            .expect("account inserts")
    }
}

async fn adapters(test: &str) -> Option<Adapters> {
    let url = test_database_url(test)?;
    Some(Adapters::new(migrated_pool(&url).await))
}

fn posting(account: &Account, actor: &User, kind: TransactionType, amount: &str) -> PostingRequest {
    PostingRequest {
        account_id: account.id,
        kind,
        amount: Amount::new(dec(amount)).expect("valid amount"),
        description: None,
        actor: Identity::new(actor.id, actor.role),
    }
}

#[tokio::test]
async fn users_round_trip_and_reject_duplicate_emails() {
    let Some(db) = adapters("users_round_trip_and_reject_duplicate_emails").await else {
        return;
    };
    let ada = db.user("ada", Role::User).await;

    let by_email = db
        .users
        .find_by_email(&ada.email)
        .await
        .expect("lookup succeeds")
        .expect("user exists");
    assert_eq!(by_email.user, ada);
    assert_eq!(by_email.password_hash.as_str(), "$argon2id$stub");

    let by_id = db.users.find_by_id(&ada.id).await.expect("lookup succeeds");
    assert_eq!(by_id, Some(ada.clone()));

    let err = db
        .users
        .create(&NewUser {
            name: UserName::new("Ada Again").expect("valid name"),
            email: ada.email.clone(),
            password_hash: PasswordHash::new("$argon2id$stub"),
            role: Role::User,
        })
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, UserPersistenceError::DuplicateEmail { .. }));
}

#[tokio::test]
async fn admin_presence_is_reported() {
    let Some(db) = adapters("admin_presence_is_reported").await else {
        return;
    };
    db.user("root", Role::Admin).await;

    let exists = db
        .users
        .exists_with_role(Role::Admin)
        .await
        .expect("query succeeds");
    assert!(exists);
}

#[tokio::test]
async fn accounts_are_found_by_number_and_owner() {
    let Some(db) = adapters("accounts_are_found_by_number_and_owner").await else {
        return;
    };
    let owner = db.user("owner", Role::User).await;
    let opened = db.account(&owner, "250.50").await;

    let by_number = db
        .accounts
        .find_by_number(&opened.number)
        .await
        .expect("lookup succeeds");
    assert_eq!(by_number, Some(opened.clone()));

    let owned = db
        .accounts
        .list_by_owner(&owner.id)
        .await
        .expect("lookup succeeds");
    assert_eq!(owned, vec![opened]);
}

#[tokio::test]
async fn accounts_for_unknown_owners_are_rejected() {
    let Some(db) = adapters("accounts_for_unknown_owners_are_rejected").await else {
        return;
    };

    let err = db
        .accounts
        .create(&NewAccount {
            owner: UserId::new(i64::MAX).expect("positive id"),
            number: AccountNumber::parse("ACC-9-1").expect("number"),
            account_type: AccountType::Checking,
            balance: Decimal::ZERO,
            is_primary: false,
        })
        .await
        .expect_err("missing owner");
    assert!(matches!(err, AccountPersistenceError::MissingOwner { .. }));
}

#[tokio::test]
async fn postings_update_balances_and_record_history() {
    let Some(db) = adapters("postings_update_balances_and_record_history").await else {
        return;
    };
    let owner = db.user("saver", Role::User).await;
    let stranger = db.user("stranger", Role::User).await;
    let account = db.account(&owner, "100.00").await;

    let deposit = db
        .ledger
        .post(&posting(&account, &stranger, TransactionType::Deposit, "50.25"))
        .await
        .expect("deposit posts");
    let PostingOutcome::Recorded {
        account: after_deposit,
        transaction: deposit_entry,
    } = deposit
    else {
        panic!("deposit should record, got {deposit:?}");
    };
    assert_eq!(after_deposit.balance, dec("150.25"));
    assert_eq!(deposit_entry.user_id, stranger.id);
    assert_eq!(deposit_entry.status, TransactionStatus::Success);

    let overdraw = db
        .ledger
        .post(&posting(&account, &owner, TransactionType::Withdraw, "500.00"))
        .await
        .expect("overdraw posts");
    let PostingOutcome::Recorded {
        account: after_failure,
        transaction: failure,
    } = overdraw
    else {
        panic!("overdraw should record a failure, got {overdraw:?}");
    };
    assert_eq!(failure.status, TransactionStatus::Failed);
    assert_eq!(failure.balance_after, dec("150.25"));
    assert_eq!(after_failure.balance, dec("150.25"));

    let refused = db
        .ledger
        .post(&posting(&account, &stranger, TransactionType::Withdraw, "1.00"))
        .await
        .expect("refusal is not an error");
    assert_eq!(refused, PostingOutcome::Refused);

    let history = db
        .ledger
        .list_for_account(&account.id)
        .await
        .expect("history loads");
    let ids: Vec<_> = history.iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![failure.id, deposit_entry.id]);

    let fetched = db
        .ledger
        .find_transaction(&deposit_entry.id)
        .await
        .expect("lookup succeeds");
    assert_eq!(fetched, Some(deposit_entry));
}

#[tokio::test]
async fn postings_to_missing_accounts_write_nothing() {
    let Some(db) = adapters("postings_to_missing_accounts_write_nothing").await else {
        return;
    };
    let owner = db.user("ghost", Role::User).await;
    let missing = AccountId::new(i64::MAX).expect("positive id");

    let outcome = db
        .ledger
        .post(&PostingRequest {
            account_id: missing,
            kind: TransactionType::Deposit,
            amount: Amount::new(dec("1.00")).expect("valid amount"),
            description: None,
            actor: Identity::new(owner.id, owner.role),
        })
        .await
        .expect("post runs");

    assert_eq!(outcome, PostingOutcome::AccountMissing);
    let history = db
        .ledger
        .list_for_account(&missing)
        .await
        .expect("history loads");
    assert!(history.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_withdrawals_are_serialised() {
    let Some(db) = adapters("concurrent_withdrawals_are_serialised").await else {
        return;
    };
    let owner = db.user("racer", Role::User).await;
    let account = db.account(&owner, "100.00").await;
    let first = posting(&account, &owner, TransactionType::Withdraw, "70.00");
    let second = posting(&account, &owner, TransactionType::Withdraw, "60.00");

    let (a, b) = tokio::join!(db.ledger.post(&first), db.ledger.post(&second));

    let statuses: Vec<TransactionStatus> = [a, b]
        .into_iter()
        .map(|outcome| match outcome.expect("post runs") {
            PostingOutcome::Recorded { transaction, .. } => transaction.status,
            other => panic!("unexpected outcome {other:?}"),
        })
        .collect();
    assert_eq!(
        statuses
            .iter()
            .filter(|status| **status == TransactionStatus::Success)
            .count(),
        1
    );
    assert!(statuses.contains(&TransactionStatus::Failed));

    let stored = db
        .accounts
        .find_by_id(&account.id)
        .await
        .expect("lookup succeeds")
        .expect("account exists");
    assert!(stored.balance == dec("30.00") || stored.balance == dec("40.00"));
}
