//! Shared helpers for the PostgreSQL-backed integration suites.
//!
//! Suites read `BANK_TEST_DATABASE_URL`. When it is unset they print a skip
//! marker and return early, so `cargo test` stays green on machines without
//! a database.

use banking_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

const DATABASE_URL_ENV: &str = "BANK_TEST_DATABASE_URL";

/// Return the test database URL, or print a skip marker when unset.
pub fn test_database_url(test: &str) -> Option<String> {
    match std::env::var(DATABASE_URL_ENV) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("SKIP-TEST-DATABASE: {test} ({DATABASE_URL_ENV} not set)");
            None
        }
    }
}

/// Apply migrations and open a small pool against `url`.
pub async fn migrated_pool(url: &str) -> DbPool {
    let migration_url = url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .expect("migration task joins")
        .expect("migrations apply");
    DbPool::new(PoolConfig::new(url).with_max_size(4))
        .await
        .expect("pool builds")
}

/// Email unique to this run so suites can share one database.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@bank.test", uuid::Uuid::new_v4().simple())
}
