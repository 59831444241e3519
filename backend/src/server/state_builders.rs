//! Builders wiring storage adapters and domain services into HTTP state.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccountRepository, LedgerStore, PasswordHasher, TokenService, UserRepository,
};
use crate::domain::{
    AccountService, AdminSeeder, AuthService, LedgerService, UserDirectoryService,
};
use crate::inbound::http::state::{CookieSettings, HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryBank;
use crate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselLedgerStore, DieselUserRepository,
};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::AppSettings;

/// Driven storage ports shared by every service.
#[derive(Clone)]
pub struct StorePorts {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub ledger: Arc<dyn LedgerStore>,
}

impl StorePorts {
    /// PostgreSQL adapters sharing one pool.
    pub fn diesel(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
            ledger: Arc::new(DieselLedgerStore::new(pool.clone())),
        }
    }

    /// A single in-process store backing all three ports.
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        let bank = Arc::new(InMemoryBank::new(clock));
        Self {
            users: bank.clone(),
            accounts: bank.clone(),
            ledger: bank,
        }
    }

    /// Pick the Diesel adapters when a pool exists, else the in-memory store.
    pub fn from_pool(pool: Option<&DbPool>, clock: Arc<dyn Clock>) -> Self {
        match pool {
            Some(pool) => Self::diesel(pool),
            None => Self::in_memory(clock),
        }
    }
}

/// Security knobs the services need beyond storage.
#[derive(Clone)]
pub struct SecurityConfig {
    pub jwt_secret: Zeroizing<Vec<u8>>,
    pub token_lifetime: Duration,
    pub cookies: CookieSettings,
}

impl From<&AppSettings> for SecurityConfig {
    fn from(settings: &AppSettings) -> Self {
        Self {
            jwt_secret: settings.jwt_secret.clone(),
            token_lifetime: settings.token_lifetime,
            cookies: CookieSettings {
                secure: settings.cookie_secure,
                max_age: settings.cookie_max_age,
            },
        }
    }
}

/// Everything the server needs once storage is chosen.
pub struct ServerState {
    pub http: web::Data<HttpState>,
    pub admin_seeder: AdminSeeder,
}

/// Assemble services over `stores` using the real hasher and token adapters.
pub fn build_server_state(stores: StorePorts, security: SecurityConfig) -> ServerState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &security.jwt_secret,
        security.token_lifetime,
        clock.clone(),
    ));

    let ports = HttpStatePorts {
        auth: Arc::new(AuthService::new(
            stores.users.clone(),
            hasher.clone(),
            tokens,
        )),
        accounts: Arc::new(AccountService::new(stores.accounts.clone(), clock)),
        ledger: Arc::new(LedgerService::new(stores.ledger, stores.accounts)),
        users: Arc::new(UserDirectoryService::new(
            stores.users.clone(),
            hasher.clone(),
        )),
    };

    ServerState {
        http: web::Data::new(HttpState::new(ports, security.cookies)),
        admin_seeder: AdminSeeder::new(stores.users, hasher),
    }
}
