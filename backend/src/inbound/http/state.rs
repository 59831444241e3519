//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{AccountRegistry, AuthCommand, TransactionLedger, UserDirectory};

/// Settings for the `accessToken` cookie issued at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Mark the cookie `Secure` (production deployments).
    pub secure: bool,
    /// Cookie lifetime.
    pub max_age: Duration,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: false,
            max_age: Duration::from_secs(3600),
        }
    }
}

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthCommand>,
    pub accounts: Arc<dyn AccountRegistry>,
    pub ledger: Arc<dyn TransactionLedger>,
    pub users: Arc<dyn UserDirectory>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub accounts: Arc<dyn AccountRegistry>,
    pub ledger: Arc<dyn TransactionLedger>,
    pub users: Arc<dyn UserDirectory>,
    pub cookies: CookieSettings,
}

impl HttpState {
    /// Construct state from a ports bundle and cookie settings.
    pub fn new(ports: HttpStatePorts, cookies: CookieSettings) -> Self {
        let HttpStatePorts {
            auth,
            accounts,
            ledger,
            users,
        } = ports;
        Self {
            auth,
            accounts,
            ledger,
            users,
            cookies,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, CookieSettings::default())
    }
}
