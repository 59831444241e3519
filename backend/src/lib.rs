//! Banking ledger backend: user accounts, balances, and an append-only
//! transaction history served over a JSON HTTP API.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use middleware::Trace;
