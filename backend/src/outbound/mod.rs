//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: an in-process store for local runs and tests
//! - **security**: argon2 password hashing and JWT bearer tokens
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. Ledger rules stay in the domain.

pub mod memory;
pub mod persistence;
pub mod security;
