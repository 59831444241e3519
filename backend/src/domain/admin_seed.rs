//! Startup seeding of the first ADMIN user.
//!
//! Runs once per process start. The seed is skipped when any ADMIN already
//! exists, so restarting with the same settings is harmless.

use std::sync::Arc;

use tracing::info;

use crate::domain::port_error_mapping::{map_hash_error, map_user_persistence_error};
use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::{Error, NewUser, Role, SignupDetails, UserId};

/// Validated admin credentials read from configuration.
pub type AdminSeed = SignupDetails;

/// Result of a seeding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminSeedOutcome {
    /// A new ADMIN user was inserted.
    Created(UserId),
    /// An ADMIN user already existed; nothing was written.
    AlreadyPresent,
}

/// Seeds an ADMIN user through the user repository.
#[derive(Clone)]
pub struct AdminSeeder {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AdminSeeder {
    /// Create a seeder from its driven ports.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Insert the configured admin unless one already exists.
    pub async fn seed(&self, seed: &AdminSeed) -> Result<AdminSeedOutcome, Error> {
        let exists = self
            .users
            .exists_with_role(Role::Admin)
            .await
            .map_err(map_user_persistence_error)?;
        if exists {
            info!("admin already exists; seeding skipped");
            return Ok(AdminSeedOutcome::AlreadyPresent);
        }

        let password_hash = self
            .hasher
            .hash(&seed.password)
            .await
            .map_err(map_hash_error)?;
        let admin = self
            .users
            .create(&NewUser {
                name: seed.name.clone(),
                email: seed.email.clone(),
                password_hash,
                role: Role::Admin,
            })
            .await
            .map_err(map_user_persistence_error)?;

        info!(user_id = %admin.id, "admin seeded");
        Ok(AdminSeedOutcome::Created(admin.id))
    }
}
