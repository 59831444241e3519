//! Backend entry-point: loads settings, prepares storage, seeds the admin,
//! and serves the banking API.

use std::net::SocketAddr;

use actix_web::web;
use mockable::{Clock, DefaultClock, DefaultEnv};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use banking_backend::domain::{AdminSeedOutcome, ErrorCode};
use banking_backend::inbound::http::health::HealthState;
use banking_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use banking_backend::server::{
    AppSettings, BuildMode, SecurityConfig, StorePorts, build_server_state, create_server,
};

async fn connect_database(settings: &AppSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.clone() else {
        warn!("DATABASE_URL not set; using the in-memory store");
        return Ok(None);
    };

    let migration_url = url.clone();
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|err| std::io::Error::other(format!("migration task failed: {err}")))?
        .map_err(|err| std::io::Error::other(format!("migrations failed: {err}")))?;
    info!(applied, "database migrations complete");

    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool failed: {err}")))?;
    Ok(Some(pool))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(settings = ?settings, "configuration loaded");

    let pool = connect_database(&settings).await?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let stores = StorePorts::from_pool(pool.as_ref(), clock);
    let state = build_server_state(stores, SecurityConfig::from(&settings));

    if let Some(seed) = &settings.admin_seed {
        match state.admin_seeder.seed(seed).await {
            Ok(AdminSeedOutcome::Created(id)) => info!(user_id = %id, "admin user created"),
            Ok(AdminSeedOutcome::AlreadyPresent) => {}
            Err(err) if err.code() == ErrorCode::ServiceUnavailable => {
                return Err(std::io::Error::other(format!(
                    "admin seed failed: {}",
                    err.message()
                )));
            }
            Err(err) => error!(code = ?err.code(), message = err.message(), "admin seed failed"),
        }
    }

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(state.http, health_state, bind_addr)?;
    info!(%bind_addr, "banking service listening");
    server.await
}
