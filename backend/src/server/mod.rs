//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, BuildMode, ConfigError};
pub use state_builders::{SecurityConfig, ServerState, StorePorts, build_server_state};

use std::net::SocketAddr;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::inbound::http::configure_api;
use crate::inbound::http::health::{HealthState, health, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;

/// Build the application with tracing, the `/api` routes, and health checks.
pub fn build_app(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(http_state)
        .app_data(health_state)
        .wrap(Trace)
        .configure(configure_api)
        .service(health)
        .service(ready)
        .service(live)
}

/// Bind an Actix server on `bind_addr` and mark it ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    http_state: web::Data<HttpState>,
    health_state: web::Data<HealthState>,
    bind_addr: SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(http_state.clone(), server_health_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
