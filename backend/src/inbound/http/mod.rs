//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod identity;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod transactions;
pub mod users;
pub mod validation;

pub use error::{ApiResult, ErrorEnvelope};

/// Register the `/api` routes together with the extractor error handlers.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .app_data(validation::path_config())
        .service(
            web::scope("/api/auth")
                .service(auth::signup)
                .service(auth::login)
                .service(auth::me)
                .service(auth::logout),
        )
        .service(
            web::scope("/api/account")
                .service(accounts::create_account)
                .service(accounts::get_account)
                .service(accounts::get_accounts_by_user),
        )
        .service(
            web::scope("/api/transaction")
                .service(transactions::deposit)
                .service(transactions::withdraw)
                .service(transactions::get_transaction)
                .service(transactions::get_transactions_by_account),
        )
        .service(
            web::scope("/api/users")
                .service(users::create_user)
                .service(users::get_all_users)
                .service(users::get_user),
        );
}
