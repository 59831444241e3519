//! Bearer-token extraction for authenticated handlers.
//!
//! Handlers take an [`Authenticated`] argument to require a valid
//! `Authorization: Bearer <token>` header. Verification is delegated to the
//! [`AuthCommand`](crate::domain::ports::AuthCommand) port held in
//! [`HttpState`].

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, Identity};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Acting identity of an authenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub Identity);

impl Authenticated {
    /// The verified identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, Error> {
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        warn!("HttpState missing from app data");
        return Err(Error::internal("HTTP state not configured"));
    };
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized("Unauthorized"))?;
    state.auth.authenticate(token).map(Authenticated)
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::Value;

    use crate::domain::ports::MockAuthCommand;
    use crate::domain::{Role, UserId};
    use crate::inbound::http::test_utils::state_with;

    fn identity() -> Identity {
        Identity::new(UserId::new(4).expect("positive id"), Role::User)
    }

    async fn extract(auth: MockAuthCommand, header: Option<&str>) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state_with(|ports| {
                    ports.auth = std::sync::Arc::new(auth);
                })))
                .route(
                    "/",
                    web::get().to(|caller: Authenticated| async move {
                        HttpResponse::Ok().json(caller.identity().user_id)
                    }),
                ),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        let body = test::read_body_json(res).await;
        (status, body)
    }

    #[actix_web::test]
    async fn valid_bearer_tokens_resolve_the_identity() {
        let mut auth = MockAuthCommand::new();
        auth.expect_authenticate()
            .withf(|token| token.to_string() == "good")
            .return_once(|_| Ok(identity()));

        let (status, body) = extract(auth, Some("Bearer good")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::from(4));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Basic abc"))]
    #[case(Some("Bearer "))]
    #[actix_web::test]
    async fn missing_or_foreign_schemes_are_unauthorized(#[case] header: Option<&str>) {
        let mut auth = MockAuthCommand::new();
        auth.expect_authenticate().times(0);

        let (status, body) = extract(auth, header).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.get("message").and_then(Value::as_str), Some("Unauthorized"));
    }

    #[actix_web::test]
    async fn rejected_tokens_surface_the_port_error() {
        let mut auth = MockAuthCommand::new();
        auth.expect_authenticate()
            .return_once(|_| Err(Error::unauthorized("Invalid or expired token")));

        let (status, body) = extract(auth, Some("Bearer stale")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body.get("message").and_then(Value::as_str),
            Some("Invalid or expired token")
        );
    }
}
