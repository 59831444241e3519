//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/signup {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/auth/login {"email":"ada@example.com","password":"secret1"}
//! GET /api/auth/me
//! POST /api/auth/logout
//! ```

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AuthSession, LoginCredentials, Role, SignupDetails, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::{CookieSettings, HttpState};
use crate::inbound::http::validation::credentials_error;

/// Name of the cookie mirroring the bearer token after login.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Signup request body.
#[derive(Debug, Deserialize, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
            role: user.role,
        }
    }
}

/// Body returned by signup and login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub user: UserResponse,
}

impl From<&AuthSession> for AuthResponse {
    fn from(session: &AuthSession) -> Self {
        Self {
            access_token: session.access_token.as_str().to_owned(),
            user: UserResponse::from(&session.user),
        }
    }
}

/// Body returned by `GET /api/auth/me`.
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: UserResponse,
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

fn access_token_cookie(token: &str, settings: CookieSettings) -> Cookie<'static> {
    let max_age = i64::try_from(settings.max_age.as_secs()).unwrap_or(i64::MAX);
    Cookie::build(ACCESS_TOKEN_COOKIE, token.to_owned())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(time::Duration::seconds(max_age))
        .finish()
}

/// Register a USER and return a fresh access token.
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let details = SignupDetails::try_from_parts(&name, &email, &password)
        .map_err(|err| credentials_error(&err))?;
    let session = state.auth.signup(details).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(&session)))
}

/// Exchange credentials for an access token, also set as a cookie.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { email, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&email, &password).map_err(|err| credentials_error(&err))?;
    let session = state.auth.login(credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(access_token_cookie(
            session.access_token.as_str(),
            state.cookies,
        ))
        .json(AuthResponse::from(&session)))
}

/// Return the user behind the bearer token.
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<MeResponse>> {
    let user = state.auth.current_user(caller.identity()).await?;
    Ok(web::Json(MeResponse {
        user: UserResponse::from(&user),
    }))
}

/// Expire the access token cookie.
#[post("/logout")]
pub async fn logout() -> HttpResponse {
    let mut removal = Cookie::build(ACCESS_TOKEN_COOKIE, "").path("/").finish();
    removal.make_removal();
    HttpResponse::Ok().cookie(removal).json(MessageResponse {
        message: "Logged out successfully".to_owned(),
    })
}
