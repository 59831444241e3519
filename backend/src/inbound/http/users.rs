//! User directory API handlers.
//!
//! ```text
//! POST /api/users/create-user {"name":"Bob","email":"bob@example.com","password":"secret1"}
//! GET /api/users/get-all-users
//! GET /api/users/get-user/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{SignupDetails, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::SignupRequest;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, credentials_error, parse_path_id};

/// Directory entry; roles are not exposed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for DirectoryUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name.as_ref().to_owned(),
            email: user.email.as_ref().to_owned(),
        }
    }
}

/// Create a USER account on someone's behalf (ADMIN only).
#[post("/create-user")]
pub async fn create_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let SignupRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let details = SignupDetails::try_from_parts(&name, &email, &password)
        .map_err(|err| credentials_error(&err))?;
    let user = state.users.create_user(caller.identity(), details).await?;
    Ok(HttpResponse::Created().json(DirectoryUser::from(&user)))
}

/// List every user (ADMIN only).
#[get("/get-all-users")]
pub async fn get_all_users(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<DirectoryUser>>> {
    let users = state.users.list_users(caller.identity()).await?;
    Ok(web::Json(users.iter().map(DirectoryUser::from).collect()))
}

#[get("/get-user/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<DirectoryUser>> {
    let id = parse_path_id(path.into_inner(), FieldName::new("id"), UserId::new)?;
    let user = state.users.user(caller.identity(), &id).await?;
    Ok(web::Json(DirectoryUser::from(&user)))
}
