//! Account API handlers.
//!
//! ```text
//! POST /api/account/create {"userId":1,"balance":100.00,"accountType":"SAVINGS","isPrimary":true}
//! GET /api/account/get-account/{accountNumber}
//! GET /api/account/get-account-by-user/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Account, AccountType, Error, OpenAccountRequest, UserId, at_money_scale,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, parse_account_number, parse_amount, parse_body_id, parse_path_id,
    validation_error,
};

const USER_ID: FieldName = FieldName::new("userId");
const BALANCE: FieldName = FieldName::new("balance");
const ACCOUNT_TYPE: FieldName = FieldName::new("accountType");
const ACCOUNT_NUMBER: FieldName = FieldName::new("accountNumber");
const ID: FieldName = FieldName::new("id");

/// Account creation request body.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub is_primary: Option<bool>,
}

impl CreateAccountRequest {
    fn into_domain(self) -> Result<OpenAccountRequest, Error> {
        let owner = parse_body_id(self.user_id, USER_ID, UserId::new)?;
        let opening_balance = parse_amount(self.balance, BALANCE)?;
        let account_type = match self.account_type.as_deref() {
            None => AccountType::default(),
            Some(raw) => raw.parse::<AccountType>().map_err(|err| {
                validation_error(ACCOUNT_TYPE, ValidationCode::InvalidBody, err.to_string())
            })?,
        };
        Ok(OpenAccountRequest {
            owner,
            opening_balance,
            account_type,
            is_primary: self.is_primary.unwrap_or(false),
        })
    }
}

/// Account as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub account_id: i64,
    pub user_id: i64,
    pub account_number: String,
    pub account_type: AccountType,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    pub is_primary: bool,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.get(),
            user_id: account.owner.get(),
            account_number: account.number.to_string(),
            account_type: account.account_type,
            balance: at_money_scale(account.balance),
            is_primary: account.is_primary,
        }
    }
}

/// Open an account for the caller.
#[post("/create")]
pub async fn create_account(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateAccountRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_domain()?;
    let account = state
        .accounts
        .open_account(caller.identity(), request)
        .await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(&account)))
}

/// Look up an account by its number; owner or admin only.
#[get("/get-account/{account_number}")]
pub async fn get_account(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<AccountResponse>> {
    let number = parse_account_number(&path.into_inner(), ACCOUNT_NUMBER)?;
    let account = state
        .accounts
        .account_by_number(caller.identity(), &number)
        .await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

/// List a user's accounts; self or admin only.
#[get("/get-account-by-user/{id}")]
pub async fn get_accounts_by_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<AccountResponse>>> {
    let owner = parse_path_id(path.into_inner(), ID, UserId::new)?;
    let accounts = state
        .accounts
        .accounts_for_user(caller.identity(), &owner)
        .await?;
    Ok(web::Json(accounts.iter().map(AccountResponse::from).collect()))
}
