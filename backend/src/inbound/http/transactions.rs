//! Transaction API handlers.
//!
//! ```text
//! POST /api/transaction/deposit {"amount":50.25,"accountId":1,"description":"salary"}
//! POST /api/transaction/withdraw {"amount":20.00,"accountId":1}
//! GET /api/transaction/get-transaction/{id}
//! GET /api/transaction/get-transactions-by-account/{accountId}
//! ```
//!
//! Deposits are open to any authenticated caller; withdrawals require the
//! caller to own the account. The asymmetry is deliberate and enforced in
//! the ledger service.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ports::MoneyMovement;
use crate::domain::{
    AccountId, Error, TransactionId, TransactionRecord, TransactionStatus, TransactionType,
    at_money_scale,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_amount, parse_body_id, parse_description, parse_path_id,
};

const AMOUNT: FieldName = FieldName::new("amount");
const ACCOUNT_ID: FieldName = FieldName::new("accountId");
const DESCRIPTION: FieldName = FieldName::new("description");
const ID: FieldName = FieldName::new("id");

/// Deposit or withdrawal request body.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyMovementRequest {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub account_id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

impl MoneyMovementRequest {
    fn into_domain(self) -> Result<MoneyMovement, Error> {
        Ok(MoneyMovement {
            account_id: parse_body_id(self.account_id, ACCOUNT_ID, AccountId::new)?,
            amount: parse_amount(self.amount, AMOUNT)?,
            description: parse_description(self.description.as_deref(), DESCRIPTION)?,
        })
    }
}

/// Ledger entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance_after: Decimal,
    pub account_id: i64,
    pub account_number: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<&TransactionRecord> for TransactionResponse {
    fn from(record: &TransactionRecord) -> Self {
        let entry = &record.transaction;
        Self {
            id: entry.id.get(),
            kind: entry.kind,
            amount: at_money_scale(entry.amount),
            status: entry.status,
            description: entry
                .description
                .as_ref()
                .map(|text| text.as_ref().to_owned()),
            balance_after: at_money_scale(entry.balance_after),
            account_id: entry.account_id.get(),
            account_number: record.account_number.to_string(),
            user_id: entry.user_id.get(),
            created_at: entry.created_at,
        }
    }
}

/// Credit an account.
#[post("/deposit")]
pub async fn deposit(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<MoneyMovementRequest>,
) -> ApiResult<HttpResponse> {
    let movement = payload.into_inner().into_domain()?;
    let receipt = state.ledger.deposit(caller.identity(), movement).await?;
    Ok(HttpResponse::Created().json(TransactionResponse::from(&receipt.transaction)))
}

/// Debit the caller's own account.
#[post("/withdraw")]
pub async fn withdraw(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<MoneyMovementRequest>,
) -> ApiResult<HttpResponse> {
    let movement = payload.into_inner().into_domain()?;
    let receipt = state.ledger.withdraw(caller.identity(), movement).await?;
    Ok(HttpResponse::Created().json(TransactionResponse::from(&receipt.transaction)))
}

#[get("/get-transaction/{id}")]
pub async fn get_transaction(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TransactionResponse>> {
    let id = parse_path_id(path.into_inner(), ID, TransactionId::new)?;
    let record = state.ledger.transaction(caller.identity(), &id).await?;
    Ok(web::Json(TransactionResponse::from(&record)))
}

/// Newest first; non-admins only see entries they made.
#[get("/get-transactions-by-account/{account_id}")]
pub async fn get_transactions_by_account(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<TransactionResponse>>> {
    let account_id = parse_path_id(path.into_inner(), ID, AccountId::new)?;
    let records = state
        .ledger
        .transactions_for_account(caller.identity(), &account_id)
        .await?;
    Ok(web::Json(
        records.iter().map(TransactionResponse::from).collect(),
    ))
}
