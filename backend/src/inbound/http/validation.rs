//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is a 400 `invalid_request` whose details name the field
//! and a machine-readable code, e.g. `{"field": "amount", "code": "not_positive"}`.

use actix_web::{HttpRequest, web};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::debug;

use crate::domain::{
    AccountNumber, Amount, AmountValidationError, CredentialsValidationError, Description, Error,
    InvalidId,
};

/// Message for path identifiers that are not positive integers.
pub(crate) const INVALID_ID_MESSAGE: &str = "Id must be a valid number";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    InvalidBody,
    InvalidId,
    NotPositive,
    TooPrecise,
    TooLarge,
    TooLong,
    Empty,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidBody => "invalid_body",
            Self::InvalidId => "invalid_id",
            Self::NotPositive => "not_positive",
            Self::TooPrecise => "too_precise",
            Self::TooLarge => "too_large",
            Self::TooLong => "too_long",
            Self::Empty => "empty",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(crate) fn validation_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
) -> Error {
    field_error(field.as_str(), code.as_str(), message)
}

/// Map signup/login validation failures onto field errors.
pub(crate) fn credentials_error(err: &CredentialsValidationError) -> Error {
    field_error(err.field(), err.code(), err.to_string())
}

pub(crate) fn parse_amount(value: Decimal, field: FieldName) -> Result<Amount, Error> {
    Amount::new(value).map_err(|err| {
        let code = match err {
            AmountValidationError::NotPositive => ValidationCode::NotPositive,
            AmountValidationError::TooPrecise => ValidationCode::TooPrecise,
            AmountValidationError::TooLarge => ValidationCode::TooLarge,
        };
        validation_error(field, code, err.to_string())
    })
}

/// Validate a body identifier such as `accountId` or `userId`.
pub(crate) fn parse_body_id<T>(
    raw: i64,
    field: FieldName,
    build: fn(i64) -> Result<T, InvalidId>,
) -> Result<T, Error> {
    build(raw).map_err(|_| {
        validation_error(
            field,
            ValidationCode::InvalidId,
            format!("{} must be a positive integer", field.as_str()),
        )
    })
}

/// Validate a path identifier already parsed as an integer.
pub(crate) fn parse_path_id<T>(
    raw: i64,
    field: FieldName,
    build: fn(i64) -> Result<T, InvalidId>,
) -> Result<T, Error> {
    build(raw).map_err(|_| validation_error(field, ValidationCode::InvalidId, INVALID_ID_MESSAGE))
}

pub(crate) fn parse_description(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<Description>, Error> {
    Description::parse(raw)
        .map_err(|err| validation_error(field, ValidationCode::TooLong, err.to_string()))
}

pub(crate) fn parse_account_number(raw: &str, field: FieldName) -> Result<AccountNumber, Error> {
    AccountNumber::parse(raw)
        .map_err(|err| validation_error(field, ValidationCode::Empty, err.to_string()))
}

/// JSON extractor configuration rendering body failures as error envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| {
        debug!(error = %err, "rejected request body");
        let message = match &err {
            actix_web::error::JsonPayloadError::Deserialize(inner) => {
                format!("Invalid request body: {inner}")
            }
            actix_web::error::JsonPayloadError::ContentType => {
                "Content-Type must be application/json".to_owned()
            }
            _ => "Invalid request body".to_owned(),
        };
        field_error("body", ValidationCode::InvalidBody.as_str(), message).into()
    })
}

/// Path extractor configuration rendering non-numeric ids as error envelopes.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        debug!(error = %err, "rejected path parameter");
        field_error("id", ValidationCode::InvalidId.as_str(), INVALID_ID_MESSAGE).into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, ErrorCode, SignupDetails};
    use rstest::rstest;
    use serde_json::Value;

    const AMOUNT: FieldName = FieldName::new("amount");

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|d| d.get(key)).and_then(Value::as_str)
    }

    #[rstest]
    #[case(Decimal::ZERO, "not_positive")]
    #[case(Decimal::new(-500, 2), "not_positive")]
    #[case(Decimal::new(1001, 3), "too_precise")]
    #[case(Decimal::from_i128_with_scale(100_000_000_000_000_000_000, 2), "too_large")]
    #[case(Decimal::from_i128_with_scale(50_000_000_000_000_000_000_000_000_000, 0), "too_large")]
    fn rejects_bad_amounts(#[case] value: Decimal, #[case] code: &str) {
        let err = parse_amount(value, AMOUNT).expect_err("invalid amount");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("amount"));
        assert_eq!(detail(&err, "code"), Some(code));
    }

    #[test]
    fn accepts_two_decimal_amounts() {
        let amount = parse_amount(Decimal::new(1050, 2), AMOUNT).expect("valid amount");
        assert_eq!(amount.value(), Decimal::new(1050, 2));
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn path_ids_must_be_positive(#[case] raw: i64) {
        let err = parse_path_id(raw, FieldName::new("id"), AccountId::new).expect_err("invalid");
        assert_eq!(err.message(), INVALID_ID_MESSAGE);
    }

    #[test]
    fn body_ids_name_their_field() {
        let err = parse_body_id(0, FieldName::new("accountId"), AccountId::new)
            .expect_err("invalid id");
        assert_eq!(err.message(), "accountId must be a positive integer");
        assert_eq!(detail(&err, "field"), Some("accountId"));
    }

    #[test]
    fn long_descriptions_are_rejected() {
        let text = "x".repeat(256);
        let err = parse_description(Some(&text), FieldName::new("description"))
            .expect_err("too long");
        assert_eq!(detail(&err, "code"), Some("too_long"));
    }

    #[test]
    fn credential_errors_keep_their_messages() {
        let err = SignupDetails::try_from_parts("A", "ada@example.com", "secret1")
            .expect_err("short name");
        let mapped = credentials_error(&err);
        assert_eq!(mapped.message(), "Name must be at least 2 characters long");
        assert_eq!(detail(&mapped, "field"), Some("name"));
    }
}
