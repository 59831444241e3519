//! Positive integer identifiers for users, accounts, and transactions.
//!
//! All three are `BIGSERIAL` keys in storage and JSON integers on the wire.
//! Zero and negative values never identify a record, so construction rejects
//! them up front.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raised when an identifier is not a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("identifier must be a positive integer, got {value}")]
pub struct InvalidId {
    /// The rejected raw value.
    pub value: i64,
}

macro_rules! positive_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub fn new(value: i64) -> Result<Self, InvalidId> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(InvalidId { value })
                }
            }

            /// Raw integer value.
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = InvalidId;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id! {
    /// Identifier of a registered user.
    UserId
}

positive_id! {
    /// Identifier of a bank account.
    AccountId
}

positive_id! {
    /// Identifier of a ledger transaction.
    TransactionId
}
