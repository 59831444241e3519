//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users.
    users (id) {
        /// Primary key.
        id -> Int8,
        /// Display name.
        name -> Varchar,
        /// Unique login email.
        email -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Varchar,
        /// `USER` or `ADMIN`.
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bank accounts; `balance` is only written by ledger postings.
    accounts (id) {
        /// Primary key.
        id -> Int8,
        /// Owning user.
        user_id -> Int8,
        /// Unique `ACC-<owner>-<millis>` number.
        account_number -> Varchar,
        /// `SAVINGS`, `CHECKING`, `CREDIT`, or `LOAN`.
        account_type -> Varchar,
        /// Current balance, `NUMERIC(20,2)`, never negative.
        balance -> Numeric,
        /// Primary-account flag.
        is_primary -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only ledger entries.
    transactions (id) {
        /// Primary key.
        id -> Int8,
        /// Target account.
        account_id -> Int8,
        /// Acting user.
        user_id -> Int8,
        /// `DEPOSIT` or `WITHDRAW`.
        transaction_type -> Varchar,
        /// Requested amount, strictly positive.
        amount -> Numeric,
        /// `SUCCESS` or `FAILED`.
        status -> Varchar,
        /// Optional note.
        description -> Nullable<Varchar>,
        /// Account balance right after the attempt.
        balance_after -> Numeric,
        /// Insertion timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(accounts -> users (user_id));
diesel::joinable!(transactions -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(users, accounts, transactions);
