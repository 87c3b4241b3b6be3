// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures raised by the ledger at the input boundary.
///
/// The balance and aggregation engines never surface these for recoverable
/// anomalies; a vanished account or a malformed date degrades to a no-op or a
/// default instead.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account {0} not found")]
    AccountNotFound(String),
    #[error("Category {0} not found")]
    CategoryNotFound(String),
    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
    #[error("Amount must be positive, got {0}")]
    NegativeAmount(String),
    #[error("Amount must be greater than zero")]
    ZeroAmount,
    #[error("Initial balance must be zero or greater, got {0}")]
    NegativeInitialBalance(String),
    #[error("Amount {0} exceeds the 9999999999.99 limit")]
    AmountTooLarge(String),
    #[error("Amount {0} has more than two decimal places")]
    TooManyDecimals(String),
    #[error("Category '{category}' is {category_kind} but the transaction is {kind}")]
    CategoryKindMismatch {
        category: String,
        category_kind: String,
        kind: String,
    },
    #[error("Unknown {what} '{value}'")]
    InvalidKind { what: &'static str, value: String },
    #[error("Unknown color '{0}' (use indigo|blue|purple|green|emerald|amber|pink|red)")]
    InvalidColor(String),
    #[error("Invalid decimal '{0}' stored in {1}")]
    CorruptAmount(String, &'static str),
    #[error("Invalid date '{0}' stored in {1}")]
    CorruptDate(String, &'static str),
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),
}

pub type LedgerResult<T> = Result<T, LedgerError>;
