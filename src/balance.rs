// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account balance recalculation.
//!
//! An account's `current_balance` is never adjusted incrementally. Every
//! transaction mutation re-derives it from the account's full transaction set:
//!
//! ```text
//! current_balance = initial_balance + Σ income − Σ expense
//! ```
//!
//! This costs an O(n) scan of the account's transactions per mutation and in
//! exchange cannot drift from missed events or partial failures. Callers run
//! the recalculation inside the same SQLite transaction as the mutation it
//! follows, so either both commit or neither does.

use crate::errors::LedgerResult;
use crate::models::Kind;
use crate::utils::{fmt_amount, stored_decimal};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

/// Income and expense sums over one account's transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
}

impl Totals {
    /// Adds `amount` to the side `kind` selects. Sums clamp at the decimal
    /// range instead of overflowing.
    pub fn add(&mut self, kind: Kind, amount: Decimal) {
        let slot = match kind {
            Kind::Income => &mut self.income,
            Kind::Expense => &mut self.expense,
        };
        *slot = saturating_sum(*slot, amount);
    }

    pub fn net(&self) -> Decimal {
        self.income.saturating_sub(self.expense)
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expense.is_zero()
    }
}

pub fn apply(initial_balance: Decimal, totals: &Totals) -> Decimal {
    saturating_sum(initial_balance, totals.net())
}

pub fn saturating_sum(a: Decimal, b: Decimal) -> Decimal {
    a.checked_add(b).unwrap_or_else(|| {
        tracing::warn!(lhs = %a, rhs = %b, "decimal sum overflowed, clamping");
        a.saturating_add(b)
    })
}

/// Sums every transaction booked against `account_id`, trusting each row's
/// own `type` column rather than its category.
pub fn account_totals(conn: &Connection, account_id: i64) -> LedgerResult<Totals> {
    let mut stmt =
        conn.prepare_cached("SELECT type, amount FROM transactions WHERE account_id=?1")?;
    let mut rows = stmt.query(params![account_id])?;
    let mut totals = Totals::default();
    while let Some(r) = rows.next()? {
        let kind: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let kind = kind.parse::<Kind>()?;
        totals.add(kind, stored_decimal(&amount, "transactions.amount")?);
    }
    Ok(totals)
}

/// The balance `account_id` should carry given its current transactions, or
/// `None` if the account does not exist.
pub fn expected_balance(conn: &Connection, account_id: i64) -> LedgerResult<Option<Decimal>> {
    Ok(account_state(conn, account_id)?.map(|(initial, totals)| apply(initial, &totals)))
}

fn account_state(conn: &Connection, account_id: i64) -> LedgerResult<Option<(Decimal, Totals)>> {
    let initial: Option<String> = conn
        .query_row(
            "SELECT initial_balance FROM accounts WHERE id=?1",
            params![account_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(initial) = initial else {
        return Ok(None);
    };
    let initial = stored_decimal(&initial, "accounts.initial_balance")?;
    Ok(Some((initial, account_totals(conn, account_id)?)))
}

/// Recomputes and persists `current_balance` for `account_id`.
///
/// Returns the new balance, or `None` when the account has vanished (for
/// example deleted by a concurrent request), which is a silent no-op.
pub fn recalculate_balance(conn: &Connection, account_id: i64) -> LedgerResult<Option<Decimal>> {
    let Some((initial, totals)) = account_state(conn, account_id)? else {
        tracing::warn!(account_id, "skipping recalculation, account no longer exists");
        return Ok(None);
    };
    let balance = apply(initial, &totals);
    conn.execute(
        "UPDATE accounts SET current_balance=?1 WHERE id=?2",
        params![fmt_amount(&balance), account_id],
    )?;
    tracing::debug!(
        account_id,
        income = %totals.income,
        expense = %totals.expense,
        balance = %balance,
        "recalculated account balance"
    );
    Ok(Some(balance))
}

/// Recalculation triggered by a transaction update. The new account is always
/// recalculated; the previous one only when the transaction moved.
pub fn recalculate_after_move(
    conn: &Connection,
    previous_account: i64,
    current_account: i64,
) -> LedgerResult<()> {
    recalculate_balance(conn, current_account)?;
    if previous_account != current_account {
        recalculate_balance(conn, previous_account)?;
    }
    Ok(())
}
