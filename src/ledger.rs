// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Accounts, categories and transactions as stored facts.
//!
//! Every transaction mutation runs in its own SQLite transaction together with
//! the balance recalculation it triggers.

use crate::balance::{recalculate_after_move, recalculate_balance, saturating_sum};
use crate::errors::{LedgerError, LedgerResult};
use crate::models::{
    Account, AccountChanges, Category, CategoryChanges, Kind, NewAccount,
    NewCategory, NewTransaction, Transaction, TransactionChanges, UserId,
};
use crate::utils::{fmt_amount, stored_date, stored_decimal};
use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;
use serde::Serialize;

const NOW: &str = "strftime('%Y-%m-%d %H:%M:%f','now')";

fn read_account(r: &Row<'_>) -> LedgerResult<Account> {
    let kind: String = r.get(3)?;
    let initial: String = r.get(4)?;
    let current: String = r.get(5)?;
    Ok(Account {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        kind: kind.parse()?,
        initial_balance: stored_decimal(&initial, "accounts.initial_balance")?,
        current_balance: stored_decimal(&current, "accounts.current_balance")?,
    })
}

fn read_category(r: &Row<'_>) -> LedgerResult<Category> {
    let kind: String = r.get(3)?;
    Ok(Category {
        id: r.get(0)?,
        user_id: r.get(1)?,
        name: r.get(2)?,
        kind: kind.parse()?,
        color: r.get(4)?,
    })
}

fn read_transaction(r: &Row<'_>) -> LedgerResult<Transaction> {
    let kind: String = r.get(4)?;
    let amount: String = r.get(5)?;
    let date: String = r.get(6)?;
    Ok(Transaction {
        id: r.get(0)?,
        user_id: r.get(1)?,
        account_id: r.get(2)?,
        category_id: r.get(3)?,
        kind: kind.parse()?,
        amount: stored_decimal(&amount, "transactions.amount")?,
        date: stored_date(&date, "transactions.date")?,
        description: r.get(7)?,
        created_at: r.get(8)?,
    })
}

// ---- validation --------------------------------------------------------

/// Stored amounts hold at most ten integer digits and two decimals.
// 0x2_540B_E400 == 10_000_000_000; `Decimal::new` is not const.
pub const MAX_AMOUNT_EXCLUSIVE: Decimal = Decimal::from_parts(0x540B_E400, 2, 0, false, 0);

fn check_precision(amount: Decimal) -> LedgerResult<()> {
    if amount.normalize().scale() > 2 {
        return Err(LedgerError::TooManyDecimals(amount.to_string()));
    }
    if amount.abs() >= MAX_AMOUNT_EXCLUSIVE {
        return Err(LedgerError::AmountTooLarge(amount.to_string()));
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> LedgerResult<()> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeAmount(amount.to_string()));
    }
    check_precision(amount)
}

pub fn validate_initial_balance(amount: Decimal) -> LedgerResult<()> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::NegativeInitialBalance(amount.to_string()));
    }
    check_precision(amount)
}

fn check_category_kind(category: &Category, kind: Kind) -> LedgerResult<()> {
    if category.kind != kind {
        return Err(LedgerError::CategoryKindMismatch {
            category: category.name.clone(),
            category_kind: category.kind.to_string(),
            kind: kind.to_string(),
        });
    }
    Ok(())
}

// ---- accounts ----------------------------------------------------------

pub fn create_account(conn: &Connection, user: UserId, new: &NewAccount) -> LedgerResult<Account> {
    validate_initial_balance(new.initial_balance)?;
    let initial = fmt_amount(&new.initial_balance);
    conn.execute(
        "INSERT INTO accounts(user_id, name, type, initial_balance, current_balance)
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![user, new.name, new.kind.as_str(), initial],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user, account_id = id, name = %new.name, "account created");
    get_account(conn, user, id)
}

pub fn get_account(conn: &Connection, user: UserId, id: i64) -> LedgerResult<Account> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, type, initial_balance, current_balance
         FROM accounts WHERE id=?1 AND user_id=?2",
    )?;
    let mut rows = stmt.query(params![id, user])?;
    if let Some(r) = rows.next()? {
        return read_account(r);
    }
    Err(LedgerError::AccountNotFound(format!("#{}", id)))
}

pub fn list_accounts(conn: &Connection, user: UserId) -> LedgerResult<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, type, initial_balance, current_balance
         FROM accounts WHERE user_id=?1 ORDER BY name, id",
    )?;
    let mut rows = stmt.query(params![user])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(read_account(r)?);
    }
    Ok(out)
}

/// Renames, retypes or rebases an account. A new initial balance is folded
/// into `current_balance` before the change commits.
pub fn update_account(
    conn: &mut Connection,
    user: UserId,
    id: i64,
    changes: &AccountChanges,
) -> LedgerResult<Account> {
    if let Some(initial) = changes.initial_balance {
        validate_initial_balance(initial)?;
    }
    let tx = conn.transaction()?;
    let current = get_account(&tx, user, id)?;
    let name = changes.name.clone().unwrap_or(current.name);
    let kind = changes.kind.unwrap_or(current.kind);
    let initial = changes.initial_balance.unwrap_or(current.initial_balance);
    tx.execute(
        &format!(
            "UPDATE accounts SET name=?1, type=?2, initial_balance=?3, updated_at={} WHERE id=?4",
            NOW
        ),
        params![name, kind.as_str(), fmt_amount(&initial), id],
    )?;
    if initial != current.initial_balance {
        recalculate_balance(&tx, id)?;
    }
    tx.commit()?;
    get_account(conn, user, id)
}

/// Deletes an account and, through the foreign key cascade, its transactions.
pub fn delete_account(conn: &Connection, user: UserId, id: i64) -> LedgerResult<()> {
    let n = conn.execute(
        "DELETE FROM accounts WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    if n == 0 {
        return Err(LedgerError::AccountNotFound(format!("#{}", id)));
    }
    tracing::info!(user, account_id = id, "account deleted");
    Ok(())
}

pub fn total_balance(conn: &Connection, user: UserId) -> LedgerResult<Decimal> {
    Ok(list_accounts(conn, user)?
        .iter()
        .fold(Decimal::ZERO, |acc, a| saturating_sum(acc, a.current_balance)))
}

// ---- categories --------------------------------------------------------

pub fn create_category(
    conn: &Connection,
    user: UserId,
    new: &NewCategory,
) -> LedgerResult<Category> {
    conn.execute(
        "INSERT INTO categories(user_id, name, type, color) VALUES (?1, ?2, ?3, ?4)",
        params![user, new.name, new.kind.as_str(), new.color.as_str()],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(user, category_id = id, name = %new.name, "category created");
    get_category(conn, user, id)
}

pub fn get_category(conn: &Connection, user: UserId, id: i64) -> LedgerResult<Category> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, type, color FROM categories WHERE id=?1 AND user_id=?2",
    )?;
    let mut rows = stmt.query(params![id, user])?;
    if let Some(r) = rows.next()? {
        return read_category(r);
    }
    Err(LedgerError::CategoryNotFound(format!("#{}", id)))
}

pub fn list_categories(conn: &Connection, user: UserId) -> LedgerResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, type, color FROM categories WHERE user_id=?1 ORDER BY name, id",
    )?;
    let mut rows = stmt.query(params![user])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(read_category(r)?);
    }
    Ok(out)
}

pub fn update_category(
    conn: &Connection,
    user: UserId,
    id: i64,
    changes: &CategoryChanges,
) -> LedgerResult<Category> {
    let current = get_category(conn, user, id)?;
    let name = changes.name.clone().unwrap_or(current.name);
    let kind = changes.kind.unwrap_or(current.kind);
    let color = match changes.color {
        Some(c) => Some(c.as_str().to_string()),
        None => current.color,
    };
    conn.execute(
        &format!(
            "UPDATE categories SET name=?1, type=?2, color=?3, updated_at={} WHERE id=?4",
            NOW
        ),
        params![name, kind.as_str(), color, id],
    )?;
    get_category(conn, user, id)
}

/// Deletes a category. Its transactions survive uncategorized; balances are
/// unaffected since they never depend on categories.
pub fn delete_category(conn: &Connection, user: UserId, id: i64) -> LedgerResult<()> {
    let n = conn.execute(
        "DELETE FROM categories WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    if n == 0 {
        return Err(LedgerError::CategoryNotFound(format!("#{}", id)));
    }
    tracing::info!(user, category_id = id, "category deleted");
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub income: usize,
    pub expense: usize,
}

pub fn category_counts(conn: &Connection, user: UserId) -> LedgerResult<CategoryCounts> {
    let mut counts = CategoryCounts::default();
    for c in list_categories(conn, user)? {
        match c.kind {
            Kind::Income => counts.income += 1,
            Kind::Expense => counts.expense += 1,
        }
    }
    Ok(counts)
}

// ---- transactions ------------------------------------------------------

pub fn get_transaction(conn: &Connection, user: UserId, id: i64) -> LedgerResult<Transaction> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, account_id, category_id, type, amount, date, description, created_at
         FROM transactions WHERE id=?1 AND user_id=?2",
    )?;
    let mut rows = stmt.query(params![id, user])?;
    if let Some(r) = rows.next()? {
        return read_transaction(r);
    }
    Err(LedgerError::TransactionNotFound(id))
}

fn check_references(
    conn: &Connection,
    user: UserId,
    account_id: i64,
    category_id: Option<i64>,
    kind: Kind,
) -> LedgerResult<()> {
    get_account(conn, user, account_id)?;
    if let Some(cid) = category_id {
        let category = get_category(conn, user, cid)?;
        check_category_kind(&category, kind)?;
    }
    Ok(())
}

/// Records a transaction and recalculates its account.
pub fn create_transaction(
    conn: &mut Connection,
    user: UserId,
    new: &NewTransaction,
) -> LedgerResult<Transaction> {
    validate_amount(new.amount)?;
    let tx = conn.transaction()?;
    check_references(&tx, user, new.account_id, new.category_id, new.kind)?;
    tx.execute(
        "INSERT INTO transactions(user_id, account_id, category_id, type, amount, date, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user,
            new.account_id,
            new.category_id,
            new.kind.as_str(),
            fmt_amount(&new.amount),
            new.date.to_string(),
            new.description
        ],
    )?;
    let id = tx.last_insert_rowid();
    recalculate_balance(&tx, new.account_id)?;
    tx.commit()?;
    tracing::info!(user, transaction_id = id, account_id = new.account_id, "transaction created");
    get_transaction(conn, user, id)
}

/// Applies `changes` to a transaction. The account it belonged to before the
/// update is captured first; after the update both the current and, if it
/// moved, the previous account are recalculated.
pub fn update_transaction(
    conn: &mut Connection,
    user: UserId,
    id: i64,
    changes: &TransactionChanges,
) -> LedgerResult<Transaction> {
    if let Some(amount) = changes.amount {
        validate_amount(amount)?;
    }
    let tx = conn.transaction()?;
    let before = get_transaction(&tx, user, id)?;
    let account_id = changes.account_id.unwrap_or(before.account_id);
    let category_id = changes.category.unwrap_or(before.category_id);
    let kind = changes.kind.unwrap_or(before.kind);
    let amount = changes.amount.unwrap_or(before.amount);
    let date = changes.date.unwrap_or(before.date);
    let description = changes
        .description
        .clone()
        .unwrap_or(before.description);
    check_references(&tx, user, account_id, category_id, kind)?;
    tx.execute(
        &format!(
            "UPDATE transactions SET account_id=?1, category_id=?2, type=?3, amount=?4, date=?5,
             description=?6, updated_at={} WHERE id=?7",
            NOW
        ),
        params![
            account_id,
            category_id,
            kind.as_str(),
            fmt_amount(&amount),
            date.to_string(),
            description,
            id
        ],
    )?;
    recalculate_after_move(&tx, before.account_id, account_id)?;
    tx.commit()?;
    tracing::info!(
        user,
        transaction_id = id,
        from_account = before.account_id,
        to_account = account_id,
        "transaction updated"
    );
    get_transaction(conn, user, id)
}

/// Removes a transaction and recalculates the account it belonged to.
pub fn delete_transaction(conn: &mut Connection, user: UserId, id: i64) -> LedgerResult<()> {
    let tx = conn.transaction()?;
    let before = get_transaction(&tx, user, id)?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    recalculate_balance(&tx, before.account_id)?;
    tx.commit()?;
    tracing::info!(
        user,
        transaction_id = id,
        account_id = before.account_id,
        "transaction deleted"
    );
    Ok(())
}

/// A transaction joined with the names it references, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionListing {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: Kind,
    pub amount: Decimal,
    pub account: String,
    pub category: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionFilter {
    /// `(year, month)`; both must be given for the filter to apply.
    pub month: Option<(i32, u32)>,
    pub limit: Option<usize>,
}

pub fn list_transactions(
    conn: &Connection,
    user: UserId,
    filter: &TransactionFilter,
) -> LedgerResult<Vec<TransactionListing>> {
    let mut sql = String::from(
        "SELECT t.id, t.date, t.type, t.amount, a.name, c.name, t.description
         FROM transactions t
         JOIN accounts a ON t.account_id=a.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1",
    );
    let mut month_key = None;
    if let Some((year, month)) = filter.month {
        sql.push_str(" AND substr(t.date,1,7)=?2");
        month_key = Some(format!("{:04}-{:02}", year, month));
    }
    sql.push_str(" ORDER BY t.date DESC, t.created_at DESC, t.id DESC");
    if let Some(limit) = filter.limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match &month_key {
        Some(m) => stmt.query(params![user, m])?,
        None => stmt.query(params![user])?,
    };
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(1)?;
        let kind: String = r.get(2)?;
        let amount: String = r.get(3)?;
        out.push(TransactionListing {
            id: r.get(0)?,
            date: stored_date(&date, "transactions.date")?,
            kind: kind.parse()?,
            amount: stored_decimal(&amount, "transactions.amount")?,
            account: r.get(4)?,
            category: r.get(5)?,
            description: r.get(6)?,
        });
    }
    Ok(out)
}

pub fn recent_transactions(
    conn: &Connection,
    user: UserId,
    limit: usize,
) -> LedgerResult<Vec<TransactionListing>> {
    list_transactions(
        conn,
        user,
        &TransactionFilter {
            month: None,
            limit: Some(limit),
        },
    )
}

/// Accounts whose stored balance no longer matches their transactions.
pub fn balance_drift(
    conn: &Connection,
    user: UserId,
) -> LedgerResult<Vec<(Account, Decimal)>> {
    let mut out = Vec::new();
    for account in list_accounts(conn, user)? {
        let expected = crate::balance::expected_balance(conn, account.id)?;
        if let Some(expected) = expected {
            if expected != account.current_balance {
                tracing::warn!(
                    account_id = account.id,
                    stored = %account.current_balance,
                    expected = %expected,
                    "balance drift detected"
                );
                out.push((account, expected));
            }
        }
    }
    Ok(out)
}
