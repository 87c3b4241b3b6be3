// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{
    DateRange, LedgerRow, MonthlySeries, Palette, UNCATEGORIZED, load_rows, monthly_series_rows,
    series_range,
};
use crate::balance::{Totals, saturating_sum};
use crate::config::ReportConfig;
use crate::errors::LedgerResult;
use crate::ledger::{
    CategoryCounts, TransactionListing, category_counts, list_accounts, recent_transactions,
};
use crate::models::{Account, Kind, UserId};
use crate::utils::{month_end, month_start};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PieChart {
    pub labels: Vec<String>,
    pub values: Vec<Decimal>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalanceChart {
    pub labels: Vec<String>,
    pub balances: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub accounts: Vec<Account>,
    pub total_balance: Decimal,
    pub category_counts: CategoryCounts,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub monthly_net_balance: Decimal,
    pub recent_transactions: Vec<TransactionListing>,
    pub expense_by_category: PieChart,
    pub account_balances: BalanceChart,
    pub monthly: MonthlySeries,
}

/// Current-month expenses per category, largest first. Colors follow the
/// position in that ordering even when a non-positive slice is dropped.
pub fn expense_by_category(rows: &[LedgerRow], month: DateRange, palette: &Palette) -> PieChart {
    let mut totals: BTreeMap<Option<i64>, (Option<&str>, Option<&str>, Decimal)> = BTreeMap::new();
    for r in rows
        .iter()
        .filter(|r| r.kind == Kind::Expense && month.contains(r.date))
    {
        let slice = totals.entry(r.category_id).or_insert((
            r.category_name.as_deref(),
            r.category_color.as_deref(),
            Decimal::ZERO,
        ));
        slice.2 = saturating_sum(slice.2, r.amount);
    }
    let mut slices: Vec<_> = totals.into_iter().collect();
    slices.sort_by(|(ka, (_, _, ta)), (kb, (_, _, tb))| tb.cmp(ta).then_with(|| ka.cmp(kb)));

    let mut chart = PieChart::default();
    for (index, (_, (name, color, total))) in slices.into_iter().enumerate() {
        if total <= Decimal::ZERO {
            continue;
        }
        chart.labels.push(name.unwrap_or(UNCATEGORIZED).to_string());
        chart.values.push(total);
        chart.colors.push(palette.resolve(color, index));
    }
    chart
}

pub fn build(
    conn: &Connection,
    user: UserId,
    today: NaiveDate,
    config: &ReportConfig,
) -> LedgerResult<Dashboard> {
    let accounts = list_accounts(conn, user)?;
    let total_balance = accounts
        .iter()
        .fold(Decimal::ZERO, |acc, a| saturating_sum(acc, a.current_balance));
    let account_balances = BalanceChart {
        labels: accounts.iter().map(|a| a.name.clone()).collect(),
        balances: accounts.iter().map(|a| a.current_balance).collect(),
    };

    // the six-month window always covers the current month
    let rows = load_rows(conn, user, series_range(today))?;
    let this_month = DateRange::new(month_start(today), month_end(today));
    let mut month_totals = Totals::default();
    for r in rows.iter().filter(|r| this_month.contains(r.date)) {
        month_totals.add(r.kind, r.amount);
    }

    Ok(Dashboard {
        total_balance,
        category_counts: category_counts(conn, user)?,
        monthly_income: month_totals.income,
        monthly_expense: month_totals.expense,
        monthly_net_balance: month_totals.net(),
        recent_transactions: recent_transactions(conn, user, config.recent_limit)?,
        expense_by_category: expense_by_category(&rows, this_month, &config.palette),
        account_balances,
        monthly: monthly_series_rows(&rows, today, config.expense_target_ratio),
        accounts,
    })
}
