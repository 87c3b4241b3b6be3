// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::today;
use crate::config::ReportConfig;
use crate::dashboard::build;
use crate::models::UserId;
use crate::utils::{fmt_amount, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let config = ReportConfig::load(conn)?;
    let dash = build(conn, user, today(), &config)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    let accounts = dash
        .accounts
        .iter()
        .map(|a| vec![a.name.clone(), a.kind.label().to_string(), fmt_amount(&a.current_balance)])
        .collect();
    println!("{}", pretty_table(&["Account", "Type", "Balance"], accounts));
    println!(
        "Total balance {} | this month: income {} expense {} net {} | \
         categories: {} income, {} expense",
        fmt_amount(&dash.total_balance),
        fmt_amount(&dash.monthly_income),
        fmt_amount(&dash.monthly_expense),
        fmt_amount(&dash.monthly_net_balance),
        dash.category_counts.income,
        dash.category_counts.expense,
    );

    let slices = dash
        .expense_by_category
        .labels
        .iter()
        .zip(&dash.expense_by_category.values)
        .map(|(l, v)| vec![l.clone(), fmt_amount(v)])
        .collect();
    println!("{}", pretty_table(&["Spent on", "Amount"], slices));

    let months = (0..dash.monthly.labels.len())
        .map(|i| {
            vec![
                dash.monthly.labels[i].clone(),
                fmt_amount(&dash.monthly.income[i]),
                fmt_amount(&dash.monthly.expense[i]),
                fmt_amount(&dash.monthly.target[i]),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Target"], months)
    );

    let recent = dash
        .recent_transactions
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.kind.label().to_string(),
                t.account.clone(),
                t.category.clone().unwrap_or_default(),
                fmt_amount(&t.amount),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Type", "Account", "Category", "Amount"], recent)
    );
    Ok(())
}
