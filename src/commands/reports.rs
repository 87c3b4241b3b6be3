// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::today;
use crate::aggregate::{
    AccountChart, Aggregation, CategoryChart, DateRange, aggregate, chart_payloads, monthly_series,
};
use crate::config::ReportConfig;
use crate::models::UserId;
use crate::utils::{fmt_amount, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, user: UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, user, sub)?,
        Some(("monthly", sub)) => monthly(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn range_from_args(sub: &clap::ArgMatches) -> DateRange {
    DateRange::resolve(
        sub.get_one::<String>("from").map(String::as_str),
        sub.get_one::<String>("to").map(String::as_str),
        today(),
    )
}

#[derive(Serialize)]
struct SummaryReport {
    #[serde(flatten)]
    aggregation: Aggregation,
    category_chart: CategoryChart,
    account_chart: AccountChart,
}

fn summary(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let config = ReportConfig::load(conn)?;
    let range = range_from_args(sub);
    let agg = aggregate(conn, user, range, &config)?;
    let (category_chart, account_chart) = chart_payloads(&agg);
    let report = SummaryReport {
        aggregation: agg,
        category_chart,
        account_chart,
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let agg = &report.aggregation;
    println!("Period {} to {}", agg.range.start, agg.range.end);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Balance"],
            vec![vec![
                fmt_amount(&agg.summary.total_income),
                fmt_amount(&agg.summary.total_expense),
                fmt_amount(&agg.summary.balance),
            ]],
        )
    );
    if agg.is_empty() {
        println!("No transactions in the selected period");
        return Ok(());
    }
    let cat_rows = agg
        .categories
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                c.type_label.clone(),
                fmt_amount(&c.income),
                fmt_amount(&c.expense),
                fmt_amount(&c.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Type", "Income", "Expense", "Balance"], cat_rows)
    );
    let acct_rows = agg
        .accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.type_label.clone(),
                fmt_amount(&a.income),
                fmt_amount(&a.expense),
                fmt_amount(&a.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Account", "Type", "Income", "Expense", "Balance"], acct_rows)
    );
    Ok(())
}

fn monthly(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let config = ReportConfig::load(conn)?;
    let reference = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => today(),
    };
    let series = monthly_series(conn, user, reference, &config)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &series)? {
        return Ok(());
    }
    let rows = (0..series.labels.len())
        .map(|i| {
            vec![
                series.labels[i].clone(),
                fmt_amount(&series.income[i]),
                fmt_amount(&series.expense[i]),
                fmt_amount(&series.target[i]),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Target"], rows)
    );
    Ok(())
}
