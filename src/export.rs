// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Semicolon-delimited report export.
//!
//! Output is a pure function of the aggregation: identical inputs always
//! produce identical bytes, so exports can be diffed.

use crate::aggregate::{AccountLine, Aggregation, CategoryLine, DateRange, aggregate};
use crate::config::ReportConfig;
use crate::models::UserId;
use crate::utils::fmt_amount;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

const COLUMNS: [&str; 6] = ["Section", "Name", "Type", "Income", "Expense", "Balance"];
/// Separator row. Six empty fields render as `;;;;;`, which keeps every record
/// at the column count and lets the writer stay non-flexible.
const BLANK: [&str; 6] = ["", "", "", "", "", ""];

pub fn export_filename(range: &DateRange) -> String {
    format!(
        "financial-report-{}-{}.csv",
        range.start.format("%Y%m%d"),
        range.end.format("%Y%m%d")
    )
}

fn line_record(section: &str, name: &str, type_label: &str, amounts: [&Decimal; 3]) -> Vec<String> {
    let mut rec = vec![section.to_string(), name.to_string(), type_label.to_string()];
    rec.extend(amounts.into_iter().map(fmt_amount));
    rec
}

fn category_record(c: &CategoryLine) -> Vec<String> {
    line_record("Category", &c.name, &c.type_label, [&c.income, &c.expense, &c.balance])
}

fn account_record(a: &AccountLine) -> Vec<String> {
    line_record("Account", &a.name, &a.type_label, [&a.income, &a.expense, &a.balance])
}

/// Renders an aggregation as the report document.
pub fn render_report(agg: &Aggregation) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    let period = format!(
        "Period {} - {}",
        agg.range.start.format("%d/%m/%Y"),
        agg.range.end.format("%d/%m/%Y")
    );
    wtr.write_record(["Summary", period.as_str(), "", "", "", ""])?;
    wtr.write_record([
        String::new(),
        String::new(),
        String::new(),
        format!("Income: {}", fmt_amount(&agg.summary.total_income)),
        format!("Expense: {}", fmt_amount(&agg.summary.total_expense)),
        format!("Balance: {}", fmt_amount(&agg.summary.balance)),
    ])?;
    wtr.write_record(BLANK)?;
    wtr.write_record(COLUMNS)?;

    for c in &agg.categories {
        wtr.write_record(category_record(c))?;
    }
    if !agg.categories.is_empty() {
        wtr.write_record(BLANK)?;
    }
    for a in &agg.accounts {
        wtr.write_record(account_record(a))?;
    }
    if agg.is_empty() {
        wtr.write_record([
            "No data",
            "No transactions in the selected period",
            "",
            "",
            "",
            "",
        ])?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(bytes)
}

/// Aggregates `range` for `user` and renders it, returning the document and
/// its download filename.
pub fn export_csv(
    conn: &Connection,
    user: UserId,
    range: DateRange,
    config: &ReportConfig,
) -> Result<(Vec<u8>, String)> {
    let agg = aggregate(conn, user, range, config)?;
    let bytes = render_report(&agg)?;
    tracing::info!(user, bytes = bytes.len(), "report exported");
    Ok((bytes, export_filename(&range)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filename_encodes_both_bounds() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        );
        assert_eq!(export_filename(&range), "financial-report-20231201-20240131.csv");
    }
}
