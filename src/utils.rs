// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::{LedgerError, LedgerResult};
use crate::models::UserId;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global subscriber once. `RUST_LOG` overrides the default
/// `finledger=warn` filter; output goes to stderr so it never mixes with
/// table or JSON output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("finledger=warn"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into the first day of that month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Decodes a monetary TEXT column.
pub(crate) fn stored_decimal(raw: &str, column: &'static str) -> LedgerResult<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| LedgerError::CorruptAmount(raw.to_string(), column))
}

/// Decodes a `YYYY-MM-DD` TEXT column.
pub(crate) fn stored_date(raw: &str, column: &'static str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| LedgerError::CorruptDate(raw.to_string(), column))
}

/// Fixed two-decimal rendering used by every monetary output.
pub fn fmt_amount(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn month_start(d: NaiveDate) -> NaiveDate {
    d.with_day(1).unwrap_or(d)
}

/// First day of the month `delta` months away from `d`'s month.
pub fn shift_month(d: NaiveDate, delta: i32) -> NaiveDate {
    let idx = d.year() * 12 + d.month0() as i32 + delta;
    let (y, m0) = (idx.div_euclid(12), idx.rem_euclid(12) as u32);
    NaiveDate::from_ymd_opt(y, m0 + 1, 1).unwrap_or(d)
}

pub fn month_end(d: NaiveDate) -> NaiveDate {
    shift_month(d, 1).pred_opt().unwrap_or(d)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_account(conn: &Connection, user: UserId, name: &str) -> LedgerResult<i64> {
    conn.query_row(
        "SELECT id FROM accounts WHERE user_id=?1 AND name=?2",
        params![user, name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| LedgerError::AccountNotFound(format!("'{}'", name)))
}

pub fn id_for_category(conn: &Connection, user: UserId, name: &str) -> LedgerResult<i64> {
    conn.query_row(
        "SELECT id FROM categories WHERE user_id=?1 AND name=?2",
        params![user, name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| LedgerError::CategoryNotFound(format!("'{}'", name)))
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn shift_month_crosses_year_boundaries() {
        assert_eq!(shift_month(d(2024, 1, 15), -1), d(2023, 12, 1));
        assert_eq!(shift_month(d(2024, 3, 31), -5), d(2023, 10, 1));
        assert_eq!(shift_month(d(2023, 12, 2), 1), d(2024, 1, 1));
    }

    #[test]
    fn month_end_handles_leap_years() {
        assert_eq!(month_end(d(2024, 2, 10)), d(2024, 2, 29));
        assert_eq!(month_end(d(2023, 2, 1)), d(2023, 2, 28));
        assert_eq!(month_end(d(2023, 12, 5)), d(2023, 12, 31));
    }

    #[test]
    fn fmt_amount_pads_and_rounds() {
        assert_eq!(fmt_amount(&Decimal::new(85, 0)), "85.00");
        assert_eq!(fmt_amount(&Decimal::new(-2505, 1)), "-250.50");
        assert_eq!(fmt_amount(&Decimal::new(80000, 4)), "8.00");
    }

    #[test]
    fn parse_month_yields_first_day() {
        assert_eq!(parse_month("2024-07").unwrap(), d(2024, 7, 1));
        assert!(parse_month("2024-13").is_err());
    }
}
