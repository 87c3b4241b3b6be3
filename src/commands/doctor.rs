// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::balance::recalculate_balance;
use crate::ledger::balance_drift;
use crate::models::UserId;
use crate::utils::{fmt_amount, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let fix = sub.get_flag("fix");
    let drift = balance_drift(conn, user)?;
    if drift.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }

    let mut rows = Vec::new();
    for (account, expected) in &drift {
        rows.push(vec![
            account.name.clone(),
            fmt_amount(&account.current_balance),
            fmt_amount(expected),
        ]);
        if fix {
            recalculate_balance(conn, account.id)?;
        }
    }
    println!("{}", pretty_table(&["Account", "Stored", "Expected"], rows));
    if fix {
        println!("Recalculated {} account(s)", drift.len());
    }
    Ok(())
}
