// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::balance::recalculate_balance;
use crate::ledger::{self, create_account, delete_account, list_accounts, update_account};
use crate::models::{AccountChanges, NewAccount, UserId};
use crate::utils::{fmt_amount, id_for_account, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, user: UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewAccount {
                name: arg(sub, "name")?.to_string(),
                kind: arg(sub, "type")?.parse()?,
                initial_balance: parse_decimal(arg(sub, "initial")?)?,
            };
            let account = create_account(conn, user, &new)?;
            println!(
                "Added account '{}' ({}, initial {})",
                account.name,
                account.kind.label(),
                fmt_amount(&account.initial_balance)
            );
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => {
            let id = id_for_account(conn, user, arg(sub, "name")?)?;
            let changes = AccountChanges {
                name: sub.get_one::<String>("rename").cloned(),
                kind: sub.get_one::<String>("type").map(|s| s.parse()).transpose()?,
                initial_balance: sub
                    .get_one::<String>("initial")
                    .map(|s| parse_decimal(s))
                    .transpose()?,
            };
            let account = update_account(conn, user, id, &changes)?;
            println!(
                "Updated account '{}' (balance {})",
                account.name,
                fmt_amount(&account.current_balance)
            );
        }
        Some(("rm", sub)) => {
            let name = arg(sub, "name")?;
            let id = id_for_account(conn, user, name)?;
            delete_account(conn, user, id)?;
            println!("Removed account '{}' and its transactions", name);
        }
        Some(("recalc", sub)) => {
            let name = arg(sub, "name")?;
            let id = id_for_account(conn, user, name)?;
            if let Some(balance) = recalculate_balance(conn, id)? {
                println!("Balance of '{}' is {}", name, fmt_amount(&balance));
            }
        }
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = list_accounts(conn, user)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.kind.label().to_string(),
                fmt_amount(&a.initial_balance),
                fmt_amount(&a.current_balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Type", "Initial", "Balance"], rows)
    );
    println!("Total balance: {}", fmt_amount(&ledger::total_balance(conn, user)?));
    Ok(())
}
