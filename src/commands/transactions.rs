// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, today};
use crate::ledger::{
    TransactionFilter, TransactionListing, create_transaction, delete_transaction,
    list_transactions, update_transaction,
};
use crate::models::{NewTransaction, TransactionChanges, UserId};
use crate::utils::{
    fmt_amount, id_for_account, id_for_category, maybe_print_json, parse_date, parse_decimal,
    pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, user: UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("list", sub)) => list(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub
                .get_one::<i64>("id")
                .ok_or_else(|| anyhow::anyhow!("missing transaction id"))?;
            delete_transaction(conn, user, id)?;
            println!("Removed transaction #{}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let account_name = arg(sub, "account")?;
    let category_id = sub
        .get_one::<String>("category")
        .map(|c| id_for_category(conn, user, c))
        .transpose()?;
    let new = NewTransaction {
        account_id: id_for_account(conn, user, account_name)?,
        category_id,
        kind: arg(sub, "type")?.parse()?,
        amount: parse_decimal(arg(sub, "amount")?)?,
        date,
        description: arg(sub, "description")?.to_string(),
    };
    let t = create_transaction(conn, user, &new)?;
    println!(
        "Recorded #{} {} {} on {} (acct: {})",
        t.id,
        t.kind,
        fmt_amount(&t.amount),
        t.date,
        account_name
    );
    Ok(())
}

fn edit(conn: &mut Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow::anyhow!("missing transaction id"))?;
    let category = if sub.get_flag("uncategorize") {
        Some(None)
    } else {
        sub.get_one::<String>("category")
            .map(|c| id_for_category(conn, user, c).map(Some))
            .transpose()?
    };
    let changes = TransactionChanges {
        account_id: sub
            .get_one::<String>("account")
            .map(|a| id_for_account(conn, user, a))
            .transpose()?,
        category,
        kind: sub.get_one::<String>("type").map(|s| s.parse()).transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        date: sub.get_one::<String>("date").map(|s| parse_date(s)).transpose()?,
        description: sub.get_one::<String>("description").cloned(),
    };
    let t = update_transaction(conn, user, id, &changes)?;
    println!("Updated #{} {} {} on {}", t.id, t.kind, fmt_amount(&t.amount), t.date);
    Ok(())
}

fn list(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, user, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    r.kind.label().to_string(),
                    r.account.clone(),
                    r.category.clone().unwrap_or_default(),
                    fmt_amount(&r.amount),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["#", "Date", "Type", "Account", "Category", "Amount", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    user: UserId,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionListing>> {
    let month = match (sub.get_one::<i32>("year"), sub.get_one::<u32>("month")) {
        (Some(y), Some(m)) => Some((*y, *m)),
        _ => None,
    };
    let filter = TransactionFilter {
        month,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(list_transactions(conn, user, &filter)?)
}
