// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::ledger::{
    category_counts, create_category, delete_category, list_categories, update_category,
};
use crate::models::{CategoryChanges, NewCategory, UserId};
use crate::utils::{id_for_category, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewCategory {
                name: arg(sub, "name")?.to_string(),
                kind: arg(sub, "type")?.parse()?,
                color: arg(sub, "color")?.parse()?,
            };
            let c = create_category(conn, user, &new)?;
            println!("Added category '{}' ({})", c.name, c.kind.label());
        }
        Some(("list", sub)) => {
            let cats = list_categories(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let rows: Vec<Vec<String>> = cats
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.kind.label().to_string(),
                            c.color.clone().unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Category", "Type", "Color"], rows));
                let counts = category_counts(conn, user)?;
                println!("{} income / {} expense", counts.income, counts.expense);
            }
        }
        Some(("edit", sub)) => {
            let id = id_for_category(conn, user, arg(sub, "name")?)?;
            let changes = CategoryChanges {
                name: sub.get_one::<String>("rename").cloned(),
                kind: sub.get_one::<String>("type").map(|s| s.parse()).transpose()?,
                color: sub.get_one::<String>("color").map(|s| s.parse()).transpose()?,
            };
            let c = update_category(conn, user, id, &changes)?;
            println!("Updated category '{}'", c.name);
        }
        Some(("rm", sub)) => {
            let name = arg(sub, "name")?;
            let id = id_for_category(conn, user, name)?;
            delete_category(conn, user, id)?;
            println!("Removed category '{}'; its transactions are now uncategorized", name);
        }
        _ => {}
    }
    Ok(())
}
