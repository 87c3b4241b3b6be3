// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::config::{ReportConfig, set_target_ratio};
use crate::utils::parse_decimal;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => match arg(sub, "key")? {
            "target-ratio" => {
                println!("{}", ReportConfig::load(conn)?.expense_target_ratio);
            }
            other => bail!("Unknown setting '{}' (known: target-ratio)", other),
        },
        Some(("set", sub)) => match arg(sub, "key")? {
            "target-ratio" => {
                let ratio = parse_decimal(arg(sub, "value")?)?;
                set_target_ratio(conn, ratio)?;
                println!("target-ratio = {}", ratio);
            }
            other => bail!("Unknown setting '{}' (known: target-ratio)", other),
        },
        _ => {}
    }
    Ok(())
}
