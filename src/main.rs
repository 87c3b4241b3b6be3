// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;

use finledger::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let db_override = matches.get_one::<String>("db").map(Path::new);
    let mut conn = db::open_or_init(db_override)?;
    let user = commands::user_id(&matches);

    match matches.subcommand() {
        Some(("init", _)) => match db_override {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("account", sub)) => commands::accounts::handle(&mut conn, user, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, user, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, user, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, user, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, user, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&conn, user, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&conn, user, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
