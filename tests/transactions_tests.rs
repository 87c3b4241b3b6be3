// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use finledger::commands::{accounts, categories, transactions};
use finledger::{cli, db};
use rusqlite::Connection;

fn run(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["finledger"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv)?;
    let user = finledger::commands::user_id(&matches);
    match matches.subcommand() {
        Some(("account", sub)) => accounts::handle(conn, user, sub),
        Some(("category", sub)) => categories::handle(conn, user, sub),
        Some(("tx", sub)) => transactions::handle(conn, user, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn balance_of(conn: &Connection, name: &str) -> String {
    conn.query_row(
        "SELECT current_balance FROM accounts WHERE name=?1",
        [name],
        |r| r.get(0),
    )
    .unwrap()
}

fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    run(&mut conn, &["account", "add", "--name", "A1", "--initial", "100"]).unwrap();
    run(&mut conn, &["account", "add", "--name", "A2", "--type", "savings"]).unwrap();
    run(&mut conn, &["category", "add", "--name", "Food", "--color", "bg-red-500"]).unwrap();
    run(&mut conn, &["category", "add", "--name", "Pay", "--type", "income"]).unwrap();
    for day in 1..=3 {
        let date = format!("2025-01-0{}", day);
        run(
            &mut conn,
            &[
                "tx", "add", "--date", &date, "--type", "expense", "--account", "A1", "--amount",
                "10", "--category", "Food",
            ],
        )
        .unwrap();
    }
    run(
        &mut conn,
        &[
            "tx", "add", "--date", "2025-02-10", "--type", "income", "--account", "A1", "--amount",
            "50.5", "--category", "Pay",
        ],
    )
    .unwrap();
    conn
}

fn list(conn: &Connection, args: &[&str]) -> Vec<finledger::ledger::TransactionListing> {
    let mut argv = vec!["finledger", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    transactions::query_rows(conn, 1, list_m).unwrap()
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let rows = list(&conn, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date.to_string(), "2025-02-10");
    assert_eq!(rows[1].date.to_string(), "2025-01-03");
}

#[test]
fn list_filters_by_month_and_year() {
    let conn = setup();
    let rows = list(&conn, &["--month", "1", "--year", "2025"]);
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.category.as_deref() == Some("Food")));
}

#[test]
fn cli_mutations_keep_balance_in_sync() {
    let mut conn = setup();
    assert_eq!(balance_of(&conn, "A1"), "120.50");

    let moved: i64 = conn
        .query_row("SELECT id FROM transactions WHERE date='2025-01-01'", [], |r| r.get(0))
        .unwrap();
    let moved = moved.to_string();
    run(&mut conn, &["tx", "edit", &moved, "--account", "A2", "--amount", "15"]).unwrap();
    assert_eq!(balance_of(&conn, "A1"), "130.50");
    assert_eq!(balance_of(&conn, "A2"), "-15.00");

    run(&mut conn, &["tx", "rm", &moved]).unwrap();
    assert_eq!(balance_of(&conn, "A2"), "0.00");
}

#[test]
fn cli_rejects_bad_input() {
    let mut conn = setup();
    let zero = run(
        &mut conn,
        &["tx", "add", "--type", "income", "--account", "A1", "--amount", "0"],
    );
    assert!(zero.is_err());
    let mismatch = run(
        &mut conn,
        &[
            "tx", "add", "--type", "income", "--account", "A1", "--amount", "5", "--category",
            "Food",
        ],
    );
    assert!(mismatch.is_err());
    let negative_initial = run(&mut conn, &["account", "add", "--name", "Neg", "--initial=-1"]);
    assert!(negative_initial.is_err());
    assert_eq!(balance_of(&conn, "A1"), "120.50");
}

#[test]
fn uncategorize_clears_the_category() {
    let mut conn = setup();
    let id: i64 = conn
        .query_row("SELECT id FROM transactions WHERE date='2025-01-02'", [], |r| r.get(0))
        .unwrap();
    run(&mut conn, &["tx", "edit", &id.to_string(), "--uncategorize"]).unwrap();
    let cat: Option<i64> = conn
        .query_row("SELECT category_id FROM transactions WHERE id=?1", [id], |r| r.get(0))
        .unwrap();
    assert_eq!(cat, None);
}
