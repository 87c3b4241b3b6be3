// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finledger::aggregate::DateRange;
use finledger::config::ReportConfig;
use finledger::export::export_csv;
use finledger::ledger::{create_account, create_category, create_transaction};
use finledger::models::{AccountKind, ColorTag, Kind, NewAccount, NewCategory, NewTransaction};
use finledger::{cli, commands::exporter, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::tempdir;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn jan1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn scenario_conn() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    let main = create_account(
        &conn,
        1,
        &NewAccount {
            name: "Main".into(),
            kind: AccountKind::Checking,
            initial_balance: dec("100.00"),
        },
    )
    .unwrap()
    .id;
    let salary = create_category(
        &conn,
        1,
        &NewCategory {
            name: "Salário".into(),
            kind: Kind::Income,
            color: ColorTag::Green,
        },
    )
    .unwrap()
    .id;
    let food = create_category(
        &conn,
        1,
        &NewCategory {
            name: "Alimentação".into(),
            kind: Kind::Expense,
            color: ColorTag::Amber,
        },
    )
    .unwrap()
    .id;
    let entries = [
        (salary, Kind::Income, "1000.00"),
        (food, Kind::Expense, "250.00"),
    ];
    for (cat, kind, amount) in entries {
        create_transaction(
            &mut conn,
            1,
            &NewTransaction {
                account_id: main,
                category_id: Some(cat),
                kind,
                amount: dec(amount),
                date: jan1(),
                description: String::new(),
            },
        )
        .unwrap();
    }
    conn
}

#[test]
fn report_document_is_exact() {
    let conn = scenario_conn();
    let (bytes, filename) = export_csv(
        &conn,
        1,
        DateRange::new(jan1(), jan1()),
        &ReportConfig::default(),
    )
    .unwrap();
    assert_eq!(filename, "financial-report-20240101-20240101.csv");
    let expected = "\
Summary;Period 01/01/2024 - 01/01/2024;;;;
;;;Income: 1000.00;Expense: 250.00;Balance: 750.00
;;;;;
Section;Name;Type;Income;Expense;Balance
Category;Salário;Income;1000.00;0.00;1000.00
Category;Alimentação;Expense;0.00;250.00;-250.00
;;;;;
Account;Main;Checking;1000.00;250.00;750.00
";
    assert_eq!(String::from_utf8(bytes).unwrap(), expected);
}

#[test]
fn identical_inputs_give_identical_bytes() {
    let conn = scenario_conn();
    let range = DateRange::new(jan1(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    let cfg = ReportConfig::default();
    let first = export_csv(&conn, 1, range, &cfg).unwrap();
    let second = export_csv(&conn, 1, range, &cfg).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_period_emits_no_data_row() {
    let conn = scenario_conn();
    let range = DateRange::new(
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
    );
    let (bytes, filename) = export_csv(&conn, 1, range, &ReportConfig::default()).unwrap();
    assert_eq!(filename, "financial-report-20240201-20240229.csv");
    let text = String::from_utf8(bytes).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Summary;Period 01/02/2024 - 29/02/2024;;;;");
    assert!(lines[1].starts_with(";;;Income: 0.00;Expense: 0.00;"));
    assert_eq!(lines[3], "Section;Name;Type;Income;Expense;Balance");
    assert_eq!(lines[4], "No data;No transactions in the selected period;;;;");
    assert_eq!(lines.len(), 5);
    assert!(!lines.iter().any(|l| l.starts_with("Category;") || l.starts_with("Account;")));
}

#[test]
fn export_command_writes_into_directory() {
    let conn = scenario_conn();
    let dir = tempdir().unwrap();
    let out = dir.path().to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "finledger",
        "export",
        "report",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-01",
        "--out",
        &out,
    ]);
    let Some(("export", export_m)) = matches.subcommand() else {
        panic!("no export subcommand");
    };
    let Some(("report", report_m)) = export_m.subcommand() else {
        panic!("no report subcommand");
    };
    let path = exporter::export_report(&conn, 1, report_m).unwrap();
    assert_eq!(
        path,
        dir.path().join("financial-report-20240101-20240101.csv")
    );
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("Category;Salário;Income;1000.00;0.00;1000.00"));
}

#[test]
fn export_command_swaps_inverted_bounds() {
    let conn = scenario_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("custom.csv");
    let out = out_path.to_string_lossy().to_string();

    let matches = cli::build_cli().get_matches_from([
        "finledger",
        "export",
        "report",
        "--from",
        "2024-01-31",
        "--to",
        "2024-01-01",
        "--out",
        &out,
    ]);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(&conn, 1, export_m).unwrap();
    } else {
        panic!("no export subcommand");
    }
    let contents = std::fs::read_to_string(&out_path).unwrap();
    assert!(contents.starts_with("Summary;Period 01/01/2024 - 31/01/2024;;;;\n"));
}
