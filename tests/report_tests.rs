// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use finledger::aggregate::{DateRange, UNCATEGORIZED, aggregate, monthly_series};
use finledger::balance::recalculate_balance;
use finledger::config::{ReportConfig, set_target_ratio};
use finledger::dashboard;
use finledger::db;
use finledger::ledger::{create_account, create_category, create_transaction, update_category};
use finledger::models::{
    AccountKind, CategoryChanges, ColorTag, Kind, NewAccount, NewCategory, NewTransaction,
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

const USER: i64 = 7;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

struct Fixture {
    conn: Connection,
    main: i64,
    savings: i64,
    salary: i64,
    food: i64,
}

fn record(
    f: &mut Fixture,
    account: i64,
    category: Option<i64>,
    kind: Kind,
    amount: &str,
    date: NaiveDate,
) {
    create_transaction(
        &mut f.conn,
        USER,
        &NewTransaction {
            account_id: account,
            category_id: category,
            kind,
            amount: dec(amount),
            date,
            description: String::new(),
        },
    )
    .unwrap();
}

fn setup() -> Fixture {
    let conn = db::open_in_memory().unwrap();
    let acct = |name: &str, kind| {
        create_account(
            &conn,
            USER,
            &NewAccount {
                name: name.into(),
                kind,
                initial_balance: dec("100.00"),
            },
        )
        .unwrap()
        .id
    };
    let main = acct("Main", AccountKind::Checking);
    let savings = acct("Cofre", AccountKind::Savings);
    let cat = |name: &str, kind, color| {
        create_category(
            &conn,
            USER,
            &NewCategory {
                name: name.into(),
                kind,
                color,
            },
        )
        .unwrap()
        .id
    };
    let salary = cat("Salário", Kind::Income, ColorTag::Green);
    let food = cat("Alimentação", Kind::Expense, ColorTag::Amber);
    Fixture {
        conn,
        main,
        savings,
        salary,
        food,
    }
}

#[test]
fn single_day_scenario_totals() {
    let mut f = setup();
    let (main, salary, food) = (f.main, f.salary, f.food);
    record(&mut f, main, Some(salary), Kind::Income, "1000.00", d(2024, 1, 1));
    record(&mut f, main, Some(food), Kind::Expense, "250.00", d(2024, 1, 1));

    let day = DateRange::new(d(2024, 1, 1), d(2024, 1, 1));
    let agg = aggregate(&f.conn, USER, day, &ReportConfig::default()).unwrap();
    assert_eq!(agg.summary.total_income, dec("1000.00"));
    assert_eq!(agg.summary.total_expense, dec("250.00"));
    assert_eq!(agg.summary.balance, dec("750.00"));
    assert_eq!(agg.categories.len(), 2);
    assert_eq!(agg.categories[0].name, "Salário");
    assert_eq!(agg.categories[0].chart_color, "#22C55E");
    assert_eq!(agg.categories[1].chart_color, "#F59E0B");
    assert_eq!(agg.accounts.len(), 1);
    assert_eq!(agg.accounts[0].type_label, "Checking");
}

#[test]
fn inverted_range_matches_normal_range() {
    let mut f = setup();
    let (main, savings, food) = (f.main, f.savings, f.food);
    record(&mut f, main, Some(food), Kind::Expense, "12.00", d(2024, 1, 5));
    record(&mut f, savings, None, Kind::Income, "30.00", d(2024, 1, 20));
    record(&mut f, savings, None, Kind::Income, "99.00", d(2024, 2, 1));

    let cfg = ReportConfig::default();
    let forward = DateRange::new(d(2024, 1, 1), d(2024, 1, 31));
    let backward = DateRange::new(d(2024, 1, 31), d(2024, 1, 1));
    let forward = aggregate(&f.conn, USER, forward, &cfg).unwrap();
    let backward = aggregate(&f.conn, USER, backward, &cfg).unwrap();
    assert_eq!(forward, backward);
    assert_eq!(forward.summary.total_income, dec("30.00"));
    // accounts are listed by name
    let names: Vec<_> = forward.accounts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Cofre", "Main"]);
    assert_eq!(forward.categories[0].name, UNCATEGORIZED);
}

#[test]
fn empty_range_yields_zero_aggregates() {
    let f = setup();
    let agg = aggregate(
        &f.conn,
        USER,
        DateRange::new(d(2020, 1, 1), d(2020, 12, 31)),
        &ReportConfig::default(),
    )
    .unwrap();
    assert!(agg.is_empty());
    assert!(agg.summary.total_income.is_zero());
    assert!(agg.summary.total_expense.is_zero());
}

#[test]
fn other_users_transactions_are_invisible() {
    let mut f = setup();
    let main = f.main;
    record(&mut f, main, None, Kind::Income, "5.00", d(2024, 1, 1));
    let agg = aggregate(
        &f.conn,
        USER + 1,
        DateRange::new(d(2024, 1, 1), d(2024, 1, 1)),
        &ReportConfig::default(),
    )
    .unwrap();
    assert!(agg.is_empty());
}

#[test]
fn monthly_series_fills_gaps_and_applies_ratio() {
    let mut f = setup();
    let (main, salary, food) = (f.main, f.salary, f.food);
    record(&mut f, main, Some(salary), Kind::Income, "1000.00", d(2024, 3, 5));
    record(&mut f, main, Some(food), Kind::Expense, "200.00", d(2024, 3, 9));
    record(&mut f, main, Some(salary), Kind::Income, "500.00", d(2024, 6, 30));
    // outside the window on both sides
    record(&mut f, main, Some(salary), Kind::Income, "7.00", d(2023, 12, 31));
    record(&mut f, main, Some(salary), Kind::Income, "7.00", d(2024, 7, 1));

    let s = monthly_series(&f.conn, USER, d(2024, 6, 15), &ReportConfig::default()).unwrap();
    assert_eq!(s.labels, ["Jan/2024", "Feb/2024", "Mar/2024", "Apr/2024", "May/2024", "Jun/2024"]);
    assert_eq!(s.income[2], dec("1000.00"));
    assert_eq!(s.expense[2], dec("200.00"));
    assert_eq!(s.target[2], dec("800.00"));
    assert_eq!(s.income[5], dec("500.00"));
    assert!(s.income[0].is_zero() && s.income[1].is_zero() && s.income[3].is_zero());

    set_target_ratio(&f.conn, dec("0.5")).unwrap();
    let cfg = ReportConfig::load(&f.conn).unwrap();
    let s = monthly_series(&f.conn, USER, d(2024, 6, 15), &cfg).unwrap();
    assert_eq!(s.target[5], dec("250.00"));
}

#[test]
fn target_ratio_must_be_a_fraction() {
    let f = setup();
    assert!(set_target_ratio(&f.conn, dec("1.5")).is_err());
    assert_eq!(
        ReportConfig::load(&f.conn).unwrap().expense_target_ratio,
        dec("0.80")
    );
}

#[test]
fn dashboard_composes_current_month() {
    let mut f = setup();
    let (main, savings, salary, food) = (f.main, f.savings, f.salary, f.food);
    record(&mut f, main, Some(salary), Kind::Income, "1000.00", d(2024, 5, 2));
    record(&mut f, main, Some(food), Kind::Expense, "80.00", d(2024, 5, 3));
    record(&mut f, savings, None, Kind::Expense, "120.00", d(2024, 5, 4));
    record(&mut f, savings, None, Kind::Expense, "1.00", d(2024, 4, 30));

    let dash = dashboard::build(&f.conn, USER, d(2024, 5, 20), &ReportConfig::default()).unwrap();
    assert_eq!(dash.total_balance, dec("999.00"));
    assert_eq!(dash.monthly_income, dec("1000.00"));
    assert_eq!(dash.monthly_expense, dec("200.00"));
    assert_eq!(dash.monthly_net_balance, dec("800.00"));
    assert_eq!(dash.category_counts.income, 1);
    assert_eq!(dash.category_counts.expense, 1);
    assert_eq!(dash.recent_transactions.len(), 4);
    assert_eq!(dash.recent_transactions[0].date, d(2024, 5, 4));
    assert_eq!(dash.expense_by_category.labels, [UNCATEGORIZED, "Alimentação"]);
    // uncategorized takes fallback slot 0, the tagged category keeps its own color
    assert_eq!(dash.expense_by_category.colors, ["#6366F1", "#F59E0B"]);
    assert_eq!(dash.account_balances.labels, ["Cofre", "Main"]);
    assert_eq!(dash.monthly.labels.len(), 6);
    assert_eq!(dash.monthly.expense[4], dec("1.00"));
}

#[test]
fn transaction_kind_wins_over_drifted_category_kind() {
    let mut f = setup();
    let (main, salary) = (f.main, f.salary);
    record(&mut f, main, Some(salary), Kind::Income, "300.00", d(2024, 1, 10));
    update_category(
        &f.conn,
        USER,
        salary,
        &CategoryChanges {
            kind: Some(Kind::Expense),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(recalculate_balance(&f.conn, main).unwrap(), Some(dec("400.00")));
    let agg = aggregate(
        &f.conn,
        USER,
        DateRange::new(d(2024, 1, 1), d(2024, 1, 31)),
        &ReportConfig::default(),
    )
    .unwrap();
    assert_eq!(agg.summary.total_income, dec("300.00"));
    let line = &agg.categories[0];
    assert_eq!(line.name, "Salário");
    assert_eq!(line.type_label, "Expense");
    assert_eq!(line.income, dec("300.00"));
    assert!(line.expense.is_zero());
}
