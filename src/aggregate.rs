// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Income/expense aggregation over date ranges.
//!
//! The grouping functions are pure over a slice of [`LedgerRow`]s; the
//! `aggregate` and `monthly_series` entry points only add the SQL that loads
//! those rows for one user.

use crate::balance::Totals;
use crate::config::ReportConfig;
use crate::errors::{LedgerError, LedgerResult};
use crate::models::{AccountKind, ColorTag, Kind, UserId};
use crate::utils::{month_end, month_start, shift_month, stored_date, stored_decimal};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub const MONTHS_IN_SERIES: usize = 6;
pub const UNCATEGORIZED: &str = "Uncategorized";
pub const UNCLASSIFIED: &str = "Unclassified";

const DEFAULT_HEX: &str = "#6366F1";

/// Maps category color tags to chart colors, with a positional fallback cycle
/// for series that carry no usable tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    tag_hex: HashMap<ColorTag, String>,
    fallback: Vec<String>,
}

impl Palette {
    pub fn new(tag_hex: HashMap<ColorTag, String>, fallback: Vec<String>) -> Self {
        Self { tag_hex, fallback }
    }

    pub fn hex_for(&self, tag: ColorTag) -> Option<&str> {
        self.tag_hex.get(&tag).map(String::as_str)
    }

    pub fn fallback_at(&self, index: usize) -> &str {
        if self.fallback.is_empty() {
            return DEFAULT_HEX;
        }
        &self.fallback[index % self.fallback.len()]
    }

    /// Color for the series at `index` whose category stores `tag`.
    pub fn resolve(&self, tag: Option<&str>, index: usize) -> String {
        tag.and_then(ColorTag::from_stored)
            .and_then(|t| self.hex_for(t))
            .unwrap_or_else(|| self.fallback_at(index))
            .to_string()
    }
}

impl Default for Palette {
    fn default() -> Self {
        let table = [
            (ColorTag::Indigo, "#6366F1"),
            (ColorTag::Blue, "#3B82F6"),
            (ColorTag::Purple, "#8B5CF6"),
            (ColorTag::Green, "#22C55E"),
            (ColorTag::Emerald, "#10B981"),
            (ColorTag::Amber, "#F59E0B"),
            (ColorTag::Pink, "#EC4899"),
            (ColorTag::Red, "#EF4444"),
        ];
        Self {
            tag_hex: table.iter().map(|(t, h)| (*t, h.to_string())).collect(),
            fallback: table.iter().map(|(_, h)| h.to_string()).collect(),
        }
    }
}

/// Closed, inclusive calendar range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range, swapping inverted bounds.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a > b {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    /// First day of `today`'s month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self::new(month_start(today), today)
    }

    /// Range from raw user input. Each bound that is missing or not a
    /// `YYYY-MM-DD` date falls back to its month-to-date default.
    pub fn resolve(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Self {
        let defaults = Self::month_to_date(today);
        let start = parse_bound(start, "start").unwrap_or(defaults.start);
        let end = parse_bound(end, "end").unwrap_or(defaults.end);
        Self::new(start, end)
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        self.start <= d && d <= self.end
    }
}

fn parse_bound(raw: Option<&str>, which: &'static str) -> Option<NaiveDate> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            let err = LedgerError::InvalidDateRange(format!("{} bound '{}'", which, raw));
            tracing::warn!(error = %err, "using default bound");
            None
        }
    }
}

/// One transaction with the account and category facts aggregation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    pub date: NaiveDate,
    pub kind: Kind,
    pub amount: Decimal,
    pub account_id: i64,
    pub account_name: String,
    pub account_kind: AccountKind,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_kind: Option<Kind>,
    pub category_color: Option<String>,
}

pub fn load_rows(
    conn: &Connection,
    user: UserId,
    range: DateRange,
) -> LedgerResult<Vec<LedgerRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.date, t.type, t.amount, t.account_id, a.name, a.type,
                t.category_id, c.name, c.type, c.color
         FROM transactions t
         JOIN accounts a ON t.account_id=a.id
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?1 AND t.date BETWEEN ?2 AND ?3
         ORDER BY t.date, t.created_at, t.id",
    )?;
    let mut rows = stmt.query(params![
        user,
        range.start.to_string(),
        range.end.to_string()
    ])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(0)?;
        let kind: String = r.get(1)?;
        let amount: String = r.get(2)?;
        let account_kind: String = r.get(5)?;
        let category_kind: Option<String> = r.get(8)?;
        out.push(LedgerRow {
            date: stored_date(&date, "transactions.date")?,
            kind: kind.parse()?,
            amount: stored_decimal(&amount, "transactions.amount")?,
            account_id: r.get(3)?,
            account_name: r.get(4)?,
            account_kind: account_kind.parse()?,
            category_id: r.get(6)?,
            category_name: r.get(7)?,
            category_kind: category_kind.map(|k| k.parse()).transpose()?,
            category_color: r.get(9)?,
        });
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl From<Totals> for Summary {
    fn from(t: Totals) -> Self {
        Self {
            total_income: t.income,
            total_expense: t.expense,
            balance: t.net(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLine {
    pub category_id: Option<i64>,
    pub name: String,
    pub type_label: String,
    pub color_tag: Option<String>,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub chart_color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLine {
    pub account_id: i64,
    pub name: String,
    pub type_label: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub range: DateRange,
    pub summary: Summary,
    pub categories: Vec<CategoryLine>,
    pub accounts: Vec<AccountLine>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.accounts.is_empty()
    }
}

/// Groups the rows falling inside `range` by category and by account.
pub fn aggregate_rows(rows: &[LedgerRow], range: DateRange, palette: &Palette) -> Aggregation {
    let mut summary = Totals::default();
    let mut by_category: BTreeMap<Option<i64>, (&LedgerRow, Totals)> = BTreeMap::new();
    let mut by_account: BTreeMap<i64, (&LedgerRow, Totals)> = BTreeMap::new();

    for row in rows.iter().filter(|r| range.contains(r.date)) {
        summary.add(row.kind, row.amount);
        by_category
            .entry(row.category_id)
            .or_insert((row, Totals::default()))
            .1
            .add(row.kind, row.amount);
        by_account
            .entry(row.account_id)
            .or_insert((row, Totals::default()))
            .1
            .add(row.kind, row.amount);
    }

    let mut categories: Vec<CategoryLine> = by_category
        .into_iter()
        .map(|(id, (row, t))| CategoryLine {
            category_id: id,
            name: match (id, &row.category_name) {
                (Some(_), Some(n)) => n.clone(),
                _ => UNCATEGORIZED.to_string(),
            },
            type_label: match (id, row.category_kind) {
                (Some(_), Some(k)) => k.label().to_string(),
                _ => UNCLASSIFIED.to_string(),
            },
            color_tag: id.and(row.category_color.clone()),
            income: t.income,
            expense: t.expense,
            balance: t.net(),
            chart_color: String::new(),
        })
        .collect();
    categories.sort_by(|a, b| {
        b.income
            .cmp(&a.income)
            .then_with(|| b.expense.cmp(&a.expense))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    for (index, line) in categories.iter_mut().enumerate() {
        line.chart_color = palette.resolve(line.color_tag.as_deref(), index);
    }

    let mut accounts: Vec<AccountLine> = by_account
        .into_iter()
        .map(|(id, (row, t))| AccountLine {
            account_id: id,
            name: row.account_name.clone(),
            type_label: row.account_kind.label().to_string(),
            income: t.income,
            expense: t.expense,
            balance: t.net(),
        })
        .collect();
    accounts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.account_id.cmp(&b.account_id)));

    Aggregation {
        range,
        summary: summary.into(),
        categories,
        accounts,
    }
}

/// Summary plus category and account breakdowns of one user's transactions
/// dated within `range`.
pub fn aggregate(
    conn: &Connection,
    user: UserId,
    range: DateRange,
    config: &ReportConfig,
) -> LedgerResult<Aggregation> {
    let rows = load_rows(conn, user, range)?;
    tracing::debug!(user, start = %range.start, end = %range.end, rows = rows.len(), "aggregating");
    Ok(aggregate_rows(&rows, range, &config.palette))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySeries {
    pub months: Vec<NaiveDate>,
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
    pub target: Vec<Decimal>,
}

/// The six month starts ending at `reference`'s month, oldest first.
pub fn series_months(reference: NaiveDate) -> Vec<NaiveDate> {
    (0..MONTHS_IN_SERIES as i32)
        .rev()
        .map(|back| shift_month(reference, -back))
        .collect()
}

pub fn series_range(reference: NaiveDate) -> DateRange {
    DateRange::new(
        shift_month(reference, -(MONTHS_IN_SERIES as i32 - 1)),
        month_end(reference),
    )
}

/// Trailing six-month income/expense series. Months without transactions
/// still appear with zero totals; the target is `income × ratio`.
pub fn monthly_series_rows(
    rows: &[LedgerRow],
    reference: NaiveDate,
    ratio: Decimal,
) -> MonthlySeries {
    let months = series_months(reference);
    let range = series_range(reference);
    let mut per_month: HashMap<NaiveDate, Totals> = HashMap::new();
    for row in rows.iter().filter(|r| range.contains(r.date)) {
        per_month
            .entry(month_start(row.date))
            .or_default()
            .add(row.kind, row.amount);
    }

    let mut series = MonthlySeries {
        months: months.clone(),
        labels: Vec::with_capacity(MONTHS_IN_SERIES),
        income: Vec::with_capacity(MONTHS_IN_SERIES),
        expense: Vec::with_capacity(MONTHS_IN_SERIES),
        target: Vec::with_capacity(MONTHS_IN_SERIES),
    };
    for m in months {
        let t = per_month.get(&m).copied().unwrap_or_default();
        series.labels.push(m.format("%b/%Y").to_string());
        series.income.push(t.income);
        series.expense.push(t.expense);
        series.target.push(t.income.saturating_mul(ratio));
    }
    series
}

pub fn monthly_series(
    conn: &Connection,
    user: UserId,
    reference: NaiveDate,
    config: &ReportConfig,
) -> LedgerResult<MonthlySeries> {
    let rows = load_rows(conn, user, series_range(reference))?;
    Ok(monthly_series_rows(&rows, reference, config.expense_target_ratio))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryChart {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AccountChart {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
    pub balance: Vec<Decimal>,
}

/// Chart series for a report; lines with neither income nor expense are left
/// out.
pub fn chart_payloads(agg: &Aggregation) -> (CategoryChart, AccountChart) {
    let mut cat = CategoryChart::default();
    for line in &agg.categories {
        if line.income > Decimal::ZERO || line.expense > Decimal::ZERO {
            cat.labels.push(line.name.clone());
            cat.income.push(line.income);
            cat.expense.push(line.expense);
            cat.colors.push(line.chart_color.clone());
        }
    }
    let mut acct = AccountChart::default();
    for line in &agg.accounts {
        if line.income > Decimal::ZERO || line.expense > Decimal::ZERO {
            acct.labels.push(line.name.clone());
            acct.income.push(line.income);
            acct.expense.push(line.expense);
            acct.balance.push(line.balance);
        }
    }
    (cat, acct)
}
