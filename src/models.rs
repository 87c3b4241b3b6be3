// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::Credit => "credit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
            AccountKind::Credit => "Credit card",
        }
    }
}

impl FromStr for AccountKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "credit" => Ok(AccountKind::Credit),
            _ => Err(LedgerError::InvalidKind {
                what: "account type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a money movement. Shared by categories and transactions; the
/// transaction's own copy is the one balance math trusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

pub type CategoryKind = Kind;
pub type TransactionKind = Kind;

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
        }
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            _ => Err(LedgerError::InvalidKind {
                what: "type",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of presentation colors a category may carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    #[default]
    Indigo,
    Blue,
    Purple,
    Green,
    Emerald,
    Amber,
    Pink,
    Red,
}

impl ColorTag {
    pub const ALL: [ColorTag; 8] = [
        ColorTag::Indigo,
        ColorTag::Blue,
        ColorTag::Purple,
        ColorTag::Green,
        ColorTag::Emerald,
        ColorTag::Amber,
        ColorTag::Pink,
        ColorTag::Red,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Indigo => "indigo",
            ColorTag::Blue => "blue",
            ColorTag::Purple => "purple",
            ColorTag::Green => "green",
            ColorTag::Emerald => "emerald",
            ColorTag::Amber => "amber",
            ColorTag::Pink => "pink",
            ColorTag::Red => "red",
        }
    }

    /// Lenient decoding of a stored tag. Accepts the bare name as well as the
    /// legacy `bg-<name>-500` form; anything else is `None` so presentation can
    /// fall back to a positional color.
    pub fn from_stored(raw: &str) -> Option<ColorTag> {
        let name = raw
            .trim()
            .strip_prefix("bg-")
            .and_then(|s| s.strip_suffix("-500"))
            .unwrap_or(raw.trim());
        ColorTag::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

impl FromStr for ColorTag {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorTag::from_stored(s).ok_or_else(|| LedgerError::InvalidColor(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
    pub current_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub user_id: UserId,
    pub name: String,
    pub kind: CategoryKind,
    /// Raw stored tag; legacy rows may hold values outside the closed set.
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: UserId,
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub initial_balance: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub initial_balance: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
    pub color: ColorTag,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
    pub color: Option<ColorTag>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub category_id: Option<i64>,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

/// Partial update of a transaction. `category` is doubly optional so a caller
/// can distinguish "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TransactionChanges {
    pub account_id: Option<i64>,
    pub category: Option<Option<i64>>,
    pub kind: Option<TransactionKind>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_tag_accepts_legacy_form() {
        assert_eq!(ColorTag::from_stored("bg-amber-500"), Some(ColorTag::Amber));
        assert_eq!(ColorTag::from_stored("Emerald"), Some(ColorTag::Emerald));
        assert_eq!(ColorTag::from_stored("bg-teal-500"), None);
        assert_eq!(ColorTag::from_stored(""), None);
    }

    #[test]
    fn kinds_parse_case_insensitively() {
        assert_eq!("INCOME".parse::<Kind>().unwrap(), Kind::Income);
        assert_eq!(" savings ".parse::<AccountKind>().unwrap(), AccountKind::Savings);
        assert!("transfer".parse::<Kind>().is_err());
    }
}
