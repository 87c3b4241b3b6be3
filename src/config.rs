// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::Palette;
use crate::utils::{get_setting, parse_decimal, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub const TARGET_RATIO_KEY: &str = "expense_target_ratio";
pub const RECENT_LIMIT: usize = 10;

/// Immutable presentation settings handed to the aggregation engine and the
/// dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub palette: Palette,
    /// Share of a month's income that expenses are measured against.
    pub expense_target_ratio: Decimal,
    pub recent_limit: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            expense_target_ratio: Decimal::new(80, 2),
            recent_limit: RECENT_LIMIT,
        }
    }
}

impl ReportConfig {
    /// Defaults overlaid with whatever the settings table holds. A stored
    /// ratio that no longer parses is ignored.
    pub fn load(conn: &Connection) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(raw) = get_setting(conn, TARGET_RATIO_KEY)? {
            match parse_decimal(&raw) {
                Ok(r) => cfg.expense_target_ratio = r,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring stored target ratio"),
            }
        }
        Ok(cfg)
    }
}

pub fn set_target_ratio(conn: &Connection, ratio: Decimal) -> Result<()> {
    if ratio < Decimal::ZERO || ratio > Decimal::ONE {
        bail!("Target ratio must be between 0 and 1, got {}", ratio);
    }
    set_setting(conn, TARGET_RATIO_KEY, &ratio.to_string())
}
