// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod dashboard;
pub mod doctor;
pub mod exporter;
pub mod reports;
pub mod settings;
pub mod transactions;

use crate::models::UserId;

pub fn user_id(m: &clap::ArgMatches) -> UserId {
    m.get_one::<i64>("user").copied().unwrap_or(1)
}

/// Today in local time, the reference point for default ranges.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Value of an argument clap already enforces as required or defaulted.
pub fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("missing argument --{}", name))
}
