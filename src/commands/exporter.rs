// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::reports::range_from_args;
use crate::config::ReportConfig;
use crate::export::export_csv;
use crate::models::UserId;
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

pub fn handle(conn: &Connection, user: UserId, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, user, sub).map(|_| ()),
        _ => Ok(()),
    }
}

/// Where the export lands: `--out` as a file, or the generated filename
/// inside `--out` when it names a directory.
fn target_path(out: Option<&str>, filename: &str) -> PathBuf {
    match out {
        Some(o) if Path::new(o).is_dir() => Path::new(o).join(filename),
        Some(o) => PathBuf::from(o),
        None => PathBuf::from(filename),
    }
}

pub fn export_report(conn: &Connection, user: UserId, sub: &clap::ArgMatches) -> Result<PathBuf> {
    let config = ReportConfig::load(conn)?;
    let range = range_from_args(sub);
    let (bytes, filename) = export_csv(conn, user, range, &config)?;
    let path = target_path(sub.get_one::<String>("out").map(String::as_str), &filename);
    std::fs::write(&path, &bytes).with_context(|| format!("Write {}", path.display()))?;
    println!("Exported report to {}", path.display());
    Ok(path)
}
