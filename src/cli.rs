// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

fn range_args() -> [Arg; 2] {
    [
        Arg::new("from")
            .long("from")
            .help("Start date YYYY-MM-DD (default: first day of this month)"),
        Arg::new("to")
            .long("to")
            .help("End date YYYY-MM-DD (default: today)"),
    ]
}

fn kind_arg(required: bool) -> Arg {
    Arg::new("type")
        .long("type")
        .required(required)
        .value_parser(["income", "expense"])
}

pub fn build_cli() -> Command {
    Command::new("finledger")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Personal finance bookkeeping: accounts, categories, transactions and reports")
        .arg(
            Arg::new("user")
                .long("user")
                .global(true)
                .env("FINLEDGER_USER")
                .default_value("1")
                .value_parser(value_parser!(i64))
                .help("Owner id all operations are scoped to"),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("FINLEDGER_DB")
                .help("SQLite database path (default: platform data dir)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("checking")
                                .value_parser(["checking", "savings", "credit"]),
                        )
                        .arg(Arg::new("initial").long("initial").default_value("0.00")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .value_parser(["checking", "savings", "credit"]),
                        )
                        .arg(Arg::new("initial").long("initial")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true)))
                .subcommand(
                    Command::new("recalc")
                        .about("Recompute an account's balance from its transactions")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(kind_arg(false).default_value("expense"))
                        .arg(Arg::new("color").long("color").default_value("indigo")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("rename").long("rename"))
                        .arg(kind_arg(false))
                        .arg(Arg::new("color").long("color")),
                )
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD (default: today)"))
                        .arg(kind_arg(true))
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description").default_value("")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .value_parser(value_parser!(u32).range(1..=12))
                                .requires("year"),
                        )
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32))
                                .requires("month"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64)))
                        .arg(Arg::new("date").long("date"))
                        .arg(kind_arg(false))
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("uncategorize")
                                .long("uncategorize")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("category"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(Arg::new("id").required(true).value_parser(value_parser!(i64))),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated income and expense reports")
                .subcommand(
                    Command::new("summary")
                        .args(range_args())
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("monthly")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("Reference month YYYY-MM (default: current month)"),
                        )
                        .args(json_args()),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export reports")
                .subcommand(
                    Command::new("report")
                        .args(range_args())
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .help("Output file or directory (default: current directory)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("dashboard")
                .about("Balances, this month's totals and the six-month trend")
                .args(json_args()),
        )
        .subcommand(
            Command::new("config")
                .about("Persistent settings")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
        .subcommand(
            Command::new("doctor")
                .about("Find accounts whose stored balance drifted from their transactions")
                .arg(
                    Arg::new("fix")
                        .long("fix")
                        .action(ArgAction::SetTrue)
                        .help("Recalculate drifted accounts"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        build_cli().debug_assert();
    }
}
