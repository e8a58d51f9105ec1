// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn output_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("edupulse")
        .version(clap::crate_version!())
        .about("Financial and operational rollups for the school admin console")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config.toml (defaults to the platform config dir)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .help("Read <kind>.json / <kind>.csv record exports from this directory"),
        )
        .arg(
            Arg::new("url")
                .long("url")
                .global(true)
                .help("Base URL of the console gateway, e.g. http://localhost:8080"),
        )
        .arg(
            Arg::new("now")
                .long("now")
                .global(true)
                .help("Reference instant (RFC 3339 or YYYY-MM-DD); defaults to the current time"),
        )
        .arg(
            Arg::new("months")
                .long("months")
                .global(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Trailing months in the trend window"),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .global(true)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Maximum activity feed entries"),
        )
        .subcommand(output_flags(
            Command::new("stats").about("Finance, student and HR summary"),
        ))
        .subcommand(output_flags(
            Command::new("trend").about("Monthly revenue and expenses with growth"),
        ))
        .subcommand(output_flags(
            Command::new("budgets")
                .about("Budget utilization and alerts")
                .arg(
                    Arg::new("level")
                        .long("level")
                        .value_parser(["on-track", "near-limit", "over-budget"])
                        .help("Only show items in this band"),
                )
                .arg(
                    Arg::new("by-department")
                        .long("by-department")
                        .action(ArgAction::SetTrue)
                        .help("Roll items up per department"),
                ),
        ))
        .subcommand(output_flags(
            Command::new("breakdown")
                .about("Category, program and department distributions")
                .arg(
                    Arg::new("kind")
                        .long("kind")
                        .value_parser(["expense", "income", "programs", "departments"])
                        .default_value("expense"),
                )
                .arg(
                    Arg::new("top")
                        .long("top")
                        .value_parser(value_parser!(usize))
                        .help("Sort by value and keep the first N"),
                ),
        ))
        .subcommand(output_flags(
            Command::new("feed").about("Recent activity across transactions, enrollments and hires"),
        ))
        .subcommand(Command::new("doctor").about("List skipped records and unavailable sources"))
        .subcommand(
            Command::new("export")
                .about("Write a view-model to a file")
                .arg(
                    Arg::new("what")
                        .long("what")
                        .value_parser(["report", "trend", "alerts", "feed"])
                        .default_value("report"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(["json", "csv"])
                        .default_value("json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}
