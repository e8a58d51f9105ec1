// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use edupulse::{cli, commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let Some((name, sub)) = matches.subcommand() else {
        cli::build_cli().print_help()?;
        println!();
        return Ok(());
    };

    let report = commands::prepare(&matches)?;
    match name {
        "stats" => commands::stats::handle(&report, sub)?,
        "trend" => commands::trend::handle(&report, sub)?,
        "budgets" => commands::budgets::handle(&report, sub)?,
        "breakdown" => commands::breakdown::handle(&report, sub)?,
        "feed" => commands::feed::handle(&report, sub)?,
        "doctor" => commands::doctor::handle(&report)?,
        "export" => commands::exporter::handle(&report, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
