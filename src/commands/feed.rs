// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::engine::Report;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(report: &Report, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if maybe_print_json(json_flag, jsonl_flag, &report.feed)? {
        return Ok(());
    }
    if report.feed.is_empty() {
        println!("No recent activity");
        super::incomplete_notice(report);
        return Ok(());
    }
    let rows: Vec<Vec<String>> = report
        .feed
        .iter()
        .map(|e| vec![e.time_ago.clone(), e.title.clone(), e.description.clone()])
        .collect();
    println!("{}", pretty_table(&["When", "Activity", "Details"], rows));
    super::incomplete_notice(report);
    Ok(())
}
