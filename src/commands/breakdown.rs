// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::engine::Report;
use crate::rollup::Distribution;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};

pub fn select<'a>(report: &'a Report, kind: &str) -> Option<&'a Distribution> {
    match kind {
        "expense" => Some(&report.expense_breakdown),
        "income" => Some(&report.income_breakdown),
        "programs" => Some(&report.programs),
        "departments" => Some(&report.departments),
        _ => None,
    }
}

pub fn handle(report: &Report, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let kind = sub
        .get_one::<String>("kind")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "expense".into());
    let dist = select(report, &kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown breakdown '{}'", kind))?;
    let dist = match sub.get_one::<usize>("top") {
        Some(&n) => dist.top(n),
        None => dist.clone(),
    };
    if maybe_print_json(json_flag, jsonl_flag, &dist.entries)? {
        return Ok(());
    }

    let by_count = matches!(kind.as_str(), "programs" | "departments");
    let rows: Vec<Vec<String>> = dist
        .entries
        .iter()
        .map(|e| {
            let mut row = vec![e.key.clone(), e.count.to_string()];
            if !by_count || kind == "departments" {
                row.push(fmt_money(&e.total));
            }
            row.push(fmt_pct(&e.share));
            row
        })
        .collect();
    let headers: &[&str] = match kind.as_str() {
        "programs" => &["Program", "Students", "Share"],
        "departments" => &["Department", "Staff", "Salaries", "Share"],
        _ => &["Category", "Count", "Amount", "Share"],
    };
    println!("{}", pretty_table(headers, rows));
    super::incomplete_notice(report);
    Ok(())
}
