// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::alerts::AlertEntry;
use crate::engine::Report;
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};

pub fn handle(report: &Report, sub: &clap::ArgMatches) -> Result<()> {
    if sub.get_flag("by-department") {
        return by_department(report, sub);
    }
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let level = sub.get_one::<String>("level").map(|s| s.trim().to_string());

    let entries: Vec<&AlertEntry> = report
        .alerts
        .iter()
        .filter(|e| level.as_deref().is_none_or(|l| e.level.as_str() == l))
        .collect();
    if maybe_print_json(json_flag, jsonl_flag, &entries)? {
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let pct = if e.utilization.valid {
                fmt_pct(&e.utilization.percentage)
            } else {
                "n/a".to_string()
            };
            vec![
                e.category.clone(),
                e.department.clone(),
                fmt_money(&e.allocated),
                fmt_money(&e.spent),
                fmt_money(&e.remaining),
                pct,
                e.level.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Category", "Department", "Allocated", "Spent", "Remaining", "Used", "Status"],
            rows
        )
    );
    let s = &report.alert_summary;
    println!(
        "{} over budget, {} near limit, {} on track; {} of {} spent",
        s.over_budget,
        s.near_limit,
        s.on_track,
        fmt_money(&s.total_spent),
        fmt_money(&s.total_allocated)
    );
    super::incomplete_notice(report);
    Ok(())
}

fn by_department(report: &Report, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if maybe_print_json(json_flag, jsonl_flag, &report.utilization)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = report
        .utilization
        .iter()
        .map(|d| {
            vec![
                d.department.clone(),
                d.items.to_string(),
                fmt_money(&d.allocated),
                fmt_money(&d.spent),
                fmt_money(&d.remaining),
                fmt_pct(&d.utilization.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Department", "Items", "Allocated", "Spent", "Remaining", "Used"],
            rows
        )
    );
    super::incomplete_notice(report);
    Ok(())
}
