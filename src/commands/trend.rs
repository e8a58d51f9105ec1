// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::buckets::MonthBucket;
use crate::engine::Report;
use crate::metrics::{growth, profit_margin, Growth};
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendRow {
    pub month: String,
    pub label: String,
    pub revenue: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub margin: Decimal,
    /// Revenue growth against the previous bucket; `None` for the first.
    pub revenue_growth: Option<Growth>,
    pub expense_growth: Option<Growth>,
}

/// Month-over-month view of the bucket series.
pub fn trend_rows(buckets: &[MonthBucket]) -> Vec<TrendRow> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let prev = i.checked_sub(1).map(|p| &buckets[p]);
            TrendRow {
                month: b.key(),
                label: b.label.clone(),
                revenue: b.revenue,
                expenses: b.expenses,
                net: b.net(),
                margin: profit_margin(b.net(), b.revenue),
                revenue_growth: prev.map(|p| growth(p.revenue, b.revenue)),
                expense_growth: prev.map(|p| growth(p.expenses, b.expenses)),
            }
        })
        .collect()
}

pub fn handle(report: &Report, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let rows = trend_rows(&report.buckets);
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let fmt_growth = |g: &Option<Growth>| g.map(|g| g.to_string()).unwrap_or_else(|| "-".into());
    let data: Vec<Vec<String>> = rows
        .iter()
        .map(|r| {
            vec![
                format!("{} ({})", r.label, r.month),
                fmt_money(&r.revenue),
                fmt_money(&r.expenses),
                fmt_money(&r.net),
                fmt_pct(&r.margin),
                fmt_growth(&r.revenue_growth),
                fmt_growth(&r.expense_growth),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Month", "Revenue", "Expenses", "Net", "Margin", "Rev. growth", "Exp. growth"],
            data
        )
    );
    super::incomplete_notice(report);
    Ok(())
}
