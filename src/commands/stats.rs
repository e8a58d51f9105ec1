// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde::Serialize;

use crate::engine::Report;
use crate::metrics::{FinanceStats, HrStats, StudentStats};
use crate::utils::{fmt_money, fmt_pct, maybe_print_json, pretty_table};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsView<'a> {
    finance: &'a FinanceStats,
    students: &'a StudentStats,
    hr: &'a HrStats,
    incomplete: bool,
}

pub fn handle(report: &Report, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let view = StatsView {
        finance: &report.stats,
        students: &report.student_stats,
        hr: &report.hr_stats,
        incomplete: report.incomplete,
    };
    if maybe_print_json(json_flag, jsonl_flag, &view)? {
        return Ok(());
    }

    let f = &report.stats;
    let s = &report.student_stats;
    let h = &report.hr_stats;
    let rows = vec![
        vec!["Total revenue".into(), fmt_money(&f.total_revenue)],
        vec!["Monthly revenue".into(), fmt_money(&f.monthly_revenue)],
        vec!["Revenue growth".into(), f.revenue_growth.to_string()],
        vec!["Total expenses".into(), fmt_money(&f.total_expenses)],
        vec!["Monthly expenses".into(), fmt_money(&f.monthly_expenses)],
        vec!["Expense growth".into(), f.expense_growth.to_string()],
        vec!["Net profit".into(), fmt_money(&f.net_profit)],
        vec!["Profit margin".into(), fmt_pct(&f.profit_margin)],
        vec!["Total balance".into(), fmt_money(&f.total_balance)],
        vec!["Transactions".into(), f.total_transactions.to_string()],
        vec!["Active accounts".into(), f.total_accounts.to_string()],
        vec!["Active budgets".into(), f.active_budgets.to_string()],
        vec!["Students (active / total)".into(), format!("{} / {}", s.active_students, s.total_students)],
        vec!["New enrollments".into(), s.new_enrollments.to_string()],
        vec!["Graduated".into(), s.graduated_students.to_string()],
        vec!["Staff (active / total)".into(), format!("{} / {}", h.active_staff, h.total_staff)],
        vec!["New hires".into(), h.new_hires.to_string()],
        vec!["Departments".into(), h.departments.to_string()],
        vec!["Average salary".into(), fmt_money(&h.average_salary)],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));
    super::incomplete_notice(report);
    Ok(())
}
