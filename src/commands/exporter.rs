// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};

use crate::commands::trend::trend_rows;
use crate::engine::Report;

pub fn handle(report: &Report, m: &clap::ArgMatches) -> Result<()> {
    let what = m
        .get_one::<String>("what")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "report".into());
    let fmt = m
        .get_one::<String>("format")
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "json".into());
    let Some(out) = m.get_one::<String>("out").map(|s| s.trim().to_string()) else {
        bail!("--out is required");
    };

    match fmt.as_str() {
        "json" => export_json(report, &what, &out)?,
        "csv" => export_csv(report, &what, &out)?,
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    println!("Exported {} to {}", what, out);
    Ok(())
}

fn export_json(report: &Report, what: &str, out: &str) -> Result<()> {
    let body = match what {
        "report" => serde_json::to_string_pretty(report)?,
        "trend" => serde_json::to_string_pretty(&trend_rows(&report.buckets))?,
        "alerts" => serde_json::to_string_pretty(&report.alerts)?,
        "feed" => serde_json::to_string_pretty(&report.feed)?,
        _ => bail!("Unknown export: {} (use report|trend|alerts|feed)", what),
    };
    std::fs::write(out, body)?;
    Ok(())
}

fn export_csv(report: &Report, what: &str, out: &str) -> Result<()> {
    let opt = |v: Option<String>| v.unwrap_or_default();
    let mut wtr = csv::Writer::from_path(out)?;
    match what {
        "trend" => {
            wtr.write_record([
                "month", "label", "revenue", "expenses", "net", "margin",
                "revenue_growth", "expense_growth",
            ])?;
            for r in trend_rows(&report.buckets) {
                wtr.write_record([
                    r.month,
                    r.label,
                    r.revenue.to_string(),
                    r.expenses.to_string(),
                    r.net.to_string(),
                    r.margin.to_string(),
                    opt(r.revenue_growth.map(|g| g.to_string())),
                    opt(r.expense_growth.map(|g| g.to_string())),
                ])?;
            }
        }
        "alerts" => {
            wtr.write_record([
                "category", "department", "allocated", "spent", "remaining",
                "utilization", "level",
            ])?;
            for e in &report.alerts {
                wtr.write_record([
                    e.category.clone(),
                    e.department.clone(),
                    e.allocated.to_string(),
                    e.spent.to_string(),
                    e.remaining.to_string(),
                    e.utilization.percentage.to_string(),
                    e.level.to_string(),
                ])?;
            }
        }
        "feed" => {
            wtr.write_record(["id", "timestamp", "time_ago", "title", "description"])?;
            for e in &report.feed {
                wtr.write_record([
                    e.id.clone(),
                    e.timestamp.to_rfc3339(),
                    e.time_ago.clone(),
                    e.title.clone(),
                    e.description.clone(),
                ])?;
            }
        }
        _ => bail!("CSV export supports trend|alerts|feed, not {}", what),
    }
    wtr.flush()?;
    Ok(())
}
