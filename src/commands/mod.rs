// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod breakdown;
pub mod budgets;
pub mod doctor;
pub mod exporter;
pub mod feed;
pub mod stats;
pub mod trend;

use anyhow::{Result, bail};
use chrono::Utc;
use std::path::Path;

use crate::config;
use crate::engine::{Engine, Report};
use crate::sources::{DirSource, HttpSource, RecordSource, SourceKind, fetch_snapshot};
use crate::utils::parse_instant;

/// Load config, apply command-line overrides, fetch the snapshot and build
/// the report every subcommand renders from.
pub fn prepare(m: &clap::ArgMatches) -> Result<Report> {
    let explicit = m.get_one::<String>("config").map(|s| s.trim().to_string());
    let mut cfg = config::load_or_default(explicit.as_deref().map(Path::new))?;
    if let Some(&months) = m.get_one::<i64>("months") {
        cfg.engine.window_months = months;
    }
    if let Some(&limit) = m.get_one::<i64>("limit") {
        cfg.engine.feed_limit = limit;
    }
    // Fail on configuration before touching any source.
    let engine = Engine::new(&cfg.engine)?;

    let reference = match m.get_one::<String>("now") {
        Some(s) => parse_instant(s)?,
        None => Utc::now(),
    };

    let data_dir = m
        .get_one::<String>("data-dir")
        .map(|s| Path::new(s.trim()).to_path_buf())
        .or(cfg.data_dir.clone());
    let base_url = m
        .get_one::<String>("url")
        .map(|s| s.trim().to_string())
        .or(cfg.base_url.clone());

    let source: Box<dyn RecordSource> = match (data_dir, base_url) {
        (Some(dir), _) => Box::new(DirSource::new(dir)),
        (None, Some(url)) => Box::new(HttpSource::new(&url)?),
        (None, None) => bail!("No data source: pass --data-dir or --url, or set one in config.toml"),
    };

    let snap = fetch_snapshot(source.as_ref(), &SourceKind::ALL);
    let report = engine.run(&snap, reference);
    if report.incomplete {
        tracing::warn!(
            failed = report.failed_sources.len(),
            skipped = report.diagnostics.len(),
            "data incomplete"
        );
    }
    Ok(report)
}

/// Printed under tables when the report is built from partial data.
pub(crate) fn incomplete_notice(report: &Report) {
    if report.incomplete {
        println!(
            "⚠ data incomplete: {} source(s) unavailable, {} record(s) skipped (run `edupulse doctor`)",
            report.failed_sources.len(),
            report.diagnostics.len()
        );
    }
}
