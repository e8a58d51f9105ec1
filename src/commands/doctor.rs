// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::Report;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn issue_rows(report: &Report) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Sources that could not be fetched
    for f in &report.failed_sources {
        rows.push(vec![
            "source_unavailable".into(),
            f.source_kind.to_string(),
            f.message.clone(),
        ]);
    }

    // 2) Records the normalizer rejected
    for d in &report.diagnostics {
        rows.push(vec![
            "record_skipped".into(),
            format!("{} #{}", d.source, d.index),
            d.error.to_string(),
        ]);
    }
    rows
}

pub fn handle(report: &Report) -> Result<()> {
    let rows = issue_rows(report);
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Where", "Detail"], rows));
    }
    Ok(())
}
