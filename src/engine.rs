// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Snapshot in, view-models out.
//!
//! [`Engine::new`] validates the configuration before anything else runs.
//! [`Engine::run`] never fails: bad records and missing sources show up in
//! the report's `diagnostics` / `failed_sources` and set `incomplete`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alerts::{budget_alerts, AlertEntry, AlertSummary, AlertThresholds};
use crate::buckets::{MonthBucket, DEFAULT_WINDOW, MAX_WINDOW};
use crate::errors::{ConfigurationError, Diagnostic, PartialSourceFailure};
use crate::feed::{self, ActivityEntry, EnrollmentFeed, FeedSource, HireFeed, TransactionFeed};
use crate::metrics::{self, FinanceStats, HrStats, StudentStats};
use crate::models::{Records, TxType};
use crate::normalize::{CategoryRule, Normalizer, UNCATEGORIZED};
use crate::rollup::{self, DepartmentUtilization, Distribution};
use crate::sources::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRuleConfig {
    pub pattern: String,
    pub category: String,
}

/// Negative `window_months` / `feed_limit` are rejected by [`Engine::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_months: i64,
    pub feed_limit: i64,
    pub uncategorized_label: String,
    pub thresholds: AlertThresholds,
    pub category_rules: Vec<CategoryRuleConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window_months: DEFAULT_WINDOW as i64,
            feed_limit: feed::DEFAULT_LIMIT as i64,
            uncategorized_label: UNCATEGORIZED.to_string(),
            thresholds: AlertThresholds::default(),
            category_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    window: usize,
    limit: usize,
    thresholds: AlertThresholds,
    normalizer: Normalizer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub reference: DateTime<Utc>,
    pub buckets: Vec<MonthBucket>,
    pub stats: FinanceStats,
    pub student_stats: StudentStats,
    pub hr_stats: HrStats,
    pub expense_breakdown: Distribution,
    pub income_breakdown: Distribution,
    pub programs: Distribution,
    pub departments: Distribution,
    pub utilization: Vec<DepartmentUtilization>,
    pub alerts: Vec<AlertEntry>,
    pub alert_summary: AlertSummary,
    pub feed: Vec<ActivityEntry>,
    pub diagnostics: Vec<Diagnostic>,
    pub failed_sources: Vec<PartialSourceFailure>,
    /// Some source failed or some record was skipped.
    pub incomplete: bool,
}

impl Engine {
    pub fn new(cfg: &EngineConfig) -> Result<Self, ConfigurationError> {
        let window = usize::try_from(cfg.window_months)
            .map_err(|_| ConfigurationError::NegativeWindow(cfg.window_months))?;
        if window > MAX_WINDOW {
            return Err(ConfigurationError::WindowTooLarge {
                got: cfg.window_months,
                max: MAX_WINDOW,
            });
        }
        let limit = usize::try_from(cfg.feed_limit)
            .map_err(|_| ConfigurationError::NegativeLimit(cfg.feed_limit))?;
        let thresholds = cfg.thresholds.validate()?;
        let rules = cfg
            .category_rules
            .iter()
            .map(|r| CategoryRule::new(&r.pattern, &r.category))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            window,
            limit,
            thresholds,
            normalizer: Normalizer::new(&cfg.uncategorized_label, rules),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn run(&self, snap: &Snapshot, reference: DateTime<Utc>) -> Report {
        let (records, diagnostics) = self.normalizer.normalize(snap);
        if !diagnostics.is_empty() {
            tracing::warn!(skipped = diagnostics.len(), "records skipped during normalization");
        }
        self.report(&records, diagnostics, snap.failures.clone(), reference)
    }

    /// Build every view-model from already normalized records.
    pub fn report(
        &self,
        records: &Records,
        diagnostics: Vec<Diagnostic>,
        failed_sources: Vec<PartialSourceFailure>,
        reference: DateTime<Utc>,
    ) -> Report {
        let today = reference.date_naive();
        let alerts = budget_alerts(&records.budgets, &self.thresholds);
        let sources: [&dyn FeedSource; 3] = [
            &TransactionFeed(&records.transactions),
            &EnrollmentFeed(&records.students),
            &HireFeed(&records.staff),
        ];
        let incomplete = !diagnostics.is_empty() || !failed_sources.is_empty();

        Report {
            reference,
            buckets: rollup::monthly_series(self.window, today, &records.transactions),
            stats: metrics::finance_stats(records, today),
            student_stats: metrics::student_stats(&records.students, today),
            hr_stats: metrics::hr_stats(&records.staff, today),
            expense_breakdown: rollup::expense_breakdown(&records.transactions),
            income_breakdown: rollup::category_breakdown(&records.transactions, TxType::Income),
            programs: rollup::program_distribution(&records.students),
            departments: rollup::department_headcount(&records.staff),
            utilization: rollup::department_utilization(&records.budgets),
            alert_summary: AlertSummary::from_entries(&alerts),
            alerts,
            feed: feed::rank(self.limit, &sources, reference),
            diagnostics,
            failed_sources,
            incomplete,
        }
    }
}
