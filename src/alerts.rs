// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::metrics::Utilization;
use crate::models::{BudgetItem, BudgetStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertLevel {
    OnTrack,
    NearLimit,
    OverBudget,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertLevel::OnTrack => "on-track",
            AlertLevel::NearLimit => "near-limit",
            AlertLevel::OverBudget => "over-budget",
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower edges (inclusive) of the near-limit and over-budget bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub near_limit: Decimal,
    pub over_budget: Decimal,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            near_limit: Decimal::from(75),
            over_budget: Decimal::from(90),
        }
    }
}

impl AlertThresholds {
    pub fn validate(self) -> Result<Self, ConfigurationError> {
        if self.near_limit < Decimal::ZERO || self.near_limit >= self.over_budget {
            return Err(ConfigurationError::Thresholds {
                near_limit: self.near_limit.to_string(),
                over_budget: self.over_budget.to_string(),
            });
        }
        Ok(self)
    }

    pub fn classify(&self, percentage: Decimal) -> AlertLevel {
        if percentage >= self.over_budget {
            AlertLevel::OverBudget
        } else if percentage >= self.near_limit {
            AlertLevel::NearLimit
        } else {
            AlertLevel::OnTrack
        }
    }
}

/// Band for a utilization percentage with the default 75 / 90 edges.
pub fn classify(percentage: Decimal) -> AlertLevel {
    AlertThresholds::default().classify(percentage)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertEntry {
    pub category: String,
    pub department: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub utilization: Utilization,
    pub level: AlertLevel,
}

/// One entry per non-cancelled budget item, input order. Classification uses
/// the unclamped percentage so overspent items stay over budget.
pub fn budget_alerts(items: &[BudgetItem], thresholds: &AlertThresholds) -> Vec<AlertEntry> {
    items
        .iter()
        .filter(|b| b.status != BudgetStatus::Cancelled)
        .map(|b| {
            let utilization = b.utilization();
            AlertEntry {
                category: b.category.clone(),
                department: b.department.clone(),
                allocated: b.allocated,
                spent: b.spent,
                remaining: b.remaining(),
                level: thresholds.classify(utilization.percentage),
                utilization,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlertSummary {
    pub on_track: usize,
    pub near_limit: usize,
    pub over_budget: usize,
    pub total_allocated: Decimal,
    pub total_spent: Decimal,
}

impl AlertSummary {
    pub fn from_entries(entries: &[AlertEntry]) -> Self {
        let mut s = AlertSummary::default();
        for e in entries {
            match e.level {
                AlertLevel::OnTrack => s.on_track += 1,
                AlertLevel::NearLimit => s.near_limit += 1,
                AlertLevel::OverBudget => s.over_budget += 1,
            }
            s.total_allocated = s.total_allocated.saturating_add(e.allocated);
            s.total_spent = s.total_spent.saturating_add(e.spent);
        }
        s
    }
}
