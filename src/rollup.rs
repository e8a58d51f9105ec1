// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-bucket and per-category rollups.
//!
//! Distributions keep first-occurrence order. A "top N by value" view is an
//! explicit re-sort, see [`Distribution::sorted_by_total`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::buckets::{bucket_index, month_buckets, MonthBucket};
use crate::metrics::{percent_of, utilization, Utilization};
use crate::models::{BudgetItem, BudgetStatus, StaffRecord, StudentRecord, Transaction, TxType};
use crate::utils::total;

/// Only completed transactions inside the window contribute.
pub fn monthly_series(
    window: usize,
    reference: NaiveDate,
    transactions: &[Transaction],
) -> Vec<MonthBucket> {
    let mut buckets = month_buckets(window, reference);
    let mut outside = 0usize;
    for t in transactions.iter().filter(|t| t.is_completed()) {
        let Some(i) = bucket_index(&buckets, t.date) else {
            outside += 1;
            continue;
        };
        match t.r#type {
            TxType::Income => buckets[i].revenue = buckets[i].revenue.saturating_add(t.amount),
            TxType::Expense => buckets[i].expenses = buckets[i].expenses.saturating_add(t.amount),
        }
    }
    tracing::debug!(window, outside, "monthly series built");
    buckets
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistributionEntry {
    pub key: String,
    pub count: usize,
    pub total: Decimal,
    /// Percent of the amount total, or of the record count for headcounts.
    pub share: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Distribution {
    pub entries: Vec<DistributionEntry>,
}

#[derive(Default)]
struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<DistributionEntry>,
}

impl Tally {
    fn add(&mut self, key: &str, amount: Decimal) {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push(DistributionEntry {
                    key: key.to_string(),
                    count: 0,
                    total: Decimal::ZERO,
                    share: Decimal::ZERO,
                });
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[i].count += 1;
        self.entries[i].total = self.entries[i].total.saturating_add(amount);
    }

    fn by_amount(mut self) -> Distribution {
        let whole = total(self.entries.iter().map(|e| e.total));
        for e in &mut self.entries {
            e.share = percent_of(e.total, whole);
        }
        Distribution {
            entries: self.entries,
        }
    }

    fn by_count(mut self) -> Distribution {
        let whole = Decimal::from(self.entries.iter().map(|e| e.count).sum::<usize>());
        for e in &mut self.entries {
            e.share = percent_of(Decimal::from(e.count), whole);
        }
        Distribution {
            entries: self.entries,
        }
    }
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&DistributionEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn total(&self) -> Decimal {
        total(self.entries.iter().map(|e| e.total))
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// Largest total first, then largest count. Remaining ties keep
    /// first-occurrence order.
    pub fn sorted_by_total(&self) -> Distribution {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.total.cmp(&a.total).then(b.count.cmp(&a.count)));
        Distribution { entries }
    }

    pub fn top(&self, n: usize) -> Distribution {
        let mut d = self.sorted_by_total();
        d.entries.truncate(n);
        d
    }
}

/// Completed transactions only, across all dates.
pub fn category_breakdown(transactions: &[Transaction], kind: TxType) -> Distribution {
    let mut tally = Tally::default();
    for t in transactions
        .iter()
        .filter(|t| t.is_completed() && t.r#type == kind)
    {
        tally.add(&t.category, t.amount);
    }
    tally.by_amount()
}

pub fn expense_breakdown(transactions: &[Transaction]) -> Distribution {
    category_breakdown(transactions, TxType::Expense)
}

pub fn program_distribution(students: &[StudentRecord]) -> Distribution {
    let mut tally = Tally::default();
    for s in students {
        tally.add(&s.program, Decimal::ZERO);
    }
    tally.by_count()
}

/// `total` carries the salary sum.
pub fn department_headcount(staff: &[StaffRecord]) -> Distribution {
    let mut tally = Tally::default();
    for s in staff {
        tally.add(&s.department, s.salary.unwrap_or(Decimal::ZERO));
    }
    tally.by_count()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentUtilization {
    pub department: String,
    pub items: usize,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub utilization: Utilization,
}

/// Cancelled items are left out.
pub fn department_utilization(items: &[BudgetItem]) -> Vec<DepartmentUtilization> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<DepartmentUtilization> = Vec::new();
    for b in items.iter().filter(|b| b.status != BudgetStatus::Cancelled) {
        let i = *index.entry(b.department.as_str()).or_insert_with(|| {
            out.push(DepartmentUtilization {
                department: b.department.clone(),
                items: 0,
                allocated: Decimal::ZERO,
                spent: Decimal::ZERO,
                remaining: Decimal::ZERO,
                utilization: utilization(Decimal::ZERO, Decimal::ZERO),
            });
            out.len() - 1
        });
        let d = &mut out[i];
        d.items += 1;
        d.allocated = d.allocated.saturating_add(b.allocated);
        d.spent = d.spent.saturating_add(b.spent);
    }
    for d in &mut out {
        d.remaining = d.allocated.saturating_sub(d.spent);
        d.utilization = utilization(d.spent, d.allocated);
    }
    out
}
