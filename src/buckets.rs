// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trailing calendar-month windows.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

pub const DEFAULT_WINDOW: usize = 6;

/// A century of months; larger windows are a configuration error.
pub const MAX_WINDOW: usize = 1200;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32, // 1..=12
    pub label: String,
    pub index: usize,
    pub revenue: Decimal,
    pub expenses: Decimal,
}

impl MonthBucket {
    fn new(year: i32, month: u32, index: usize) -> Self {
        Self {
            year,
            month,
            label: MONTH_LABELS[(month - 1) as usize].to_string(),
            index,
            revenue: Decimal::ZERO,
            expenses: Decimal::ZERO,
        }
    }

    /// `YYYY-MM`
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn net(&self) -> Decimal {
        self.revenue.saturating_sub(self.expenses)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// (year, month) moved by `delta` months, with year rollover.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let total = year * 12 + (month as i32 - 1) + delta;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

fn month_ordinal(year: i32, month: u32) -> i64 {
    i64::from(year) * 12 + i64::from(month) - 1
}

/// The `window` months ending at (and including) the reference month, oldest
/// first. A zero window yields no buckets; windows past [`MAX_WINDOW`] are cut
/// to it.
pub fn month_buckets(window: usize, reference: NaiveDate) -> Vec<MonthBucket> {
    let window = window.min(MAX_WINDOW);
    let (y, m) = (reference.year(), reference.month());
    (0..window)
        .map(|i| {
            let back = (window - 1 - i) as i32;
            let (year, month) = shift_month(y, m, -back);
            MonthBucket::new(year, month, i)
        })
        .collect()
}

/// Position of the bucket holding `date`, or `None` when it falls outside
/// the window.
pub fn bucket_index(buckets: &[MonthBucket], date: NaiveDate) -> Option<usize> {
    let first = buckets.first()?;
    let offset = month_ordinal(date.year(), date.month()) - month_ordinal(first.year, first.month);
    if offset < 0 {
        return None;
    }
    let idx = offset as usize;
    (idx < buckets.len()).then_some(idx)
}
