// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Merged, reverse-chronological activity feed.
//!
//! Each [`FeedSource`] turns one record set into events. [`rank`] merges the
//! sources with a stable sort: equal timestamps keep source declaration order,
//! then the order within the source. Inputs are never mutated.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{StaffRecord, StudentRecord, Transaction, TxStatus, TxType};
use crate::utils::round2;

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    Transaction {
        transaction_id: String,
        tx_type: TxType,
        status: TxStatus,
        amount: Decimal,
    },
    Enrollment {
        student_id: String,
        program: String,
    },
    Hire {
        employee_id: String,
        department: String,
    },
}

/// An event before it is placed relative to a reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEvent {
    pub id: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub id: String,
    #[serde(flatten)]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub time_ago: String,
    pub timestamp: DateTime<Utc>,
}

pub trait FeedSource {
    /// Events in the source's own order.
    fn events(&self) -> Vec<FeedEvent>;
}

fn start_of(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// `3000` -> `3,000`, `1234.5` -> `1,234.5`
fn grouped(amount: Decimal) -> String {
    let text = round2(amount).normalize().to_string();
    let (int, frac) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text.clone(), None),
    };
    let (sign, digits) = match int.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", int.as_str()),
    };
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    match frac {
        Some(f) => format!("{}{}.{}", sign, out, f),
        None => format!("{}{}", sign, out),
    }
}

pub struct TransactionFeed<'a>(pub &'a [Transaction]);

impl FeedSource for TransactionFeed<'_> {
    fn events(&self) -> Vec<FeedEvent> {
        self.0
            .iter()
            .map(|t| {
                let title = match t.r#type {
                    TxType::Income => format!("Payment received: ${}", grouped(t.amount)),
                    TxType::Expense => format!("Expense recorded: ${}", grouped(t.amount)),
                };
                FeedEvent {
                    id: format!("tx-{}", t.transaction_id),
                    kind: ActivityKind::Transaction {
                        transaction_id: t.transaction_id.clone(),
                        tx_type: t.r#type,
                        status: t.status,
                        amount: t.amount,
                    },
                    title,
                    description: t.description.clone().unwrap_or_else(|| t.category.clone()),
                    timestamp: start_of(t.date),
                }
            })
            .collect()
    }
}

/// Active students with a known enrollment date.
pub struct EnrollmentFeed<'a>(pub &'a [StudentRecord]);

impl FeedSource for EnrollmentFeed<'_> {
    fn events(&self) -> Vec<FeedEvent> {
        self.0
            .iter()
            .filter(|s| s.is_active())
            .filter_map(|s| {
                let date = s.enrollment_date?;
                Some(FeedEvent {
                    id: format!("enroll-{}", s.student_id),
                    kind: ActivityKind::Enrollment {
                        student_id: s.student_id.clone(),
                        program: s.program.clone(),
                    },
                    title: "New student enrolled".to_string(),
                    description: format!("{} enrolled in {}", s.full_name(), s.program),
                    timestamp: start_of(date),
                })
            })
            .collect()
    }
}

pub struct HireFeed<'a>(pub &'a [StaffRecord]);

impl FeedSource for HireFeed<'_> {
    fn events(&self) -> Vec<FeedEvent> {
        self.0
            .iter()
            .map(|s| FeedEvent {
                id: format!("hire-{}", s.employee_id),
                kind: ActivityKind::Hire {
                    employee_id: s.employee_id.clone(),
                    department: s.department.clone(),
                },
                title: "New staff member".to_string(),
                description: if s.position.is_empty() {
                    format!("{} joined {}", s.full_name(), s.department)
                } else {
                    format!("{} joined {} as {}", s.full_name(), s.department, s.position)
                },
                timestamp: start_of(s.hire_date),
            })
            .collect()
    }
}

/// Human distance from `reference` back to `ts`. Past a week the absolute
/// date is shown instead.
pub fn time_ago(ts: DateTime<Utc>, reference: DateTime<Utc>) -> String {
    let secs = (reference - ts).num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }
    if secs < 3_600 {
        return format!("{}m ago", secs / 60);
    }
    if secs < 86_400 {
        return format!("{}h ago", secs / 3_600);
    }
    if secs < 604_800 {
        return format!("{}d ago", secs / 86_400);
    }
    ts.format("%b %-d, %Y").to_string()
}

/// The `limit` most recent events across `sources`, newest first.
pub fn rank(
    limit: usize,
    sources: &[&dyn FeedSource],
    reference: DateTime<Utc>,
) -> Vec<ActivityEntry> {
    let mut events: Vec<FeedEvent> = sources.iter().flat_map(|s| s.events()).collect();
    // Stable: equal timestamps keep declaration order.
    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    events.truncate(limit);
    events
        .into_iter()
        .map(|e| ActivityEntry {
            time_ago: time_ago(e.timestamp, reference),
            id: e.id,
            kind: e.kind,
            title: e.title,
            description: e.description,
            timestamp: e.timestamp,
        })
        .collect()
}
