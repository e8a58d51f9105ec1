// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Growth rates, margins, utilization and the scalar stat summaries.
//!
//! Ratios guard their denominator and saturate at the `Decimal` range
//! instead of overflowing. Zero-base growth has one convention, see [`growth`].

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::buckets::shift_month;
use crate::models::{
    AccountStatus, BudgetItem, BudgetStatus, Records, StaffRecord, StudentRecord, StudentStatus,
    Transaction, TxType,
};
use crate::utils::{round2, total};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

pub const RECENT_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    Change(Decimal),
    /// The earlier period was 0 and the later one is not.
    New,
}

impl Growth {
    pub fn percent(&self) -> Option<Decimal> {
        match self {
            Growth::Change(p) => Some(*p),
            Growth::New => None,
        }
    }
}

impl std::fmt::Display for Growth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Growth::Change(p) if p.is_sign_negative() && !p.is_zero() => {
                write!(f, "{:.2}%", round2(*p))
            }
            Growth::Change(p) => write!(f, "+{:.2}%", round2(*p)),
            Growth::New => f.write_str("new"),
        }
    }
}

impl Serialize for Growth {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            Growth::Change(p) => Serialize::serialize(&round2(*p), s),
            Growth::New => s.serialize_str("new"),
        }
    }
}

/// A zero base reports `Change(0)` when the later period is also zero and
/// `New` otherwise.
pub fn growth(earlier: Decimal, later: Decimal) -> Growth {
    if earlier.is_zero() {
        if later.is_zero() {
            Growth::Change(Decimal::ZERO)
        } else {
            Growth::New
        }
    } else {
        Growth::Change(scaled(later.saturating_sub(earlier), earlier))
    }
}

// `whole` must be non-zero.
fn scaled(part: Decimal, whole: Decimal) -> Decimal {
    match part.checked_div(whole) {
        Some(q) => q.saturating_mul(HUNDRED),
        None if part.is_sign_negative() == whole.is_sign_negative() => Decimal::MAX,
        None => Decimal::MIN,
    }
}

/// 0 when `whole` is not positive.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        scaled(part, whole)
    }
}

pub fn profit_margin(net_profit: Decimal, revenue: Decimal) -> Decimal {
    percent_of(net_profit, revenue)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Utilization {
    /// Unclamped; above 100 means overspent.
    pub percentage: Decimal,
    pub display: Decimal,
    pub over_budget: bool,
    /// False when nothing was allocated and the ratio is undefined.
    pub valid: bool,
}

pub fn utilization(spent: Decimal, allocated: Decimal) -> Utilization {
    if allocated <= Decimal::ZERO {
        return Utilization {
            percentage: Decimal::ZERO,
            display: Decimal::ZERO,
            over_budget: false,
            valid: false,
        };
    }
    let percentage = scaled(spent, allocated);
    Utilization {
        percentage,
        display: percentage.min(HUNDRED),
        over_budget: spent > allocated,
        valid: true,
    }
}

impl BudgetItem {
    pub fn utilization(&self) -> Utilization {
        utilization(self.spent, self.allocated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceStats {
    pub total_revenue: Decimal,
    pub monthly_revenue: Decimal,
    pub revenue_growth: Growth,
    pub total_expenses: Decimal,
    pub monthly_expenses: Decimal,
    pub expense_growth: Growth,
    pub net_profit: Decimal,
    pub profit_margin: Decimal,
    pub total_balance: Decimal,
    pub total_transactions: usize,
    pub total_accounts: usize,
    pub active_budgets: usize,
}

fn month_total(txs: &[Transaction], kind: TxType, year: i32, month: u32) -> Decimal {
    total(
        txs.iter()
            .filter(|t| t.is_completed() && t.r#type == kind)
            .filter(|t| t.date.year() == year && t.date.month() == month)
            .map(|t| t.amount),
    )
}

fn type_total(txs: &[Transaction], kind: TxType) -> Decimal {
    total(
        txs.iter()
            .filter(|t| t.is_completed() && t.r#type == kind)
            .map(|t| t.amount),
    )
}

/// Finance summary for the month holding `today`, compared with the month
/// before it. Only completed transactions count toward money totals.
pub fn finance_stats(records: &Records, today: NaiveDate) -> FinanceStats {
    let txs = &records.transactions;
    let (y, m) = (today.year(), today.month());
    let (py, pm) = shift_month(y, m, -1);

    let monthly_revenue = month_total(txs, TxType::Income, y, m);
    let previous_revenue = month_total(txs, TxType::Income, py, pm);
    let monthly_expenses = month_total(txs, TxType::Expense, y, m);
    let previous_expenses = month_total(txs, TxType::Expense, py, pm);
    let net_profit = monthly_revenue.saturating_sub(monthly_expenses);

    let active_accounts = records
        .accounts
        .iter()
        .filter(|a| a.status == AccountStatus::Active);

    FinanceStats {
        total_revenue: type_total(txs, TxType::Income),
        monthly_revenue,
        revenue_growth: growth(previous_revenue, monthly_revenue),
        total_expenses: type_total(txs, TxType::Expense),
        monthly_expenses,
        expense_growth: growth(previous_expenses, monthly_expenses),
        net_profit,
        profit_margin: profit_margin(net_profit, monthly_revenue),
        total_balance: total(active_accounts.clone().map(|a| a.balance)),
        total_transactions: txs.len(),
        total_accounts: active_accounts.count(),
        active_budgets: records
            .budgets
            .iter()
            .filter(|b| b.status == BudgetStatus::Active)
            .count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_students: usize,
    pub active_students: usize,
    pub new_enrollments: usize,
    pub graduated_students: usize,
}

fn is_recent(date: NaiveDate, today: NaiveDate) -> bool {
    date <= today
        && today
            .checked_sub_signed(Duration::days(RECENT_DAYS))
            .is_some_and(|from| date > from)
}

pub fn student_stats(students: &[StudentRecord], today: NaiveDate) -> StudentStats {
    StudentStats {
        total_students: students.len(),
        active_students: students.iter().filter(|s| s.is_active()).count(),
        new_enrollments: students
            .iter()
            .filter(|s| s.is_active())
            .filter(|s| s.enrollment_date.is_some_and(|d| is_recent(d, today)))
            .count(),
        graduated_students: students
            .iter()
            .filter(|s| s.status == StudentStatus::Graduated)
            .count(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HrStats {
    pub total_staff: usize,
    pub active_staff: usize,
    pub new_hires: usize,
    pub departments: usize,
    pub average_salary: Decimal,
}

pub fn hr_stats(staff: &[StaffRecord], today: NaiveDate) -> HrStats {
    let active: Vec<&StaffRecord> = staff.iter().filter(|s| s.is_active()).collect();
    let salary_sum = total(active.iter().filter_map(|s| s.salary));
    let average_salary = if active.is_empty() {
        Decimal::ZERO
    } else {
        round2(salary_sum / Decimal::from(active.len()))
    };
    let mut departments: Vec<&str> = staff.iter().map(|s| s.department.as_str()).collect();
    departments.sort_unstable();
    departments.dedup();

    HrStats {
        total_staff: staff.len(),
        active_staff: active.len(),
        new_hires: active
            .iter()
            .filter(|s| is_recent(s.hire_date, today))
            .count(),
        departments: departments.len(),
        average_salary,
    }
}
