// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Raw record normalization.
//!
//! Records arrive as loosely-typed JSON objects (or CSV rows turned into
//! string-valued objects). Each one is mapped onto a canonical model or
//! rejected with a [`ValidationError`] naming the offending field. Unknown
//! enum literals are rejected, never defaulted; a blank category is routed
//! to the uncategorized label.

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::errors::{ConfigurationError, Diagnostic, ValidationError};
use crate::models::{
    Account, AccountStatus, BudgetItem, BudgetStatus, Records, StaffRecord, StaffStatus,
    StudentRecord, StudentStatus, Transaction, TxStatus, TxType,
};
use crate::sources::{Snapshot, SourceKind};
use crate::utils::{decimal_from_json, parse_iso_date};

pub const UNCATEGORIZED: &str = "(uncategorized)";

/// Largest accepted magnitude for any money field (10^15).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// One cent. Non-zero amounts and allocations smaller than this are rejected.
pub const MINOR_UNIT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rewrites a raw category label matching `pattern` to `category`.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pattern: Regex,
    category: String,
}

impl CategoryRule {
    pub fn new(pattern: &str, category: &str) -> Result<Self, ConfigurationError> {
        let re = Regex::new(pattern).map_err(|e| ConfigurationError::CategoryRule {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: re,
            category: category.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    uncategorized: String,
    rules: Vec<CategoryRule>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(UNCATEGORIZED, Vec::new())
    }
}

impl Normalizer {
    pub fn new(uncategorized: &str, rules: Vec<CategoryRule>) -> Self {
        Self {
            uncategorized: uncategorized.to_string(),
            rules,
        }
    }

    pub fn uncategorized(&self) -> &str {
        &self.uncategorized
    }

    /// Trimmed label, or the uncategorized label when blank.
    pub fn label(&self, raw: Option<&str>) -> String {
        match raw.map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => self.uncategorized.clone(),
        }
    }

    /// Like [`Normalizer::label`], then the first matching category rule wins.
    pub fn categorize(&self, raw: Option<&str>) -> String {
        let raw = raw.map(str::trim).unwrap_or("");
        if raw.is_empty() {
            return self.uncategorized.clone();
        }
        self.rules
            .iter()
            .find(|r| r.pattern.is_match(raw))
            .map(|r| r.category.clone())
            .unwrap_or_else(|| raw.to_string())
    }

    pub fn transaction(&self, raw: &Value) -> Result<Transaction, ValidationError> {
        let obj = as_object(raw)?;
        let transaction_id = required_str(obj, &["transactionId", "transaction_id"])?;
        let type_s = required_str(obj, &["type"])?;
        let r#type = match literal(&type_s).as_str() {
            "INCOME" => TxType::Income,
            "EXPENSE" => TxType::Expense,
            _ => return Err(ValidationError::invalid("type", type_s, "expected INCOME or EXPENSE")),
        };
        // Sign never decides the type; the magnitude is what gets summed.
        let amount = required_decimal(obj, &["amount"])?.abs();
        let amount = minor_units("amount", bounded("amount", amount)?)?;
        let date = required_date(obj, &["date"])?;
        let status_s = required_str(obj, &["status"])?;
        let status = match literal(&status_s).as_str() {
            "PENDING" => TxStatus::Pending,
            "COMPLETED" => TxStatus::Completed,
            "CANCELLED" | "CANCELED" => TxStatus::Cancelled,
            _ => {
                return Err(ValidationError::invalid(
                    "status",
                    status_s,
                    "expected PENDING, COMPLETED or CANCELLED",
                ));
            }
        };
        let category = self.categorize(optional_str(obj, &["category"]).as_deref());

        Ok(Transaction {
            transaction_id,
            r#type,
            amount,
            category,
            sub_category: optional_str(obj, &["subCategory", "sub_category"]),
            date,
            status,
            description: optional_str(obj, &["description"]),
            student_id: optional_id(obj, &["studentId", "student_id"])?,
            staff_id: optional_id(obj, &["staffId", "staff_id"])?,
            account_id: optional_id(obj, &["accountId", "account_id"])?,
        })
    }

    pub fn budget_item(&self, raw: &Value) -> Result<BudgetItem, ValidationError> {
        let obj = as_object(raw)?;
        let category = self.categorize(optional_str(obj, &["category"]).as_deref());
        let department = self.label(optional_str(obj, &["department"]).as_deref());
        let allocated = required_decimal(obj, &["allocated", "amount"])?;
        if allocated < Decimal::ZERO {
            return Err(ValidationError::invalid(
                "allocated",
                allocated.to_string(),
                "must not be negative",
            ));
        }
        let allocated = minor_units("allocated", bounded("allocated", allocated)?)?;
        let spent = match field(obj, &["spent"]) {
            Some(v) => decimal_from_json(v)
                .ok_or_else(|| ValidationError::invalid("spent", render(v), "not a decimal"))?,
            None => Decimal::ZERO,
        };
        if spent < Decimal::ZERO {
            return Err(ValidationError::invalid(
                "spent",
                spent.to_string(),
                "must not be negative",
            ));
        }
        let spent = bounded("spent", spent)?;
        let status = match optional_str(obj, &["status"]) {
            None => BudgetStatus::Active,
            Some(s) => match literal(&s).as_str() {
                "ACTIVE" => BudgetStatus::Active,
                "COMPLETED" => BudgetStatus::Completed,
                "CANCELLED" | "CANCELED" => BudgetStatus::Cancelled,
                _ => {
                    return Err(ValidationError::invalid(
                        "status",
                        s,
                        "expected ACTIVE, COMPLETED or CANCELLED",
                    ));
                }
            },
        };
        Ok(BudgetItem {
            category,
            department,
            allocated,
            spent,
            status,
        })
    }

    pub fn student(&self, raw: &Value) -> Result<StudentRecord, ValidationError> {
        let obj = as_object(raw)?;
        let student_id = required_str(obj, &["studentId", "student_id"])?;
        let first_name = required_str(obj, &["firstName", "first_name"])?;
        let last_name = required_str(obj, &["lastName", "last_name"])?;
        let program = self.label(optional_str(obj, &["program"]).as_deref());
        let status_s = required_str(obj, &["status"])?;
        let status = match literal(&status_s).as_str() {
            "ACTIVE" => StudentStatus::Active,
            "INACTIVE" => StudentStatus::Inactive,
            "SUSPENDED" => StudentStatus::Suspended,
            "GRADUATED" => StudentStatus::Graduated,
            _ => {
                return Err(ValidationError::invalid(
                    "status",
                    status_s,
                    "expected ACTIVE, INACTIVE, SUSPENDED or GRADUATED",
                ));
            }
        };
        Ok(StudentRecord {
            student_id,
            first_name,
            last_name,
            program,
            status,
            enrollment_date: optional_date(obj, &["enrollmentDate", "enrollment_date"])?,
        })
    }

    pub fn staff(&self, raw: &Value) -> Result<StaffRecord, ValidationError> {
        let obj = as_object(raw)?;
        let employee_id = required_str(obj, &["employeeId", "employee_id"])?;
        let first_name = required_str(obj, &["firstName", "first_name"])?;
        let last_name = required_str(obj, &["lastName", "last_name"])?;
        let hire_date = required_date(obj, &["hireDate", "hire_date"])?;
        let salary = match field(obj, &["salary"]) {
            Some(v) => Some(bounded(
                "salary",
                decimal_from_json(v)
                    .ok_or_else(|| ValidationError::invalid("salary", render(v), "not a decimal"))?,
            )?),
            None => None,
        };
        // The HR service stores ACTIVE when no status is sent.
        let status = match optional_str(obj, &["status"]) {
            None => StaffStatus::Active,
            Some(s) => match literal(&s).as_str() {
                "ACTIVE" => StaffStatus::Active,
                "ON_LEAVE" => StaffStatus::OnLeave,
                "TERMINATED" => StaffStatus::Terminated,
                "SUSPENDED" => StaffStatus::Suspended,
                _ => {
                    return Err(ValidationError::invalid(
                        "status",
                        s,
                        "expected ACTIVE, ON_LEAVE, TERMINATED or SUSPENDED",
                    ));
                }
            },
        };
        Ok(StaffRecord {
            employee_id,
            first_name,
            last_name,
            position: optional_str(obj, &["position"]).unwrap_or_default(),
            department: self.label(optional_str(obj, &["department"]).as_deref()),
            hire_date,
            salary,
            status,
        })
    }

    pub fn account(&self, raw: &Value) -> Result<Account, ValidationError> {
        let obj = as_object(raw)?;
        let name = required_str(obj, &["name"])?;
        let balance = bounded("balance", required_decimal(obj, &["balance"])?)?;
        let status_s = required_str(obj, &["status"])?;
        let status = match literal(&status_s).as_str() {
            "ACTIVE" => AccountStatus::Active,
            "INACTIVE" => AccountStatus::Inactive,
            "CLOSED" => AccountStatus::Closed,
            _ => {
                return Err(ValidationError::invalid(
                    "status",
                    status_s,
                    "expected ACTIVE, INACTIVE or CLOSED",
                ));
            }
        };
        Ok(Account {
            name,
            balance,
            status,
        })
    }

    /// Normalize every record set of a snapshot. Bad records are skipped and
    /// reported; this never fails as a whole. A repeated transaction id keeps
    /// its first occurrence.
    pub fn normalize(&self, snap: &Snapshot) -> (Records, Vec<Diagnostic>) {
        let mut diags = Vec::new();
        let mut seen = HashSet::new();
        let records = Records {
            transactions: collect(snap, SourceKind::Transactions, &mut diags, |v| {
                let t = self.transaction(v)?;
                if !seen.insert(t.transaction_id.clone()) {
                    return Err(ValidationError::invalid(
                        "transactionId",
                        t.transaction_id,
                        "duplicate",
                    ));
                }
                Ok(t)
            }),
            students: collect(snap, SourceKind::Students, &mut diags, |v| self.student(v)),
            staff: collect(snap, SourceKind::Staff, &mut diags, |v| self.staff(v)),
            budgets: collect(snap, SourceKind::Budgets, &mut diags, |v| {
                self.budget_item(v)
            }),
            accounts: collect(snap, SourceKind::Accounts, &mut diags, |v| self.account(v)),
        };
        (records, diags)
    }
}

fn collect<T>(
    snap: &Snapshot,
    kind: SourceKind,
    diags: &mut Vec<Diagnostic>,
    mut f: impl FnMut(&Value) -> Result<T, ValidationError>,
) -> Vec<T> {
    let mut out = Vec::new();
    for (index, raw) in snap.records(kind).iter().enumerate() {
        match f(raw) {
            Ok(rec) => out.push(rec),
            Err(error) => {
                tracing::debug!(source = %kind, index, %error, "skipping record");
                diags.push(Diagnostic {
                    source: kind,
                    index,
                    error,
                });
            }
        }
    }
    out
}

fn bounded(name: &str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value.abs() > MAX_AMOUNT {
        return Err(ValidationError::invalid(name, value.to_string(), "exceeds 10^15"));
    }
    Ok(value)
}

fn minor_units(name: &str, value: Decimal) -> Result<Decimal, ValidationError> {
    if !value.is_zero() && value.abs() < MINOR_UNIT {
        return Err(ValidationError::invalid(
            name,
            value.to_string(),
            "smaller than one minor unit",
        ));
    }
    Ok(value)
}

fn as_object(raw: &Value) -> Result<&Map<String, Value>, ValidationError> {
    raw.as_object().ok_or(ValidationError::NotAnObject)
}

/// First present, non-null key among `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null() && v.as_str().is_none_or(|s| !s.trim().is_empty()))
}

fn render(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn literal(s: &str) -> String {
    s.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

fn optional_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys).map(|v| render(v).trim().to_string())
}

fn required_str(obj: &Map<String, Value>, keys: &[&str]) -> Result<String, ValidationError> {
    optional_str(obj, keys).ok_or_else(|| ValidationError::missing(keys[0]))
}

fn required_decimal(obj: &Map<String, Value>, keys: &[&str]) -> Result<Decimal, ValidationError> {
    let v = field(obj, keys).ok_or_else(|| ValidationError::missing(keys[0]))?;
    decimal_from_json(v).ok_or_else(|| ValidationError::invalid(keys[0], render(v), "not a decimal"))
}

fn optional_date(
    obj: &Map<String, Value>,
    keys: &[&str],
) -> Result<Option<NaiveDate>, ValidationError> {
    match field(obj, keys) {
        None => Ok(None),
        Some(v) => {
            let s = render(v);
            parse_iso_date(&s)
                .map(Some)
                .ok_or_else(|| ValidationError::invalid(keys[0], s, "expected an ISO-8601 date"))
        }
    }
}

fn required_date(obj: &Map<String, Value>, keys: &[&str]) -> Result<NaiveDate, ValidationError> {
    optional_date(obj, keys)?.ok_or_else(|| ValidationError::missing(keys[0]))
}

fn optional_id(obj: &Map<String, Value>, keys: &[&str]) -> Result<Option<i64>, ValidationError> {
    match field(obj, keys) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| ValidationError::invalid(keys[0], n.to_string(), "not an integer id")),
        Some(v) => {
            let s = render(v);
            s.trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| ValidationError::invalid(keys[0], s, "not an integer id"))
        }
    }
}
