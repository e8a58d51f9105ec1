// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxType {
    Income,
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub r#type: TxType,
    pub amount: Decimal, // non-negative
    pub category: String,
    pub sub_category: Option<String>,
    pub date: NaiveDate,
    pub status: TxStatus,
    pub description: Option<String>,
    pub student_id: Option<i64>,
    pub staff_id: Option<i64>,
    pub account_id: Option<i64>,
}

impl Transaction {
    pub fn is_completed(&self) -> bool {
        self.status == TxStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub category: String,
    pub department: String,
    pub allocated: Decimal,
    pub spent: Decimal,
    pub status: BudgetStatus,
}

impl BudgetItem {
    /// May be negative when the item is overspent.
    pub fn remaining(&self) -> Decimal {
        self.allocated.saturating_sub(self.spent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Inactive,
    Suspended,
    Graduated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub program: String,
    pub status: StudentStatus,
    pub enrollment_date: Option<NaiveDate>,
}

impl StudentRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaffStatus {
    Active,
    OnLeave,
    Terminated,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub department: String,
    pub hire_date: NaiveDate,
    pub salary: Option<Decimal>,
    pub status: StaffStatus,
}

impl StaffRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == StaffStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub balance: Decimal,
    pub status: AccountStatus,
}

/// All canonical records of one snapshot, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Records {
    pub transactions: Vec<Transaction>,
    pub students: Vec<StudentRecord>,
    pub staff: Vec<StaffRecord>,
    pub budgets: Vec<BudgetItem>,
    pub accounts: Vec<Account>,
}
