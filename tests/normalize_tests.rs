// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use edupulse::errors::ValidationError;
use edupulse::models::{BudgetStatus, StaffStatus, StudentStatus, TxStatus, TxType};
use edupulse::normalize::{CategoryRule, Normalizer, UNCATEGORIZED};
use edupulse::sources::{Snapshot, SourceKind};
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

#[test]
fn transaction_accepts_camel_and_snake_keys() {
    let n = Normalizer::default();
    let camel = n
        .transaction(&json!({
            "transactionId": "T-1", "type": "income", "amount": "1250.75",
            "category": " Tuition ", "subCategory": "Term 1", "date": "2025-06-02T09:30:00",
            "status": "Completed", "studentId": 42, "description": "Fees"
        }))
        .unwrap();
    assert_eq!(camel.r#type, TxType::Income);
    assert_eq!(camel.status, TxStatus::Completed);
    assert_eq!(camel.amount, dec("1250.75"));
    assert_eq!(camel.category, "Tuition");
    assert_eq!(camel.date, NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
    assert_eq!(camel.student_id, Some(42));

    let snake = n
        .transaction(&json!({
            "transaction_id": "T-2", "type": "EXPENSE", "amount": -500,
            "date": "2025-06-10", "status": "cancelled", "staff_id": "7"
        }))
        .unwrap();
    assert_eq!(snake.amount, dec("500"));
    assert_eq!(snake.status, TxStatus::Cancelled);
    assert_eq!(snake.category, UNCATEGORIZED);
    assert_eq!(snake.staff_id, Some(7));
}

#[test]
fn bad_transactions_name_the_field() {
    let n = Normalizer::default();
    let base = json!({"transactionId": "T", "type": "INCOME", "amount": 1, "date": "2025-01-01", "status": "PENDING"});

    let mut missing = base.clone();
    missing.as_object_mut().unwrap().remove("amount");
    assert_eq!(n.transaction(&missing).unwrap_err(), ValidationError::missing("amount"));

    let mut bad_date = base.clone();
    bad_date["date"] = json!("01/02/2025");
    assert_eq!(n.transaction(&bad_date).unwrap_err().field(), Some("date"));

    let mut bad_amount = base.clone();
    bad_amount["amount"] = json!("lots");
    assert_eq!(n.transaction(&bad_amount).unwrap_err().field(), Some("amount"));

    let mut bad_status = base.clone();
    bad_status["status"] = json!("REFUNDED");
    assert!(matches!(
        n.transaction(&bad_status).unwrap_err(),
        ValidationError::InvalidField { ref field, .. } if field == "status"
    ));

    let mut bad_type = base;
    bad_type["type"] = json!("TRANSFER");
    assert_eq!(n.transaction(&bad_type).unwrap_err().field(), Some("type"));

    assert_eq!(n.transaction(&json!([1, 2])).unwrap_err(), ValidationError::NotAnObject);
}

#[test]
fn category_rules_rewrite_only_categories() {
    let rules = vec![
        CategoryRule::new("(?i)salar|payroll", "Salaries").unwrap(),
        CategoryRule::new("(?i)^util", "Utilities").unwrap(),
    ];
    let n = Normalizer::new("Other", rules);
    assert_eq!(n.categorize(Some("Payroll June")), "Salaries");
    assert_eq!(n.categorize(Some("utilities - power")), "Utilities");
    assert_eq!(n.categorize(Some("Books")), "Books");
    assert_eq!(n.categorize(Some("   ")), "Other");
    assert_eq!(n.categorize(None), "Other");

    let student = n
        .student(&json!({"studentId": "S", "firstName": "A", "lastName": "B", "status": "ACTIVE", "program": "Payroll Studies"}))
        .unwrap();
    assert_eq!(student.program, "Payroll Studies");

    assert!(CategoryRule::new("(unclosed", "X").is_err());
}

#[test]
fn budget_items_default_status_and_reject_negatives() {
    let n = Normalizer::default();
    let b = n
        .budget_item(&json!({"category": "Books", "department": "", "amount": "1000", "spent": 250}))
        .unwrap();
    assert_eq!(b.allocated, dec("1000"));
    assert_eq!(b.spent, dec("250"));
    assert_eq!(b.status, BudgetStatus::Active);
    assert_eq!(b.department, UNCATEGORIZED);

    let zero = n.budget_item(&json!({"category": "New", "allocated": 0})).unwrap();
    assert_eq!(zero.spent, Decimal::ZERO);
    assert!(!zero.utilization().valid);

    let neg = n.budget_item(&json!({"category": "X", "allocated": -5}));
    assert_eq!(neg.unwrap_err().field(), Some("allocated"));
    let neg_spent = n.budget_item(&json!({"category": "X", "allocated": 5, "spent": "-1"}));
    assert_eq!(neg_spent.unwrap_err().field(), Some("spent"));
}

#[test]
fn students_staff_and_accounts() {
    let n = Normalizer::default();
    let s = n
        .student(&json!({"student_id": "S1", "first_name": "Ada", "last_name": "L", "status": "graduated", "enrollment_date": "2021-09-01"}))
        .unwrap();
    assert_eq!(s.status, StudentStatus::Graduated);
    assert_eq!(s.program, UNCATEGORIZED);
    assert!(s.enrollment_date.is_some());

    let staff = n
        .staff(&json!({"employeeId": "E1", "firstName": "G", "lastName": "H", "hireDate": "2024-02-01", "department": "IT", "salary": "72000.50"}))
        .unwrap();
    assert_eq!(staff.status, StaffStatus::Active);
    assert_eq!(staff.salary, Some(dec("72000.50")));

    let on_leave = n
        .staff(&json!({"employeeId": "E2", "firstName": "G", "lastName": "H", "hireDate": "2024-02-01", "status": "on-leave"}))
        .unwrap();
    assert_eq!(on_leave.status, StaffStatus::OnLeave);

    let no_hire = n.staff(&json!({"employeeId": "E3", "firstName": "G", "lastName": "H"}));
    assert_eq!(no_hire.unwrap_err(), ValidationError::missing("hireDate"));

    assert!(n.account(&json!({"name": "Main", "balance": 10, "status": "ACTIVE"})).is_ok());
    assert!(n.account(&json!({"name": "Main", "balance": 10, "status": "FROZEN"})).is_err());
}

#[test]
fn normalize_skips_bad_records_with_diagnostics() {
    let mut snap = Snapshot::default();
    snap.set(
        SourceKind::Transactions,
        vec![
            json!({"transactionId": "1", "type": "INCOME", "amount": 10, "date": "2025-06-01", "status": "COMPLETED"}),
            json!({"transactionId": "2", "type": "INCOME", "date": "2025-06-01", "status": "COMPLETED"}),
            json!({"transactionId": "3", "type": "EXPENSE", "amount": 5, "date": "2025-06-02", "status": "COMPLETED"}),
        ],
    );
    snap.set(SourceKind::Students, vec![json!("not a record")]);

    let (records, diags) = Normalizer::default().normalize(&snap);
    assert_eq!(records.transactions.len(), 2);
    assert_eq!(records.transactions[1].transaction_id, "3");
    assert!(records.students.is_empty());
    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0].source, SourceKind::Transactions);
    assert_eq!(diags[0].index, 1);
    assert_eq!(diags[0].error.field(), Some("amount"));
    assert_eq!(diags[1].source, SourceKind::Students);
    assert_eq!(diags[1].to_string(), "students[0]: record is not an object");
}

#[test]
fn money_outside_the_supported_range_is_rejected() {
    let n = Normalizer::default();
    let huge = n.transaction(&json!({
        "transactionId": "T", "type": "INCOME", "amount": "50000000000000000000000000000",
        "date": "2025-06-01", "status": "COMPLETED"
    }));
    assert_eq!(huge.unwrap_err().field(), Some("amount"));

    let sub_cent = n.transaction(&json!({
        "transactionId": "T", "type": "INCOME", "amount": "0.001",
        "date": "2025-06-01", "status": "COMPLETED"
    }));
    assert_eq!(sub_cent.unwrap_err().field(), Some("amount"));

    let tiny_allocation =
        n.budget_item(&json!({"category": "X", "allocated": "0.0000000000000000000000000001", "spent": "1"}));
    assert_eq!(tiny_allocation.unwrap_err().field(), Some("allocated"));

    let huge_spent = n.budget_item(&json!({"category": "X", "allocated": 10, "spent": "1000000000000001"}));
    assert_eq!(huge_spent.unwrap_err().field(), Some("spent"));

    let at_ceiling = n
        .budget_item(&json!({"category": "X", "allocated": "0.01", "spent": "1000000000000000"}))
        .unwrap();
    assert_eq!(at_ceiling.spent, dec("1000000000000000"));

    let balance = n.account(&json!({"name": "Main", "balance": "-2000000000000000", "status": "ACTIVE"}));
    assert_eq!(balance.unwrap_err().field(), Some("balance"));
}

#[test]
fn repeated_transaction_ids_keep_the_first() {
    let row = json!({"transactionId": "T1", "type": "INCOME", "amount": 3000, "date": "2025-06-01", "status": "COMPLETED"});
    let mut snap = Snapshot::default();
    snap.set(SourceKind::Transactions, vec![row.clone(), row]);

    let (records, diags) = Normalizer::default().normalize(&snap);
    assert_eq!(records.transactions.len(), 1);
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].index, 1);
    assert_eq!(
        diags[0].error,
        ValidationError::invalid("transactionId", "T1", "duplicate")
    );
}
