// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use edupulse::models::{
    BudgetItem, BudgetStatus, StaffRecord, StaffStatus, StudentRecord, StudentStatus, Transaction,
    TxStatus, TxType,
};
use edupulse::normalize::Normalizer;
use edupulse::rollup::{
    category_breakdown, department_headcount, department_utilization, expense_breakdown,
    monthly_series, program_distribution,
};
use rust_decimal::Decimal;
use serde_json::json;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

fn tx(id: &str, kind: TxType, amount: i64, category: &str, date: NaiveDate) -> Transaction {
    Transaction {
        transaction_id: id.into(),
        r#type: kind,
        amount: dec(amount),
        category: category.into(),
        sub_category: None,
        date,
        status: TxStatus::Completed,
        description: None,
        student_id: None,
        staff_id: None,
        account_id: None,
    }
}

#[test]
fn current_month_sums_and_out_of_window_is_dropped() {
    let n = Normalizer::default();
    let raw = [
        json!({"transactionId": "1", "type": "INCOME", "amount": 3000, "date": "2025-06-02", "status": "COMPLETED", "category": "Tuition"}),
        json!({"transactionId": "2", "type": "INCOME", "amount": 2000, "date": "2025-06-09", "status": "COMPLETED", "category": "Tuition"}),
        json!({"transactionId": "3", "type": "EXPENSE", "amount": -500, "date": "2025-06-10", "status": "COMPLETED", "category": "Supplies"}),
        json!({"transactionId": "4", "type": "INCOME", "amount": 9999, "date": "2024-11-20", "status": "COMPLETED", "category": "Tuition"}),
    ];
    let txs: Vec<Transaction> = raw.iter().map(|v| n.transaction(v).unwrap()).collect();

    let buckets = monthly_series(6, d(2025, 6, 15), &txs);
    assert_eq!(buckets.len(), 6);
    let current = buckets.last().unwrap();
    assert_eq!(current.key(), "2025-06");
    assert_eq!(current.revenue, dec(5000));
    assert_eq!(current.expenses, dec(500));
    assert!(buckets.iter().all(|b| b.revenue != dec(9999)));
    let in_window: Decimal = buckets.iter().map(|b| b.revenue).sum();
    assert_eq!(in_window, dec(5000));
}

#[test]
fn bucket_sums_equal_in_window_record_sums() {
    let reference = d(2025, 3, 20);
    let mut txs = Vec::new();
    for (i, (y, m)) in [(2024, 9), (2024, 10), (2024, 12), (2025, 1), (2025, 3), (2023, 3)]
        .into_iter()
        .enumerate()
    {
        txs.push(tx(&format!("i{}", i), TxType::Income, 100 * (i as i64 + 1), "Fees", d(y, m, 5)));
        txs.push(tx(&format!("e{}", i), TxType::Expense, 10 * (i as i64 + 1), "Ops", d(y, m, 6)));
    }
    let mut pending = tx("p", TxType::Income, 7777, "Fees", d(2025, 3, 1));
    pending.status = TxStatus::Pending;
    txs.push(pending);

    let buckets = monthly_series(6, reference, &txs);
    let first = buckets[0].first_day().unwrap();
    let expected_rev: Decimal = txs
        .iter()
        .filter(|t| t.is_completed() && t.r#type == TxType::Income && t.date >= first)
        .map(|t| t.amount)
        .sum();
    let expected_exp: Decimal = txs
        .iter()
        .filter(|t| t.is_completed() && t.r#type == TxType::Expense && t.date >= first)
        .map(|t| t.amount)
        .sum();
    assert_eq!(buckets.iter().map(|b| b.revenue).sum::<Decimal>(), expected_rev);
    assert_eq!(buckets.iter().map(|b| b.expenses).sum::<Decimal>(), expected_exp);
    // 2024-09 and 2023-03 are outside Oct..Mar.
    assert_eq!(expected_rev, dec(200 + 300 + 400 + 500));
}

#[test]
fn breakdown_keeps_first_occurrence_order() {
    let day = d(2025, 5, 1);
    let txs = vec![
        tx("1", TxType::Expense, 100, "Utilities", day),
        tx("2", TxType::Expense, 900, "Salaries", day),
        tx("3", TxType::Income, 5000, "Tuition", day),
        tx("4", TxType::Expense, 50, "Utilities", day),
        tx("5", TxType::Expense, 900, "Maintenance", day),
    ];
    let dist = expense_breakdown(&txs);
    assert_eq!(dist.keys(), ["Utilities", "Salaries", "Maintenance"]);
    assert_eq!(dist.get("Utilities").unwrap().count, 2);
    assert_eq!(dist.get("Utilities").unwrap().total, dec(150));
    assert_eq!(dist.total(), dec(1950));

    let shares: Decimal = dist.entries.iter().map(|e| e.share).sum();
    assert!((shares - dec(100)).abs() < Decimal::new(1, 6));

    // Equal totals keep first-occurrence order when re-sorted.
    let top = dist.top(2);
    assert_eq!(top.keys(), ["Salaries", "Maintenance"]);
    assert_eq!(dist.sorted_by_total().keys(), ["Salaries", "Maintenance", "Utilities"]);

    let income = category_breakdown(&txs, TxType::Income);
    assert_eq!(income.keys(), ["Tuition"]);
    assert_eq!(income.get("Tuition").unwrap().share, dec(100));
}

#[test]
fn empty_inputs_give_empty_distributions() {
    assert!(expense_breakdown(&[]).is_empty());
    assert!(program_distribution(&[]).is_empty());
    assert!(department_utilization(&[]).is_empty());
}

#[test]
fn programs_and_departments_are_counted() {
    let student = |id: &str, program: &str| StudentRecord {
        student_id: id.into(),
        first_name: "A".into(),
        last_name: "B".into(),
        program: program.into(),
        status: StudentStatus::Active,
        enrollment_date: None,
    };
    let programs = program_distribution(&[
        student("1", "Science"),
        student("2", "Arts"),
        student("3", "Science"),
        student("4", "(uncategorized)"),
    ]);
    assert_eq!(programs.keys(), ["Science", "Arts", "(uncategorized)"]);
    assert_eq!(programs.get("Science").unwrap().count, 2);
    assert_eq!(programs.get("Science").unwrap().share, dec(50));

    let staff = |id: &str, dept: &str, salary: i64| StaffRecord {
        employee_id: id.into(),
        first_name: "C".into(),
        last_name: "D".into(),
        position: String::new(),
        department: dept.into(),
        hire_date: d(2020, 1, 1),
        salary: Some(dec(salary)),
        status: StaffStatus::Active,
    };
    let depts = department_headcount(&[
        staff("1", "Math", 50_000),
        staff("2", "Math", 60_000),
        staff("3", "Admin", 40_000),
    ]);
    assert_eq!(depts.keys(), ["Math", "Admin"]);
    assert_eq!(depts.get("Math").unwrap().count, 2);
    assert_eq!(depts.get("Math").unwrap().total, dec(110_000));
}

#[test]
fn department_utilization_groups_and_skips_cancelled() {
    let item = |cat: &str, dept: &str, allocated: i64, spent: i64, status: BudgetStatus| BudgetItem {
        category: cat.into(),
        department: dept.into(),
        allocated: dec(allocated),
        spent: dec(spent),
        status,
    };
    let rows = department_utilization(&[
        item("Books", "Library", 1000, 500, BudgetStatus::Active),
        item("Lab", "Science", 2000, 2500, BudgetStatus::Active),
        item("Periodicals", "Library", 1000, 300, BudgetStatus::Completed),
        item("Trips", "Science", 9000, 0, BudgetStatus::Cancelled),
    ]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].department, "Library");
    assert_eq!(rows[0].items, 2);
    assert_eq!(rows[0].allocated, dec(2000));
    assert_eq!(rows[0].remaining, dec(1200));
    assert_eq!(rows[0].utilization.percentage, dec(40));
    assert_eq!(rows[1].utilization.percentage, dec(125));
    assert_eq!(rows[1].utilization.display, dec(100));
    assert!(rows[1].utilization.over_budget);
}
