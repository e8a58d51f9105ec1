// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use edupulse::alerts::{budget_alerts, classify, AlertLevel, AlertSummary, AlertThresholds};
use edupulse::models::{BudgetItem, BudgetStatus};
use rust_decimal::Decimal;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(category: &str, allocated: &str, spent: &str) -> BudgetItem {
    BudgetItem {
        category: category.into(),
        department: "Operations".into(),
        allocated: dec(allocated),
        spent: dec(spent),
        status: BudgetStatus::Active,
    }
}

#[test]
fn band_edges_are_inclusive() {
    assert_eq!(classify(dec("0")), AlertLevel::OnTrack);
    assert_eq!(classify(dec("74.999")), AlertLevel::OnTrack);
    assert_eq!(classify(dec("75")), AlertLevel::NearLimit);
    assert_eq!(classify(dec("89.99")), AlertLevel::NearLimit);
    assert_eq!(classify(dec("90")), AlertLevel::OverBudget);
    assert_eq!(classify(dec("140")), AlertLevel::OverBudget);
}

#[test]
fn ninety_five_percent_is_over_budget() {
    let alerts = budget_alerts(
        &[item("Salaries", "50000", "47500"), item("Events", "50000", "0")],
        &AlertThresholds::default(),
    );
    assert_eq!(alerts[0].utilization.percentage, dec("95"));
    assert_eq!(alerts[0].level, AlertLevel::OverBudget);
    assert_eq!(alerts[0].remaining, dec("2500"));
    assert_eq!(alerts[1].utilization.percentage, dec("0"));
    assert_eq!(alerts[1].level, AlertLevel::OnTrack);
}

#[test]
fn overspent_items_stay_over_budget_and_zero_allocation_is_on_track() {
    let alerts = budget_alerts(
        &[item("Lab", "1000", "1500"), item("New", "0", "0")],
        &AlertThresholds::default(),
    );
    assert_eq!(alerts[0].utilization.display, dec("100"));
    assert_eq!(alerts[0].level, AlertLevel::OverBudget);
    assert!(!alerts[1].utilization.valid);
    assert_eq!(alerts[1].level, AlertLevel::OnTrack);
}

#[test]
fn cancelled_items_are_not_alerted() {
    let mut cancelled = item("Trips", "100", "99");
    cancelled.status = BudgetStatus::Cancelled;
    let alerts = budget_alerts(
        &[item("Books", "100", "80"), cancelled, item("Food", "100", "10")],
        &AlertThresholds::default(),
    );
    let cats: Vec<&str> = alerts.iter().map(|a| a.category.as_str()).collect();
    assert_eq!(cats, ["Books", "Food"]);

    let summary = AlertSummary::from_entries(&alerts);
    assert_eq!(summary.near_limit, 1);
    assert_eq!(summary.on_track, 1);
    assert_eq!(summary.over_budget, 0);
    assert_eq!(summary.total_allocated, dec("200"));
    assert_eq!(summary.total_spent, dec("90"));
}

#[test]
fn custom_thresholds_are_validated() {
    let custom = AlertThresholds {
        near_limit: dec("50"),
        over_budget: dec("80"),
    }
    .validate()
    .unwrap();
    assert_eq!(custom.classify(dec("60")), AlertLevel::NearLimit);
    assert_eq!(custom.classify(dec("80")), AlertLevel::OverBudget);

    let inverted = AlertThresholds {
        near_limit: dec("90"),
        over_budget: dec("75"),
    };
    assert!(inverted.validate().is_err());
    let negative = AlertThresholds {
        near_limit: dec("-1"),
        over_budget: dec("75"),
    };
    assert!(negative.validate().is_err());
}

#[test]
fn levels_serialize_kebab_case() {
    assert_eq!(AlertLevel::NearLimit.to_string(), "near-limit");
    assert_eq!(
        serde_json::to_string(&AlertLevel::OverBudget).unwrap(),
        "\"over-budget\""
    );
}
