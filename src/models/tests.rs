#![allow(clippy::unwrap_used)]

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::error::Error;

// ── Transaction ───────────────────────────────────────────────

fn make_txn(amount: Decimal) -> Transaction {
    Transaction::new(
        1,
        1,
        amount,
        "Test".into(),
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
    )
}

#[test]
fn test_positive_amount_is_expense() {
    let txn = make_txn(dec!(50.00));
    assert!(txn.is_expense());
    assert!(!txn.is_income());
}

#[test]
fn test_negative_amount_is_income() {
    let txn = make_txn(dec!(-100.00));
    assert!(txn.is_income());
    assert!(!txn.is_expense());
}

#[test]
fn test_zero_is_neither() {
    let txn = make_txn(Decimal::ZERO);
    assert!(!txn.is_income());
    assert!(!txn.is_expense());
}

#[test]
fn test_abs_amount() {
    assert_eq!(make_txn(dec!(-42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(dec!(42.99)).abs_amount(), dec!(42.99));
    assert_eq!(make_txn(Decimal::ZERO).abs_amount(), Decimal::ZERO);
}

#[test]
fn test_transaction_new_defaults() {
    let txn = make_txn(dec!(5.25));
    assert!(txn.id.is_none());
    assert_eq!(txn.user_id, 1);
    assert_eq!(txn.category_id, 1);
    assert!(!txn.created_at.is_empty());
}

// ── BudgetScope ───────────────────────────────────────────────

#[test]
fn test_scope_category_id() {
    assert_eq!(BudgetScope::Overall.category_id(), None);
    assert_eq!(BudgetScope::Category(5).category_id(), Some(5));
}

#[test]
fn test_scope_from_category_id() {
    assert_eq!(BudgetScope::from_category_id(None), BudgetScope::Overall);
    assert_eq!(
        BudgetScope::from_category_id(Some(5)),
        BudgetScope::Category(5)
    );
}

#[test]
fn test_scope_roundtrip() {
    for scope in [BudgetScope::Overall, BudgetScope::Category(7)] {
        assert_eq!(BudgetScope::from_category_id(scope.category_id()), scope);
    }
}

#[test]
fn test_scope_display() {
    assert_eq!(format!("{}", BudgetScope::Overall), "overall");
    assert_eq!(format!("{}", BudgetScope::Category(5)), "category 5");
}

#[test]
fn test_scopes_are_distinct() {
    assert_ne!(BudgetScope::Overall, BudgetScope::Category(0));
    assert_ne!(BudgetScope::Category(5), BudgetScope::Category(6));
}

// ── Budget ────────────────────────────────────────────────────

#[test]
fn test_month_key_pads_to_two_digits() {
    assert_eq!(Budget::month_key(1).unwrap(), "01");
    assert_eq!(Budget::month_key(9).unwrap(), "09");
    assert_eq!(Budget::month_key(10).unwrap(), "10");
    assert_eq!(Budget::month_key(12).unwrap(), "12");
}

#[test]
fn test_month_key_rejects_out_of_range() {
    assert!(matches!(Budget::month_key(0), Err(Error::InvalidInput(_))));
    assert!(matches!(Budget::month_key(13), Err(Error::InvalidInput(_))));
}

#[test]
fn test_budget_new_defaults() {
    let budget = Budget::new(1, BudgetScope::Category(3), "04".into(), 2024, dec!(300.00));
    assert!(budget.id.is_none());
    assert_eq!(budget.scope, BudgetScope::Category(3));
    assert_eq!(budget.month, "04");
    assert_eq!(budget.year, 2024);
    assert_eq!(budget.limit_amount, dec!(300.00));
    assert!(!budget.created_at.is_empty());
}

// ── Category ──────────────────────────────────────────────────

#[test]
fn test_find_by_name_case_insensitive() {
    let cats = vec![
        Category {
            id: Some(1),
            name: "Groceries".into(),
        },
        Category {
            id: Some(2),
            name: "Rent".into(),
        },
    ];
    assert_eq!(
        Category::find_by_name(&cats, "groceries").and_then(|c| c.id),
        Some(1)
    );
    assert_eq!(
        Category::find_by_name(&cats, "RENT").and_then(|c| c.id),
        Some(2)
    );
    assert!(Category::find_by_name(&cats, "Travel").is_none());
}

#[test]
fn test_category_display() {
    let cat = Category::new("Dining".into());
    assert_eq!(format!("{cat}"), "Dining");
}

// ── User ──────────────────────────────────────────────────────

#[test]
fn test_user_new_defaults() {
    let user = User::new("ada".into(), "ada@example.com".into());
    assert!(user.id.is_none());
    assert_eq!(user.username, "ada");
    assert_eq!(user.email, "ada@example.com");
    assert!(!user.created_at.is_empty());
}
