use crate::core::aggregator::{
    compute_totals, fair_share, normalize_ref, resolve_payer, total_expenses,
    total_group_spending,
};
use crate::core::monthly;
use crate::models::MemberBalance;
use crate::tests::{test_expense, test_user};
use chrono::{TimeZone, Utc};

#[test]
fn totals_follow_roster_order_and_default_to_zero() {
    let users = vec![test_user("1", "Alice"), test_user("2", "Bob")];
    let expenses = vec![test_expense("e1", "2", 40.0)];

    let totals = compute_totals(&users, &expenses);
    assert_eq!(
        totals,
        vec![
            MemberBalance {
                user_id: "1".to_string(),
                total_spent: 0.0
            },
            MemberBalance {
                user_id: "2".to_string(),
                total_spent: 40.0
            },
        ]
    );
}

#[test]
fn totals_are_idempotent() {
    let users = vec![test_user("1", "Alice"), test_user("2", "Bob")];
    let expenses = vec![
        test_expense("e1", "1", 10.1),
        test_expense("e2", "2", 20.25),
        test_expense("e3", "1", 0.05),
    ];

    let first = compute_totals(&users, &expenses);
    let second = compute_totals(&users, &expenses);
    assert_eq!(first, second);
}

#[test]
fn numeric_and_string_payer_refs_compare_equal() {
    let users = vec![test_user("7", "Alice")];
    let expenses = vec![
        test_expense("e1", " 7 ", 10.0),
        test_expense("e2", "07", 5.0),
        test_expense("e3", "7", 2.5),
    ];

    let totals = compute_totals(&users, &expenses);
    assert_eq!(totals[0].total_spent, 17.5);
}

#[test]
fn name_and_username_are_fallback_match_keys() {
    let mut user = test_user("u1", "Alice");
    user.username = Some("ally".to_string());
    let users = vec![user];
    let expenses = vec![
        test_expense("e1", "Alice", 10.0),
        test_expense("e2", "ally", 5.0),
    ];

    let totals = compute_totals(&users, &expenses);
    assert_eq!(totals[0].total_spent, 15.0);
}

#[test]
fn identifier_match_wins_over_name_match() {
    // One member's id collides with another member's display name; the id
    // match must take precedence.
    let by_name = test_user("u1", "Bob");
    let by_id = test_user("Bob", "Robert");
    let users = vec![by_name, by_id];

    let resolved = resolve_payer(&users, "Bob").unwrap();
    assert_eq!(resolved.id, "Bob");
}

#[test]
fn unmatched_expenses_are_excluded_from_member_totals() {
    let users = vec![test_user("1", "Alice")];
    let expenses = vec![
        test_expense("e1", "1", 100.0),
        test_expense("e2", "nobody", 50.0),
    ];

    let totals = compute_totals(&users, &expenses);
    assert_eq!(totals[0].total_spent, 100.0);
    // but the group-wide figure still counts the orphan
    assert_eq!(total_expenses(&expenses), 150.0);
}

#[test]
fn non_finite_amounts_are_treated_as_zero() {
    let users = vec![test_user("1", "Alice")];
    let expenses = vec![
        test_expense("e1", "1", f64::NAN),
        test_expense("e2", "1", f64::INFINITY),
        test_expense("e3", "1", 25.0),
    ];

    let totals = compute_totals(&users, &expenses);
    assert_eq!(totals[0].total_spent, 25.0);
    assert_eq!(total_expenses(&expenses), 25.0);
}

#[test]
fn totals_round_at_the_cent_boundary() {
    let users = vec![test_user("1", "Alice")];
    let expenses: Vec<_> = (0..3).map(|i| test_expense(&format!("e{}", i), "1", 0.1)).collect();

    let totals = compute_totals(&users, &expenses);
    assert_eq!(totals[0].total_spent, 0.3);
}

#[test]
fn fair_share_is_zero_for_degenerate_groups() {
    assert_eq!(fair_share(500.0, 0), 0.0);
    assert_eq!(fair_share(500.0, 1), 0.0);
    assert_eq!(fair_share(300.0, 3), 100.0);
}

#[test]
fn normalize_ref_collapses_integer_forms() {
    assert_eq!(normalize_ref(" 12 "), "12");
    assert_eq!(normalize_ref("012"), "12");
    assert_eq!(normalize_ref("alice"), "alice");
    assert_eq!(normalize_ref(" alice "), "alice");
}

#[test]
fn total_group_spending_sums_member_totals() {
    let totals = vec![
        MemberBalance {
            user_id: "1".to_string(),
            total_spent: 10.5,
        },
        MemberBalance {
            user_id: "2".to_string(),
            total_spent: 4.5,
        },
    ];
    assert_eq!(total_group_spending(&totals), 15.0);
}

#[test]
fn monthly_bucket_filters_by_calendar_month() {
    let users = vec![test_user("1", "Alice")];
    let mut july = test_expense("e1", "1", 30.0);
    july.payment_date = Utc.with_ymd_and_hms(2026, 7, 2, 0, 0, 0).unwrap();
    let august = test_expense("e2", "1", 50.0);

    let expenses = vec![july, august];
    let totals = monthly::monthly_totals(&users, &expenses, 2026, 8);
    assert_eq!(totals[0].total_spent, 50.0);
    let totals = monthly::monthly_totals(&users, &expenses, 2026, 7);
    assert_eq!(totals[0].total_spent, 30.0);
    let totals = monthly::monthly_totals(&users, &expenses, 2026, 6);
    assert_eq!(totals[0].total_spent, 0.0);
}
