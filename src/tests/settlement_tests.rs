use crate::constants::EPSILON;
use crate::core::aggregator::compute_totals;
use crate::core::settlement::{compute_settlement, net_positions};
use crate::models::{MemberBalance, User};
use crate::tests::{test_expense, test_user};

fn totals(entries: &[(&str, f64)]) -> Vec<MemberBalance> {
    entries
        .iter()
        .map(|(id, spent)| MemberBalance {
            user_id: id.to_string(),
            total_spent: *spent,
        })
        .collect()
}

fn roster(ids: &[&str]) -> Vec<User> {
    ids.iter().map(|id| test_user(id, id)).collect()
}

#[test]
fn one_payer_two_debtors() {
    // A pays 300, B and C pay nothing; fair share is 100 each.
    let users = vec![
        test_user("1", "A"),
        test_user("2", "B"),
        test_user("3", "C"),
    ];
    let expenses = vec![test_expense("e1", "1", 300.0)];
    let totals = compute_totals(&users, &expenses);

    let transactions = compute_settlement(&users, &totals);
    assert_eq!(transactions.len(), 2);
    assert!(transactions.iter().all(|t| t.to == "1" && t.amount == 100.0));
    let debtors: Vec<&str> = transactions.iter().map(|t| t.from.as_str()).collect();
    assert_eq!(debtors, vec!["2", "3"]);
}

#[test]
fn two_members_one_transfer() {
    // A pays 50, B pays 150; A owes B exactly 50.
    let users = roster(&["A", "B"]);
    let totals = totals(&[("A", 50.0), ("B", 150.0)]);

    let transactions = compute_settlement(&users, &totals);
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].from, "A");
    assert_eq!(transactions[0].to, "B");
    assert_eq!(transactions[0].amount, 50.0);
}

#[test]
fn even_spending_settles_to_nothing() {
    let users = roster(&["A", "B", "C"]);
    let totals = totals(&[("A", 100.0), ("B", 100.0), ("C", 100.0)]);

    assert!(compute_settlement(&users, &totals).is_empty());
}

#[test]
fn single_member_never_produces_transfers() {
    let users = roster(&["A"]);
    let totals = totals(&[("A", 500.0)]);
    assert!(compute_settlement(&users, &totals).is_empty());

    assert!(compute_settlement(&[], &[]).is_empty());
}

#[test]
fn net_positions_sum_to_zero() {
    let users = roster(&["A", "B", "C", "D"]);
    let totals = totals(&[("A", 120.37), ("B", 0.0), ("C", 75.5), ("D", 33.13)]);

    let nets = net_positions(&users, &totals);
    let sum: f64 = nets.iter().map(|p| p.net).sum();
    assert!(sum.abs() < EPSILON, "net sum {} exceeds tolerance", sum);
}

#[test]
fn transfers_reconstruct_each_net_within_tolerance() {
    let users = roster(&["A", "B", "C", "D", "E"]);
    let totals = totals(&[
        ("A", 200.0),
        ("B", 10.5),
        ("C", 0.0),
        ("D", 89.5),
        ("E", 50.0),
    ]);

    let nets = net_positions(&users, &totals);
    let transactions = compute_settlement(&users, &totals);

    for position in &nets {
        let received: f64 = transactions
            .iter()
            .filter(|t| t.to == position.user_id)
            .map(|t| t.amount)
            .sum();
        let paid: f64 = transactions
            .iter()
            .filter(|t| t.from == position.user_id)
            .map(|t| t.amount)
            .sum();
        assert!(
            (position.net - (received - paid)).abs() <= EPSILON,
            "member {} net {} not reconstructed (received {}, paid {})",
            position.user_id,
            position.net,
            received,
            paid
        );
    }
}

#[test]
fn transaction_count_is_bounded_by_member_count() {
    let users = roster(&["A", "B", "C", "D", "E", "F"]);
    let totals = totals(&[
        ("A", 600.0),
        ("B", 0.0),
        ("C", 0.0),
        ("D", 0.0),
        ("E", 0.0),
        ("F", 0.0),
    ]);

    let transactions = compute_settlement(&users, &totals);
    assert!(transactions.len() <= users.len() - 1);
    assert!(transactions.iter().all(|t| t.amount > EPSILON));
}

#[test]
fn imbalance_below_epsilon_is_rounding_noise() {
    // Nets of +/-0.009: under the tolerance, fully settled already.
    let users = roster(&["A", "B"]);
    let quiet = totals(&[("A", 10.009), ("B", 9.991)]);
    assert!(compute_settlement(&users, &quiet).is_empty());

    // Nets of +/-0.011: just over the tolerance, one transfer of one cent.
    let loud = totals(&[("A", 10.011), ("B", 9.989)]);
    let transactions = compute_settlement(&users, &loud);
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].from, "B");
    assert_eq!(transactions[0].to, "A");
    assert_eq!(transactions[0].amount, 0.01);
}

#[test]
fn equal_balances_tie_break_on_member_id() {
    let users = roster(&["z", "m", "a", "p"]);
    let totals = totals(&[("z", 0.0), ("m", 200.0), ("a", 0.0), ("p", 200.0)]);

    let transactions = compute_settlement(&users, &totals);
    // Debtors a, z each owe 100; creditors m, p are each owed 100.
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0].from, "a");
    assert_eq!(transactions[0].to, "m");
    assert_eq!(transactions[1].from, "z");
    assert_eq!(transactions[1].to, "p");
}

#[test]
fn settlement_is_deterministic() {
    let users = roster(&["A", "B", "C", "D"]);
    let totals = totals(&[("A", 97.31), ("B", 12.04), ("C", 55.0), ("D", 203.65)]);

    let first = compute_settlement(&users, &totals);
    let second = compute_settlement(&users, &totals);
    assert_eq!(first, second);
}

#[test]
fn members_missing_from_totals_count_as_zero_spenders() {
    let users = roster(&["A", "B"]);
    let totals = totals(&[("A", 100.0)]);

    let transactions = compute_settlement(&users, &totals);
    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].from, "B");
    assert_eq!(transactions[0].to, "A");
    assert_eq!(transactions[0].amount, 50.0);
}
