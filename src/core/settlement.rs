//! Settlement engine: greedy largest-debtor-to-largest-creditor matching.
//!
//! The algorithm is the well-known "minimize number of transactions"
//! heuristic. It is not provably minimal on adversarial inputs, but it is
//! deterministic and matches what members already see, which is the actual
//! contract here.

use crate::constants::EPSILON;
use crate::core::{aggregator, amount};
use crate::models::{MemberBalance, NetPosition, SettlementTransaction, User};

/// Net position per member: total spent minus fair share. Positive means
/// the member is owed money.
pub fn net_positions(participants: &[User], totals: &[MemberBalance]) -> Vec<NetPosition> {
    let share = aggregator::fair_share(
        aggregator::total_group_spending(totals),
        participants.len(),
    );
    participants
        .iter()
        .map(|user| {
            let spent = totals
                .iter()
                .find(|b| b.user_id == user.id)
                .map(|b| amount::sanitize(b.total_spent))
                .unwrap_or(0.0);
            NetPosition {
                user_id: user.id.clone(),
                net: spent - share,
            }
        })
        .collect()
}

/// Compute the suggested transfers that settle every member's net balance
/// to zero, up to the `EPSILON` rounding tolerance.
///
/// Creditors are walked in descending order of what they are owed, debtors
/// in descending order of what they owe; ties break on member id so the
/// output is stable across runs. Residual imbalances within `EPSILON` are
/// rounding noise and produce no transaction.
pub fn compute_settlement(
    participants: &[User],
    totals: &[MemberBalance],
) -> Vec<SettlementTransaction> {
    if participants.len() <= 1 {
        return Vec::new();
    }

    let positions = net_positions(participants, totals);

    let mut creditors: Vec<(String, f64)> = positions
        .iter()
        .filter(|p| p.net > EPSILON)
        .map(|p| (p.user_id.clone(), p.net))
        .collect();
    let mut debtors: Vec<(String, f64)> = positions
        .iter()
        .filter(|p| p.net < -EPSILON)
        .map(|p| (p.user_id.clone(), p.net))
        .collect();

    creditors.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    debtors.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let mut transactions = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < debtors.len() && j < creditors.len() {
        let owed = -debtors[i].1;
        let receivable = creditors[j].1;
        let transfer = owed.min(receivable);

        if transfer > EPSILON {
            transactions.push(SettlementTransaction {
                from: debtors[i].0.clone(),
                to: creditors[j].0.clone(),
                amount: amount::round2(transfer),
            });
        }

        debtors[i].1 += transfer;
        creditors[j].1 -= transfer;

        if -debtors[i].1 <= EPSILON {
            i += 1;
        }
        if creditors[j].1 <= EPSILON {
            j += 1;
        }
    }

    transactions
}
