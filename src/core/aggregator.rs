//! Balance aggregator: converts a roster + expense list into per-member
//! spending totals and the group's fair share.

use crate::core::amount;
use crate::models::{ExpenseRecord, MemberBalance, User};
use std::collections::HashMap;
use tracing::warn;

/// Canonical string form of a payer reference or member identifier.
/// Integer-valued references collapse to a single representation, so a
/// numeric id and its string form ("7" vs 7 vs " 7 ") compare equal.
pub fn normalize_ref(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return n.to_string();
    }
    trimmed.to_string()
}

/// Resolve an expense's payer reference to at most one roster member.
///
/// Precedence is fixed: identifier, then display name, then username.
/// A reference that happens to equal one member's name and another's id
/// always resolves to the id match.
pub fn resolve_payer<'a>(participants: &'a [User], payer_ref: &str) -> Option<&'a User> {
    let reference = normalize_ref(payer_ref);
    participants
        .iter()
        .find(|u| normalize_ref(&u.id) == reference)
        .or_else(|| {
            participants
                .iter()
                .find(|u| normalize_ref(&u.name) == reference)
        })
        .or_else(|| {
            participants.iter().find(|u| {
                u.username
                    .as_deref()
                    .is_some_and(|name| normalize_ref(name) == reference)
            })
        })
}

/// Total spent per roster member, rounded to 2 decimals.
///
/// Output order follows roster order, so identical inputs always produce
/// identical output. Expenses whose payer matches no member are excluded
/// from every member's total; a warning is emitted for each so the drop is
/// observable without being an error.
pub fn compute_totals(participants: &[User], expenses: &[ExpenseRecord]) -> Vec<MemberBalance> {
    let mut spent: HashMap<&str, f64> = HashMap::with_capacity(participants.len());
    for user in participants {
        spent.entry(user.id.as_str()).or_insert(0.0);
    }

    for expense in expenses {
        match resolve_payer(participants, &expense.paid_by) {
            Some(user) => {
                *spent.entry(user.id.as_str()).or_insert(0.0) +=
                    amount::sanitize(expense.amount);
            }
            None => {
                warn!(
                    expense_id = %expense.id,
                    payer = %expense.paid_by,
                    "expense payer matches no group member; excluded from member totals"
                );
            }
        }
    }

    participants
        .iter()
        .map(|user| MemberBalance {
            user_id: user.id.clone(),
            total_spent: amount::round2(spent.get(user.id.as_str()).copied().unwrap_or(0.0)),
        })
        .collect()
}

/// Group-wide total over ALL expenses, unmatched payers included. This can
/// exceed the sum of member totals when orphaned expenses exist.
pub fn total_expenses(expenses: &[ExpenseRecord]) -> f64 {
    amount::round2(
        expenses
            .iter()
            .map(|e| amount::sanitize(e.amount))
            .sum::<f64>(),
    )
}

/// Sum of per-member totals.
pub fn total_group_spending(totals: &[MemberBalance]) -> f64 {
    amount::round2(
        totals
            .iter()
            .map(|b| amount::sanitize(b.total_spent))
            .sum::<f64>(),
    )
}

/// Each member's ideal contribution if costs were split evenly.
/// Single-member and empty groups have no meaningful share.
pub fn fair_share(total_group_spending: f64, participant_count: usize) -> f64 {
    if participant_count <= 1 {
        return 0.0;
    }
    amount::sanitize(total_group_spending) / participant_count as f64
}
