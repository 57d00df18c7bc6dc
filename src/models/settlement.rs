use serde::{Deserialize, Serialize};

/// Total spent by one member, as computed by the balance aggregator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub user_id: String,
    pub total_spent: f64,
}

/// Contribution minus fair share. Positive means the member is owed money.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetPosition {
    pub user_id: String,
    pub net: f64,
}

/// A suggested transfer that would resolve one debtor-creditor pair.
/// Display-only: the service computes these fresh on every query and
/// never persists or executes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}
