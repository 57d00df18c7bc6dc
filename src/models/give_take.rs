use crate::core::amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum GiveTakeKind {
    Give,
    Take,
}

/// A personal IOU outside the group expense pool: money handed to or
/// borrowed from a named counterparty. Settling one deletes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GiveTakeRecord {
    pub id: String,
    pub user_id: String,
    pub counterparty: String,
    #[serde(deserialize_with = "amount::de_lenient")]
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: GiveTakeKind,
    pub date: DateTime<Utc>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One signed movement of the monthly coins budget.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoinsHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub delta: f64,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}
