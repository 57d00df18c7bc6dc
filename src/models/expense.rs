use crate::core::amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single shared expense logged against a group.
///
/// `paid_by` is a payer reference, not a foreign key: depending on the
/// producer it holds a member id, a display name, or a username. Resolution
/// happens in `core::aggregator`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: String,
    pub group_id: String,
    #[serde(deserialize_with = "de_payer_ref")]
    pub paid_by: String,
    #[serde(deserialize_with = "amount::de_lenient")]
    pub amount: f64,
    pub description: String,
    pub payment_date: DateTime<Utc>,
}

// Payer references arrive as strings or bare numbers depending on the client.
fn de_payer_ref<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawRef {
        Text(String),
        Number(i64),
    }

    Ok(match RawRef::deserialize(deserializer)? {
        RawRef::Text(s) => s,
        RawRef::Number(n) => n.to_string(),
    })
}
