use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Optional handle; accepted as a fallback payer reference on expenses.
    pub username: Option<String>,
    pub email: String,
    /// Monthly coins budget. Zero means the coins feature is unset for
    /// this user and expenses are not budget-checked.
    #[serde(default)]
    pub monthly_limit_coins: f64,
    #[serde(default)]
    pub remaining_coins: f64,
}
