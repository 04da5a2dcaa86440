use serde::{Deserialize, Serialize};

/// Cards shown on a fresh dashboard until the user edits them in Settings.
pub const DEFAULT_DASHBOARD_CARDS: &str = "summary_chart,savings_goal,anomaly_alert";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub google_id: Option<String>,
    pub email: String,
    pub name: String,
    pub dashboard_cards: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    /// Calendar date, YYYY-MM-DD.
    pub date: String,
    pub description: String,
    pub category: String,
    pub is_paid: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub token: String,
    pub expires_at: String,
    pub created_at: String,
}

/// Claims returned by the identity provider's profile endpoint after a
/// completed handshake.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityAssertion {
    pub id: String,
    pub email: String,
    pub name: String,
}
