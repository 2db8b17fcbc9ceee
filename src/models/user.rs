use serde::{Deserialize, Serialize};

use super::exchange::ExchangeSummary;

/// Platform account as returned by `/users`.
///
/// The backend embeds the exchanges owned by the user; older payloads may
/// omit the list entirely, so it defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub role: i64,
    pub timezone: Option<String>,
    pub last_seen_at: Option<String>,
    pub created_at: Option<String>,
    #[serde(default)]
    pub exchanges: Vec<ExchangeSummary>,
}
