use serde::{Deserialize, Serialize};

use super::exchange::ExchangeSummary;
use super::parameters::{GridSummary, SymbolInfo};

/// Trading bot configuration and process state, as returned by `/bots`.
///
/// `is_running` is computed server-side (pid non-null and the process
/// confirmed alive); it is displayed here, never derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    pub id: i64,
    pub name: String,
    /// "futures" or "spot".
    pub market_type: String,
    pub grid_mode: String,
    pub lm: String,
    pub lwe: f64,
    pub sm: String,
    pub swe: f64,
    pub leverage: i64,
    /// 0 means unlimited.
    pub assigned_balance: f64,
    #[serde(default)]
    pub oh_mode: bool,
    #[serde(default)]
    pub show_logs: bool,
    #[serde(default)]
    pub is_on_trend: bool,
    #[serde(default)]
    pub is_on_routines: bool,
    pub pid: Option<i64>,
    pub started_at: Option<String>,
    pub stopped_at: Option<String>,
    #[serde(default)]
    pub is_running: bool,
    pub user_id: i64,
    pub exchange_id: i64,
    pub grid_id: Option<i64>,
    pub symbol_id: i64,
    pub exchange: Option<ExchangeSummary>,
    pub symbol: Option<SymbolInfo>,
    pub grid: Option<GridSummary>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Process-state subset returned by `GET /bots/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotStatus {
    pub pid: Option<i64>,
    #[serde(default)]
    pub is_running: bool,
    pub started_at: Option<String>,
    pub stopped_at: Option<String>,
}
