use serde::{Deserialize, Serialize};

/// Exchange account with full balance breakdown, as returned by
/// `/exchanges` and `/exchanges/{id}`.
///
/// Balances are decimal strings straight from the backend; `api_error`
/// is the server-computed credential-health flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub slug: Option<String>,
    /// Vendor: bybit, binance, binance_us, bitget or okx.
    pub exchange: String,
    /// Risk tier as a string code: "1" (Conservative), "2" (Moderate),
    /// "3" (Kamikaze).
    pub risk_mode: Option<String>,
    #[serde(default)]
    pub is_testnet: bool,
    #[serde(default)]
    pub api_error: bool,
    pub balance_usdt: Option<String>,
    pub balance_usd: Option<String>,
    pub balance_btc: Option<String>,
    pub balance_eth: Option<String>,
    pub initial_balance: Option<String>,
    pub initial_balance_updated_at: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Compact exchange shape embedded in user and bot payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeSummary {
    pub id: i64,
    pub name: String,
    pub exchange: String,
    #[serde(default)]
    pub api_error: bool,
}
