use serde::{Deserialize, Serialize};

/// Selectable mode with its display label (bot modes, routine types).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeOption {
    pub code: String,
    pub label: String,
}

/// Risk tier option ("1" Conservative, "2" Moderate, "3" Kamikaze).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModeOption {
    pub value: String,
    pub label: String,
}

/// Grid configuration available for assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridSummary {
    pub id: i64,
    pub name: String,
}

/// Tradable symbol, tagged with the exchange vendor it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub id: i64,
    pub symbol: String,
    pub nice_name: Option<String>,
    /// Vendor slug (bybit, binance, ...). Used to group the symbol list.
    pub exchange: Option<String>,
}

/// Response of `GET /routine-parameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutineParameters {
    pub grid_modes: Vec<String>,
    pub bot_modes: Vec<ModeOption>,
    pub grids: Vec<GridSummary>,
}

/// Response of `GET /exchange-parameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeParameters {
    pub exchanges: Vec<String>,
    pub risk_modes: Vec<RiskModeOption>,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// Response of `GET /bot-parameters`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotParameters {
    pub market_types: Vec<String>,
    pub grid_modes: Vec<String>,
    pub bot_modes: Vec<ModeOption>,
    pub grids: Vec<GridSummary>,
    pub symbols: Vec<SymbolInfo>,
}
