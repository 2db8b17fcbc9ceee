use serde::{Deserialize, Serialize};

/// Closed or partially closed trade as returned by `/trades`.
///
/// Quantities and prices are decimal strings (or null) straight from the
/// backend; they are rendered, never recalculated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub exchange_id: i64,
    pub position_id: Option<String>,
    pub symbol: String,
    pub nice_name: Option<String>,
    pub order_id: Option<String>,
    pub order_link_id: Option<String>,
    pub side: Option<String>,
    pub qty: Option<String>,
    pub price: Option<String>,
    pub order_type: Option<String>,
    pub exec_type: Option<String>,
    pub closed_size: Option<String>,
    pub avg_entry_price: Option<String>,
    pub avg_exit_price: Option<String>,
    pub closed_pnl: Option<String>,
    pub fill_count: Option<i64>,
    pub leverage: Option<i64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Standard pagination envelope wrapping list-of-trade responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub links: PageLinks,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: i64,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub last_page: i64,
    pub per_page: i64,
    pub total: i64,
    pub path: Option<String>,
}

/// One aggregation bucket of `GET /trades/stats/pnl`.
///
/// Exactly one of `date` / (`month` + `year`) / `year` is meaningful,
/// depending on the requested period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlRecord {
    pub date: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub symbol: String,
    pub total_trades: i64,
    pub pnl: String,
}

/// Response of `GET /trades/stats/pnl`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PnlStatsResponse {
    pub period: String,
    pub records: Vec<PnlRecord>,
    pub global_pnl: String,
}
