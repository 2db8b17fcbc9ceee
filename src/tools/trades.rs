//! Trade history tools: paginated listing, symbol discovery and pnl
//! aggregation via `/trades`.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::{get_json, ApiError, Gateway};
use crate::models::{Paginated, PnlRecord, PnlStatsResponse, Trade};

use super::format::{fmt_opt_pnl, fmt_pnl, opt_num, opt_text};
use super::validate::{require_one_of, require_positive, PERIODS, SORT_ORDERS};

#[derive(Debug, Clone, Deserialize)]
pub struct ListTradesParams {
    pub exchange_id: i64,
    pub symbol: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub per_page: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ListTradesParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.exchange_id, "exchange_id")?;
        if let Some(ref from_date) = self.from_date {
            require_date(from_date, "from_date")?;
        }
        if let Some(ref to_date) = self.to_date {
            require_date(to_date, "to_date")?;
        }
        if let Some(per_page) = self.per_page {
            if !(1..=100).contains(&per_page) {
                return Err("per_page must be between 1 and 100".to_string());
            }
        }
        if let Some(ref sort_order) = self.sort_order {
            require_one_of(sort_order, SORT_ORDERS, "sort_order")?;
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        let mut query = vec![format!("exchange_id={}", self.exchange_id)];
        if let Some(ref symbol) = self.symbol {
            query.push(format!("symbol={}", symbol));
        }
        if let Some(ref from_date) = self.from_date {
            query.push(format!("from_date={}", from_date));
        }
        if let Some(ref to_date) = self.to_date {
            query.push(format!("to_date={}", to_date));
        }
        if let Some(per_page) = self.per_page {
            query.push(format!("per_page={}", per_page));
        }
        if let Some(ref sort_by) = self.sort_by {
            query.push(format!("sort_by={}", sort_by));
        }
        if let Some(ref sort_order) = self.sort_order {
            query.push(format!("sort_order={}", sort_order));
        }
        format!("/trades?{}", query.join("&"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetTradeParams {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListTradeSymbolsParams {
    pub exchange_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PnlStatsParams {
    pub exchange_id: i64,
    pub period: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl PnlStatsParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.exchange_id, "exchange_id")?;
        if let Some(ref period) = self.period {
            require_one_of(period, PERIODS, "period")?;
        }
        if let Some(month) = self.month {
            if !(1..=12).contains(&month) {
                return Err("month must be between 1 and 12".to_string());
            }
        }
        if let Some(year) = self.year {
            if !(2000..=2100).contains(&year) {
                return Err("year must be between 2000 and 2100".to_string());
            }
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        let mut query = vec![format!("exchange_id={}", self.exchange_id)];
        if let Some(ref period) = self.period {
            query.push(format!("period={}", period));
        }
        if let Some(month) = self.month {
            query.push(format!("month={}", month));
        }
        if let Some(year) = self.year {
            query.push(format!("year={}", year));
        }
        format!("/trades/stats/pnl?{}", query.join("&"))
    }
}

fn require_date(value: &str, field: &str) -> Result<(), String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| format!("{} must be a date in YYYY-MM-DD format", field))
}

pub async fn list_trades(
    gateway: &dyn Gateway,
    params: ListTradesParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<Paginated<Trade>>(gateway, &params.endpoint()).await {
        Ok(page) => Ok(render_trade_page(&page)),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error listing trades: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_trade(gateway: &dyn Gateway, params: GetTradeParams) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id") {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<Trade>(gateway, &format!("/trades/{}", params.id)).await {
        Ok(trade) => Ok(render_trade_detail(&trade)),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Trade with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching trade: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn list_trade_symbols(
    gateway: &dyn Gateway,
    params: ListTradeSymbolsParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.exchange_id, "exchange_id") {
        return Ok(format!("Error: {}", msg));
    }
    let endpoint = format!("/trades/symbols?exchange_id={}", params.exchange_id);
    match get_json::<Vec<String>>(gateway, &endpoint).await {
        Ok(symbols) => {
            let mut out = format!(
                "Symbols with trades on exchange {}:",
                params.exchange_id
            );
            if symbols.is_empty() {
                out.push_str("\n  (none)");
            }
            for symbol in &symbols {
                out.push_str(&format!("\n  - {}", symbol));
            }
            Ok(out)
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching symbols: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_pnl_stats(
    gateway: &dyn Gateway,
    params: PnlStatsParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<PnlStatsResponse>(gateway, &params.endpoint()).await {
        Ok(stats) => Ok(render_pnl_stats(&stats)),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching PnL stats: {}", e)),
        Err(e) => Err(e),
    }
}

fn render_trade_page(page: &Paginated<Trade>) -> String {
    let mut out = format!("Found {} trades:\n", page.meta.total);
    for trade in &page.data {
        let nice = match &trade.nice_name {
            Some(nice_name) => format!(" ({})", nice_name),
            None => String::new(),
        };
        out.push_str(&format!(
            "\nTrade #{}: {}{}\n  Side: {} | Size: {} | Entry: {} | Exit: {}\n  Closed PnL: {}\n  Closed: {}",
            trade.id,
            trade.symbol,
            nice,
            opt_text(&trade.side),
            opt_text(&trade.closed_size),
            opt_text(&trade.avg_entry_price),
            opt_text(&trade.avg_exit_price),
            fmt_opt_pnl(&trade.closed_pnl),
            opt_text(&trade.created_at)
        ));
    }
    out.push_str(&format!("\n\n{}", render_page_footer(page)));
    out
}

fn render_page_footer(page: &Paginated<Trade>) -> String {
    match (page.meta.from, page.meta.to) {
        (Some(from), Some(to)) => format!(
            "Showing {}-{} of {} trades (page {} of {})",
            from, to, page.meta.total, page.meta.current_page, page.meta.last_page
        ),
        _ => format!("Showing 0 of {} trades", page.meta.total),
    }
}

fn render_trade_detail(trade: &Trade) -> String {
    let nice = match &trade.nice_name {
        Some(nice_name) => format!(" ({})", nice_name),
        None => String::new(),
    };
    format!(
        "Trade #{}: {}{}\n  Exchange: #{} | Position: {}\n  Order: {} (link: {})\n  Side: {} | Type: {} | Exec: {}\n  Qty: {} | Price: {}\n  Closed size: {}\n  Avg entry: {} | Avg exit: {}\n  Closed PnL: {}\n  Fills: {} | Leverage: {}\n  Created: {} | Updated: {}",
        trade.id,
        trade.symbol,
        nice,
        trade.exchange_id,
        opt_text(&trade.position_id),
        opt_text(&trade.order_id),
        opt_text(&trade.order_link_id),
        opt_text(&trade.side),
        opt_text(&trade.order_type),
        opt_text(&trade.exec_type),
        opt_text(&trade.qty),
        opt_text(&trade.price),
        opt_text(&trade.closed_size),
        opt_text(&trade.avg_entry_price),
        opt_text(&trade.avg_exit_price),
        fmt_opt_pnl(&trade.closed_pnl),
        opt_num(&trade.fill_count),
        opt_num(&trade.leverage),
        opt_text(&trade.created_at),
        opt_text(&trade.updated_at)
    )
}

/// Bucket key for one pnl record given the requested period.
fn group_key(record: &PnlRecord, period: &str) -> String {
    match period {
        "monthly" => match (record.year, record.month) {
            (Some(year), Some(month)) => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|date| date.format("%B %Y").to_string())
                .unwrap_or_else(|| format!("{}-{}", year, month)),
            _ => "unknown".to_string(),
        },
        "yearly" => record
            .year
            .map(|year| year.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        _ => record.date.clone().unwrap_or_else(|| "unknown".to_string()),
    }
}

fn render_pnl_stats(stats: &PnlStatsResponse) -> String {
    let mut out = format!("PnL statistics ({}):\n", stats.period);

    // Group records by period key in first-seen order.
    let mut groups: Vec<(String, Vec<&PnlRecord>)> = Vec::new();
    for record in &stats.records {
        let key = group_key(record, &stats.period);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, records)) => records.push(record),
            None => groups.push((key, vec![record])),
        }
    }

    for (key, records) in &groups {
        let trades: i64 = records.iter().map(|r| r.total_trades).sum();
        let pnl: f64 = records
            .iter()
            .filter_map(|r| r.pnl.parse::<f64>().ok())
            .sum();
        out.push_str(&format!(
            "\n{}: {} trades, PnL: {:+.4}",
            key, trades, pnl
        ));
        for record in records {
            out.push_str(&format!(
                "\n  {}: {} trades, {}",
                record.symbol,
                record.total_trades,
                fmt_pnl(&record.pnl)
            ));
        }
    }

    out.push_str(&format!(
        "\n\nGlobal PnL (All Time): {}",
        fmt_pnl(&stats.global_pnl)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubGateway;
    use serde_json::{json, Value};

    fn sample_trade() -> Value {
        json!({
            "id": 101,
            "exchange_id": 3,
            "position_id": "pos-1",
            "symbol": "BTCUSDT",
            "nice_name": "Bitcoin",
            "order_id": "ord-1",
            "order_link_id": "link-1",
            "side": "Sell",
            "qty": "0.5",
            "price": "43210.5",
            "order_type": "Market",
            "exec_type": "Trade",
            "closed_size": "0.5",
            "avg_entry_price": "42000.1",
            "avg_exit_price": "43210.5",
            "closed_pnl": "605.2",
            "fill_count": 3,
            "leverage": 10,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    fn page_with(trades: Vec<Value>, from: Value, to: Value, total: i64) -> Value {
        json!({
            "data": trades,
            "links": {
                "first": "http://api/trades?page=1",
                "last": "http://api/trades?page=2",
                "prev": null,
                "next": "http://api/trades?page=2"
            },
            "meta": {
                "current_page": 1,
                "from": from,
                "to": to,
                "last_page": 2,
                "per_page": 15,
                "total": total,
                "path": "http://api/trades"
            }
        })
    }

    #[tokio::test]
    async fn test_list_trades_query_and_footer() {
        let stub = StubGateway::returning(page_with(vec![sample_trade()], json!(1), json!(15), 25));
        let text = list_trades(
            &stub,
            ListTradesParams {
                exchange_id: 3,
                symbol: Some("BTCUSDT".to_string()),
                from_date: Some("2024-01-01".to_string()),
                to_date: None,
                per_page: Some(15),
                sort_by: None,
                sort_order: Some("desc".to_string()),
            },
        )
        .await
        .unwrap();
        assert!(text.contains("Trade #101: BTCUSDT (Bitcoin)"));
        assert!(text.contains("Closed PnL: +605.2000"));
        assert!(text.ends_with("Showing 1-15 of 25 trades (page 1 of 2)"));
        assert_eq!(
            stub.calls()[0].endpoint,
            "/trades?exchange_id=3&symbol=BTCUSDT&from_date=2024-01-01&per_page=15&sort_order=desc"
        );
    }

    #[tokio::test]
    async fn test_list_trades_empty_page_footer() {
        let stub = StubGateway::returning(page_with(vec![], json!(null), json!(null), 0));
        let text = list_trades(
            &stub,
            ListTradesParams {
                exchange_id: 3,
                symbol: None,
                from_date: None,
                to_date: None,
                per_page: None,
                sort_by: None,
                sort_order: None,
            },
        )
        .await
        .unwrap();
        assert!(text.ends_with("Showing 0 of 0 trades"));
    }

    #[tokio::test]
    async fn test_list_trades_rejects_bad_date() {
        let stub = StubGateway::default();
        let text = list_trades(
            &stub,
            ListTradesParams {
                exchange_id: 3,
                symbol: None,
                from_date: Some("01/01/2024".to_string()),
                to_date: None,
                per_page: None,
                sort_by: None,
                sort_order: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(text, "Error: from_date must be a date in YYYY-MM-DD format");
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_trade_full_dump_signed_pnl() {
        let mut losing = sample_trade();
        losing["closed_pnl"] = json!("-12.5");
        let stub = StubGateway::returning(losing);
        let text = get_trade(&stub, GetTradeParams { id: 101 }).await.unwrap();
        assert!(text.contains("Order: ord-1 (link: link-1)"));
        assert!(text.contains("Closed PnL: -12.5000"));
        assert!(text.contains("Fills: 3 | Leverage: 10"));
    }

    #[tokio::test]
    async fn test_get_trade_404() {
        let stub = StubGateway::failing(ApiError::http(404, "Not Found", ""));
        let text = get_trade(&stub, GetTradeParams { id: 7 }).await.unwrap();
        assert_eq!(text, "Trade with ID 7 not found.");
    }

    #[tokio::test]
    async fn test_list_symbols_bullets() {
        let stub = StubGateway::returning(json!(["BTCUSDT", "ETHUSDT"]));
        let text = list_trade_symbols(&stub, ListTradeSymbolsParams { exchange_id: 3 })
            .await
            .unwrap();
        assert_eq!(
            text,
            "Symbols with trades on exchange 3:\n  - BTCUSDT\n  - ETHUSDT"
        );
        assert_eq!(stub.calls()[0].endpoint, "/trades/symbols?exchange_id=3");
    }

    #[tokio::test]
    async fn test_pnl_stats_daily_grouping() {
        let stub = StubGateway::returning(json!({
            "period": "daily",
            "records": [
                {"date": "2024-01-01", "symbol": "BTCUSDT", "total_trades": 2, "pnl": "1.5"},
                {"date": "2024-01-01", "symbol": "ETHUSDT", "total_trades": 1, "pnl": "-0.25"}
            ],
            "global_pnl": "1.25"
        }));
        let text = get_pnl_stats(
            &stub,
            PnlStatsParams {
                exchange_id: 3,
                period: Some("daily".to_string()),
                month: None,
                year: None,
            },
        )
        .await
        .unwrap();
        assert!(text.contains("2024-01-01: 3 trades, PnL: +1.2500"));
        assert!(text.contains("  BTCUSDT: 2 trades, +1.5000"));
        assert!(text.contains("  ETHUSDT: 1 trades, -0.2500"));
        assert!(text.ends_with("Global PnL (All Time): +1.2500"));
        assert_eq!(
            stub.calls()[0].endpoint,
            "/trades/stats/pnl?exchange_id=3&period=daily"
        );
    }

    #[tokio::test]
    async fn test_pnl_stats_monthly_key_uses_month_name() {
        let stub = StubGateway::returning(json!({
            "period": "monthly",
            "records": [
                {"year": 2024, "month": 1, "symbol": "BTCUSDT", "total_trades": 4, "pnl": "10"},
                {"year": 2024, "month": 2, "symbol": "BTCUSDT", "total_trades": 1, "pnl": "-3"}
            ],
            "global_pnl": "7"
        }));
        let text = get_pnl_stats(
            &stub,
            PnlStatsParams {
                exchange_id: 3,
                period: Some("monthly".to_string()),
                month: None,
                year: None,
            },
        )
        .await
        .unwrap();
        assert!(text.contains("January 2024: 4 trades, PnL: +10.0000"));
        assert!(text.contains("February 2024: 1 trades, PnL: -3.0000"));
    }

    #[tokio::test]
    async fn test_pnl_stats_yearly_first_seen_order() {
        let stub = StubGateway::returning(json!({
            "period": "yearly",
            "records": [
                {"year": 2024, "symbol": "BTCUSDT", "total_trades": 4, "pnl": "10"},
                {"year": 2023, "symbol": "BTCUSDT", "total_trades": 2, "pnl": "5"},
                {"year": 2024, "symbol": "ETHUSDT", "total_trades": 1, "pnl": "1"}
            ],
            "global_pnl": "16"
        }));
        let text = get_pnl_stats(
            &stub,
            PnlStatsParams {
                exchange_id: 3,
                period: Some("yearly".to_string()),
                month: None,
                year: None,
            },
        )
        .await
        .unwrap();
        let pos_2024 = text.find("2024: 5 trades, PnL: +11.0000").unwrap();
        let pos_2023 = text.find("2023: 2 trades, PnL: +5.0000").unwrap();
        assert!(pos_2024 < pos_2023);
    }
}
