//! Exchange account tools: credentials, risk mode and balance reporting
//! via `/exchanges`.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::{get_json, patch_json, post_json, ApiError, Gateway};
use crate::models::{Exchange, ExchangeParameters};

use super::format::{opt_text, risk_mode_label, yes_no};
use super::validate::{
    require_non_empty, require_one_of, require_positive, RISK_MODES, VENDORS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ListExchangesParams {
    pub user_id: Option<i64>,
}

impl ListExchangesParams {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(user_id) = self.user_id {
            require_positive(user_id, "user_id")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetExchangeParams {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExchangeParams {
    pub user_id: i64,
    pub name: String,
    pub exchange: String,
    pub risk_mode: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_frase: Option<String>,
    #[serde(default)]
    pub is_testnet: bool,
}

impl CreateExchangeParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.user_id, "user_id")?;
        require_non_empty(&self.name, "name")?;
        require_one_of(&self.exchange, VENDORS, "exchange")?;
        require_one_of(&self.risk_mode, RISK_MODES, "risk_mode")?;
        require_non_empty(&self.api_key, "api_key")?;
        require_non_empty(&self.api_secret, "api_secret")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExchangeParams {
    pub id: i64,
    pub name: Option<String>,
    pub risk_mode: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_frase: Option<String>,
    pub is_testnet: Option<bool>,
}

impl UpdateExchangeParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.id, "id")?;
        if let Some(ref name) = self.name {
            require_non_empty(name, "name")?;
        }
        if let Some(ref risk_mode) = self.risk_mode {
            require_one_of(risk_mode, RISK_MODES, "risk_mode")?;
        }
        Ok(())
    }

    /// Only fields the caller actually provided go into the PATCH body.
    fn build_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(ref name) = self.name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(ref risk_mode) = self.risk_mode {
            body.insert("risk_mode".to_string(), json!(risk_mode));
        }
        if let Some(ref api_key) = self.api_key {
            body.insert("api_key".to_string(), json!(api_key));
        }
        if let Some(ref api_secret) = self.api_secret {
            body.insert("api_secret".to_string(), json!(api_secret));
        }
        if let Some(ref api_frase) = self.api_frase {
            body.insert("api_frase".to_string(), json!(api_frase));
        }
        if let Some(is_testnet) = self.is_testnet {
            body.insert("is_testnet".to_string(), json!(is_testnet));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshExchangeParams {
    pub id: i64,
}

pub async fn get_exchange_parameters(gateway: &dyn Gateway) -> Result<String, ApiError> {
    match get_json::<ExchangeParameters>(gateway, "/exchange-parameters").await {
        Ok(params) => Ok(render_parameters(&params)),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching exchange parameters: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn list_exchanges(
    gateway: &dyn Gateway,
    params: ListExchangesParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let endpoint = match params.user_id {
        Some(user_id) => format!("/exchanges?user_id={}", user_id),
        None => "/exchanges".to_string(),
    };
    match get_json::<Vec<Exchange>>(gateway, &endpoint).await {
        Ok(exchanges) => {
            let mut out = format!("Found {} exchanges:\n", exchanges.len());
            for exchange in &exchanges {
                out.push_str(&format!(
                    "\n#{} {} ({}) | Risk: {} | Testnet: {} | API: {} | USDT: {}",
                    exchange.id,
                    exchange.name,
                    exchange.exchange,
                    risk_label(exchange),
                    yes_no(exchange.is_testnet),
                    api_status(exchange.api_error),
                    opt_text(&exchange.balance_usdt)
                ));
            }
            Ok(out)
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error listing exchanges: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_exchange(
    gateway: &dyn Gateway,
    params: GetExchangeParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id") {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<Exchange>(gateway, &format!("/exchanges/{}", params.id)).await {
        Ok(exchange) => Ok(render_exchange_detail(&exchange)),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Exchange with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching exchange: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn create_exchange(
    gateway: &dyn Gateway,
    params: CreateExchangeParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let mut body = Map::new();
    body.insert("user_id".to_string(), json!(params.user_id));
    body.insert("name".to_string(), json!(params.name));
    body.insert("exchange".to_string(), json!(params.exchange));
    body.insert("risk_mode".to_string(), json!(params.risk_mode));
    body.insert("api_key".to_string(), json!(params.api_key));
    body.insert("api_secret".to_string(), json!(params.api_secret));
    if let Some(ref api_frase) = params.api_frase {
        body.insert("api_frase".to_string(), json!(api_frase));
    }
    body.insert("is_testnet".to_string(), json!(params.is_testnet));

    match post_json::<Exchange>(gateway, "/exchanges", Some(Value::Object(body))).await {
        Ok(exchange) => Ok(format!(
            "Exchange created successfully.\n  ID: {}\n  Name: {} ({})\n  API status: {}\n  Balance (USDT): {}",
            exchange.id,
            exchange.name,
            exchange.exchange,
            api_status(exchange.api_error),
            opt_text(&exchange.balance_usdt)
        )),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error creating exchange: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn update_exchange(
    gateway: &dyn Gateway,
    params: UpdateExchangeParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = params.build_body();
    match patch_json::<Exchange>(gateway, &format!("/exchanges/{}", params.id), body).await {
        Ok(exchange) => Ok(format!(
            "Exchange {} updated.\n  API status: {}",
            exchange.id,
            api_status(exchange.api_error)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Exchange with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error updating exchange: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn refresh_exchange(
    gateway: &dyn Gateway,
    params: RefreshExchangeParams,
) -> Result<String, ApiError> {
    if let Err(msg) = require_positive(params.id, "id") {
        return Ok(format!("Error: {}", msg));
    }
    match post_json::<Exchange>(gateway, &format!("/exchanges/{}/refresh", params.id), None).await {
        Ok(exchange) => Ok(format!(
            "Exchange {} refreshed.\n  API status: {}\n  Balance (USDT): {}",
            exchange.id,
            api_status(exchange.api_error),
            opt_text(&exchange.balance_usdt)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Exchange with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error refreshing exchange: {}", e)),
        Err(e) => Err(e),
    }
}

fn api_status(api_error: bool) -> &'static str {
    if api_error {
        "ERROR (check credentials)"
    } else {
        "OK"
    }
}

fn risk_label(exchange: &Exchange) -> String {
    match exchange.risk_mode {
        Some(ref code) => format!("{} ({})", risk_mode_label(code), code),
        None => "N/A".to_string(),
    }
}

fn render_exchange_detail(exchange: &Exchange) -> String {
    let initial = match (&exchange.initial_balance, &exchange.initial_balance_updated_at) {
        (Some(balance), Some(at)) => format!("{} (as of {})", balance, at),
        (Some(balance), None) => balance.clone(),
        _ => "N/A".to_string(),
    };
    format!(
        "Exchange #{}: {}\n  Vendor: {} | Slug: {}\n  Owner: user {}\n  Risk mode: {}\n  Testnet: {}\n  API status: {}\n  Balances:\n    USDT: {}\n    USD: {}\n    BTC: {}\n    ETH: {}\n  Initial balance: {}\n  Created: {} | Updated: {}",
        exchange.id,
        exchange.name,
        exchange.exchange,
        opt_text(&exchange.slug),
        exchange.user_id,
        risk_label(exchange),
        yes_no(exchange.is_testnet),
        api_status(exchange.api_error),
        opt_text(&exchange.balance_usdt),
        opt_text(&exchange.balance_usd),
        opt_text(&exchange.balance_btc),
        opt_text(&exchange.balance_eth),
        initial,
        opt_text(&exchange.created_at),
        opt_text(&exchange.updated_at)
    )
}

fn render_parameters(params: &ExchangeParameters) -> String {
    let mut out = String::from("Exchange parameters:");
    out.push_str(&format!(
        "\n  Vendors: {}",
        params.exchanges.join(", ")
    ));
    out.push_str("\n  Risk modes:");
    for mode in &params.risk_modes {
        out.push_str(&format!("\n    {} = {}", mode.value, mode.label));
    }
    if !params.notes.is_empty() {
        out.push_str("\n  Notes:");
        for note in &params.notes {
            out.push_str(&format!("\n    - {}", note));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubGateway;
    use reqwest::Method;

    fn sample_exchange() -> Value {
        json!({
            "id": 3,
            "user_id": 7,
            "name": "Main Account",
            "slug": "main-account",
            "exchange": "bybit",
            "risk_mode": "2",
            "is_testnet": false,
            "api_error": false,
            "balance_usdt": "1234.56",
            "balance_usd": null,
            "balance_btc": "0.5",
            "balance_eth": null,
            "initial_balance": "1000",
            "initial_balance_updated_at": "2024-01-01T00:00:00Z",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-05-01T00:00:00Z"
        })
    }

    #[tokio::test]
    async fn test_get_exchange_full_balance_breakdown() {
        let stub = StubGateway::returning(sample_exchange());
        let text = get_exchange(&stub, GetExchangeParams { id: 3 }).await.unwrap();
        assert!(text.contains("Exchange #3: Main Account"));
        assert!(text.contains("Risk mode: Moderate (2)"));
        assert!(text.contains("USDT: 1234.56"));
        assert!(text.contains("USD: N/A"));
        assert!(text.contains("Initial balance: 1000 (as of 2024-01-01T00:00:00Z)"));
    }

    #[tokio::test]
    async fn test_list_exchanges_scopes_by_user() {
        let stub = StubGateway::returning(json!([sample_exchange()]));
        let text = list_exchanges(&stub, ListExchangesParams { user_id: Some(7) })
            .await
            .unwrap();
        assert!(text.starts_with("Found 1 exchanges:"));
        assert!(text.contains("API: OK"));
        assert_eq!(stub.calls()[0].endpoint, "/exchanges?user_id=7");
    }

    #[tokio::test]
    async fn test_create_exchange_reports_api_error_flag() {
        let mut broken = sample_exchange();
        broken["api_error"] = json!(true);
        let stub = StubGateway::returning(broken);
        let text = create_exchange(
            &stub,
            CreateExchangeParams {
                user_id: 7,
                name: "Main Account".to_string(),
                exchange: "bybit".to_string(),
                risk_mode: "2".to_string(),
                api_key: "key".to_string(),
                api_secret: "secret".to_string(),
                api_frase: None,
                is_testnet: false,
            },
        )
        .await
        .unwrap();
        assert!(text.contains("API status: ERROR (check credentials)"));

        let body = stub.calls()[0].body.as_ref().unwrap().as_object().unwrap().clone();
        assert!(!body.contains_key("api_frase"));
        assert_eq!(body["exchange"], "bybit");
    }

    #[tokio::test]
    async fn test_create_exchange_rejects_unknown_vendor() {
        let stub = StubGateway::default();
        let text = create_exchange(
            &stub,
            CreateExchangeParams {
                user_id: 7,
                name: "X".to_string(),
                exchange: "kraken".to_string(),
                risk_mode: "1".to_string(),
                api_key: "k".to_string(),
                api_secret: "s".to_string(),
                api_frase: None,
                is_testnet: false,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            text,
            "Error: exchange must be one of: bybit, binance, binance_us, bitget, okx"
        );
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_exchange_sparse_body() {
        let stub = StubGateway::returning(sample_exchange());
        update_exchange(
            &stub,
            UpdateExchangeParams {
                id: 3,
                name: None,
                risk_mode: Some("3".to_string()),
                api_key: None,
                api_secret: None,
                api_frase: None,
                is_testnet: None,
            },
        )
        .await
        .unwrap();

        let call = &stub.calls()[0];
        assert_eq!(call.method, Method::PATCH);
        let body = call.body.as_ref().unwrap().as_object().unwrap().clone();
        assert_eq!(body.len(), 1);
        assert_eq!(body["risk_mode"], "3");
    }

    #[tokio::test]
    async fn test_refresh_exchange_404() {
        let stub = StubGateway::failing(ApiError::http(404, "Not Found", ""));
        let text = refresh_exchange(&stub, RefreshExchangeParams { id: 12 })
            .await
            .unwrap();
        assert_eq!(text, "Exchange with ID 12 not found.");
    }

    #[tokio::test]
    async fn test_parameters_rendering() {
        let stub = StubGateway::returning(json!({
            "exchanges": ["bybit", "binance", "binance_us", "bitget", "okx"],
            "risk_modes": [
                {"value": "1", "label": "Conservative"},
                {"value": "2", "label": "Moderate"},
                {"value": "3", "label": "Kamikaze"}
            ],
            "notes": ["api_frase is required for okx and bitget"]
        }));
        let text = get_exchange_parameters(&stub).await.unwrap();
        assert!(text.contains("Vendors: bybit, binance, binance_us, bitget, okx"));
        assert!(text.contains("3 = Kamikaze"));
        assert!(text.contains("- api_frase is required for okx and bitget"));
    }
}
