//! Tool handlers, one module per resource family, plus the name-based
//! dispatcher the host harness calls into.
//!
//! Every handler returns its report as a single text block. Local
//! validation failures and structured HTTP errors come back as `Ok` text;
//! transport and decode failures propagate as errors for the harness to
//! report per call.

pub mod bots;
pub mod exchanges;
pub mod format;
pub mod registry;
pub mod routines;
pub mod trades;
pub mod users;
pub mod validate;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::api::{ApiError, Gateway};

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid parameters for {tool}: {source}")]
    InvalidParams {
        tool: String,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Deserializer that keeps "field absent" and "field explicitly null"
/// apart: absent stays `None` (via `#[serde(default)]`), null becomes
/// `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn parse<T: DeserializeOwned>(tool: &str, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|source| ToolError::InvalidParams {
        tool: tool.to_string(),
        source,
    })
}

/// Route one tool invocation to its handler.
pub async fn dispatch(gateway: &dyn Gateway, tool: &str, args: Value) -> Result<String, ToolError> {
    let text = match tool {
        // users
        "list_users" => users::list_users(gateway).await?,
        "get_user" => users::get_user(gateway, parse(tool, args)?).await?,
        "create_user" => users::create_user(gateway, parse(tool, args)?).await?,
        "update_user_email" => users::update_user_email(gateway, parse(tool, args)?).await?,
        "update_user_name" => users::update_user_name(gateway, parse(tool, args)?).await?,
        "update_user_password" => users::update_user_password(gateway, parse(tool, args)?).await?,
        "update_user_admin" => users::update_user_admin(gateway, parse(tool, args)?).await?,
        "update_user_role" => users::update_user_role(gateway, parse(tool, args)?).await?,
        "list_roles" => users::list_roles(),

        // routines
        "get_routine_parameters" => routines::get_routine_parameters(gateway).await?,
        "list_routines" => routines::list_routines(gateway).await?,
        "get_routine" => routines::get_routine(gateway, parse(tool, args)?).await?,
        "create_routine" => routines::create_routine(gateway, parse(tool, args)?).await?,
        "update_routine" => routines::update_routine(gateway, parse(tool, args)?).await?,
        "run_routine" => routines::run_routine(gateway, parse(tool, args)?).await?,

        // exchanges
        "get_exchange_parameters" => exchanges::get_exchange_parameters(gateway).await?,
        "list_exchanges" => exchanges::list_exchanges(gateway, parse(tool, args)?).await?,
        "get_exchange" => exchanges::get_exchange(gateway, parse(tool, args)?).await?,
        "create_exchange" => exchanges::create_exchange(gateway, parse(tool, args)?).await?,
        "update_exchange" => exchanges::update_exchange(gateway, parse(tool, args)?).await?,
        "refresh_exchange" => exchanges::refresh_exchange(gateway, parse(tool, args)?).await?,

        // bots
        "get_bot_parameters" => bots::get_bot_parameters(gateway).await?,
        "list_bots" => bots::list_bots(gateway, parse(tool, args)?).await?,
        "get_bot" => bots::get_bot(gateway, parse(tool, args)?).await?,
        "create_bot" => bots::create_bot(gateway, parse(tool, args)?).await?,
        "update_bot" => bots::update_bot(gateway, parse(tool, args)?).await?,
        "start_bot" => bots::start_bot(gateway, parse(tool, args)?).await?,
        "stop_bot" => bots::stop_bot(gateway, parse(tool, args)?).await?,
        "restart_bot" => bots::restart_bot(gateway, parse(tool, args)?).await?,
        "swap_we" => bots::swap_we(gateway, parse(tool, args)?).await?,
        "simple_swap_we" => bots::simple_swap_we(gateway, parse(tool, args)?).await?,
        "get_bot_status" => bots::get_bot_status(gateway, parse(tool, args)?).await?,

        // trades
        "list_trades" => trades::list_trades(gateway, parse(tool, args)?).await?,
        "get_trade" => trades::get_trade(gateway, parse(tool, args)?).await?,
        "list_trade_symbols" => trades::list_trade_symbols(gateway, parse(tool, args)?).await?,
        "get_pnl_stats" => trades::get_pnl_stats(gateway, parse(tool, args)?).await?,

        other => return Err(ToolError::UnknownTool(other.to_string())),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::StubGateway;
    use serde_json::json;

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let stub = StubGateway::default();
        let err = dispatch(&stub, "fly_to_the_moon", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(_)));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_invalid_params() {
        let stub = StubGateway::default();
        let err = dispatch(&stub, "get_bot", json!({"id": "five"})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidParams { .. }));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_static_tool_needs_no_network() {
        let stub = StubGateway::default();
        let text = dispatch(&stub, "list_roles", json!({})).await.unwrap();
        assert!(text.contains("1 = Admin"));
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_handler() {
        let stub = StubGateway::failing(ApiError::http(404, "Not Found", ""));
        let text = dispatch(&stub, "get_bot", json!({"id": 999})).await.unwrap();
        assert_eq!(text, "Bot with ID 999 not found.");
    }

    #[tokio::test]
    async fn test_dispatch_every_registered_tool_is_routable() {
        // Every advertised tool must reach a handler: with a failing
        // gateway the outcome is either rendered error text or an
        // InvalidParams rejection, never UnknownTool.
        for spec in registry::tool_specs() {
            let stub = StubGateway::failing(ApiError::http(500, "Internal Server Error", ""));
            if let Err(ToolError::UnknownTool(name)) = dispatch(&stub, spec.name, json!({})).await {
                panic!("registered tool {} is not routed", name);
            }
        }
    }
}
