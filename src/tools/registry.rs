//! Tool catalogue: the name, description and declared input schema for
//! every operation, for the host runtime to advertise.
//!
//! The schemas mirror the constraints enforced in `validate`; a host that
//! checks them rejects malformed input before any handler runs.

use serde_json::{json, Value};

pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

fn no_params() -> Value {
    json!({ "type": "object", "properties": {} })
}

fn id_only(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "integer", "minimum": 1, "description": description }
        },
        "required": ["id"]
    })
}

fn routine_id_only() -> Value {
    json!({
        "type": "object",
        "properties": {
            "id": { "type": "string", "format": "uuid", "description": "Routine ID (UUID)" }
        },
        "required": ["id"]
    })
}

fn mode_schema(description: &str) -> Value {
    json!({ "type": "string", "enum": ["n", "m", "gs", "t", "p"], "description": description })
}

fn exposure_schema(description: &str) -> Value {
    json!({ "type": "number", "minimum": 0, "maximum": 11, "description": description })
}

fn grid_mode_schema() -> Value {
    json!({
        "type": "string",
        "enum": ["recursive", "neat", "static", "clock", "custom"],
        "description": "Grid strategy"
    })
}

pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        // users
        ToolSpec {
            name: "list_users",
            description: "List all platform users with their exchanges.",
            input_schema: no_params(),
        },
        ToolSpec {
            name: "get_user",
            description: "Get one user by ID, including owned exchanges.",
            input_schema: id_only("User ID"),
        },
        ToolSpec {
            name: "create_user",
            description: "Create a new user account.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "email": { "type": "string", "format": "email" },
                    "password": { "type": "string" },
                    "role": { "type": "integer", "enum": [1, 2], "description": "1=Admin, 2=User" },
                    "admin": { "type": "boolean", "default": false }
                },
                "required": ["name", "email", "password", "role"]
            }),
        },
        ToolSpec {
            name: "update_user_email",
            description: "Change a user's email address.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "email": { "type": "string", "format": "email" }
                },
                "required": ["id", "email"]
            }),
        },
        ToolSpec {
            name: "update_user_name",
            description: "Change a user's display name.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "name": { "type": "string" }
                },
                "required": ["id", "name"]
            }),
        },
        ToolSpec {
            name: "update_user_password",
            description: "Change a user's password.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "password": { "type": "string" }
                },
                "required": ["id", "password"]
            }),
        },
        ToolSpec {
            name: "update_user_admin",
            description: "Set or clear a user's admin flag.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "admin": { "type": "boolean" }
                },
                "required": ["id", "admin"]
            }),
        },
        ToolSpec {
            name: "update_user_role",
            description: "Change a user's role.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "role": { "type": "integer", "enum": [1, 2], "description": "1=Admin, 2=User" }
                },
                "required": ["id", "role"]
            }),
        },
        ToolSpec {
            name: "list_roles",
            description: "Show the available user roles.",
            input_schema: no_params(),
        },
        // routines
        ToolSpec {
            name: "get_routine_parameters",
            description: "Show valid grid modes, bot modes and grids for routines.",
            input_schema: no_params(),
        },
        ToolSpec {
            name: "list_routines",
            description: "List all routines with their actions.",
            input_schema: no_params(),
        },
        ToolSpec {
            name: "get_routine",
            description: "Get one routine by ID.",
            input_schema: routine_id_only(),
        },
        ToolSpec {
            name: "create_routine",
            description: "Create a routine that applies a bot action when run.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "integer", "minimum": 1 },
                    "name": { "type": "string" },
                    "grid_mode": grid_mode_schema(),
                    "grid_id": { "type": "integer", "minimum": 0 },
                    "lm": mode_schema("Long-side mode"),
                    "lwe": exposure_schema("Long wallet exposure"),
                    "sm": mode_schema("Short-side mode"),
                    "swe": exposure_schema("Short wallet exposure")
                },
                "required": ["user_id", "name", "grid_mode", "grid_id", "lm", "lwe", "sm", "swe"]
            }),
        },
        ToolSpec {
            name: "update_routine",
            description: "Update a routine's name and/or parts of its action.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "format": "uuid" },
                    "name": { "type": "string" },
                    "grid_mode": grid_mode_schema(),
                    "grid_id": { "type": "integer", "minimum": 0 },
                    "lm": mode_schema("Long-side mode"),
                    "lwe": exposure_schema("Long wallet exposure"),
                    "sm": mode_schema("Short-side mode"),
                    "swe": exposure_schema("Short wallet exposure")
                },
                "required": ["id"]
            }),
        },
        ToolSpec {
            name: "run_routine",
            description: "Run a routine against one exchange's bots.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "string", "format": "uuid" },
                    "exchange_id": { "type": "integer", "minimum": 1 }
                },
                "required": ["id", "exchange_id"]
            }),
        },
        // exchanges
        ToolSpec {
            name: "get_exchange_parameters",
            description: "Show supported exchange vendors and risk modes.",
            input_schema: no_params(),
        },
        ToolSpec {
            name: "list_exchanges",
            description: "List exchange accounts, optionally scoped to one user.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "integer", "minimum": 1 }
                }
            }),
        },
        ToolSpec {
            name: "get_exchange",
            description: "Get one exchange account with its balances.",
            input_schema: id_only("Exchange ID"),
        },
        ToolSpec {
            name: "create_exchange",
            description: "Connect a new exchange account.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "integer", "minimum": 1 },
                    "name": { "type": "string" },
                    "exchange": {
                        "type": "string",
                        "enum": ["bybit", "binance", "binance_us", "bitget", "okx"]
                    },
                    "risk_mode": {
                        "type": "string",
                        "enum": ["1", "2", "3"],
                        "description": "1=Conservative, 2=Moderate, 3=Kamikaze"
                    },
                    "api_key": { "type": "string" },
                    "api_secret": { "type": "string" },
                    "api_frase": { "type": "string", "description": "Passphrase, required by some vendors" },
                    "is_testnet": { "type": "boolean", "default": false }
                },
                "required": ["user_id", "name", "exchange", "risk_mode", "api_key", "api_secret"]
            }),
        },
        ToolSpec {
            name: "update_exchange",
            description: "Update an exchange account; only provided fields change.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "name": { "type": "string" },
                    "risk_mode": { "type": "string", "enum": ["1", "2", "3"] },
                    "api_key": { "type": "string" },
                    "api_secret": { "type": "string" },
                    "api_frase": { "type": "string" },
                    "is_testnet": { "type": "boolean" }
                },
                "required": ["id"]
            }),
        },
        ToolSpec {
            name: "refresh_exchange",
            description: "Re-sync an exchange's balances and credential health.",
            input_schema: id_only("Exchange ID"),
        },
        // bots
        ToolSpec {
            name: "get_bot_parameters",
            description: "Show valid bot modes, market types, grids and symbols.",
            input_schema: no_params(),
        },
        ToolSpec {
            name: "list_bots",
            description: "List bots for a user and/or exchange (at least one required).",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "integer", "minimum": 1 },
                    "exchange_id": { "type": "integer", "minimum": 1 }
                }
            }),
        },
        ToolSpec {
            name: "get_bot",
            description: "Get one bot's full configuration and process state.",
            input_schema: id_only("Bot ID"),
        },
        ToolSpec {
            name: "create_bot",
            description: "Create a bot; it starts STOPPED.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "exchange_id": { "type": "integer", "minimum": 1 },
                    "symbol_id": { "type": "integer", "minimum": 1 },
                    "market_type": { "type": "string", "enum": ["futures", "spot"] },
                    "grid_mode": grid_mode_schema(),
                    "grid_id": { "type": "integer", "minimum": 0 },
                    "lm": mode_schema("Long-side mode"),
                    "lwe": exposure_schema("Long wallet exposure"),
                    "sm": mode_schema("Short-side mode"),
                    "swe": exposure_schema("Short wallet exposure"),
                    "leverage": { "type": "integer", "minimum": 1, "maximum": 125 },
                    "assigned_balance": { "type": "number", "minimum": 0, "description": "0 = unlimited" },
                    "oh_mode": { "type": "boolean" },
                    "show_logs": { "type": "boolean" },
                    "is_on_trend": { "type": "boolean" },
                    "is_on_routines": { "type": "boolean" }
                },
                "required": ["name", "exchange_id", "symbol_id", "market_type", "grid_mode",
                             "lm", "lwe", "sm", "swe"]
            }),
        },
        ToolSpec {
            name: "update_bot",
            description: "Update a bot; only provided fields change. Pass grid_id null to detach the grid.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "name": { "type": "string" },
                    "market_type": { "type": "string", "enum": ["futures", "spot"] },
                    "grid_mode": grid_mode_schema(),
                    "grid_id": { "type": ["integer", "null"], "minimum": 0 },
                    "symbol_id": { "type": "integer", "minimum": 1 },
                    "lm": mode_schema("Long-side mode"),
                    "lwe": exposure_schema("Long wallet exposure"),
                    "sm": mode_schema("Short-side mode"),
                    "swe": exposure_schema("Short wallet exposure"),
                    "leverage": { "type": "integer", "minimum": 1, "maximum": 125 },
                    "assigned_balance": { "type": "number", "minimum": 0 },
                    "oh_mode": { "type": "boolean" },
                    "show_logs": { "type": "boolean" },
                    "is_on_trend": { "type": "boolean" },
                    "is_on_routines": { "type": "boolean" }
                },
                "required": ["id"]
            }),
        },
        ToolSpec {
            name: "start_bot",
            description: "Start a bot's trading process.",
            input_schema: id_only("Bot ID"),
        },
        ToolSpec {
            name: "stop_bot",
            description: "Stop a bot's trading process.",
            input_schema: id_only("Bot ID"),
        },
        ToolSpec {
            name: "restart_bot",
            description: "Restart a bot's trading process.",
            input_schema: id_only("Bot ID"),
        },
        ToolSpec {
            name: "swap_we",
            description: "Swap a bot's wallet exposures toward a new trend.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "minimum": 1 },
                    "new_trend": { "type": "string", "enum": ["LONG", "SHORT"] }
                },
                "required": ["id", "new_trend"]
            }),
        },
        ToolSpec {
            name: "simple_swap_we",
            description: "Swap a bot's long and short wallet exposures.",
            input_schema: id_only("Bot ID"),
        },
        ToolSpec {
            name: "get_bot_status",
            description: "Get a bot's process status only.",
            input_schema: id_only("Bot ID"),
        },
        // trades
        ToolSpec {
            name: "list_trades",
            description: "List closed trades for an exchange, paginated.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "exchange_id": { "type": "integer", "minimum": 1 },
                    "symbol": { "type": "string" },
                    "from_date": { "type": "string", "format": "date" },
                    "to_date": { "type": "string", "format": "date" },
                    "per_page": { "type": "integer", "minimum": 1, "maximum": 100 },
                    "sort_by": { "type": "string" },
                    "sort_order": { "type": "string", "enum": ["asc", "desc"] }
                },
                "required": ["exchange_id"]
            }),
        },
        ToolSpec {
            name: "get_trade",
            description: "Get one trade with all execution details.",
            input_schema: id_only("Trade ID"),
        },
        ToolSpec {
            name: "list_trade_symbols",
            description: "List the distinct symbols traded on an exchange.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "exchange_id": { "type": "integer", "minimum": 1 }
                },
                "required": ["exchange_id"]
            }),
        },
        ToolSpec {
            name: "get_pnl_stats",
            description: "Aggregate pnl per symbol by day, month or year.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "exchange_id": { "type": "integer", "minimum": 1 },
                    "period": { "type": "string", "enum": ["daily", "monthly", "yearly"] },
                    "month": { "type": "integer", "minimum": 1, "maximum": 12 },
                    "year": { "type": "integer", "minimum": 2000, "maximum": 2100 }
                },
                "required": ["exchange_id"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_families_covered() {
        let specs = tool_specs();
        assert_eq!(specs.len(), 36);

        let names: HashSet<&str> = specs.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), specs.len(), "tool names must be unique");
        for name in [
            "list_users",
            "run_routine",
            "refresh_exchange",
            "simple_swap_we",
            "get_pnl_stats",
        ] {
            assert!(names.contains(name));
        }
    }

    #[test]
    fn test_schemas_are_objects() {
        for spec in tool_specs() {
            assert_eq!(
                spec.input_schema["type"], "object",
                "{} schema must be an object",
                spec.name
            );
            assert!(!spec.description.is_empty());
        }
    }
}
