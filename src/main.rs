//! Stdio harness: one JSON request per line in, one JSON reply per line
//! out.
//!
//! Request: `{"tool": "<name>", "arguments": {...}}` or
//! `{"list_tools": true}`. Reply: `{"text": "..."}` on success,
//! `{"error": "..."}` otherwise. Per-call failures are reported without
//! terminating the process.

use std::io::{BufRead, Write};

use anyhow::Result;
use log::error;
use serde_json::{json, Value};

use botpanel_mcp::{dispatch, tool_specs, ApiClient};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let client = ApiClient::from_env()?;

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handle_line(&client, &line).await;
        serde_json::to_writer(&mut stdout, &reply)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_line(client: &ApiClient, line: &str) -> Value {
    let request: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => return json!({ "error": format!("Invalid request: {}", e) }),
    };

    if request
        .get("list_tools")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        let tools: Vec<Value> = tool_specs()
            .into_iter()
            .map(|spec| {
                json!({
                    "name": spec.name,
                    "description": spec.description,
                    "input_schema": spec.input_schema,
                })
            })
            .collect();
        return json!({ "tools": tools });
    }

    let tool = match request.get("tool").and_then(Value::as_str) {
        Some(tool) => tool,
        None => return json!({ "error": "Request is missing the tool name" }),
    };
    let args = request
        .get("arguments")
        .cloned()
        .unwrap_or_else(|| json!({}));

    match dispatch(client, tool, args).await {
        Ok(text) => json!({ "text": text }),
        Err(e) => {
            error!("{} failed: {}", tool, e);
            json!({ "error": e.to_string() })
        }
    }
}
