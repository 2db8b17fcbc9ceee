//! Bot tools: configuration, process control and wallet-exposure swaps
//! via `/bots`.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::{get_json, patch_json, post_json, ApiError, Gateway};
use crate::models::{Bot, BotParameters, BotStatus};

use super::double_option;
use super::format::{bot_mode_label, opt_num, opt_text, running_label, yes_no};
use super::validate::{
    require_exposure, require_leverage, require_non_empty, require_non_negative, require_one_of,
    require_positive, BOT_MODES, GRID_MODES, MARKET_TYPES, TRENDS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct ListBotsParams {
    pub user_id: Option<i64>,
    pub exchange_id: Option<i64>,
}

impl ListBotsParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.user_id.is_none() && self.exchange_id.is_none() {
            return Err("Either user_id or exchange_id is required.".to_string());
        }
        if let Some(user_id) = self.user_id {
            require_positive(user_id, "user_id")?;
        }
        if let Some(exchange_id) = self.exchange_id {
            require_positive(exchange_id, "exchange_id")?;
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        let mut query = Vec::new();
        if let Some(user_id) = self.user_id {
            query.push(format!("user_id={}", user_id));
        }
        if let Some(exchange_id) = self.exchange_id {
            query.push(format!("exchange_id={}", exchange_id));
        }
        format!("/bots?{}", query.join("&"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotIdParams {
    pub id: i64,
}

impl BotIdParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.id, "id")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBotParams {
    pub name: String,
    pub exchange_id: i64,
    pub symbol_id: i64,
    pub market_type: String,
    pub grid_mode: String,
    pub grid_id: Option<i64>,
    pub lm: String,
    pub lwe: f64,
    pub sm: String,
    pub swe: f64,
    pub leverage: Option<i64>,
    pub assigned_balance: Option<f64>,
    pub oh_mode: Option<bool>,
    pub show_logs: Option<bool>,
    pub is_on_trend: Option<bool>,
    pub is_on_routines: Option<bool>,
}

impl CreateBotParams {
    pub fn validate(&self) -> Result<(), String> {
        require_non_empty(&self.name, "name")?;
        require_positive(self.exchange_id, "exchange_id")?;
        require_positive(self.symbol_id, "symbol_id")?;
        require_one_of(&self.market_type, MARKET_TYPES, "market_type")?;
        require_one_of(&self.grid_mode, GRID_MODES, "grid_mode")?;
        if let Some(grid_id) = self.grid_id {
            require_non_negative(grid_id, "grid_id")?;
        }
        require_one_of(&self.lm, BOT_MODES, "lm")?;
        require_exposure(self.lwe, "lwe")?;
        require_one_of(&self.sm, BOT_MODES, "sm")?;
        require_exposure(self.swe, "swe")?;
        if let Some(leverage) = self.leverage {
            require_leverage(leverage)?;
        }
        if let Some(assigned_balance) = self.assigned_balance {
            if assigned_balance < 0.0 {
                return Err("assigned_balance must not be negative".to_string());
            }
        }
        Ok(())
    }

    fn build_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("name".to_string(), json!(self.name));
        body.insert("exchange_id".to_string(), json!(self.exchange_id));
        body.insert("symbol_id".to_string(), json!(self.symbol_id));
        body.insert("market_type".to_string(), json!(self.market_type));
        body.insert("grid_mode".to_string(), json!(self.grid_mode));
        if let Some(grid_id) = self.grid_id {
            body.insert("grid_id".to_string(), json!(grid_id));
        }
        body.insert("lm".to_string(), json!(self.lm));
        body.insert("lwe".to_string(), json!(self.lwe));
        body.insert("sm".to_string(), json!(self.sm));
        body.insert("swe".to_string(), json!(self.swe));
        if let Some(leverage) = self.leverage {
            body.insert("leverage".to_string(), json!(leverage));
        }
        if let Some(assigned_balance) = self.assigned_balance {
            body.insert("assigned_balance".to_string(), json!(assigned_balance));
        }
        if let Some(oh_mode) = self.oh_mode {
            body.insert("oh_mode".to_string(), json!(oh_mode));
        }
        if let Some(show_logs) = self.show_logs {
            body.insert("show_logs".to_string(), json!(show_logs));
        }
        if let Some(is_on_trend) = self.is_on_trend {
            body.insert("is_on_trend".to_string(), json!(is_on_trend));
        }
        if let Some(is_on_routines) = self.is_on_routines {
            body.insert("is_on_routines".to_string(), json!(is_on_routines));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBotParams {
    pub id: i64,
    pub name: Option<String>,
    pub market_type: Option<String>,
    pub grid_mode: Option<String>,
    /// Missing = leave unchanged; explicit null = detach the grid.
    #[serde(default, deserialize_with = "double_option")]
    pub grid_id: Option<Option<i64>>,
    pub symbol_id: Option<i64>,
    pub lm: Option<String>,
    pub lwe: Option<f64>,
    pub sm: Option<String>,
    pub swe: Option<f64>,
    pub leverage: Option<i64>,
    pub assigned_balance: Option<f64>,
    pub oh_mode: Option<bool>,
    pub show_logs: Option<bool>,
    pub is_on_trend: Option<bool>,
    pub is_on_routines: Option<bool>,
}

impl UpdateBotParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.id, "id")?;
        if let Some(ref name) = self.name {
            require_non_empty(name, "name")?;
        }
        if let Some(ref market_type) = self.market_type {
            require_one_of(market_type, MARKET_TYPES, "market_type")?;
        }
        if let Some(ref grid_mode) = self.grid_mode {
            require_one_of(grid_mode, GRID_MODES, "grid_mode")?;
        }
        if let Some(Some(grid_id)) = self.grid_id {
            require_non_negative(grid_id, "grid_id")?;
        }
        if let Some(symbol_id) = self.symbol_id {
            require_positive(symbol_id, "symbol_id")?;
        }
        if let Some(ref lm) = self.lm {
            require_one_of(lm, BOT_MODES, "lm")?;
        }
        if let Some(lwe) = self.lwe {
            require_exposure(lwe, "lwe")?;
        }
        if let Some(ref sm) = self.sm {
            require_one_of(sm, BOT_MODES, "sm")?;
        }
        if let Some(swe) = self.swe {
            require_exposure(swe, "swe")?;
        }
        if let Some(leverage) = self.leverage {
            require_leverage(leverage)?;
        }
        if let Some(assigned_balance) = self.assigned_balance {
            if assigned_balance < 0.0 {
                return Err("assigned_balance must not be negative".to_string());
            }
        }
        Ok(())
    }

    /// Sparse PATCH body: only provided fields, with `grid_id: null` sent
    /// through when the caller explicitly passed null.
    fn build_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(ref name) = self.name {
            body.insert("name".to_string(), json!(name));
        }
        if let Some(ref market_type) = self.market_type {
            body.insert("market_type".to_string(), json!(market_type));
        }
        if let Some(ref grid_mode) = self.grid_mode {
            body.insert("grid_mode".to_string(), json!(grid_mode));
        }
        if let Some(ref grid_id) = self.grid_id {
            body.insert("grid_id".to_string(), json!(grid_id));
        }
        if let Some(symbol_id) = self.symbol_id {
            body.insert("symbol_id".to_string(), json!(symbol_id));
        }
        if let Some(ref lm) = self.lm {
            body.insert("lm".to_string(), json!(lm));
        }
        if let Some(lwe) = self.lwe {
            body.insert("lwe".to_string(), json!(lwe));
        }
        if let Some(ref sm) = self.sm {
            body.insert("sm".to_string(), json!(sm));
        }
        if let Some(swe) = self.swe {
            body.insert("swe".to_string(), json!(swe));
        }
        if let Some(leverage) = self.leverage {
            body.insert("leverage".to_string(), json!(leverage));
        }
        if let Some(assigned_balance) = self.assigned_balance {
            body.insert("assigned_balance".to_string(), json!(assigned_balance));
        }
        if let Some(oh_mode) = self.oh_mode {
            body.insert("oh_mode".to_string(), json!(oh_mode));
        }
        if let Some(show_logs) = self.show_logs {
            body.insert("show_logs".to_string(), json!(show_logs));
        }
        if let Some(is_on_trend) = self.is_on_trend {
            body.insert("is_on_trend".to_string(), json!(is_on_trend));
        }
        if let Some(is_on_routines) = self.is_on_routines {
            body.insert("is_on_routines".to_string(), json!(is_on_routines));
        }
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapWeParams {
    pub id: i64,
    pub new_trend: String,
}

impl SwapWeParams {
    pub fn validate(&self) -> Result<(), String> {
        require_positive(self.id, "id")?;
        require_one_of(&self.new_trend, TRENDS, "new_trend")
    }
}

pub async fn get_bot_parameters(gateway: &dyn Gateway) -> Result<String, ApiError> {
    match get_json::<BotParameters>(gateway, "/bot-parameters").await {
        Ok(params) => Ok(render_parameters(&params)),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching bot parameters: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn list_bots(gateway: &dyn Gateway, params: ListBotsParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<Vec<Bot>>(gateway, &params.endpoint()).await {
        Ok(bots) => {
            let running = bots.iter().filter(|b| b.is_running).count();
            let mut out = format!("Found {} bots ({} running):\n", bots.len(), running);
            for bot in &bots {
                out.push('\n');
                out.push_str(&render_bot_summary(bot));
            }
            Ok(out)
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error listing bots: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_bot(gateway: &dyn Gateway, params: BotIdParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<Bot>(gateway, &format!("/bots/{}", params.id)).await {
        Ok(bot) => Ok(render_bot_detail(&bot)),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching bot: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn create_bot(gateway: &dyn Gateway, params: CreateBotParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = params.build_body();
    match post_json::<Bot>(gateway, "/bots", Some(body)).await {
        Ok(bot) => Ok(format!(
            "Bot created successfully.\n{}\n  Note: the bot starts STOPPED; use start_bot to launch it.",
            render_bot_detail(&bot)
        )),
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error creating bot: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn update_bot(gateway: &dyn Gateway, params: UpdateBotParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = params.build_body();
    match patch_json::<Bot>(gateway, &format!("/bots/{}", params.id), body).await {
        Ok(bot) => Ok(format!(
            "Bot {} updated.\n{}\n  Note: a restart may be required for changes to take effect.",
            bot.id,
            render_bot_detail(&bot)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error updating bot: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn start_bot(gateway: &dyn Gateway, params: BotIdParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match post_json::<Bot>(gateway, &format!("/bots/{}/start", params.id), None).await {
        Ok(bot) => Ok(format!(
            "Bot {} started.\n  PID: {}\n  Started at: {}",
            bot.id,
            opt_num(&bot.pid),
            opt_text(&bot.started_at)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error starting bot: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn stop_bot(gateway: &dyn Gateway, params: BotIdParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match post_json::<Bot>(gateway, &format!("/bots/{}/stop", params.id), None).await {
        Ok(bot) => Ok(format!(
            "Bot {} stopped.\n  Status: {}\n  Stopped at: {}",
            bot.id,
            running_label(bot.is_running),
            opt_text(&bot.stopped_at)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error stopping bot: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn restart_bot(gateway: &dyn Gateway, params: BotIdParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match post_json::<Bot>(gateway, &format!("/bots/{}/restart", params.id), None).await {
        Ok(bot) => Ok(format!(
            "Bot {} restarted.\n  PID: {}\n  Started at: {}",
            bot.id,
            opt_num(&bot.pid),
            opt_text(&bot.started_at)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error restarting bot: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn swap_we(gateway: &dyn Gateway, params: SwapWeParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    let body = json!({ "new_trend": params.new_trend });
    match post_json::<Bot>(gateway, &format!("/bots/{}/swap-we", params.id), Some(body)).await {
        Ok(bot) => Ok(format!(
            "Wallet exposures swapped for bot {} (new trend: {}).\n  lwe: {} | swe: {}\n  Note: a restart may be required for changes to take effect.",
            bot.id, params.new_trend, bot.lwe, bot.swe
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error swapping wallet exposure: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn simple_swap_we(
    gateway: &dyn Gateway,
    params: BotIdParams,
) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match post_json::<Bot>(gateway, &format!("/bots/{}/simple-swap-we", params.id), None).await {
        Ok(bot) => Ok(format!(
            "Wallet exposures swapped for bot {}.\n  lwe: {} | swe: {}",
            bot.id, bot.lwe, bot.swe
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error swapping wallet exposure: {}", e)),
        Err(e) => Err(e),
    }
}

pub async fn get_bot_status(gateway: &dyn Gateway, params: BotIdParams) -> Result<String, ApiError> {
    if let Err(msg) = params.validate() {
        return Ok(format!("Error: {}", msg));
    }
    match get_json::<BotStatus>(gateway, &format!("/bots/{}/status", params.id)).await {
        Ok(status) => Ok(format!(
            "Bot {} status: {}\n  PID: {}\n  Started at: {}\n  Stopped at: {}",
            params.id,
            running_label(status.is_running),
            opt_num(&status.pid),
            opt_text(&status.started_at),
            opt_text(&status.stopped_at)
        )),
        Err(ApiError::Http { status: 404, .. }) => {
            Ok(format!("Bot with ID {} not found.", params.id))
        }
        Err(e @ ApiError::Http { .. }) => Ok(format!("Error fetching bot status: {}", e)),
        Err(e) => Err(e),
    }
}

const MAX_SYMBOLS_PER_VENDOR: usize = 10;

fn render_parameters(params: &BotParameters) -> String {
    let mut out = String::from("Bot parameters:");
    out.push_str(&format!(
        "\n  Market types: {}",
        params.market_types.join(", ")
    ));
    out.push_str(&format!(
        "\n  Grid modes: {}",
        params.grid_modes.join(", ")
    ));
    out.push_str("\n  Bot modes:");
    for mode in &params.bot_modes {
        out.push_str(&format!("\n    {} = {}", mode.code, mode.label));
    }
    out.push_str("\n  Grids:");
    for grid in &params.grids {
        out.push_str(&format!("\n    - #{} {}", grid.id, grid.name));
    }
    out.push_str("\n  Symbols:");

    // Group by vendor, preserving first-seen vendor order.
    let mut vendors: Vec<(&str, Vec<&str>)> = Vec::new();
    for symbol in &params.symbols {
        let vendor = symbol.exchange.as_deref().unwrap_or("other");
        match vendors.iter_mut().find(|(v, _)| *v == vendor) {
            Some((_, list)) => list.push(&symbol.symbol),
            None => vendors.push((vendor, vec![&symbol.symbol])),
        }
    }
    for (vendor, symbols) in &vendors {
        let shown = symbols
            .iter()
            .take(MAX_SYMBOLS_PER_VENDOR)
            .copied()
            .collect::<Vec<_>>()
            .join(", ");
        if symbols.len() > MAX_SYMBOLS_PER_VENDOR {
            out.push_str(&format!(
                "\n    {} ({}): {} ... and {} more",
                vendor,
                symbols.len(),
                shown,
                symbols.len() - MAX_SYMBOLS_PER_VENDOR
            ));
        } else {
            out.push_str(&format!("\n    {} ({}): {}", vendor, symbols.len(), shown));
        }
    }
    out
}

fn assigned_balance_label(value: f64) -> String {
    if value == 0.0 {
        "unlimited".to_string()
    } else {
        value.to_string()
    }
}

fn render_bot_summary(bot: &Bot) -> String {
    let exchange = match &bot.exchange {
        Some(e) => format!("{} ({})", e.name, e.exchange),
        None => format!("#{}", bot.exchange_id),
    };
    let symbol = match &bot.symbol {
        Some(s) => s.symbol.clone(),
        None => format!("#{}", bot.symbol_id),
    };
    format!(
        "Bot #{}: {} [{}]\n  Symbol: {} | Market: {} | Exchange: {}\n  Modes: lm={} (lwe={}), sm={} (swe={}) | Grid: {}\n  Leverage: {}x | Assigned balance: {}",
        bot.id,
        bot.name,
        running_label(bot.is_running),
        symbol,
        bot.market_type,
        exchange,
        bot.lm,
        bot.lwe,
        bot.sm,
        bot.swe,
        bot.grid_mode,
        bot.leverage,
        assigned_balance_label(bot.assigned_balance)
    )
}

fn render_bot_detail(bot: &Bot) -> String {
    let exchange = match &bot.exchange {
        Some(e) => format!("#{} {} ({})", e.id, e.name, e.exchange),
        None => format!("#{}", bot.exchange_id),
    };
    let symbol = match &bot.symbol {
        Some(s) => format!("{} (#{})", s.symbol, s.id),
        None => format!("#{}", bot.symbol_id),
    };
    let grid = match (&bot.grid, bot.grid_id) {
        (Some(g), _) => format!("{}, grid #{} ({})", bot.grid_mode, g.id, g.name),
        (None, Some(grid_id)) => format!("{}, grid #{}", bot.grid_mode, grid_id),
        (None, None) => format!("{}, no grid assigned", bot.grid_mode),
    };
    format!(
        "Bot #{}: {} [{}]\n  Symbol: {} | Market: {}\n  Exchange: {}\n  Owner: user {}\n  Grid: {}\n  Trading modes:\n    Long: {} ({}), exposure {}\n    Short: {} ({}), exposure {}\n  Leverage: {}x\n  Assigned balance: {}\n  Options: oh_mode={}, show_logs={}, is_on_trend={}, is_on_routines={}\n  Process: pid {}, started {}, stopped {}\n  Created: {} | Updated: {}",
        bot.id,
        bot.name,
        running_label(bot.is_running),
        symbol,
        bot.market_type,
        exchange,
        bot.user_id,
        grid,
        bot.lm,
        bot_mode_label(&bot.lm),
        bot.lwe,
        bot.sm,
        bot_mode_label(&bot.sm),
        bot.swe,
        bot.leverage,
        assigned_balance_label(bot.assigned_balance),
        yes_no(bot.oh_mode),
        yes_no(bot.show_logs),
        yes_no(bot.is_on_trend),
        yes_no(bot.is_on_routines),
        opt_num(&bot.pid),
        opt_text(&bot.started_at),
        opt_text(&bot.stopped_at),
        opt_text(&bot.created_at),
        opt_text(&bot.updated_at)
    )
}
