//! Parameter constraint checks shared by the tool families.
//!
//! Every check returns a short message suitable for the `"Error: ..."`
//! local-validation reply; a failed check means no network call is made.

use uuid::Uuid;

pub const GRID_MODES: &[&str] = &["recursive", "neat", "static", "clock", "custom"];
pub const BOT_MODES: &[&str] = &["n", "m", "gs", "t", "p"];
pub const VENDORS: &[&str] = &["bybit", "binance", "binance_us", "bitget", "okx"];
pub const MARKET_TYPES: &[&str] = &["futures", "spot"];
pub const RISK_MODES: &[&str] = &["1", "2", "3"];
pub const TRENDS: &[&str] = &["LONG", "SHORT"];
pub const PERIODS: &[&str] = &["daily", "monthly", "yearly"];
pub const SORT_ORDERS: &[&str] = &["asc", "desc"];

pub fn require_positive(value: i64, field: &str) -> Result<(), String> {
    if value > 0 {
        Ok(())
    } else {
        Err(format!("{} must be a positive integer", field))
    }
}

pub fn require_non_negative(value: i64, field: &str) -> Result<(), String> {
    if value >= 0 {
        Ok(())
    } else {
        Err(format!("{} must not be negative", field))
    }
}

pub fn require_non_empty(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} must not be empty", field))
    } else {
        Ok(())
    }
}

pub fn require_one_of(value: &str, allowed: &[&str], field: &str) -> Result<(), String> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be one of: {}",
            field,
            allowed.join(", ")
        ))
    }
}

/// Wallet exposure bound shared by bots and routine actions.
pub fn require_exposure(value: f64, field: &str) -> Result<(), String> {
    if (0.0..=11.0).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between 0 and 11", field))
    }
}

pub fn require_leverage(value: i64) -> Result<(), String> {
    if (1..=125).contains(&value) {
        Ok(())
    } else {
        Err("leverage must be between 1 and 125".to_string())
    }
}

pub fn require_role(value: i64) -> Result<(), String> {
    if value == 1 || value == 2 {
        Ok(())
    } else {
        Err("role must be 1 (Admin) or 2 (User)".to_string())
    }
}

/// Routine ids are backend-issued UUID strings.
pub fn require_uuid(value: &str, field: &str) -> Result<(), String> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| format!("{} must be a valid UUID", field))
}
